use std::collections::HashMap;

use crate::db::{DbConnection, DbPool};
use crate::domain::category::Category;
use crate::domain::comment::{Comment, CommentPreview, NewComment};
use crate::domain::post::{NewPost, Post, PostUpdate};
use crate::domain::types::{CategoryId, CommentId, PostId, UserId};
use crate::domain::user::User;

pub mod category;
pub mod comment;
pub mod errors;
pub mod post;
pub mod user;

pub use errors::{RepositoryError, RepositoryResult};

/// Repository implementation backed by Diesel and SQLite.
///
/// The underlying `r2d2::Pool` is cheap to clone, allowing the repository to
/// be passed around freely between handlers.
#[derive(Clone)]
pub struct DieselRepository {
    pool: DbPool, // r2d2::Pool is cheap to clone
}

impl DieselRepository {
    /// Create a new repository from an established database pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Get a pooled database connection.
    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(self.pool.get()?)
    }
}

/// Query parameters for listing users on the admin page.
#[derive(Debug, Clone, Default)]
pub struct UserListQuery {
    /// Case-insensitive substring of the user name.
    pub search: Option<String>,
}

impl UserListQuery {
    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }
}

/// Read-only operations for post entities.
pub trait PostReader {
    /// Retrieve a post by its identifier.
    fn get_post_by_id(&self, id: PostId) -> RepositoryResult<Option<Post>>;
    /// List all posts, newest first.
    fn list_posts(&self) -> RepositoryResult<Vec<Post>>;
    /// Category ids currently linked to a post.
    fn list_linked_category_ids(&self, post_id: PostId) -> RepositoryResult<Vec<CategoryId>>;
}

/// Write operations for posts and their category links.
///
/// Every method runs in a single transaction: either all of its rows are
/// written or none are.
pub trait PostWriter {
    /// Insert the post row and one link row per selected category.
    fn create_post(&self, post: &NewPost) -> RepositoryResult<PostId>;
    /// Update post columns, delete every existing link and insert the new set.
    ///
    /// Returns the number of post rows updated; zero means the post is gone.
    fn update_post(&self, id: PostId, update: &PostUpdate) -> RepositoryResult<usize>;
    /// Permanently delete the post along with its links and comments.
    fn delete_post(&self, id: PostId) -> RepositoryResult<usize>;
}

/// Read-only operations for category entities.
pub trait CategoryReader {
    /// Full category catalog ordered by name.
    fn list_categories(&self) -> RepositoryResult<Vec<Category>>;
    /// Categories matching the given ids; unknown ids are skipped.
    fn get_categories_by_ids(&self, ids: &[CategoryId]) -> RepositoryResult<Vec<Category>>;
    /// Linked categories for each of the given posts, ordered by name.
    fn list_categories_for_posts(
        &self,
        post_ids: &[PostId],
    ) -> RepositoryResult<HashMap<PostId, Vec<Category>>>;
}

/// Read-only operations for comments.
pub trait CommentReader {
    /// Comments of a post, oldest first.
    fn list_comments(&self, post_id: PostId) -> RepositoryResult<Vec<Comment>>;
    /// Up to `limit` oldest comments of each post plus its total count.
    ///
    /// Posts without comments are absent from the map.
    fn list_comment_previews(
        &self,
        post_ids: &[PostId],
        limit: usize,
    ) -> RepositoryResult<HashMap<PostId, CommentPreview>>;
    fn get_comment_by_id(&self, id: CommentId) -> RepositoryResult<Option<Comment>>;
}

/// Write operations for comments.
pub trait CommentWriter {
    fn create_comment(&self, comment: &NewComment) -> RepositoryResult<CommentId>;
    fn delete_comment(&self, id: CommentId) -> RepositoryResult<usize>;
}

/// Read-only operations for users.
pub trait UserReader {
    fn get_user_by_id(&self, id: UserId) -> RepositoryResult<Option<User>>;
    /// Users matching the given ids; unknown ids are skipped.
    fn get_users_by_ids(&self, ids: &[UserId]) -> RepositoryResult<Vec<User>>;
    /// Active and deactivated users ordered by name.
    fn list_users(&self, query: UserListQuery) -> RepositoryResult<Vec<User>>;
}

/// Write operations for users.
pub trait UserWriter {
    /// Clear (`active = true`) or set the soft-delete marker.
    fn set_user_active(&self, id: UserId, active: bool) -> RepositoryResult<usize>;
}
