use chrono::NaiveDateTime;
use serde::Serialize;

use crate::domain::category::Category;
use crate::domain::comment::Comment;
use crate::domain::post::Post;
use crate::dto::categories::CategoryDto;

/// A post as shown in the feed and on its own page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostDto {
    pub id: i32,
    pub user_id: i32,
    /// Owner display name; `None` when the account no longer exists.
    pub author: Option<String>,
    pub description: String,
    pub image: String,
    pub categories: Vec<CategoryDto>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl PostDto {
    pub fn new(post: Post, author: Option<String>, categories: Vec<Category>) -> Self {
        Self {
            id: post.id.get(),
            user_id: post.user_id.get(),
            author,
            description: post.description.into_inner(),
            image: post.image.into_inner(),
            categories: categories.into_iter().map(CategoryDto::from).collect(),
            created_at: post.created_at,
            updated_at: post.updated_at,
        }
    }

    /// Ids of the linked categories.
    pub fn category_ids(&self) -> Vec<i32> {
        self.categories.iter().map(|c| c.id).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommentDto {
    pub id: i32,
    pub user_id: i32,
    pub author: Option<String>,
    pub body: String,
    pub created_at: NaiveDateTime,
}

impl CommentDto {
    pub fn new(comment: Comment, author: Option<String>) -> Self {
        Self {
            id: comment.id.get(),
            user_id: comment.user_id.get(),
            author,
            body: comment.body.into_inner(),
            created_at: comment.created_at,
        }
    }
}

/// A feed card: the post, its first comments and the comment total.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedPostDto {
    pub post: PostDto,
    pub comments: Vec<CommentDto>,
    pub comment_count: usize,
}

/// Everything the post page renders.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostDetailsDto {
    pub post: PostDto,
    pub comments: Vec<CommentDto>,
}

/// Pre-populated edit form.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EditPostDto {
    pub post: PostDto,
    pub categories: Vec<CategoryDto>,
    pub selected_category_ids: Vec<i32>,
}
