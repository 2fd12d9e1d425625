use std::collections::HashMap;

use chrono::Utc;

use crate::domain::post::{NewPost, Post, PostUpdate};
use crate::domain::types::{CategorySelection, PostId, TypeConstraintError, UserId};
use crate::domain::validation::{
    FieldError, FieldErrors, ImageRequirement, PostFields, validate_post_fields,
};
use crate::dto::categories::CategoryDto;
use crate::dto::posts::{CommentDto, EditPostDto, FeedPostDto, PostDetailsDto, PostDto};
use crate::forms::posts::PostFormPayload;
use crate::images::ImageStore;
use crate::repository::{CategoryReader, CommentReader, PostReader, PostWriter, UserReader};

use super::users::ensure_active_user;
use super::{ServiceError, ServiceResult};

/// Converts a path id into a [`PostId`]; ids that cannot exist are not found.
pub(super) fn parse_post_id(post_id: i32) -> ServiceResult<PostId> {
    PostId::new(post_id).map_err(|_| ServiceError::not_found("post", post_id))
}

pub(super) fn load_post<R>(post_id: PostId, repo: &R) -> ServiceResult<Post>
where
    R: PostReader,
{
    match repo.get_post_by_id(post_id) {
        Ok(Some(post)) => Ok(post),
        Ok(None) => Err(ServiceError::not_found("post", post_id)),
        Err(e) => {
            log::error!("Failed to get post {post_id}: {e}");
            Err(e.into())
        }
    }
}

/// Fails with `Forbidden` unless `user_id` owns the post.
pub fn ensure_owner(post: &Post, user_id: UserId) -> ServiceResult<()> {
    if post.is_owned_by(user_id) {
        Ok(())
    } else {
        log::warn!(
            "User {user_id} attempted to modify post {} owned by {}",
            post.id,
            post.user_id
        );
        Err(ServiceError::Forbidden)
    }
}

/// Every selected category must exist in the catalog.
fn ensure_categories_exist<R>(categories: &CategorySelection, repo: &R) -> ServiceResult<()>
where
    R: CategoryReader,
{
    let found = repo
        .get_categories_by_ids(categories.as_slice())
        .map_err(|e| {
            log::error!("Failed to look up categories: {e}");
            ServiceError::from(e)
        })?;

    if found.len() == categories.len() {
        return Ok(());
    }

    let mut errors = FieldErrors::new();
    for id in categories.iter() {
        if !found.iter().any(|c| c.id == id) {
            errors.push(FieldError {
                field: "category",
                reason: format!("selected category {id} is invalid"),
            });
        }
    }
    Err(ServiceError::Validation(errors))
}

fn validate_submission<R>(
    payload: PostFormPayload,
    requirement: ImageRequirement,
    repo: &R,
) -> ServiceResult<PostFields>
where
    R: CategoryReader,
{
    let fields = validate_post_fields(
        payload.description,
        &payload.category_ids,
        payload.image,
        requirement,
    )?;
    ensure_categories_exist(&fields.categories, repo)?;
    Ok(fields)
}

fn author_names<R>(user_ids: &[UserId], repo: &R) -> ServiceResult<HashMap<UserId, String>>
where
    R: UserReader,
{
    let users = repo.get_users_by_ids(user_ids).map_err(|e| {
        log::error!("Failed to get post authors: {e}");
        ServiceError::from(e)
    })?;

    Ok(users
        .into_iter()
        .map(|u| (u.id, u.name.into_inner()))
        .collect())
}

/// Number of comments shown under each post in the feed.
pub const FEED_COMMENT_PREVIEW: usize = 3;

/// All posts, newest first, with their categories and first comments.
pub fn show_feed<R>(repo: &R) -> ServiceResult<Vec<FeedPostDto>>
where
    R: PostReader + CategoryReader + CommentReader + UserReader,
{
    let posts = repo.list_posts().map_err(|e| {
        log::error!("Failed to list posts: {e}");
        ServiceError::from(e)
    })?;

    if posts.is_empty() {
        return Ok(vec![]);
    }

    let post_ids = posts.iter().map(|p| p.id).collect::<Vec<_>>();
    let mut categories = repo.list_categories_for_posts(&post_ids).map_err(|e| {
        log::error!("Failed to list post categories: {e}");
        ServiceError::from(e)
    })?;
    let mut previews = repo
        .list_comment_previews(&post_ids, FEED_COMMENT_PREVIEW)
        .map_err(|e| {
            log::error!("Failed to list comment previews: {e}");
            ServiceError::from(e)
        })?;

    let mut user_ids = posts.iter().map(|p| p.user_id).collect::<Vec<_>>();
    user_ids.extend(
        previews
            .values()
            .flat_map(|preview| preview.comments.iter().map(|c| c.user_id)),
    );
    user_ids.sort();
    user_ids.dedup();
    let authors = author_names(&user_ids, repo)?;

    Ok(posts
        .into_iter()
        .map(|post| {
            let linked = categories.remove(&post.id).unwrap_or_default();
            let preview = previews.remove(&post.id).unwrap_or_default();
            let author = authors.get(&post.user_id).cloned();
            FeedPostDto {
                post: PostDto::new(post, author, linked),
                comments: preview
                    .comments
                    .into_iter()
                    .map(|comment| {
                        let author = authors.get(&comment.user_id).cloned();
                        CommentDto::new(comment, author)
                    })
                    .collect(),
                comment_count: preview.total,
            }
        })
        .collect())
}

/// Category catalog offered by the create form.
pub fn show_create_form<R>(repo: &R) -> ServiceResult<Vec<CategoryDto>>
where
    R: CategoryReader,
{
    match repo.list_categories() {
        Ok(categories) => Ok(categories.into_iter().map(CategoryDto::from).collect()),
        Err(e) => {
            log::error!("Failed to list categories: {e}");
            Err(e.into())
        }
    }
}

/// Creates a post owned by `user_id` and links it to the selected categories.
///
/// The image is stored first; if the database write fails the stored image is
/// discarded and nothing is persisted.
pub fn create_post<R, S>(
    payload: PostFormPayload,
    user_id: UserId,
    repo: &R,
    images: &S,
) -> ServiceResult<PostId>
where
    R: CategoryReader + PostWriter + UserReader,
    S: ImageStore + ?Sized,
{
    ensure_active_user(user_id, repo)?;
    let fields = validate_submission(payload, ImageRequirement::Required, repo)?;
    let Some(upload) = fields.image else {
        return Err(TypeConstraintError::MissingValue("image").into());
    };

    let image = images.store(&upload).map_err(|e| {
        log::error!("Failed to store post image: {e}");
        ServiceError::from(e)
    })?;

    let now = Utc::now().naive_utc();
    let new_post = NewPost {
        user_id,
        description: fields.description,
        image,
        categories: fields.categories,
        created_at: now,
        updated_at: now,
    };

    match repo.create_post(&new_post) {
        Ok(post_id) => {
            log::info!("User {user_id} created post {post_id}");
            Ok(post_id)
        }
        Err(e) => {
            log::error!("Failed to create post: {e}");
            images.discard(&new_post.image);
            Err(e.into())
        }
    }
}

/// A post with its categories and comments.
pub fn show_post<R>(post_id: i32, repo: &R) -> ServiceResult<PostDetailsDto>
where
    R: PostReader + CategoryReader + CommentReader + UserReader,
{
    let post_id = parse_post_id(post_id)?;
    let post = load_post(post_id, repo)?;

    let comments = repo.list_comments(post_id).map_err(|e| {
        log::error!("Failed to list comments for post {post_id}: {e}");
        ServiceError::from(e)
    })?;

    let mut user_ids = comments.iter().map(|c| c.user_id).collect::<Vec<_>>();
    user_ids.push(post.user_id);
    user_ids.sort();
    user_ids.dedup();
    let authors = author_names(&user_ids, repo)?;

    let categories = repo
        .list_categories_for_posts(&[post_id])
        .map_err(|e| {
            log::error!("Failed to list categories for post {post_id}: {e}");
            ServiceError::from(e)
        })?
        .remove(&post_id)
        .unwrap_or_default();

    let author = authors.get(&post.user_id).cloned();
    let comments = comments
        .into_iter()
        .map(|comment| {
            let author = authors.get(&comment.user_id).cloned();
            CommentDto::new(comment, author)
        })
        .collect();

    Ok(PostDetailsDto {
        post: PostDto::new(post, author, categories),
        comments,
    })
}

/// Data for the edit form: the post, the full catalog and the linked ids.
pub fn edit_post<R>(post_id: i32, user_id: UserId, repo: &R) -> ServiceResult<EditPostDto>
where
    R: PostReader + CategoryReader + UserReader,
{
    ensure_active_user(user_id, repo)?;
    let post_id = parse_post_id(post_id)?;
    let post = load_post(post_id, repo)?;
    ensure_owner(&post, user_id)?;

    let categories = repo.list_categories().map_err(|e| {
        log::error!("Failed to list categories: {e}");
        ServiceError::from(e)
    })?;

    let selected = repo.list_linked_category_ids(post_id).map_err(|e| {
        log::error!("Failed to list linked categories for post {post_id}: {e}");
        ServiceError::from(e)
    })?;

    let linked = categories
        .iter()
        .filter(|c| selected.contains(&c.id))
        .cloned()
        .collect();

    Ok(EditPostDto {
        post: PostDto::new(post, None, linked),
        categories: categories.into_iter().map(CategoryDto::from).collect(),
        selected_category_ids: selected.into_iter().map(|id| id.get()).collect(),
    })
}

/// Replaces the description, optionally the image, and every category link.
///
/// Links are deleted and recreated as a whole even when the old and new sets
/// overlap. Without a new image the stored one is kept.
pub fn update_post<R, S>(
    post_id: i32,
    user_id: UserId,
    payload: PostFormPayload,
    repo: &R,
    images: &S,
) -> ServiceResult<PostId>
where
    R: PostReader + CategoryReader + PostWriter + UserReader,
    S: ImageStore + ?Sized,
{
    ensure_active_user(user_id, repo)?;
    let post_id = parse_post_id(post_id)?;
    let post = load_post(post_id, repo)?;
    ensure_owner(&post, user_id)?;

    let fields = validate_submission(payload, ImageRequirement::Optional, repo)?;

    let image = match fields.image {
        Some(upload) => Some(images.store(&upload).map_err(|e| {
            log::error!("Failed to store post image: {e}");
            ServiceError::from(e)
        })?),
        None => None,
    };

    let update = PostUpdate {
        description: fields.description,
        image,
        categories: fields.categories,
        updated_at: Utc::now().naive_utc(),
    };

    match repo.update_post(post_id, &update) {
        Ok(0) => {
            if let Some(image) = &update.image {
                images.discard(image);
            }
            Err(ServiceError::not_found("post", post_id))
        }
        Ok(_) => {
            if update.image.is_some() {
                images.discard(&post.image);
            }
            log::info!("User {user_id} updated post {post_id}");
            Ok(post_id)
        }
        Err(e) => {
            log::error!("Failed to update post {post_id}: {e}");
            if let Some(image) = &update.image {
                images.discard(image);
            }
            Err(e.into())
        }
    }
}

/// Permanently removes a post, its category links and its comments.
pub fn delete_post<R, S>(post_id: i32, user_id: UserId, repo: &R, images: &S) -> ServiceResult<()>
where
    R: PostReader + PostWriter + UserReader,
    S: ImageStore + ?Sized,
{
    ensure_active_user(user_id, repo)?;
    let post_id = parse_post_id(post_id)?;
    let post = load_post(post_id, repo)?;
    ensure_owner(&post, user_id)?;

    match repo.delete_post(post_id) {
        Ok(0) => Err(ServiceError::not_found("post", post_id)),
        Ok(_) => {
            images.discard(&post.image);
            log::info!("User {user_id} deleted post {post_id}");
            Ok(())
        }
        Err(e) => {
            log::error!("Failed to delete post {post_id}: {e}");
            Err(e.into())
        }
    }
}
