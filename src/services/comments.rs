use crate::domain::types::{CommentId, PostId, UserId};
use crate::forms::comments::AddCommentFormPayload;
use crate::repository::{CommentReader, CommentWriter, PostReader, UserReader};

use super::posts::{load_post, parse_post_id};
use super::users::ensure_active_user;
use super::{ServiceError, ServiceResult};

/// Adds a comment by `user_id` under an existing post.
pub fn add_comment<R>(
    post_id: i32,
    user_id: UserId,
    payload: AddCommentFormPayload,
    repo: &R,
) -> ServiceResult<CommentId>
where
    R: PostReader + CommentWriter + UserReader,
{
    ensure_active_user(user_id, repo)?;
    let post_id = parse_post_id(post_id)?;
    load_post(post_id, repo)?;

    match repo.create_comment(&payload.into_new_comment(post_id, user_id)) {
        Ok(comment_id) => Ok(comment_id),
        Err(e) => {
            log::error!("Failed to add comment to post {post_id}: {e}");
            Err(e.into())
        }
    }
}

/// Deletes a comment written by `user_id`.
///
/// Returns the post the comment belonged to.
pub fn delete_comment<R>(comment_id: i32, user_id: UserId, repo: &R) -> ServiceResult<PostId>
where
    R: CommentReader + CommentWriter + UserReader,
{
    ensure_active_user(user_id, repo)?;
    let comment_id = CommentId::new(comment_id)
        .map_err(|_| ServiceError::not_found("comment", comment_id))?;

    let comment = match repo.get_comment_by_id(comment_id) {
        Ok(Some(comment)) => comment,
        Ok(None) => return Err(ServiceError::not_found("comment", comment_id)),
        Err(e) => {
            log::error!("Failed to get comment {comment_id}: {e}");
            return Err(e.into());
        }
    };

    if !comment.is_authored_by(user_id) {
        log::warn!("User {user_id} attempted to delete comment {comment_id}");
        return Err(ServiceError::Forbidden);
    }

    match repo.delete_comment(comment_id) {
        Ok(0) => Err(ServiceError::not_found("comment", comment_id)),
        Ok(_) => Ok(comment.post_id),
        Err(e) => {
            log::error!("Failed to delete comment {comment_id}: {e}");
            Err(e.into())
        }
    }
}
