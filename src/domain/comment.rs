use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{CommentBody, CommentId, PostId, UserId};

/// A comment left under a post.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Comment {
    pub id: CommentId,
    pub post_id: PostId,
    pub user_id: UserId,
    pub body: CommentBody,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Comment {
    /// Only the author may remove a comment.
    pub fn is_authored_by(&self, user_id: UserId) -> bool {
        self.user_id == user_id
    }
}

/// Data required to insert a new [`Comment`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewComment {
    pub post_id: PostId,
    pub user_id: UserId,
    pub body: CommentBody,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// The oldest comments of a post along with how many it has in total.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommentPreview {
    pub comments: Vec<Comment>,
    pub total: usize,
}

impl CommentPreview {
    /// Counts `comment` and keeps it while fewer than `limit` are held.
    ///
    /// Comments must be pushed oldest first.
    pub fn push(&mut self, comment: Comment, limit: usize) {
        self.total += 1;
        if self.comments.len() < limit {
            self.comments.push(comment);
        }
    }
}
