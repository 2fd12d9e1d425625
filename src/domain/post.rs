use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{CategorySelection, PostDescription, PostId, PostImage, UserId};

/// A user-authored post with an image and a description.
///
/// `user_id` is the owner and never changes after creation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Post {
    pub id: PostId,
    pub user_id: UserId,
    pub description: PostDescription,
    pub image: PostImage,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Post {
    /// Ownership guard shared by edit, update and delete.
    pub fn is_owned_by(&self, user_id: UserId) -> bool {
        self.user_id == user_id
    }
}

/// Data required to insert a new [`Post`] together with its category links.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewPost {
    pub user_id: UserId,
    pub description: PostDescription,
    pub image: PostImage,
    pub categories: CategorySelection,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Changes applied to an existing post.
///
/// The category links are always replaced as a whole. When `image` is `None`
/// the stored image is kept.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PostUpdate {
    pub description: PostDescription,
    pub image: Option<PostImage>,
    pub categories: CategorySelection,
    pub updated_at: NaiveDateTime,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;

    #[test]
    fn ownership_guard_compares_owner_id() {
        let post = Post {
            id: PostId::new(1).unwrap(),
            user_id: UserId::new(7).unwrap(),
            description: PostDescription::new("hello").unwrap(),
            image: PostImage::new("data:image/png;base64,AA==").unwrap(),
            created_at: DateTime::from_timestamp(0, 0).unwrap().naive_utc(),
            updated_at: DateTime::from_timestamp(0, 0).unwrap().naive_utc(),
        };

        assert!(post.is_owned_by(UserId::new(7).unwrap()));
        assert!(!post.is_owned_by(UserId::new(8).unwrap()));
    }
}
