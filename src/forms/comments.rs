use chrono::Utc;
use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::comment::NewComment;
use crate::domain::types::{CommentBody, PostId, TypeConstraintError, UserId};

#[derive(Deserialize, Validate)]
pub struct AddCommentForm {
    #[validate(length(min = 1, max = 150))]
    pub body: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AddCommentFormPayload {
    pub body: CommentBody,
}

impl AddCommentFormPayload {
    pub fn into_new_comment(self, post_id: PostId, user_id: UserId) -> NewComment {
        let now = Utc::now().naive_utc();
        NewComment {
            post_id,
            user_id,
            body: self.body,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Error)]
pub enum AddCommentFormError {
    #[error("Comment validation failed: {0}")]
    Validation(String),
    #[error("Comment contains invalid data: {0}")]
    TypeConstraint(String),
}

impl From<ValidationErrors> for AddCommentFormError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<TypeConstraintError> for AddCommentFormError {
    fn from(value: TypeConstraintError) -> Self {
        Self::TypeConstraint(value.to_string())
    }
}

impl TryFrom<AddCommentForm> for AddCommentFormPayload {
    type Error = AddCommentFormError;

    fn try_from(value: AddCommentForm) -> Result<Self, Self::Error> {
        value.validate()?;
        Ok(Self {
            body: CommentBody::new(value.body)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_comment_within_limit() {
        let payload = AddCommentFormPayload::try_from(AddCommentForm {
            body: " great photo ".into(),
        })
        .unwrap();
        assert_eq!(payload.body.as_str(), "great photo");
    }

    #[test]
    fn rejects_empty_comment() {
        let err = AddCommentFormPayload::try_from(AddCommentForm {
            body: String::new(),
        })
        .unwrap_err();
        assert!(matches!(err, AddCommentFormError::Validation(_)));
    }

    #[test]
    fn rejects_whitespace_comment() {
        let err = AddCommentFormPayload::try_from(AddCommentForm { body: "   ".into() })
            .unwrap_err();
        assert!(matches!(err, AddCommentFormError::TypeConstraint(_)));
    }

    #[test]
    fn rejects_long_comment() {
        let err = AddCommentFormPayload::try_from(AddCommentForm {
            body: "x".repeat(151),
        })
        .unwrap_err();
        assert!(matches!(err, AddCommentFormError::Validation(_)));
    }
}
