use thiserror::Error;

use crate::domain::validation::FieldErrors;

/// Failures reported by service functions.
///
/// The route layer decides what the user sees: validation errors re-render the
/// form, `Forbidden` redirects, `Unauthorized` and `NotFound` become 401 and
/// 404, and `Persistence` a generic error page.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ServiceError {
    /// One or more submitted fields were rejected.
    #[error("validation failed: {0}")]
    Validation(FieldErrors),
    /// The requested entity does not exist.
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i32 },
    /// The session belongs to an unknown or deactivated account.
    #[error("unauthorized")]
    Unauthorized,
    /// The requesting user may not perform the operation.
    #[error("forbidden")]
    Forbidden,
    /// The store rejected the write; nothing was persisted.
    #[error("persistence failure: {0}")]
    Persistence(String),
}

impl ServiceError {
    pub fn not_found(entity: &'static str, id: impl Into<i32>) -> Self {
        Self::NotFound {
            entity,
            id: id.into(),
        }
    }
}

/// Convenient alias for results returned from service functions.
pub type ServiceResult<T> = Result<T, ServiceError>;
