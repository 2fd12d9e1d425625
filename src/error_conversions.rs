//! Error conversion glue between layers.
//!
//! The domain layer must not depend on service/repository error types, so the
//! conversions live here instead of next to the error definitions.

use crate::domain::types::TypeConstraintError;
use crate::repository::RepositoryError;

#[cfg(feature = "server")]
use crate::domain::validation::FieldErrors;
#[cfg(feature = "server")]
use crate::images::ImageStoreError;
#[cfg(feature = "server")]
use crate::services::ServiceError;

impl From<TypeConstraintError> for RepositoryError {
    fn from(val: TypeConstraintError) -> Self {
        RepositoryError::ValidationError(val.to_string())
    }
}

#[cfg(feature = "server")]
impl From<TypeConstraintError> for ServiceError {
    fn from(val: TypeConstraintError) -> Self {
        ServiceError::Validation(FieldErrors::from(val))
    }
}

#[cfg(feature = "server")]
impl From<FieldErrors> for ServiceError {
    fn from(val: FieldErrors) -> Self {
        ServiceError::Validation(val)
    }
}

#[cfg(feature = "server")]
impl From<RepositoryError> for ServiceError {
    fn from(val: RepositoryError) -> Self {
        ServiceError::Persistence(val.to_string())
    }
}

#[cfg(feature = "server")]
impl From<ImageStoreError> for ServiceError {
    fn from(val: ImageStoreError) -> Self {
        ServiceError::Persistence(val.to_string())
    }
}
