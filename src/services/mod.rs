pub mod admin;
pub mod comments;
pub mod errors;
pub mod posts;
pub mod users;

pub use errors::{ServiceError, ServiceResult};
