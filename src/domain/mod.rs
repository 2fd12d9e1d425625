pub mod category;
pub mod comment;
pub mod image;
pub mod post;
pub mod types;
pub mod user;
pub mod validation;
