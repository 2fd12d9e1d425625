use chrono::NaiveDateTime;
use serde::Serialize;

use crate::domain::user::User;

/// Row of the admin users table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserDto {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub avatar: Option<String>,
    pub role: String,
    pub active: bool,
    pub created_at: NaiveDateTime,
}

impl From<User> for UserDto {
    fn from(value: User) -> Self {
        Self {
            id: value.id.get(),
            active: value.is_active(),
            role: value.role.as_str().to_string(),
            name: value.name.into_inner(),
            email: value.email.as_str().to_string(),
            avatar: value.avatar,
            created_at: value.created_at,
        }
    }
}
