use crate::domain::types::UserId;
use crate::domain::user::User;
use crate::repository::UserReader;

use super::{ServiceError, ServiceResult};

/// Loads the acting user; unknown and deactivated accounts are unauthorized.
pub fn ensure_active_user<R>(user_id: UserId, repo: &R) -> ServiceResult<User>
where
    R: UserReader,
{
    match repo.get_user_by_id(user_id) {
        Ok(Some(user)) if user.is_active() => Ok(user),
        Ok(Some(_)) => {
            log::warn!("Deactivated user {user_id} attempted a request");
            Err(ServiceError::Unauthorized)
        }
        Ok(None) => {
            log::warn!("Session refers to unknown user {user_id}");
            Err(ServiceError::Unauthorized)
        }
        Err(e) => {
            log::error!("Failed to get user {user_id}: {e}");
            Err(e.into())
        }
    }
}
