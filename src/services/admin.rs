use crate::domain::types::UserId;
use crate::domain::user::User;
use crate::dto::users::UserDto;
use crate::repository::{UserListQuery, UserReader, UserWriter};

use super::users::ensure_active_user;
use super::{ServiceError, ServiceResult};

/// Loads the requesting user and checks the `admin` role.
fn require_admin<R>(user_id: UserId, repo: &R) -> ServiceResult<User>
where
    R: UserReader,
{
    let user = ensure_active_user(user_id, repo)?;
    if user.is_admin() {
        Ok(user)
    } else {
        Err(ServiceError::Forbidden)
    }
}

/// Users for the admin page, optionally filtered by name.
pub fn show_users<R>(
    admin_id: UserId,
    search: Option<&str>,
    repo: &R,
) -> ServiceResult<Vec<UserDto>>
where
    R: UserReader,
{
    require_admin(admin_id, repo)?;

    let query = match search {
        Some(search) => UserListQuery::default().search(search),
        None => UserListQuery::default(),
    };

    match repo.list_users(query) {
        Ok(users) => Ok(users.into_iter().map(UserDto::from).collect()),
        Err(e) => {
            log::error!("Failed to list users: {e}");
            Err(e.into())
        }
    }
}

fn set_user_active<R>(admin_id: UserId, user_id: i32, active: bool, repo: &R) -> ServiceResult<()>
where
    R: UserReader + UserWriter,
{
    require_admin(admin_id, repo)?;

    let user_id = UserId::new(user_id).map_err(|_| ServiceError::not_found("user", user_id))?;
    if user_id == admin_id {
        return Err(ServiceError::Forbidden);
    }

    match repo.set_user_active(user_id, active) {
        Ok(0) => Err(ServiceError::not_found("user", user_id)),
        Ok(_) => {
            log::info!("Admin {admin_id} set user {user_id} active={active}");
            Ok(())
        }
        Err(e) => {
            log::error!("Failed to update user {user_id}: {e}");
            Err(e.into())
        }
    }
}

/// Marks the user as deleted; their content stays in place.
pub fn deactivate_user<R>(admin_id: UserId, user_id: i32, repo: &R) -> ServiceResult<()>
where
    R: UserReader + UserWriter,
{
    set_user_active(admin_id, user_id, false, repo)
}

pub fn activate_user<R>(admin_id: UserId, user_id: i32, repo: &R) -> ServiceResult<()>
where
    R: UserReader + UserWriter,
{
    set_user_active(admin_id, user_id, true, repo)
}
