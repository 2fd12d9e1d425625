use chrono::Utc;
use diesel::prelude::*;

use crate::domain::types::UserId;
use crate::domain::user::User;
use crate::models::user::User as DbUser;
use crate::repository::{DieselRepository, RepositoryResult, UserListQuery, UserReader, UserWriter};

/// `LIKE` pattern matching `search` literally anywhere in the value.
fn contains_pattern(search: &str) -> String {
    let mut pattern = String::with_capacity(search.len() + 2);
    pattern.push('%');
    for ch in search.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

impl UserReader for DieselRepository {
    fn get_user_by_id(&self, id: UserId) -> RepositoryResult<Option<User>> {
        use crate::schema::users;

        let mut conn = self.conn()?;

        let user = users::table
            .filter(users::id.eq(id.get()))
            .first::<DbUser>(&mut conn)
            .optional()?;

        let user = user.map(TryInto::try_into).transpose()?;
        Ok(user)
    }

    fn get_users_by_ids(&self, ids: &[UserId]) -> RepositoryResult<Vec<User>> {
        use crate::schema::users;

        if ids.is_empty() {
            return Ok(vec![]);
        }

        let mut conn = self.conn()?;
        let raw_ids = ids.iter().map(|id| id.get()).collect::<Vec<_>>();

        let items = users::table
            .filter(users::id.eq_any(raw_ids))
            .load::<DbUser>(&mut conn)?
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<User>, _>>()?;

        Ok(items)
    }

    fn list_users(&self, query: UserListQuery) -> RepositoryResult<Vec<User>> {
        use crate::schema::users;

        let mut conn = self.conn()?;

        let mut items = users::table.into_boxed::<diesel::sqlite::Sqlite>();

        // SQLite LIKE is case-insensitive for ASCII.
        if let Some(search) = query
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
        {
            items = items.filter(users::name.like(contains_pattern(search)).escape('\\'));
        }

        let items = items
            .order((users::name.asc(), users::id.asc()))
            .load::<DbUser>(&mut conn)?
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<User>, _>>()?;

        Ok(items)
    }
}

impl UserWriter for DieselRepository {
    fn set_user_active(&self, id: UserId, active: bool) -> RepositoryResult<usize> {
        use crate::schema::users;

        let mut conn = self.conn()?;
        let now = Utc::now().naive_utc();
        let deleted_at = if active { None } else { Some(now) };

        let affected = diesel::update(users::table.filter(users::id.eq(id.get())))
            .set((users::deleted_at.eq(deleted_at), users::updated_at.eq(now)))
            .execute(&mut conn)?;

        Ok(affected)
    }
}
