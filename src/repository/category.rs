use std::collections::HashMap;

use diesel::prelude::*;

use crate::domain::category::Category;
use crate::domain::types::{CategoryId, PostId};
use crate::models::category::Category as DbCategory;
use crate::repository::{CategoryReader, DieselRepository, RepositoryResult};

impl CategoryReader for DieselRepository {
    fn list_categories(&self) -> RepositoryResult<Vec<Category>> {
        use crate::schema::categories;

        let mut conn = self.conn()?;

        let items = categories::table
            .order(categories::name.asc())
            .load::<DbCategory>(&mut conn)?
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<Category>, _>>()?;

        Ok(items)
    }

    fn get_categories_by_ids(&self, ids: &[CategoryId]) -> RepositoryResult<Vec<Category>> {
        use crate::schema::categories;

        if ids.is_empty() {
            return Ok(vec![]);
        }

        let mut conn = self.conn()?;
        let raw_ids = ids.iter().map(|id| id.get()).collect::<Vec<_>>();

        let items = categories::table
            .filter(categories::id.eq_any(raw_ids))
            .order(categories::name.asc())
            .load::<DbCategory>(&mut conn)?
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<Category>, _>>()?;

        Ok(items)
    }

    fn list_categories_for_posts(
        &self,
        post_ids: &[PostId],
    ) -> RepositoryResult<HashMap<PostId, Vec<Category>>> {
        use crate::schema::{categories, category_post};

        if post_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let mut conn = self.conn()?;
        let raw_ids = post_ids.iter().map(|id| id.get()).collect::<Vec<_>>();

        let rows = category_post::table
            .inner_join(categories::table)
            .filter(category_post::post_id.eq_any(raw_ids))
            .order((category_post::post_id.asc(), categories::name.asc()))
            .select((category_post::post_id, categories::all_columns))
            .load::<(i32, DbCategory)>(&mut conn)?;

        let mut grouped: HashMap<PostId, Vec<Category>> = HashMap::new();
        for (post_id, category) in rows {
            grouped
                .entry(PostId::new(post_id)?)
                .or_default()
                .push(category.try_into()?);
        }

        Ok(grouped)
    }
}
