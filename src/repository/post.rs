use chrono::NaiveDateTime;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;

use crate::domain::post::{NewPost, Post, PostUpdate};
use crate::domain::types::{CategoryId, PostId};
use crate::models::post::{
    NewCategoryPost, NewPost as DbNewPost, Post as DbPost, PostChanges as DbPostChanges,
};
use crate::repository::{DieselRepository, PostReader, PostWriter, RepositoryResult};

/// Insert one `category_post` row per category.
fn insert_links(
    conn: &mut SqliteConnection,
    post_id: i32,
    category_ids: &[CategoryId],
    created_at: NaiveDateTime,
) -> QueryResult<usize> {
    use crate::schema::category_post;

    let links = category_ids
        .iter()
        .map(|category_id| NewCategoryPost {
            post_id,
            category_id: category_id.get(),
            created_at,
        })
        .collect::<Vec<_>>();

    diesel::insert_into(category_post::table)
        .values(&links)
        .execute(conn)
}

fn delete_links(conn: &mut SqliteConnection, post_id: i32) -> QueryResult<usize> {
    use crate::schema::category_post;

    diesel::delete(category_post::table.filter(category_post::post_id.eq(post_id))).execute(conn)
}

impl PostReader for DieselRepository {
    fn get_post_by_id(&self, id: PostId) -> RepositoryResult<Option<Post>> {
        use crate::schema::posts;

        let mut conn = self.conn()?;

        let post = posts::table
            .filter(posts::id.eq(id.get()))
            .first::<DbPost>(&mut conn)
            .optional()?;

        let post = post.map(TryInto::try_into).transpose()?;
        Ok(post)
    }

    fn list_posts(&self) -> RepositoryResult<Vec<Post>> {
        use crate::schema::posts;

        let mut conn = self.conn()?;

        let posts = posts::table
            .order((posts::created_at.desc(), posts::id.desc()))
            .load::<DbPost>(&mut conn)?
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<Post>, _>>()?;

        Ok(posts)
    }

    fn list_linked_category_ids(&self, post_id: PostId) -> RepositoryResult<Vec<CategoryId>> {
        use crate::schema::category_post;

        let mut conn = self.conn()?;

        let ids = category_post::table
            .filter(category_post::post_id.eq(post_id.get()))
            .order(category_post::category_id.asc())
            .select(category_post::category_id)
            .load::<i32>(&mut conn)?
            .into_iter()
            .map(CategoryId::new)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ids)
    }
}

impl PostWriter for DieselRepository {
    fn create_post(&self, post: &NewPost) -> RepositoryResult<PostId> {
        use crate::schema::posts;

        let mut conn = self.conn()?;
        let db_post = DbNewPost::from(post);

        let id = conn.transaction(|conn| {
            let id = diesel::insert_into(posts::table)
                .values(&db_post)
                .returning(posts::id)
                .get_result::<i32>(conn)?;

            insert_links(conn, id, post.categories.as_slice(), post.created_at)?;

            QueryResult::Ok(id)
        })?;

        Ok(PostId::new(id)?)
    }

    fn update_post(&self, id: PostId, update: &PostUpdate) -> RepositoryResult<usize> {
        use crate::schema::posts;

        let mut conn = self.conn()?;
        let changes = DbPostChanges::from(update);

        let affected = conn.transaction(|conn| {
            let affected = diesel::update(posts::table.filter(posts::id.eq(id.get())))
                .set(&changes)
                .execute(conn)?;

            if affected == 0 {
                return QueryResult::Ok(0);
            }

            // Full replace: links are recreated even when the sets overlap.
            delete_links(conn, id.get())?;
            insert_links(
                conn,
                id.get(),
                update.categories.as_slice(),
                update.updated_at,
            )?;

            Ok(affected)
        })?;

        Ok(affected)
    }

    fn delete_post(&self, id: PostId) -> RepositoryResult<usize> {
        use crate::schema::{comments, posts};

        let mut conn = self.conn()?;

        let affected = conn.transaction(|conn| {
            diesel::delete(comments::table.filter(comments::post_id.eq(id.get()))).execute(conn)?;
            delete_links(conn, id.get())?;
            diesel::delete(posts::table.filter(posts::id.eq(id.get()))).execute(conn)
        })?;

        Ok(affected)
    }
}
