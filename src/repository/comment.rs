use std::collections::HashMap;

use diesel::prelude::*;

use crate::domain::comment::{Comment, CommentPreview, NewComment};
use crate::domain::types::{CommentId, PostId};
use crate::models::comment::{Comment as DbComment, NewComment as DbNewComment};
use crate::repository::{CommentReader, CommentWriter, DieselRepository, RepositoryResult};

impl CommentReader for DieselRepository {
    fn list_comments(&self, post_id: PostId) -> RepositoryResult<Vec<Comment>> {
        use crate::schema::comments;

        let mut conn = self.conn()?;

        let items = comments::table
            .filter(comments::post_id.eq(post_id.get()))
            .order((comments::created_at.asc(), comments::id.asc()))
            .load::<DbComment>(&mut conn)?
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<Comment>, _>>()?;

        Ok(items)
    }

    fn list_comment_previews(
        &self,
        post_ids: &[PostId],
        limit: usize,
    ) -> RepositoryResult<HashMap<PostId, CommentPreview>> {
        use crate::schema::comments;

        if post_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let mut conn = self.conn()?;
        let raw_ids = post_ids.iter().map(|id| id.get()).collect::<Vec<_>>();

        let rows = comments::table
            .filter(comments::post_id.eq_any(raw_ids))
            .order((
                comments::post_id.asc(),
                comments::created_at.asc(),
                comments::id.asc(),
            ))
            .load::<DbComment>(&mut conn)?;

        let mut grouped: HashMap<PostId, CommentPreview> = HashMap::new();
        for row in rows {
            let comment: Comment = row.try_into()?;
            grouped
                .entry(comment.post_id)
                .or_default()
                .push(comment, limit);
        }

        Ok(grouped)
    }

    fn get_comment_by_id(&self, id: CommentId) -> RepositoryResult<Option<Comment>> {
        use crate::schema::comments;

        let mut conn = self.conn()?;

        let comment = comments::table
            .filter(comments::id.eq(id.get()))
            .first::<DbComment>(&mut conn)
            .optional()?;

        let comment = comment.map(TryInto::try_into).transpose()?;
        Ok(comment)
    }
}

impl CommentWriter for DieselRepository {
    fn create_comment(&self, comment: &NewComment) -> RepositoryResult<CommentId> {
        use crate::schema::comments;

        let mut conn = self.conn()?;
        let db_comment = DbNewComment::from(comment);

        let id = diesel::insert_into(comments::table)
            .values(&db_comment)
            .returning(comments::id)
            .get_result::<i32>(&mut conn)?;

        Ok(CommentId::new(id)?)
    }

    fn delete_comment(&self, id: CommentId) -> RepositoryResult<usize> {
        use crate::schema::comments;

        let mut conn = self.conn()?;

        let affected =
            diesel::delete(comments::table.filter(comments::id.eq(id.get()))).execute(&mut conn)?;

        Ok(affected)
    }
}
