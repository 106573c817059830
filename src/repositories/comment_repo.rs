//! PostgreSQL comment repository.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::db::AsyncDbPool;
use crate::error::{AppError, AppResult};
use crate::models::{Comment, NewComment};
use crate::repositories::traits::CommentRepository;
use crate::schema::comments;

#[derive(Clone)]
pub struct PgCommentRepository {
    pool: AsyncDbPool,
}

impl PgCommentRepository {
    pub fn new(pool: AsyncDbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CommentRepository for PgCommentRepository {
    async fn create(&self, new_comment: NewComment) -> AppResult<Comment> {
        let mut conn = self.pool.get().await?;
        diesel::insert_into(comments::table)
            .values(new_comment)
            .returning(Comment::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(AppError::from)
    }

    /// Comments on any of `item_ids`, oldest first.
    async fn find_by_items(&self, item_ids: &[i64]) -> AppResult<Vec<Comment>> {
        if item_ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut conn = self.pool.get().await?;
        comments::table
            .filter(comments::item_id.eq_any(item_ids))
            .order(comments::id.asc())
            .select(Comment::as_select())
            .load(&mut conn)
            .await
            .map_err(AppError::from)
    }
}
