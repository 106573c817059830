//! PostgreSQL item request repository.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::db::AsyncDbPool;
use crate::error::{AppError, AppResult};
use crate::models::{ItemRequest, NewItemRequest};
use crate::repositories::traits::ItemRequestRepository;
use crate::schema::item_requests;

/// Item request storage over the shared connection pool.
#[derive(Clone)]
pub struct PgItemRequestRepository {
    pool: AsyncDbPool,
}

impl PgItemRequestRepository {
    pub fn new(pool: AsyncDbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ItemRequestRepository for PgItemRequestRepository {
    async fn create(&self, new_request: NewItemRequest) -> AppResult<ItemRequest> {
        let mut conn = self.pool.get().await?;
        diesel::insert_into(item_requests::table)
            .values(new_request)
            .returning(ItemRequest::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(AppError::from)
    }

    async fn find_by_id(&self, request_id: i64) -> AppResult<Option<ItemRequest>> {
        let mut conn = self.pool.get().await?;
        item_requests::table
            .find(request_id)
            .select(ItemRequest::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(AppError::from)
    }

    /// Requests made by `requester_id`.
    ///
    /// # Returns
    /// The requests, newest first
    async fn find_by_requester(&self, requester_id: i64) -> AppResult<Vec<ItemRequest>> {
        let mut conn = self.pool.get().await?;
        item_requests::table
            .filter(item_requests::requester_id.eq(requester_id))
            .order((item_requests::created_time.desc(), item_requests::id.desc()))
            .select(ItemRequest::as_select())
            .load(&mut conn)
            .await
            .map_err(AppError::from)
    }

    /// Requests made by anyone except `requester_id`.
    ///
    /// # Arguments
    /// * `requester_id` - The user whose own requests are excluded
    ///
    /// # Returns
    /// The requests, newest first
    async fn find_by_other_requesters(&self, requester_id: i64) -> AppResult<Vec<ItemRequest>> {
        let mut conn = self.pool.get().await?;
        item_requests::table
            .filter(item_requests::requester_id.ne(requester_id))
            .order((item_requests::created_time.desc(), item_requests::id.desc()))
            .select(ItemRequest::as_select())
            .load(&mut conn)
            .await
            .map_err(AppError::from)
    }
}
