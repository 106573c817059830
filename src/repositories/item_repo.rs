//! PostgreSQL item repository.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::db::AsyncDbPool;
use crate::error::{AppError, AppResult};
use crate::models::{Item, NewItem, UpdateItem};
use crate::repositories::traits::ItemRepository;

/// Item storage. Cloning shares the pool.
#[derive(Clone)]
pub struct PgItemRepository {
    pool: AsyncDbPool,
}

impl PgItemRepository {
    pub fn new(pool: AsyncDbPool) -> Self {
        Self { pool }
    }
}

/// Escapes LIKE wildcards so user text is matched literally.
fn like_pattern(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len() + 2);
    escaped.push('%');
    for ch in text.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped.push('%');
    escaped
}

#[async_trait]
impl ItemRepository for PgItemRepository {
    async fn create(&self, new_item: NewItem) -> AppResult<Item> {
        use crate::schema::items::dsl::*;

        let mut conn = self.pool.get().await?;
        diesel::insert_into(items)
            .values(&new_item)
            .returning(Item::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(AppError::from)
    }

    async fn find_by_id(&self, item_id: i64) -> AppResult<Option<Item>> {
        use crate::schema::items::dsl::*;

        let mut conn = self.pool.get().await?;
        items
            .filter(id.eq(item_id))
            .select(Item::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(AppError::from)
    }

    async fn find_by_ids(&self, item_ids: &[i64]) -> AppResult<Vec<Item>> {
        use crate::schema::items::dsl::*;

        if item_ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut conn = self.pool.get().await?;
        items
            .filter(id.eq_any(item_ids))
            .select(Item::as_select())
            .load(&mut conn)
            .await
            .map_err(AppError::from)
    }

    /// Items of one owner, ascending by id.
    async fn find_by_owner(&self, owner: i64) -> AppResult<Vec<Item>> {
        use crate::schema::items::dsl::*;

        let mut conn = self.pool.get().await?;
        items
            .filter(owner_id.eq(owner))
            .order(id.asc())
            .select(Item::as_select())
            .load(&mut conn)
            .await
            .map_err(AppError::from)
    }

    /// Items offered in answer to any of `request_ids`.
    ///
    /// # Arguments
    /// * `request_ids` - Request ids; an empty slice skips the query
    ///
    /// # Returns
    /// The matching items ascending by id
    async fn find_by_request_ids(&self, request_ids: &[i64]) -> AppResult<Vec<Item>> {
        use crate::schema::items::dsl::*;

        if request_ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut conn = self.pool.get().await?;
        items
            .filter(request_id.eq_any(request_ids))
            .order(id.asc())
            .select(Item::as_select())
            .load(&mut conn)
            .await
            .map_err(AppError::from)
    }

    /// Case-insensitive substring search over name and description.
    ///
    /// # Arguments
    /// * `text` - Search text; `%` and `_` are matched literally
    ///
    /// # Returns
    /// Available items only, ascending by id
    async fn search_available(&self, text: &str) -> AppResult<Vec<Item>> {
        use crate::schema::items::dsl::*;

        let pattern = like_pattern(text);
        let mut conn = self.pool.get().await?;
        items
            .filter(available.eq(true))
            .filter(name.ilike(pattern.clone()).or(description.ilike(pattern)))
            .order(id.asc())
            .select(Item::as_select())
            .load(&mut conn)
            .await
            .map_err(AppError::from)
    }

    async fn update(&self, item_id: i64, changes: UpdateItem) -> AppResult<Item> {
        use crate::schema::items::dsl::*;

        let mut conn = self.pool.get().await?;
        diesel::update(items.filter(id.eq(item_id)))
            .set(&changes)
            .returning(Item::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(AppError::from)
    }
}
