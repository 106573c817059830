//! Repository layer for data access operations.
//!
//! Each entity has a storage trait (see [`traits`]) with a PostgreSQL
//! implementation on top of diesel_async and an in-process implementation
//! in [`memory`]. Services only ever see the traits.

mod booking_repo;
mod comment_repo;
mod item_repo;
mod item_request_repo;
pub mod memory;
pub mod traits;
mod user_repo;

use std::sync::Arc;

use async_trait::async_trait;
use diesel_async::RunQueryDsl;

pub use booking_repo::PgBookingRepository;
pub use comment_repo::PgCommentRepository;
pub use item_repo::PgItemRepository;
pub use item_request_repo::PgItemRequestRepository;
pub use memory::InMemoryStore;
pub use traits::{
    BookingRepository, CommentRepository, ItemRepository, ItemRequestRepository, StoreHealth,
    UserRepository,
};
pub use user_repo::PgUserRepository;

use crate::db::AsyncDbPool;
use crate::error::{AppError, AppResult};

/// Aggregates all repositories for convenient access.
///
/// Every handle is an `Arc`, so cloning is cheap.
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub items: Arc<dyn ItemRepository>,
    pub bookings: Arc<dyn BookingRepository>,
    pub comments: Arc<dyn CommentRepository>,
    pub requests: Arc<dyn ItemRequestRepository>,
    pub health: Arc<dyn StoreHealth>,
}

impl Repositories {
    /// Repositories backed by PostgreSQL through the given pool.
    pub fn postgres(pool: AsyncDbPool) -> Self {
        Self {
            users: Arc::new(PgUserRepository::new(pool.clone())),
            items: Arc::new(PgItemRepository::new(pool.clone())),
            bookings: Arc::new(PgBookingRepository::new(pool.clone())),
            comments: Arc::new(PgCommentRepository::new(pool.clone())),
            requests: Arc::new(PgItemRequestRepository::new(pool.clone())),
            health: Arc::new(PgHealth { pool }),
        }
    }

    /// Repositories sharing one process-local store. Data is lost on exit.
    pub fn in_memory() -> Self {
        let store = Arc::new(InMemoryStore::new());
        Self {
            users: store.clone(),
            items: store.clone(),
            bookings: store.clone(),
            comments: store.clone(),
            requests: store.clone(),
            health: store,
        }
    }
}

struct PgHealth {
    pool: AsyncDbPool,
}

#[async_trait]
impl StoreHealth for PgHealth {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn ping(&self) -> AppResult<()> {
        let mut conn = self.pool.get().await?;
        diesel::sql_query("SELECT 1")
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|e| AppError::Database {
                operation: "health check".to_string(),
                source: anyhow::Error::from(e),
            })
    }
}
