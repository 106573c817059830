//! PostgreSQL user repository.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::db::AsyncDbPool;
use crate::error::{AppError, AppResult};
use crate::models::{NewUser, UpdateUser, User};
use crate::repositories::traits::UserRepository;

/// Since `AsyncDbPool` (bb8::Pool) internally uses `Arc`, cloning is cheap.
#[derive(Clone)]
pub struct PgUserRepository {
    pool: AsyncDbPool,
}

impl PgUserRepository {
    /// Creates a new PgUserRepository with the given connection pool.
    pub fn new(pool: AsyncDbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    /// Inserts a user.
    ///
    /// # Arguments
    /// * `new_user` - Name and email to store
    ///
    /// # Returns
    /// The stored user with its generated id. A taken email surfaces as
    /// `Duplicate` through the `users_email_key` constraint.
    async fn create(&self, new_user: NewUser) -> AppResult<User> {
        use crate::schema::users::dsl::*;

        let mut conn = self.pool.get().await?;
        diesel::insert_into(users)
            .values(&new_user)
            .returning(User::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(AppError::from)
    }

    /// Finds a user by id.
    ///
    /// # Returns
    /// `Some(User)` if found, `None` otherwise
    async fn find_by_id(&self, user_id: i64) -> AppResult<Option<User>> {
        use crate::schema::users::dsl::*;

        let mut conn = self.pool.get().await?;
        users
            .filter(id.eq(user_id))
            .select(User::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(AppError::from)
    }

    async fn find_by_ids(&self, user_ids: &[i64]) -> AppResult<Vec<User>> {
        use crate::schema::users::dsl::*;

        if user_ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut conn = self.pool.get().await?;
        users
            .filter(id.eq_any(user_ids))
            .select(User::as_select())
            .load(&mut conn)
            .await
            .map_err(AppError::from)
    }

    /// Finds a user by exact email, using the unique index.
    ///
    /// # Arguments
    /// * `user_email` - The email address to look up
    ///
    /// # Returns
    /// `Some(User)` if found, `None` otherwise
    async fn find_by_email(&self, user_email: &str) -> AppResult<Option<User>> {
        use crate::schema::users::dsl::*;

        let mut conn = self.pool.get().await?;
        users
            .filter(email.eq(user_email))
            .select(User::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(AppError::from)
    }

    async fn list_all(&self) -> AppResult<Vec<User>> {
        use crate::schema::users::dsl::*;

        let mut conn = self.pool.get().await?;
        users
            .order(id.asc())
            .select(User::as_select())
            .load(&mut conn)
            .await
            .map_err(AppError::from)
    }

    /// Writes the set fields of `changes`; unset fields keep their values.
    ///
    /// # Arguments
    /// * `user_id` - The user to change
    /// * `changes` - Fields to overwrite
    ///
    /// # Returns
    /// The user as stored after the update
    async fn update(&self, user_id: i64, changes: UpdateUser) -> AppResult<User> {
        use crate::schema::users::dsl::*;

        let mut conn = self.pool.get().await?;
        diesel::update(users.filter(id.eq(user_id)))
            .set(&changes)
            .returning(User::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(AppError::from)
    }

    /// # Returns
    /// The number of deleted rows, 0 or 1
    async fn delete(&self, user_id: i64) -> AppResult<usize> {
        use crate::schema::users::dsl::*;

        let mut conn = self.pool.get().await?;
        diesel::delete(users.filter(id.eq(user_id)))
            .execute(&mut conn)
            .await
            .map_err(AppError::from)
    }
}
