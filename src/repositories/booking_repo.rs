//! PostgreSQL booking repository.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::db::AsyncDbPool;
use crate::error::{AppError, AppResult};
use crate::models::{Booking, BookingStatus, NewBooking};
use crate::repositories::traits::BookingRepository;
use crate::schema::{bookings, items};

#[derive(Clone)]
pub struct PgBookingRepository {
    pool: AsyncDbPool,
}

impl PgBookingRepository {
    /// Creates a new PgBookingRepository with the given connection pool.
    pub fn new(pool: AsyncDbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookingRepository for PgBookingRepository {
    async fn create(&self, new_booking: NewBooking) -> AppResult<Booking> {
        let mut conn = self.pool.get().await?;
        diesel::insert_into(bookings::table)
            .values(new_booking)
            .returning(Booking::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(AppError::from)
    }

    async fn find_by_id(&self, booking_id: i64) -> AppResult<Option<Booking>> {
        let mut conn = self.pool.get().await?;
        bookings::table
            .find(booking_id)
            .select(Booking::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(AppError::from)
    }

    /// Bookings placed by one user.
    ///
    /// # Arguments
    /// * `booker_id` - The booker
    /// * `status` - Restricts the result to one status when set
    ///
    /// # Returns
    /// Bookings ordered by start time, then id
    async fn find_by_booker(
        &self,
        booker_id: i64,
        status: Option<BookingStatus>,
    ) -> AppResult<Vec<Booking>> {
        let mut conn = self.pool.get().await?;
        let mut query = bookings::table
            .filter(bookings::booker_id.eq(booker_id))
            .into_boxed();
        if let Some(status) = status {
            query = query.filter(bookings::status.eq(status));
        }
        query
            .order((bookings::start_time.asc(), bookings::id.asc()))
            .select(Booking::as_select())
            .load(&mut conn)
            .await
            .map_err(AppError::from)
    }

    /// Same as `find_by_booker`, but selects by the owner of the booked item.
    async fn find_by_item_owner(
        &self,
        owner_id: i64,
        status: Option<BookingStatus>,
    ) -> AppResult<Vec<Booking>> {
        let mut conn = self.pool.get().await?;
        let mut query = bookings::table
            .inner_join(items::table)
            .filter(items::owner_id.eq(owner_id))
            .into_boxed();
        if let Some(status) = status {
            query = query.filter(bookings::status.eq(status));
        }
        query
            .order((bookings::start_time.asc(), bookings::id.asc()))
            .select(Booking::as_select())
            .load(&mut conn)
            .await
            .map_err(AppError::from)
    }

    async fn find_by_items(&self, item_ids: &[i64]) -> AppResult<Vec<Booking>> {
        if item_ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut conn = self.pool.get().await?;
        bookings::table
            .filter(bookings::item_id.eq_any(item_ids))
            .order((bookings::start_time.asc(), bookings::id.asc()))
            .select(Booking::as_select())
            .load(&mut conn)
            .await
            .map_err(AppError::from)
    }

    async fn find_by_item_and_booker(
        &self,
        item_id: i64,
        booker_id: i64,
    ) -> AppResult<Vec<Booking>> {
        let mut conn = self.pool.get().await?;
        bookings::table
            .filter(bookings::item_id.eq(item_id))
            .filter(bookings::booker_id.eq(booker_id))
            .order(bookings::id.asc())
            .select(Booking::as_select())
            .load(&mut conn)
            .await
            .map_err(AppError::from)
    }

    /// # Returns
    /// The booking with its new status, or `NotFound` when no row matched
    async fn update_status(&self, booking_id: i64, status: BookingStatus) -> AppResult<Booking> {
        let mut conn = self.pool.get().await?;
        diesel::update(bookings::table.find(booking_id))
            .set(bookings::status.eq(status))
            .returning(Booking::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(AppError::from)
    }
}
