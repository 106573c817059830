//! Booking lifecycle: request, owner decision and listings.

use std::sync::Arc;

use jiff::civil::DateTime;

use crate::error::{AppError, AppResult};
use crate::models::{BookingDetails, BookingState, BookingStatus, Item, NewBooking};
use crate::repositories::{BookingRepository, ItemRepository, UserRepository};
use crate::services::assembly::DetailsAssembler;

#[derive(Clone)]
pub struct BookingService {
    users: Arc<dyn UserRepository>,
    items: Arc<dyn ItemRepository>,
    bookings: Arc<dyn BookingRepository>,
    assembler: DetailsAssembler,
}

impl BookingService {
    pub(crate) fn new(
        users: Arc<dyn UserRepository>,
        items: Arc<dyn ItemRepository>,
        bookings: Arc<dyn BookingRepository>,
        assembler: DetailsAssembler,
    ) -> Self {
        Self {
            users,
            items,
            bookings,
            assembler,
        }
    }

    async fn require_user(&self, user_id: i64) -> AppResult<()> {
        match self.users.find_by_id(user_id).await? {
            Some(_) => Ok(()),
            None => Err(AppError::not_found("user", user_id, "User not found.")),
        }
    }

    async fn require_item(&self, item_id: i64) -> AppResult<Item> {
        self.items
            .find_by_id(item_id)
            .await?
            .ok_or_else(|| AppError::not_found("item", item_id, "Item not found"))
    }

    async fn require_booking(&self, booking_id: i64) -> AppResult<BookingDetails> {
        let booking = self
            .bookings
            .find_by_id(booking_id)
            .await?
            .ok_or_else(|| AppError::not_found("booking", booking_id, "Booking not found"))?;
        self.assembler.booking(booking).await
    }

    /// Places a `Waiting` booking on an available item.
    ///
    /// # Arguments
    /// * `booker_id` - The user placing the booking
    /// * `item_id` - The item to book
    /// * `start` - Local start time, required
    /// * `end` - Local end time, required and after `start`
    ///
    /// # Returns
    /// The new booking with its item and booker. Missing or inverted dates
    /// and unavailable items are a `BadRequest`.
    pub async fn create_booking(
        &self,
        booker_id: i64,
        item_id: i64,
        start: Option<DateTime>,
        end: Option<DateTime>,
    ) -> AppResult<BookingDetails> {
        let (Some(start), Some(end)) = (start, end) else {
            return Err(AppError::bad_request("Start and end should be set"));
        };
        if start >= end {
            return Err(AppError::bad_request("Start date cannot be after end date"));
        }

        self.require_user(booker_id).await?;
        let item = self.require_item(item_id).await?;
        if !item.available {
            tracing::debug!(item_id, booker_id, "Booking rejected, item unavailable");
            return Err(AppError::bad_request("Item is not available"));
        }

        let booking = self
            .bookings
            .create(NewBooking {
                start,
                end,
                item_id,
                booker_id,
                status: BookingStatus::Waiting,
            })
            .await?;
        tracing::info!(booking_id = booking.id, item_id, booker_id, "Booking created");
        self.assembler.booking(booking).await
    }

    /// Owner's decision on a booking. Repeated decisions overwrite the status.
    ///
    /// # Arguments
    /// * `booking_id` - The booking to decide on
    /// * `caller_id` - Must own the booked item
    /// * `approved` - `true` approves, `false` rejects
    pub async fn approve_or_reject(
        &self,
        booking_id: i64,
        caller_id: i64,
        approved: bool,
    ) -> AppResult<BookingDetails> {
        let current = self.require_booking(booking_id).await?;
        if current.item.owner_id != caller_id {
            tracing::warn!(booking_id, caller_id, "Booking decision by non-owner");
            return Err(AppError::bad_request("You are not owner of this booking"));
        }

        let status = if approved {
            BookingStatus::Approved
        } else {
            BookingStatus::Rejected
        };
        let booking = self.bookings.update_status(booking_id, status).await?;
        tracing::info!(booking_id, status = ?status, "Booking status changed");

        Ok(BookingDetails { booking, ..current })
    }

    /// Visible only to the booker and the item's owner.
    pub async fn get_booking(&self, booking_id: i64, caller_id: i64) -> AppResult<BookingDetails> {
        let details = self.require_booking(booking_id).await?;
        if details.booking.booker_id != caller_id && details.item.owner_id != caller_id {
            return Err(AppError::bad_request("Booking is not owned by the user"));
        }
        Ok(details)
    }

    /// Bookings placed by the user, ascending by start.
    ///
    /// # Arguments
    /// * `user_id` - The booker
    /// * `state` - Raw `state` query value; `None` means `ALL`
    ///
    /// # Returns
    /// The matching bookings, or `BadRequest` ("Invalid state") for an
    /// unknown state
    pub async fn get_user_bookings(
        &self,
        user_id: i64,
        state: Option<&str>,
    ) -> AppResult<Vec<BookingDetails>> {
        self.require_user(user_id).await?;
        let state = BookingState::from_query(state)?;
        let bookings = self
            .bookings
            .find_by_booker(user_id, state.status_filter())
            .await?;
        self.assembler.bookings(bookings).await
    }

    /// Bookings on items the user owns, ascending by start.
    pub async fn get_owner_bookings(
        &self,
        user_id: i64,
        state: Option<&str>,
    ) -> AppResult<Vec<BookingDetails>> {
        self.require_user(user_id).await?;
        let state = BookingState::from_query(state)?;
        let bookings = self
            .bookings
            .find_by_item_owner(user_id, state.status_filter())
            .await?;
        self.assembler.bookings(bookings).await
    }
}
