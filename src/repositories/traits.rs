//! Storage traits implemented by every backend.

use async_trait::async_trait;

use crate::error::AppResult;
use crate::models::{
    Booking, BookingStatus, Comment, Item, ItemRequest, NewBooking, NewComment, NewItem,
    NewItemRequest, NewUser, UpdateItem, UpdateUser, User,
};

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, new_user: NewUser) -> AppResult<User>;

    async fn find_by_id(&self, user_id: i64) -> AppResult<Option<User>>;

    async fn find_by_ids(&self, user_ids: &[i64]) -> AppResult<Vec<User>>;

    /// Exact, case-sensitive match backed by the unique email index.
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// All users in id order.
    async fn list_all(&self) -> AppResult<Vec<User>>;

    async fn update(&self, user_id: i64, changes: UpdateUser) -> AppResult<User>;

    /// Returns the number of removed rows (0 or 1).
    async fn delete(&self, user_id: i64) -> AppResult<usize>;
}

#[async_trait]
pub trait ItemRepository: Send + Sync {
    async fn create(&self, new_item: NewItem) -> AppResult<Item>;

    async fn find_by_id(&self, item_id: i64) -> AppResult<Option<Item>>;

    async fn find_by_ids(&self, item_ids: &[i64]) -> AppResult<Vec<Item>>;

    /// Items of one owner in id order.
    async fn find_by_owner(&self, owner_id: i64) -> AppResult<Vec<Item>>;

    /// Items created in answer to any of the given requests, in id order.
    async fn find_by_request_ids(&self, request_ids: &[i64]) -> AppResult<Vec<Item>>;

    /// Available items whose name or description contains `text`, ignoring case.
    async fn search_available(&self, text: &str) -> AppResult<Vec<Item>>;

    async fn update(&self, item_id: i64, changes: UpdateItem) -> AppResult<Item>;
}

#[async_trait]
pub trait BookingRepository: Send + Sync {
    async fn create(&self, new_booking: NewBooking) -> AppResult<Booking>;

    async fn find_by_id(&self, booking_id: i64) -> AppResult<Option<Booking>>;

    /// Bookings placed by `booker_id`, ascending by start time.
    async fn find_by_booker(
        &self,
        booker_id: i64,
        status: Option<BookingStatus>,
    ) -> AppResult<Vec<Booking>>;

    /// Bookings on items owned by `owner_id`, ascending by start time.
    async fn find_by_item_owner(
        &self,
        owner_id: i64,
        status: Option<BookingStatus>,
    ) -> AppResult<Vec<Booking>>;

    /// Bookings on any of the given items, ascending by start time.
    async fn find_by_items(&self, item_ids: &[i64]) -> AppResult<Vec<Booking>>;

    async fn find_by_item_and_booker(&self, item_id: i64, booker_id: i64)
    -> AppResult<Vec<Booking>>;

    async fn update_status(&self, booking_id: i64, status: BookingStatus) -> AppResult<Booking>;
}

#[async_trait]
pub trait CommentRepository: Send + Sync {
    async fn create(&self, new_comment: NewComment) -> AppResult<Comment>;

    /// Comments on any of the given items in id order.
    async fn find_by_items(&self, item_ids: &[i64]) -> AppResult<Vec<Comment>>;
}

#[async_trait]
pub trait ItemRequestRepository: Send + Sync {
    async fn create(&self, new_request: NewItemRequest) -> AppResult<ItemRequest>;

    async fn find_by_id(&self, request_id: i64) -> AppResult<Option<ItemRequest>>;

    /// Requests filed by `requester_id`, newest first.
    async fn find_by_requester(&self, requester_id: i64) -> AppResult<Vec<ItemRequest>>;

    /// Requests filed by anyone but `requester_id`, newest first.
    async fn find_by_other_requesters(&self, requester_id: i64) -> AppResult<Vec<ItemRequest>>;
}

/// Liveness probe for the backing store.
#[async_trait]
pub trait StoreHealth: Send + Sync {
    fn backend(&self) -> &'static str;

    async fn ping(&self) -> AppResult<()>;
}
