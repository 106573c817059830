//! Data Transfer Objects for API requests and responses.
//!
//! JSON bodies use camelCase field names throughout.

mod booking;
mod error;
mod health;
mod item;
mod item_request;
mod user;

pub use booking::{ApprovalQuery, BookingResponse, CreateBookingRequest, StateQuery};
pub use error::ErrorResponse;
pub use health::{HealthResponse, HealthStatus};
pub use item::{
    CommentResponse, CreateCommentRequest, CreateItemRequest, ItemResponse, ItemShortResponse,
    SearchQuery, UpdateItemRequest,
};
pub use item_request::{CreateItemRequestRequest, ItemRequestResponse, RequestedItemResponse};
pub use user::{CreateUserRequest, UpdateUserRequest, UserResponse};
