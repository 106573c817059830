//! Domain models shared by the storage backends and the service layer.

mod booking;
mod comment;
mod details;
mod item;
mod item_request;
mod user;

pub use booking::{Booking, BookingState, BookingStatus, NewBooking};
pub use comment::{Comment, NewComment};
pub use details::{BookingDetails, CommentDetails, ItemDetails, ItemRequestDetails};
pub use item::{Item, NewItem, UpdateItem};
pub use item_request::{ItemRequest, NewItemRequest};
pub use user::{NewUser, UpdateUser, User};
