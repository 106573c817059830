//! Read-side aggregates assembled by the services.
//!
//! Entities reference each other by id only; these structs carry the
//! resolved relations a response needs.

use super::{Booking, Comment, Item, ItemRequest, User};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingDetails {
    pub booking: Booking,
    pub item: Item,
    pub booker: User,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentDetails {
    pub comment: Comment,
    pub item: Item,
    pub author: User,
}

/// An item with its comments and nearest bookings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemDetails {
    pub item: Item,
    pub comments: Vec<CommentDetails>,
    pub last_booking: Option<BookingDetails>,
    pub next_booking: Option<BookingDetails>,
}

/// A request together with the items created to fulfil it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemRequestDetails {
    pub request: ItemRequest,
    pub items: Vec<Item>,
}
