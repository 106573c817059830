//! Service layer for business logic operations.
//!
//! Services encapsulate business rules and coordinate between
//! repositories and handlers.

mod assembly;
mod booking_service;
mod item_request_service;
mod item_service;
mod user_service;

#[cfg(test)]
pub(crate) mod test_support;

pub use booking_service::BookingService;
pub use item_request_service::ItemRequestService;
pub use item_service::ItemService;
pub use user_service::UserService;

use assembly::DetailsAssembler;
use jiff::civil::DateTime;

use crate::repositories::Repositories;

/// Aggregates all services for convenient access.
///
/// Cloning is cheap since every service only holds `Arc` handles.
#[derive(Clone)]
pub struct Services {
    pub users: UserService,
    pub items: ItemService,
    pub bookings: BookingService,
    pub requests: ItemRequestService,
}

impl Services {
    pub fn new(repos: Repositories) -> Self {
        let assembler = DetailsAssembler::new(
            repos.users.clone(),
            repos.items.clone(),
            repos.bookings.clone(),
            repos.comments.clone(),
        );

        Self {
            users: UserService::new(repos.users.clone()),
            items: ItemService::new(
                repos.users.clone(),
                repos.items.clone(),
                repos.bookings.clone(),
                repos.comments.clone(),
                repos.requests.clone(),
                assembler.clone(),
            ),
            bookings: BookingService::new(
                repos.users.clone(),
                repos.items.clone(),
                repos.bookings.clone(),
                assembler,
            ),
            requests: ItemRequestService::new(repos.users, repos.items, repos.requests),
        }
    }
}

/// Wall-clock time in the server's zone, without the zone.
pub(crate) fn local_now() -> DateTime {
    jiff::Zoned::now().datetime()
}

/// `Some(value)` unless it is missing or only whitespace.
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
