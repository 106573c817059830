use jiff::civil::DateTime;
use jiff::{Span, ToSpan};

use crate::models::{BookingStatus, Item, NewBooking, NewItem, User};
use crate::repositories::Repositories;
use crate::services::{Services, local_now};

pub(crate) fn services() -> Services {
    fixture().0
}

/// Services plus the repositories behind them, for seeding rows the
/// services never write (such as canceled bookings).
pub(crate) fn fixture() -> (Services, Repositories) {
    let repos = Repositories::in_memory();
    (Services::new(repos.clone()), repos)
}

pub(crate) async fn user(services: &Services, name: &str) -> User {
    services
        .users
        .create_user(Some(name.to_string()), Some(format!("{}@example.com", name.to_lowercase())))
        .await
        .expect("create user")
}

pub(crate) async fn item(services: &Services, owner: &User, name: &str, available: bool) -> Item {
    services
        .items
        .create_item(NewItem {
            name: name.to_string(),
            description: Some(format!("{} for rent", name)),
            available,
            owner_id: owner.id,
            request_id: None,
        })
        .await
        .expect("create item")
        .item
}

/// Now shifted by `hours`; negative values land in the past.
pub(crate) fn hours_from_now(hours: i64) -> DateTime {
    let span: Span = hours.hours();
    local_now().checked_add(span).expect("time in range")
}

/// Inserts a booking with any status, bypassing the booking rules.
pub(crate) async fn seed_booking(
    repos: &Repositories,
    item: &Item,
    booker: &User,
    from_hours: i64,
    to_hours: i64,
    status: BookingStatus,
) -> i64 {
    repos
        .bookings
        .create(NewBooking {
            start: hours_from_now(from_hours),
            end: hours_from_now(to_hours),
            item_id: item.id,
            booker_id: booker.id,
            status,
        })
        .await
        .expect("seed booking")
        .id
}
