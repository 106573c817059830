use std::str::FromStr;

use diesel::prelude::*;
use diesel_derive_enum::DbEnum;
use jiff::civil::DateTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::AppError;

/// Lifecycle status of a booking.
///
/// A booking starts as `Waiting` and is moved to `Approved` or `Rejected` by
/// the item owner. `Canceled` is only ever read, never written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, DbEnum, ToSchema)]
#[db_enum(existing_type_path = "crate::schema::sql_types::BookingStatus")]
#[serde(rename_all = "UPPERCASE")]
pub enum BookingStatus {
    Waiting,
    Approved,
    Rejected,
    Canceled,
}

/// Filter accepted by the booking listing endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BookingState {
    #[default]
    All,
    Current,
    Past,
    Future,
    Rejected,
}

impl BookingState {
    /// Status a booking must have to pass this filter. `None` keeps everything.
    pub fn status_filter(self) -> Option<BookingStatus> {
        match self {
            BookingState::All => None,
            BookingState::Current => Some(BookingStatus::Approved),
            BookingState::Past => Some(BookingStatus::Canceled),
            BookingState::Future => Some(BookingStatus::Waiting),
            BookingState::Rejected => Some(BookingStatus::Rejected),
        }
    }

    /// Parse an optional `state` query value; absent means [`BookingState::All`].
    pub fn from_query(state: Option<&str>) -> Result<Self, AppError> {
        state
            .map(str::parse::<Self>)
            .transpose()
            .map(Option::unwrap_or_default)
    }
}

impl FromStr for BookingState {
    type Err = AppError;

    // Literals are matched exactly; "current" is not "CURRENT".
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ALL" => Ok(BookingState::All),
            "CURRENT" => Ok(BookingState::Current),
            "PAST" => Ok(BookingState::Past),
            "FUTURE" => Ok(BookingState::Future),
            "REJECTED" => Ok(BookingState::Rejected),
            _ => Err(AppError::BadRequest {
                message: "Invalid state".to_string(),
            }),
        }
    }
}

#[derive(Debug, Queryable, Selectable, Clone, PartialEq, Eq)]
#[diesel(table_name = crate::schema::bookings)]
pub struct Booking {
    pub id: i64,
    #[diesel(column_name = start_time, deserialize_as = jiff_diesel::DateTime)]
    pub start: DateTime,
    #[diesel(column_name = end_time, deserialize_as = jiff_diesel::DateTime)]
    pub end: DateTime,
    pub item_id: i64,
    pub booker_id: i64,
    pub status: BookingStatus,
}

#[derive(Debug, Insertable, Clone)]
#[diesel(table_name = crate::schema::bookings)]
pub struct NewBooking {
    #[diesel(column_name = start_time, serialize_as = jiff_diesel::DateTime)]
    pub start: DateTime,
    #[diesel(column_name = end_time, serialize_as = jiff_diesel::DateTime)]
    pub end: DateTime,
    pub item_id: i64,
    pub booker_id: i64,
    pub status: BookingStatus,
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_state_literals() {
        assert_eq!("ALL".parse::<BookingState>().unwrap(), BookingState::All);
        assert_eq!("CURRENT".parse::<BookingState>().unwrap(), BookingState::Current);
        assert_eq!("PAST".parse::<BookingState>().unwrap(), BookingState::Past);
        assert_eq!("FUTURE".parse::<BookingState>().unwrap(), BookingState::Future);
        assert_eq!("REJECTED".parse::<BookingState>().unwrap(), BookingState::Rejected);
    }

    #[test]
    fn test_state_is_case_sensitive() {
        match "current".parse::<BookingState>() {
            Err(AppError::BadRequest { message }) => assert_eq!(message, "Invalid state"),
            other => panic!("Expected BadRequest, got {:?}", other),
        }
        assert!("WAITING".parse::<BookingState>().is_err());
    }

    #[test]
    fn test_state_status_mapping() {
        assert_eq!(BookingState::All.status_filter(), None);
        assert_eq!(BookingState::Current.status_filter(), Some(BookingStatus::Approved));
        assert_eq!(BookingState::Past.status_filter(), Some(BookingStatus::Canceled));
        assert_eq!(BookingState::Future.status_filter(), Some(BookingStatus::Waiting));
        assert_eq!(BookingState::Rejected.status_filter(), Some(BookingStatus::Rejected));
    }

    #[test]
    fn test_missing_query_state_means_all() {
        assert_eq!(BookingState::from_query(None).unwrap(), BookingState::All);
        assert_eq!(
            BookingState::from_query(Some("FUTURE")).unwrap(),
            BookingState::Future
        );
        assert!(BookingState::from_query(Some("")).is_err());
    }

    #[test]
    fn test_status_serializes_uppercase() {
        let json = serde_json::to_string(&BookingStatus::Waiting).unwrap();
        assert_eq!(json, "\"WAITING\"");
        let status: BookingStatus = serde_json::from_str("\"CANCELED\"").unwrap();
        assert_eq!(status, BookingStatus::Canceled);
    }

    proptest! {
        #[test]
        fn prop_unknown_literals_rejected(s in "[a-z]{0,12}") {
            prop_assert!(s.parse::<BookingState>().is_err());
        }
    }
}
