//! Booking DTOs.

use jiff::civil::DateTime;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::api::dto::{ItemShortResponse, UserResponse};
use crate::models::{BookingDetails, BookingStatus};

/// Start and end are optional in the body; the service rejects missing ones.
#[derive(Debug, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    pub item_id: i64,
    #[schema(value_type = Option<String>, format = DateTime, example = "2030-01-01T10:00:00")]
    pub start: Option<DateTime>,
    #[schema(value_type = Option<String>, format = DateTime, example = "2030-01-02T10:00:00")]
    pub end: Option<DateTime>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct StateQuery {
    /// ALL, CURRENT, PAST, FUTURE or REJECTED. Defaults to ALL.
    pub state: Option<String>,
}

impl StateQuery {
    pub fn state(&self) -> Option<&str> {
        self.state.as_deref()
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ApprovalQuery {
    /// `true` approves, `false` rejects
    pub approved: bool,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookingResponse {
    pub id: i64,
    #[schema(value_type = String, format = DateTime)]
    pub start: DateTime,
    #[schema(value_type = String, format = DateTime)]
    pub end: DateTime,
    pub item: ItemShortResponse,
    pub booker: UserResponse,
    pub status: BookingStatus,
}

impl From<BookingDetails> for BookingResponse {
    fn from(details: BookingDetails) -> Self {
        Self {
            id: details.booking.id,
            start: details.booking.start,
            end: details.booking.end,
            item: details.item.into(),
            booker: details.booker.into(),
            status: details.booking.status,
        }
    }
}
