use utoipa::OpenApi;

pub const USER_TAG: &str = "Users";
pub const ITEM_TAG: &str = "Items";
pub const BOOKING_TAG: &str = "Bookings";
pub const REQUEST_TAG: &str = "Requests";
pub const HEALTH_TAG: &str = "Health";

#[derive(OpenApi)]
#[openapi(
    info(
        title = "ShareIt",
        description = "Item sharing service: lend items, book them and ask for missing ones",
    ),
    components(
        schemas(
            crate::api::dto::ErrorResponse,
            crate::error::ValidationFieldError,
            crate::models::BookingStatus,
        )
    ),
    tags(
        (name = USER_TAG, description = "User registration and profiles"),
        (name = ITEM_TAG, description = "Items, search and comments"),
        (name = BOOKING_TAG, description = "Booking lifecycle"),
        (name = REQUEST_TAG, description = "Requests for items nobody offers yet"),
        (name = HEALTH_TAG, description = "Liveness"),
    )
)]
pub struct ApiDoc;
