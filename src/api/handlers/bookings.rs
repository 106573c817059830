//! Booking handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::api::doc::BOOKING_TAG;
use crate::api::dto::{
    ApprovalQuery, BookingResponse, CreateBookingRequest, ErrorResponse, StateQuery,
};
use crate::api::middleware::SharerUserId;
use crate::error::AppResult;
use crate::state::AppState;
use crate::utils::validate::ValidatedJson;

/// Routes:
/// - GET /?state=          - Bookings placed by the caller
/// - POST /                - Book an item
/// - GET /owner?state=     - Bookings on the caller's items
/// - GET /{id}             - Booking seen by booker or owner
/// - PATCH /{id}?approved= - Owner approves or rejects
pub fn booking_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(list_bookings, create_booking))
        .routes(routes!(list_owner_bookings))
        .routes(routes!(get_booking, decide_booking))
}

fn render(bookings: Vec<crate::models::BookingDetails>) -> Json<Vec<BookingResponse>> {
    Json(bookings.into_iter().map(BookingResponse::from).collect())
}

#[utoipa::path(
    get,
    path = "/",
    tag = BOOKING_TAG,
    params(
        ("X-Sharer-User-Id" = i64, Header, description = "Acting user ID"),
        StateQuery
    ),
    responses(
        (status = 200, description = "Bookings by start time", body = Vec<BookingResponse>),
        (status = 400, description = "Unknown state", body = ErrorResponse),
        (status = 404, description = "Unknown user", body = ErrorResponse)
    )
)]
async fn list_bookings(
    State(state): State<AppState>,
    SharerUserId(user_id): SharerUserId,
    Query(query): Query<StateQuery>,
) -> AppResult<Json<Vec<BookingResponse>>> {
    let bookings = state
        .services
        .bookings
        .get_user_bookings(user_id, query.state())
        .await?;
    Ok(render(bookings))
}

#[utoipa::path(
    post,
    path = "/",
    tag = BOOKING_TAG,
    params(("X-Sharer-User-Id" = i64, Header, description = "Acting user ID")),
    request_body = CreateBookingRequest,
    responses(
        (status = 200, description = "Booking created in WAITING status", body = BookingResponse),
        (status = 400, description = "Bad dates or unavailable item", body = ErrorResponse),
        (status = 404, description = "Unknown user or item", body = ErrorResponse)
    )
)]
async fn create_booking(
    State(state): State<AppState>,
    SharerUserId(booker_id): SharerUserId,
    ValidatedJson(payload): ValidatedJson<CreateBookingRequest>,
) -> AppResult<Json<BookingResponse>> {
    let booking = state
        .services
        .bookings
        .create_booking(booker_id, payload.item_id, payload.start, payload.end)
        .await?;
    Ok(Json(BookingResponse::from(booking)))
}

#[utoipa::path(
    get,
    path = "/owner",
    tag = BOOKING_TAG,
    params(
        ("X-Sharer-User-Id" = i64, Header, description = "Acting user ID"),
        StateQuery
    ),
    responses(
        (status = 200, description = "Bookings on the caller's items", body = Vec<BookingResponse>),
        (status = 400, description = "Unknown state", body = ErrorResponse),
        (status = 404, description = "Unknown user", body = ErrorResponse)
    )
)]
async fn list_owner_bookings(
    State(state): State<AppState>,
    SharerUserId(owner_id): SharerUserId,
    Query(query): Query<StateQuery>,
) -> AppResult<Json<Vec<BookingResponse>>> {
    let bookings = state
        .services
        .bookings
        .get_owner_bookings(owner_id, query.state())
        .await?;
    Ok(render(bookings))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = BOOKING_TAG,
    params(
        ("id" = i64, Path, description = "Booking ID"),
        ("X-Sharer-User-Id" = i64, Header, description = "Acting user ID")
    ),
    responses(
        (status = 200, description = "Booking found", body = BookingResponse),
        (status = 400, description = "Caller is neither booker nor owner", body = ErrorResponse),
        (status = 404, description = "Booking not found", body = ErrorResponse)
    )
)]
async fn get_booking(
    State(state): State<AppState>,
    SharerUserId(caller_id): SharerUserId,
    Path(id): Path<i64>,
) -> AppResult<Json<BookingResponse>> {
    let booking = state.services.bookings.get_booking(id, caller_id).await?;
    Ok(Json(BookingResponse::from(booking)))
}

#[utoipa::path(
    patch,
    path = "/{id}",
    tag = BOOKING_TAG,
    params(
        ("id" = i64, Path, description = "Booking ID"),
        ("X-Sharer-User-Id" = i64, Header, description = "Acting user ID"),
        ApprovalQuery
    ),
    responses(
        (status = 200, description = "Booking with its new status", body = BookingResponse),
        (status = 400, description = "Caller does not own the item", body = ErrorResponse),
        (status = 404, description = "Booking not found", body = ErrorResponse)
    )
)]
async fn decide_booking(
    State(state): State<AppState>,
    SharerUserId(caller_id): SharerUserId,
    Path(id): Path<i64>,
    Query(query): Query<ApprovalQuery>,
) -> AppResult<Json<BookingResponse>> {
    let booking = state
        .services
        .bookings
        .approve_or_reject(id, caller_id, query.approved)
        .await?;
    Ok(Json(BookingResponse::from(booking)))
}
