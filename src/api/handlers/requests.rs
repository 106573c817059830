//! Item request handlers.

use axum::{
    Json,
    extract::{Path, State},
};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::api::doc::REQUEST_TAG;
use crate::api::dto::{CreateItemRequestRequest, ErrorResponse, ItemRequestResponse};
use crate::api::middleware::SharerUserId;
use crate::error::AppResult;
use crate::state::AppState;
use crate::utils::validate::ValidatedJson;

/// Routes:
/// - GET /        - Caller's requests, newest first
/// - POST /       - File a request
/// - GET /all     - Everyone else's requests, newest first
/// - GET /{id}    - One request with its offered items
pub fn request_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(list_own_requests, create_request))
        .routes(routes!(list_other_requests))
        .routes(routes!(get_request))
}

#[utoipa::path(
    get,
    path = "/",
    tag = REQUEST_TAG,
    params(("X-Sharer-User-Id" = i64, Header, description = "Acting user ID")),
    responses(
        (status = 200, description = "Caller's requests", body = Vec<ItemRequestResponse>),
        (status = 404, description = "Unknown user", body = ErrorResponse)
    )
)]
async fn list_own_requests(
    State(state): State<AppState>,
    SharerUserId(user_id): SharerUserId,
) -> AppResult<Json<Vec<ItemRequestResponse>>> {
    let requests = state.services.requests.get_requests(user_id).await?;
    Ok(Json(requests.into_iter().map(ItemRequestResponse::from).collect()))
}

#[utoipa::path(
    post,
    path = "/",
    tag = REQUEST_TAG,
    params(("X-Sharer-User-Id" = i64, Header, description = "Acting user ID")),
    request_body = CreateItemRequestRequest,
    responses(
        (status = 200, description = "Request created", body = ItemRequestResponse),
        (status = 400, description = "Blank description", body = ErrorResponse),
        (status = 404, description = "Unknown user", body = ErrorResponse)
    )
)]
async fn create_request(
    State(state): State<AppState>,
    SharerUserId(user_id): SharerUserId,
    ValidatedJson(payload): ValidatedJson<CreateItemRequestRequest>,
) -> AppResult<Json<ItemRequestResponse>> {
    let request = state
        .services
        .requests
        .create_request(user_id, payload.description)
        .await?;
    Ok(Json(ItemRequestResponse::from(request)))
}

#[utoipa::path(
    get,
    path = "/all",
    tag = REQUEST_TAG,
    params(("X-Sharer-User-Id" = i64, Header, description = "Acting user ID")),
    responses(
        (status = 200, description = "Requests filed by other users", body = Vec<ItemRequestResponse>),
        (status = 404, description = "Unknown user", body = ErrorResponse)
    )
)]
async fn list_other_requests(
    State(state): State<AppState>,
    SharerUserId(user_id): SharerUserId,
) -> AppResult<Json<Vec<ItemRequestResponse>>> {
    let requests = state
        .services
        .requests
        .get_requests_from_others(user_id)
        .await?;
    Ok(Json(requests.into_iter().map(ItemRequestResponse::from).collect()))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = REQUEST_TAG,
    params(("id" = i64, Path, description = "Request ID")),
    responses(
        (status = 200, description = "Request found", body = ItemRequestResponse),
        (status = 404, description = "Request not found", body = ErrorResponse)
    )
)]
async fn get_request(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ItemRequestResponse>> {
    let request = state.services.requests.get_request(id).await?;
    Ok(Json(ItemRequestResponse::from(request)))
}
