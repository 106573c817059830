//! Item, search and comment handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::api::doc::ITEM_TAG;
use crate::api::dto::{
    CommentResponse, CreateCommentRequest, CreateItemRequest, ErrorResponse, ItemResponse,
    SearchQuery, UpdateItemRequest,
};
use crate::api::middleware::SharerUserId;
use crate::error::AppResult;
use crate::state::AppState;
use crate::utils::validate::ValidatedJson;

/// Routes:
/// - GET /                 - Items of the caller
/// - POST /                - Create item owned by the caller
/// - GET /search?text=     - Search available items
/// - GET /{id}             - Item with comments and bookings
/// - PATCH /{id}           - Owner updates the item
/// - POST /{id}/comment    - Comment on a booked item
pub fn item_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(list_items, create_item))
        .routes(routes!(search_items))
        .routes(routes!(get_item, update_item))
        .routes(routes!(create_comment))
}

#[utoipa::path(
    get,
    path = "/",
    tag = ITEM_TAG,
    params(("X-Sharer-User-Id" = i64, Header, description = "Acting user ID")),
    responses(
        (status = 200, description = "Items owned by the caller", body = Vec<ItemResponse>),
        (status = 404, description = "Unknown user", body = ErrorResponse)
    )
)]
async fn list_items(
    State(state): State<AppState>,
    SharerUserId(owner_id): SharerUserId,
) -> AppResult<Json<Vec<ItemResponse>>> {
    let items = state.services.items.get_items(owner_id).await?;
    Ok(Json(items.into_iter().map(ItemResponse::from).collect()))
}

#[utoipa::path(
    post,
    path = "/",
    tag = ITEM_TAG,
    params(("X-Sharer-User-Id" = i64, Header, description = "Acting user ID")),
    request_body = CreateItemRequest,
    responses(
        (status = 200, description = "Item created", body = ItemResponse),
        (status = 400, description = "Invalid body", body = ErrorResponse),
        (status = 404, description = "Unknown owner", body = ErrorResponse)
    )
)]
async fn create_item(
    State(state): State<AppState>,
    SharerUserId(owner_id): SharerUserId,
    ValidatedJson(payload): ValidatedJson<CreateItemRequest>,
) -> AppResult<Json<ItemResponse>> {
    let item = state
        .services
        .items
        .create_item(payload.into_new_item(owner_id))
        .await?;
    Ok(Json(ItemResponse::from(item)))
}

#[utoipa::path(
    get,
    path = "/search",
    tag = ITEM_TAG,
    params(SearchQuery),
    responses(
        (status = 200, description = "Matching available items", body = Vec<ItemResponse>)
    )
)]
async fn search_items(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> AppResult<Json<Vec<ItemResponse>>> {
    let items = state.services.items.search(&query.text).await?;
    Ok(Json(items.into_iter().map(ItemResponse::from).collect()))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = ITEM_TAG,
    params(("id" = i64, Path, description = "Item ID")),
    responses(
        (status = 200, description = "Item found", body = ItemResponse),
        (status = 404, description = "Item not found", body = ErrorResponse)
    )
)]
async fn get_item(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ItemResponse>> {
    let item = state.services.items.get_item(id).await?;
    Ok(Json(ItemResponse::from(item)))
}

#[utoipa::path(
    patch,
    path = "/{id}",
    tag = ITEM_TAG,
    params(
        ("id" = i64, Path, description = "Item ID"),
        ("X-Sharer-User-Id" = i64, Header, description = "Acting user ID")
    ),
    request_body = UpdateItemRequest,
    responses(
        (status = 200, description = "Item after the update", body = ItemResponse),
        (status = 400, description = "Nothing to update", body = ErrorResponse),
        (status = 404, description = "Unknown item or caller is not the owner", body = ErrorResponse)
    )
)]
async fn update_item(
    State(state): State<AppState>,
    SharerUserId(caller_id): SharerUserId,
    Path(id): Path<i64>,
    ValidatedJson(payload): ValidatedJson<UpdateItemRequest>,
) -> AppResult<Json<ItemResponse>> {
    let item = state
        .services
        .items
        .update_item(id, caller_id, payload.into_update_item())
        .await?;
    Ok(Json(ItemResponse::from(item)))
}

#[utoipa::path(
    post,
    path = "/{id}/comment",
    tag = ITEM_TAG,
    params(
        ("id" = i64, Path, description = "Item ID"),
        ("X-Sharer-User-Id" = i64, Header, description = "Acting user ID")
    ),
    request_body = CreateCommentRequest,
    responses(
        (status = 200, description = "Comment created", body = CommentResponse),
        (status = 400, description = "Booking has not ended yet", body = ErrorResponse),
        (status = 404, description = "Caller never booked the item", body = ErrorResponse)
    )
)]
async fn create_comment(
    State(state): State<AppState>,
    SharerUserId(author_id): SharerUserId,
    Path(id): Path<i64>,
    ValidatedJson(payload): ValidatedJson<CreateCommentRequest>,
) -> AppResult<Json<CommentResponse>> {
    let comment = state
        .services
        .items
        .create_comment(id, author_id, payload.text)
        .await?;
    Ok(Json(CommentResponse::from(comment)))
}
