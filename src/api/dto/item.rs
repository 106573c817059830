//! Item and comment DTOs.

use jiff::civil::DateTime;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::api::dto::BookingResponse;
use crate::models::{CommentDetails, Item, ItemDetails, NewItem, UpdateItem};
use crate::utils::validate::not_blank;

#[derive(Debug, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateItemRequest {
    #[validate(custom(function = "not_blank"))]
    #[schema(example = "Cordless drill")]
    pub name: String,
    #[schema(example = "18V, two batteries")]
    pub description: Option<String>,
    pub available: bool,
    /// Request this item answers, if any
    pub request_id: Option<i64>,
}

impl CreateItemRequest {
    pub fn into_new_item(self, owner_id: i64) -> NewItem {
        NewItem {
            name: self.name,
            description: self.description,
            available: self.available,
            owner_id,
            request_id: self.request_id,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateItemRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub available: Option<bool>,
}

impl UpdateItemRequest {
    pub fn into_update_item(self) -> UpdateItem {
        UpdateItem {
            name: self.name,
            description: self.description,
            available: self.available,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentRequest {
    #[validate(custom(function = "not_blank"))]
    #[schema(example = "Worked great")]
    pub text: String,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchQuery {
    /// Case-insensitive text to look for in name and description
    #[serde(default)]
    pub text: String,
}

/// Compact item view embedded in bookings and comments.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ItemShortResponse {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
}

impl From<Item> for ItemShortResponse {
    fn from(item: Item) -> Self {
        Self {
            id: item.id,
            name: item.name,
            description: item.description,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CommentResponse {
    pub id: i64,
    pub text: String,
    pub item: ItemShortResponse,
    pub author_name: String,
    #[schema(value_type = String, format = DateTime, example = "2024-01-01T10:00:00")]
    pub created: DateTime,
}

impl From<CommentDetails> for CommentResponse {
    fn from(details: CommentDetails) -> Self {
        Self {
            id: details.comment.id,
            text: details.comment.text,
            item: details.item.into(),
            author_name: details.author.name,
            created: details.comment.created,
        }
    }
}

/// Item with its comments and nearest bookings.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ItemResponse {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub available: bool,
    pub owner_id: i64,
    pub request_id: Option<i64>,
    pub comments: Vec<CommentResponse>,
    pub last_booking: Option<BookingResponse>,
    pub next_booking: Option<BookingResponse>,
}

impl From<ItemDetails> for ItemResponse {
    fn from(details: ItemDetails) -> Self {
        let ItemDetails {
            item,
            comments,
            last_booking,
            next_booking,
        } = details;
        Self {
            id: item.id,
            name: item.name,
            description: item.description,
            available: item.available,
            owner_id: item.owner_id,
            request_id: item.request_id,
            comments: comments.into_iter().map(CommentResponse::from).collect(),
            last_booking: last_booking.map(BookingResponse::from),
            next_booking: next_booking.map(BookingResponse::from),
        }
    }
}
