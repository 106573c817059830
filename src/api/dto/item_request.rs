//! Item request DTOs.

use jiff::civil::DateTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::models::{Item, ItemRequestDetails};
use crate::utils::validate::not_blank;

#[derive(Debug, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateItemRequestRequest {
    #[validate(custom(function = "not_blank"))]
    #[schema(example = "Looking for a ladder for the weekend")]
    pub description: String,
}

/// Item offered in answer to a request.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RequestedItemResponse {
    pub id: i64,
    pub name: String,
    pub owner_id: i64,
}

impl From<Item> for RequestedItemResponse {
    fn from(item: Item) -> Self {
        Self {
            id: item.id,
            name: item.name,
            owner_id: item.owner_id,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ItemRequestResponse {
    pub id: i64,
    pub description: String,
    pub requester_id: i64,
    #[schema(value_type = String, format = DateTime)]
    pub created: DateTime,
    pub items: Vec<RequestedItemResponse>,
}

impl From<ItemRequestDetails> for ItemRequestResponse {
    fn from(details: ItemRequestDetails) -> Self {
        Self {
            id: details.request.id,
            description: details.request.description,
            requester_id: details.request.requester_id,
            created: details.request.created,
            items: details
                .items
                .into_iter()
                .map(RequestedItemResponse::from)
                .collect(),
        }
    }
}
