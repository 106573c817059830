//! Requests for items nobody offers yet.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{AppError, AppResult};
use crate::models::{Item, ItemRequest, ItemRequestDetails, NewItemRequest};
use crate::repositories::{ItemRepository, ItemRequestRepository, UserRepository};
use crate::services::local_now;

/// Item requests, always rendered together with the items offered for them.
#[derive(Clone)]
pub struct ItemRequestService {
    users: Arc<dyn UserRepository>,
    items: Arc<dyn ItemRepository>,
    requests: Arc<dyn ItemRequestRepository>,
}

impl ItemRequestService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        items: Arc<dyn ItemRepository>,
        requests: Arc<dyn ItemRequestRepository>,
    ) -> Self {
        Self {
            users,
            items,
            requests,
        }
    }

    async fn require_user(&self, user_id: i64) -> AppResult<()> {
        match self.users.find_by_id(user_id).await? {
            Some(_) => Ok(()),
            None => Err(AppError::not_found("user", user_id, "User not found.")),
        }
    }

    /// Pairs each request with the items that reference it, keeping order.
    async fn with_items(&self, requests: Vec<ItemRequest>) -> AppResult<Vec<ItemRequestDetails>> {
        if requests.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<i64> = requests.iter().map(|r| r.id).collect();
        let mut by_request: HashMap<i64, Vec<Item>> = HashMap::new();
        for item in self.items.find_by_request_ids(&ids).await? {
            if let Some(request_id) = item.request_id {
                by_request.entry(request_id).or_default().push(item);
            }
        }

        Ok(requests
            .into_iter()
            .map(|request| ItemRequestDetails {
                items: by_request.remove(&request.id).unwrap_or_default(),
                request,
            })
            .collect())
    }

    /// Stores a request stamped with the current local time.
    ///
    /// # Arguments
    /// * `requester_id` - The asking user, who must exist
    /// * `description` - What is needed
    ///
    /// # Returns
    /// The new request with an empty item list
    pub async fn create_request(
        &self,
        requester_id: i64,
        description: String,
    ) -> AppResult<ItemRequestDetails> {
        self.require_user(requester_id).await?;
        let request = self
            .requests
            .create(NewItemRequest {
                description,
                requester_id,
                created: local_now(),
            })
            .await?;
        tracing::info!(request_id = request.id, requester_id, "Item request created");
        Ok(ItemRequestDetails {
            request,
            items: Vec::new(),
        })
    }

    /// The requester's own requests, newest first.
    pub async fn get_requests(&self, requester_id: i64) -> AppResult<Vec<ItemRequestDetails>> {
        self.require_user(requester_id).await?;
        let requests = self.requests.find_by_requester(requester_id).await?;
        self.with_items(requests).await
    }

    /// Everyone else's requests, newest first.
    pub async fn get_requests_from_others(
        &self,
        requester_id: i64,
    ) -> AppResult<Vec<ItemRequestDetails>> {
        self.require_user(requester_id).await?;
        let requests = self.requests.find_by_other_requesters(requester_id).await?;
        self.with_items(requests).await
    }

    /// Gets one request with its items.
    ///
    /// # Returns
    /// The request details, or `NotFound` ("Request not found")
    pub async fn get_request(&self, request_id: i64) -> AppResult<ItemRequestDetails> {
        let request = self
            .requests
            .find_by_id(request_id)
            .await?
            .ok_or_else(|| AppError::not_found("item_request", request_id, "Request not found"))?;
        let mut rendered = self.with_items(vec![request]).await?;
        rendered.pop().ok_or_else(|| AppError::Internal {
            source: anyhow::anyhow!("request vanished while rendering"),
        })
    }
}
