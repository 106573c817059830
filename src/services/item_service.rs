//! Item listing, search and comments.

use std::sync::Arc;

use crate::error::{AppError, AppResult};
use crate::models::{CommentDetails, Item, ItemDetails, NewComment, NewItem, UpdateItem, User};
use crate::repositories::{
    BookingRepository, CommentRepository, ItemRepository, ItemRequestRepository, UserRepository,
};
use crate::services::assembly::DetailsAssembler;
use crate::services::{local_now, non_blank};

/// Item operations, each answering with fully assembled [`ItemDetails`].
#[derive(Clone)]
pub struct ItemService {
    users: Arc<dyn UserRepository>,
    items: Arc<dyn ItemRepository>,
    bookings: Arc<dyn BookingRepository>,
    comments: Arc<dyn CommentRepository>,
    requests: Arc<dyn ItemRequestRepository>,
    assembler: DetailsAssembler,
}

impl ItemService {
    pub(crate) fn new(
        users: Arc<dyn UserRepository>,
        items: Arc<dyn ItemRepository>,
        bookings: Arc<dyn BookingRepository>,
        comments: Arc<dyn CommentRepository>,
        requests: Arc<dyn ItemRequestRepository>,
        assembler: DetailsAssembler,
    ) -> Self {
        Self {
            users,
            items,
            bookings,
            comments,
            requests,
            assembler,
        }
    }

    async fn require_user(&self, user_id: i64) -> AppResult<User> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::not_found("user", user_id, "User not found."))
    }

    async fn require_item(&self, item_id: i64) -> AppResult<Item> {
        self.items
            .find_by_id(item_id)
            .await?
            .ok_or_else(|| AppError::not_found("item", item_id, "Item not found"))
    }

    /// Gets an item with its comments and last/next bookings.
    ///
    /// # Arguments
    /// * `item_id` - The item's id
    ///
    /// # Returns
    /// The item details, or `NotFound` ("Item not found")
    pub async fn get_item(&self, item_id: i64) -> AppResult<ItemDetails> {
        let item = self.require_item(item_id).await?;
        self.assembler.item(item).await
    }

    /// Lists the items owned by `owner_id`, who must exist.
    pub async fn get_items(&self, owner_id: i64) -> AppResult<Vec<ItemDetails>> {
        self.require_user(owner_id).await?;
        let items = self.items.find_by_owner(owner_id).await?;
        self.assembler.items(items).await
    }

    /// Stores a new item. A `request_id` that matches no request is dropped.
    pub async fn create_item(&self, mut new_item: NewItem) -> AppResult<ItemDetails> {
        self.require_user(new_item.owner_id).await?;

        if let Some(request_id) = new_item.request_id {
            if self.requests.find_by_id(request_id).await?.is_none() {
                tracing::debug!(request_id, "Ignoring unknown request reference");
                new_item.request_id = None;
            }
        }

        let item = self.items.create(new_item).await?;
        tracing::info!(item_id = item.id, owner_id = item.owner_id, "Item created");
        self.assembler.item(item).await
    }

    /// Applies the fields of `patch` that are set, non-blank and different.
    ///
    /// # Arguments
    /// * `item_id` - The item to change
    /// * `requester_id` - The caller, who must own the item
    /// * `patch` - Name, description and availability, all optional
    ///
    /// # Returns
    /// The item details after the change. A missing item or a foreign owner
    /// yields `NotFound`, an all-empty patch `BadRequest`.
    pub async fn update_item(
        &self,
        item_id: i64,
        requester_id: i64,
        patch: UpdateItem,
    ) -> AppResult<ItemDetails> {
        let item = self.require_item(item_id).await?;
        if item.owner_id != requester_id {
            tracing::warn!(item_id, requester_id, "Item update by non-owner");
            return Err(AppError::not_found("item", item_id, "Wrong owner id"));
        }
        if patch.is_empty() {
            return Err(AppError::bad_request("No fields to update provided."));
        }

        let changes = UpdateItem {
            name: non_blank(patch.name).filter(|n| *n != item.name),
            description: non_blank(patch.description)
                .filter(|d| item.description.as_deref() != Some(d.as_str())),
            available: patch.available.filter(|a| *a != item.available),
        };

        let item = if changes.is_empty() {
            item
        } else {
            let updated = self.items.update(item_id, changes).await?;
            tracing::info!(item_id, "Item updated");
            updated
        };
        self.assembler.item(item).await
    }

    /// Available items mentioning `text`. Blank text finds nothing.
    pub async fn search(&self, text: &str) -> AppResult<Vec<ItemDetails>> {
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }
        let items = self.items.search_available(text).await?;
        self.assembler.items(items).await
    }

    /// Adds a comment from a user who has booked the item.
    ///
    /// The author's booking with the earliest end decides eligibility: a
    /// booking that has not ended yet is rejected.
    ///
    /// # Returns
    /// The comment with its item and author
    pub async fn create_comment(
        &self,
        item_id: i64,
        author_id: i64,
        text: String,
    ) -> AppResult<CommentDetails> {
        let booking = self
            .bookings
            .find_by_item_and_booker(item_id, author_id)
            .await?
            .into_iter()
            .min_by_key(|b| b.end)
            .ok_or_else(|| AppError::not_found("booking", item_id, "Booking not found"))?;

        let now = local_now();
        if booking.end > now {
            tracing::debug!(booking_id = booking.id, "Comment rejected, booking still running");
            return Err(AppError::bad_request("Booking is ending date"));
        }

        let author = self.require_user(author_id).await?;
        let item = self.require_item(item_id).await?;

        let comment = self
            .comments
            .create(NewComment {
                text,
                item_id,
                author_id,
                created: now,
            })
            .await?;
        tracing::info!(comment_id = comment.id, item_id, author_id, "Comment created");

        Ok(CommentDetails {
            comment,
            item,
            author,
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::error::AppError;
    use crate::models::{BookingStatus, NewItem, UpdateItem};
    use crate::services::test_support::{fixture, item, seed_booking, services, user};

    #[tokio::test]
    async fn test_create_item_requires_known_owner() {
        let services = services();
        let err = services
            .items
            .create_item(NewItem {
                name: "Drill".to_string(),
                description: None,
                available: true,
                owner_id: 99,
                request_id: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_unknown_request_reference_is_dropped() {
        let services = services();
        let owner = user(&services, "Olga").await;
        let created = services
            .items
            .create_item(NewItem {
                name: "Tent".to_string(),
                description: Some("Four person tent".to_string()),
                available: true,
                owner_id: owner.id,
                request_id: Some(12345),
            })
            .await
            .unwrap();
        assert_eq!(created.item.request_id, None);
        assert!(created.comments.is_empty());
        assert!(created.last_booking.is_none());
        assert!(created.next_booking.is_none());
    }

    #[tokio::test]
    async fn test_update_checks_owner_then_fields() {
        let services = services();
        let owner = user(&services, "Olga").await;
        let other = user(&services, "Bob").await;
        let drill = item(&services, &owner, "Drill", true).await;

        let patch = UpdateItem {
            available: Some(false),
            ..Default::default()
        };
        match services.items.update_item(drill.id, other.id, patch.clone()).await {
            Err(AppError::NotFound { message, .. }) => assert_eq!(message, "Wrong owner id"),
            other => panic!("Expected NotFound, got {:?}", other),
        }

        match services
            .items
            .update_item(drill.id, owner.id, UpdateItem::default())
            .await
        {
            Err(AppError::BadRequest { message }) => {
                assert_eq!(message, "No fields to update provided.")
            }
            other => panic!("Expected BadRequest, got {:?}", other),
        }

        let updated = services.items.update_item(drill.id, owner.id, patch).await.unwrap();
        assert!(!updated.item.available);
        assert_eq!(updated.item.name, "Drill");
    }

    #[tokio::test]
    async fn test_update_ignores_blank_fields() {
        let services = services();
        let owner = user(&services, "Olga").await;
        let drill = item(&services, &owner, "Drill", true).await;

        let updated = services
            .items
            .update_item(
                drill.id,
                owner.id,
                UpdateItem {
                    name: Some("   ".to_string()),
                    description: Some("Hammer drill".to_string()),
                    available: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.item.name, "Drill");
        assert_eq!(updated.item.description.as_deref(), Some("Hammer drill"));
    }

    #[tokio::test]
    async fn test_search_skips_blank_and_unavailable() {
        let services = services();
        let owner = user(&services, "Olga").await;
        item(&services, &owner, "Drill", true).await;
        item(&services, &owner, "Broken drill", false).await;

        assert!(services.items.search("").await.unwrap().is_empty());
        assert!(services.items.search("   ").await.unwrap().is_empty());

        let found = services.items.search("DRILL").await.unwrap();
        assert_eq!(found.len(), 1);
        assert!(found.iter().all(|d| d.item.available));
    }

    #[tokio::test]
    async fn test_get_items_of_unknown_owner() {
        let services = services();
        assert!(matches!(
            services.items.get_items(7).await,
            Err(AppError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_last_and_next_use_rejected_and_waiting() {
        let (services, repos) = fixture();
        let owner = user(&services, "Olga").await;
        let booker = user(&services, "Bob").await;
        let drill = item(&services, &owner, "Drill", true).await;

        seed_booking(&repos, &drill, &booker, 1, 2, BookingStatus::Approved).await;
        seed_booking(&repos, &drill, &booker, 3, 4, BookingStatus::Rejected).await;
        let latest_rejected =
            seed_booking(&repos, &drill, &booker, 5, 6, BookingStatus::Rejected).await;
        let earliest_waiting =
            seed_booking(&repos, &drill, &booker, 7, 8, BookingStatus::Waiting).await;
        seed_booking(&repos, &drill, &booker, 9, 10, BookingStatus::Waiting).await;

        let details = services.items.get_item(drill.id).await.unwrap();
        assert_eq!(details.last_booking.unwrap().booking.id, latest_rejected);
        assert_eq!(details.next_booking.unwrap().booking.id, earliest_waiting);
    }

    #[tokio::test]
    async fn test_comment_requires_finished_booking() {
        let (services, repos) = fixture();
        let owner = user(&services, "Olga").await;
        let booker = user(&services, "Bob").await;
        let drill = item(&services, &owner, "Drill", true).await;

        match services
            .items
            .create_comment(drill.id, booker.id, "Great".to_string())
            .await
        {
            Err(AppError::NotFound { message, .. }) => assert_eq!(message, "Booking not found"),
            other => panic!("Expected NotFound, got {:?}", other),
        }

        seed_booking(&repos, &drill, &booker, 1, 2, BookingStatus::Approved).await;
        match services
            .items
            .create_comment(drill.id, booker.id, "Great".to_string())
            .await
        {
            Err(AppError::BadRequest { message }) => assert_eq!(message, "Booking is ending date"),
            other => panic!("Expected BadRequest, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_comment_after_past_booking_is_listed_on_item() {
        let (services, repos) = fixture();
        let owner = user(&services, "Olga").await;
        let booker = user(&services, "Bob").await;
        let drill = item(&services, &owner, "Drill", true).await;

        seed_booking(&repos, &drill, &booker, -5, -3, BookingStatus::Approved).await;

        let comment = services
            .items
            .create_comment(drill.id, booker.id, "Worked fine".to_string())
            .await
            .unwrap();
        assert_eq!(comment.author.name, "Bob");
        assert_eq!(comment.item.id, drill.id);

        let details = services.items.get_item(drill.id).await.unwrap();
        assert_eq!(details.comments.len(), 1);
        assert_eq!(details.comments[0].comment.text, "Worked fine");
    }
}
