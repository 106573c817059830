//! Process-local storage backend.
//!
//! Mirrors the PostgreSQL schema's guarantees that the services rely on:
//! unique emails, id order, and refusing to delete a user who is still
//! referenced by other rows.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::error::{AppError, AppResult};
use crate::models::{
    Booking, BookingStatus, Comment, Item, ItemRequest, NewBooking, NewComment, NewItem,
    NewItemRequest, NewUser, UpdateItem, UpdateUser, User,
};
use crate::repositories::traits::{
    BookingRepository, CommentRepository, ItemRepository, ItemRequestRepository, StoreHealth,
    UserRepository,
};

#[derive(Default)]
struct Tables {
    users: BTreeMap<i64, User>,
    items: BTreeMap<i64, Item>,
    bookings: BTreeMap<i64, Booking>,
    comments: BTreeMap<i64, Comment>,
    requests: BTreeMap<i64, ItemRequest>,
    last_id: i64,
}

impl Tables {
    // One sequence for all tables; ids only need to be unique per table.
    fn next_id(&mut self) -> i64 {
        self.last_id += 1;
        self.last_id
    }

    fn email_taken(&self, email: &str, except: Option<i64>) -> bool {
        self.users
            .values()
            .any(|u| u.email == email && Some(u.id) != except)
    }

    fn sorted_by_start(mut bookings: Vec<Booking>) -> Vec<Booking> {
        bookings.sort_by(|a, b| a.start.cmp(&b.start).then(a.id.cmp(&b.id)));
        bookings
    }

    fn newest_first(mut requests: Vec<ItemRequest>) -> Vec<ItemRequest> {
        requests.sort_by(|a, b| b.created.cmp(&a.created).then(b.id.cmp(&a.id)));
        requests
    }
}

#[derive(Default)]
pub struct InMemoryStore {
    tables: Mutex<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> AppResult<MutexGuard<'_, Tables>> {
        self.tables.lock().map_err(|_| AppError::Internal {
            source: anyhow::anyhow!("in-memory store lock poisoned"),
        })
    }
}

fn missing_row(entity: &str, id: i64) -> AppError {
    AppError::not_found(entity, id, format!("{} {} not found", entity, id))
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn create(&self, new_user: NewUser) -> AppResult<User> {
        let mut tables = self.tables()?;
        if tables.email_taken(&new_user.email, None) {
            return Err(AppError::duplicate("users", "email", new_user.email));
        }
        let user = User {
            id: tables.next_id(),
            name: new_user.name,
            email: new_user.email,
        };
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, user_id: i64) -> AppResult<Option<User>> {
        Ok(self.tables()?.users.get(&user_id).cloned())
    }

    async fn find_by_ids(&self, user_ids: &[i64]) -> AppResult<Vec<User>> {
        let tables = self.tables()?;
        Ok(user_ids
            .iter()
            .filter_map(|id| tables.users.get(id).cloned())
            .collect())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        Ok(self
            .tables()?
            .users
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn list_all(&self) -> AppResult<Vec<User>> {
        Ok(self.tables()?.users.values().cloned().collect())
    }

    async fn update(&self, user_id: i64, changes: UpdateUser) -> AppResult<User> {
        let mut tables = self.tables()?;
        if let Some(email) = changes.email.as_deref() {
            if tables.email_taken(email, Some(user_id)) {
                return Err(AppError::duplicate("users", "email", email));
            }
        }
        let user = tables
            .users
            .get_mut(&user_id)
            .ok_or_else(|| missing_row("user", user_id))?;
        if let Some(name) = changes.name {
            user.name = name;
        }
        if let Some(email) = changes.email {
            user.email = email;
        }
        Ok(user.clone())
    }

    async fn delete(&self, user_id: i64) -> AppResult<usize> {
        let mut tables = self.tables()?;
        let referenced = tables.items.values().any(|i| i.owner_id == user_id)
            || tables.bookings.values().any(|b| b.booker_id == user_id)
            || tables.comments.values().any(|c| c.author_id == user_id)
            || tables.requests.values().any(|r| r.requester_id == user_id);
        if referenced && tables.users.contains_key(&user_id) {
            return Err(AppError::Validation {
                field: "id".to_string(),
                reason: format!("User {} is still referenced by other records", user_id),
            });
        }
        Ok(tables.users.remove(&user_id).map_or(0, |_| 1))
    }
}

#[async_trait]
impl ItemRepository for InMemoryStore {
    async fn create(&self, new_item: NewItem) -> AppResult<Item> {
        let mut tables = self.tables()?;
        let item = Item {
            id: tables.next_id(),
            name: new_item.name,
            description: new_item.description,
            available: new_item.available,
            owner_id: new_item.owner_id,
            request_id: new_item.request_id,
        };
        tables.items.insert(item.id, item.clone());
        Ok(item)
    }

    async fn find_by_id(&self, item_id: i64) -> AppResult<Option<Item>> {
        Ok(self.tables()?.items.get(&item_id).cloned())
    }

    async fn find_by_ids(&self, item_ids: &[i64]) -> AppResult<Vec<Item>> {
        let tables = self.tables()?;
        Ok(item_ids
            .iter()
            .filter_map(|id| tables.items.get(id).cloned())
            .collect())
    }

    async fn find_by_owner(&self, owner_id: i64) -> AppResult<Vec<Item>> {
        Ok(self
            .tables()?
            .items
            .values()
            .filter(|i| i.owner_id == owner_id)
            .cloned()
            .collect())
    }

    async fn find_by_request_ids(&self, request_ids: &[i64]) -> AppResult<Vec<Item>> {
        Ok(self
            .tables()?
            .items
            .values()
            .filter(|i| i.request_id.is_some_and(|r| request_ids.contains(&r)))
            .cloned()
            .collect())
    }

    async fn search_available(&self, text: &str) -> AppResult<Vec<Item>> {
        let needle = text.to_lowercase();
        Ok(self
            .tables()?
            .items
            .values()
            .filter(|i| i.available && i.matches_text(&needle))
            .cloned()
            .collect())
    }

    async fn update(&self, item_id: i64, changes: UpdateItem) -> AppResult<Item> {
        let mut tables = self.tables()?;
        let item = tables
            .items
            .get_mut(&item_id)
            .ok_or_else(|| missing_row("item", item_id))?;
        if let Some(name) = changes.name {
            item.name = name;
        }
        if let Some(description) = changes.description {
            item.description = Some(description);
        }
        if let Some(available) = changes.available {
            item.available = available;
        }
        Ok(item.clone())
    }
}

#[async_trait]
impl BookingRepository for InMemoryStore {
    async fn create(&self, new_booking: NewBooking) -> AppResult<Booking> {
        let mut tables = self.tables()?;
        let booking = Booking {
            id: tables.next_id(),
            start: new_booking.start,
            end: new_booking.end,
            item_id: new_booking.item_id,
            booker_id: new_booking.booker_id,
            status: new_booking.status,
        };
        tables.bookings.insert(booking.id, booking.clone());
        Ok(booking)
    }

    async fn find_by_id(&self, booking_id: i64) -> AppResult<Option<Booking>> {
        Ok(self.tables()?.bookings.get(&booking_id).cloned())
    }

    async fn find_by_booker(
        &self,
        booker_id: i64,
        status: Option<BookingStatus>,
    ) -> AppResult<Vec<Booking>> {
        let tables = self.tables()?;
        let found = tables
            .bookings
            .values()
            .filter(|b| b.booker_id == booker_id)
            .filter(|b| status.is_none_or(|s| b.status == s))
            .cloned()
            .collect();
        Ok(Tables::sorted_by_start(found))
    }

    async fn find_by_item_owner(
        &self,
        owner_id: i64,
        status: Option<BookingStatus>,
    ) -> AppResult<Vec<Booking>> {
        let tables = self.tables()?;
        let found = tables
            .bookings
            .values()
            .filter(|b| {
                tables
                    .items
                    .get(&b.item_id)
                    .is_some_and(|i| i.owner_id == owner_id)
            })
            .filter(|b| status.is_none_or(|s| b.status == s))
            .cloned()
            .collect();
        Ok(Tables::sorted_by_start(found))
    }

    async fn find_by_items(&self, item_ids: &[i64]) -> AppResult<Vec<Booking>> {
        let tables = self.tables()?;
        let found = tables
            .bookings
            .values()
            .filter(|b| item_ids.contains(&b.item_id))
            .cloned()
            .collect();
        Ok(Tables::sorted_by_start(found))
    }

    async fn find_by_item_and_booker(
        &self,
        item_id: i64,
        booker_id: i64,
    ) -> AppResult<Vec<Booking>> {
        Ok(self
            .tables()?
            .bookings
            .values()
            .filter(|b| b.item_id == item_id && b.booker_id == booker_id)
            .cloned()
            .collect())
    }

    async fn update_status(&self, booking_id: i64, status: BookingStatus) -> AppResult<Booking> {
        let mut tables = self.tables()?;
        let booking = tables
            .bookings
            .get_mut(&booking_id)
            .ok_or_else(|| missing_row("booking", booking_id))?;
        booking.status = status;
        Ok(booking.clone())
    }
}

#[async_trait]
impl CommentRepository for InMemoryStore {
    async fn create(&self, new_comment: NewComment) -> AppResult<Comment> {
        let mut tables = self.tables()?;
        let comment = Comment {
            id: tables.next_id(),
            text: new_comment.text,
            item_id: new_comment.item_id,
            author_id: new_comment.author_id,
            created: new_comment.created,
        };
        tables.comments.insert(comment.id, comment.clone());
        Ok(comment)
    }

    async fn find_by_items(&self, item_ids: &[i64]) -> AppResult<Vec<Comment>> {
        Ok(self
            .tables()?
            .comments
            .values()
            .filter(|c| item_ids.contains(&c.item_id))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl ItemRequestRepository for InMemoryStore {
    async fn create(&self, new_request: NewItemRequest) -> AppResult<ItemRequest> {
        let mut tables = self.tables()?;
        let request = ItemRequest {
            id: tables.next_id(),
            description: new_request.description,
            requester_id: new_request.requester_id,
            created: new_request.created,
        };
        tables.requests.insert(request.id, request.clone());
        Ok(request)
    }

    async fn find_by_id(&self, request_id: i64) -> AppResult<Option<ItemRequest>> {
        Ok(self.tables()?.requests.get(&request_id).cloned())
    }

    async fn find_by_requester(&self, requester_id: i64) -> AppResult<Vec<ItemRequest>> {
        let found = self
            .tables()?
            .requests
            .values()
            .filter(|r| r.requester_id == requester_id)
            .cloned()
            .collect();
        Ok(Tables::newest_first(found))
    }

    async fn find_by_other_requesters(&self, requester_id: i64) -> AppResult<Vec<ItemRequest>> {
        let found = self
            .tables()?
            .requests
            .values()
            .filter(|r| r.requester_id != requester_id)
            .cloned()
            .collect();
        Ok(Tables::newest_first(found))
    }
}

#[async_trait]
impl StoreHealth for InMemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn ping(&self) -> AppResult<()> {
        self.tables().map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(name: &str, email: &str) -> NewUser {
        NewUser {
            name: name.to_string(),
            email: email.to_string(),
        }
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected_on_create() {
        let store = InMemoryStore::new();
        UserRepository::create(&store, new_user("Ann", "ann@example.com"))
            .await
            .unwrap();

        let err = UserRepository::create(&store, new_user("Other", "ann@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Duplicate { .. }));
    }

    #[tokio::test]
    async fn test_user_with_items_cannot_be_deleted() {
        let store = InMemoryStore::new();
        let owner = UserRepository::create(&store, new_user("Ann", "ann@example.com"))
            .await
            .unwrap();
        ItemRepository::create(
            &store,
            NewItem {
                name: "Drill".to_string(),
                description: None,
                available: true,
                owner_id: owner.id,
                request_id: None,
            },
        )
        .await
        .unwrap();

        let err = UserRepository::delete(&store, owner.id).await.unwrap_err();
        assert!(matches!(err, AppError::Validation { .. }));
        assert_eq!(UserRepository::delete(&store, 999).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_owner_bookings_sorted_by_start() {
        let store = InMemoryStore::new();
        let owner = UserRepository::create(&store, new_user("Ann", "ann@example.com"))
            .await
            .unwrap();
        let booker = UserRepository::create(&store, new_user("Bob", "bob@example.com"))
            .await
            .unwrap();
        let item = ItemRepository::create(
            &store,
            NewItem {
                name: "Tent".to_string(),
                description: Some("Two person".to_string()),
                available: true,
                owner_id: owner.id,
                request_id: None,
            },
        )
        .await
        .unwrap();

        for day in [20, 5, 12] {
            let start = jiff::civil::date(2030, 1, day).at(9, 0, 0, 0);
            BookingRepository::create(
                &store,
                NewBooking {
                    start,
                    end: start.checked_add(jiff::Span::new().hours(2)).unwrap(),
                    item_id: item.id,
                    booker_id: booker.id,
                    status: BookingStatus::Waiting,
                },
            )
            .await
            .unwrap();
        }

        let found = store.find_by_item_owner(owner.id, None).await.unwrap();
        let days: Vec<i8> = found.iter().map(|b| b.start.day()).collect();
        assert_eq!(days, vec![5, 12, 20]);
        assert!(store.find_by_item_owner(booker.id, None).await.unwrap().is_empty());
    }
}
