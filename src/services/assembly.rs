//! Resolves id references into the read-side aggregates in `models::details`.
//!
//! Lookups are batched per call: one query per related table regardless of
//! how many rows are being rendered.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{AppError, AppResult};
use crate::models::{
    Booking, BookingDetails, BookingStatus, CommentDetails, Item, ItemDetails, User,
};
use crate::repositories::{BookingRepository, CommentRepository, ItemRepository, UserRepository};

#[derive(Clone)]
pub(crate) struct DetailsAssembler {
    users: Arc<dyn UserRepository>,
    items: Arc<dyn ItemRepository>,
    bookings: Arc<dyn BookingRepository>,
    comments: Arc<dyn CommentRepository>,
}

fn unique_ids(ids: impl Iterator<Item = i64>) -> Vec<i64> {
    let mut ids: Vec<i64> = ids.collect();
    ids.sort_unstable();
    ids.dedup();
    ids
}

fn dangling(entity: &str, id: i64) -> AppError {
    AppError::Internal {
        source: anyhow::anyhow!("dangling reference to {} {}", entity, id),
    }
}

impl DetailsAssembler {
    pub(crate) fn new(
        users: Arc<dyn UserRepository>,
        items: Arc<dyn ItemRepository>,
        bookings: Arc<dyn BookingRepository>,
        comments: Arc<dyn CommentRepository>,
    ) -> Self {
        Self {
            users,
            items,
            bookings,
            comments,
        }
    }

    async fn users_by_id(&self, ids: impl Iterator<Item = i64>) -> AppResult<HashMap<i64, User>> {
        let ids = unique_ids(ids);
        Ok(self
            .users
            .find_by_ids(&ids)
            .await?
            .into_iter()
            .map(|u| (u.id, u))
            .collect())
    }

    pub(crate) async fn booking(&self, booking: Booking) -> AppResult<BookingDetails> {
        let mut rendered = self.bookings(vec![booking]).await?;
        rendered.pop().ok_or_else(|| AppError::Internal {
            source: anyhow::anyhow!("booking vanished while rendering"),
        })
    }

    /// Attaches item and booker to each booking, keeping the input order.
    pub(crate) async fn bookings(&self, bookings: Vec<Booking>) -> AppResult<Vec<BookingDetails>> {
        if bookings.is_empty() {
            return Ok(Vec::new());
        }
        let item_ids = unique_ids(bookings.iter().map(|b| b.item_id));
        let items: HashMap<i64, Item> = self
            .items
            .find_by_ids(&item_ids)
            .await?
            .into_iter()
            .map(|i| (i.id, i))
            .collect();
        let bookers = self.users_by_id(bookings.iter().map(|b| b.booker_id)).await?;

        bookings
            .into_iter()
            .map(|booking| {
                let item = items
                    .get(&booking.item_id)
                    .cloned()
                    .ok_or_else(|| dangling("item", booking.item_id))?;
                let booker = bookers
                    .get(&booking.booker_id)
                    .cloned()
                    .ok_or_else(|| dangling("user", booking.booker_id))?;
                Ok(BookingDetails {
                    booking,
                    item,
                    booker,
                })
            })
            .collect()
    }

    pub(crate) async fn item(&self, item: Item) -> AppResult<ItemDetails> {
        let mut rendered = self.items(vec![item]).await?;
        rendered.pop().ok_or_else(|| AppError::Internal {
            source: anyhow::anyhow!("item vanished while rendering"),
        })
    }

    /// Enriches items with their comments, last booking and next booking.
    ///
    /// "Last" is the latest-starting REJECTED booking and "next" the
    /// earliest-starting WAITING one; approved bookings are never shown here.
    pub(crate) async fn items(&self, items: Vec<Item>) -> AppResult<Vec<ItemDetails>> {
        if items.is_empty() {
            return Ok(Vec::new());
        }
        let item_ids: Vec<i64> = items.iter().map(|i| i.id).collect();
        let comments = self.comments.find_by_items(&item_ids).await?;
        // Ascending by start time
        let bookings = self.bookings.find_by_items(&item_ids).await?;
        let people = self
            .users_by_id(
                comments
                    .iter()
                    .map(|c| c.author_id)
                    .chain(bookings.iter().map(|b| b.booker_id)),
            )
            .await?;

        let person = |id: i64| people.get(&id).cloned().ok_or_else(|| dangling("user", id));

        items
            .into_iter()
            .map(|item| {
                let item_comments = comments
                    .iter()
                    .filter(|c| c.item_id == item.id)
                    .map(|c| {
                        Ok(CommentDetails {
                            comment: c.clone(),
                            item: item.clone(),
                            author: person(c.author_id)?,
                        })
                    })
                    .collect::<AppResult<Vec<_>>>()?;

                let item_id = item.id;
                let on_item = |status: BookingStatus| {
                    bookings
                        .iter()
                        .filter(move |b| b.item_id == item_id && b.status == status)
                };
                let render = |b: &Booking| -> AppResult<BookingDetails> {
                    Ok(BookingDetails {
                        booking: b.clone(),
                        item: item.clone(),
                        booker: person(b.booker_id)?,
                    })
                };
                let last_booking = on_item(BookingStatus::Rejected).last().map(render).transpose()?;
                let next_booking = on_item(BookingStatus::Waiting).next().map(render).transpose()?;

                Ok(ItemDetails {
                    item,
                    comments: item_comments,
                    last_booking,
                    next_booking,
                })
            })
            .collect()
    }
}
