use diesel::prelude::*;
use jiff::civil::DateTime;

/// A user's wish for an item nobody lends yet.
#[derive(Debug, Queryable, Selectable, Clone, PartialEq, Eq)]
#[diesel(table_name = crate::schema::item_requests)]
pub struct ItemRequest {
    pub id: i64,
    pub description: String,
    pub requester_id: i64,
    #[diesel(column_name = created_time, deserialize_as = jiff_diesel::DateTime)]
    pub created: DateTime,
}

#[derive(Debug, Insertable, Clone)]
#[diesel(table_name = crate::schema::item_requests)]
pub struct NewItemRequest {
    pub description: String,
    pub requester_id: i64,
    #[diesel(column_name = created_time, serialize_as = jiff_diesel::DateTime)]
    pub created: DateTime,
}
