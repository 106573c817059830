use diesel::prelude::*;
use jiff::civil::DateTime;

#[derive(Debug, Queryable, Selectable, Clone, PartialEq, Eq)]
#[diesel(table_name = crate::schema::comments)]
pub struct Comment {
    pub id: i64,
    pub text: String,
    pub item_id: i64,
    pub author_id: i64,
    #[diesel(deserialize_as = jiff_diesel::DateTime)]
    pub created: DateTime,
}

#[derive(Debug, Insertable, Clone)]
#[diesel(table_name = crate::schema::comments)]
pub struct NewComment {
    pub text: String,
    pub item_id: i64,
    pub author_id: i64,
    #[diesel(serialize_as = jiff_diesel::DateTime)]
    pub created: DateTime,
}
