use diesel::prelude::*;

#[derive(Debug, Queryable, Selectable, Clone, PartialEq, Eq)]
#[diesel(table_name = crate::schema::items)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Item {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub available: bool,
    pub owner_id: i64,
    pub request_id: Option<i64>,
}

impl Item {
    /// Case-insensitive substring match on name or description.
    ///
    /// `needle` must already be lowercased.
    pub fn matches_text(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
            || self
                .description
                .as_deref()
                .is_some_and(|d| d.to_lowercase().contains(needle))
    }
}

#[derive(Debug, Insertable, Clone)]
#[diesel(table_name = crate::schema::items)]
pub struct NewItem {
    pub name: String,
    pub description: Option<String>,
    pub available: bool,
    pub owner_id: i64,
    pub request_id: Option<i64>,
}

#[derive(Debug, AsChangeset, Clone, Default, PartialEq, Eq)]
#[diesel(table_name = crate::schema::items)]
pub struct UpdateItem {
    pub name: Option<String>,
    pub description: Option<String>,
    pub available: Option<bool>,
}

impl UpdateItem {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none() && self.available.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn item(name: &str, description: Option<&str>) -> Item {
        Item {
            id: 1,
            name: name.to_string(),
            description: description.map(str::to_string),
            available: true,
            owner_id: 1,
            request_id: None,
        }
    }

    #[test]
    fn test_matches_name_or_description() {
        let drill = item("Cordless Drill", Some("18V with two batteries"));
        assert!(drill.matches_text("drill"));
        assert!(drill.matches_text("batteries"));
        assert!(!drill.matches_text("saw"));
    }

    #[test]
    fn test_missing_description_only_checks_name() {
        let ladder = item("Ladder", None);
        assert!(ladder.matches_text("lad"));
        assert!(!ladder.matches_text("aluminium"));
    }

    proptest! {
        #[test]
        fn prop_any_case_variant_of_name_matches(name in "[a-zA-Z]{1,16}") {
            let it = item(&name, None);
            prop_assert!(it.matches_text(&name.to_uppercase().to_lowercase()));
        }
    }
}
