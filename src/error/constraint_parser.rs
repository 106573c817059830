use std::sync::OnceLock;

use regex::Regex;

/// Pulls entity, column and value out of PostgreSQL constraint messages.
pub struct ConstraintParser;

struct Patterns {
    key_value: Regex,
    column_name: Regex,
    table_name: Regex,
}

/// Tables from `schema.rs`, longest first so `item_requests` wins over `items`.
const KNOWN_TABLES: &[&str] = &["item_requests", "bookings", "comments", "items", "users"];

static PATTERNS: OnceLock<Option<Patterns>> = OnceLock::new();

impl ConstraintParser {
    fn patterns() -> Option<&'static Patterns> {
        PATTERNS
            .get_or_init(|| {
                Some(Patterns {
                    key_value: Regex::new(r"Key \(([^)]+)\)=\(([^)]*)\)").ok()?,
                    column_name: Regex::new(r#"column "([^"]+)""#).ok()?,
                    table_name: Regex::new(r#"table "([^"]+)""#).ok()?,
                })
            })
            .as_ref()
    }

    /// `users_email_key` + `Key (email)=(a@b.c)` gives `("users", "email", "a@b.c")`.
    pub fn parse_unique_violation(
        message: &str,
        constraint_name: Option<&str>,
    ) -> Option<(String, String, String)> {
        let key_value = Self::extract_key_value_from_message(message);

        if let Some((entity, field)) = constraint_name.and_then(Self::parse_unique_constraint_name)
        {
            let value = key_value
                .map(|(_, v)| v)
                .unwrap_or_else(|| "duplicate_value".to_string());
            return Some((entity, field, value));
        }

        let (field, value) = key_value?;
        let entity =
            Self::extract_table_from_message(message).unwrap_or_else(|| "resource".to_string());
        Some((entity, field, value))
    }

    /// `items_owner_id_fkey` gives `("items", "owner_id", <value>)`.
    pub fn parse_foreign_key_violation(
        message: &str,
        constraint_name: Option<&str>,
    ) -> Option<(String, String, String)> {
        let value = Self::extract_key_value_from_message(message)
            .map(|(_, v)| v)
            .unwrap_or_else(|| "invalid_reference".to_string());
        let (entity, field) = constraint_name.and_then(Self::parse_foreign_key_constraint_name)?;
        Some((entity, field, value))
    }

    pub fn parse_unique_constraint_name(constraint_name: &str) -> Option<(String, String)> {
        Self::split_table_prefix(constraint_name.strip_suffix("_key")?)
    }

    pub fn parse_foreign_key_constraint_name(constraint_name: &str) -> Option<(String, String)> {
        Self::split_table_prefix(constraint_name.strip_suffix("_fkey")?)
    }

    /// `<table>_<column>` where the table name may itself contain underscores.
    fn split_table_prefix(stem: &str) -> Option<(String, String)> {
        let (entity, field) = KNOWN_TABLES
            .iter()
            .find_map(|table| {
                stem.strip_prefix(table)
                    .and_then(|rest| rest.strip_prefix('_'))
                    .map(|field| (*table, field))
            })
            .or_else(|| stem.split_once('_'))?;
        if entity.is_empty() || field.is_empty() {
            return None;
        }
        Some((entity.to_string(), field.to_string()))
    }

    pub fn extract_column_from_message(message: &str) -> Option<String> {
        Self::patterns()?
            .column_name
            .captures(message)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
    }

    pub fn extract_table_from_message(message: &str) -> Option<String> {
        Self::patterns()?
            .table_name
            .captures(message)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
    }

    pub fn extract_key_value_from_message(message: &str) -> Option<(String, String)> {
        Self::patterns()?.key_value.captures(message).and_then(|caps| {
            let field = caps.get(1)?.as_str().to_string();
            let value = caps.get(2)?.as_str().to_string();
            Some((field, value))
        })
    }
}
