use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind, Error as DieselError};

use crate::error::{AppError, ConstraintParser};

/// Translates diesel failures into `AppError` variants the API can render.
pub struct DatabaseErrorConverter;

impl DatabaseErrorConverter {
    pub fn convert_diesel_error(error: DieselError, operation: &str) -> AppError {
        match error {
            DieselError::DatabaseError(kind, info) => {
                Self::convert_database_error(kind, info.as_ref(), operation)
            }
            DieselError::NotFound => AppError::NotFound {
                entity: "resource".to_string(),
                field: "id".to_string(),
                value: "unknown".to_string(),
                message: "Resource not found".to_string(),
            },
            other => AppError::Database {
                operation: operation.to_string(),
                source: anyhow::Error::from(other),
            },
        }
    }

    fn convert_database_error(
        kind: DatabaseErrorKind,
        info: &(dyn DatabaseErrorInformation + Send + Sync),
        operation: &str,
    ) -> AppError {
        let message = info.message();
        // PostgreSQL puts the "Key (col)=(value)" part in DETAIL
        let detail = match info.details() {
            Some(details) => format!("{}\n{}", message, details),
            None => message.to_string(),
        };
        let constraint_name = info.constraint_name();

        match kind {
            DatabaseErrorKind::UniqueViolation => {
                match ConstraintParser::parse_unique_violation(&detail, constraint_name) {
                    Some((entity, field, value)) => AppError::Duplicate {
                        entity,
                        field,
                        value,
                    },
                    None => Self::generic(operation, "Unique constraint violation", message),
                }
            }
            DatabaseErrorKind::ForeignKeyViolation => {
                match ConstraintParser::parse_foreign_key_violation(&detail, constraint_name) {
                    Some((entity, field, value)) => AppError::Validation {
                        field,
                        reason: format!("Invalid reference from {} with value '{}'", entity, value),
                    },
                    None => Self::generic(operation, "Foreign key constraint violation", message),
                }
            }
            DatabaseErrorKind::NotNullViolation => {
                match ConstraintParser::extract_column_from_message(message) {
                    Some(field) => AppError::Validation {
                        field,
                        reason: "Field is required".to_string(),
                    },
                    None => Self::generic(operation, "Not null constraint violation", message),
                }
            }
            _ => Self::generic(operation, "Database error", message),
        }
    }

    fn generic(operation: &str, label: &str, message: &str) -> AppError {
        AppError::Database {
            operation: operation.to_string(),
            source: anyhow::anyhow!("{}: {}", label, message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct MockDatabaseErrorInfo {
        message: String,
        details: Option<String>,
        constraint_name: Option<String>,
    }

    impl DatabaseErrorInformation for MockDatabaseErrorInfo {
        fn message(&self) -> &str {
            &self.message
        }

        fn details(&self) -> Option<&str> {
            self.details.as_deref()
        }

        fn hint(&self) -> Option<&str> {
            None
        }

        fn table_name(&self) -> Option<&str> {
            None
        }

        fn column_name(&self) -> Option<&str> {
            None
        }

        fn constraint_name(&self) -> Option<&str> {
            self.constraint_name.as_deref()
        }

        fn statement_position(&self) -> Option<i32> {
            None
        }
    }

    fn database_error(kind: DatabaseErrorKind, info: MockDatabaseErrorInfo) -> DieselError {
        DieselError::DatabaseError(kind, Box::new(info))
    }

    #[test]
    fn test_duplicate_email_becomes_conflict() {
        let error = database_error(
            DatabaseErrorKind::UniqueViolation,
            MockDatabaseErrorInfo {
                message: "duplicate key value violates unique constraint \"users_email_key\""
                    .to_string(),
                details: Some("Key (email)=(ann@example.com) already exists.".to_string()),
                constraint_name: Some("users_email_key".to_string()),
            },
        );

        match DatabaseErrorConverter::convert_diesel_error(error, "insert user") {
            AppError::Duplicate {
                entity,
                field,
                value,
            } => {
                assert_eq!(entity, "users");
                assert_eq!(field, "email");
                assert_eq!(value, "ann@example.com");
            }
            other => panic!("Expected Duplicate, got {:?}", other),
        }
    }

    #[test]
    fn test_dangling_reference_becomes_validation_error() {
        let error = database_error(
            DatabaseErrorKind::ForeignKeyViolation,
            MockDatabaseErrorInfo {
                message: "update or delete on table \"users\" violates foreign key constraint \"items_owner_id_fkey\" on table \"items\"".to_string(),
                details: Some("Key (id)=(3) is still referenced from table \"items\".".to_string()),
                constraint_name: Some("items_owner_id_fkey".to_string()),
            },
        );

        match DatabaseErrorConverter::convert_diesel_error(error, "delete user") {
            AppError::Validation { field, reason } => {
                assert_eq!(field, "owner_id");
                assert!(reason.contains("items"));
                assert!(reason.contains('3'));
            }
            other => panic!("Expected Validation, got {:?}", other),
        }
    }

    #[test]
    fn test_reference_from_item_requests_keeps_full_table_name() {
        let error = database_error(
            DatabaseErrorKind::ForeignKeyViolation,
            MockDatabaseErrorInfo {
                message: "insert or update on table \"item_requests\" violates foreign key constraint \"item_requests_requester_id_fkey\"".to_string(),
                details: Some("Key (requester_id)=(42) is not present in table \"users\".".to_string()),
                constraint_name: Some("item_requests_requester_id_fkey".to_string()),
            },
        );

        match DatabaseErrorConverter::convert_diesel_error(error, "create request") {
            AppError::Validation { field, reason } => {
                assert_eq!(field, "requester_id");
                assert!(reason.contains("item_requests"));
                assert!(reason.contains("42"));
            }
            other => panic!("Expected Validation, got {:?}", other),
        }
    }

    #[test]
    fn test_not_null_violation_names_column() {
        let error = database_error(
            DatabaseErrorKind::NotNullViolation,
            MockDatabaseErrorInfo {
                message: "null value in column \"name\" of relation \"items\" violates not-null constraint".to_string(),
                details: None,
                constraint_name: None,
            },
        );

        match DatabaseErrorConverter::convert_diesel_error(error, "insert item") {
            AppError::Validation { field, .. } => assert_eq!(field, "name"),
            other => panic!("Expected Validation, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_kind_is_database_error() {
        let error = database_error(
            DatabaseErrorKind::SerializationFailure,
            MockDatabaseErrorInfo {
                message: "could not serialize access".to_string(),
                details: None,
                constraint_name: None,
            },
        );

        assert!(matches!(
            DatabaseErrorConverter::convert_diesel_error(error, "update booking"),
            AppError::Database { .. }
        ));
    }
}
