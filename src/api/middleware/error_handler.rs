//! Converts `AppError` into HTTP responses.
//!
//! The rendered `ErrorResponse` is also stored in the response extensions so
//! that the request id middleware can stamp it with the request id.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::api::dto::ErrorResponse;
use crate::error::AppError;

/// HTTP status for each error variant.
pub fn error_status(error: &AppError) -> StatusCode {
    match error {
        AppError::NotFound { .. } => StatusCode::NOT_FOUND,
        AppError::Duplicate { .. } => StatusCode::CONFLICT,
        AppError::Validation { .. }
        | AppError::ValidationErrors { .. }
        | AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
        AppError::ConnectionPool { .. } => StatusCode::SERVICE_UNAVAILABLE,
        AppError::Database { .. } | AppError::Configuration { .. } | AppError::Internal { .. } => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

fn error_body(error: &AppError) -> ErrorResponse {
    match error {
        AppError::NotFound {
            entity,
            field,
            value,
            message,
        } => ErrorResponse::new("NOT_FOUND", message.as_str()).with_details(json!({
            "entity": entity,
            "field": field,
            "value": value,
        })),
        AppError::Duplicate { entity, field, value } => {
            ErrorResponse::new("DUPLICATE_ENTRY", error.to_string()).with_details(json!({
                "entity": entity,
                "field": field,
                "value": value,
            }))
        }
        AppError::Validation { field, reason } => {
            ErrorResponse::new("VALIDATION_ERROR", error.to_string()).with_details(json!({
                "field": field,
                "reason": reason,
            }))
        }
        AppError::ValidationErrors { errors } => {
            ErrorResponse::new("VALIDATION_ERROR", error.to_string()).with_details(json!(errors))
        }
        AppError::BadRequest { message } => ErrorResponse::new("BAD_REQUEST", message.as_str()),
        AppError::Database { .. } => {
            ErrorResponse::new("DATABASE_ERROR", "A database error occurred")
        }
        AppError::Configuration { .. } => {
            ErrorResponse::new("CONFIGURATION_ERROR", "Server is misconfigured")
        }
        AppError::ConnectionPool { .. } => {
            ErrorResponse::new("SERVICE_UNAVAILABLE", "Database connection unavailable")
        }
        AppError::Internal { .. } => {
            ErrorResponse::new("INTERNAL_ERROR", "An internal error occurred")
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = error_status(&self);
        if status.is_server_error() {
            tracing::error!(error = ?self, "Request failed");
        } else {
            tracing::debug!(status = status.as_u16(), error = %self, "Request rejected");
        }

        let body = error_body(&self);
        let mut response = (status, Json(body.clone())).into_response();
        response.extensions_mut().insert(body);
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationFieldError;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            error_status(&AppError::not_found("user", 1, "User not found.")),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            error_status(&AppError::duplicate("users", "email", "a@b.c")),
            StatusCode::CONFLICT
        );
        assert_eq!(
            error_status(&AppError::bad_request("Invalid state")),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            error_status(&AppError::ConnectionPool {
                source: anyhow::anyhow!("timed out")
            }),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            error_status(&AppError::Database {
                operation: "insert".to_string(),
                source: anyhow::anyhow!("boom")
            }),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn test_duplicate_body() {
        let response = AppError::duplicate("users", "email", "ann@example.com").into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
        assert!(response.extensions().get::<ErrorResponse>().is_some());

        let body = body_json(response).await;
        assert_eq!(body["code"], "DUPLICATE_ENTRY");
        assert_eq!(body["message"], "Email already exists.");
        assert_eq!(body["details"]["field"], "email");
    }

    #[tokio::test]
    async fn test_validation_errors_are_listed() {
        let response = AppError::ValidationErrors {
            errors: vec![ValidationFieldError {
                field: "text".to_string(),
                message: "must not be blank".to_string(),
            }],
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["details"][0]["field"], "text");
    }

    #[tokio::test]
    async fn test_internal_details_are_hidden() {
        let response = AppError::Internal {
            source: anyhow::anyhow!("secret connection string"),
        }
        .into_response();
        let body = body_json(response).await;
        assert_eq!(body["message"], "An internal error occurred");
        assert!(body.get("details").is_none());
        assert!(!body.to_string().contains("secret"));
    }
}
