use std::borrow::Cow;

use axum::Json;
use axum::extract::{FromRequest, Request, rejection::JsonRejection};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidateEmail, ValidationError};

use crate::error::{AppError, AppResult};

/// JSON body that has passed its `validator` rules.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> AppResult<Self> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        value.validate()?;
        Ok(ValidatedJson(value))
    }
}

/// Rejects empty and whitespace-only strings.
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank").with_message(Cow::Borrowed("must not be blank")));
    }
    Ok(())
}

/// Accepts blank strings and otherwise requires a valid email address.
///
/// Used on patch bodies, where a blank value means "leave unchanged".
pub fn blank_or_email(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() || value.validate_email() {
        return Ok(());
    }
    Err(ValidationError::new("email").with_message(Cow::Borrowed("Invalid email format")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Method, header};
    use serde::Deserialize;

    #[derive(Debug, Deserialize, Validate)]
    struct Payload {
        #[validate(custom(function = "not_blank"))]
        text: String,
        #[validate(email(message = "Invalid email format"))]
        email: Option<String>,
    }

    fn json_request(body: &'static str) -> Request {
        Request::builder()
            .method(Method::POST)
            .uri("/payload")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_valid_body() {
        let request = json_request(r#"{"text": "hello"}"#);
        let ValidatedJson(payload) = ValidatedJson::<Payload>::from_request(request, &())
            .await
            .unwrap();
        assert_eq!(payload.text, "hello");
        assert!(payload.email.is_none());
    }

    #[tokio::test]
    async fn test_blank_text_is_rejected() {
        let request = json_request(r#"{"text": "   "}"#);
        match ValidatedJson::<Payload>::from_request(request, &()).await {
            Err(AppError::ValidationErrors { errors }) => {
                assert_eq!(errors.len(), 1);
                assert_eq!(errors[0].field, "text");
                assert_eq!(errors[0].message, "must not be blank");
            }
            other => panic!("Expected ValidationErrors, got {:?}", other.map(|_| ())),
        }
    }

    #[tokio::test]
    async fn test_optional_email_is_checked_when_present() {
        let request = json_request(r#"{"text": "hi", "email": "nope"}"#);
        match ValidatedJson::<Payload>::from_request(request, &()).await {
            Err(AppError::ValidationErrors { errors }) => {
                assert_eq!(errors[0].field, "email");
                assert_eq!(errors[0].message, "Invalid email format");
            }
            other => panic!("Expected ValidationErrors, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_blank_or_email() {
        assert!(blank_or_email("").is_ok());
        assert!(blank_or_email("   ").is_ok());
        assert!(blank_or_email("ann@example.com").is_ok());
        let err = blank_or_email("ann at example").unwrap_err();
        assert_eq!(err.message.as_deref(), Some("Invalid email format"));
    }

    #[tokio::test]
    async fn test_malformed_json_is_bad_request() {
        let request = json_request(r#"{"text": "#);
        assert!(matches!(
            ValidatedJson::<Payload>::from_request(request, &()).await,
            Err(AppError::BadRequest { .. })
        ));
    }
}
