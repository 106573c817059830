//! Acting-user header extraction.
//!
//! Every item, booking and request endpoint identifies its caller through
//! the `X-Sharer-User-Id` header. The value is trusted as-is; there is no
//! session or token behind it.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::error::AppError;

pub const SHARER_USER_ID_HEADER: &str = "x-sharer-user-id";

/// Id of the user performing the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SharerUserId(pub i64);

impl SharerUserId {
    fn parse(raw: &str) -> Result<Self, AppError> {
        match raw.trim().parse::<i64>() {
            Ok(id) if id > 0 => Ok(SharerUserId(id)),
            _ => Err(AppError::bad_request(format!(
                "Invalid X-Sharer-User-Id header: {}",
                raw
            ))),
        }
    }
}

impl<S> FromRequestParts<S> for SharerUserId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let value = parts
            .headers
            .get(SHARER_USER_ID_HEADER)
            .ok_or_else(|| AppError::bad_request("Missing X-Sharer-User-Id header"))?;
        let raw = value
            .to_str()
            .map_err(|_| AppError::bad_request("Invalid X-Sharer-User-Id header"))?;
        Self::parse(raw)
    }
}
