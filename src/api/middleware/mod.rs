//! Middleware components for request processing.
//!
//! This module contains middleware for logging, request ID tracking,
//! error rendering, and the acting-user extractor.

mod error_handler;
mod logging;
mod request_id;
mod sharer;

pub use error_handler::error_status;
pub use logging::logging_middleware;
pub use request_id::{REQUEST_ID_HEADER, RequestId, request_id_middleware};
pub use sharer::{SHARER_USER_ID_HEADER, SharerUserId};
