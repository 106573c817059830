//! HTTP layer: routes, handlers, middleware and DTOs.

mod doc;
pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;
