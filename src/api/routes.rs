//! Router configuration for the API.

use axum::{Router, middleware};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::doc::ApiDoc;
use crate::api::handlers;
use crate::api::middleware::{logging_middleware, request_id_middleware};
use crate::state::AppState;

/// Builds the application router with all routes and middleware.
///
/// Layers run outermost first: CORS, compression, request id, logging.
/// The OpenAPI document is served at `/api-docs/openapi.json` and browsable
/// under `/swagger-ui`.
pub fn create_router(state: AppState) -> Router {
    let (router, openapi) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .merge(handlers::health::health_routes())
        .nest("/users", handlers::users::user_routes())
        .nest("/items", handlers::items::item_routes())
        .nest("/bookings", handlers::bookings::booking_routes())
        .nest("/requests", handlers::requests::request_routes())
        .split_for_parts();

    router
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi))
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Method, Request, StatusCode, header};
    use jiff::ToSpan;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use crate::services::local_now;

    struct TestApp {
        router: Router,
    }

    impl TestApp {
        fn new() -> Self {
            Self {
                router: create_router(AppState::in_memory()),
            }
        }

        async fn send(
            &self,
            method: Method,
            uri: &str,
            user: Option<i64>,
            body: Option<Value>,
        ) -> (StatusCode, Value) {
            let mut builder = Request::builder().method(method).uri(uri);
            if let Some(id) = user {
                builder = builder.header("X-Sharer-User-Id", id.to_string());
            }
            let request = match body {
                Some(json) => builder
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(json.to_string()))
                    .unwrap(),
                None => builder.body(Body::empty()).unwrap(),
            };

            let response = self.router.clone().oneshot(request).await.unwrap();
            let status = response.status();
            let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
                .await
                .unwrap();
            let value = if bytes.is_empty() {
                Value::Null
            } else {
                serde_json::from_slice(&bytes).unwrap_or(Value::Null)
            };
            (status, value)
        }

        async fn create_user(&self, name: &str) -> i64 {
            let (status, body) = self
                .send(
                    Method::POST,
                    "/users",
                    None,
                    Some(json!({"name": name, "email": format!("{}@example.com", name.to_lowercase())})),
                )
                .await;
            assert_eq!(status, StatusCode::OK, "{body}");
            body["id"].as_i64().unwrap()
        }

        async fn create_item(&self, owner: i64, name: &str, available: bool) -> i64 {
            let (status, body) = self
                .send(
                    Method::POST,
                    "/items",
                    Some(owner),
                    Some(json!({"name": name, "description": "for rent", "available": available})),
                )
                .await;
            assert_eq!(status, StatusCode::OK, "{body}");
            body["id"].as_i64().unwrap()
        }
    }

    fn in_hours(hours: i64) -> String {
        local_now().checked_add(hours.hours()).unwrap().to_string()
    }

    #[tokio::test]
    async fn test_user_crud_over_http() {
        let app = TestApp::new();
        let id = app.create_user("Ann").await;

        let (status, body) = app
            .send(
                Method::POST,
                "/users",
                None,
                Some(json!({"name": "Other", "email": "ann@example.com"})),
            )
            .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["message"], "Email already exists.");

        let (status, body) = app
            .send(
                Method::PATCH,
                &format!("/users/{id}"),
                None,
                Some(json!({"name": "Annie"})),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"id": id, "name": "Annie", "email": "ann@example.com"}));

        let (status, body) = app
            .send(Method::DELETE, &format!("/users/{id}"), None, None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, Value::Null);

        let (status, _) = app.send(Method::GET, &format!("/users/{id}"), None, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, body) = app.send(Method::DELETE, "/users/0", None, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Id can't be 0");
    }

    #[tokio::test]
    async fn test_invalid_email_is_rejected() {
        let app = TestApp::new();
        let (status, body) = app
            .send(Method::POST, "/users", None, Some(json!({"email": "not-an-email"})))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_ERROR");
        assert!(body["requestId"].is_string());
    }

    #[tokio::test]
    async fn test_blank_email_in_patch_is_ignored() {
        let app = TestApp::new();
        let id = app.create_user("Ann").await;

        let (status, body) = app
            .send(
                Method::PATCH,
                &format!("/users/{id}"),
                None,
                Some(json!({"name": "Annie", "email": "  "})),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "{body}");
        assert_eq!(body, json!({"id": id, "name": "Annie", "email": "ann@example.com"}));

        let (status, body) = app
            .send(
                Method::PATCH,
                &format!("/users/{id}"),
                None,
                Some(json!({"email": "ann at example"})),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_sharer_header_is_required() {
        let app = TestApp::new();
        let (status, body) = app.send(Method::GET, "/items", None, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "BAD_REQUEST");
    }

    #[tokio::test]
    async fn test_public_reads_need_no_sharer_header() {
        let app = TestApp::new();
        let owner = app.create_user("Olga").await;
        let item = app.create_item(owner, "Drill", true).await;
        let (status, body) = app
            .send(
                Method::POST,
                "/requests",
                Some(owner),
                Some(json!({"description": "Need a ladder"})),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        let request = body["id"].as_i64().unwrap();

        let (status, body) = app
            .send(Method::GET, &format!("/items/{item}"), None, None)
            .await;
        assert_eq!(status, StatusCode::OK, "{body}");
        assert_eq!(body["name"], "Drill");

        let (status, body) = app
            .send(Method::GET, "/items/search?text=drill", None, None)
            .await;
        assert_eq!(status, StatusCode::OK, "{body}");
        assert_eq!(body.as_array().unwrap().len(), 1);

        let (status, body) = app
            .send(Method::GET, &format!("/requests/{request}"), None, None)
            .await;
        assert_eq!(status, StatusCode::OK, "{body}");
        assert_eq!(body["description"], "Need a ladder");
    }

    #[tokio::test]
    async fn test_booking_flow_over_http() {
        let app = TestApp::new();
        let owner = app.create_user("Olga").await;
        let booker = app.create_user("Bob").await;
        let item = app.create_item(owner, "Drill", true).await;

        let (status, body) = app
            .send(
                Method::POST,
                "/bookings",
                Some(booker),
                Some(json!({"itemId": item, "start": in_hours(1), "end": in_hours(2)})),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "{body}");
        assert_eq!(body["status"], "WAITING");
        let booking = body["id"].as_i64().unwrap();

        let (status, body) = app
            .send(
                Method::PATCH,
                &format!("/bookings/{booking}?approved=true"),
                Some(booker),
                None,
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "You are not owner of this booking");

        let (status, body) = app
            .send(
                Method::PATCH,
                &format!("/bookings/{booking}?approved=true"),
                Some(owner),
                None,
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "APPROVED");

        let (status, body) = app
            .send(Method::GET, &format!("/bookings/{booking}"), Some(booker), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "APPROVED");
        assert_eq!(body["item"]["id"], item);
        assert_eq!(body["booker"]["id"], booker);

        let (status, body) = app
            .send(Method::GET, "/bookings/owner?state=CURRENT", Some(owner), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 1);

        let (status, body) = app
            .send(Method::GET, "/bookings?state=SOMETIME", Some(booker), None)
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Invalid state");
    }

    #[tokio::test]
    async fn test_unavailable_item_cannot_be_booked() {
        let app = TestApp::new();
        let owner = app.create_user("Olga").await;
        let booker = app.create_user("Bob").await;
        let item = app.create_item(owner, "Broken drill", false).await;

        let (status, body) = app
            .send(
                Method::POST,
                "/bookings",
                Some(booker),
                Some(json!({"itemId": item, "start": in_hours(1), "end": in_hours(2)})),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Item is not available");

        let (status, body) = app
            .send(Method::GET, "/items/search?text=drill", Some(booker), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));
    }

    #[tokio::test]
    async fn test_request_lists_offered_items() {
        let app = TestApp::new();
        let asker = app.create_user("Ann").await;
        let lender = app.create_user("Olga").await;

        let (status, body) = app
            .send(
                Method::POST,
                "/requests",
                Some(asker),
                Some(json!({"description": "Need a ladder"})),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        let request = body["id"].as_i64().unwrap();

        let (status, body) = app
            .send(
                Method::POST,
                "/items",
                Some(lender),
                Some(json!({"name": "Ladder", "available": true, "requestId": request})),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        let ladder = body["id"].as_i64().unwrap();

        let (status, body) = app
            .send(Method::GET, &format!("/requests/{request}"), Some(lender), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body["items"],
            json!([{"id": ladder, "name": "Ladder", "ownerId": lender}])
        );

        let (_, body) = app.send(Method::GET, "/requests/all", Some(lender), None).await;
        assert_eq!(body.as_array().unwrap().len(), 1);
        let (_, body) = app.send(Method::GET, "/requests/all", Some(asker), None).await;
        assert_eq!(body, json!([]));
    }

    #[tokio::test]
    async fn test_health_and_openapi() {
        let app = TestApp::new();
        let (status, body) = app.send(Method::GET, "/health", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["storage"], "memory");

        let (status, body) = app
            .send(Method::GET, "/api-docs/openapi.json", None, None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["paths"].get("/bookings/owner").is_some());
    }
}
