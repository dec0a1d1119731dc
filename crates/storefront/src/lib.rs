//! Tilestore Storefront library.
//!
//! This crate provides the storefront JSON service as a library so the
//! router can be tested and reused; the binary in `main.rs` adds Sentry,
//! rate limiting and the listener.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod backend;
pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod state;
pub mod store;

use axum::Router;
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

use crate::state::AppState;

/// Build the storefront router with tracing, request IDs and sessions.
pub fn app(state: AppState) -> Router {
    let session_layer = middleware::create_session_layer(state.config());

    Router::new()
        .merge(routes::routes())
        .layer(session_layer)
        .layer(axum::middleware::from_fn(middleware::request_id_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = tracing::field::Empty,
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .with_state(state)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use tower::ServiceExt;

    use super::*;
    use crate::config::{BackendConfig, StorefrontConfig};

    /// State pointing at a port nothing listens on.
    fn offline_state() -> AppState {
        let backend = BackendConfig::new("http://127.0.0.1:9").unwrap();
        AppState::new(StorefrontConfig::new("http://localhost:3000", backend)).unwrap()
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let response = app(offline_state()).oneshot(get("/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_readiness_fails_without_backend() {
        let response = app(offline_state())
            .oneshot(get("/health/ready"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_listing_degrades_to_empty_page() {
        let response = app(offline_state())
            .oneshot(get("/api/products?page=3&limit=5"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["products"], serde_json::json!([]));
        assert_eq!(json["totalProducts"], 0);
        assert_eq!(json["totalPages"], 0);
        assert_eq!(json["currentPage"], 3);
    }

    #[tokio::test]
    async fn test_zero_page_or_limit_is_bad_request() {
        for uri in ["/api/products?page=0", "/api/products?limit=0"] {
            let response = app(offline_state()).oneshot(get(uri)).await.unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri}");
        }
    }

    #[tokio::test]
    async fn test_orders_require_bearer_token() {
        let response = app(offline_state())
            .oneshot(get("/api/orders"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_checkout_with_empty_cart_is_bad_request() {
        let body = serde_json::json!({
            "shipping": {
                "fullName": "A. Customer", "phone": "9876543210", "addressLine1": "12 Road",
                "city": "Morbi", "postalCode": "363641", "country": "IN"
            }
        });
        let request = Request::builder()
            .method("POST")
            .uri("/api/checkout")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();

        let response = app(offline_state()).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"], "cart is empty");
    }

    #[tokio::test]
    async fn test_session_cookie_is_issued_for_session_routes() {
        let response = app(offline_state())
            .oneshot(get("/api/wishlist"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
        assert!(cookie.starts_with(middleware::SESSION_COOKIE_NAME));
        assert!(cookie.contains("HttpOnly"));

        let json = body_json(response).await;
        assert_eq!(json["productIds"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_removing_unknown_cart_line_is_not_found() {
        let request = Request::builder()
            .method("DELETE")
            .uri("/api/cart/p1")
            .body(Body::empty())
            .unwrap();
        let response = app(offline_state()).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
