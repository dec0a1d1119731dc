//! HTTP route handlers for admin.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                   - Liveness
//! GET    /health/ready             - Readiness (backend reachable)
//!
//! # Products (bearer token)
//! GET    /api/products             - Listing (storefront catalog filters)
//! POST   /api/products             - Create
//! PUT    /api/products/{id}        - Update
//! DELETE /api/products/{id}        - Delete
//!
//! # Orders (bearer token)
//! GET    /api/orders               - Listing, optional ?status=
//! GET    /api/orders/{id}          - Detail
//! POST   /api/orders/{id}/status   - Status transition
//!
//! # Categories (bearer token)
//! GET    /api/categories           - Listing
//! POST   /api/categories           - Create
//! PUT    /api/categories/{id}      - Update
//! DELETE /api/categories/{id}      - Delete
//!
//! # Coupons (bearer token)
//! GET    /api/coupons              - Listing
//! POST   /api/coupons              - Create
//! DELETE /api/coupons/{id}         - Delete
//! ```

pub mod categories;
pub mod coupons;
pub mod health;
pub mod orders;
pub mod products;

use axum::{
    Router,
    routing::{delete, get, post, put},
};

use crate::state::AppState;

/// Create all `/api` routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(products::index).post(products::create))
        .route(
            "/products/{id}",
            put(products::update).delete(products::destroy),
        )
        .route("/orders", get(orders::index))
        .route("/orders/{id}", get(orders::show))
        .route("/orders/{id}/status", post(orders::update_status))
        .route(
            "/categories",
            get(categories::index).post(categories::create),
        )
        .route(
            "/categories/{id}",
            put(categories::update).delete(categories::destroy),
        )
        .route("/coupons", get(coupons::index).post(coupons::create))
        .route("/coupons/{id}", delete(coupons::destroy))
}

/// Create all routes for admin.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .nest("/api", api_routes())
}
