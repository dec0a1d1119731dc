//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                       - Liveness
//! GET    /health/ready                 - Readiness (backend reachable)
//!
//! # Catalog
//! GET    /api/products                 - Listing (filters, sort, page, limit)
//! GET    /api/products/{slug}          - Product detail
//! GET    /api/categories               - Active categories
//!
//! # Wishlist (session)
//! GET    /api/wishlist                 - Wishlist ids and products
//! POST   /api/wishlist                 - Add a product
//! DELETE /api/wishlist/{product_id}    - Remove a product
//!
//! # Cart (session)
//! GET    /api/cart                     - Cart lines and subtotal
//! POST   /api/cart                     - Add a line
//! PATCH  /api/cart/{product_id}        - Set quantity
//! DELETE /api/cart/{product_id}        - Remove a line
//!
//! # Orders
//! POST   /api/checkout                 - Place an order from the cart
//! GET    /api/orders                   - Order history (bearer token)
//! ```

pub mod cart;
pub mod categories;
pub mod checkout;
pub mod health;
pub mod orders;
pub mod products;
pub mod wishlist;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the catalog routes router.
pub fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(products::index))
        .route("/products/{slug}", get(products::show))
        .route("/categories", get(categories::index))
}

/// Create the wishlist routes router.
pub fn wishlist_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(wishlist::show).post(wishlist::add))
        .route("/{product_id}", axum::routing::delete(wishlist::remove))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show).post(cart::add))
        .route(
            "/{product_id}",
            axum::routing::patch(cart::update).delete(cart::remove),
        )
}

/// Create all `/api` routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(catalog_routes())
        .nest("/wishlist", wishlist_routes())
        .nest("/cart", cart_routes())
        .route("/checkout", post(checkout::place_order))
        .route("/orders", get(orders::index))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .nest("/api", api_routes())
}
