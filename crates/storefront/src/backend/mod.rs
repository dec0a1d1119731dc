//! Backend REST API client.
//!
//! # Architecture
//!
//! - The backend API is the source of truth for products, categories, orders
//!   and coupons; the storefront never persists any of them
//! - Plain JSON over `reqwest`, bearer-token authenticated
//! - In-memory caching via `moka` for the product and category collections
//!
//! # Example
//!
//! ```rust,ignore
//! use tilestore_storefront::backend::BackendClient;
//!
//! let client = BackendClient::new(&config.backend, config.catalog_cache_ttl)?;
//! let products = client.get_products().await?;
//! ```

mod cache;
mod client;

pub use client::BackendClient;

use thiserror::Error;

/// Errors that can occur when talking to the backend API.
#[derive(Debug, Error)]
pub enum BackendError {
    /// HTTP request failed (connection, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The backend refused the credentials.
    #[error("Unauthorized")]
    Unauthorized,

    /// The backend rejected the request payload.
    #[error("Rejected: {0}")]
    Rejected(String),

    /// Rate limited by the backend.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// Any other non-success status.
    #[error("Backend returned HTTP {0}")]
    Status(u16),

    /// A request URL could not be built from the configured base URL.
    #[error("Invalid backend URL: {0}")]
    InvalidUrl(String),
}
