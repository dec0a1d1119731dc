//! Backend REST API client for admin operations.
//!
//! Every call carries the requesting admin's bearer token; the backend does
//! the authorization. Nothing is cached: admins always see current data.

mod client;
pub mod types;

pub use client::BackendClient;
pub use types::{CategoryInput, CouponInput, ProductInput, StatusUpdate, VariantInput};

use thiserror::Error;

/// Errors that can occur when calling the backend API.
#[derive(Debug, Error)]
pub enum BackendError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The backend refused the token.
    #[error("Unauthorized")]
    Unauthorized,

    /// The token is valid but lacks permission.
    #[error("Forbidden")]
    Forbidden,

    /// The backend rejected the payload (validation, duplicate slug, ...).
    #[error("Rejected: {0}")]
    Rejected(String),

    /// Rate limited by the backend.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// Any other non-success status.
    #[error("Backend returned HTTP {0}")]
    Status(u16),

    /// A request URL could not be built.
    #[error("Invalid backend URL: {0}")]
    InvalidUrl(String),
}
