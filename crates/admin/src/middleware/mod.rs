//! HTTP middleware stack for admin.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. `TraceLayer` (request span)
//! 3. Request ID (recorded into the span above)
//!
//! Authentication is an extractor, not a layer: every `/api` handler takes
//! [`RequireAdminToken`].

pub mod auth;
pub mod request_id;

pub use auth::RequireAdminToken;
pub use request_id::request_id_middleware;
