//! HTTP middleware stack for storefront.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. Rate limiting (governor, per client IP)
//! 3. `TraceLayer` (request span)
//! 4. Request ID (recorded into the span above)
//! 5. Session layer (tower-sessions, in-memory store)

pub mod auth;
pub mod rate_limit;
pub mod request_id;
pub mod session;

pub use auth::CustomerToken;
pub use rate_limit::api_rate_limiter;
pub use request_id::request_id_middleware;
pub use session::{SESSION_COOKIE_NAME, Visitor, create_session_layer};
