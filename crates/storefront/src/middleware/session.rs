//! Visitor sessions.
//!
//! Sessions live in process memory (tower-sessions `MemoryStore`) and carry a
//! single value: the visitor's [`SessionKey`], minted on first use. Wishlist
//! and cart stores are keyed by it.

use axum::{extract::FromRequestParts, http::request::Parts};
use tilestore_core::SessionKey;
use tower_sessions::{Expiry, MemoryStore, Session, SessionManagerLayer};

use crate::config::StorefrontConfig;
use crate::error::AppError;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "tilestore_session";

/// Session field holding the visitor key.
const VISITOR_KEY: &str = "visitor";

/// Session expiry time in seconds (30 days).
const SESSION_EXPIRY_SECONDS: i64 = 30 * 24 * 60 * 60;

/// Create the session layer with an in-memory store.
#[must_use]
pub fn create_session_layer(config: &StorefrontConfig) -> SessionManagerLayer<MemoryStore> {
    session_layer(config.is_secure())
}

pub(crate) fn session_layer(secure: bool) -> SessionManagerLayer<MemoryStore> {
    SessionManagerLayer::new(MemoryStore::default())
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(secure)
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}

/// Extractor yielding the visitor's session key, creating one if needed.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(Visitor(session): Visitor, State(state): State<AppState>) -> Result<Json<Cart>> {
///     Ok(Json(state.carts().cart(session).await?))
/// }
/// ```
pub struct Visitor(pub SessionKey);

impl<S> FromRequestParts<S> for Visitor
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let session = parts
            .extensions
            .get::<Session>()
            .cloned()
            .ok_or_else(|| AppError::Internal("session layer missing".to_string()))?;

        if let Some(key) = session.get::<SessionKey>(VISITOR_KEY).await? {
            return Ok(Self(key));
        }

        let key = SessionKey::generate();
        session.insert(VISITOR_KEY, key).await?;
        tracing::debug!(visitor = %key, "New visitor session");
        Ok(Self(key))
    }
}
