//! Customer bearer token extraction.
//!
//! The storefront does not authenticate customers itself. Routes that act on
//! behalf of a customer forward the caller's `Authorization: Bearer` token to
//! the backend, which decides.

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use crate::error::AppError;

/// Extractor for a bearer token the backend will validate.
pub struct CustomerToken(pub String);

impl<S> FromRequestParts<S> for CustomerToken
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(parse_bearer)
            .map(|token| Self(token.to_string()))
            .ok_or_else(|| AppError::Unauthorized("Missing bearer token".to_string()))
    }
}

/// Token part of a `Bearer <token>` header value.
pub(crate) fn parse_bearer(value: &str) -> Option<&str> {
    let (scheme, token) = value.trim().split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}
