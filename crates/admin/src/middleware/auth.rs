//! Admin bearer token extraction.
//!
//! The admin service keeps no users or sessions. Each request must carry
//! `Authorization: Bearer <token>`; the token is forwarded on every backend
//! call and the backend decides what the admin may do.

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use crate::error::AppError;

/// Extractor that requires a bearer token.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAdminToken(token): RequireAdminToken,
///     State(state): State<AppState>,
/// ) -> Result<Json<Vec<Order>>> {
///     Ok(Json(state.backend().list_orders(&token, None).await?))
/// }
/// ```
pub struct RequireAdminToken(pub String);

impl<S> FromRequestParts<S> for RequireAdminToken
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or_else(|| AppError::Unauthorized("Missing bearer token".to_string()))?;

        let value = header
            .to_str()
            .map_err(|_| AppError::Unauthorized("Malformed authorization header".to_string()))?;

        parse_bearer(value)
            .map(|token| Self(token.to_string()))
            .ok_or_else(|| AppError::Unauthorized("Expected a bearer token".to_string()))
    }
}

fn parse_bearer(value: &str) -> Option<&str> {
    let (scheme, token) = value.trim().split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::http::Request;

    use super::*;

    async fn extract(header: Option<&str>) -> Result<RequireAdminToken, AppError> {
        let mut builder = Request::builder().uri("/api/orders");
        if let Some(value) = header {
            builder = builder.header(AUTHORIZATION, value);
        }
        let (mut parts, ()) = builder.body(()).unwrap().into_parts();
        RequireAdminToken::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn test_bearer_token_is_extracted() {
        let RequireAdminToken(token) = extract(Some("Bearer admin-jwt")).await.unwrap();
        assert_eq!(token, "admin-jwt");
    }

    #[tokio::test]
    async fn test_missing_or_wrong_scheme_is_unauthorized() {
        for header in [None, Some("Basic YWRtaW4="), Some("Bearer   ")] {
            let err = extract(header).await.err().unwrap();
            assert!(matches!(err, AppError::Unauthorized(_)), "{header:?}");
        }
    }
}
