//! Error handling for the admin service.
//!
//! All handlers return `Result<T, AppError>`. Server errors are captured to
//! Sentry; clients receive `{"error": "..."}` with a safe message.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use tilestore_core::InvalidTransition;
use tilestore_core::catalog::PageError;

use crate::backend::BackendError;

/// Application-level error type for admin.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    /// The request conflicts with the resource's current state.
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<InvalidTransition> for AppError {
    fn from(err: InvalidTransition) -> Self {
        Self::Conflict(err.to_string())
    }
}

impl From<PageError> for AppError {
    fn from(err: PageError) -> Self {
        Self::BadRequest(err.to_string())
    }
}

impl AppError {
    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Backend(err) => match err {
                BackendError::NotFound(_) => StatusCode::NOT_FOUND,
                BackendError::Unauthorized => StatusCode::UNAUTHORIZED,
                BackendError::Forbidden => StatusCode::FORBIDDEN,
                BackendError::Rejected(_) => StatusCode::BAD_REQUEST,
                BackendError::RateLimited(_) => StatusCode::TOO_MANY_REQUESTS,
                _ => StatusCode::BAD_GATEWAY,
            },
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn client_message(&self) -> String {
        match self {
            Self::Backend(err) => match err {
                BackendError::NotFound(_) => "Not found".to_string(),
                BackendError::Unauthorized => "Unauthorized".to_string(),
                BackendError::Forbidden => "Forbidden".to_string(),
                BackendError::Rejected(msg) => msg.clone(),
                BackendError::RateLimited(_) => "Too many requests".to_string(),
                _ => "External service error".to_string(),
            },
            Self::NotFound(msg)
            | Self::Unauthorized(msg)
            | Self::BadRequest(msg)
            | Self::Conflict(msg) => msg.clone(),
            Self::Internal(_) => "Internal server error".to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        } else {
            tracing::debug!(error = %self, status = %status, "Request rejected");
        }

        (status, Json(json!({ "error": self.client_message() }))).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use tilestore_core::OrderStatus;

    use super::*;

    #[test]
    fn test_transition_is_conflict() {
        let err: AppError = OrderStatus::Delivered
            .transition_to(OrderStatus::Pending)
            .unwrap_err()
            .into();
        assert_eq!(err.status(), StatusCode::CONFLICT);
        assert_eq!(
            err.client_message(),
            "cannot move order from delivered to pending"
        );
    }

    #[test]
    fn test_backend_statuses() {
        assert_eq!(
            AppError::Backend(BackendError::Forbidden).status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AppError::Backend(BackendError::Rejected("dup".into())).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::Backend(BackendError::Status(500)).status(),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn test_internal_details_hidden() {
        let err = AppError::Internal("pool exhausted".to_string());
        assert_eq!(err.client_message(), "Internal server error");
    }
}
