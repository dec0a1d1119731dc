//! Health check handlers.

use axum::{extract::State, http::StatusCode};

use crate::state::AppState;

/// Liveness: the process is serving requests. Does not check dependencies.
pub async fn health() -> &'static str {
    "ok"
}

/// Readiness: the backend API answers. 503 otherwise.
pub async fn readiness(State(state): State<AppState>) -> StatusCode {
    match state.backend().ping().await {
        Ok(()) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "Backend API not ready");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}
