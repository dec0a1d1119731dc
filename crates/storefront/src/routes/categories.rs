//! Category route handlers.

use axum::{Json, extract::State};
use tilestore_core::Category;
use tracing::instrument;

use crate::error::Result;
use crate::services::catalog;
use crate::state::AppState;

/// Active categories sorted by level, weight and name.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<Category>>> {
    Ok(Json(catalog::active_categories(state.backend()).await?))
}
