//! Category management handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use tilestore_core::{Category, CategoryId};
use tracing::instrument;

use crate::backend::CategoryInput;
use crate::error::{AppError, Result};
use crate::middleware::RequireAdminToken;
use crate::state::AppState;

/// All categories, inactive included, in display order.
#[instrument(skip_all)]
pub async fn index(
    RequireAdminToken(token): RequireAdminToken,
    State(state): State<AppState>,
) -> Result<Json<Vec<Category>>> {
    let mut categories = state.backend().list_categories(&token).await?;
    categories.sort_by(Category::display_order);
    Ok(Json(categories))
}

/// Create a category. The slug is derived from the name when absent.
#[instrument(skip_all)]
pub async fn create(
    RequireAdminToken(token): RequireAdminToken,
    State(state): State<AppState>,
    Json(input): Json<CategoryInput>,
) -> Result<(StatusCode, Json<Category>)> {
    let input = input.normalize().map_err(AppError::BadRequest)?;
    let category = state.backend().create_category(&token, &input).await?;
    tracing::info!(category_id = %category.id, slug = %category.slug, "Category created");
    Ok((StatusCode::CREATED, Json(category)))
}

/// Replace a category.
#[instrument(skip(token, state, input))]
pub async fn update(
    RequireAdminToken(token): RequireAdminToken,
    State(state): State<AppState>,
    Path(id): Path<CategoryId>,
    Json(input): Json<CategoryInput>,
) -> Result<Json<Category>> {
    let input = input.normalize().map_err(AppError::BadRequest)?;
    if input.parent.as_ref() == Some(&id) {
        return Err(AppError::BadRequest(
            "a category cannot be its own parent".to_string(),
        ));
    }
    Ok(Json(state.backend().update_category(&token, &id, &input).await?))
}

/// Delete a category.
#[instrument(skip(token, state))]
pub async fn destroy(
    RequireAdminToken(token): RequireAdminToken,
    State(state): State<AppState>,
    Path(id): Path<CategoryId>,
) -> Result<StatusCode> {
    state.backend().delete_category(&token, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
