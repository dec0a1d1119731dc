//! Product management handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use tilestore_core::catalog::{self, CatalogPage, CatalogQuery};
use tilestore_core::{Product, ProductId};
use tracing::instrument;

use crate::backend::ProductInput;
use crate::error::{AppError, Result};
use crate::middleware::RequireAdminToken;
use crate::state::AppState;

/// Product listing with the same filters, sort and paging as the storefront.
///
/// Unlike the storefront, a backend failure is reported rather than served
/// as an empty page.
#[instrument(skip_all)]
pub async fn index(
    RequireAdminToken(token): RequireAdminToken,
    State(state): State<AppState>,
    Query(query): Query<CatalogQuery>,
) -> Result<Json<CatalogPage<Product>>> {
    let page = query.page_request()?;
    let products = state.backend().list_products(&token).await?;
    Ok(Json(catalog::search(
        &products,
        &query.filter(),
        query.sort,
        page,
    )))
}

/// Create a product.
#[instrument(skip_all)]
pub async fn create(
    RequireAdminToken(token): RequireAdminToken,
    State(state): State<AppState>,
    Json(input): Json<ProductInput>,
) -> Result<(StatusCode, Json<Product>)> {
    let input = input.normalize().map_err(AppError::BadRequest)?;
    let product = state.backend().create_product(&token, &input).await?;
    tracing::info!(product_id = %product.id, slug = %product.slug, "Product created");
    Ok((StatusCode::CREATED, Json(product)))
}

/// Replace a product.
#[instrument(skip(token, state, input))]
pub async fn update(
    RequireAdminToken(token): RequireAdminToken,
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
    Json(input): Json<ProductInput>,
) -> Result<Json<Product>> {
    let input = input.normalize().map_err(AppError::BadRequest)?;
    let product = state.backend().update_product(&token, &id, &input).await?;
    Ok(Json(product))
}

/// Delete a product.
#[instrument(skip(token, state))]
pub async fn destroy(
    RequireAdminToken(token): RequireAdminToken,
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<StatusCode> {
    state.backend().delete_product(&token, &id).await?;
    tracing::info!(product_id = %id, "Product deleted");
    Ok(StatusCode::NO_CONTENT)
}
