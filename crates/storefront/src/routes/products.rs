//! Product route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use tilestore_core::Product;
use tilestore_core::catalog::{CatalogPage, CatalogQuery};
use tracing::instrument;

use crate::error::Result;
use crate::services::catalog;
use crate::state::AppState;

/// Catalog listing.
///
/// Query parameters: `keyword` (or `q`), `category`, comma separated `tags`,
/// `finishes`, `colors`, `roomTypes`, `sizes`, `minPrice`, `maxPrice`,
/// `sort`, `page`, `limit`.
#[instrument(skip(state, query))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<CatalogQuery>,
) -> Result<Json<CatalogPage<Product>>> {
    let page = catalog::list_products(state.backend(), &query).await?;
    Ok(Json(page))
}

/// Product detail by slug.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<Product>> {
    let product = state.backend().get_product(&slug).await?;
    Ok(Json(product))
}
