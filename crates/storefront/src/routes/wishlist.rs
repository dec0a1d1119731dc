//! Wishlist route handlers.
//!
//! The wishlist is a set of product ids attached to the visitor's session.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use tilestore_core::{Product, ProductId, Wishlist};
use tracing::instrument;

use crate::error::{AppError, Result, add_breadcrumb};
use crate::middleware::Visitor;
use crate::services::catalog;
use crate::state::AppState;

/// Body of `POST /api/wishlist`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToWishlist {
    #[serde(alias = "product_id")]
    pub product_id: ProductId,
}

/// Wishlist as returned to the visitor.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistResponse {
    pub product_ids: Vec<ProductId>,
    /// Wishlisted products still in the catalog, in wishlist order.
    pub products: Vec<Product>,
}

async fn respond(state: &AppState, wishlist: &Wishlist) -> WishlistResponse {
    if wishlist.is_empty() {
        return WishlistResponse {
            product_ids: Vec::new(),
            products: Vec::new(),
        };
    }

    let products = match state.backend().get_products().await {
        Ok(all) => catalog::resolve_products(&all, wishlist.product_ids())
            .into_iter()
            .cloned()
            .collect(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to resolve wishlist products");
            Vec::new()
        }
    };

    WishlistResponse {
        product_ids: wishlist.product_ids().to_vec(),
        products,
    }
}

/// Show the wishlist.
#[instrument(skip(state, session))]
pub async fn show(
    State(state): State<AppState>,
    Visitor(session): Visitor,
) -> Result<Json<WishlistResponse>> {
    let wishlist = state.wishlists().wishlist(session).await?;
    Ok(Json(respond(&state, &wishlist).await))
}

/// Add a product. 201 when added, 200 when it was already there.
#[instrument(skip(state, session, body), fields(product_id = %body.product_id))]
pub async fn add(
    State(state): State<AppState>,
    Visitor(session): Visitor,
    Json(body): Json<AddToWishlist>,
) -> Result<(StatusCode, Json<WishlistResponse>)> {
    if catalog::find_product(state.backend(), &body.product_id)
        .await?
        .is_none()
    {
        return Err(AppError::NotFound(format!(
            "Product {} not found",
            body.product_id
        )));
    }

    let added = state
        .wishlists()
        .add_to_wishlist(session, body.product_id.clone())
        .await?;
    add_breadcrumb("wishlist", "Added to wishlist", &[("product_id", body.product_id.as_str())]);

    let wishlist = state.wishlists().wishlist(session).await?;
    let status = if added { StatusCode::CREATED } else { StatusCode::OK };
    Ok((status, Json(respond(&state, &wishlist).await)))
}

/// Remove a product. 204 when removed, 404 when it was not wishlisted.
#[instrument(skip(state, session))]
pub async fn remove(
    State(state): State<AppState>,
    Visitor(session): Visitor,
    Path(product_id): Path<ProductId>,
) -> Result<StatusCode> {
    if state
        .wishlists()
        .remove_from_wishlist(session, &product_id)
        .await?
    {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!(
            "Product {product_id} is not in the wishlist"
        )))
    }
}
