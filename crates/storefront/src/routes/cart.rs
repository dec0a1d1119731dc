//! Cart route handlers.
//!
//! Lines are keyed by product and optional variant; every mutation returns
//! the updated cart view.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use tilestore_core::{Product, ProductId, VariantId};
use tracing::instrument;

use crate::error::{AppError, Result, add_breadcrumb};
use crate::middleware::Visitor;
use crate::services::cart::CartView;
use crate::services::catalog;
use crate::state::AppState;

const fn default_quantity() -> u32 {
    1
}

/// Body of `POST /api/cart`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCart {
    #[serde(alias = "product_id")]
    pub product_id: ProductId,
    #[serde(default, alias = "variant_id")]
    pub variant_id: Option<VariantId>,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

/// Body of `PATCH /api/cart/{product_id}`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetQuantity {
    #[serde(default, alias = "variant_id")]
    pub variant_id: Option<VariantId>,
    pub quantity: u32,
}

/// Query of `DELETE /api/cart/{product_id}`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineSelector {
    #[serde(default, alias = "variant_id")]
    pub variant_id: Option<VariantId>,
}

async fn view(state: &AppState, cart: &tilestore_core::Cart) -> CartView {
    match state.backend().get_products().await {
        Ok(products) => CartView::new(cart, &products),
        Err(e) => {
            tracing::error!(error = %e, "Failed to price cart");
            CartView::new(cart, &[])
        }
    }
}

fn check_variant(product: &Product, variant_id: Option<&VariantId>) -> Result<()> {
    match variant_id {
        Some(id) if product.variant(id).is_none() => Err(AppError::NotFound(format!(
            "Product {} has no variant {id}",
            product.id
        ))),
        _ => Ok(()),
    }
}

/// Show the cart.
#[instrument(skip(state, session))]
pub async fn show(
    State(state): State<AppState>,
    Visitor(session): Visitor,
) -> Result<Json<CartView>> {
    let cart = state.carts().cart(session).await?;
    Ok(Json(view(&state, &cart).await))
}

/// Add a line (or more of an existing one).
#[instrument(skip(state, session, body), fields(product_id = %body.product_id, quantity = body.quantity))]
pub async fn add(
    State(state): State<AppState>,
    Visitor(session): Visitor,
    Json(body): Json<AddToCart>,
) -> Result<Json<CartView>> {
    let product = catalog::find_product(state.backend(), &body.product_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Product {} not found", body.product_id)))?;
    check_variant(&product, body.variant_id.as_ref())?;

    let cart = state
        .carts()
        .add_to_cart(session, body.product_id.clone(), body.variant_id, body.quantity)
        .await?;
    add_breadcrumb("cart", "Added to cart", &[("product_id", body.product_id.as_str())]);

    Ok(Json(view(&state, &cart).await))
}

/// Set a line's quantity; zero removes it.
#[instrument(skip(state, session, body), fields(quantity = body.quantity))]
pub async fn update(
    State(state): State<AppState>,
    Visitor(session): Visitor,
    Path(product_id): Path<ProductId>,
    Json(body): Json<SetQuantity>,
) -> Result<Json<CartView>> {
    let cart = state
        .carts()
        .set_quantity(session, &product_id, body.variant_id.as_ref(), body.quantity)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Product {product_id} is not in the cart")))?;

    Ok(Json(view(&state, &cart).await))
}

/// Remove a line.
#[instrument(skip(state, session))]
pub async fn remove(
    State(state): State<AppState>,
    Visitor(session): Visitor,
    Path(product_id): Path<ProductId>,
    Query(selector): Query<LineSelector>,
) -> Result<StatusCode> {
    if state
        .carts()
        .remove_from_cart(session, &product_id, selector.variant_id.as_ref())
        .await?
    {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!(
            "Product {product_id} is not in the cart"
        )))
    }
}
