//! Checkout route handler.

use axum::{Json, extract::State, http::StatusCode};
use chrono::Utc;
use serde::Deserialize;
use tilestore_core::{Order, ShippingInfo};
use tracing::instrument;

use crate::backend::BackendError;
use crate::error::{AppError, Result, add_breadcrumb};
use crate::middleware::Visitor;
use crate::services::checkout::{CheckoutError, build_order};
use crate::state::AppState;

/// Body of `POST /api/checkout`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrder {
    pub shipping: ShippingInfo,
    #[serde(default, alias = "coupon_code")]
    pub coupon_code: Option<String>,
}

/// Place an order from the visitor's cart.
///
/// On success the cart is emptied and the created order returned with 201.
#[instrument(skip(state, session, body), fields(coupon = ?body.coupon_code))]
pub async fn place_order(
    State(state): State<AppState>,
    Visitor(session): Visitor,
    Json(body): Json<PlaceOrder>,
) -> Result<(StatusCode, Json<Order>)> {
    let cart = state.carts().cart(session).await?;
    if cart.is_empty() {
        return Err(CheckoutError::EmptyCart.into());
    }

    let products = state.backend().get_products().await?;

    let coupon = match body.coupon_code.as_deref().map(str::trim) {
        Some(code) if !code.is_empty() => match state.backend().get_coupon(code).await {
            Ok(coupon) => Some(coupon),
            Err(BackendError::NotFound(_)) => {
                return Err(CheckoutError::UnknownCoupon(code.to_string()).into());
            }
            Err(e) => return Err(AppError::Backend(e)),
        },
        _ => None,
    };

    let new_order = build_order(&cart, &products, coupon.as_ref(), body.shipping, Utc::now())?;
    let order = state.backend().create_order(&new_order).await?;

    state.carts().clear_cart(session).await?;
    // Stock changed upstream
    state.backend().invalidate_catalog().await;

    add_breadcrumb("checkout", "Order placed", &[("order_id", order.id.as_str())]);
    tracing::info!(order_id = %order.id, total = %order.totals.total, "Order placed");

    Ok((StatusCode::CREATED, Json(order)))
}
