//! Order management handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use tilestore_core::{Order, OrderId, OrderStatus};
use tracing::instrument;

use crate::backend::StatusUpdate;
use crate::error::Result;
use crate::middleware::RequireAdminToken;
use crate::state::AppState;

/// Order listing filter.
#[derive(Debug, Default, Deserialize)]
pub struct OrderListQuery {
    pub status: Option<OrderStatus>,
}

/// Orders, newest first, optionally restricted to one status.
///
/// The status is sent to the backend and applied again here, so a backend
/// that ignores the parameter still yields a correct list.
#[instrument(skip(token, state))]
pub async fn index(
    RequireAdminToken(token): RequireAdminToken,
    State(state): State<AppState>,
    Query(query): Query<OrderListQuery>,
) -> Result<Json<Vec<Order>>> {
    let mut orders = state.backend().list_orders(&token, query.status).await?;
    if let Some(status) = query.status {
        orders.retain(|order| order.status == status);
    }
    orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(Json(orders))
}

/// Order detail.
#[instrument(skip(token, state))]
pub async fn show(
    RequireAdminToken(token): RequireAdminToken,
    State(state): State<AppState>,
    Path(id): Path<OrderId>,
) -> Result<Json<Order>> {
    Ok(Json(state.backend().get_order(&token, &id).await?))
}

/// Move an order to a new status.
///
/// The transition is checked against the current status first; a disallowed
/// move is a 409 and the backend is never asked to apply it.
#[instrument(skip(token, state))]
pub async fn update_status(
    RequireAdminToken(token): RequireAdminToken,
    State(state): State<AppState>,
    Path(id): Path<OrderId>,
    Json(StatusUpdate { status }): Json<StatusUpdate>,
) -> Result<Json<Order>> {
    let order = state.backend().get_order(&token, &id).await?;
    let next = order.status.transition_to(status)?;

    let updated = state
        .backend()
        .update_order_status(&token, &id, next)
        .await?;

    tracing::info!(order_id = %id, from = %order.status, to = %next, "Order status changed");
    Ok(Json(updated))
}
