//! Order history handler.

use axum::{Json, extract::State};
use tilestore_core::Order;
use tracing::instrument;

use crate::error::Result;
use crate::middleware::CustomerToken;
use crate::state::AppState;

/// The caller's orders. The bearer token is forwarded to the backend, which
/// identifies the customer.
#[instrument(skip(state, token))]
pub async fn index(
    State(state): State<AppState>,
    CustomerToken(token): CustomerToken,
) -> Result<Json<Vec<Order>>> {
    Ok(Json(state.backend().get_my_orders(&token).await?))
}
