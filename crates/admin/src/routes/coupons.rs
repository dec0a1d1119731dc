//! Coupon management handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use tilestore_core::{Coupon, CouponId};
use tracing::instrument;

use crate::backend::CouponInput;
use crate::error::{AppError, Result};
use crate::middleware::RequireAdminToken;
use crate::state::AppState;

/// All coupons.
#[instrument(skip_all)]
pub async fn index(
    RequireAdminToken(token): RequireAdminToken,
    State(state): State<AppState>,
) -> Result<Json<Vec<Coupon>>> {
    Ok(Json(state.backend().list_coupons(&token).await?))
}

/// Create a coupon. Codes are stored upper-case and must be unique
/// regardless of case.
#[instrument(skip_all)]
pub async fn create(
    RequireAdminToken(token): RequireAdminToken,
    State(state): State<AppState>,
    Json(input): Json<CouponInput>,
) -> Result<(StatusCode, Json<Coupon>)> {
    let input = input.normalize().map_err(AppError::BadRequest)?;
    let existing = state.backend().list_coupons(&token).await?;
    if existing.iter().any(|c| c.matches_code(&input.code)) {
        return Err(AppError::Conflict(format!(
            "coupon {} already exists",
            input.code
        )));
    }
    let coupon = state.backend().create_coupon(&token, &input).await?;
    tracing::info!(code = %coupon.code, "Coupon created");
    Ok((StatusCode::CREATED, Json(coupon)))
}

/// Delete a coupon.
#[instrument(skip(token, state))]
pub async fn destroy(
    RequireAdminToken(token): RequireAdminToken,
    State(state): State<AppState>,
    Path(id): Path<CouponId>,
) -> Result<StatusCode> {
    state.backend().delete_coupon(&token, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
