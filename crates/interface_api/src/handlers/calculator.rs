//! Stateless calculator handlers

use axum::Json;
use validator::Validate;

use domain_portfolio::{calculate_allocation, calculate_pnl, AllocationResult, PnlBreakdown};

use crate::error::ApiError;
use crate::dto::calculator::*;

/// Whole-share allocation for a weight of some capital
pub async fn allocation(
    Json(request): Json<AllocationRequest>,
) -> Result<Json<AllocationResult>, ApiError> {
    request.validate()?;
    let result = calculate_allocation(
        request.weight_percent,
        request.buy_price,
        request.base_capital,
        request.rounding,
    )?;
    Ok(Json(result))
}

/// Realized P&L of selling part of a position
pub async fn pnl(Json(request): Json<PnlRequest>) -> Result<Json<PnlBreakdown>, ApiError> {
    request.validate()?;
    let breakdown = calculate_pnl(
        request.original_quantity,
        request.original_buy_price,
        request.current_market_price,
        request.proportion_to_sell,
    )?;
    Ok(Json(breakdown))
}
