//! Tip handlers

use axum::{extract::{Path, Query, State}, http::StatusCode, Json};
use chrono::Utc;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use core_kernel::{PortfolioId, TipId};
use domain_tips::{Tip, TipCategory, TipQuery};

use crate::{AppState, error::ApiError};
use crate::dto::tip::*;

/// Publishes a new tip
pub async fn create_tip(
    State(state): State<AppState>,
    Json(request): Json<CreateTipRequest>,
) -> Result<(StatusCode, Json<TipResponse>), ApiError> {
    request.validate()?;

    let mut tip = Tip::new(
        request.title.trim(),
        request.stock_symbol,
        request.action,
        request.entry_price,
        request.target_price,
    )
    .with_category(request.category.unwrap_or(TipCategory::Basic));

    // Held until the tip is stored so the portfolio cannot be deleted in between
    let _portfolio_guard = match request.portfolio_id {
        Some(portfolio_id) => {
            let guard = state.portfolio_lock.lock().await;
            let portfolio = state.portfolios.get(PortfolioId::from(portfolio_id)).await?;
            tip = tip.with_portfolio(portfolio.id);
            Some(guard)
        }
        None => None,
    };
    if let Some(stop_loss) = request.stop_loss {
        tip = tip.with_stop_loss(stop_loss);
    }
    if let Some(horizon) = request.horizon {
        tip = tip.with_horizon(horizon);
    }
    if let Some(content) = request.content {
        tip = tip.with_content(content);
    }
    tip.validate()?;

    let created = state.tips.create(tip).await?;
    info!(id = %created.id, symbol = %created.stock_symbol, "tip published");

    Ok((StatusCode::CREATED, Json(TipResponse::from(created))))
}

/// Lists tips, newest first
pub async fn list_tips(
    State(state): State<AppState>,
    Query(params): Query<TipListParams>,
) -> Result<Json<Vec<TipResponse>>, ApiError> {
    let tips = state.tips.list(params.into()).await?;
    Ok(Json(tips.into_iter().map(TipResponse::from).collect()))
}

/// Lists tips attached to one portfolio
pub async fn list_portfolio_tips(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<TipListParams>,
) -> Result<Json<Vec<TipResponse>>, ApiError> {
    let portfolio = state.portfolios.get(PortfolioId::from(id)).await?;

    let mut query = TipQuery::from(params);
    query.portfolio_id = Some(portfolio.id);
    let tips = state.tips.list(query).await?;
    Ok(Json(tips.into_iter().map(TipResponse::from).collect()))
}

/// Gets a tip by ID
pub async fn get_tip(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<TipResponse>, ApiError> {
    let tip = state.tips.get(TipId::from(id)).await?;
    Ok(Json(TipResponse::from(tip)))
}

/// Edits an active tip
pub async fn update_tip(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateTipRequest>,
) -> Result<Json<TipResponse>, ApiError> {
    request.validate()?;

    let _guard = state.tip_lock.lock().await;
    let mut tip = state.tips.get(TipId::from(id)).await?;
    if !tip.is_active() {
        return Err(ApiError::Conflict(format!("tip {} is closed", tip.id)));
    }

    if let Some(title) = request.title {
        tip.title = title.trim().to_string();
    }
    if let Some(category) = request.category {
        tip.category = category;
    }
    if let Some(action) = request.action {
        tip.action = action;
    }
    if let Some(entry_price) = request.entry_price {
        tip.entry_price = entry_price;
    }
    if let Some(target_price) = request.target_price {
        tip.target_price = target_price;
    }
    if let Some(stop_loss) = request.stop_loss {
        tip.stop_loss = Some(stop_loss);
    }
    if let Some(horizon) = request.horizon {
        tip.horizon = Some(horizon);
    }
    if let Some(content) = request.content {
        tip.content = content;
    }
    tip.validate()?;
    tip.updated_at = Utc::now();

    let updated = state.tips.update(tip).await?;
    Ok(Json(TipResponse::from(updated)))
}

/// Deletes a tip
pub async fn delete_tip(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let _guard = state.tip_lock.lock().await;
    state.tips.delete(TipId::from(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Closes an active tip at an optional exit price
pub async fn close_tip(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<CloseTipRequest>,
) -> Result<Json<TipResponse>, ApiError> {
    let _guard = state.tip_lock.lock().await;
    let mut tip = state.tips.get(TipId::from(id)).await?;
    tip.close(request.exit_price)?;

    let closed = state.tips.update(tip).await?;
    info!(id = %closed.id, exit = ?closed.exit_price, "tip closed");
    Ok(Json(TipResponse::from(closed)))
}
