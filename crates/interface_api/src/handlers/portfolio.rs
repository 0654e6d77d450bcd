//! Portfolio handlers

use axum::{extract::{Path, State}, http::StatusCode, Json};
use chrono::Utc;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use core_kernel::PortfolioId;
use domain_portfolio::{calculate_allocation, Portfolio, PortfolioValuation};
use domain_tips::TipQuery;

use crate::{AppState, error::ApiError};
use crate::dto::portfolio::*;

/// Creates a new portfolio funded with its minimum investment
pub async fn create_portfolio(
    State(state): State<AppState>,
    Json(request): Json<CreatePortfolioRequest>,
) -> Result<(StatusCode, Json<PortfolioResponse>), ApiError> {
    request.validate()?;

    let mut portfolio = Portfolio::new(request.name.trim(), request.min_investment);
    if let Some(description) = request.description {
        portfolio = portfolio.with_description(description);
    }
    if let Some(currency) = request.currency {
        portfolio = portfolio.with_currency(currency);
    }
    portfolio.validate()?;

    let created = state.portfolios.create(portfolio).await?;
    info!(id = %created.id, name = %created.name, "portfolio created");

    Ok((StatusCode::CREATED, Json(PortfolioResponse::try_from(&created)?)))
}

/// Lists portfolios, oldest first
pub async fn list_portfolios(
    State(state): State<AppState>,
) -> Result<Json<Vec<PortfolioResponse>>, ApiError> {
    let portfolios = state.portfolios.list().await?;
    let responses = portfolios
        .iter()
        .map(PortfolioResponse::try_from)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Json(responses))
}

/// Gets a portfolio by ID
pub async fn get_portfolio(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<PortfolioResponse>, ApiError> {
    let portfolio = state.portfolios.get(PortfolioId::from(id)).await?;
    Ok(Json(PortfolioResponse::try_from(&portfolio)?))
}

/// Updates name, description or minimum investment
pub async fn update_portfolio(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdatePortfolioRequest>,
) -> Result<Json<PortfolioResponse>, ApiError> {
    request.validate()?;

    let _guard = state.portfolio_lock.lock().await;
    let mut portfolio = state.portfolios.get(PortfolioId::from(id)).await?;

    if let Some(name) = request.name {
        portfolio.name = name.trim().to_string();
    }
    if let Some(description) = request.description {
        portfolio.description = Some(description);
    }
    if let Some(min_investment) = request.min_investment {
        portfolio.set_min_investment(min_investment)?;
    }
    portfolio.validate()?;
    portfolio.updated_at = Utc::now();

    let updated = state.portfolios.update(portfolio).await?;
    Ok(Json(PortfolioResponse::try_from(&updated)?))
}

/// Deletes a portfolio and detaches its tips
pub async fn delete_portfolio(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let id = PortfolioId::from(id);

    let _portfolio_guard = state.portfolio_lock.lock().await;
    let _tip_guard = state.tip_lock.lock().await;
    state.portfolios.get(id).await?;

    for mut tip in state.tips.list(TipQuery::by_portfolio(id)).await? {
        tip.portfolio_id = None;
        state.tips.update(tip).await?;
    }
    state.portfolios.delete(id).await?;

    info!(%id, "portfolio deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Values cash and holdings in the portfolio currency
pub async fn get_valuation(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<PortfolioValuation>, ApiError> {
    let portfolio = state.portfolios.get(PortfolioId::from(id)).await?;
    Ok(Json(portfolio.valuation()?))
}

/// Sizes a prospective holding against the portfolio without changing it
pub async fn preview_allocation(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<AllocationPreviewRequest>,
) -> Result<Json<AllocationPreviewResponse>, ApiError> {
    request.validate()?;

    let portfolio = state.portfolios.get(PortfolioId::from(id)).await?;
    let base_capital = portfolio.base_capital()?;
    let allocation = calculate_allocation(
        request.weight,
        request.buy_price,
        base_capital,
        state.reconciler.settings().share_rounding,
    )?;

    let remaining_weight = portfolio.remaining_weight();
    let affordable = !allocation.is_empty()
        && request.weight <= remaining_weight
        && allocation.actual_investment_amount <= portfolio.cash_balance;

    Ok(Json(AllocationPreviewResponse {
        stage: portfolio.stage(),
        base_capital,
        remaining_weight,
        cash_balance: portfolio.cash_balance,
        affordable,
        allocation,
    }))
}
