//! Holding handlers
//!
//! Each handler reads the portfolio snapshot, lets the reconciler compute
//! the next one, and stores it. The portfolio lock is held throughout.

use axum::{extract::{Path, State}, http::StatusCode, Json};
use uuid::Uuid;
use validator::Validate;

use core_kernel::PortfolioId;
use domain_portfolio::{HoldingAction, HoldingsReconciler, NewHolding, Portfolio, PortfolioError, Reconciliation};

use crate::{AppState, error::ApiError};
use crate::dto::holding::*;

async fn reconcile<F>(state: &AppState, id: Uuid, change: F) -> Result<Reconciliation, ApiError>
where
    F: FnOnce(&HoldingsReconciler, &Portfolio) -> Result<Reconciliation, PortfolioError>,
{
    let _guard = state.portfolio_lock.lock().await;
    let portfolio = state.portfolios.get(PortfolioId::from(id)).await?;
    let outcome = change(&state.reconciler, &portfolio)?;
    state.portfolios.update(outcome.portfolio.clone()).await?;
    Ok(outcome)
}

/// Adds a new holding sized by weight
pub async fn add_holding(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<AddHoldingRequest>,
) -> Result<(StatusCode, Json<ReconciliationResponse>), ApiError> {
    request.validate()?;

    let holding: NewHolding = request.into();
    let outcome = reconcile(&state, id, |reconciler, portfolio| {
        reconciler.add_holding(portfolio, holding)
    })
    .await?;

    Ok((StatusCode::CREATED, Json(ReconciliationResponse::try_from(&outcome)?)))
}

/// Buys more, sells, holds or reweights an active holding
pub async fn edit_holding(
    State(state): State<AppState>,
    Path((id, symbol)): Path<(Uuid, String)>,
    Json(action): Json<HoldingAction>,
) -> Result<Json<ReconciliationResponse>, ApiError> {
    let outcome = reconcile(&state, id, |reconciler, portfolio| {
        reconciler.edit_holding(portfolio, &symbol, action)
    })
    .await?;

    Ok(Json(ReconciliationResponse::try_from(&outcome)?))
}

/// Cancels an active holding, returning its cost to cash
pub async fn remove_holding(
    State(state): State<AppState>,
    Path((id, symbol)): Path<(Uuid, String)>,
) -> Result<Json<ReconciliationResponse>, ApiError> {
    let outcome = reconcile(&state, id, |reconciler, portfolio| {
        reconciler.remove_holding(portfolio, &symbol)
    })
    .await?;

    Ok(Json(ReconciliationResponse::try_from(&outcome)?))
}
