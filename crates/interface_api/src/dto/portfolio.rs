//! Portfolio DTOs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use core_kernel::Currency;
use domain_portfolio::{AllocationResult, Holding, LifecycleStage, Portfolio, PortfolioError};

use super::{validate_non_negative, validate_percent, validate_positive};

#[derive(Debug, Deserialize, Validate)]
pub struct CreatePortfolioRequest {
    #[validate(length(min = 1, max = 120))]
    pub name: String,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    #[validate(custom(function = "validate_non_negative"))]
    pub min_investment: Decimal,
    pub currency: Option<Currency>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdatePortfolioRequest {
    #[validate(length(min = 1, max = 120))]
    pub name: Option<String>,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    pub min_investment: Option<Decimal>,
}

#[derive(Debug, Serialize)]
pub struct PortfolioResponse {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub currency: Currency,
    pub stage: LifecycleStage,
    pub min_investment: Decimal,
    pub cash_balance: Decimal,
    pub realized_pnl: Decimal,
    pub total_weight: Decimal,
    pub remaining_weight: Decimal,
    pub base_capital: Decimal,
    pub holdings: Vec<Holding>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<&Portfolio> for PortfolioResponse {
    type Error = PortfolioError;

    fn try_from(portfolio: &Portfolio) -> Result<Self, Self::Error> {
        Ok(Self {
            id: *portfolio.id.as_uuid(),
            name: portfolio.name.clone(),
            description: portfolio.description.clone(),
            currency: portfolio.currency,
            stage: portfolio.stage(),
            min_investment: portfolio.min_investment,
            cash_balance: portfolio.cash_balance,
            realized_pnl: portfolio.realized_pnl,
            total_weight: portfolio.total_active_weight(),
            remaining_weight: portfolio.remaining_weight(),
            base_capital: portfolio.base_capital()?,
            holdings: portfolio.holdings.clone(),
            created_at: portfolio.created_at,
            updated_at: portfolio.updated_at,
        })
    }
}

/// Sizing question for a prospective holding
#[derive(Debug, Deserialize, Validate)]
pub struct AllocationPreviewRequest {
    #[validate(custom(function = "validate_percent"))]
    pub weight: Decimal,
    #[validate(custom(function = "validate_positive"))]
    pub buy_price: Decimal,
}

#[derive(Debug, Serialize)]
pub struct AllocationPreviewResponse {
    pub stage: LifecycleStage,
    pub base_capital: Decimal,
    pub remaining_weight: Decimal,
    pub cash_balance: Decimal,
    /// False when the purchase would breach weight capacity or cash
    pub affordable: bool,
    pub allocation: AllocationResult,
}
