//! Holding DTOs

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use domain_portfolio::{NewHolding, PortfolioError, Reconciliation, TradeRecord};

use super::portfolio::PortfolioResponse;
use super::validate_positive;

#[derive(Debug, Deserialize, Validate)]
pub struct AddHoldingRequest {
    #[validate(length(min = 1, max = 20))]
    pub symbol: String,
    #[validate(length(min = 1, max = 80))]
    pub sector: String,
    #[validate(custom(function = "validate_positive"))]
    pub weight: Decimal,
    #[validate(custom(function = "validate_positive"))]
    pub buy_price: Decimal,
}

impl From<AddHoldingRequest> for NewHolding {
    fn from(request: AddHoldingRequest) -> Self {
        NewHolding {
            symbol: request.symbol,
            sector: request.sector,
            weight: request.weight,
            buy_price: request.buy_price,
        }
    }
}

/// Portfolio after a holding change, with the trade it produced
#[derive(Debug, Serialize)]
pub struct ReconciliationResponse {
    pub portfolio: PortfolioResponse,
    pub trade: Option<TradeRecord>,
}

impl TryFrom<&Reconciliation> for ReconciliationResponse {
    type Error = PortfolioError;

    fn try_from(outcome: &Reconciliation) -> Result<Self, Self::Error> {
        Ok(Self {
            portfolio: PortfolioResponse::try_from(&outcome.portfolio)?,
            trade: outcome.trade.clone(),
        })
    }
}
