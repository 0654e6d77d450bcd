//! Profit reinvestment policy
//!
//! Whether realized gains grow the portfolio's investable capital is a
//! business decision. It is modelled as an explicit policy that the
//! reconciler applies after a sell, never as part of computing P&L.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::arithmetic::add;
use crate::error::PortfolioError;

/// What happens to realized profit after a sell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProfitReinvestment {
    /// Investable capital is left unchanged
    #[default]
    Disabled,
    /// Positive realized profit is added to the minimum-investment figure
    CompoundRealizedGains,
}

impl ProfitReinvestment {
    /// Amount of `profit_loss` added to investable capital under this policy
    ///
    /// Losses are never deducted.
    pub fn reinvested_amount(&self, profit_loss: Decimal) -> Decimal {
        match self {
            ProfitReinvestment::Disabled => Decimal::ZERO,
            ProfitReinvestment::CompoundRealizedGains => profit_loss.max(Decimal::ZERO),
        }
    }

    /// Returns the investable capital after applying this policy
    pub fn apply(&self, min_investment: Decimal, profit_loss: Decimal) -> Result<Decimal, PortfolioError> {
        add(min_investment, self.reinvested_amount(profit_loss))
    }
}
