//! A position in a single security

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::allocation::AllocationResult;
use crate::arithmetic::{mul, sub};
use crate::error::PortfolioError;

/// Lifecycle tag of a holding
///
/// Transitions are driven by the operator; any status may follow any other
/// except that a `Sell` holding is no longer active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HoldingStatus {
    #[serde(rename = "Fresh-Buy")]
    FreshBuy,
    #[serde(rename = "Hold")]
    Hold,
    #[serde(rename = "addon-buy")]
    AddonBuy,
    #[serde(rename = "partial-sell")]
    PartialSell,
    #[serde(rename = "Sell")]
    Sell,
}

impl fmt::Display for HoldingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            HoldingStatus::FreshBuy => "Fresh-Buy",
            HoldingStatus::Hold => "Hold",
            HoldingStatus::AddonBuy => "addon-buy",
            HoldingStatus::PartialSell => "partial-sell",
            HoldingStatus::Sell => "Sell",
        };
        f.write_str(tag)
    }
}

/// A position in one security within a portfolio
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    /// Ticker, unique among the portfolio's active holdings
    pub symbol: String,
    pub sector: String,
    /// Percentage of portfolio capital allocated (0-100)
    pub weight: Decimal,
    /// Average cost per share; re-averaged only when more shares are bought
    pub buy_price: Decimal,
    /// Price paid for the first lot
    pub original_buy_price: Decimal,
    /// Whole shares currently held
    pub quantity: u64,
    /// Shares bought across all lots, including those since sold
    pub total_quantity_owned: u64,
    pub allocated_amount: Decimal,
    pub actual_investment_amount: Decimal,
    pub leftover_amount: Decimal,
    /// Profit or loss locked in by sells so far
    pub realized_pnl: Decimal,
    /// Last known market price
    pub current_price: Option<Decimal>,
    pub status: HoldingStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub sold_at: Option<DateTime<Utc>>,
}

impl Holding {
    /// Creates a fresh holding from an allocation
    pub fn from_allocation(
        symbol: impl Into<String>,
        sector: impl Into<String>,
        weight: Decimal,
        buy_price: Decimal,
        allocation: &AllocationResult,
    ) -> Self {
        let now = Utc::now();
        Self {
            symbol: symbol.into(),
            sector: sector.into(),
            weight,
            buy_price,
            original_buy_price: buy_price,
            quantity: allocation.quantity,
            total_quantity_owned: allocation.quantity,
            allocated_amount: allocation.allocated_amount,
            actual_investment_amount: allocation.actual_investment_amount,
            leftover_amount: allocation.leftover_amount,
            realized_pnl: Decimal::ZERO,
            current_price: Some(buy_price),
            status: HoldingStatus::FreshBuy,
            created_at: now,
            updated_at: now,
            sold_at: None,
        }
    }

    /// Returns true unless the holding has been fully sold
    pub fn is_active(&self) -> bool {
        self.status != HoldingStatus::Sell
    }

    /// Price used for valuation: last known market price, else cost
    pub fn market_price(&self) -> Decimal {
        self.current_price.unwrap_or(self.buy_price)
    }

    pub fn market_value(&self) -> Result<Decimal, PortfolioError> {
        mul(Decimal::from(self.quantity), self.market_price())
    }

    /// Paper gain on shares still held
    pub fn unrealized_pnl(&self) -> Result<Decimal, PortfolioError> {
        mul(Decimal::from(self.quantity), sub(self.market_price(), self.buy_price)?)
    }

    /// Recomputes leftover cash from the allocated and invested amounts
    pub(crate) fn refresh_leftover(&mut self) {
        self.leftover_amount = (self.allocated_amount - self.actual_investment_amount).max(Decimal::ZERO);
    }

    /// Zeroes the position after a full exit
    pub(crate) fn mark_sold(&mut self, market_price: Decimal, at: DateTime<Utc>) {
        self.weight = Decimal::ZERO;
        self.quantity = 0;
        self.allocated_amount = Decimal::ZERO;
        self.actual_investment_amount = Decimal::ZERO;
        self.leftover_amount = Decimal::ZERO;
        self.current_price = Some(market_price);
        self.status = HoldingStatus::Sell;
        self.sold_at = Some(at);
        self.updated_at = at;
    }
}
