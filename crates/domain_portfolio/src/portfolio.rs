//! Portfolio aggregate: holdings plus a cash balance

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::{Currency, Money, PortfolioId};

use crate::arithmetic::{add, sub, sum};
use crate::error::PortfolioError;
use crate::holding::Holding;

/// Which figure weights are measured against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleStage {
    /// No active holdings yet; weights apply to the minimum investment
    New,
    /// Weights apply to the current cash plus holdings value
    Existing,
}

/// An investment portfolio
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Portfolio {
    pub id: PortfolioId,
    pub name: String,
    pub description: Option<String>,
    pub currency: Currency,
    /// Capital the portfolio was set up with
    pub min_investment: Decimal,
    /// Uninvested cash, including rounding leftovers and sale proceeds
    pub cash_balance: Decimal,
    /// Realized profit or loss across every sell
    pub realized_pnl: Decimal,
    pub holdings: Vec<Holding>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Point-in-time valuation in the portfolio currency
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioValuation {
    pub cash: Money,
    pub invested_cost: Money,
    pub market_value: Money,
    pub unrealized_pnl: Money,
    pub realized_pnl: Money,
    pub total_value: Money,
    pub total_weight: Decimal,
}

impl Portfolio {
    /// Creates a portfolio whose cash balance starts at `min_investment`
    pub fn new(name: impl Into<String>, min_investment: Decimal) -> Self {
        let now = Utc::now();
        Self {
            id: PortfolioId::new_v7(),
            name: name.into(),
            description: None,
            currency: Currency::default(),
            min_investment,
            cash_balance: min_investment,
            realized_pnl: Decimal::ZERO,
            holdings: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Sets the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the currency
    pub fn with_currency(mut self, currency: Currency) -> Self {
        self.currency = currency;
        self
    }

    /// Checks the portfolio's own fields
    pub fn validate(&self) -> Result<(), PortfolioError> {
        if self.name.trim().is_empty() {
            return Err(PortfolioError::validation("name", "must not be empty"));
        }
        if self.min_investment < Decimal::ZERO {
            return Err(PortfolioError::validation("min_investment", "must not be negative"));
        }
        Ok(())
    }

    /// Holdings that have not been fully sold
    pub fn active_holdings(&self) -> impl Iterator<Item = &Holding> {
        self.holdings.iter().filter(|h| h.is_active())
    }

    /// Finds an active holding by symbol (case-insensitive)
    pub fn find_active(&self, symbol: &str) -> Option<&Holding> {
        self.active_holdings().find(|h| h.symbol.eq_ignore_ascii_case(symbol))
    }

    pub(crate) fn active_index(&self, symbol: &str) -> Option<usize> {
        self.holdings
            .iter()
            .position(|h| h.is_active() && h.symbol.eq_ignore_ascii_case(symbol))
    }

    pub fn stage(&self) -> LifecycleStage {
        if self.active_holdings().next().is_none() {
            LifecycleStage::New
        } else {
            LifecycleStage::Existing
        }
    }

    /// Sum of active weights
    pub fn total_active_weight(&self) -> Decimal {
        self.active_holdings().map(|h| h.weight).sum()
    }

    /// Weight still available for new allocations
    pub fn remaining_weight(&self) -> Decimal {
        (Decimal::ONE_HUNDRED - self.total_active_weight()).max(Decimal::ZERO)
    }

    /// Cost of all active positions
    pub fn total_invested(&self) -> Result<Decimal, PortfolioError> {
        sum(self.active_holdings().map(|h| h.actual_investment_amount))
    }

    pub fn holdings_market_value(&self) -> Result<Decimal, PortfolioError> {
        self.active_holdings()
            .try_fold(Decimal::ZERO, |total, h| add(total, h.market_value()?))
    }

    /// Capital that weights are measured against
    ///
    /// A new portfolio uses its minimum investment; an existing one uses its
    /// cash plus the market value of its holdings.
    pub fn base_capital(&self) -> Result<Decimal, PortfolioError> {
        match self.stage() {
            LifecycleStage::New => Ok(self.min_investment),
            LifecycleStage::Existing => add(self.cash_balance, self.holdings_market_value()?),
        }
    }

    /// Changes the minimum investment, moving the difference into cash
    pub fn set_min_investment(&mut self, min_investment: Decimal) -> Result<(), PortfolioError> {
        if min_investment < Decimal::ZERO {
            return Err(PortfolioError::validation("min_investment", "must not be negative"));
        }
        let cash = add(self.cash_balance, sub(min_investment, self.min_investment)?)?;
        if cash < Decimal::ZERO {
            return Err(PortfolioError::CapacityExceeded(format!(
                "minimum investment {} is below the {} already invested",
                min_investment,
                self.total_invested()?
            )));
        }
        self.cash_balance = cash;
        self.min_investment = min_investment;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Values the portfolio in its own currency
    ///
    /// # Errors
    ///
    /// Returns `Calculation` or `Money` if a figure leaves the `Decimal`
    /// range. The reconciler refuses to produce such a snapshot.
    pub fn valuation(&self) -> Result<PortfolioValuation, PortfolioError> {
        let money = |amount: Decimal| Money::new(amount, self.currency);

        let cash = money(self.cash_balance);
        let market_value = money(self.holdings_market_value()?);
        let unrealized = self
            .active_holdings()
            .map(|h| h.unrealized_pnl().map(money))
            .collect::<Result<Vec<Money>, _>>()?;

        Ok(PortfolioValuation {
            cash,
            invested_cost: money(self.total_invested()?),
            market_value,
            unrealized_pnl: Money::sum(self.currency, &unrealized)?,
            realized_pnl: money(self.realized_pnl),
            total_value: cash.checked_add(&market_value)?,
            total_weight: self.total_active_weight(),
        })
    }
}
