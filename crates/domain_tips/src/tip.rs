//! Advisory tip aggregate

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use core_kernel::{PortfolioId, TipId};

use crate::error::TipError;

/// Audience a tip is published to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TipCategory {
    Basic,
    Premium,
}

/// Recommended action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TipAction {
    Buy,
    Sell,
    Hold,
    PartialProfit,
}

/// Tip lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TipStatus {
    Active,
    Closed,
}

impl fmt::Display for TipStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TipStatus::Active => f.write_str("active"),
            TipStatus::Closed => f.write_str("closed"),
        }
    }
}

/// A stock recommendation, optionally tied to a model portfolio
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tip {
    pub id: TipId,
    pub portfolio_id: Option<PortfolioId>,
    pub title: String,
    pub stock_symbol: String,
    pub category: TipCategory,
    pub action: TipAction,
    pub status: TipStatus,
    pub entry_price: Decimal,
    pub target_price: Decimal,
    pub stop_loss: Option<Decimal>,
    /// Free-text holding horizon, e.g. "6-12 months"
    pub horizon: Option<String>,
    pub content: String,
    /// Price at which the tip was closed
    pub exit_price: Option<Decimal>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub closed_at: Option<DateTime<Utc>>,
}

impl Tip {
    /// Creates an active tip
    pub fn new(
        title: impl Into<String>,
        stock_symbol: impl Into<String>,
        action: TipAction,
        entry_price: Decimal,
        target_price: Decimal,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: TipId::new_v7(),
            portfolio_id: None,
            title: title.into(),
            stock_symbol: stock_symbol.into().trim().to_uppercase(),
            category: TipCategory::Basic,
            action,
            status: TipStatus::Active,
            entry_price,
            target_price,
            stop_loss: None,
            horizon: None,
            content: String::new(),
            exit_price: None,
            created_at: now,
            updated_at: now,
            closed_at: None,
        }
    }

    pub fn with_category(mut self, category: TipCategory) -> Self {
        self.category = category;
        self
    }

    pub fn with_portfolio(mut self, portfolio_id: PortfolioId) -> Self {
        self.portfolio_id = Some(portfolio_id);
        self
    }

    pub fn with_stop_loss(mut self, stop_loss: Decimal) -> Self {
        self.stop_loss = Some(stop_loss);
        self
    }

    pub fn with_horizon(mut self, horizon: impl Into<String>) -> Self {
        self.horizon = Some(horizon.into());
        self
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    /// Checks field presence and price ordering
    ///
    /// Prices must be positive. A buy tip must target above its entry and
    /// place its stop-loss below it; a sell tip the reverse.
    pub fn validate(&self) -> Result<(), TipError> {
        if self.title.trim().is_empty() {
            return Err(TipError::validation("title", "is required"));
        }
        if self.stock_symbol.is_empty() {
            return Err(TipError::validation("stock_symbol", "is required"));
        }
        if self.entry_price <= Decimal::ZERO {
            return Err(TipError::validation("entry_price", "must be greater than zero"));
        }
        if self.target_price <= Decimal::ZERO {
            return Err(TipError::validation("target_price", "must be greater than zero"));
        }
        if let Some(stop) = self.stop_loss {
            if stop <= Decimal::ZERO {
                return Err(TipError::validation("stop_loss", "must be greater than zero"));
            }
        }

        if self.upside_percent().is_none() {
            return Err(TipError::validation("target_price", "is out of range for the entry price"));
        }

        match self.action {
            TipAction::Buy => {
                if self.target_price <= self.entry_price {
                    return Err(TipError::validation("target_price", "must be above entry for a buy"));
                }
                if self.stop_loss.is_some_and(|s| s >= self.entry_price) {
                    return Err(TipError::validation("stop_loss", "must be below entry for a buy"));
                }
            }
            TipAction::Sell => {
                if self.target_price >= self.entry_price {
                    return Err(TipError::validation("target_price", "must be below entry for a sell"));
                }
                if self.stop_loss.is_some_and(|s| s <= self.entry_price) {
                    return Err(TipError::validation("stop_loss", "must be above entry for a sell"));
                }
            }
            TipAction::Hold | TipAction::PartialProfit => {}
        }
        Ok(())
    }

    pub fn is_active(&self) -> bool {
        self.status == TipStatus::Active
    }

    /// Expected move from entry to target, in percent
    ///
    /// `None` for a zero entry or a move too large to represent; a tip that
    /// passes [`Tip::validate`] always has one.
    pub fn upside_percent(&self) -> Option<Decimal> {
        percent_move(self.entry_price, self.target_price)
    }

    /// Move from entry to exit, in percent, once closed
    pub fn realized_return_percent(&self) -> Option<Decimal> {
        percent_move(self.entry_price, self.exit_price?)
    }

    /// Closes an active tip at `exit_price`
    pub fn close(&mut self, exit_price: Option<Decimal>) -> Result<(), TipError> {
        if self.status == TipStatus::Closed {
            return Err(TipError::InvalidStatusTransition {
                from: self.status.to_string(),
                to: TipStatus::Closed.to_string(),
            });
        }
        if let Some(price) = exit_price {
            if price <= Decimal::ZERO {
                return Err(TipError::validation("exit_price", "must be greater than zero"));
            }
            if percent_move(self.entry_price, price).is_none() {
                return Err(TipError::validation("exit_price", "is out of range for the entry price"));
            }
        }
        let now = Utc::now();
        self.status = TipStatus::Closed;
        self.exit_price = exit_price;
        self.closed_at = Some(now);
        self.updated_at = now;

        debug!(id = %self.id, symbol = %self.stock_symbol, exit = ?exit_price, "tip closed");
        Ok(())
    }
}

fn percent_move(from: Decimal, to: Decimal) -> Option<Decimal> {
    to.checked_sub(from)?
        .checked_div(from)?
        .checked_mul(Decimal::ONE_HUNDRED)
        .map(|p| p.round_dp(2))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_tip_creation() {
        let tip = Tip::new("Accumulate on dips", " reliance ", TipAction::Buy, dec!(2400), dec!(2800))
            .with_stop_loss(dec!(2250))
            .with_category(TipCategory::Premium);

        assert_eq!(tip.stock_symbol, "RELIANCE");
        assert!(tip.is_active());
        assert!(tip.validate().is_ok());
        assert_eq!(tip.upside_percent(), Some(dec!(16.67)));
    }

    #[test]
    fn test_buy_target_must_exceed_entry() {
        let tip = Tip::new("Bad", "TCS", TipAction::Buy, dec!(100), dec!(90));
        assert!(matches!(
            tip.validate(),
            Err(TipError::Validation { ref field, .. }) if field == "target_price"
        ));
    }

    #[test]
    fn test_close_twice_fails() {
        let mut tip = Tip::new("Exit", "ITC", TipAction::Sell, dec!(450), dec!(400));
        tip.close(Some(dec!(405))).unwrap();
        assert_eq!(tip.realized_return_percent(), Some(dec!(-10)));
        assert!(matches!(
            tip.close(None),
            Err(TipError::InvalidStatusTransition { .. })
        ));
    }

    #[test]
    fn test_unrepresentable_moves_are_rejected() {
        let tip = Tip::new("Moonshot", "PENNY", TipAction::Buy, Decimal::new(1, 20), Decimal::MAX);
        assert_eq!(tip.upside_percent(), None);
        assert!(matches!(
            tip.validate(),
            Err(TipError::Validation { ref field, .. }) if field == "target_price"
        ));

        let mut tip = Tip::new("Penny", "PENNY", TipAction::Buy, Decimal::new(1, 20), dec!(1));
        assert!(tip.validate().is_ok());
        assert!(matches!(
            tip.close(Some(Decimal::MAX)),
            Err(TipError::Validation { ref field, .. }) if field == "exit_price"
        ));
        assert!(tip.is_active());
    }
}
