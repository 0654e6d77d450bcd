//! Profit-and-loss calculator for full and partial sells
//!
//! Shares sold are always rounded down: `floor(quantity * proportion)`, with
//! a proportion of 1 or more selling the whole position. This rule applies
//! everywhere a sell is computed.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::allocation::whole_shares;
use crate::arithmetic::{div, mul, sub};
use crate::error::PortfolioError;

/// Result of selling part or all of a position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PnlBreakdown {
    pub quantity_sold: u64,
    /// `quantity_sold * current_market_price`
    pub sale_value: Decimal,
    /// `quantity_sold * original_buy_price`
    pub original_cost: Decimal,
    pub profit_loss: Decimal,
    /// Profit as a percentage of cost, 0 when nothing was sold
    pub profit_loss_percent: Decimal,
    pub remaining_quantity: u64,
    pub remaining_value: Decimal,
}

impl PnlBreakdown {
    /// Returns true if the whole position was sold
    pub fn is_full_exit(&self) -> bool {
        self.remaining_quantity == 0
    }

    /// Returns true if the sale realized a gain
    pub fn is_profit(&self) -> bool {
        self.profit_loss > Decimal::ZERO
    }
}

/// Computes realized P&L for selling `proportion_to_sell` of a position
///
/// # Arguments
///
/// * `original_quantity` - Shares held before the sale
/// * `original_buy_price` - Cost basis per share, must be positive
/// * `current_market_price` - Sale price per share, must be positive
/// * `proportion_to_sell` - Fraction to sell; values above 1 sell everything
///
/// # Example
///
/// ```rust
/// use domain_portfolio::pnl::calculate_pnl;
/// use rust_decimal_macros::dec;
///
/// let pnl = calculate_pnl(100, dec!(50), dec!(80), dec!(0.5)).unwrap();
/// assert_eq!(pnl.quantity_sold, 50);
/// assert_eq!(pnl.profit_loss, dec!(1500));
/// ```
pub fn calculate_pnl(
    original_quantity: u64,
    original_buy_price: Decimal,
    current_market_price: Decimal,
    proportion_to_sell: Decimal,
) -> Result<PnlBreakdown, PortfolioError> {
    if original_buy_price <= Decimal::ZERO {
        return Err(PortfolioError::validation(
            "original_buy_price",
            format!("must be greater than zero, got {}", original_buy_price),
        ));
    }
    if current_market_price <= Decimal::ZERO {
        return Err(PortfolioError::validation(
            "current_market_price",
            format!("must be greater than zero, got {}", current_market_price),
        ));
    }
    if proportion_to_sell < Decimal::ZERO {
        return Err(PortfolioError::validation(
            "proportion_to_sell",
            format!("must be between 0 and 1, got {}", proportion_to_sell),
        ));
    }

    let quantity_sold = if proportion_to_sell >= Decimal::ONE {
        original_quantity
    } else {
        whole_shares(mul(Decimal::from(original_quantity), proportion_to_sell)?)?
    };

    let sold = Decimal::from(quantity_sold);
    let sale_value = mul(sold, current_market_price)?;
    let original_cost = mul(sold, original_buy_price)?;
    let profit_loss = sub(sale_value, original_cost)?;
    let profit_loss_percent = if original_cost > Decimal::ZERO {
        mul(div(profit_loss, original_cost)?, Decimal::ONE_HUNDRED)?.round_dp(4)
    } else {
        Decimal::ZERO
    };
    let remaining_quantity = original_quantity - quantity_sold;
    let remaining_value = mul(Decimal::from(remaining_quantity), current_market_price)?;

    let breakdown = PnlBreakdown {
        quantity_sold,
        sale_value,
        original_cost,
        profit_loss,
        profit_loss_percent,
        remaining_quantity,
        remaining_value,
    };

    debug!(
        sold = breakdown.quantity_sold,
        remaining = breakdown.remaining_quantity,
        profit_loss = %breakdown.profit_loss,
        "pnl computed"
    );

    Ok(breakdown)
}
