//! Allocation calculator
//!
//! Converts a target weight and a base capital into a whole-share purchase.
//! Fractional shares are never produced; the rounding residue is reported as
//! leftover cash.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::debug;

use core_kernel::Percentage;

use crate::arithmetic::{div, mul, sub};
use crate::error::PortfolioError;

/// Default gap, as a percentage of the share price, under which the
/// tolerance rule buys one extra share
pub const DEFAULT_ROUNDING_TOLERANCE_PERCENT: Decimal = dec!(10);

/// How a fractional share count is turned into a whole number of shares
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ShareRounding {
    /// Always round down; leftover cash is never negative
    #[default]
    Floor,
    /// Round down, then buy one more share when the cash gap to the next
    /// share is at most `percent`% of the share price
    Tolerance { percent: Decimal },
}

impl ShareRounding {
    /// Tolerance rounding with the default 10% threshold
    pub fn tolerance() -> Self {
        ShareRounding::Tolerance {
            percent: DEFAULT_ROUNDING_TOLERANCE_PERCENT,
        }
    }
}

/// Outcome of converting a weight into a share purchase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationResult {
    /// Ideal cash target: `weight / 100 * base_capital`
    pub allocated_amount: Decimal,
    /// Whole shares to buy
    pub quantity: u64,
    /// Real spend: `quantity * buy_price`
    pub actual_investment_amount: Decimal,
    /// Unspent part of the allocation, credited back to cash (never negative)
    pub leftover_amount: Decimal,
    /// Spend above the allocation caused by tolerance rounding
    pub overspend_amount: Decimal,
}

impl AllocationResult {
    /// Returns true if no share could be bought
    pub fn is_empty(&self) -> bool {
        self.quantity == 0
    }
}

/// Computes the whole-share purchase for a target weight
///
/// # Arguments
///
/// * `weight_percent` - Target weight, 0 to 100
/// * `buy_price` - Price per share, must be positive
/// * `base_capital` - Capital the weight applies to, must not be negative
/// * `rounding` - Share rounding rule
///
/// # Example
///
/// ```rust
/// use domain_portfolio::allocation::{calculate_allocation, ShareRounding};
/// use rust_decimal_macros::dec;
///
/// let result = calculate_allocation(dec!(25), dec!(100), dec!(10000), ShareRounding::Floor).unwrap();
/// assert_eq!(result.quantity, 25);
/// assert_eq!(result.leftover_amount, dec!(0));
/// ```
pub fn calculate_allocation(
    weight_percent: Decimal,
    buy_price: Decimal,
    base_capital: Decimal,
    rounding: ShareRounding,
) -> Result<AllocationResult, PortfolioError> {
    if buy_price <= Decimal::ZERO {
        return Err(PortfolioError::validation(
            "buy_price",
            format!("must be greater than zero, got {}", buy_price),
        ));
    }
    let weight = parse_weight("weight", weight_percent)?;
    if base_capital < Decimal::ZERO {
        return Err(PortfolioError::validation(
            "base_capital",
            format!("must not be negative, got {}", base_capital),
        ));
    }

    let allocated_amount = weight.checked_of(base_capital).ok_or_else(|| {
        PortfolioError::Calculation(format!("{} of {} is out of range", weight, base_capital))
    })?;
    let mut quantity = whole_shares(div(allocated_amount, buy_price)?)?;

    if let ShareRounding::Tolerance { percent } = rounding {
        let residue = sub(allocated_amount, mul(Decimal::from(quantity), buy_price)?)?;
        let gap = sub(buy_price, residue)?;
        let threshold = div(mul(buy_price, percent)?, Decimal::ONE_HUNDRED)?;
        if residue > Decimal::ZERO && gap <= threshold {
            quantity = quantity
                .checked_add(1)
                .ok_or_else(|| PortfolioError::Calculation("share count out of range".to_string()))?;
        }
    }

    let actual_investment_amount = mul(Decimal::from(quantity), buy_price)?;
    let difference = sub(allocated_amount, actual_investment_amount)?;

    let result = AllocationResult {
        allocated_amount,
        quantity,
        actual_investment_amount,
        leftover_amount: difference.max(Decimal::ZERO),
        overspend_amount: (-difference).max(Decimal::ZERO),
    };

    debug!(
        weight = %weight_percent,
        price = %buy_price,
        base = %base_capital,
        quantity = result.quantity,
        leftover = %result.leftover_amount,
        "allocation computed"
    );

    Ok(result)
}

/// Parses a 0..=100 weight, reporting a failure against `field`
pub(crate) fn parse_weight(field: &str, value: Decimal) -> Result<Percentage, PortfolioError> {
    Percentage::new(value).map_err(|_| {
        PortfolioError::validation(field, format!("must be between 0 and 100, got {}", value))
    })
}

/// Floors a non-negative share count into a `u64`
pub(crate) fn whole_shares(value: Decimal) -> Result<u64, PortfolioError> {
    value
        .floor()
        .to_u64()
        .ok_or_else(|| PortfolioError::Calculation(format!("share count {} out of range", value)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_allocation() {
        let r = calculate_allocation(dec!(25), dec!(100), dec!(10000), ShareRounding::Floor).unwrap();
        assert_eq!(r.allocated_amount, dec!(2500));
        assert_eq!(r.quantity, 25);
        assert_eq!(r.actual_investment_amount, dec!(2500));
        assert_eq!(r.leftover_amount, dec!(0));
        assert_eq!(r.overspend_amount, dec!(0));
    }

    #[test]
    fn test_price_above_allocation_buys_nothing() {
        let r = calculate_allocation(dec!(10), dec!(333), dec!(1000), ShareRounding::Floor).unwrap();
        assert_eq!(r.allocated_amount, dec!(100));
        assert_eq!(r.quantity, 0);
        assert!(r.is_empty());
        assert_eq!(r.actual_investment_amount, dec!(0));
        assert_eq!(r.leftover_amount, dec!(100));
    }

    #[test]
    fn test_zero_capital_is_not_an_error() {
        let r = calculate_allocation(dec!(50), dec!(10), dec!(0), ShareRounding::Floor).unwrap();
        assert_eq!(r.quantity, 0);
        assert_eq!(r.leftover_amount, dec!(0));
    }

    #[test]
    fn test_tolerance_buys_almost_affordable_share() {
        // 1000 / 105 = 9 shares, residue 55, gap 50 > 10.5 so no extra share
        let r = calculate_allocation(dec!(10), dec!(105), dec!(10000), ShareRounding::tolerance()).unwrap();
        assert_eq!(r.quantity, 9);

        // 1000 / 101 = 9 shares, residue 91, gap 10 <= 10.1 so round up
        let r = calculate_allocation(dec!(10), dec!(101), dec!(10000), ShareRounding::tolerance()).unwrap();
        assert_eq!(r.quantity, 10);
        assert_eq!(r.actual_investment_amount, dec!(1010));
        assert_eq!(r.leftover_amount, dec!(0));
        assert_eq!(r.overspend_amount, dec!(10));
    }

    #[test]
    fn test_tolerance_ignores_exact_fit() {
        let r = calculate_allocation(dec!(25), dec!(100), dec!(10000), ShareRounding::tolerance()).unwrap();
        assert_eq!(r.quantity, 25);
        assert_eq!(r.overspend_amount, dec!(0));
    }

    #[test]
    fn test_rejects_non_positive_price() {
        let err = calculate_allocation(dec!(10), dec!(0), dec!(1000), ShareRounding::Floor).unwrap_err();
        assert_eq!(err.field(), Some("buy_price"));
    }

    #[test]
    fn test_rejects_weight_out_of_range() {
        let err = calculate_allocation(dec!(100.5), dec!(10), dec!(1000), ShareRounding::Floor).unwrap_err();
        assert_eq!(err.field(), Some("weight"));
    }

    #[test]
    fn test_share_count_overflow_is_an_error() {
        // 1e28 of capital at 1e-10 per share is far beyond any share count
        let capital = Decimal::from_i128_with_scale(10_i128.pow(28), 0);
        let err = calculate_allocation(dec!(100), Decimal::new(1, 10), capital, ShareRounding::Floor)
            .unwrap_err();
        assert!(matches!(err, PortfolioError::Calculation(_)));

        let err = calculate_allocation(dec!(100), dec!(0.5), Decimal::MAX, ShareRounding::tolerance())
            .unwrap_err();
        assert!(matches!(err, PortfolioError::Calculation(_)));
    }

    #[test]
    fn test_rounding_serde_shape() {
        let json = serde_json::to_string(&ShareRounding::tolerance()).unwrap();
        assert_eq!(json, r#"{"mode":"tolerance","percent":"10"}"#);
    }
}
