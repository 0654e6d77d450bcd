//! Custom Test Assertions
//!
//! Provides specialized assertion helpers for domain types that give
//! more meaningful error messages than standard assertions.

use std::collections::HashSet;

use rust_decimal::Decimal;

use domain_portfolio::{AllocationResult, PnlBreakdown, Portfolio};

/// Asserts that two decimals differ by at most `tolerance`
pub fn assert_decimal_approx_eq(actual: Decimal, expected: Decimal, tolerance: Decimal) {
    let diff = (actual - expected).abs();
    assert!(
        diff <= tolerance,
        "Decimals differ by more than tolerance: actual={}, expected={}, diff={}, tolerance={}",
        actual,
        expected,
        diff,
        tolerance
    );
}

/// Asserts that an allocation splits its amount exactly into spend and residue
pub fn assert_allocation_conserved(result: &AllocationResult) {
    assert_eq!(
        result.actual_investment_amount + result.leftover_amount - result.overspend_amount,
        result.allocated_amount,
        "allocation does not conserve: {:?}",
        result
    );
    assert!(
        result.leftover_amount >= Decimal::ZERO && result.overspend_amount >= Decimal::ZERO,
        "negative residue in {:?}",
        result
    );
    assert!(
        result.leftover_amount.is_zero() || result.overspend_amount.is_zero(),
        "both leftover and overspend set in {:?}",
        result
    );
}

/// Asserts that sold and remaining shares add up and P&L matches the prices
pub fn assert_pnl_consistent(original_quantity: u64, breakdown: &PnlBreakdown) {
    assert_eq!(
        breakdown.quantity_sold + breakdown.remaining_quantity,
        original_quantity,
        "shares not conserved: {:?}",
        breakdown
    );
    assert_eq!(
        breakdown.profit_loss,
        breakdown.sale_value - breakdown.original_cost,
        "profit_loss is not sale value minus cost: {:?}",
        breakdown
    );
}

/// Asserts the invariants every reconciled portfolio must satisfy
///
/// - total active weight is at most 100
/// - cash is never negative
/// - active symbols are unique (case-insensitive)
/// - no active holding has a negative weight or leftover
/// - the portfolio can be valued
pub fn assert_portfolio_invariants(portfolio: &Portfolio) {
    let weight = portfolio.total_active_weight();
    assert!(
        weight <= Decimal::ONE_HUNDRED,
        "total active weight {} exceeds 100 in portfolio {}",
        weight,
        portfolio.id
    );
    assert!(
        portfolio.cash_balance >= Decimal::ZERO,
        "negative cash {} in portfolio {}",
        portfolio.cash_balance,
        portfolio.id
    );
    assert!(
        portfolio.valuation().is_ok(),
        "portfolio {} cannot be valued",
        portfolio.id
    );

    let mut seen = HashSet::new();
    for holding in portfolio.active_holdings() {
        assert!(
            seen.insert(holding.symbol.to_uppercase()),
            "duplicate active symbol {}",
            holding.symbol
        );
        assert!(holding.weight >= Decimal::ZERO, "negative weight on {}", holding.symbol);
        assert!(
            holding.leftover_amount >= Decimal::ZERO,
            "negative leftover on {}",
            holding.symbol
        );
    }
}
