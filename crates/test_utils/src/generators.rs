//! Property-Based Test Generators
//!
//! Provides proptest strategies for generating random inputs that satisfy
//! the calculators' preconditions.

use proptest::prelude::*;
use rust_decimal::Decimal;

use domain_portfolio::{HoldingAction, NewHolding, ShareRounding};

/// Weight in percent, 0.01 to 100.00
pub fn weight_strategy() -> impl Strategy<Value = Decimal> {
    (1i64..=10_000i64).prop_map(|n| Decimal::new(n, 2))
}

/// Small weight that leaves room for several holdings, 1 to 30
pub fn small_weight_strategy() -> impl Strategy<Value = Decimal> {
    (100i64..=3_000i64).prop_map(|n| Decimal::new(n, 2))
}

/// Share price, 0.01 to 100000.00
pub fn price_strategy() -> impl Strategy<Value = Decimal> {
    (1i64..=10_000_000i64).prop_map(|n| Decimal::new(n, 2))
}

/// Base capital, 0 to 10 million
pub fn capital_strategy() -> impl Strategy<Value = Decimal> {
    (0i64..=1_000_000_000i64).prop_map(|n| Decimal::new(n, 2))
}

/// Sell proportion, 0 to 1 in steps of 0.0001
pub fn proportion_strategy() -> impl Strategy<Value = Decimal> {
    (0i64..=10_000i64).prop_map(|n| Decimal::new(n, 4))
}

pub fn quantity_strategy() -> impl Strategy<Value = u64> {
    0u64..1_000_000u64
}

pub fn share_rounding_strategy() -> impl Strategy<Value = ShareRounding> {
    prop_oneof![
        Just(ShareRounding::Floor),
        (0i64..=100i64).prop_map(|p| ShareRounding::Tolerance {
            percent: Decimal::from(p)
        }),
    ]
}

/// Stock symbol, 2 to 8 capital letters
pub fn symbol_strategy() -> impl Strategy<Value = String> {
    "[A-Z]{2,8}"
}

/// Request to open a position priced between 1 and 5000
pub fn new_holding_strategy() -> impl Strategy<Value = NewHolding> {
    (
        symbol_strategy(),
        small_weight_strategy(),
        (100i64..=500_000i64).prop_map(|n| Decimal::new(n, 2)),
    )
        .prop_map(|(symbol, weight, buy_price)| NewHolding {
            symbol,
            sector: "Generated".to_string(),
            weight,
            buy_price,
        })
}

/// Any holding edit with positive prices
pub fn holding_action_strategy() -> impl Strategy<Value = HoldingAction> {
    let price = || (100i64..=500_000i64).prop_map(|n| Decimal::new(n, 2));
    prop_oneof![
        (small_weight_strategy(), price())
            .prop_map(|(additional_weight, price)| HoldingAction::BuyMore { additional_weight, price }),
        (proportion_strategy(), price())
            .prop_map(|(proportion, market_price)| HoldingAction::PartialSell { proportion, market_price }),
        price().prop_map(|market_price| HoldingAction::Sell { market_price }),
        proptest::option::of(price()).prop_map(|current_price| HoldingAction::Hold { current_price }),
        (small_weight_strategy(), price())
            .prop_map(|(new_weight, market_price)| HoldingAction::Reweight { new_weight, market_price }),
    ]
}
