//! Calculator DTOs

use rust_decimal::Decimal;
use serde::Deserialize;
use validator::Validate;

use domain_portfolio::ShareRounding;

use super::{validate_non_negative, validate_percent, validate_positive};

#[derive(Debug, Deserialize, Validate)]
pub struct AllocationRequest {
    #[validate(custom(function = "validate_percent"))]
    pub weight_percent: Decimal,
    #[validate(custom(function = "validate_positive"))]
    pub buy_price: Decimal,
    #[validate(custom(function = "validate_non_negative"))]
    pub base_capital: Decimal,
    /// Defaults to floor rounding
    #[serde(default)]
    pub rounding: ShareRounding,
}

#[derive(Debug, Deserialize, Validate)]
pub struct PnlRequest {
    pub original_quantity: u64,
    #[validate(custom(function = "validate_positive"))]
    pub original_buy_price: Decimal,
    #[validate(custom(function = "validate_positive"))]
    pub current_market_price: Decimal,
    #[validate(custom(function = "validate_non_negative"))]
    pub proportion_to_sell: Decimal,
}
