//! Overflow-checked decimal arithmetic
//!
//! `Decimal`'s operators panic when a result leaves the 96-bit range. Prices,
//! quantities and capital arrive from callers unbounded, so every product,
//! quotient and running total in this crate goes through these helpers and
//! surfaces as [`PortfolioError::Calculation`].

use rust_decimal::Decimal;

use crate::error::PortfolioError;

pub(crate) fn add(a: Decimal, b: Decimal) -> Result<Decimal, PortfolioError> {
    a.checked_add(b).ok_or_else(|| out_of_range(a, "+", b))
}

pub(crate) fn sub(a: Decimal, b: Decimal) -> Result<Decimal, PortfolioError> {
    a.checked_sub(b).ok_or_else(|| out_of_range(a, "-", b))
}

pub(crate) fn mul(a: Decimal, b: Decimal) -> Result<Decimal, PortfolioError> {
    a.checked_mul(b).ok_or_else(|| out_of_range(a, "*", b))
}

/// Division; a zero divisor is reported the same way as overflow
pub(crate) fn div(a: Decimal, b: Decimal) -> Result<Decimal, PortfolioError> {
    a.checked_div(b).ok_or_else(|| out_of_range(a, "/", b))
}

pub(crate) fn sum(values: impl IntoIterator<Item = Decimal>) -> Result<Decimal, PortfolioError> {
    values.into_iter().try_fold(Decimal::ZERO, add)
}

fn out_of_range(a: Decimal, op: &str, b: Decimal) -> PortfolioError {
    PortfolioError::Calculation(format!("{} {} {} is out of range", a, op, b))
}
