//! Request and response bodies
//!
//! Request types derive `Validate` and are checked before any domain call.

pub mod calculator;
pub mod holding;
pub mod portfolio;
pub mod tip;

use rust_decimal::Decimal;
use validator::ValidationError;

use core_kernel::Percentage;

fn invalid(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(message.into());
    error
}

pub(crate) fn validate_positive(value: &Decimal) -> Result<(), ValidationError> {
    if *value > Decimal::ZERO {
        Ok(())
    } else {
        Err(invalid("positive", "must be greater than zero"))
    }
}

pub(crate) fn validate_non_negative(value: &Decimal) -> Result<(), ValidationError> {
    if *value >= Decimal::ZERO {
        Ok(())
    } else {
        Err(invalid("non_negative", "must not be negative"))
    }
}

pub(crate) fn validate_percent(value: &Decimal) -> Result<(), ValidationError> {
    Percentage::new(*value)
        .map(|_| ())
        .map_err(|_| invalid("percent", "must be between 0 and 100"))
}
