//! Portfolio domain errors

use thiserror::Error;

use core_kernel::MoneyError;

/// Errors that can occur in the portfolio domain
///
/// Every variant is recoverable: the caller corrects the input and retries.
#[derive(Debug, Error)]
pub enum PortfolioError {
    /// A field failed input validation
    #[error("Invalid {field}: {message}")]
    Validation {
        field: String,
        message: String,
    },

    /// Total weight or investment would exceed what the portfolio can hold
    #[error("Capacity exceeded: {0}")]
    CapacityExceeded(String),

    /// An active holding with the same symbol already exists
    #[error("Holding already exists: {0}")]
    DuplicateHolding(String),

    /// No active holding with this symbol
    #[error("Holding not found: {0}")]
    HoldingNotFound(String),

    #[error("Portfolio not found: {0}")]
    PortfolioNotFound(String),

    /// A numeric result fell outside the representable range
    #[error("Calculation error: {0}")]
    Calculation(String),

    #[error("Money error: {0}")]
    Money(#[from] MoneyError),
}

impl PortfolioError {
    /// Creates a validation error for a named field
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        PortfolioError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Returns the offending field for validation errors
    pub fn field(&self) -> Option<&str> {
        match self {
            PortfolioError::Validation { field, .. } => Some(field),
            _ => None,
        }
    }
}
