//! Tips domain errors

use thiserror::Error;

/// Errors that can occur in the tips domain
#[derive(Debug, Error)]
pub enum TipError {
    #[error("Invalid {field}: {message}")]
    Validation {
        field: String,
        message: String,
    },

    #[error("Tip not found: {0}")]
    TipNotFound(String),

    #[error("Invalid status transition from {from} to {to}")]
    InvalidStatusTransition {
        from: String,
        to: String,
    },
}

impl TipError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        TipError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }
}
