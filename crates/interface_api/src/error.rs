//! API error handling

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use core_kernel::PortError;
use domain_portfolio::PortfolioError;
use domain_tips::TipError;

/// API error types
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Validation error: {0}")]
    Validation(String),

    /// Request body failed schema validation, one detail per field error
    #[error("Invalid request")]
    InvalidRequest(Vec<String>),
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<String>>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, message, details) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg, None),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg, None),
            ApiError::Internal(msg) => {
                error!(message = %msg, "internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", msg, None)
            }
            ApiError::Validation(msg) => (StatusCode::UNPROCESSABLE_ENTITY, "validation_error", msg, None),
            ApiError::InvalidRequest(details) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "validation_error",
                "Request validation failed".to_string(),
                Some(details),
            ),
        };

        let body = ErrorResponse {
            error: error_type.to_string(),
            message,
            details,
        };

        (status, Json(body)).into_response()
    }
}

impl From<PortError> for ApiError {
    fn from(err: PortError) -> Self {
        match err {
            PortError::NotFound { .. } => ApiError::NotFound(err.to_string()),
            PortError::Validation { .. } => ApiError::Validation(err.to_string()),
            PortError::Conflict { message } => ApiError::Conflict(message),
            PortError::Internal { .. } => ApiError::Internal(err.to_string()),
        }
    }
}

impl From<PortfolioError> for ApiError {
    fn from(err: PortfolioError) -> Self {
        match err {
            PortfolioError::Validation { .. } | PortfolioError::Calculation(_) => {
                ApiError::Validation(err.to_string())
            }
            PortfolioError::CapacityExceeded(_) | PortfolioError::DuplicateHolding(_) => {
                ApiError::Conflict(err.to_string())
            }
            PortfolioError::HoldingNotFound(_) | PortfolioError::PortfolioNotFound(_) => {
                ApiError::NotFound(err.to_string())
            }
            PortfolioError::Money(_) => ApiError::Internal(err.to_string()),
        }
    }
}

impl From<TipError> for ApiError {
    fn from(err: TipError) -> Self {
        match err {
            TipError::Validation { .. } => ApiError::Validation(err.to_string()),
            TipError::TipNotFound(_) => ApiError::NotFound(err.to_string()),
            TipError::InvalidStatusTransition { .. } => ApiError::Conflict(err.to_string()),
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut details: Vec<String> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| match &e.message {
                    Some(message) => format!("{}: {}", field, message),
                    None => format!("{}: {}", field, e.code),
                })
            })
            .collect();
        details.sort();
        ApiError::InvalidRequest(details)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: impl Into<ApiError>) -> StatusCode {
        err.into().into_response().status()
    }

    #[test]
    fn test_portfolio_error_statuses() {
        assert_eq!(
            status_of(PortfolioError::validation("weight", "too small")),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            status_of(PortfolioError::CapacityExceeded("over 100".into())),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(PortfolioError::DuplicateHolding("INFY".into())),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(PortfolioError::HoldingNotFound("INFY".into())),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_port_error_statuses() {
        assert_eq!(status_of(PortError::not_found("Tip", "x")), StatusCode::NOT_FOUND);
        assert_eq!(status_of(PortError::conflict("dup")), StatusCode::CONFLICT);
        assert_eq!(
            status_of(PortError::internal("boom")),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_tip_transition_is_conflict() {
        let err = TipError::InvalidStatusTransition {
            from: "closed".into(),
            to: "closed".into(),
        };
        assert_eq!(status_of(err), StatusCode::CONFLICT);
    }
}
