//! Tip DTOs

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use domain_tips::{Tip, TipAction, TipCategory, TipQuery, TipStatus};

use super::validate_positive;

/// Largest page size served by list endpoints
pub const MAX_PAGE_SIZE: u32 = 100;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateTipRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(min = 1, max = 20))]
    pub stock_symbol: String,
    pub category: Option<TipCategory>,
    pub action: TipAction,
    #[validate(custom(function = "validate_positive"))]
    pub entry_price: Decimal,
    #[validate(custom(function = "validate_positive"))]
    pub target_price: Decimal,
    pub stop_loss: Option<Decimal>,
    #[validate(length(max = 60))]
    pub horizon: Option<String>,
    #[validate(length(max = 20000))]
    pub content: Option<String>,
    pub portfolio_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateTipRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    pub category: Option<TipCategory>,
    pub action: Option<TipAction>,
    pub entry_price: Option<Decimal>,
    pub target_price: Option<Decimal>,
    pub stop_loss: Option<Decimal>,
    #[validate(length(max = 60))]
    pub horizon: Option<String>,
    #[validate(length(max = 20000))]
    pub content: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CloseTipRequest {
    pub exit_price: Option<Decimal>,
}

/// Query string of `GET /tips`
#[derive(Debug, Default, Deserialize)]
pub struct TipListParams {
    pub portfolio_id: Option<Uuid>,
    pub status: Option<TipStatus>,
    pub category: Option<TipCategory>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

impl From<TipListParams> for TipQuery {
    fn from(params: TipListParams) -> Self {
        TipQuery {
            portfolio_id: params.portfolio_id.map(Into::into),
            status: params.status,
            category: params.category,
            limit: Some(params.limit.unwrap_or(MAX_PAGE_SIZE).min(MAX_PAGE_SIZE)),
            offset: params.offset,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TipResponse {
    #[serde(flatten)]
    pub tip: Tip,
    pub upside_percent: Option<Decimal>,
    pub realized_return_percent: Option<Decimal>,
}

impl From<Tip> for TipResponse {
    fn from(tip: Tip) -> Self {
        Self {
            upside_percent: tip.upside_percent(),
            realized_return_percent: tip.realized_return_percent(),
            tip,
        }
    }
}
