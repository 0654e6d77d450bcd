//! Tips Domain Ports

use async_trait::async_trait;

use core_kernel::{DomainPort, HealthCheckable, PortError, PortfolioId, TipId};

use crate::tip::{Tip, TipCategory, TipStatus};

/// Query parameters for listing tips
#[derive(Debug, Clone, Default)]
pub struct TipQuery {
    pub portfolio_id: Option<PortfolioId>,
    pub status: Option<TipStatus>,
    pub category: Option<TipCategory>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

impl TipQuery {
    /// Tips attached to one portfolio
    pub fn by_portfolio(portfolio_id: PortfolioId) -> Self {
        Self {
            portfolio_id: Some(portfolio_id),
            ..Default::default()
        }
    }

    /// Adds pagination to the query
    pub fn paginate(mut self, limit: u32, offset: u32) -> Self {
        self.limit = Some(limit);
        self.offset = Some(offset);
        self
    }

    /// Returns true if `tip` passes every filter set on this query
    pub fn matches(&self, tip: &Tip) -> bool {
        self.portfolio_id.map_or(true, |id| tip.portfolio_id == Some(id))
            && self.status.map_or(true, |s| tip.status == s)
            && self.category.map_or(true, |c| tip.category == c)
    }
}

/// Storage for advisory tips
#[async_trait]
pub trait TipPort: DomainPort + HealthCheckable {
    async fn get(&self, id: TipId) -> Result<Tip, PortError>;

    /// Lists tips matching `query`, newest first
    async fn list(&self, query: TipQuery) -> Result<Vec<Tip>, PortError>;

    async fn create(&self, tip: Tip) -> Result<Tip, PortError>;

    async fn update(&self, tip: Tip) -> Result<Tip, PortError>;

    async fn delete(&self, id: TipId) -> Result<(), PortError>;
}
