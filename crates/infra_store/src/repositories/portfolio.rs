//! Portfolio repository implementation

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

use core_kernel::{AdapterHealth, DomainPort, HealthCheckResult, HealthCheckable, PortError, PortfolioId};
use domain_portfolio::{Portfolio, PortfolioPort};

/// In-memory store of portfolio snapshots
#[derive(Debug, Clone, Default)]
pub struct InMemoryPortfolioRepository {
    portfolios: Arc<RwLock<HashMap<PortfolioId, Portfolio>>>,
}

impl InMemoryPortfolioRepository {
    /// Creates an empty repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populates with portfolios
    pub async fn with_portfolios(portfolios: Vec<Portfolio>) -> Self {
        let repo = Self::new();
        {
            let mut store = repo.portfolios.write().await;
            for portfolio in portfolios {
                store.insert(portfolio.id, portfolio);
            }
        }
        repo
    }
}

impl DomainPort for InMemoryPortfolioRepository {}

#[async_trait]
impl HealthCheckable for InMemoryPortfolioRepository {
    async fn health_check(&self) -> HealthCheckResult {
        let count = self.portfolios.read().await.len();
        HealthCheckResult {
            adapter_id: "in-memory-portfolios".to_string(),
            status: AdapterHealth::Healthy,
            message: Some(format!("{} portfolios", count)),
            checked_at: Utc::now(),
        }
    }
}

#[async_trait]
impl PortfolioPort for InMemoryPortfolioRepository {
    async fn get(&self, id: PortfolioId) -> Result<Portfolio, PortError> {
        self.portfolios
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| PortError::not_found("Portfolio", id))
    }

    async fn list(&self) -> Result<Vec<Portfolio>, PortError> {
        let mut portfolios: Vec<Portfolio> = self.portfolios.read().await.values().cloned().collect();
        portfolios.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(portfolios)
    }

    async fn create(&self, portfolio: Portfolio) -> Result<Portfolio, PortError> {
        let mut store = self.portfolios.write().await;
        if store.contains_key(&portfolio.id) {
            return Err(PortError::conflict(format!("portfolio {} already exists", portfolio.id)));
        }
        if store.values().any(|p| p.name.eq_ignore_ascii_case(&portfolio.name)) {
            return Err(PortError::conflict(format!("portfolio named '{}' already exists", portfolio.name)));
        }
        debug!(id = %portfolio.id, "portfolio stored");
        store.insert(portfolio.id, portfolio.clone());
        Ok(portfolio)
    }

    async fn update(&self, portfolio: Portfolio) -> Result<Portfolio, PortError> {
        let mut store = self.portfolios.write().await;
        if store
            .values()
            .any(|p| p.id != portfolio.id && p.name.eq_ignore_ascii_case(&portfolio.name))
        {
            return Err(PortError::conflict(format!("portfolio named '{}' already exists", portfolio.name)));
        }
        match store.get_mut(&portfolio.id) {
            Some(existing) => {
                *existing = portfolio.clone();
                Ok(portfolio)
            }
            None => Err(PortError::not_found("Portfolio", portfolio.id)),
        }
    }

    async fn delete(&self, id: PortfolioId) -> Result<(), PortError> {
        self.portfolios
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| PortError::not_found("Portfolio", id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_create_and_get() {
        let repo = InMemoryPortfolioRepository::new();
        let portfolio = Portfolio::new("Dividend Yield", dec!(50000));

        repo.create(portfolio.clone()).await.unwrap();
        let fetched = repo.get(portfolio.id).await.unwrap();
        assert_eq!(fetched, portfolio);
    }

    #[tokio::test]
    async fn test_duplicate_name_conflicts() {
        let repo = InMemoryPortfolioRepository::new();
        repo.create(Portfolio::new("Midcap", dec!(1000))).await.unwrap();
        let err = repo.create(Portfolio::new("MIDCAP", dec!(1000))).await.unwrap_err();
        assert!(matches!(err, PortError::Conflict { .. }));
    }

    #[tokio::test]
    async fn test_rename_onto_existing_name_conflicts() {
        let repo = InMemoryPortfolioRepository::new();
        repo.create(Portfolio::new("Midcap", dec!(1000))).await.unwrap();
        let mut other = repo.create(Portfolio::new("Smallcap", dec!(1000))).await.unwrap();

        other.name = "midcap".to_string();
        assert!(matches!(repo.update(other).await, Err(PortError::Conflict { .. })));
    }
}
