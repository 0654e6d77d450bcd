//! Portfolio Domain Ports
//!
//! The repository interface handlers use to load and store portfolio
//! snapshots. The calculators and the reconciler never touch it.
//!
//! ```rust,ignore
//! use domain_portfolio::ports::PortfolioPort;
//! use std::sync::Arc;
//!
//! let port: Arc<dyn PortfolioPort> = Arc::new(InMemoryPortfolioRepository::new());
//! let portfolio = port.get(id).await?;
//! ```

use async_trait::async_trait;

use core_kernel::{DomainPort, HealthCheckable, PortError, PortfolioId};

use crate::portfolio::Portfolio;

/// Storage for portfolio snapshots
#[async_trait]
pub trait PortfolioPort: DomainPort + HealthCheckable {
    /// Retrieves a portfolio by ID, or `PortError::NotFound`
    async fn get(&self, id: PortfolioId) -> Result<Portfolio, PortError>;

    /// Lists all portfolios, oldest first
    async fn list(&self) -> Result<Vec<Portfolio>, PortError>;

    /// Stores a new portfolio; an existing ID is a conflict
    async fn create(&self, portfolio: Portfolio) -> Result<Portfolio, PortError>;

    /// Replaces a stored portfolio with a newer snapshot
    async fn update(&self, portfolio: Portfolio) -> Result<Portfolio, PortError>;

    /// Deletes a portfolio
    async fn delete(&self, id: PortfolioId) -> Result<(), PortError>;
}
