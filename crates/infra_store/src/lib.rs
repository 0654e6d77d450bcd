//! Storage Infrastructure Layer
//!
//! Repository adapters implementing the domain ports. The adapters here keep
//! everything in process memory behind `tokio::sync::RwLock`; durable storage
//! can be added as another adapter without touching the domain crates.
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_store::InMemoryPortfolioRepository;
//! use domain_portfolio::PortfolioPort;
//! use std::sync::Arc;
//!
//! let repo: Arc<dyn PortfolioPort> = Arc::new(InMemoryPortfolioRepository::new());
//! ```

pub mod repositories;

pub use repositories::{InMemoryPortfolioRepository, InMemoryTipRepository};
