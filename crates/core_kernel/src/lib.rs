//! Core Kernel - Foundational types shared by the portfolio service
//!
//! This crate provides the building blocks used across all domain modules:
//! - Money and percentage types with precise decimal arithmetic
//! - Strongly-typed identifiers
//! - Port traits and the error type repository adapters return

pub mod money;
pub mod identifiers;
pub mod error;
pub mod ports;

pub use money::{Money, Currency, MoneyError, Percentage};
pub use identifiers::{PortfolioId, TipId, TradeId};
pub use error::CoreError;
pub use ports::{PortError, DomainPort, HealthCheckable, HealthCheckResult, AdapterHealth};
