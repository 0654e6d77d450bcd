//! Repository implementations for domain aggregates
//!
//! Each repository stores whole aggregate snapshots keyed by identifier.
//! Reads clone the snapshot out; writes replace it.

pub mod portfolio;
pub mod tip;

pub use portfolio::InMemoryPortfolioRepository;
pub use tip::InMemoryTipRepository;
