//! Portfolio Domain
//!
//! Investment portfolios made of whole-share stock holdings and a cash
//! balance.
//!
//! # Key Concepts
//!
//! - **Weight**: target percentage of portfolio capital for one holding
//! - **Allocation**: turning a weight into a whole-share purchase; the
//!   rounding residue stays in cash as the leftover amount
//! - **Realized P&L**: profit or loss locked in by selling shares
//! - **Average-cost basis**: buy price re-averaged across lots on buy-more
//!
//! # Share rounding
//!
//! Share counts are always floored, both when buying and when selling a
//! proportion of a position. Buying may optionally round up by one share
//! through [`ShareRounding::Tolerance`].
//!
//! # Example
//!
//! ```rust
//! use domain_portfolio::{HoldingsReconciler, NewHolding, Portfolio};
//! use rust_decimal_macros::dec;
//!
//! let reconciler = HoldingsReconciler::default();
//! let portfolio = Portfolio::new("Core", dec!(10000));
//! let out = reconciler.add_holding(&portfolio, NewHolding {
//!     symbol: "INFY".into(),
//!     sector: "IT".into(),
//!     weight: dec!(25),
//!     buy_price: dec!(100),
//! }).unwrap();
//! assert_eq!(out.portfolio.cash_balance, dec!(7500));
//! ```

pub mod allocation;
pub mod pnl;
pub mod reinvestment;
pub mod holding;
pub mod portfolio;
pub mod reconciler;
pub mod ports;
pub mod error;
mod arithmetic;

pub use allocation::{calculate_allocation, AllocationResult, ShareRounding, DEFAULT_ROUNDING_TOLERANCE_PERCENT};
pub use pnl::{calculate_pnl, PnlBreakdown};
pub use reinvestment::ProfitReinvestment;
pub use holding::{Holding, HoldingStatus};
pub use portfolio::{LifecycleStage, Portfolio, PortfolioValuation};
pub use reconciler::{
    HoldingAction, HoldingsReconciler, NewHolding, ReconcilerSettings, Reconciliation,
    SoldHoldingRetention, TradeRecord, TradeSide,
};
pub use ports::PortfolioPort;
pub use error::PortfolioError;
