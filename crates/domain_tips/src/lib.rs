//! Advisory Tips Domain
//!
//! Stock recommendations published to subscribers: an entry price, a target,
//! an optional stop-loss, and a lifecycle from active to closed.

pub mod tip;
pub mod ports;
pub mod error;

pub use tip::{Tip, TipAction, TipCategory, TipStatus};
pub use ports::{TipPort, TipQuery};
pub use error::TipError;
