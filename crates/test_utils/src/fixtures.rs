//! Pre-built Test Fixtures
//!
//! Ready-to-use portfolios and tips with hand-checked numbers, for tests
//! that assert exact amounts.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use core_kernel::PortfolioId;
use domain_portfolio::{HoldingsReconciler, NewHolding, Portfolio};
use domain_tips::{Tip, TipAction, TipCategory};

/// Fixture for portfolio test data
pub struct PortfolioFixtures;

impl PortfolioFixtures {
    /// Minimum investment used by the fixtures
    pub fn min_investment() -> Decimal {
        dec!(10000)
    }

    /// A portfolio with no holdings and 10000 in cash
    pub fn empty() -> Portfolio {
        Portfolio::new("Fixture Growth", Self::min_investment())
    }

    /// 25% INFY at 100
    pub fn infy() -> NewHolding {
        NewHolding {
            symbol: "INFY".to_string(),
            sector: "IT".to_string(),
            weight: dec!(25),
            buy_price: dec!(100),
        }
    }

    /// 40% TCS at 200
    pub fn tcs() -> NewHolding {
        NewHolding {
            symbol: "TCS".to_string(),
            sector: "IT".to_string(),
            weight: dec!(40),
            buy_price: dec!(200),
        }
    }

    /// `empty()` after buying 25 INFY for 2500 and 20 TCS for 4000
    ///
    /// Cash 3500, active weight 65.
    pub fn invested() -> Portfolio {
        let reconciler = HoldingsReconciler::default();
        let with_infy = reconciler
            .add_holding(&Self::empty(), Self::infy())
            .expect("fixture INFY allocation")
            .portfolio;
        reconciler
            .add_holding(&with_infy, Self::tcs())
            .expect("fixture TCS allocation")
            .portfolio
    }
}

/// Fixture for tip test data
pub struct TipFixtures;

impl TipFixtures {
    /// Buy at 100 targeting 120 with a stop at 90
    pub fn buy() -> Tip {
        Tip::new("Breakout above resistance", "INFY", TipAction::Buy, dec!(100), dec!(120))
            .with_stop_loss(dec!(90))
            .with_horizon("3-6 months")
    }

    /// Sell at 500 targeting 450
    pub fn sell() -> Tip {
        Tip::new("Book profits", "TCS", TipAction::Sell, dec!(500), dec!(450))
    }

    /// Premium buy attached to a portfolio
    pub fn premium_for(portfolio_id: PortfolioId) -> Tip {
        Self::buy()
            .with_category(TipCategory::Premium)
            .with_portfolio(portfolio_id)
    }
}
