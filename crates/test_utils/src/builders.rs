//! Test Data Builders
//!
//! Provides builder patterns for constructing test data with sensible defaults.
//! These builders allow tests to specify only the relevant fields while using
//! defaults for everything else.

use fake::faker::company::en::CompanyName;
use fake::faker::lorem::en::Sentence;
use fake::Fake;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use core_kernel::{Currency, PortfolioId};
use domain_portfolio::{HoldingsReconciler, NewHolding, Portfolio, ReconcilerSettings};
use domain_tips::{Tip, TipAction, TipCategory};
use infra_store::{InMemoryPortfolioRepository, InMemoryTipRepository};

/// Builder for portfolios, optionally with holdings bought through the
/// reconciler
pub struct TestPortfolioBuilder {
    name: String,
    min_investment: Decimal,
    currency: Currency,
    holdings: Vec<NewHolding>,
    settings: ReconcilerSettings,
}

impl Default for TestPortfolioBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestPortfolioBuilder {
    /// Creates a builder with a random name and 10000 of capital
    pub fn new() -> Self {
        let company: String = CompanyName().fake();
        Self {
            name: format!("{} Portfolio", company),
            min_investment: dec!(10000),
            currency: Currency::INR,
            holdings: Vec::new(),
            settings: ReconcilerSettings::default(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_min_investment(mut self, amount: Decimal) -> Self {
        self.min_investment = amount;
        self
    }

    pub fn with_currency(mut self, currency: Currency) -> Self {
        self.currency = currency;
        self
    }

    /// Queues a holding to be added in order
    pub fn with_holding(mut self, symbol: &str, weight: Decimal, buy_price: Decimal) -> Self {
        self.holdings.push(NewHolding {
            symbol: symbol.to_string(),
            sector: "Diversified".to_string(),
            weight,
            buy_price,
        });
        self
    }

    pub fn with_settings(mut self, settings: ReconcilerSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Builds the portfolio
    ///
    /// # Panics
    ///
    /// Panics if any queued holding is rejected by the reconciler
    pub fn build(self) -> Portfolio {
        let reconciler = HoldingsReconciler::new(self.settings);
        let start = Portfolio::new(self.name, self.min_investment).with_currency(self.currency);

        self.holdings.into_iter().fold(start, |portfolio, holding| {
            let symbol = holding.symbol.clone();
            match reconciler.add_holding(&portfolio, holding) {
                Ok(outcome) => outcome.portfolio,
                Err(e) => panic!("builder could not add {}: {}", symbol, e),
            }
        })
    }

    /// Builds the portfolio and stores it in a fresh repository
    pub async fn build_in_repository(self) -> (Portfolio, InMemoryPortfolioRepository) {
        let portfolio = self.build();
        let repo = InMemoryPortfolioRepository::with_portfolios(vec![portfolio.clone()]).await;
        (portfolio, repo)
    }
}

/// Builder for advisory tips
pub struct TestTipBuilder {
    title: String,
    symbol: String,
    action: TipAction,
    entry_price: Decimal,
    target_price: Decimal,
    stop_loss: Option<Decimal>,
    category: TipCategory,
    portfolio_id: Option<PortfolioId>,
    exit_price: Option<Option<Decimal>>,
}

impl Default for TestTipBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestTipBuilder {
    /// Creates a basic buy tip at 100 targeting 120
    pub fn new() -> Self {
        Self {
            title: Sentence(3..6).fake(),
            symbol: "INFY".to_string(),
            action: TipAction::Buy,
            entry_price: dec!(100),
            target_price: dec!(120),
            stop_loss: None,
            category: TipCategory::Basic,
            portfolio_id: None,
            exit_price: None,
        }
    }

    pub fn with_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.symbol = symbol.into();
        self
    }

    /// Sets action and price levels together so they stay consistent
    pub fn with_levels(mut self, action: TipAction, entry: Decimal, target: Decimal) -> Self {
        self.action = action;
        self.entry_price = entry;
        self.target_price = target;
        self
    }

    pub fn with_stop_loss(mut self, stop_loss: Decimal) -> Self {
        self.stop_loss = Some(stop_loss);
        self
    }

    pub fn premium(mut self) -> Self {
        self.category = TipCategory::Premium;
        self
    }

    pub fn for_portfolio(mut self, portfolio_id: PortfolioId) -> Self {
        self.portfolio_id = Some(portfolio_id);
        self
    }

    /// Closes the tip on build
    pub fn closed(mut self, exit_price: Option<Decimal>) -> Self {
        self.exit_price = Some(exit_price);
        self
    }

    /// Builds the tip
    ///
    /// # Panics
    ///
    /// Panics if closing the tip fails
    pub fn build(self) -> Tip {
        let mut tip = Tip::new(
            self.title,
            self.symbol,
            self.action,
            self.entry_price,
            self.target_price,
        )
        .with_category(self.category);

        if let Some(stop_loss) = self.stop_loss {
            tip = tip.with_stop_loss(stop_loss);
        }
        if let Some(portfolio_id) = self.portfolio_id {
            tip = tip.with_portfolio(portfolio_id);
        }
        if let Some(exit_price) = self.exit_price {
            if let Err(e) = tip.close(exit_price) {
                panic!("builder could not close tip: {}", e);
            }
        }
        tip
    }

    /// Builds the tip and stores it in a fresh repository
    pub async fn build_in_repository(self) -> (Tip, InMemoryTipRepository) {
        use domain_tips::TipPort;

        let tip = self.build();
        let repo = InMemoryTipRepository::new();
        if let Err(e) = repo.create(tip.clone()).await {
            panic!("builder could not store tip: {}", e);
        }
        (tip, repo)
    }
}
