//! Holdings reconciler
//!
//! Merges calculator outputs into a portfolio snapshot. Every operation
//! takes the current snapshot by reference and returns a new one; a rejected
//! operation leaves the caller's snapshot untouched.
//!
//! Invariants maintained:
//! - total active weight never exceeds 100
//! - cash never goes negative, so total investment stays within capital
//! - `buy_price` is re-averaged on buys only; sells keep the cost basis
//! - every returned snapshot can be valued without leaving the `Decimal` range

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use core_kernel::TradeId;

use crate::allocation::{calculate_allocation, parse_weight, AllocationResult, ShareRounding};
use crate::arithmetic::{add, div, mul, sub};
use crate::error::PortfolioError;
use crate::holding::{Holding, HoldingStatus};
use crate::pnl::{calculate_pnl, PnlBreakdown};
use crate::portfolio::Portfolio;
use crate::reinvestment::ProfitReinvestment;

/// Prefix given to archived sold holdings
pub const SOLD_SYMBOL_PREFIX: &str = "Sold";

/// What happens to a holding once every share is sold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SoldHoldingRetention {
    /// Drop the record
    Remove,
    /// Keep it with zero weight and investment
    #[default]
    RetainZeroed,
    /// Keep it zeroed under a `Sold-<date>-<symbol>` symbol
    Archive,
}

/// Policies applied by the reconciler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ReconcilerSettings {
    pub share_rounding: ShareRounding,
    pub sold_retention: SoldHoldingRetention,
    pub reinvestment: ProfitReinvestment,
}

/// Request to open a new position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewHolding {
    pub symbol: String,
    pub sector: String,
    pub weight: Decimal,
    pub buy_price: Decimal,
}

/// Edit applied to an existing active holding
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum HoldingAction {
    /// Buy an additional lot sized by `additional_weight`
    BuyMore { additional_weight: Decimal, price: Decimal },
    /// Sell `proportion` (0-1] of the shares held
    PartialSell { proportion: Decimal, market_price: Decimal },
    /// Sell every share
    Sell { market_price: Decimal },
    /// Keep the position, optionally refreshing its market price
    Hold { current_price: Option<Decimal> },
    /// Move the holding to `new_weight`, buying or selling the difference
    ///
    /// Moving down sells `(current - new) / current` of the shares, floored
    /// like any other sell, and scales the weight by the shares actually
    /// kept. The resulting weight can therefore sit slightly above
    /// `new_weight`; the returned snapshot carries the weight that applies.
    Reweight { new_weight: Decimal, market_price: Decimal },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TradeSide {
    Buy,
    Sell,
}

/// Trade produced by a reconciliation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeRecord {
    pub id: TradeId,
    pub symbol: String,
    pub side: TradeSide,
    pub quantity: u64,
    pub price: Decimal,
    /// Cash moved by the trade
    pub amount: Decimal,
    /// Present for sells
    pub pnl: Option<PnlBreakdown>,
    /// Profit added to investable capital by the reinvestment policy
    pub reinvested: Decimal,
    pub executed_at: DateTime<Utc>,
}

/// New portfolio snapshot plus the trade that produced it, if any
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reconciliation {
    pub portfolio: Portfolio,
    pub trade: Option<TradeRecord>,
}

/// Applies holding changes to portfolio snapshots
#[derive(Debug, Clone, Copy, Default)]
pub struct HoldingsReconciler {
    settings: ReconcilerSettings,
}

impl HoldingsReconciler {
    pub fn new(settings: ReconcilerSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &ReconcilerSettings {
        &self.settings
    }

    /// Opens a new position sized by weight against the base capital
    ///
    /// # Errors
    ///
    /// * `Validation` - blank symbol or sector, non-positive weight or price,
    ///   or a weight too small to buy a single share
    /// * `DuplicateHolding` - the symbol is already active
    /// * `CapacityExceeded` - weight above what remains, or spend above cash
    pub fn add_holding(
        &self,
        portfolio: &Portfolio,
        request: NewHolding,
    ) -> Result<Reconciliation, PortfolioError> {
        let symbol = request.symbol.trim().to_uppercase();
        let sector = request.sector.trim().to_string();

        if symbol.is_empty() {
            return Err(PortfolioError::validation("symbol", "is required"));
        }
        if sector.is_empty() {
            return Err(PortfolioError::validation("sector", "is required"));
        }
        require_positive("weight", request.weight)?;
        require_positive("buy_price", request.buy_price)?;

        if portfolio.find_active(&symbol).is_some() {
            warn!(portfolio = %portfolio.id, %symbol, "rejected duplicate holding");
            return Err(PortfolioError::DuplicateHolding(symbol));
        }
        check_weight_capacity(portfolio, request.weight)?;

        let allocation = self.allocate(portfolio, request.weight, request.buy_price)?;
        check_cash(portfolio, &allocation)?;

        let mut next = portfolio.clone();
        let holding = Holding::from_allocation(
            symbol.clone(),
            sector,
            request.weight,
            request.buy_price,
            &allocation,
        );
        next.cash_balance = sub(next.cash_balance, allocation.actual_investment_amount)?;
        next.updated_at = holding.created_at;
        next.holdings.push(holding);

        info!(
            portfolio = %portfolio.id,
            %symbol,
            quantity = allocation.quantity,
            spend = %allocation.actual_investment_amount,
            "holding added"
        );

        let trade = buy_trade(&symbol, &allocation, request.buy_price);
        settled(next, Some(trade))
    }

    /// Applies an edit to the active holding `symbol`
    pub fn edit_holding(
        &self,
        portfolio: &Portfolio,
        symbol: &str,
        action: HoldingAction,
    ) -> Result<Reconciliation, PortfolioError> {
        let index = portfolio
            .active_index(symbol)
            .ok_or_else(|| PortfolioError::HoldingNotFound(symbol.to_string()))?;

        match action {
            HoldingAction::BuyMore { additional_weight, price } => {
                self.buy_more(portfolio, index, additional_weight, price)
            }
            HoldingAction::PartialSell { proportion, market_price } => {
                self.partial_sell(portfolio, index, proportion, market_price)
            }
            HoldingAction::Sell { market_price } => self.sell_all(portfolio, index, market_price),
            HoldingAction::Hold { current_price } => hold(portfolio, index, current_price),
            HoldingAction::Reweight { new_weight, market_price } => {
                self.reweight(portfolio, index, new_weight, market_price)
            }
        }
    }

    /// Drops an active holding outright and returns its cost to cash
    ///
    /// Used to cancel a position entered by mistake; no P&L is realized.
    pub fn remove_holding(
        &self,
        portfolio: &Portfolio,
        symbol: &str,
    ) -> Result<Reconciliation, PortfolioError> {
        let index = portfolio
            .active_index(symbol)
            .ok_or_else(|| PortfolioError::HoldingNotFound(symbol.to_string()))?;

        let mut next = portfolio.clone();
        let removed = next.holdings.remove(index);
        next.cash_balance = add(next.cash_balance, removed.actual_investment_amount)?;
        next.updated_at = Utc::now();

        info!(portfolio = %portfolio.id, symbol = %removed.symbol, "holding removed");
        settled(next, None)
    }

    fn allocate(
        &self,
        portfolio: &Portfolio,
        weight: Decimal,
        price: Decimal,
    ) -> Result<AllocationResult, PortfolioError> {
        let base_capital = portfolio.base_capital()?;
        let allocation =
            calculate_allocation(weight, price, base_capital, self.settings.share_rounding)?;
        if allocation.is_empty() {
            return Err(PortfolioError::validation(
                "weight",
                format!(
                    "{}% of {} does not buy a single share at {}",
                    weight, base_capital, price
                ),
            ));
        }
        Ok(allocation)
    }

    fn buy_more(
        &self,
        portfolio: &Portfolio,
        index: usize,
        additional_weight: Decimal,
        price: Decimal,
    ) -> Result<Reconciliation, PortfolioError> {
        require_positive("additional_weight", additional_weight)?;
        require_positive("price", price)?;
        check_weight_capacity(portfolio, additional_weight)?;

        let allocation = self.allocate(portfolio, additional_weight, price)?;
        check_cash(portfolio, &allocation)?;

        let mut next = portfolio.clone();
        let now = Utc::now();
        let holding = &mut next.holdings[index];

        let quantity = holding
            .quantity
            .checked_add(allocation.quantity)
            .ok_or_else(|| PortfolioError::Calculation("share count out of range".to_string()))?;
        holding.actual_investment_amount =
            add(holding.actual_investment_amount, allocation.actual_investment_amount)?;
        holding.buy_price = div(holding.actual_investment_amount, Decimal::from(quantity))?;
        holding.quantity = quantity;
        holding.total_quantity_owned = holding.total_quantity_owned.saturating_add(allocation.quantity);
        holding.weight = add(holding.weight, additional_weight)?;
        holding.allocated_amount = add(holding.allocated_amount, allocation.allocated_amount)?;
        holding.refresh_leftover();
        holding.current_price = Some(price);
        holding.status = HoldingStatus::AddonBuy;
        holding.updated_at = now;

        let symbol = holding.symbol.clone();
        info!(
            portfolio = %portfolio.id,
            %symbol,
            added = allocation.quantity,
            average_price = %holding.buy_price,
            "holding topped up"
        );

        next.cash_balance = sub(next.cash_balance, allocation.actual_investment_amount)?;
        next.updated_at = now;

        let trade = buy_trade(&symbol, &allocation, price);
        settled(next, Some(trade))
    }

    fn partial_sell(
        &self,
        portfolio: &Portfolio,
        index: usize,
        proportion: Decimal,
        market_price: Decimal,
    ) -> Result<Reconciliation, PortfolioError> {
        require_positive("proportion", proportion)?;
        if proportion > Decimal::ONE {
            return Err(PortfolioError::validation(
                "proportion",
                format!("must be at most 1, got {}", proportion),
            ));
        }

        let current = &portfolio.holdings[index];
        let pnl = calculate_pnl(current.quantity, current.buy_price, market_price, proportion)?;
        if pnl.quantity_sold == 0 {
            return Err(PortfolioError::validation(
                "proportion",
                format!(
                    "selling {} of {} shares rounds down to zero",
                    proportion, current.quantity
                ),
            ));
        }
        if pnl.is_full_exit() {
            return self.settle_full_exit(portfolio, index, market_price, pnl);
        }

        let mut next = portfolio.clone();
        let now = Utc::now();
        let holding = &mut next.holdings[index];

        let kept = div(Decimal::from(pnl.remaining_quantity), Decimal::from(holding.quantity))?;
        holding.weight = mul(holding.weight, kept)?;
        holding.allocated_amount = mul(holding.allocated_amount, kept)?;
        holding.quantity = pnl.remaining_quantity;
        holding.actual_investment_amount = mul(Decimal::from(holding.quantity), holding.buy_price)?;
        holding.refresh_leftover();
        holding.realized_pnl = add(holding.realized_pnl, pnl.profit_loss)?;
        holding.current_price = Some(market_price);
        holding.status = HoldingStatus::PartialSell;
        holding.updated_at = now;

        let symbol = holding.symbol.clone();
        let trade = self.book_sale(&mut next, &symbol, market_price, pnl, now)?;

        info!(
            portfolio = %portfolio.id,
            %symbol,
            sold = pnl.quantity_sold,
            remaining = pnl.remaining_quantity,
            profit_loss = %pnl.profit_loss,
            "holding partially sold"
        );

        settled(next, Some(trade))
    }

    fn sell_all(
        &self,
        portfolio: &Portfolio,
        index: usize,
        market_price: Decimal,
    ) -> Result<Reconciliation, PortfolioError> {
        let current = &portfolio.holdings[index];
        let pnl = calculate_pnl(current.quantity, current.buy_price, market_price, Decimal::ONE)?;
        self.settle_full_exit(portfolio, index, market_price, pnl)
    }

    fn settle_full_exit(
        &self,
        portfolio: &Portfolio,
        index: usize,
        market_price: Decimal,
        pnl: PnlBreakdown,
    ) -> Result<Reconciliation, PortfolioError> {
        let mut next = portfolio.clone();
        let now = Utc::now();
        let symbol = {
            let holding = &mut next.holdings[index];
            holding.realized_pnl = add(holding.realized_pnl, pnl.profit_loss)?;
            holding.mark_sold(market_price, now);
            holding.symbol.clone()
        };

        match self.settings.sold_retention {
            SoldHoldingRetention::Remove => {
                next.holdings.remove(index);
            }
            SoldHoldingRetention::RetainZeroed => {}
            SoldHoldingRetention::Archive => {
                next.holdings[index].symbol = archived_symbol(&symbol, now);
            }
        }

        let trade = self.book_sale(&mut next, &symbol, market_price, pnl, now)?;

        info!(
            portfolio = %portfolio.id,
            %symbol,
            sold = pnl.quantity_sold,
            profit_loss = %pnl.profit_loss,
            retention = ?self.settings.sold_retention,
            "holding sold"
        );

        settled(next, Some(trade))
    }

    /// Credits sale proceeds and realized P&L, then applies the
    /// reinvestment policy
    fn book_sale(
        &self,
        portfolio: &mut Portfolio,
        symbol: &str,
        market_price: Decimal,
        pnl: PnlBreakdown,
        at: DateTime<Utc>,
    ) -> Result<TradeRecord, PortfolioError> {
        portfolio.cash_balance = add(portfolio.cash_balance, pnl.sale_value)?;
        portfolio.realized_pnl = add(portfolio.realized_pnl, pnl.profit_loss)?;

        let reinvested = self.settings.reinvestment.reinvested_amount(pnl.profit_loss);
        portfolio.min_investment = self
            .settings
            .reinvestment
            .apply(portfolio.min_investment, pnl.profit_loss)?;
        portfolio.updated_at = at;

        Ok(TradeRecord {
            id: TradeId::new_v7(),
            symbol: symbol.to_string(),
            side: TradeSide::Sell,
            quantity: pnl.quantity_sold,
            price: market_price,
            amount: pnl.sale_value,
            pnl: Some(pnl),
            reinvested,
            executed_at: at,
        })
    }

    fn reweight(
        &self,
        portfolio: &Portfolio,
        index: usize,
        new_weight: Decimal,
        market_price: Decimal,
    ) -> Result<Reconciliation, PortfolioError> {
        let new_weight = parse_weight("new_weight", new_weight)?.value();
        require_positive("market_price", market_price)?;

        let current_weight = portfolio.holdings[index].weight;
        if new_weight.is_zero() {
            self.sell_all(portfolio, index, market_price)
        } else if new_weight < current_weight {
            let proportion = div(sub(current_weight, new_weight)?, current_weight)?;
            self.partial_sell(portfolio, index, proportion, market_price)
        } else if new_weight > current_weight {
            self.buy_more(portfolio, index, sub(new_weight, current_weight)?, market_price)
        } else {
            hold(portfolio, index, Some(market_price))
        }
    }
}

fn hold(
    portfolio: &Portfolio,
    index: usize,
    current_price: Option<Decimal>,
) -> Result<Reconciliation, PortfolioError> {
    if let Some(price) = current_price {
        require_positive("current_price", price)?;
    }

    let mut next = portfolio.clone();
    let now = Utc::now();
    let holding = &mut next.holdings[index];
    if current_price.is_some() {
        holding.current_price = current_price;
    }
    holding.status = HoldingStatus::Hold;
    holding.updated_at = now;
    next.updated_at = now;

    settled(next, None)
}

/// Accepts a snapshot only if it can still be valued
fn settled(
    portfolio: Portfolio,
    trade: Option<TradeRecord>,
) -> Result<Reconciliation, PortfolioError> {
    portfolio.valuation()?;
    Ok(Reconciliation { portfolio, trade })
}

fn require_positive(field: &str, value: Decimal) -> Result<(), PortfolioError> {
    if value <= Decimal::ZERO {
        return Err(PortfolioError::validation(
            field,
            format!("must be greater than zero, got {}", value),
        ));
    }
    Ok(())
}

fn check_weight_capacity(portfolio: &Portfolio, added: Decimal) -> Result<(), PortfolioError> {
    let total = add(portfolio.total_active_weight(), added)?;
    if total > Decimal::ONE_HUNDRED {
        return Err(PortfolioError::CapacityExceeded(format!(
            "total weight would be {}%, only {}% remains",
            total,
            portfolio.remaining_weight()
        )));
    }
    Ok(())
}

fn check_cash(portfolio: &Portfolio, allocation: &AllocationResult) -> Result<(), PortfolioError> {
    if allocation.actual_investment_amount > portfolio.cash_balance {
        return Err(PortfolioError::CapacityExceeded(format!(
            "purchase of {} exceeds available cash {}",
            allocation.actual_investment_amount, portfolio.cash_balance
        )));
    }
    Ok(())
}

fn buy_trade(symbol: &str, allocation: &AllocationResult, price: Decimal) -> TradeRecord {
    TradeRecord {
        id: TradeId::new_v7(),
        symbol: symbol.to_string(),
        side: TradeSide::Buy,
        quantity: allocation.quantity,
        price,
        amount: allocation.actual_investment_amount,
        pnl: None,
        reinvested: Decimal::ZERO,
        executed_at: Utc::now(),
    }
}

fn archived_symbol(symbol: &str, at: DateTime<Utc>) -> String {
    format!("{}-{}-{}", SOLD_SYMBOL_PREFIX, at.format("%Y-%m-%d"), symbol)
}
