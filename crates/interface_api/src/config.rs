//! API configuration

use rust_decimal::Decimal;
use serde::Deserialize;

use core_kernel::CoreError;
use domain_portfolio::{
    ProfitReinvestment, ReconcilerSettings, ShareRounding, SoldHoldingRetention,
    DEFAULT_ROUNDING_TOLERANCE_PERCENT,
};

/// How share counts are rounded when buying
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ShareRoundingMode {
    #[default]
    Floor,
    Tolerance,
}

/// API configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// Log level
    pub log_level: String,
    /// Share rounding used when buying
    pub share_rounding: ShareRoundingMode,
    /// Round up when the missing amount is within this percent of one share
    pub rounding_tolerance_percent: Decimal,
    /// What to keep of a holding once fully sold
    pub sold_holding_retention: SoldHoldingRetention,
    /// Add realized gains to the minimum investment after sells
    pub reinvest_realized_profit: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            log_level: "info".to_string(),
            share_rounding: ShareRoundingMode::Floor,
            rounding_tolerance_percent: DEFAULT_ROUNDING_TOLERANCE_PERCENT,
            sold_holding_retention: SoldHoldingRetention::default(),
            reinvest_realized_profit: false,
        }
    }
}

impl ApiConfig {
    /// Loads configuration from `API_`-prefixed environment variables
    ///
    /// Keys that are not set keep their default value.
    pub fn from_env() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::Environment::with_prefix("API").try_parsing(true))
            .build()?
            .try_deserialize()
    }

    /// Returns the server address
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Converts the portfolio policy keys into reconciler settings
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Configuration` if the rounding tolerance is
    /// outside 0 to 100 while tolerance rounding is selected
    pub fn reconciler_settings(&self) -> Result<ReconcilerSettings, CoreError> {
        let share_rounding = match self.share_rounding {
            ShareRoundingMode::Floor => ShareRounding::Floor,
            ShareRoundingMode::Tolerance => {
                let percent = self.rounding_tolerance_percent;
                if percent < Decimal::ZERO || percent > Decimal::ONE_HUNDRED {
                    return Err(CoreError::configuration(format!(
                        "rounding_tolerance_percent must be between 0 and 100, got {}",
                        percent
                    )));
                }
                ShareRounding::Tolerance { percent }
            }
        };

        let reinvestment = if self.reinvest_realized_profit {
            ProfitReinvestment::CompoundRealizedGains
        } else {
            ProfitReinvestment::Disabled
        };

        Ok(ReconcilerSettings {
            share_rounding,
            sold_retention: self.sold_holding_retention,
            reinvestment,
        })
    }
}
