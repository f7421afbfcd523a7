use super::traits::ConfigSection;
use crate::error::TradetuneError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BacktestConfig {
    pub initial_capital: f64,
    /// Fraction of available cash committed on each entry.
    pub position_fraction: f64,
    /// Annual risk-free rate used by the Sharpe ratio.
    pub risk_free_rate: f64,
    pub periods_per_year: f64,
    /// Runs closing fewer trades than this are evaluation failures.
    pub min_trades: usize,
}

impl Default for BacktestConfig {
    fn default() -> Self {
        Self {
            initial_capital: 10000.0,
            position_fraction: 0.999,
            risk_free_rate: 0.02,
            periods_per_year: 252.0,
            min_trades: 1,
        }
    }
}

impl ConfigSection for BacktestConfig {
    fn section_name() -> &'static str {
        "backtesting"
    }

    fn validate(&self) -> Result<(), TradetuneError> {
        if !(self.initial_capital > 0.0) {
            return Err(TradetuneError::Configuration(
                "Initial capital must be positive".to_string(),
            ));
        }
        if !(self.position_fraction > 0.0 && self.position_fraction <= 1.0) {
            return Err(TradetuneError::Configuration(
                "Position fraction must be in (0, 1]".to_string(),
            ));
        }
        if !(self.periods_per_year > 0.0) {
            return Err(TradetuneError::Configuration(
                "Periods per year must be positive".to_string(),
            ));
        }
        if !self.risk_free_rate.is_finite() {
            return Err(TradetuneError::Configuration(
                "Risk-free rate must be finite".to_string(),
            ));
        }
        Ok(())
    }
}
