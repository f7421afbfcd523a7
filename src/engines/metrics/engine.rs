use crate::engines::metrics::{ProfitabilityMetrics, RiskMetrics};
use crate::types::Trade;
use std::collections::HashMap;

pub struct MetricsEngine {
    initial_balance: f64,
    risk_free_rate: f64,
    periods_per_year: f64,
}

impl MetricsEngine {
    pub fn new(initial_balance: f64, risk_free_rate: f64, periods_per_year: f64) -> Self {
        Self {
            initial_balance,
            risk_free_rate,
            periods_per_year,
        }
    }

    pub fn calculate_all(&self, trades: &[Trade], equity_curve: &[f64]) -> HashMap<String, f64> {
        let mut all_metrics = ProfitabilityMetrics::calculate(trades, self.initial_balance);
        all_metrics.extend(RiskMetrics::calculate(
            equity_curve,
            self.risk_free_rate,
            self.periods_per_year,
        ));

        all_metrics.insert(
            "final_balance".to_string(),
            equity_curve.last().copied().unwrap_or(self.initial_balance),
        );

        all_metrics
    }
}
