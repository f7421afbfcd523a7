use crate::types::*;
use std::collections::HashMap;

pub struct ProfitabilityMetrics;

impl ProfitabilityMetrics {
    /// Trade-level metrics. `num_trades` and `net_profit` are always present.
    pub fn calculate(trades: &[Trade], initial_balance: f64) -> HashMap<String, f64> {
        let mut metrics = HashMap::new();

        let net_profit: f64 = trades.iter().map(|t| t.profit).sum();
        metrics.insert("num_trades".to_string(), trades.len() as f64);
        metrics.insert("net_profit".to_string(), net_profit);

        if trades.is_empty() {
            return metrics;
        }

        let winning_trades: Vec<&Trade> = trades.iter().filter(|t| t.profit > 0.0).collect();
        let losing_trades: Vec<&Trade> = trades.iter().filter(|t| t.profit <= 0.0).collect();

        // Total return %
        metrics.insert("return_pct".to_string(), (net_profit / initial_balance) * 100.0);

        let win_rate = (winning_trades.len() as f64 / trades.len() as f64) * 100.0;
        metrics.insert("win_rate".to_string(), win_rate);

        let total_fees: f64 = trades.iter().map(|t| t.fees).sum();
        metrics.insert("total_fees".to_string(), total_fees);

        // Profit factor
        let gross_profit: f64 = winning_trades.iter().map(|t| t.profit).sum();
        let gross_loss: f64 = losing_trades.iter().map(|t| t.profit.abs()).sum();
        if gross_loss > 0.0 {
            metrics.insert("profit_factor".to_string(), gross_profit / gross_loss);
        }

        metrics
    }
}
