use std::collections::HashMap;

pub struct RiskMetrics;

impl RiskMetrics {
    /// Equity-curve metrics. `sharpe_ratio` is omitted when returns have no variance.
    pub fn calculate(
        equity_curve: &[f64],
        risk_free_rate: f64,
        periods_per_year: f64,
    ) -> HashMap<String, f64> {
        let mut metrics = HashMap::new();

        if equity_curve.len() < 2 {
            return metrics;
        }

        metrics.insert("max_drawdown_pct".to_string(), Self::max_drawdown(equity_curve));

        let returns = Self::calculate_returns(equity_curve);
        let volatility = Self::std_dev(&returns);
        metrics.insert("volatility".to_string(), volatility);

        if volatility > 0.0 {
            let avg_return = returns.iter().sum::<f64>() / returns.len() as f64;
            let excess = avg_return - risk_free_rate / periods_per_year;
            let sharpe = excess / volatility * periods_per_year.sqrt();
            metrics.insert("sharpe_ratio".to_string(), sharpe);
        }

        metrics
    }

    /// Largest peak-to-trough decline, in percent.
    pub fn max_drawdown(equity: &[f64]) -> f64 {
        let mut max_dd = 0.0;
        let mut peak = equity[0];

        for &value in equity.iter() {
            if value > peak {
                peak = value;
            }
            if peak > 0.0 {
                let dd = ((peak - value) / peak) * 100.0;
                if dd > max_dd {
                    max_dd = dd;
                }
            }
        }

        max_dd
    }

    fn calculate_returns(equity: &[f64]) -> Vec<f64> {
        equity
            .windows(2)
            .filter(|w| w[0] != 0.0)
            .map(|w| (w[1] - w[0]) / w[0])
            .collect()
    }

    fn std_dev(values: &[f64]) -> f64 {
        if values.is_empty() {
            return 0.0;
        }

        let mean = values.iter().sum::<f64>() / values.len() as f64;
        let variance = values.iter()
            .map(|&v| (v - mean).powi(2))
            .sum::<f64>() / values.len() as f64;

        variance.sqrt()
    }
}
