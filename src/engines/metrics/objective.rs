use crate::error::{Result, TradetuneError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Metric an optimization run maximises.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectivePolicy {
    /// Annualised Sharpe ratio of the equity curve.
    SharpeRatio,
    /// `100 - max drawdown %`, so smaller drawdowns score higher.
    DrawdownInverse,
    /// Sum of closed-trade profit after fees, rounded to cents.
    NetProfit,
}

impl ObjectivePolicy {
    pub fn metric_name(&self) -> &'static str {
        match self {
            Self::SharpeRatio => "sharpe_ratio",
            Self::DrawdownInverse => "max_drawdown_pct",
            Self::NetProfit => "net_profit",
        }
    }

    /// Turn a backtest's metrics into a fitness value.
    pub fn score(&self, metrics: &HashMap<String, f64>) -> Result<f64> {
        let value = metrics.get(self.metric_name()).copied().ok_or_else(|| {
            TradetuneError::Evaluation(format!("Backtest produced no {} metric", self.metric_name()))
        })?;

        let score = match self {
            Self::SharpeRatio => value,
            Self::DrawdownInverse => 100.0 - value,
            Self::NetProfit => (value * 100.0).round() / 100.0,
        };

        if !score.is_finite() {
            return Err(TradetuneError::Evaluation(format!(
                "{} score is not finite: {}",
                self, score
            )));
        }
        Ok(score)
    }
}

impl fmt::Display for ObjectivePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::SharpeRatio => "Sharpe ratio",
            Self::DrawdownInverse => "inverse drawdown",
            Self::NetProfit => "net profit",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics() -> HashMap<String, f64> {
        HashMap::from([
            ("sharpe_ratio".to_string(), 1.25),
            ("max_drawdown_pct".to_string(), 12.5),
            ("net_profit".to_string(), 1234.5678),
        ])
    }

    #[test]
    fn test_scores_per_policy() {
        let m = metrics();
        assert_eq!(ObjectivePolicy::SharpeRatio.score(&m).unwrap(), 1.25);
        assert_eq!(ObjectivePolicy::DrawdownInverse.score(&m).unwrap(), 87.5);
        assert_eq!(ObjectivePolicy::NetProfit.score(&m).unwrap(), 1234.57);
    }

    #[test]
    fn test_missing_metric_is_evaluation_error() {
        let result = ObjectivePolicy::SharpeRatio.score(&HashMap::new());
        assert!(matches!(result, Err(TradetuneError::Evaluation(_))));
    }

    #[test]
    fn test_non_finite_score_rejected() {
        let m = HashMap::from([("sharpe_ratio".to_string(), f64::NAN)]);
        assert!(ObjectivePolicy::SharpeRatio.score(&m).is_err());
    }
}
