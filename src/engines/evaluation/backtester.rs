use crate::{
    config::BacktestConfig,
    engines::evaluation::Portfolio,
    engines::metrics::MetricsEngine,
    error::{Result, TradetuneError},
    types::{ExitReason, StrategyResult},
};

/// Replays a signal series over prices through a [`Portfolio`].
///
/// Signals are read per bar: `+1` enters a long position when flat, `-1` exits,
/// anything else holds. A position still open on the last bar is closed there.
pub struct Backtester {
    config: BacktestConfig,
}

impl Backtester {
    pub fn new(config: BacktestConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &BacktestConfig {
        &self.config
    }

    pub fn run(&self, signals: &[f64], prices: &[f64], commission: f64) -> Result<StrategyResult> {
        if signals.len() != prices.len() {
            return Err(TradetuneError::Evaluation(format!(
                "Signal length {} does not match price length {}",
                signals.len(),
                prices.len()
            )));
        }

        let mut portfolio = Portfolio::new(self.config.initial_capital)
            .with_commission(commission)
            .with_position_fraction(self.config.position_fraction);

        for (i, (&signal, &price)) in signals.iter().zip(prices).enumerate() {
            portfolio.process_bar(i, signal, price)?;
        }

        if let Some(&last_price) = prices.last() {
            if portfolio.position.is_some() {
                portfolio.close_position(prices.len() - 1, last_price, ExitReason::EndOfData)?;
                portfolio.calculate_unrealized_pnl(last_price);
                let equity = portfolio.equity();
                if let Some(last) = portfolio.equity_curve.last_mut() {
                    *last = equity;
                }
            }
        }

        let metrics = MetricsEngine::new(
            self.config.initial_capital,
            self.config.risk_free_rate,
            self.config.periods_per_year,
        )
        .calculate_all(portfolio.get_trades(), portfolio.get_equity_curve());

        Ok(StrategyResult {
            metrics,
            trades: portfolio.get_trades().to_vec(),
            equity_curve: portfolio.get_equity_curve().to_vec(),
        })
    }
}
