use crate::{
    config::BacktestConfig,
    engines::evaluation::{Backtester, FitnessEvaluator},
    engines::generation::genome::{parameter_name, Gene, ParameterMap},
    engines::metrics::ObjectivePolicy,
    error::{Result, TradetuneError},
    types::StrategyResult,
};
use polars::prelude::*;

/// Fast/slow EWMA crossover strategy on the `close` column.
///
/// `param0` is the fast span and `param1` the slow span. A long position is
/// opened when the fast EWMA crosses above the slow one and closed on the
/// opposite cross.
///
/// Orders fill at the close of the bar that produced the signal, not at the
/// next bar's open.
pub struct EwmaCrossoverEvaluator {
    backtester: Backtester,
}

impl EwmaCrossoverEvaluator {
    pub fn new(config: BacktestConfig) -> Self {
        Self {
            backtester: Backtester::new(config),
        }
    }

    /// Full backtest for one parameter set, used for final reporting.
    pub fn backtest(
        &self,
        market: &DataFrame,
        parameters: &ParameterMap,
        commission: f64,
    ) -> Result<StrategyResult> {
        let fast = span_parameter(parameters, 0)?;
        let slow = span_parameter(parameters, 1)?;

        let (close, fast_line, slow_line) = ewma_lines(market, fast, slow)?;
        let signals = crossover_signals(&fast_line, &slow_line);

        self.backtester.run(&signals, &close, commission)
    }
}

impl FitnessEvaluator for EwmaCrossoverEvaluator {
    type Market = DataFrame;

    fn evaluate(
        &self,
        market: &DataFrame,
        parameters: &ParameterMap,
        commission: f64,
        objective: ObjectivePolicy,
    ) -> Result<f64> {
        let result = self.backtest(market, parameters, commission)?;

        let min_trades = self.backtester.config().min_trades;
        if result.trades.len() < min_trades {
            return Err(TradetuneError::Evaluation(format!(
                "{} closed trade(s), at least {} required",
                result.trades.len(),
                min_trades
            )));
        }

        objective.score(&result.metrics)
    }
}

fn span_parameter(parameters: &ParameterMap, index: usize) -> Result<usize> {
    let name = parameter_name(index);
    let value: Gene = *parameters
        .get(&name)
        .ok_or_else(|| TradetuneError::Evaluation(format!("Missing parameter {}", name)))?;

    usize::try_from(value)
        .ok()
        .filter(|&span| span >= 1)
        .ok_or_else(|| {
            TradetuneError::Evaluation(format!("{} must be a span of at least 1, got {}", name, value))
        })
}

fn ewm_options(span: usize) -> EWMOptions {
    EWMOptions::default().and_adjust(false).and_span(span)
}

/// Close prices with the fast and slow EWMAs over them.
fn ewma_lines(market: &DataFrame, fast: usize, slow: usize) -> Result<(Vec<f64>, Vec<f64>, Vec<f64>)> {
    let close = col("close").cast(DataType::Float64);
    let lines = market
        .clone()
        .lazy()
        .select([
            close.clone().alias("close"),
            close.clone().ewm_mean(ewm_options(fast)).alias("fast_ewma"),
            close.ewm_mean(ewm_options(slow)).alias("slow_ewma"),
        ])
        .collect()?;

    Ok((
        column_values(&lines, "close")?,
        column_values(&lines, "fast_ewma")?,
        column_values(&lines, "slow_ewma")?,
    ))
}

fn column_values(frame: &DataFrame, name: &str) -> Result<Vec<f64>> {
    let column = frame.column(name)?;
    if column.null_count() > 0 {
        return Err(TradetuneError::Evaluation(format!(
            "Column '{}' contains {} null value(s)",
            name,
            column.null_count()
        )));
    }
    Ok(column.f64()?.into_no_null_iter().collect())
}

/// `+1` on the bar the fast line crosses above the slow line, `-1` on the
/// reverse cross, `0` otherwise.
pub fn crossover_signals(fast: &[f64], slow: &[f64]) -> Vec<f64> {
    let mut signals = vec![0.0; fast.len().min(slow.len())];
    for i in 1..signals.len() {
        if fast[i - 1] < slow[i - 1] && fast[i] > slow[i] {
            signals[i] = 1.0;
        } else if slow[i - 1] < fast[i - 1] && slow[i] > fast[i] {
            signals[i] = -1.0;
        }
    }
    signals
}
