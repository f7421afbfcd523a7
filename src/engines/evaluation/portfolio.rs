use crate::{
    error::{Result, TradetuneError},
    types::{Direction, ExitReason, Trade},
};

/// Long-only single-position ledger with proportional commission.
pub struct Portfolio {
    pub initial_capital: f64,
    pub cash: f64,
    pub position: Option<Position>,
    pub trades: Vec<Trade>,
    pub equity_curve: Vec<f64>,

    /// Commission as a fraction of traded notional, charged on entry and exit.
    pub commission: f64,
    /// Fraction of cash committed when opening a position.
    pub position_fraction: f64,

    // P&L tracking; drawdown is derived from `equity_curve` by the metrics
    pub realized_pnl: f64,
    pub unrealized_pnl: f64,
    pub total_pnl: f64,
    pub current_position_value: f64,
}

pub struct Position {
    pub direction: Direction,
    pub entry_bar: usize,
    pub entry_price: f64,
    pub size: f64,
    pub entry_fee: f64,
}

impl Portfolio {
    pub fn new(initial_capital: f64) -> Self {
        Self {
            initial_capital,
            cash: initial_capital,
            position: None,
            trades: Vec::new(),
            equity_curve: vec![initial_capital],
            commission: 0.0,
            position_fraction: 0.1,
            realized_pnl: 0.0,
            unrealized_pnl: 0.0,
            total_pnl: 0.0,
            current_position_value: 0.0,
        }
    }

    pub fn with_commission(mut self, commission: f64) -> Self {
        self.commission = commission;
        self
    }

    pub fn with_position_fraction(mut self, position_fraction: f64) -> Self {
        self.position_fraction = position_fraction;
        self
    }

    /// Advance one bar: `signal > 0` enters when flat, `signal < 0` exits when long.
    pub fn process_bar(&mut self, bar: usize, signal: f64, price: f64) -> Result<()> {
        if self.position.is_none() && signal > 0.0 {
            self.open_position(bar, price)?;
        } else if self.position.is_some() && signal < 0.0 {
            self.close_position(bar, price, ExitReason::Signal)?;
        }

        self.calculate_unrealized_pnl(price);
        self.equity_curve.push(self.equity());

        Ok(())
    }

    pub fn open_position(&mut self, bar: usize, price: f64) -> Result<()> {
        if !(price > 0.0) {
            return Err(TradetuneError::Evaluation(format!(
                "Cannot open position at non-positive price {} (bar {})",
                price, bar
            )));
        }

        let budget = self.cash * self.position_fraction;
        let size = budget / (price * (1.0 + self.commission));
        let entry_fee = size * price * self.commission;
        self.cash -= size * price + entry_fee;

        self.position = Some(Position {
            direction: Direction::Long,
            entry_bar: bar,
            entry_price: price,
            size,
            entry_fee,
        });

        Ok(())
    }

    pub fn close_position(&mut self, bar: usize, price: f64, reason: ExitReason) -> Result<()> {
        if let Some(pos) = self.position.take() {
            let exit_fee = pos.size * price * self.commission;
            let fees = pos.entry_fee + exit_fee;
            let profit = (price - pos.entry_price) * pos.size - fees;

            self.cash += price * pos.size - exit_fee;
            self.realized_pnl += profit;

            self.trades.push(Trade {
                entry_bar: pos.entry_bar,
                exit_bar: bar,
                entry_price: pos.entry_price,
                exit_price: price,
                direction: pos.direction,
                size: pos.size,
                profit,
                exit_reason: reason,
                fees,
            });
        }

        Ok(())
    }

    pub fn get_trades(&self) -> &[Trade] {
        &self.trades
    }

    pub fn get_equity_curve(&self) -> &[f64] {
        &self.equity_curve
    }

    /// Calculate unrealized P&L for the open position, entry fee included.
    pub fn calculate_unrealized_pnl(&mut self, current_price: f64) {
        if let Some(position) = &self.position {
            let current_value = position.size * current_price;
            self.unrealized_pnl =
                current_value - position.size * position.entry_price - position.entry_fee;
            self.current_position_value = current_value;
        } else {
            self.unrealized_pnl = 0.0;
            self.current_position_value = 0.0;
        }

        self.total_pnl = self.realized_pnl + self.unrealized_pnl;
    }

    /// Get total portfolio value (cash + position at current price).
    pub fn total_value(&self) -> f64 {
        self.cash + self.current_position_value
    }

    /// Get equity (initial capital + total P&L).
    pub fn equity(&self) -> f64 {
        self.initial_capital + self.total_pnl
    }
}
