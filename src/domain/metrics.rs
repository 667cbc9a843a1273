//! Incremental performance metrics: equity curve, drawdown, win rate.

use serde::{Deserialize, Serialize};

use crate::domain::position::Trade;

/// Terminal output of a simulation run. Plain data, serializable for any
/// downstream consumer (charts, trade tables, comparison tools).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    pub trades: Vec<Trade>,
    pub total_profit: f64,
    pub number_of_trades: usize,
    /// Fraction of trades with positive profit; 0 when there are no trades.
    pub win_rate: f64,
    /// One value per closed trade: starting equity plus cumulative profit.
    pub equity_curve: Vec<f64>,
    /// One value per closed trade: percent below the running peak equity.
    pub drawdown_curve: Vec<f64>,
    /// Maximum of the drawdown curve; 0 when there are no trades.
    pub max_drawdown: f64,
    pub starting_equity: f64,
    pub final_equity: f64,
}

/// Folds closed trades into running metrics, one instance per run.
///
/// Each curve point is a function of the trades recorded so far and is never
/// recomputed retroactively; peak equity is monotonically non-decreasing.
#[derive(Debug, Clone)]
pub struct MetricsRecorder {
    starting_equity: f64,
    cumulative_profit: f64,
    peak_equity: f64,
    wins: usize,
    trade_count: usize,
    equity_curve: Vec<f64>,
    drawdown_curve: Vec<f64>,
    max_drawdown: f64,
}

impl MetricsRecorder {
    pub fn new(starting_equity: f64) -> Self {
        MetricsRecorder {
            starting_equity,
            cumulative_profit: 0.0,
            peak_equity: starting_equity,
            wins: 0,
            trade_count: 0,
            equity_curve: Vec::new(),
            drawdown_curve: Vec::new(),
            max_drawdown: 0.0,
        }
    }

    pub fn record(&mut self, trade: &Trade) {
        self.cumulative_profit += trade.profit;
        let equity = self.starting_equity + self.cumulative_profit;
        if equity > self.peak_equity {
            self.peak_equity = equity;
        }

        // Equity below zero means the account is gone; retracement caps at
        // a full 100% of the peak.
        let drawdown = if self.peak_equity > 0.0 {
            ((self.peak_equity - equity) / self.peak_equity * 100.0).min(100.0)
        } else {
            0.0
        };
        if drawdown > self.max_drawdown {
            self.max_drawdown = drawdown;
        }

        self.equity_curve.push(equity);
        self.drawdown_curve.push(drawdown);

        if trade.is_win() {
            self.wins += 1;
        }
        self.trade_count += 1;
    }

    pub fn finalize(self, trades: Vec<Trade>) -> SimulationResult {
        assert_eq!(
            trades.len(),
            self.trade_count,
            "ledger and recorder disagree on trade count"
        );

        let win_rate = if self.trade_count > 0 {
            self.wins as f64 / self.trade_count as f64
        } else {
            0.0
        };

        SimulationResult {
            trades,
            total_profit: self.cumulative_profit,
            number_of_trades: self.trade_count,
            win_rate,
            final_equity: self.starting_equity + self.cumulative_profit,
            equity_curve: self.equity_curve,
            drawdown_curve: self.drawdown_curve,
            max_drawdown: self.max_drawdown,
            starting_equity: self.starting_equity,
        }
    }
}
