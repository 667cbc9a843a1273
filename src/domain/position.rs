//! Position tracking and the closed-trade ledger record.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Transient state held while a trade is open. At most one position exists
/// at any point of the scan.
///
/// `stop_loss` and `take_profit` are absolute prices resolved at entry from
/// the risk policy; `0.0` disables the trigger.
#[derive(Debug, Clone)]
pub struct Position {
    pub entry_index: usize,
    pub entry_price: f64,
    pub entry_timestamp: DateTime<Utc>,
    pub stop_loss: f64,
    pub take_profit: f64,
}

impl Position {
    pub fn unrealized_profit(&self, price: f64) -> f64 {
        price - self.entry_price
    }

    pub fn should_stop_loss(&self, price: f64) -> bool {
        if self.stop_loss == 0.0 {
            return false;
        }
        price <= self.stop_loss
    }

    pub fn should_take_profit(&self, price: f64) -> bool {
        if self.take_profit == 0.0 {
            return false;
        }
        price >= self.take_profit
    }
}

/// Why a trade was closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExitReason {
    /// The exit rule signalled.
    Signal,
    /// Stop-loss threshold crossed.
    StopLoss,
    /// Take-profit threshold crossed.
    TakeProfit,
    /// Maximum holding horizon reached.
    MaxHolding,
    /// Forced liquidation at the end of the series.
    EndOfData,
}

/// Immutable record of a closed trade. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub entry_index: usize,
    pub exit_index: usize,
    pub entry_timestamp: DateTime<Utc>,
    pub exit_timestamp: DateTime<Utc>,
    pub entry_price: f64,
    pub exit_price: f64,
    pub profit: f64,
    pub exit_reason: ExitReason,
}

impl Trade {
    pub fn holding_period(&self) -> Duration {
        self.exit_timestamp - self.entry_timestamp
    }

    pub fn holding_bars(&self) -> usize {
        self.exit_index - self.entry_index
    }

    pub fn is_win(&self) -> bool {
        self.profit > 0.0
    }
}
