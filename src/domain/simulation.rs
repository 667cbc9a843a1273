//! Simulation engine: single-pass replay of a market series against a
//! strategy configuration.
//!
//! # Scan Semantics
//!
//! - While flat, the entry rule is evaluated at each index over the window
//!   `series[..=i]`. A signal opens a position at that observation's price;
//!   exit logic is never consulted on the entry index itself.
//! - While open, indices after the entry are checked in fixed precedence:
//!   holding horizon, stop-loss (filled at the stop price), take-profit
//!   (filled at the take-profit price), then the exit rule. The first index
//!   satisfying any condition closes the trade.
//! - A position still open at the end of the series is force-liquidated at
//!   the final observation's price.
//! - Scanning resumes after the exit bar, or on it when the risk policy
//!   allows same-bar re-entry.
//!
//! The engine performs no I/O and holds no state across calls: `run` is pure
//! and safe to invoke concurrently with different arguments.

use crate::domain::error::TicksimError;
use crate::domain::metrics::{MetricsRecorder, SimulationResult};
use crate::domain::position::{ExitReason, Position, Trade};
use crate::domain::rule_eval;
use crate::domain::series::{validate_series, Observation};
use crate::domain::strategy::StrategyConfig;

/// Replay `series` against `config` starting from `starting_equity`.
///
/// Fails fast with [`TicksimError::InvalidInput`] before any scanning if the
/// series, equity, or configuration is malformed. A rule-evaluation failure
/// aborts the run with the offending series index; no partial result is ever
/// returned.
pub fn run(
    series: &[Observation],
    config: &StrategyConfig,
    starting_equity: f64,
) -> Result<SimulationResult, TicksimError> {
    validate_series(series)?;
    if !starting_equity.is_finite() || starting_equity <= 0.0 {
        return Err(TicksimError::InvalidInput {
            reason: "starting equity must be positive and finite".into(),
        });
    }
    config.validate()?;

    let mut recorder = MetricsRecorder::new(starting_equity);
    let mut trades: Vec<Trade> = Vec::new();

    let last = series.len() - 1;
    let mut i = 0;
    // Entries stop before the final observation: a position opened there
    // would have no later bar to exit on.
    while i < last {
        let window = &series[..=i];
        if !rule_eval::evaluate_entry(&config.entry, window)? {
            i += 1;
            continue;
        }

        let entry = &series[i];
        let position = Position {
            entry_index: i,
            entry_price: entry.price,
            entry_timestamp: entry.timestamp,
            stop_loss: config.risk.stop_price(entry.price),
            take_profit: config.risk.take_price(entry.price),
        };

        let (exit_index, exit_price, exit_reason) = find_exit(series, &position, config)?;
        let exit = &series[exit_index];
        let trade = Trade {
            entry_index: position.entry_index,
            exit_index,
            entry_timestamp: position.entry_timestamp,
            exit_timestamp: exit.timestamp,
            entry_price: position.entry_price,
            exit_price,
            profit: exit_price - position.entry_price,
            exit_reason,
        };
        recorder.record(&trade);
        trades.push(trade);

        i = if config.risk.allow_same_bar_reentry {
            exit_index
        } else {
            exit_index + 1
        };
    }

    Ok(recorder.finalize(trades))
}

/// Forward-scan from the bar after entry and return the first index where a
/// close condition holds, with the fill price and reason.
///
/// Precedence per index: holding horizon, stop-loss, take-profit, exit rule.
/// Exhausting the series forces liquidation at the final observation.
fn find_exit(
    series: &[Observation],
    position: &Position,
    config: &StrategyConfig,
) -> Result<(usize, f64, ExitReason), TicksimError> {
    let entry_index = position.entry_index;

    for j in entry_index + 1..series.len() {
        let obs = &series[j];

        if j - entry_index >= config.risk.max_holding_bars {
            return Ok((j, obs.price, ExitReason::MaxHolding));
        }
        if position.should_stop_loss(obs.price) {
            // Fill at the stop price, not the observed price: the worst
            // realistic fill for a crossed stop.
            return Ok((j, position.stop_loss, ExitReason::StopLoss));
        }
        if position.should_take_profit(obs.price) {
            return Ok((j, position.take_profit, ExitReason::TakeProfit));
        }

        let window = &series[entry_index..=j];
        if let Some(price) = rule_eval::evaluate_exit(&config.exit, window)
            .map_err(|e| rebase_index(e, entry_index))?
        {
            return Ok((j, price, ExitReason::Signal));
        }
    }

    let last = series.len() - 1;
    Ok((last, series[last].price, ExitReason::EndOfData))
}

/// Exit-rule errors carry window-local indices; shift them onto the series.
fn rebase_index(err: TicksimError, offset: usize) -> TicksimError {
    match err {
        TicksimError::RuleEvaluation { index, reason } => TicksimError::RuleEvaluation {
            index: index + offset,
            reason,
        },
        other => other,
    }
}
