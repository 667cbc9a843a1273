//! Rule evaluation dispatcher.
//!
//! # Evaluation Semantics
//!
//! Evaluators receive a *window* rather than the full series, so a rule can
//! never observe data past the decision point:
//!
//! - Entry rules see `series[..=index]` and decide for the window's last
//!   observation.
//! - Exit rules see `series[entry_index..=current_index]`; the window's first
//!   observation is the entry bar, its last is the current bar. They return
//!   `Some(exit_price)` or `None`.
//! - Moving-average crossings need a value on the previous bar as well and
//!   return no signal until both averages exist, matching the convention that
//!   a cross is undefined on the first evaluable bar.
//!
//! Reported error indices are window-local; the engine rebases them onto the
//! full series.

use crate::domain::error::TicksimError;
use crate::domain::series::Observation;
use crate::domain::strategy::{EntryRule, ExitRule};

pub fn evaluate_entry(rule: &EntryRule, window: &[Observation]) -> Result<bool, TicksimError> {
    let current = &window[window.len() - 1];

    match rule {
        EntryRule::Always => Ok(true),
        EntryRule::PriceAbove(threshold) => Ok(current.price > *threshold),
        EntryRule::PriceBelow(threshold) => Ok(current.price < *threshold),
        EntryRule::MaCrossover { short, long } => crossed(window, *short, *long, Side::Above),
    }
}

pub fn evaluate_exit(rule: &ExitRule, window: &[Observation]) -> Result<Option<f64>, TicksimError> {
    let entry = &window[0];
    let current = &window[window.len() - 1];

    match rule {
        ExitRule::Never => Ok(None),
        ExitRule::ProfitTarget { pct } => {
            let target = entry.price * (1.0 + pct / 100.0);
            if current.price >= target {
                Ok(Some(current.price))
            } else {
                Ok(None)
            }
        }
        ExitRule::PriceBelow(threshold) => {
            if current.price < *threshold {
                Ok(Some(current.price))
            } else {
                Ok(None)
            }
        }
        ExitRule::MaCrossunder { short, long } => {
            if crossed(window, *short, *long, Side::Below)? {
                Ok(Some(current.price))
            } else {
                Ok(None)
            }
        }
    }
}

enum Side {
    Above,
    Below,
}

/// Simple moving average of the last `period` prices in the window.
/// `None` until enough observations exist.
fn moving_average(window: &[Observation], period: usize) -> Option<f64> {
    if period == 0 || window.len() < period {
        return None;
    }
    let sum: f64 = window[window.len() - period..].iter().map(|o| o.price).sum();
    Some(sum / period as f64)
}

fn crossed(
    window: &[Observation],
    short: usize,
    long: usize,
    side: Side,
) -> Result<bool, TicksimError> {
    // A cross needs both averages on the current and the previous bar.
    if window.len() < 2 {
        return Ok(false);
    }
    let prev_window = &window[..window.len() - 1];

    let (short_curr, long_curr, short_prev, long_prev) = match (
        moving_average(window, short),
        moving_average(window, long),
        moving_average(prev_window, short),
        moving_average(prev_window, long),
    ) {
        (Some(a), Some(b), Some(c), Some(d)) => (a, b, c, d),
        _ => return Ok(false),
    };

    for value in [short_curr, long_curr, short_prev, long_prev] {
        if !value.is_finite() {
            return Err(TicksimError::RuleEvaluation {
                index: window.len() - 1,
                reason: "moving average is not finite".into(),
            });
        }
    }

    let signal = match side {
        Side::Above => short_curr > long_curr && short_prev <= long_prev,
        Side::Below => short_curr < long_curr && short_prev >= long_prev,
    };
    Ok(signal)
}
