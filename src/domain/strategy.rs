//! Strategy configuration: entry rule, exit rule, risk policy.
//!
//! Rules are tagged data evaluated by the dispatcher in
//! [`crate::domain::rule_eval`]; new rules are added as new variants.
//! A configuration is a value object: validated at construction time,
//! never mutated during a run, safe to share across concurrent runs.

use crate::domain::error::TicksimError;

/// Decides whether to open a position at a given index.
#[derive(Debug, Clone, PartialEq)]
pub enum EntryRule {
    /// Enter whenever flat.
    Always,
    /// Enter when the current price is above the threshold.
    PriceAbove(f64),
    /// Enter when the current price is below the threshold.
    PriceBelow(f64),
    /// Enter when the short moving average crosses above the long one.
    MaCrossover { short: usize, long: usize },
}

/// Decides where an open position closes, before risk bounds are exhausted.
#[derive(Debug, Clone, PartialEq)]
pub enum ExitRule {
    /// Never signal; only the risk policy closes the trade.
    Never,
    /// Exit once unrealized profit reaches `pct` percent of the entry price.
    ProfitTarget { pct: f64 },
    /// Exit when the current price falls below the threshold.
    PriceBelow(f64),
    /// Exit when the short moving average crosses below the long one.
    MaCrossunder { short: usize, long: usize },
}

/// Hard bounds checked before the exit rule, in fixed precedence:
/// holding horizon, then stop-loss, then take-profit.
#[derive(Debug, Clone, PartialEq)]
pub struct RiskPolicy {
    /// Maximum bars a position may be held. Must be at least 1.
    pub max_holding_bars: usize,
    /// Stop-loss as a percentage below entry. 0 disables.
    pub stop_loss_pct: f64,
    /// Take-profit as a percentage above entry. 0 disables.
    pub take_profit_pct: f64,
    /// Permit a new entry on the same bar a trade exited on.
    pub allow_same_bar_reentry: bool,
}

impl Default for RiskPolicy {
    fn default() -> Self {
        RiskPolicy {
            max_holding_bars: 10,
            stop_loss_pct: 0.0,
            take_profit_pct: 0.0,
            allow_same_bar_reentry: false,
        }
    }
}

impl RiskPolicy {
    /// Absolute stop price for an entry, or 0.0 when disabled.
    pub fn stop_price(&self, entry_price: f64) -> f64 {
        if self.stop_loss_pct > 0.0 {
            entry_price * (1.0 - self.stop_loss_pct / 100.0)
        } else {
            0.0
        }
    }

    /// Absolute take-profit price for an entry, or 0.0 when disabled.
    pub fn take_price(&self, entry_price: f64) -> f64 {
        if self.take_profit_pct > 0.0 {
            entry_price * (1.0 + self.take_profit_pct / 100.0)
        } else {
            0.0
        }
    }

    pub fn validate(&self) -> Result<(), TicksimError> {
        if self.max_holding_bars < 1 {
            return Err(TicksimError::InvalidInput {
                reason: "max_holding_bars must be at least 1".into(),
            });
        }
        if !self.stop_loss_pct.is_finite() || self.stop_loss_pct < 0.0 || self.stop_loss_pct >= 100.0
        {
            return Err(TicksimError::InvalidInput {
                reason: "stop_loss_pct must be in [0, 100)".into(),
            });
        }
        if !self.take_profit_pct.is_finite() || self.take_profit_pct < 0.0 {
            return Err(TicksimError::InvalidInput {
                reason: "take_profit_pct must be non-negative".into(),
            });
        }
        Ok(())
    }
}

impl std::fmt::Display for EntryRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntryRule::Always => write!(f, "always"),
            EntryRule::PriceAbove(t) => write!(f, "price_above({})", t),
            EntryRule::PriceBelow(t) => write!(f, "price_below({})", t),
            EntryRule::MaCrossover { short, long } => {
                write!(f, "ma_crossover({}, {})", short, long)
            }
        }
    }
}

impl std::fmt::Display for ExitRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExitRule::Never => write!(f, "never"),
            ExitRule::ProfitTarget { pct } => write!(f, "profit_target({})", pct),
            ExitRule::PriceBelow(t) => write!(f, "price_below({})", t),
            ExitRule::MaCrossunder { short, long } => {
                write!(f, "ma_crossunder({}, {})", short, long)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StrategyConfig {
    pub name: String,
    pub entry: EntryRule,
    pub exit: ExitRule,
    pub risk: RiskPolicy,
}

impl StrategyConfig {
    pub fn validate(&self) -> Result<(), TicksimError> {
        validate_entry_rule(&self.entry)?;
        validate_exit_rule(&self.exit)?;
        self.risk.validate()
    }
}

fn validate_threshold(value: f64, rule: &str) -> Result<(), TicksimError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(TicksimError::InvalidInput {
            reason: format!("{} threshold must be a positive finite price", rule),
        });
    }
    Ok(())
}

fn validate_ma_periods(short: usize, long: usize, rule: &str) -> Result<(), TicksimError> {
    if short == 0 || long == 0 {
        return Err(TicksimError::InvalidInput {
            reason: format!("{} periods must be non-zero", rule),
        });
    }
    if short >= long {
        return Err(TicksimError::InvalidInput {
            reason: format!("{} short period must be less than long period", rule),
        });
    }
    Ok(())
}

fn validate_entry_rule(rule: &EntryRule) -> Result<(), TicksimError> {
    match rule {
        EntryRule::Always => Ok(()),
        EntryRule::PriceAbove(t) => validate_threshold(*t, "price_above"),
        EntryRule::PriceBelow(t) => validate_threshold(*t, "price_below"),
        EntryRule::MaCrossover { short, long } => {
            validate_ma_periods(*short, *long, "ma_crossover")
        }
    }
}

fn validate_exit_rule(rule: &ExitRule) -> Result<(), TicksimError> {
    match rule {
        ExitRule::Never => Ok(()),
        ExitRule::ProfitTarget { pct } => {
            if !pct.is_finite() || *pct <= 0.0 {
                return Err(TicksimError::InvalidInput {
                    reason: "profit_target percentage must be positive".into(),
                });
            }
            Ok(())
        }
        ExitRule::PriceBelow(t) => validate_threshold(*t, "price_below"),
        ExitRule::MaCrossunder { short, long } => {
            validate_ma_periods(*short, *long, "ma_crossunder")
        }
    }
}
