//! Configuration validation.
//!
//! Validates the `[simulation]`, `[strategy]` and `[risk]` sections before a
//! run starts, so malformed configuration fails fast with a pointed message
//! instead of surfacing mid-pipeline.

use chrono::DateTime;

use crate::domain::error::TicksimError;
use crate::domain::rule_parser;
use crate::ports::config_port::ConfigPort;

pub fn validate_simulation_config(config: &dyn ConfigPort) -> Result<(), TicksimError> {
    validate_starting_equity(config)?;
    validate_data_dir(config)?;
    validate_symbol(config)?;
    validate_time_window(config)?;
    Ok(())
}

pub fn validate_strategy_config(config: &dyn ConfigPort) -> Result<(), TicksimError> {
    validate_entry_exit_rules(config)?;
    validate_max_holding_bars(config)?;
    validate_stop_loss(config)?;
    validate_take_profit(config)?;
    Ok(())
}

fn validate_starting_equity(config: &dyn ConfigPort) -> Result<(), TicksimError> {
    let value = config.get_double("simulation", "starting_equity", 0.0);
    if value <= 0.0 {
        return Err(TicksimError::ConfigInvalid {
            section: "simulation".to_string(),
            key: "starting_equity".to_string(),
            reason: "starting_equity must be positive".to_string(),
        });
    }
    Ok(())
}

fn validate_data_dir(config: &dyn ConfigPort) -> Result<(), TicksimError> {
    match config.get_string("simulation", "data_dir") {
        Some(s) if !s.trim().is_empty() => Ok(()),
        _ => Err(TicksimError::ConfigMissing {
            section: "simulation".to_string(),
            key: "data_dir".to_string(),
        }),
    }
}

fn validate_symbol(config: &dyn ConfigPort) -> Result<(), TicksimError> {
    match config.get_string("simulation", "symbol") {
        Some(s) if !s.trim().is_empty() => Ok(()),
        _ => Err(TicksimError::ConfigMissing {
            section: "simulation".to_string(),
            key: "symbol".to_string(),
        }),
    }
}

fn validate_time_window(config: &dyn ConfigPort) -> Result<(), TicksimError> {
    let start = parse_optional_time(config, "start")?;
    let end = parse_optional_time(config, "end")?;

    if let (Some(start), Some(end)) = (start, end) {
        if start >= end {
            return Err(TicksimError::ConfigInvalid {
                section: "simulation".to_string(),
                key: "start".to_string(),
                reason: "start must be before end".to_string(),
            });
        }
    }
    Ok(())
}

fn parse_optional_time(
    config: &dyn ConfigPort,
    key: &str,
) -> Result<Option<DateTime<chrono::Utc>>, TicksimError> {
    match config.get_string("simulation", key) {
        None => Ok(None),
        Some(s) => DateTime::parse_from_rfc3339(&s)
            .map(|t| Some(t.with_timezone(&chrono::Utc)))
            .map_err(|_| TicksimError::ConfigInvalid {
                section: "simulation".to_string(),
                key: key.to_string(),
                reason: format!("invalid {} timestamp, expected RFC 3339", key),
            }),
    }
}

fn validate_entry_exit_rules(config: &dyn ConfigPort) -> Result<(), TicksimError> {
    let entry = config
        .get_string("strategy", "entry")
        .ok_or_else(|| TicksimError::ConfigMissing {
            section: "strategy".to_string(),
            key: "entry".to_string(),
        })?;
    rule_parser::parse_entry(&entry).map_err(|e| TicksimError::ConfigInvalid {
        section: "strategy".to_string(),
        key: "entry".to_string(),
        reason: e.to_string(),
    })?;

    let exit = config
        .get_string("strategy", "exit")
        .ok_or_else(|| TicksimError::ConfigMissing {
            section: "strategy".to_string(),
            key: "exit".to_string(),
        })?;
    rule_parser::parse_exit(&exit).map_err(|e| TicksimError::ConfigInvalid {
        section: "strategy".to_string(),
        key: "exit".to_string(),
        reason: e.to_string(),
    })?;

    Ok(())
}

fn validate_max_holding_bars(config: &dyn ConfigPort) -> Result<(), TicksimError> {
    let value = config.get_int("risk", "max_holding_bars", 0);
    if value < 1 {
        return Err(TicksimError::ConfigInvalid {
            section: "risk".to_string(),
            key: "max_holding_bars".to_string(),
            reason: "max_holding_bars must be at least 1".to_string(),
        });
    }
    Ok(())
}

fn validate_stop_loss(config: &dyn ConfigPort) -> Result<(), TicksimError> {
    let value = config.get_double("risk", "stop_loss_pct", 0.0);
    if value < 0.0 || value >= 100.0 {
        return Err(TicksimError::ConfigInvalid {
            section: "risk".to_string(),
            key: "stop_loss_pct".to_string(),
            reason: "stop_loss_pct must be in [0, 100)".to_string(),
        });
    }
    Ok(())
}

fn validate_take_profit(config: &dyn ConfigPort) -> Result<(), TicksimError> {
    let value = config.get_double("risk", "take_profit_pct", 0.0);
    if value < 0.0 {
        return Err(TicksimError::ConfigInvalid {
            section: "risk".to_string(),
            key: "take_profit_pct".to_string(),
            reason: "take_profit_pct must be non-negative".to_string(),
        });
    }
    Ok(())
}
