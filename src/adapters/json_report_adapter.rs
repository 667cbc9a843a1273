//! JSON report adapter.
//!
//! Serializes a [`SimulationResult`] to pretty-printed JSON so downstream
//! consumers (equity/drawdown charts, trade tables) can render it directly.

use std::fs;
use std::path::Path;

use serde::Serialize;

use crate::domain::error::TicksimError;
use crate::domain::metrics::SimulationResult;
use crate::domain::strategy::StrategyConfig;
use crate::ports::report_port::ReportPort;

pub struct JsonReportAdapter;

/// Envelope written to disk: the result plus enough strategy context to
/// identify the run.
#[derive(Serialize)]
struct Report<'a> {
    strategy: StrategySummary,
    result: &'a SimulationResult,
}

#[derive(Serialize)]
struct StrategySummary {
    name: String,
    entry: String,
    exit: String,
    max_holding_bars: usize,
    stop_loss_pct: f64,
    take_profit_pct: f64,
}

impl ReportPort for JsonReportAdapter {
    fn write(
        &self,
        result: &SimulationResult,
        config: &StrategyConfig,
        output_path: &Path,
    ) -> Result<(), TicksimError> {
        let report = Report {
            strategy: StrategySummary {
                name: config.name.clone(),
                entry: config.entry.to_string(),
                exit: config.exit.to_string(),
                max_holding_bars: config.risk.max_holding_bars,
                stop_loss_pct: config.risk.stop_loss_pct,
                take_profit_pct: config.risk.take_profit_pct,
            },
            result,
        };

        let json = serde_json::to_string_pretty(&report).map_err(|e| TicksimError::Data {
            reason: format!("failed to serialize report: {}", e),
        })?;

        fs::write(output_path, json)?;
        Ok(())
    }
}
