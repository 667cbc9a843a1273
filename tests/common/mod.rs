#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use std::collections::HashMap;
use ticksim::domain::error::TicksimError;
pub use ticksim::domain::series::Observation;
use ticksim::domain::strategy::{EntryRule, ExitRule, RiskPolicy, StrategyConfig};
use ticksim::ports::data_port::MarketDataPort;

pub struct MockDataPort {
    pub data: HashMap<String, Vec<Observation>>,
    pub errors: HashMap<String, String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_series(mut self, symbol: &str, series: Vec<Observation>) -> Self {
        self.data.insert(symbol.to_string(), series);
        self
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(symbol.to_string(), reason.to_string());
        self
    }
}

impl MarketDataPort for MockDataPort {
    fn fetch_series(
        &self,
        symbol: &str,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> Result<Vec<Observation>, TicksimError> {
        if let Some(reason) = self.errors.get(symbol) {
            return Err(TicksimError::Data {
                reason: reason.clone(),
            });
        }
        let mut series = self.data.get(symbol).cloned().unwrap_or_default();
        if let Some(start) = start {
            series.retain(|o| o.timestamp >= start);
        }
        if let Some(end) = end {
            series.retain(|o| o.timestamp <= end);
        }
        Ok(series)
    }

    fn list_symbols(&self) -> Result<Vec<String>, TicksimError> {
        let mut symbols: Vec<String> = self.data.keys().cloned().collect();
        symbols.sort();
        Ok(symbols)
    }

    fn get_data_range(
        &self,
        symbol: &str,
    ) -> Result<Option<(DateTime<Utc>, DateTime<Utc>, usize)>, TicksimError> {
        if let Some(reason) = self.errors.get(symbol) {
            return Err(TicksimError::Data {
                reason: reason.clone(),
            });
        }
        match self.data.get(symbol) {
            Some(series) if !series.is_empty() => Ok(Some((
                series.first().unwrap().timestamp,
                series.last().unwrap().timestamp,
                series.len(),
            ))),
            _ => Ok(None),
        }
    }
}

pub fn ts(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(secs, 0).unwrap()
}

pub fn make_obs(secs: i64, price: f64) -> Observation {
    Observation {
        timestamp: ts(secs),
        price,
        volume: 1000.0,
    }
}

/// One observation per minute, prices taken from the slice.
pub fn make_series(prices: &[f64]) -> Vec<Observation> {
    prices
        .iter()
        .enumerate()
        .map(|(i, &price)| make_obs(i as i64 * 60, price))
        .collect()
}

/// Always-enter / never-exit strategy bounded only by the holding horizon.
pub fn horizon_strategy(max_holding_bars: usize) -> StrategyConfig {
    StrategyConfig {
        name: "Horizon".into(),
        entry: EntryRule::Always,
        exit: ExitRule::Never,
        risk: RiskPolicy {
            max_holding_bars,
            stop_loss_pct: 0.0,
            take_profit_pct: 0.0,
            allow_same_bar_reentry: false,
        },
    }
}
