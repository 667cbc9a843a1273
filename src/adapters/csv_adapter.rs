//! CSV file market data adapter.
//!
//! Series files live in a base directory as `<SYMBOL>.csv` with columns
//! `timestamp,price,volume` and RFC 3339 timestamps.

use chrono::{DateTime, Utc};
use std::fs;
use std::path::PathBuf;

use crate::domain::error::TicksimError;
use crate::domain::series::Observation;
use crate::ports::data_port::MarketDataPort;

pub struct CsvSeriesAdapter {
    base_path: PathBuf,
}

impl CsvSeriesAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn series_path(&self, symbol: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", symbol))
    }

    fn read_all(&self, symbol: &str) -> Result<Vec<Observation>, TicksimError> {
        let path = self.series_path(symbol);
        let content = fs::read_to_string(&path).map_err(|e| TicksimError::Data {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut series = Vec::new();

        for result in rdr.records() {
            let record = result.map_err(|e| TicksimError::Data {
                reason: format!("CSV parse error: {}", e),
            })?;

            let timestamp_str = record.get(0).ok_or_else(|| TicksimError::Data {
                reason: "missing timestamp column".into(),
            })?;
            let timestamp = DateTime::parse_from_rfc3339(timestamp_str)
                .map(|t| t.with_timezone(&Utc))
                .map_err(|e| TicksimError::Data {
                    reason: format!("invalid timestamp '{}': {}", timestamp_str, e),
                })?;

            let price: f64 = record
                .get(1)
                .ok_or_else(|| TicksimError::Data {
                    reason: "missing price column".into(),
                })?
                .parse()
                .map_err(|e| TicksimError::Data {
                    reason: format!("invalid price value: {}", e),
                })?;

            let volume: f64 = record
                .get(2)
                .ok_or_else(|| TicksimError::Data {
                    reason: "missing volume column".into(),
                })?
                .parse()
                .map_err(|e| TicksimError::Data {
                    reason: format!("invalid volume value: {}", e),
                })?;

            series.push(Observation {
                timestamp,
                price,
                volume,
            });
        }

        series.sort_by_key(|o| o.timestamp);
        Ok(series)
    }
}

impl MarketDataPort for CsvSeriesAdapter {
    fn fetch_series(
        &self,
        symbol: &str,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> Result<Vec<Observation>, TicksimError> {
        let mut series = self.read_all(symbol)?;
        if let Some(start) = start {
            series.retain(|o| o.timestamp >= start);
        }
        if let Some(end) = end {
            series.retain(|o| o.timestamp <= end);
        }
        Ok(series)
    }

    fn list_symbols(&self) -> Result<Vec<String>, TicksimError> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| TicksimError::Data {
            reason: format!(
                "failed to read directory {}: {}",
                self.base_path.display(),
                e
            ),
        })?;

        let mut symbols = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| TicksimError::Data {
                reason: format!("directory entry error: {}", e),
            })?;

            let name = entry.file_name();
            let name_str = name.to_string_lossy();
            if let Some(symbol) = name_str.strip_suffix(".csv") {
                symbols.push(symbol.to_string());
            }
        }

        symbols.sort();
        Ok(symbols)
    }

    fn get_data_range(
        &self,
        symbol: &str,
    ) -> Result<Option<(DateTime<Utc>, DateTime<Utc>, usize)>, TicksimError> {
        let series = self.read_all(symbol)?;
        match (series.first(), series.last()) {
            (Some(first), Some(last)) => {
                Ok(Some((first.timestamp, last.timestamp, series.len())))
            }
            _ => Ok(None),
        }
    }
}
