//! Market data access port trait.

use chrono::{DateTime, Utc};

use crate::domain::error::TicksimError;
use crate::domain::series::Observation;

/// Supplies the ordered observation series. The engine assumes returned data
/// is complete; adapters do not retry or cache.
pub trait MarketDataPort {
    fn fetch_series(
        &self,
        symbol: &str,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> Result<Vec<Observation>, TicksimError>;

    fn list_symbols(&self) -> Result<Vec<String>, TicksimError>;

    fn get_data_range(
        &self,
        symbol: &str,
    ) -> Result<Option<(DateTime<Utc>, DateTime<Utc>, usize)>, TicksimError>;
}
