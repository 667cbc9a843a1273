//! Market observation model and series validation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::error::TicksimError;

/// One timestamped price/volume sample of the market series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub timestamp: DateTime<Utc>,
    pub price: f64,
    pub volume: f64,
}

/// Validate a series before simulation: non-empty, timestamps non-decreasing,
/// prices finite and positive, volumes finite and non-negative.
///
/// Duplicate timestamps are permitted; sequence order is the causal tie-break.
pub fn validate_series(series: &[Observation]) -> Result<(), TicksimError> {
    if series.is_empty() {
        return Err(TicksimError::InvalidInput {
            reason: "series is empty".into(),
        });
    }

    for (i, obs) in series.iter().enumerate() {
        if !obs.price.is_finite() || obs.price <= 0.0 {
            return Err(TicksimError::InvalidInput {
                reason: format!("non-positive or non-finite price at index {}", i),
            });
        }
        if !obs.volume.is_finite() || obs.volume < 0.0 {
            return Err(TicksimError::InvalidInput {
                reason: format!("negative or non-finite volume at index {}", i),
            });
        }
        if i > 0 && obs.timestamp < series[i - 1].timestamp {
            return Err(TicksimError::InvalidInput {
                reason: format!("timestamps out of order at index {}", i),
            });
        }
    }

    Ok(())
}
