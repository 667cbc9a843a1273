//! Report generation port trait.

use std::path::Path;

use crate::domain::error::TicksimError;
use crate::domain::metrics::SimulationResult;
use crate::domain::strategy::StrategyConfig;

/// Port for writing simulation reports.
pub trait ReportPort {
    fn write(
        &self,
        result: &SimulationResult,
        config: &StrategyConfig,
        output_path: &Path,
    ) -> Result<(), TicksimError>;
}
