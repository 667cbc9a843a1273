//! CLI integration tests for simulation orchestration.
//!
//! Tests cover:
//! - Strategy construction from INI config (build_strategy)
//! - Config validation surfaces pointed errors
//! - Full file-based pipeline: INI config + CSV series → engine → JSON report

use std::fs;

use ticksim::adapters::csv_adapter::CsvSeriesAdapter;
use ticksim::adapters::file_config_adapter::FileConfigAdapter;
use ticksim::adapters::json_report_adapter::JsonReportAdapter;
use ticksim::cli;
use ticksim::domain::config_validation::{
    validate_simulation_config, validate_strategy_config,
};
use ticksim::domain::error::TicksimError;
use ticksim::domain::simulation;
use ticksim::domain::strategy::{EntryRule, ExitRule};
use ticksim::ports::data_port::MarketDataPort;
use ticksim::ports::report_port::ReportPort;

const VALID_INI: &str = r#"
[simulation]
data_dir = ./data
symbol = SOLUSD
starting_equity = 10000.0

[strategy]
name = Momentum Scalp
entry = ma_crossover(3, 8)
exit = profit_target(2.0)

[risk]
max_holding_bars = 5
stop_loss_pct = 3.0
take_profit_pct = 6.0
allow_same_bar_reentry = false
"#;

mod strategy_building {
    use super::*;

    #[test]
    fn build_strategy_from_valid_ini() {
        let adapter = FileConfigAdapter::from_string(VALID_INI).unwrap();
        let strategy = cli::build_strategy(&adapter).unwrap();

        assert_eq!(strategy.name, "Momentum Scalp");
        assert_eq!(strategy.entry, EntryRule::MaCrossover { short: 3, long: 8 });
        assert_eq!(strategy.exit, ExitRule::ProfitTarget { pct: 2.0 });
        assert_eq!(strategy.risk.max_holding_bars, 5);
        assert!((strategy.risk.stop_loss_pct - 3.0).abs() < f64::EPSILON);
        assert!((strategy.risk.take_profit_pct - 6.0).abs() < f64::EPSILON);
        assert!(!strategy.risk.allow_same_bar_reentry);
        assert!(strategy.validate().is_ok());
    }

    #[test]
    fn build_strategy_defaults_name_and_risk() {
        let ini = r#"
[strategy]
entry = always
exit = never

[risk]
max_holding_bars = 2
"#;
        let adapter = FileConfigAdapter::from_string(ini).unwrap();
        let strategy = cli::build_strategy(&adapter).unwrap();

        assert_eq!(strategy.name, "Unnamed");
        assert_eq!(strategy.entry, EntryRule::Always);
        assert_eq!(strategy.exit, ExitRule::Never);
        assert!((strategy.risk.stop_loss_pct - 0.0).abs() < f64::EPSILON);
        assert!((strategy.risk.take_profit_pct - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn build_strategy_rejects_unparseable_rule() {
        let ini = "[strategy]\nentry = moon_phase(3)\nexit = never\n";
        let adapter = FileConfigAdapter::from_string(ini).unwrap();
        assert!(cli::build_strategy(&adapter).is_err());
    }
}

mod config_validation_errors {
    use super::*;

    #[test]
    fn valid_ini_passes_both_validators() {
        let adapter = FileConfigAdapter::from_string(VALID_INI).unwrap();
        assert!(validate_simulation_config(&adapter).is_ok());
        assert!(validate_strategy_config(&adapter).is_ok());
    }

    #[test]
    fn missing_data_dir_is_a_config_error() {
        let ini = "[simulation]\nsymbol = SOLUSD\nstarting_equity = 10000\n";
        let adapter = FileConfigAdapter::from_string(ini).unwrap();
        let err = validate_simulation_config(&adapter).unwrap_err();
        assert!(matches!(err, TicksimError::ConfigMissing { key, .. } if key == "data_dir"));
    }

    #[test]
    fn bad_rule_is_a_config_error() {
        let ini = r#"
[simulation]
data_dir = ./data
symbol = SOLUSD
starting_equity = 10000

[strategy]
entry = price_above(banana)
exit = never

[risk]
max_holding_bars = 5
"#;
        let adapter = FileConfigAdapter::from_string(ini).unwrap();
        let err = validate_strategy_config(&adapter).unwrap_err();
        assert!(matches!(err, TicksimError::ConfigInvalid { key, .. } if key == "entry"));
    }
}

mod file_based_pipeline {
    use super::*;

    /// End to end through the same stages the `simulate` subcommand runs:
    /// config file → validation → strategy → CSV series → engine → report.
    #[test]
    fn simulate_pipeline_writes_report() {
        let dir = tempfile::TempDir::new().unwrap();
        let data_dir = dir.path().join("data");
        fs::create_dir(&data_dir).unwrap();

        fs::write(
            data_dir.join("SOLUSD.csv"),
            "timestamp,price,volume\n\
             2024-01-15T10:00:00Z,100.0,1000\n\
             2024-01-15T10:01:00Z,110.0,1000\n\
             2024-01-15T10:02:00Z,90.0,1000\n\
             2024-01-15T10:03:00Z,120.0,1000\n",
        )
        .unwrap();

        let config_content = format!(
            r#"
[simulation]
data_dir = {}
symbol = SOLUSD
starting_equity = 10000.0

[strategy]
name = Horizon Scalp
entry = always
exit = never

[risk]
max_holding_bars = 1
"#,
            data_dir.display()
        );
        let config_path = dir.path().join("sim.ini");
        fs::write(&config_path, config_content).unwrap();

        let adapter = FileConfigAdapter::from_file(&config_path).unwrap();
        validate_simulation_config(&adapter).unwrap();
        validate_strategy_config(&adapter).unwrap();

        let strategy = cli::build_strategy(&adapter).unwrap();
        let data_port = CsvSeriesAdapter::new(data_dir.clone());
        let series = data_port.fetch_series("SOLUSD", None, None).unwrap();
        assert_eq!(series.len(), 4);

        let result = simulation::run(&series, &strategy, 10_000.0).unwrap();
        assert_eq!(result.number_of_trades, 2);
        assert!((result.total_profit - 40.0).abs() < f64::EPSILON);

        let report_path = dir.path().join("report.json");
        JsonReportAdapter
            .write(&result, &strategy, &report_path)
            .unwrap();

        let report: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&report_path).unwrap()).unwrap();
        assert_eq!(report["strategy"]["name"], "Horizon Scalp");
        assert_eq!(report["result"]["number_of_trades"], 2);
        assert_eq!(report["result"]["total_profit"], 40.0);
        assert_eq!(report["result"]["equity_curve"][1], 10_040.0);
    }

    #[test]
    fn missing_series_file_is_a_data_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let data_port = CsvSeriesAdapter::new(dir.path().to_path_buf());

        let result = data_port.fetch_series("GHOST", None, None);
        assert!(matches!(result, Err(TicksimError::Data { .. })));
    }
}
