//! CLI definition and dispatch.

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvSeriesAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::json_report_adapter::JsonReportAdapter;
use crate::domain::config_validation::{validate_simulation_config, validate_strategy_config};
use crate::domain::rule_parser;
use crate::domain::simulation;
use crate::domain::strategy::{RiskPolicy, StrategyConfig};
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::MarketDataPort;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(name = "ticksim", about = "Strategy simulation engine for market series")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a simulation
    Simulate {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        symbol: Option<String>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Show the data range for configured series
    Info {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        symbol: Option<String>,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Simulate {
            config,
            symbol,
            output,
        } => run_simulate(&config, symbol.as_deref(), output.as_ref()),
        Command::Validate { config } => run_validate(&config),
        Command::Info { config, symbol } => run_info(&config, symbol.as_deref()),
    }
}

fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        eprintln!("error: {e}");
        ExitCode::from(&e)
    })
}

/// Build the strategy configuration from the `[strategy]` and `[risk]`
/// sections. Rule parse failures are reported with a caret pointing at the
/// offending token.
pub fn build_strategy(config: &dyn ConfigPort) -> Result<StrategyConfig, ExitCode> {
    let name = config
        .get_string("strategy", "name")
        .unwrap_or_else(|| "Unnamed".to_string());

    let entry_str = config.get_string("strategy", "entry").unwrap_or_default();
    let entry = match rule_parser::parse_entry(&entry_str) {
        Ok(r) => r,
        Err(e) => {
            eprintln!(
                "error: failed to parse entry rule:\n{}",
                e.display_with_context(&entry_str)
            );
            return Err(ExitCode::from(4));
        }
    };

    let exit_str = config.get_string("strategy", "exit").unwrap_or_default();
    let exit = match rule_parser::parse_exit(&exit_str) {
        Ok(r) => r,
        Err(e) => {
            eprintln!(
                "error: failed to parse exit rule:\n{}",
                e.display_with_context(&exit_str)
            );
            return Err(ExitCode::from(4));
        }
    };

    Ok(StrategyConfig {
        name,
        entry,
        exit,
        risk: RiskPolicy {
            max_holding_bars: config.get_int("risk", "max_holding_bars", 1) as usize,
            stop_loss_pct: config.get_double("risk", "stop_loss_pct", 0.0),
            take_profit_pct: config.get_double("risk", "take_profit_pct", 0.0),
            allow_same_bar_reentry: config.get_bool("risk", "allow_same_bar_reentry", false),
        },
    })
}

fn time_window(config: &dyn ConfigPort) -> (Option<DateTime<Utc>>, Option<DateTime<Utc>>) {
    let parse = |key: &str| {
        config
            .get_string("simulation", key)
            .and_then(|s| DateTime::parse_from_rfc3339(&s).ok())
            .map(|t| t.with_timezone(&Utc))
    };
    (parse("start"), parse("end"))
}

fn resolve_symbol(symbol_override: Option<&str>, config: &dyn ConfigPort) -> Option<String> {
    match symbol_override {
        Some(s) => Some(s.to_string()),
        None => config.get_string("simulation", "symbol"),
    }
}

fn run_simulate(
    config_path: &PathBuf,
    symbol_override: Option<&str>,
    output_path: Option<&PathBuf>,
) -> ExitCode {
    // Stage 1: Load and validate config
    eprintln!("Loading config from {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    if let Err(e) = validate_simulation_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }
    if let Err(e) = validate_strategy_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    // Stage 2: Build the strategy
    let strategy = match build_strategy(&adapter) {
        Ok(s) => s,
        Err(code) => return code,
    };
    eprintln!("Loading strategy: {}", strategy.name);

    // Stage 3: Fetch the series
    let data_dir = adapter
        .get_string("simulation", "data_dir")
        .unwrap_or_default();
    let symbol = match resolve_symbol(symbol_override, &adapter) {
        Some(s) => s,
        None => {
            eprintln!("error: no symbol configured");
            return ExitCode::from(2);
        }
    };

    let data_port = CsvSeriesAdapter::new(PathBuf::from(data_dir));
    let (start, end) = time_window(&adapter);
    let series = match data_port.fetch_series(&symbol, start, end) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    eprintln!("Loaded {} observations for {}", series.len(), symbol);

    // Stage 4: Run the engine
    let starting_equity = adapter.get_double("simulation", "starting_equity", 0.0);
    let result = match simulation::run(&series, &strategy, starting_equity) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    // Stage 5: Print console summary to stderr
    eprintln!("\n=== Simulation Results ===");
    eprintln!("Trades:         {}", result.number_of_trades);
    eprintln!("Total Profit:   {:.4}", result.total_profit);
    eprintln!("Win Rate:       {:.1}%", result.win_rate * 100.0);
    eprintln!("Max Drawdown:   {:.2}%", result.max_drawdown);
    eprintln!("Final Equity:   {:.2}", result.final_equity);

    // Stage 6: Write the report
    let output = output_path
        .cloned()
        .unwrap_or_else(|| PathBuf::from("report.json"));

    match JsonReportAdapter.write(&result, &strategy, &output) {
        Ok(()) => {
            eprintln!("\nReport written to: {}", output.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: failed to write report: {e}");
            (&e).into()
        }
    }
}

fn run_validate(config_path: &PathBuf) -> ExitCode {
    eprintln!("Validating config: {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    if let Err(e) = validate_simulation_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }
    if let Err(e) = validate_strategy_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    let strategy = match build_strategy(&adapter) {
        Ok(s) => s,
        Err(code) => return code,
    };

    eprintln!("\nStrategy: {}", strategy.name);
    eprintln!("  entry: {}", strategy.entry);
    eprintln!("  exit:  {}", strategy.exit);
    eprintln!(
        "  risk:  horizon {} bars, stop {}%, take {}%",
        strategy.risk.max_holding_bars,
        strategy.risk.stop_loss_pct,
        strategy.risk.take_profit_pct,
    );

    eprintln!("\nConfiguration is valid.");
    ExitCode::SUCCESS
}

fn run_info(config_path: &PathBuf, symbol_override: Option<&str>) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let data_dir = match adapter.get_string("simulation", "data_dir") {
        Some(d) => d,
        None => {
            eprintln!("error: data_dir is required in [simulation]");
            return ExitCode::from(2);
        }
    };
    let data_port = CsvSeriesAdapter::new(PathBuf::from(data_dir));

    let symbols = match resolve_symbol(symbol_override, &adapter) {
        Some(s) => vec![s],
        None => match data_port.list_symbols() {
            Ok(s) => s,
            Err(e) => {
                eprintln!("error: {e}");
                return (&e).into();
            }
        },
    };

    for symbol in &symbols {
        match data_port.get_data_range(symbol) {
            Ok(Some((first, last, count))) => {
                println!("{}: {} observations, {} to {}", symbol, count, first, last);
            }
            Ok(None) => {
                eprintln!("{}: no data found", symbol);
            }
            Err(e) => {
                eprintln!("error querying {}: {}", symbol, e);
            }
        }
    }
    ExitCode::SUCCESS
}
