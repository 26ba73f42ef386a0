//! CLI Command Definitions
//!
//! Argument parsing for the spreadline binary. Handlers live in `main.rs`.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Spreadline - cointegration pairs-trading research pipeline
#[derive(Parser, Debug)]
#[command(
    name = "spreadline",
    version = env!("CARGO_PKG_VERSION"),
    author = env!("CARGO_PKG_AUTHORS"),
    about = "Cointegration pairs-trading research pipeline",
    long_about = "Spreadline fits a hedge ratio between two price series, tests the spread \
                  for stationarity, trades its rolling z-score with a Flat/Long/Short state \
                  machine and reports the backtest."
)]
pub struct CliApp {
    /// The command to execute
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the pipeline over a CSV price pair
    Analyze(AnalyzeCmd),

    /// Write a seeded synthetic cointegrated pair to CSV
    Simulate(SimulateCmd),
}

/// Report output format
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Analyze a price pair
#[derive(Parser, Debug)]
pub struct AnalyzeCmd {
    /// CSV file: timestamp column followed by Y and X price columns
    #[arg(value_name = "CSV")]
    pub data: Option<PathBuf>,

    /// Path to configuration file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Header name of the dependent leg (requires --x-column)
    #[arg(long, value_name = "NAME", requires = "x_column")]
    pub y_column: Option<String>,

    /// Header name of the independent leg (requires --y-column)
    #[arg(long, value_name = "NAME", requires = "y_column")]
    pub x_column: Option<String>,

    /// Override rolling z-score window
    #[arg(short, long, value_name = "BARS")]
    pub window: Option<usize>,

    /// Override entry threshold (symmetric: enter at +/-ENTRY)
    #[arg(long, value_name = "Z", allow_hyphen_values = true)]
    pub entry: Option<f64>,

    /// Override exit threshold
    #[arg(long, value_name = "Z")]
    pub exit: Option<f64>,

    /// Override significance level of the unit-root test
    #[arg(long, value_name = "ALPHA")]
    pub significance: Option<f64>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Export the full report (all series) to JSON
    #[arg(long, value_name = "FILE")]
    pub export_json: Option<PathBuf>,
}

/// Generate a synthetic pair
#[derive(Parser, Debug)]
pub struct SimulateCmd {
    /// Output CSV path
    #[arg(short, long, value_name = "FILE")]
    pub output: PathBuf,

    /// Number of daily observations
    #[arg(short = 'n', long, default_value = "500")]
    pub observations: usize,

    /// RNG seed
    #[arg(long, default_value = "42")]
    pub seed: u64,

    /// Intercept of Y on X
    #[arg(long, default_value = "10.0", allow_hyphen_values = true)]
    pub alpha: f64,

    /// Hedge ratio of Y on X
    #[arg(long, default_value = "1.5", allow_hyphen_values = true)]
    pub beta: f64,

    /// AR(1) coefficient of the disturbance; values near 1 weaken cointegration
    #[arg(long, default_value = "0.8", allow_hyphen_values = true)]
    pub phi: f64,
}
