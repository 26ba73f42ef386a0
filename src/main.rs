//! Spreadline - Cointegration Pairs Trading Research Pipeline
//!
//! Command-line entry point: analyze a CSV price pair or generate a synthetic one.

use anyhow::{bail, Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, EnvFilter};

use spreadline::adapters::cli::{AnalyzeCmd, CliApp, Command, OutputFormat, SimulateCmd};
use spreadline::adapters::market_data::{write_pair_csv, CsvPriceSource, SyntheticPairConfig, SyntheticPairSource};
use spreadline::adapters::report::{render_full_json, render_summary_json, render_text};
use spreadline::application::{analyze_source, PairsPipeline};
use spreadline::config::{load_config, Config};
use spreadline::strategy::{PairsConfig, SignalThresholds};

fn main() -> Result<()> {
    // Load .env file if it exists (RUST_LOG and friends)
    dotenvy::dotenv().ok();

    let app = CliApp::parse();

    // The config file's log level applies unless a flag overrides it
    let file_config = match &app.command {
        Command::Analyze(cmd) => match &cmd.config {
            Some(path) => Some(
                load_config(expand(path))
                    .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
            ),
            None => None,
        },
        Command::Simulate(_) => None,
    };
    let file_level = file_config.as_ref().map(|c| c.logging.level.as_str());
    init_logging(app.verbose, app.debug, file_level)?;

    match app.command {
        Command::Analyze(cmd) => analyze_command(cmd, file_config.unwrap_or_default()),
        Command::Simulate(cmd) => simulate_command(cmd),
    }
}

fn init_logging(verbose: bool, debug: bool, file_level: Option<&str>) -> Result<()> {
    let level = if debug {
        "debug"
    } else if verbose {
        "info"
    } else {
        file_level.unwrap_or("warn")
    };

    // RUST_LOG wins when set
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    fmt().with_env_filter(filter).with_target(false).with_writer(std::io::stderr).init();
    Ok(())
}

fn expand(path: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    PathBuf::from(shellexpand::tilde(&raw).into_owned())
}

fn analyze_command(cmd: AnalyzeCmd, config: Config) -> Result<()> {
    let mut params = PairsConfig::from(&config);
    if let Some(window) = cmd.window {
        params.window = window;
    }
    if let Some(entry) = cmd.entry {
        let exit = cmd.exit.unwrap_or(params.signal.exit_th);
        params.signal = SignalThresholds::symmetric(entry.abs(), exit);
    } else if let Some(exit) = cmd.exit {
        params.signal.exit_th = exit;
    }
    if let Some(significance) = cmd.significance {
        params.significance = significance;
    }

    let pipeline = PairsPipeline::new(params).context("Invalid pipeline configuration")?;

    let data_path = match (cmd.data.as_deref().map(expand), config.data.csv_path()) {
        (Some(path), _) | (None, Some(path)) => path,
        (None, None) => bail!("No price data given: pass a CSV path or set [data] csv in the config file"),
    };

    let mut source = CsvPriceSource::new(&data_path);
    match (cmd.y_column, cmd.x_column) {
        (Some(y), Some(x)) => source = source.with_columns(y, x),
        _ => {
            if let (Some(y), Some(x)) = (config.data.y_column, config.data.x_column) {
                source = source.with_columns(y, x);
            }
        }
    }

    tracing::info!("Analyzing {}", data_path.display());
    let analysis = analyze_source(&pipeline, &source)
        .with_context(|| format!("Analysis of {} failed", data_path.display()))?;

    match cmd.format {
        OutputFormat::Text => print!("{}", render_text(&analysis)),
        OutputFormat::Json => println!("{}", render_summary_json(&analysis).context("Failed to serialize report")?),
    }

    if let Some(path) = cmd.export_json {
        let path = expand(&path);
        let json = render_full_json(&analysis).context("Failed to serialize report")?;
        std::fs::write(&path, json).with_context(|| format!("Failed to write {}", path.display()))?;
        tracing::info!("Full report written to {}", path.display());
    }

    Ok(())
}

fn simulate_command(cmd: SimulateCmd) -> Result<()> {
    if !(cmd.phi.abs() < 1.0) {
        tracing::warn!("phi = {} is not stationary; the generated pair is not cointegrated", cmd.phi);
    }

    let source = SyntheticPairSource::new(SyntheticPairConfig {
        observations: cmd.observations,
        seed: cmd.seed,
        alpha: cmd.alpha,
        beta: cmd.beta,
        spread_phi: cmd.phi,
        ..SyntheticPairConfig::default()
    });
    let pair = source.generate().context("Failed to generate synthetic pair")?;

    let output = expand(&cmd.output);
    write_pair_csv(&output, &pair).with_context(|| format!("Failed to write {}", output.display()))?;

    println!(
        "Wrote {} observations of {} ~ {} (alpha={}, beta={}, seed={}) to {}",
        pair.y.len(),
        pair.y_symbol,
        pair.x_symbol,
        cmd.alpha,
        cmd.beta,
        cmd.seed,
        output.display()
    );
    Ok(())
}
