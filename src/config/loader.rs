//! Configuration Loader
//!
//! Loads and validates pipeline configuration from a TOML file. Every section
//! is optional; missing sections and keys fall back to the pipeline defaults.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::strategy::params::{ConfigError, LagSelection, PairsConfig, SignalThresholds};

/// Main configuration structure matching pairs.toml
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub data: DataSection,
    #[serde(default)]
    pub regression: RegressionSection,
    #[serde(default)]
    pub stationarity: StationaritySection,
    #[serde(default)]
    pub signal: SignalSection,
    #[serde(default)]
    pub backtest: BacktestSection,
    #[serde(default)]
    pub logging: LoggingSection,
}

/// Where the price pair comes from
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DataSection {
    /// CSV file with a timestamp column and two price columns (`~` is expanded)
    pub csv: Option<String>,
    /// Header name of the dependent leg Y
    pub y_column: Option<String>,
    /// Header name of the independent leg X
    pub x_column: Option<String>,
}

impl DataSection {
    /// CSV path with `~` and environment variables expanded
    pub fn csv_path(&self) -> Option<PathBuf> {
        self.csv
            .as_deref()
            .map(|raw| PathBuf::from(shellexpand::full(raw).map_or_else(|_| raw.to_string(), |p| p.into_owned())))
    }
}

/// Hedge-ratio regression section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RegressionSection {
    /// Minimum observations for the OLS fit
    pub min_observations: usize,
}

impl Default for RegressionSection {
    fn default() -> Self {
        Self { min_observations: 30 }
    }
}

/// Unit-root test section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StationaritySection {
    /// Significance level for rejecting the unit root
    pub significance: f64,
    /// Minimum spread length for the test
    pub min_observations: usize,
    /// Lag order policy: `{ method = "aic", max_lag = 12 }` or `{ method = "fixed", lags = 1 }`
    pub lag: LagSelection,
}

impl Default for StationaritySection {
    fn default() -> Self {
        Self {
            significance: 0.05,
            min_observations: 20,
            lag: LagSelection::default(),
        }
    }
}

/// Z-score and state machine section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SignalSection {
    /// Rolling z-score window (bars)
    pub window: usize,
    /// Enter short spread above this z-score
    pub entry_hi: f64,
    /// Enter long spread below this z-score
    pub entry_lo: f64,
    /// Exit once |z| falls below this
    pub exit_th: f64,
}

impl Default for SignalSection {
    fn default() -> Self {
        let thresholds = SignalThresholds::default();
        Self {
            window: 60,
            entry_hi: thresholds.entry_hi,
            entry_lo: thresholds.entry_lo,
            exit_th: thresholds.exit_th,
        }
    }
}

/// Backtest section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BacktestSection {
    /// Bars per year for Sharpe annualization (252 for daily equities)
    pub periods_per_year: f64,
}

impl Default for BacktestSection {
    fn default() -> Self {
        Self { periods_per_year: 252.0 }
    }
}

/// Logging configuration section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level: "trace", "debug", "info", "warn", "error"
    pub level: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self { level: "warn".to_string() }
    }
}

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Configuration errors
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Invalid pipeline parameters: {0}")]
    InvalidParameters(#[from] ConfigError),
    #[error("Validation failed: {0}")]
    ValidationError(String),
}

/// Load configuration from a TOML file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, LoadError> {
    let content = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    config.validate()?;
    Ok(config)
}

impl Config {
    /// Validate all configuration parameters
    pub fn validate(&self) -> Result<(), LoadError> {
        if !LOG_LEVELS.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(LoadError::ValidationError(format!(
                "logging.level must be one of {:?}, got '{}'",
                LOG_LEVELS, self.logging.level
            )));
        }
        if self.data.y_column.is_some() != self.data.x_column.is_some() {
            return Err(LoadError::ValidationError(
                "data.y_column and data.x_column must be set together".to_string(),
            ));
        }

        PairsConfig::from(self).validate()?;
        Ok(())
    }
}

// Conversion from Config to PairsConfig
impl From<&Config> for PairsConfig {
    fn from(config: &Config) -> Self {
        PairsConfig {
            window: config.signal.window,
            signal: SignalThresholds {
                entry_hi: config.signal.entry_hi,
                entry_lo: config.signal.entry_lo,
                exit_th: config.signal.exit_th,
            },
            significance: config.stationarity.significance,
            min_regression_obs: config.regression.min_observations,
            min_stationarity_obs: config.stationarity.min_observations,
            adf_lag: config.stationarity.lag,
            periods_per_year: config.backtest.periods_per_year,
        }
    }
}
