//! Strategy Parameters
//!
//! Configuration structs for the pairs pipeline. Defaults reproduce the
//! reference daily-bar setup: 60-bar z-score window, ±2.0 entries, 0.5 exit,
//! 5% significance on the unit-root test.

use serde::{Deserialize, Serialize};

/// Smallest number of observations the ADF regression can work with
pub const MIN_STATIONARITY_FLOOR: usize = 10;

/// Main pipeline configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairsConfig {
    /// Rolling window for the spread z-score
    pub window: usize,
    /// Entry / exit thresholds of the signal state machine
    pub signal: SignalThresholds,
    /// Significance level for rejecting the unit root
    pub significance: f64,
    /// Minimum observations for the hedge-ratio regression
    pub min_regression_obs: usize,
    /// Minimum observations for the stationarity test
    pub min_stationarity_obs: usize,
    /// Lag order policy of the ADF regression
    pub adf_lag: LagSelection,
    /// Periods per year used to annualize the Sharpe ratio
    pub periods_per_year: f64,
}

impl Default for PairsConfig {
    fn default() -> Self {
        Self {
            window: 60,
            signal: SignalThresholds::default(),
            significance: 0.05,
            min_regression_obs: 30,
            min_stationarity_obs: 20,
            adf_lag: LagSelection::default(),
            periods_per_year: 252.0,
        }
    }
}

impl PairsConfig {
    /// Create a new config with a custom z-score window
    pub fn with_window(mut self, window: usize) -> Self {
        self.window = window;
        self
    }

    /// Create a new config with custom signal thresholds
    pub fn with_thresholds(mut self, thresholds: SignalThresholds) -> Self {
        self.signal = thresholds;
        self
    }

    /// Create a new config with a custom significance level
    pub fn with_significance(mut self, significance: f64) -> Self {
        self.significance = significance;
        self
    }

    /// Create a new config with a custom ADF lag policy
    pub fn with_adf_lag(mut self, adf_lag: LagSelection) -> Self {
        self.adf_lag = adf_lag;
        self
    }

    /// Validate configuration parameters
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window < 2 {
            return Err(ConfigError::InvalidWindow(self.window));
        }
        self.signal.validate()?;
        if !(self.significance > 0.0 && self.significance < 1.0) {
            return Err(ConfigError::InvalidSignificance(self.significance));
        }
        if self.min_regression_obs < 3 {
            return Err(ConfigError::InvalidMinObservations {
                stage: "regression",
                value: self.min_regression_obs,
                floor: 3,
            });
        }
        if self.min_stationarity_obs < MIN_STATIONARITY_FLOOR {
            return Err(ConfigError::InvalidMinObservations {
                stage: "stationarity",
                value: self.min_stationarity_obs,
                floor: MIN_STATIONARITY_FLOOR,
            });
        }
        if !(self.periods_per_year > 0.0 && self.periods_per_year.is_finite()) {
            return Err(ConfigError::InvalidPeriodsPerYear(self.periods_per_year));
        }
        Ok(())
    }
}

/// Z-score thresholds of the signal state machine
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SignalThresholds {
    /// Enter short spread above this z-score
    pub entry_hi: f64,
    /// Enter long spread below this z-score
    pub entry_lo: f64,
    /// Exit any position once |z| falls below this
    pub exit_th: f64,
}

impl Default for SignalThresholds {
    fn default() -> Self {
        Self {
            entry_hi: 2.0,
            entry_lo: -2.0,
            exit_th: 0.5,
        }
    }
}

impl SignalThresholds {
    /// Symmetric thresholds: entries at ±`entry`, exit at `exit`
    pub fn symmetric(entry: f64, exit: f64) -> Self {
        Self {
            entry_hi: entry,
            entry_lo: -entry,
            exit_th: exit,
        }
    }

    /// Require entry_hi > exit_th >= 0 > entry_lo
    pub fn validate(&self) -> Result<(), ConfigError> {
        let ordered = self.entry_hi > self.exit_th && self.exit_th >= 0.0 && 0.0 > self.entry_lo;
        if !ordered || !self.entry_hi.is_finite() || !self.entry_lo.is_finite() {
            return Err(ConfigError::InvalidThresholds {
                entry_hi: self.entry_hi,
                entry_lo: self.entry_lo,
                exit_th: self.exit_th,
            });
        }
        Ok(())
    }
}

/// Lag order selection for the augmented Dickey-Fuller regression
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum LagSelection {
    /// Minimise AIC over 0..=max_lag (default max lag: ceil(12 * (n/100)^0.25))
    Aic { max_lag: Option<usize> },
    /// Always use this many lagged differences
    Fixed { lags: usize },
}

impl Default for LagSelection {
    fn default() -> Self {
        LagSelection::Aic { max_lag: None }
    }
}

/// Configuration validation errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid z-score window: {0} (minimum 2)")]
    InvalidWindow(usize),
    #[error("Invalid thresholds: entry_hi={entry_hi}, entry_lo={entry_lo}, exit_th={exit_th} (need entry_hi > exit_th >= 0 > entry_lo)")]
    InvalidThresholds {
        entry_hi: f64,
        entry_lo: f64,
        exit_th: f64,
    },
    #[error("Invalid significance: {0} (must be 0 < s < 1)")]
    InvalidSignificance(f64),
    #[error("Invalid minimum {stage} observations: {value} (minimum {floor})")]
    InvalidMinObservations {
        stage: &'static str,
        value: usize,
        floor: usize,
    },
    #[error("Invalid periods per year: {0} (must be > 0)")]
    InvalidPeriodsPerYear(f64),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PairsConfig::default();
        assert_eq!(config.window, 60);
        assert_eq!(config.signal.entry_hi, 2.0);
        assert_eq!(config.signal.entry_lo, -2.0);
        assert_eq!(config.signal.exit_th, 0.5);
        assert_eq!(config.significance, 0.05);
        assert_eq!(config.min_regression_obs, 30);
        assert_eq!(config.min_stationarity_obs, 20);
        assert_eq!(config.adf_lag, LagSelection::Aic { max_lag: None });
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_builder() {
        let config = PairsConfig::default()
            .with_window(20)
            .with_thresholds(SignalThresholds::symmetric(1.5, 0.25))
            .with_significance(0.01);
        assert_eq!(config.window, 20);
        assert_eq!(config.signal.entry_lo, -1.5);
        assert_eq!(config.signal.exit_th, 0.25);
        assert_eq!(config.significance, 0.01);
    }

    #[test]
    fn test_invalid_window() {
        let config = PairsConfig::default().with_window(1);
        assert!(matches!(config.validate(), Err(ConfigError::InvalidWindow(1))));
    }

    #[test]
    fn test_invalid_threshold_ordering() {
        // exit above entry
        let bad = SignalThresholds { entry_hi: 1.0, entry_lo: -2.0, exit_th: 1.5 };
        assert!(matches!(bad.validate(), Err(ConfigError::InvalidThresholds { .. })));

        // negative exit
        let bad = SignalThresholds { entry_hi: 2.0, entry_lo: -2.0, exit_th: -0.1 };
        assert!(bad.validate().is_err());

        // non-negative lower entry
        let bad = SignalThresholds { entry_hi: 2.0, entry_lo: 0.0, exit_th: 0.5 };
        assert!(bad.validate().is_err());

        // asymmetric is allowed
        let ok = SignalThresholds { entry_hi: 2.5, entry_lo: -1.5, exit_th: 0.0 };
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn test_invalid_significance() {
        let config = PairsConfig::default().with_significance(0.0);
        assert!(matches!(config.validate(), Err(ConfigError::InvalidSignificance(_))));

        let config = PairsConfig::default().with_significance(1.0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_min_observations() {
        let mut config = PairsConfig::default();
        config.min_regression_obs = 2;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidMinObservations { stage: "regression", .. })
        ));

        let mut config = PairsConfig::default();
        config.min_stationarity_obs = 5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_lag_selection_serde() {
        let fixed: LagSelection = serde_json::from_str(r#"{"method":"fixed","lags":2}"#).unwrap();
        assert_eq!(fixed, LagSelection::Fixed { lags: 2 });

        let aic: LagSelection = serde_json::from_str(r#"{"method":"aic","max_lag":null}"#).unwrap();
        assert_eq!(aic, LagSelection::default());
    }
}
