//! Strategy Layer - Cointegration Spread with Z-Score Signals
//!
//! The statistical stages of the pairs pipeline:
//! - OLS hedge ratio over the full history (`HedgeRatioEstimator`)
//! - Spread construction `Y - beta * X` (`SpreadBuilder`)
//! - Augmented Dickey-Fuller unit-root test with AIC lag selection (`AdfTest`)
//! - Advisory stationarity verdict (`StationarityTester`)
//! - Rolling z-score with zero-variance exclusion (`SpreadNormalizer`)
//! - Flat/Long/Short state machine (`SignalStateMachine`)
//! - Mean, dispersion and half-life of the spread (`SpreadDiagnostics`)

pub mod adf;
pub mod diagnostics;
pub mod hedge_ratio;
pub mod params;
pub mod signal;
pub mod spread;
pub mod stationarity;
pub mod stats;
pub mod zscore;

pub use adf::AdfTest;
pub use diagnostics::SpreadDiagnostics;
pub use hedge_ratio::{HedgeFit, HedgeRatioEstimator};
pub use params::{ConfigError, LagSelection, PairsConfig, SignalThresholds};
pub use signal::SignalStateMachine;
pub use spread::SpreadBuilder;
pub use stationarity::{StationarityResult, StationarityTester};
pub use zscore::{NormalizedSpread, RollingZScore, SpreadNormalizer, UndefinedZScore, ZScoreResult};
