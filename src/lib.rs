//! Spreadline - Cointegration Pairs Trading Research Pipeline
//!
//! Fits a static hedge ratio between two price series, tests the resulting
//! spread for a unit root, converts it to a rolling z-score, drives a
//! Flat/Long/Short state machine from it and backtests the positions.
//!
//! # Modules
//!
//! - `domain`: Core value types (TimeSeries, SignalState, PairsError)
//! - `ports`: Trait abstractions (StationarityTest, PriceSource)
//! - `strategy`: Pipeline stages (HedgeRatio, Spread, ADF, Z-Score, Signals)
//! - `backtest`: Lagged-position backtest and performance metrics
//! - `application`: The pairs pipeline and its report
//! - `adapters`: External implementations (CSV, synthetic data, report, CLI)
//! - `config`: Configuration loading and validation

pub mod adapters;
pub mod application;
pub mod backtest;
pub mod config;
pub mod domain;
pub mod ports;
pub mod strategy;

pub use application::{PairsPipeline, PairsReport, StationarityOutcome};
pub use domain::{PairsError, PriceSeries, SignalState, TimeSeries};
pub use strategy::PairsConfig;
