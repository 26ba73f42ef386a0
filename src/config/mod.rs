//! Configuration Module
//!
//! Loads and validates pipeline configuration from TOML files.

pub mod loader;

pub use loader::{
    load_config, BacktestSection, Config, DataSection, LoadError, LoggingSection,
    RegressionSection, SignalSection, StationaritySection,
};
