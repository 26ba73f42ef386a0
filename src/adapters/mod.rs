//! Adapters Layer - External System Implementations
//!
//! This module contains implementations of the port traits and the outer
//! surfaces of the binary:
//! - Market Data: CSV and synthetic price sources
//! - Report: text and JSON rendering of a run
//! - CLI: Command-line argument definitions

pub mod cli;
pub mod market_data;
pub mod report;

pub use cli::CliApp;
pub use market_data::{CsvPriceSource, SyntheticPairConfig, SyntheticPairSource};
