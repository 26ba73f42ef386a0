//! Backtest Layer
//!
//! Vectorised, single-pass evaluation of a position series against the spread
//! it was derived from, plus the summary metrics reported for a run.

pub mod engine;
pub mod metrics;

pub use engine::{BacktestEngine, BacktestResult, TRADING_DAYS_PER_YEAR};
