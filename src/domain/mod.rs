//! Domain Layer - Core types for the pairs pipeline
//!
//! Pure value types with no I/O:
//! - `series`: timestamped, strictly ordered series (prices, spread, z-scores, positions)
//! - `position`: the Flat / Long / Short spread position
//! - `error`: pipeline error kinds with stage context

pub mod error;
pub mod position;
pub mod series;

pub use error::{PairsError, Stage};
pub use position::SignalState;
pub use series::{
    ensure_aligned, Observation, PositionSeries, PriceSeries, Spread, TimeSeries, ZScoreSeries,
};
