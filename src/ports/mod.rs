//! Ports Layer - Trait definitions for external dependencies
//!
//! This module defines the interfaces (ports) that adapters must implement.
//! Following hexagonal architecture, these traits abstract:
//! - Price history for the two legs of a pair
//! - The unit-root test applied to the spread

pub mod market_data;
pub mod stationarity;

// Re-export main traits and types
pub use market_data::{MarketDataError, PricePair, PriceSource};
pub use stationarity::{CriticalValues, StationarityTest, UnitRootTest};
