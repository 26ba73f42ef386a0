//! Market Data Adapters
//!
//! Price sources implementing the `PriceSource` port:
//! - `CsvPriceSource`: a timestamp column plus two price columns
//! - `SyntheticPairSource`: seeded cointegrated pair for demos and tests

mod csv_source;
mod synthetic;

pub use csv_source::{write_pair_csv, CsvPriceSource};
pub use synthetic::{gaussian, SyntheticPairConfig, SyntheticPairSource};
