use thiserror::Error;

use crate::domain::{PairsError, PriceSeries};

/// Market data error type
#[derive(Error, Debug)]
pub enum MarketDataError {
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Data parsing error at row {row}: {reason}")]
    ParseError { row: usize, reason: String },

    #[error("Invalid price series: {0}")]
    InvalidSeries(#[from] PairsError),

    #[error("No usable rows in {0}")]
    Empty(String),
}

/// Two aligned price series: the dependent leg Y and the independent leg X
#[derive(Debug, Clone, PartialEq)]
pub struct PricePair {
    pub y_symbol: String,
    pub x_symbol: String,
    pub y: PriceSeries,
    pub x: PriceSeries,
}

/// Market data port trait
///
/// Implementations deliver both legs on one shared timestamp index. The
/// pipeline performs no interpolation or forward-fill of its own.
#[cfg_attr(test, mockall::automock)]
pub trait PriceSource: Send + Sync {
    /// Human-readable description of where the prices come from
    fn describe(&self) -> String;

    /// Load both legs of the pair
    fn load_pair(&self) -> Result<PricePair, MarketDataError>;
}
