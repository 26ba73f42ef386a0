//! Source-to-report analysis
//!
//! Loads a price pair through the `PriceSource` port and runs the pipeline
//! over it.

use thiserror::Error;

use crate::application::pipeline::{PairsPipeline, PairsReport};
use crate::domain::PairsError;
use crate::ports::market_data::{MarketDataError, PriceSource};
use crate::ports::stationarity::StationarityTest;

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Market data error: {0}")]
    MarketData(#[from] MarketDataError),
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PairsError),
}

/// Report for one pair, labelled with its symbols
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct PairAnalysis {
    pub y_symbol: String,
    pub x_symbol: String,
    #[serde(flatten)]
    pub report: PairsReport,
}

/// Load a pair from `source` and run `pipeline` over it
pub fn analyze_source<T, S>(pipeline: &PairsPipeline<T>, source: &S) -> Result<PairAnalysis, AnalysisError>
where
    T: StationarityTest,
    S: PriceSource + ?Sized,
{
    tracing::info!("Loading prices from {}", source.describe());
    let pair = source.load_pair()?;
    tracing::info!(
        "Loaded {} observations: Y={} X={}",
        pair.y.len(),
        pair.y_symbol,
        pair.x_symbol
    );

    let report = pipeline.run(&pair.y, &pair.x)?;

    Ok(PairAnalysis {
        y_symbol: pair.y_symbol,
        x_symbol: pair.x_symbol,
        report,
    })
}
