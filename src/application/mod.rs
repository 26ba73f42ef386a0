//! Application Layer
//!
//! - `pipeline`: the six-stage pairs pipeline and its report
//! - `analysis`: load a pair through a `PriceSource` and analyze it

pub mod analysis;
pub mod pipeline;

pub use analysis::{analyze_source, AnalysisError, PairAnalysis};
pub use pipeline::{PairsPipeline, PairsReport, StationarityOutcome};
