//! Pipeline Errors
//!
//! Every fatal condition names the stage that raised it and the constraint
//! that was violated, so a failed run can be diagnosed from the message alone.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Pipeline stage that produced an error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Stage {
    HedgeRatio,
    Spread,
    Stationarity,
    Normalization,
    Signal,
    Backtest,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::HedgeRatio => write!(f, "hedge ratio"),
            Stage::Spread => write!(f, "spread"),
            Stage::Stationarity => write!(f, "stationarity"),
            Stage::Normalization => write!(f, "normalization"),
            Stage::Signal => write!(f, "signal"),
            Stage::Backtest => write!(f, "backtest"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PairsError {
    #[error("{stage} stage: insufficient data, requires {required} observations, got {actual}")]
    InsufficientData {
        stage: Stage,
        required: usize,
        actual: usize,
    },

    #[error("{stage} stage: misaligned series at index {index}: {detail}")]
    MisalignedSeries {
        stage: Stage,
        index: usize,
        detail: String,
    },

    #[error("{stage} stage: degenerate regression: {detail}")]
    DegenerateRegression { stage: Stage, detail: String },

    #[error("Invalid series at index {index}: {reason}")]
    InvalidSeries { index: usize, reason: String },
}

impl PairsError {
    /// Stage that raised the error, if any
    pub fn stage(&self) -> Option<Stage> {
        match self {
            PairsError::InsufficientData { stage, .. }
            | PairsError::MisalignedSeries { stage, .. }
            | PairsError::DegenerateRegression { stage, .. } => Some(*stage),
            PairsError::InvalidSeries { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_names_stage() {
        let err = PairsError::InsufficientData {
            stage: Stage::HedgeRatio,
            required: 30,
            actual: 12,
        };
        assert_eq!(
            err.to_string(),
            "hedge ratio stage: insufficient data, requires 30 observations, got 12"
        );
        assert_eq!(err.stage(), Some(Stage::HedgeRatio));
    }

    #[test]
    fn test_invalid_series_has_no_stage() {
        let err = PairsError::InvalidSeries {
            index: 3,
            reason: "timestamps must be strictly increasing".to_string(),
        };
        assert!(err.stage().is_none());
    }
}
