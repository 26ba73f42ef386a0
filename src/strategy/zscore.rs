//! Rolling Z-Score
//!
//! Normalises the spread against its trailing window:
//!
//!   z = (spread - rolling_mean) / rolling_std
//!
//! with the sample (n - 1) standard deviation. The first `window - 1` points
//! have no z-score and are left out of the output entirely. A window whose
//! standard deviation is zero has no defined z-score either; that point is
//! recorded as undefined and also left out.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use chrono::{DateTime, Utc};

use crate::domain::{Observation, Spread, ZScoreSeries};
use crate::strategy::params::ConfigError;
use crate::strategy::stats;

/// Result of one z-score calculation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZScoreResult {
    /// Current z-score value
    pub z_score: f64,
    /// Rolling mean used in calculation
    pub mean: f64,
    /// Rolling sample standard deviation
    pub std_dev: f64,
    /// Current spread value
    pub current_value: f64,
}

/// Outcome of feeding one value into the rolling window
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ZScoreUpdate {
    /// Fewer than `window` values seen so far
    Warming,
    /// Window full and z-score defined
    Defined(ZScoreResult),
    /// Window full but its standard deviation is zero
    Undefined { mean: f64 },
}

/// A timestamp whose trailing window had zero standard deviation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UndefinedZScore {
    pub timestamp: DateTime<Utc>,
    /// Mean of the constant window
    pub mean: f64,
}

/// Rolling z-score over a fixed trailing window
#[derive(Debug, Clone)]
pub struct RollingZScore {
    window: usize,
    buffer: VecDeque<f64>,
}

impl RollingZScore {
    pub fn new(window: usize) -> Result<Self, ConfigError> {
        if window < 2 {
            return Err(ConfigError::InvalidWindow(window));
        }
        Ok(Self {
            window,
            buffer: VecDeque::with_capacity(window),
        })
    }

    /// Add a new value to the window and calculate its z-score
    pub fn update(&mut self, value: f64) -> ZScoreUpdate {
        self.buffer.push_back(value);
        if self.buffer.len() > self.window {
            self.buffer.pop_front();
        }

        if !self.is_ready() {
            return ZScoreUpdate::Warming;
        }

        let values = self.buffer.make_contiguous();
        let mean = stats::mean(values);
        let std_dev = stats::sample_std(values, mean);

        if stats::is_zero_std(std_dev, mean) {
            return ZScoreUpdate::Undefined { mean };
        }

        ZScoreUpdate::Defined(ZScoreResult {
            z_score: (value - mean) / std_dev,
            mean,
            std_dev,
            current_value: value,
        })
    }

    pub fn window(&self) -> usize {
        self.window
    }

    pub fn is_ready(&self) -> bool {
        self.buffer.len() >= self.window
    }

    pub fn buffer_len(&self) -> usize {
        self.buffer.len()
    }

    pub fn reset(&mut self) {
        self.buffer.clear();
    }
}

/// Z-scores plus the points that had none
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedSpread {
    pub zscores: ZScoreSeries,
    pub undefined: Vec<UndefinedZScore>,
}

/// Converts a spread into its rolling z-score series
#[derive(Debug, Clone, Copy)]
pub struct SpreadNormalizer {
    window: usize,
}

impl SpreadNormalizer {
    pub fn new(window: usize) -> Result<Self, ConfigError> {
        if window < 2 {
            return Err(ConfigError::InvalidWindow(window));
        }
        Ok(Self { window })
    }

    pub fn window(&self) -> usize {
        self.window
    }

    pub fn normalize(&self, spread: &Spread) -> NormalizedSpread {
        // window >= 2 was checked in new()
        let mut rolling = RollingZScore {
            window: self.window,
            buffer: VecDeque::with_capacity(self.window),
        };
        let mut points = Vec::with_capacity(spread.len().saturating_sub(self.window - 1));
        let mut undefined = Vec::new();

        for obs in spread {
            match rolling.update(obs.value) {
                ZScoreUpdate::Warming => {}
                ZScoreUpdate::Defined(result) => {
                    points.push(Observation::new(obs.timestamp, result.z_score));
                }
                ZScoreUpdate::Undefined { mean } => {
                    undefined.push(UndefinedZScore {
                        timestamp: obs.timestamp,
                        mean,
                    });
                }
            }
        }

        if spread.len() < self.window {
            tracing::warn!(
                "Spread has {} points, fewer than the {}-point window - no z-scores",
                spread.len(),
                self.window
            );
        }
        if !undefined.is_empty() {
            tracing::warn!(
                "{} z-score points excluded (zero rolling standard deviation)",
                undefined.len()
            );
        }
        tracing::debug!(
            window = self.window,
            defined = points.len(),
            undefined = undefined.len(),
            "spread normalized"
        );

        NormalizedSpread {
            zscores: ZScoreSeries::from_ordered(points),
            undefined,
        }
    }
}
