//! Spread Diagnostics
//!
//! Summary statistics of the spread plus its mean-reversion half-life. The
//! half-life comes from the AR(1) fit
//!
//!   Δs(t) = c + φ · s(t-1) + e(t)
//!
//! with half_life = -ln 2 / ln(1 + φ), measured in bars. It only exists for
//! -1 < φ < 0; anything else is not mean-reverting.

use serde::{Deserialize, Serialize};

use crate::domain::Spread;
use crate::strategy::stats;

/// Fewest spread points the AR(1) half-life fit is attempted on
const MIN_HALF_LIFE_POINTS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpreadDiagnostics {
    pub mean: f64,
    /// Sample standard deviation
    pub std_dev: f64,
    /// Bars for a deviation to halve, `None` if the spread does not revert
    pub half_life: Option<f64>,
}

impl SpreadDiagnostics {
    pub fn from_spread(spread: &Spread) -> Self {
        let values = spread.values();
        let mean = stats::mean(&values);
        Self {
            mean,
            std_dev: stats::sample_std(&values, mean),
            half_life: half_life(&values),
        }
    }
}

/// Mean-reversion half-life in bars
pub fn half_life(values: &[f64]) -> Option<f64> {
    if values.len() < MIN_HALF_LIFE_POINTS {
        return None;
    }

    let lagged = &values[..values.len() - 1];
    let deltas: Vec<f64> = values.windows(2).map(|w| w[1] - w[0]).collect();

    let mean_x = stats::mean(lagged);
    let mean_y = stats::mean(&deltas);

    let mut cov = 0.0;
    let mut var_x = 0.0;
    for (x, y) in lagged.iter().zip(deltas.iter()) {
        let dx = x - mean_x;
        cov += dx * (y - mean_y);
        var_x += dx * dx;
    }

    if stats::is_zero_std((var_x / lagged.len() as f64).sqrt(), mean_x) {
        return None;
    }

    let phi = cov / var_x;
    if !(phi > -1.0 && phi < 0.0) {
        return None;
    }

    let hl = -std::f64::consts::LN_2 / (1.0 + phi).ln();
    hl.is_finite().then_some(hl)
}
