//! Hedge Ratio Estimation
//!
//! Ordinary least squares fit of `Y = alpha + beta * X` in closed form:
//! beta = cov(X, Y) / var(X), alpha = mean(Y) - beta * mean(X).
//!
//! The fit runs once over the whole supplied history. There is no rolling
//! re-estimation; a spread built from a single beta is what the backtest
//! trades.

use serde::{Deserialize, Serialize};

use crate::domain::{ensure_aligned, PairsError, PriceSeries, Stage};
use crate::strategy::stats;

/// Result of the hedge-ratio regression
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HedgeFit {
    /// Intercept (reported, not subtracted from the spread)
    pub alpha: f64,
    /// Hedge ratio
    pub beta: f64,
    /// Sample standard deviation of `Y - alpha - beta * X`
    pub residual_std: f64,
}

/// OLS hedge-ratio estimator
#[derive(Debug, Clone, Copy)]
pub struct HedgeRatioEstimator {
    min_observations: usize,
}

impl Default for HedgeRatioEstimator {
    fn default() -> Self {
        Self::new(30)
    }
}

impl HedgeRatioEstimator {
    pub fn new(min_observations: usize) -> Self {
        Self {
            // Two points always fit exactly; nothing is left for the residual std
            min_observations: min_observations.max(3),
        }
    }

    pub fn min_observations(&self) -> usize {
        self.min_observations
    }

    /// Fit `y = alpha + beta * x`
    pub fn estimate(&self, y: &PriceSeries, x: &PriceSeries) -> Result<HedgeFit, PairsError> {
        ensure_aligned(Stage::HedgeRatio, y, x)?;
        y.ensure_finite()?;
        x.ensure_finite()?;

        let n = y.len();
        if n < self.min_observations {
            return Err(PairsError::InsufficientData {
                stage: Stage::HedgeRatio,
                required: self.min_observations,
                actual: n,
            });
        }

        let ys = y.values();
        let xs = x.values();
        let mean_y = stats::mean(&ys);
        let mean_x = stats::mean(&xs);

        let mut cov = 0.0;
        let mut var_x = 0.0;
        for (yi, xi) in ys.iter().zip(xs.iter()) {
            let dx = xi - mean_x;
            cov += dx * (yi - mean_y);
            var_x += dx * dx;
        }

        // var_x is a sum of squares here
        if stats::is_zero_std((var_x / n as f64).sqrt(), mean_x) {
            return Err(PairsError::DegenerateRegression {
                stage: Stage::HedgeRatio,
                detail: "independent series has zero variance, beta is undefined".to_string(),
            });
        }

        let beta = cov / var_x;
        let alpha = mean_y - beta * mean_x;

        let residuals: Vec<f64> = ys
            .iter()
            .zip(xs.iter())
            .map(|(yi, xi)| yi - alpha - beta * xi)
            .collect();
        let residual_std = stats::sample_std(&residuals, stats::mean(&residuals));

        tracing::debug!(alpha, beta, residual_std, observations = n, "hedge ratio estimated");

        Ok(HedgeFit {
            alpha,
            beta,
            residual_std,
        })
    }
}
