//! Spread construction: `Y[t] - beta * X[t]`
//!
//! Alpha is deliberately left in the spread. The traded hedge is one unit of
//! Y against beta units of X; the intercept only shifts the spread level and
//! is absorbed by the rolling z-score mean.

use crate::domain::{ensure_aligned, Observation, PairsError, PriceSeries, Spread, Stage};
use crate::strategy::hedge_ratio::HedgeFit;

#[derive(Debug, Clone, Copy, Default)]
pub struct SpreadBuilder;

impl SpreadBuilder {
    pub fn build(y: &PriceSeries, x: &PriceSeries, fit: &HedgeFit) -> Result<Spread, PairsError> {
        ensure_aligned(Stage::Spread, y, x)?;

        let points = y
            .iter()
            .zip(x.iter())
            .map(|(py, px)| Observation::new(py.timestamp, py.value - fit.beta * px.value))
            .collect();

        Ok(Spread::from_ordered(points))
    }
}
