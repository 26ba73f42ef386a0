//! Time Series
//!
//! Ordered, immutable (timestamp, value) sequences shared by every pipeline
//! stage. Timestamps are strictly increasing; construction rejects anything
//! else so downstream stages can rely on ordering without re-checking it.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::error::{PairsError, Stage};
use crate::domain::position::SignalState;

/// A single timestamped value
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Observation<T> {
    pub timestamp: DateTime<Utc>,
    pub value: T,
}

impl<T> Observation<T> {
    pub fn new(timestamp: DateTime<Utc>, value: T) -> Self {
        Self { timestamp, value }
    }
}

/// Ordered sequence of observations with strictly increasing timestamps
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct TimeSeries<T> {
    points: Vec<Observation<T>>,
}

/// Prices of one asset
pub type PriceSeries = TimeSeries<f64>;
/// Residual series `Y - beta*X`
pub type Spread = TimeSeries<f64>;
/// Rolling z-score of the spread
pub type ZScoreSeries = TimeSeries<f64>;
/// Signal state per z-score timestamp
pub type PositionSeries = TimeSeries<SignalState>;

impl<T> TimeSeries<T> {
    /// Build a series, rejecting duplicate or out-of-order timestamps
    pub fn new(points: Vec<Observation<T>>) -> Result<Self, PairsError> {
        for (index, pair) in points.windows(2).enumerate() {
            if pair[1].timestamp <= pair[0].timestamp {
                return Err(PairsError::InvalidSeries {
                    index: index + 1,
                    reason: format!(
                        "timestamps must be strictly increasing ({} follows {})",
                        pair[1].timestamp, pair[0].timestamp
                    ),
                });
            }
        }
        Ok(Self { points })
    }

    /// Build a series from (timestamp, value) tuples
    pub fn from_pairs<I>(pairs: I) -> Result<Self, PairsError>
    where
        I: IntoIterator<Item = (DateTime<Utc>, T)>,
    {
        Self::new(
            pairs
                .into_iter()
                .map(|(timestamp, value)| Observation::new(timestamp, value))
                .collect(),
        )
    }

    /// Build from points already known to be ordered (derived from a validated series)
    pub(crate) fn from_ordered(points: Vec<Observation<T>>) -> Self {
        debug_assert!(points.windows(2).all(|w| w[0].timestamp < w[1].timestamp));
        Self { points }
    }

    pub fn empty() -> Self {
        Self { points: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[Observation<T>] {
        &self.points
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Observation<T>> {
        self.points.iter()
    }

    pub fn get(&self, index: usize) -> Option<&Observation<T>> {
        self.points.get(index)
    }

    pub fn first(&self) -> Option<&Observation<T>> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&Observation<T>> {
        self.points.last()
    }

    pub fn timestamps(&self) -> impl Iterator<Item = DateTime<Utc>> + '_ {
        self.points.iter().map(|p| p.timestamp)
    }

    /// Index of `timestamp` in this series
    pub fn position_of(&self, timestamp: DateTime<Utc>) -> Option<usize> {
        self.points
            .binary_search_by(|p| p.timestamp.cmp(&timestamp))
            .ok()
    }
}

impl<T: Copy> TimeSeries<T> {
    pub fn values(&self) -> Vec<T> {
        self.points.iter().map(|p| p.value).collect()
    }
}

impl TimeSeries<f64> {
    /// Reject NaN or infinite values
    pub fn ensure_finite(&self) -> Result<(), PairsError> {
        match self.points.iter().position(|p| !p.value.is_finite()) {
            Some(index) => Err(PairsError::InvalidSeries {
                index,
                reason: format!("non-finite value {}", self.points[index].value),
            }),
            None => Ok(()),
        }
    }
}

impl<'a, T> IntoIterator for &'a TimeSeries<T> {
    type Item = &'a Observation<T>;
    type IntoIter = std::slice::Iter<'a, Observation<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

/// Check that two series share the identical timestamp index
pub fn ensure_aligned<A, B>(
    stage: Stage,
    left: &TimeSeries<A>,
    right: &TimeSeries<B>,
) -> Result<(), PairsError> {
    if let Some(index) = left
        .timestamps()
        .zip(right.timestamps())
        .position(|(l, r)| l != r)
    {
        return Err(PairsError::MisalignedSeries {
            stage,
            index,
            detail: format!(
                "timestamp {} does not match {}",
                left.points[index].timestamp, right.points[index].timestamp
            ),
        });
    }

    if left.len() != right.len() {
        return Err(PairsError::MisalignedSeries {
            stage,
            index: left.len().min(right.len()),
            detail: format!("lengths differ ({} vs {})", left.len(), right.len()),
        });
    }

    Ok(())
}


#[cfg(test)]
mod tests {
    use super::test_support::{daily_series, day};
    use super::*;

    #[test]
    fn test_series_creation() {
        let series = daily_series(&[1.0, 2.0, 3.0]);
        assert_eq!(series.len(), 3);
        assert_eq!(series.values(), vec![1.0, 2.0, 3.0]);
        assert_eq!(series.first().unwrap().timestamp, day(0));
        assert_eq!(series.last().unwrap().value, 3.0);
    }

    #[test]
    fn test_duplicate_timestamp_rejected() {
        let result = TimeSeries::from_pairs(vec![(day(0), 1.0), (day(1), 2.0), (day(1), 3.0)]);
        assert!(matches!(result, Err(PairsError::InvalidSeries { index: 2, .. })));
    }

    #[test]
    fn test_out_of_order_rejected() {
        let result = TimeSeries::from_pairs(vec![(day(3), 1.0), (day(1), 2.0)]);
        assert!(matches!(result, Err(PairsError::InvalidSeries { index: 1, .. })));
    }

    #[test]
    fn test_ensure_finite() {
        let series = daily_series(&[1.0, f64::NAN, 3.0]);
        assert!(matches!(
            series.ensure_finite(),
            Err(PairsError::InvalidSeries { index: 1, .. })
        ));
        assert!(daily_series(&[1.0, 2.0]).ensure_finite().is_ok());
    }

    #[test]
    fn test_position_of() {
        let series = daily_series(&[1.0, 2.0, 3.0]);
        assert_eq!(series.position_of(day(2)), Some(2));
        assert_eq!(series.position_of(day(7)), None);
    }

    #[test]
    fn test_alignment_check() {
        let a = daily_series(&[1.0, 2.0, 3.0]);
        let b = daily_series(&[4.0, 5.0, 6.0]);
        assert!(ensure_aligned(Stage::Spread, &a, &b).is_ok());

        let shorter = daily_series(&[4.0, 5.0]);
        assert!(matches!(
            ensure_aligned(Stage::Spread, &a, &shorter),
            Err(PairsError::MisalignedSeries { index: 2, .. })
        ));

        let shifted =
            TimeSeries::from_pairs(vec![(day(0), 1.0), (day(2), 2.0), (day(3), 3.0)]).unwrap();
        let err = ensure_aligned(Stage::HedgeRatio, &a, &shifted).unwrap_err();
        assert!(matches!(
            err,
            PairsError::MisalignedSeries { stage: Stage::HedgeRatio, index: 1, .. }
        ));
    }
}
