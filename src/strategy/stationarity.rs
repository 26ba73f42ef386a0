//! Stationarity Stage
//!
//! Applies a pluggable unit-root test to the spread and turns its p-value
//! into an advisory verdict. Nothing downstream gates on the verdict; the
//! caller decides whether a non-stationary spread is worth trading.

use serde::{Deserialize, Serialize};

use crate::domain::{PairsError, Spread, Stage};
use crate::ports::stationarity::{CriticalValues, StationarityTest};
use crate::strategy::adf::AdfTest;

/// Verdict of the stationarity stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationarityResult {
    /// Name of the test that produced the statistic
    pub test_name: String,
    pub statistic: f64,
    pub p_value: f64,
    /// Significance level the p-value was compared against
    pub significance: f64,
    /// p_value < significance
    pub is_stationary: bool,
    pub used_lag: usize,
    pub nobs: usize,
    pub critical_values: Option<CriticalValues>,
    pub ic_best: Option<f64>,
}

/// Runs a unit-root test with a significance level and a minimum length
#[derive(Debug, Clone)]
pub struct StationarityTester<T = AdfTest> {
    test: T,
    significance: f64,
    min_observations: usize,
}

impl Default for StationarityTester<AdfTest> {
    fn default() -> Self {
        Self::new(AdfTest::default(), 0.05, 20)
    }
}

impl<T: StationarityTest> StationarityTester<T> {
    pub fn new(test: T, significance: f64, min_observations: usize) -> Self {
        Self {
            test,
            significance,
            min_observations,
        }
    }

    pub fn significance(&self) -> f64 {
        self.significance
    }

    /// Test the spread for a unit root
    pub fn evaluate(&self, spread: &Spread) -> Result<StationarityResult, PairsError> {
        self.evaluate_values(&spread.values())
    }

    /// Test a plain numeric series for a unit root
    pub fn evaluate_values(&self, values: &[f64]) -> Result<StationarityResult, PairsError> {
        if values.len() < self.min_observations {
            return Err(PairsError::InsufficientData {
                stage: Stage::Stationarity,
                required: self.min_observations,
                actual: values.len(),
            });
        }

        let raw = self.test.test(values)?;
        let is_stationary = raw.p_value < self.significance;

        if is_stationary {
            tracing::info!(
                "{}: statistic {:.3}, p-value {:.4} - spread is stationary",
                self.test.name(),
                raw.statistic,
                raw.p_value
            );
        } else {
            tracing::warn!(
                "{}: statistic {:.3}, p-value {:.4} - cannot reject unit root at {}",
                self.test.name(),
                raw.statistic,
                raw.p_value,
                self.significance
            );
        }

        Ok(StationarityResult {
            test_name: self.test.name().to_string(),
            statistic: raw.statistic,
            p_value: raw.p_value,
            significance: self.significance,
            is_stationary,
            used_lag: raw.used_lag,
            nobs: raw.nobs,
            critical_values: raw.critical_values,
            ic_best: raw.ic_best,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::stationarity::{MockStationarityTest, UnitRootTest};

    fn raw(p_value: f64) -> UnitRootTest {
        UnitRootTest {
            statistic: -3.1,
            p_value,
            used_lag: 1,
            nobs: 40,
            critical_values: None,
            ic_best: None,
        }
    }

    fn mock_returning(p_value: f64) -> MockStationarityTest {
        let mut mock = MockStationarityTest::new();
        mock.expect_name().return_const("mock");
        mock.expect_test().returning(move |_| Ok(raw(p_value)));
        mock
    }

    #[test]
    fn test_verdict_uses_strict_inequality() {
        let values: Vec<f64> = (0..30).map(|i| i as f64).collect();

        let tester = StationarityTester::new(mock_returning(0.049), 0.05, 20);
        assert!(tester.evaluate_values(&values).unwrap().is_stationary);

        let tester = StationarityTester::new(mock_returning(0.05), 0.05, 20);
        let result = tester.evaluate_values(&values).unwrap();
        assert!(!result.is_stationary);
        assert_eq!(result.test_name, "mock");
        assert_eq!(result.used_lag, 1);
    }

    #[test]
    fn test_minimum_length_checked_before_test() {
        let mut mock = MockStationarityTest::new();
        mock.expect_test().never();

        let tester = StationarityTester::new(mock, 0.05, 20);
        let result = tester.evaluate_values(&[1.0; 19]);
        assert!(matches!(
            result,
            Err(PairsError::InsufficientData { stage: Stage::Stationarity, required: 20, actual: 19 })
        ));
    }

    #[test]
    fn test_test_errors_propagate() {
        let mut mock = MockStationarityTest::new();
        mock.expect_test().returning(|_| {
            Err(PairsError::DegenerateRegression {
                stage: Stage::Stationarity,
                detail: "constant".to_string(),
            })
        });

        let tester = StationarityTester::new(mock, 0.05, 5);
        assert!(matches!(
            tester.evaluate_values(&[0.0; 10]),
            Err(PairsError::DegenerateRegression { .. })
        ));
    }
}
