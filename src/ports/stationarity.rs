use serde::{Deserialize, Serialize};

use crate::domain::PairsError;

/// Core trait for unit-root tests
///
/// H0: the series contains a unit root (non-stationary). Any validated
/// augmented unit-root routine may implement this as long as it returns a
/// statistic and the p-value under that null.
#[cfg_attr(test, mockall::automock)]
pub trait StationarityTest: Send + Sync {
    /// Short name for reports and logs
    fn name(&self) -> &'static str;

    /// Run the test on an ordered numeric series
    fn test(&self, series: &[f64]) -> Result<UnitRootTest, PairsError>;
}

/// Raw output of a unit-root test
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitRootTest {
    /// Test statistic (more negative = stronger evidence against a unit root)
    pub statistic: f64,
    /// Approximate p-value under H0
    pub p_value: f64,
    /// Number of lagged differences in the final regression
    pub used_lag: usize,
    /// Observations in the final regression
    pub nobs: usize,
    /// Critical values at the 1%, 5% and 10% levels, when the test provides them
    pub critical_values: Option<CriticalValues>,
    /// Best information criterion value when the lag was selected automatically
    pub ic_best: Option<f64>,
}

/// Critical values of a unit-root test statistic
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CriticalValues {
    pub one_pct: f64,
    pub five_pct: f64,
    pub ten_pct: f64,
}
