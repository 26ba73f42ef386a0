//! Augmented Dickey-Fuller Test
//!
//! Regression with a constant:
//!
//!   Δy_t = c + γ·y_{t-1} + Σ_{i=1..p} δ_i·Δy_{t-i} + ε_t
//!
//! The statistic is the t-ratio of γ. Under H0 (γ = 0, unit root) it follows
//! the Dickey-Fuller distribution, not Student's t, so p-values come from
//! MacKinnon's (1994) response-surface approximation and critical values
//! from MacKinnon (2010), both for the constant-only, single-series case.
//!
//! Lag order p is either fixed or picked by minimising AIC over 0..=max_lag.
//! All candidate orders are fitted on the same sample (the one left after
//! dropping max_lag initial differences) so their AIC values are comparable;
//! the winner is then refitted on its own full sample.

use nalgebra::{DMatrix, DVector};
use statrs::function::erf::erf;

use crate::domain::{PairsError, Stage};
use crate::ports::stationarity::{CriticalValues, StationarityTest, UnitRootTest};
use crate::strategy::params::LagSelection;
use crate::strategy::stats;

/// Above this statistic the p-value is 1
const TAU_MAX: f64 = 2.74;
/// Below this statistic the p-value is 0
const TAU_MIN: f64 = -18.83;
/// Switch point between the small-p and large-p polynomials
const TAU_STAR: f64 = -1.61;
/// Small-p polynomial coefficients (ascending powers)
const TAU_SMALL_P: [f64; 3] = [2.1659, 1.4412, 0.038269];
/// Large-p polynomial coefficients (ascending powers)
const TAU_LARGE_P: [f64; 4] = [1.7339, 0.93202, -0.12745, -0.010368];

/// Critical value response surfaces: c0 + c1/T + c2/T^2 + c3/T^3
const CRIT_1PCT: [f64; 4] = [-3.43035, -6.5393, -16.786, -79.433];
const CRIT_5PCT: [f64; 4] = [-2.86154, -2.8903, -4.234, -40.040];
const CRIT_10PCT: [f64; 4] = [-2.56677, -1.5384, -2.809, 0.0];

/// Default augmented Dickey-Fuller unit-root test
#[derive(Debug, Clone, Copy, Default)]
pub struct AdfTest {
    lag: LagSelection,
}

/// OLS fit of one ADF regression
#[derive(Debug)]
struct AdfFit {
    gamma: f64,
    se_gamma: f64,
    ssr: f64,
    nobs: usize,
    regressors: usize,
}

impl AdfFit {
    fn aic(&self) -> f64 {
        let n = self.nobs as f64;
        let llf = -n / 2.0 * ((2.0 * std::f64::consts::PI).ln() + (self.ssr / n).ln() + 1.0);
        -2.0 * llf + 2.0 * self.regressors as f64
    }

    fn t_stat(&self) -> f64 {
        self.gamma / self.se_gamma
    }
}

impl AdfTest {
    pub fn new(lag: LagSelection) -> Self {
        Self { lag }
    }

    pub fn lag_selection(&self) -> LagSelection {
        self.lag
    }

    /// Default maximum lag: ceil(12 * (n/100)^(1/4)), capped so every candidate fits
    pub fn default_max_lag(n: usize) -> usize {
        let schwert = (12.0 * (n as f64 / 100.0).powf(0.25)).ceil() as usize;
        schwert.min(Self::lag_cap(n))
    }

    fn lag_cap(n: usize) -> usize {
        (n / 2).saturating_sub(2)
    }

    /// Run the test on `series`
    pub fn run(&self, series: &[f64]) -> Result<UnitRootTest, PairsError> {
        let n = series.len();
        if n < 4 {
            return Err(PairsError::InsufficientData {
                stage: Stage::Stationarity,
                required: 4,
                actual: n,
            });
        }
        if series.iter().any(|v| !v.is_finite()) {
            return Err(PairsError::DegenerateRegression {
                stage: Stage::Stationarity,
                detail: "series contains non-finite values".to_string(),
            });
        }
        let level_mean = stats::mean(series);
        if stats::is_zero_std(stats::sample_std(series, level_mean), level_mean) {
            return Err(PairsError::DegenerateRegression {
                stage: Stage::Stationarity,
                detail: "series is constant, unit-root regression is undefined".to_string(),
            });
        }

        let diffs: Vec<f64> = series.windows(2).map(|w| w[1] - w[0]).collect();

        let (used_lag, ic_best) = match self.lag {
            LagSelection::Fixed { lags } => {
                // nobs = n - 1 - p must exceed the p + 2 regressors
                let required = 2 * lags + 4;
                if n < required {
                    return Err(PairsError::InsufficientData {
                        stage: Stage::Stationarity,
                        required,
                        actual: n,
                    });
                }
                (lags, None)
            }
            LagSelection::Aic { max_lag } => {
                let cap = Self::lag_cap(n);
                let max_lag = match max_lag {
                    Some(requested) if requested > cap => {
                        tracing::debug!(requested, cap, "ADF max lag capped to sample size");
                        cap
                    }
                    Some(requested) => requested,
                    None => Self::default_max_lag(n),
                };
                let (lag, aic) = self.select_lag(series, &diffs, max_lag)?;
                (lag, Some(aic))
            }
        };

        let fit = fit_regression(series, &diffs, used_lag, used_lag)?;
        let statistic = fit.t_stat();
        if !statistic.is_finite() {
            return Err(PairsError::DegenerateRegression {
                stage: Stage::Stationarity,
                detail: "regression fits exactly, t-statistic is undefined".to_string(),
            });
        }

        let p_value = mackinnon_p_value(statistic);
        let critical_values = mackinnon_critical_values(fit.nobs);

        tracing::debug!(
            statistic,
            p_value,
            used_lag,
            nobs = fit.nobs,
            "ADF test complete"
        );

        Ok(UnitRootTest {
            statistic,
            p_value,
            used_lag,
            nobs: fit.nobs,
            critical_values: Some(critical_values),
            ic_best,
        })
    }

    /// Pick the lag order with the lowest AIC on the common sample
    fn select_lag(
        &self,
        series: &[f64],
        diffs: &[f64],
        max_lag: usize,
    ) -> Result<(usize, f64), PairsError> {
        let mut best: Option<(usize, f64)> = None;

        for lag in 0..=max_lag {
            let aic = fit_regression(series, diffs, lag, max_lag)?.aic();
            match best {
                Some((_, best_aic)) if aic >= best_aic => {}
                _ => best = Some((lag, aic)),
            }
        }

        best.ok_or_else(|| PairsError::DegenerateRegression {
            stage: Stage::Stationarity,
            detail: "no candidate lag order could be fitted".to_string(),
        })
    }
}

impl StationarityTest for AdfTest {
    fn name(&self) -> &'static str {
        "Augmented Dickey-Fuller"
    }

    fn test(&self, series: &[f64]) -> Result<UnitRootTest, PairsError> {
        self.run(series)
    }
}

/// Fit the ADF regression with `lag` lagged differences on rows start..diffs.len()
///
/// Row t regresses diffs[t] on [series[t], 1, diffs[t-1], ..., diffs[t-lag]].
fn fit_regression(
    series: &[f64],
    diffs: &[f64],
    lag: usize,
    start: usize,
) -> Result<AdfFit, PairsError> {
    let nobs = diffs.len().saturating_sub(start);
    let regressors = lag + 2;
    if nobs <= regressors {
        return Err(PairsError::InsufficientData {
            stage: Stage::Stationarity,
            required: start + regressors + 2,
            actual: series.len(),
        });
    }

    let x = DMatrix::from_fn(nobs, regressors, |row, col| {
        let t = start + row;
        match col {
            0 => series[t],
            1 => 1.0,
            i => diffs[t - (i - 1)],
        }
    });
    let y = DVector::from_iterator(nobs, diffs[start..].iter().copied());

    let xt = x.transpose();
    let xtx_inv = (&xt * &x)
        .try_inverse()
        .ok_or_else(|| PairsError::DegenerateRegression {
            stage: Stage::Stationarity,
            detail: format!("singular design matrix with {} lagged differences", lag),
        })?;
    let coef = &xtx_inv * (&xt * &y);

    let residuals = &y - &x * &coef;
    let ssr = residuals.dot(&residuals);
    let sigma2 = ssr / (nobs - regressors) as f64;
    let se_gamma = (sigma2 * xtx_inv[(0, 0)]).sqrt();

    Ok(AdfFit {
        gamma: coef[0],
        se_gamma,
        ssr,
        nobs,
        regressors,
    })
}

/// MacKinnon (1994) approximate p-value for the constant-only ADF statistic
pub fn mackinnon_p_value(statistic: f64) -> f64 {
    if statistic > TAU_MAX {
        return 1.0;
    }
    if statistic < TAU_MIN {
        return 0.0;
    }
    let z = if statistic <= TAU_STAR {
        polyval(&TAU_SMALL_P, statistic)
    } else {
        polyval(&TAU_LARGE_P, statistic)
    };
    standard_normal_cdf(z)
}

/// MacKinnon (2010) critical values for a regression with `nobs` observations
pub fn mackinnon_critical_values(nobs: usize) -> CriticalValues {
    let inv = 1.0 / nobs.max(1) as f64;
    CriticalValues {
        one_pct: polyval(&CRIT_1PCT, inv),
        five_pct: polyval(&CRIT_5PCT, inv),
        ten_pct: polyval(&CRIT_10PCT, inv),
    }
}

/// Evaluate a polynomial given ascending coefficients
fn polyval(coefficients: &[f64], x: f64) -> f64 {
    coefficients.iter().rev().fold(0.0, |acc, c| acc * x + c)
}

/// Standard normal CDF: Φ(z) = 0.5 * (1 + erf(z / sqrt(2)))
fn standard_normal_cdf(z: f64) -> f64 {
    0.5 * (1.0 + erf(z / std::f64::consts::SQRT_2))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::market_data::gaussian;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const TRIALS: u64 = 40;

    fn white_noise(seed: u64, n: usize) -> Vec<f64> {
        let mut rng = StdRng::seed_from_u64(seed);
        (0..n).map(|_| 10.0 + gaussian(&mut rng)).collect()
    }

    fn random_walk(seed: u64, n: usize) -> Vec<f64> {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut level = 100.0;
        (0..n)
            .map(|_| {
                level += gaussian(&mut rng);
                level
            })
            .collect()
    }

    #[test]
    fn test_white_noise_rejects_unit_root() {
        let adf = AdfTest::default();
        let rejections = (0..TRIALS)
            .filter(|&seed| adf.run(&white_noise(1_000 + seed, 250)).unwrap().p_value < 0.05)
            .count();

        assert!(rejections as f64 >= 0.9 * TRIALS as f64, "only {} rejections", rejections);
    }

    #[test]
    fn test_random_walk_keeps_unit_root() {
        let adf = AdfTest::default();
        let rejections = (0..TRIALS)
            .filter(|&seed| adf.run(&random_walk(5_000 + seed, 250)).unwrap().p_value < 0.05)
            .count();

        assert!(rejections as f64 <= 0.2 * TRIALS as f64, "{} false rejections", rejections);
    }

    #[test]
    fn test_fixed_lag_zero_matches_simple_regression() {
        let series = random_walk(7, 120);
        let result = AdfTest::new(LagSelection::Fixed { lags: 0 }).run(&series).unwrap();

        // Δy_t = c + γ y_{t-1}: closed-form slope and its standard error
        let dy: Vec<f64> = series.windows(2).map(|w| w[1] - w[0]).collect();
        let lagged = &series[..series.len() - 1];
        let n = dy.len() as f64;
        let mx = lagged.iter().sum::<f64>() / n;
        let my = dy.iter().sum::<f64>() / n;
        let sxx: f64 = lagged.iter().map(|x| (x - mx).powi(2)).sum();
        let sxy: f64 = lagged.iter().zip(&dy).map(|(x, y)| (x - mx) * (y - my)).sum();
        let gamma = sxy / sxx;
        let c = my - gamma * mx;
        let ssr: f64 = lagged.iter().zip(&dy).map(|(x, y)| (y - c - gamma * x).powi(2)).sum();
        let expected_t = gamma / (ssr / (n - 2.0) / sxx).sqrt();

        assert_relative_eq!(result.statistic, expected_t, epsilon = 1e-6);
        assert_eq!(result.used_lag, 0);
        assert_eq!(result.nobs, 119);
        assert!(result.ic_best.is_none());
    }

    #[test]
    fn test_fixed_lag_reports_sample() {
        let series = white_noise(11, 100);
        let result = AdfTest::new(LagSelection::Fixed { lags: 3 }).run(&series).unwrap();
        assert_eq!(result.used_lag, 3);
        assert_eq!(result.nobs, 100 - 1 - 3);
    }

    #[test]
    fn test_aic_selection_within_bounds() {
        let series = random_walk(3, 200);
        let result = AdfTest::new(LagSelection::Aic { max_lag: Some(6) }).run(&series).unwrap();
        assert!(result.used_lag <= 6);
        assert!(result.ic_best.is_some());
        assert_eq!(result.nobs, 200 - 1 - result.used_lag);
    }

    #[test]
    fn test_default_max_lag() {
        assert_eq!(AdfTest::default_max_lag(100), 12);
        assert_eq!(AdfTest::default_max_lag(250), 16);
        // capped for short series
        assert_eq!(AdfTest::default_max_lag(20), 8);
    }

    #[test]
    fn test_constant_series_is_degenerate() {
        let result = AdfTest::default().run(&[0.0; 50]);
        assert!(matches!(
            result,
            Err(PairsError::DegenerateRegression { stage: Stage::Stationarity, .. })
        ));
    }

    #[test]
    fn test_fixed_lag_too_long_for_sample() {
        let series = white_noise(1, 12);
        let result = AdfTest::new(LagSelection::Fixed { lags: 5 }).run(&series);
        assert!(matches!(result, Err(PairsError::InsufficientData { required: 14, .. })));
    }

    #[test]
    fn test_mackinnon_p_values_at_critical_points() {
        assert_relative_eq!(mackinnon_p_value(-3.43035), 0.01, epsilon = 1e-3);
        assert_relative_eq!(mackinnon_p_value(-2.86154), 0.05, epsilon = 2e-3);
        assert_relative_eq!(mackinnon_p_value(-2.56677), 0.10, epsilon = 3e-3);
        assert_eq!(mackinnon_p_value(3.0), 1.0);
        assert_eq!(mackinnon_p_value(-25.0), 0.0);
    }

    #[test]
    fn test_mackinnon_p_value_is_monotone() {
        let mut previous = 0.0;
        for i in 0..200 {
            let stat = -18.0 + i as f64 * 0.1;
            let p = mackinnon_p_value(stat);
            assert!(p >= previous - 1e-3, "p-value dropped at {}", stat);
            previous = p;
        }
    }

    #[test]
    fn test_critical_values_large_sample() {
        let cv = mackinnon_critical_values(1_000_000);
        assert_relative_eq!(cv.one_pct, -3.43035, epsilon = 1e-4);
        assert_relative_eq!(cv.five_pct, -2.86154, epsilon = 1e-4);
        assert_relative_eq!(cv.ten_pct, -2.56677, epsilon = 1e-4);

        let small = mackinnon_critical_values(100);
        assert!(small.one_pct < cv.one_pct);
        assert!(small.one_pct < small.five_pct && small.five_pct < small.ten_pct);
    }
}
