//! Pairs Pipeline
//!
//! Runs the six stages in order over two aligned price series:
//! hedge ratio -> spread -> stationarity -> z-score -> signals -> backtest.
//!
//! Every run is a pure function of the inputs and the configuration. Fatal
//! conditions abort with the stage that raised them. The stationarity verdict
//! is advisory: a non-stationary spread is still normalised and backtested,
//! and a spread the unit-root regression cannot even be fitted on is reported
//! as untestable instead of failing the run.

use serde::Serialize;

use crate::backtest::{BacktestEngine, BacktestResult};
use crate::domain::{PairsError, PositionSeries, PriceSeries, Spread, ZScoreSeries};
use crate::ports::stationarity::StationarityTest;
use crate::strategy::{
    AdfTest, ConfigError, HedgeFit, HedgeRatioEstimator, PairsConfig, SignalStateMachine,
    SpreadBuilder, SpreadDiagnostics, SpreadNormalizer, StationarityResult, StationarityTester,
    UndefinedZScore,
};

/// Stationarity stage outcome
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StationarityOutcome {
    /// The unit-root test ran
    Tested(StationarityResult),
    /// The unit-root regression was degenerate (e.g. a constant spread)
    Untestable { reason: String },
}

impl StationarityOutcome {
    pub fn result(&self) -> Option<&StationarityResult> {
        match self {
            StationarityOutcome::Tested(result) => Some(result),
            StationarityOutcome::Untestable { .. } => None,
        }
    }

    /// True only when the test ran and rejected the unit root
    pub fn is_stationary(&self) -> bool {
        self.result().is_some_and(|r| r.is_stationary)
    }
}

/// Everything one run produces
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PairsReport {
    pub config: PairsConfig,
    pub hedge: HedgeFit,
    pub spread: Spread,
    pub stationarity: StationarityOutcome,
    pub diagnostics: SpreadDiagnostics,
    pub zscores: ZScoreSeries,
    /// Timestamps whose z-score window had zero standard deviation
    pub undefined_zscores: Vec<UndefinedZScore>,
    pub positions: PositionSeries,
    pub backtest: BacktestResult,
}

/// Cointegration pairs pipeline
#[derive(Debug, Clone)]
pub struct PairsPipeline<T = AdfTest> {
    config: PairsConfig,
    hedge: HedgeRatioEstimator,
    stationarity: StationarityTester<T>,
    normalizer: SpreadNormalizer,
    signals: SignalStateMachine,
    backtest: BacktestEngine,
}

impl PairsPipeline<AdfTest> {
    /// Pipeline with the default ADF test using the configured lag policy
    pub fn new(config: PairsConfig) -> Result<Self, ConfigError> {
        let test = AdfTest::new(config.adf_lag);
        Self::with_test(config, test)
    }
}

impl<T: StationarityTest> PairsPipeline<T> {
    /// Pipeline with a custom unit-root test
    pub fn with_test(config: PairsConfig, test: T) -> Result<Self, ConfigError> {
        config.validate()?;

        Ok(Self {
            hedge: HedgeRatioEstimator::new(config.min_regression_obs),
            stationarity: StationarityTester::new(test, config.significance, config.min_stationarity_obs),
            normalizer: SpreadNormalizer::new(config.window)?,
            signals: SignalStateMachine::new(config.signal)?,
            backtest: BacktestEngine::new(config.periods_per_year),
            config,
        })
    }

    pub fn config(&self) -> &PairsConfig {
        &self.config
    }

    /// Run every stage over `y` (dependent) and `x` (independent)
    pub fn run(&self, y: &PriceSeries, x: &PriceSeries) -> Result<PairsReport, PairsError> {
        let hedge = self.hedge.estimate(y, x)?;
        let spread = SpreadBuilder::build(y, x, &hedge)?;

        let stationarity = match self.stationarity.evaluate(&spread) {
            Ok(result) => StationarityOutcome::Tested(result),
            Err(PairsError::DegenerateRegression { detail, .. }) => {
                tracing::warn!("Stationarity test not applicable: {}", detail);
                StationarityOutcome::Untestable { reason: detail }
            }
            Err(e) => return Err(e),
        };

        let diagnostics = SpreadDiagnostics::from_spread(&spread);
        let normalized = self.normalizer.normalize(&spread);
        let positions = self.signals.run(&normalized.zscores);
        let backtest = self.backtest.run(&positions, &spread)?;

        tracing::info!(
            "Pipeline complete: beta={:.4}, alpha={:.4}, stationary={}, z-scores={}, trades={}, sharpe={}, max_dd={:.4}",
            hedge.beta,
            hedge.alpha,
            stationarity.is_stationary(),
            normalized.zscores.len(),
            backtest.trade_count,
            backtest.sharpe.map_or_else(|| "undefined".to_string(), |s| format!("{:.3}", s)),
            backtest.max_drawdown
        );

        Ok(PairsReport {
            config: self.config.clone(),
            hedge,
            spread,
            stationarity,
            diagnostics,
            zscores: normalized.zscores,
            undefined_zscores: normalized.undefined,
            positions,
            backtest,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::series::test_support::daily_series;
    use crate::domain::{SignalState, Stage};
    use crate::ports::stationarity::{MockStationarityTest, UnitRootTest};
    use crate::strategy::SignalThresholds;

    fn wavy_pair(n: usize) -> (PriceSeries, PriceSeries) {
        let xs: Vec<f64> = (0..n).map(|i| 100.0 + i as f64 * 0.2 + (i as f64 * 0.05).sin() * 4.0).collect();
        let ys: Vec<f64> = xs
            .iter()
            .enumerate()
            .map(|(i, x)| 5.0 + 1.5 * x + (i as f64 * 0.9).sin() * 2.0)
            .collect();
        (daily_series(&ys), daily_series(&xs))
    }

    fn mock_test(p_value: f64) -> MockStationarityTest {
        let mut mock = MockStationarityTest::new();
        mock.expect_name().return_const("mock");
        mock.expect_test().returning(move |series| {
            Ok(UnitRootTest {
                statistic: -4.0,
                p_value,
                used_lag: 0,
                nobs: series.len() - 1,
                critical_values: None,
                ic_best: None,
            })
        });
        mock
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = PairsConfig::default().with_window(1);
        assert!(matches!(PairsPipeline::new(config), Err(ConfigError::InvalidWindow(1))));
    }

    #[test]
    fn test_non_stationary_verdict_does_not_gate() {
        let (y, x) = wavy_pair(200);
        let config = PairsConfig::default()
            .with_window(20)
            .with_thresholds(SignalThresholds::symmetric(1.0, 0.2));
        let pipeline = PairsPipeline::with_test(config, mock_test(0.9)).unwrap();

        let report = pipeline.run(&y, &x).unwrap();

        assert!(!report.stationarity.is_stationary());
        assert_eq!(report.zscores.len(), 181);
        assert_eq!(report.positions.len(), report.zscores.len());
        assert!(report.backtest.trade_count > 0);
    }

    #[test]
    fn test_degenerate_unit_root_regression_is_untestable() {
        let (y, x) = wavy_pair(80);
        let mut mock = MockStationarityTest::new();
        mock.expect_test().returning(|_| {
            Err(PairsError::DegenerateRegression {
                stage: Stage::Stationarity,
                detail: "constant".to_string(),
            })
        });
        let pipeline = PairsPipeline::with_test(PairsConfig::default(), mock).unwrap();

        let report = pipeline.run(&y, &x).unwrap();

        assert_eq!(
            report.stationarity,
            StationarityOutcome::Untestable { reason: "constant".to_string() }
        );
        assert!(!report.stationarity.is_stationary());
    }

    #[test]
    fn test_stationarity_insufficient_data_aborts() {
        let (y, x) = wavy_pair(35);
        let config = PairsConfig {
            min_stationarity_obs: 40,
            ..PairsConfig::default()
        };
        let pipeline = PairsPipeline::with_test(config, mock_test(0.01)).unwrap();

        let result = pipeline.run(&y, &x);

        assert!(matches!(
            result,
            Err(PairsError::InsufficientData { stage: Stage::Stationarity, required: 40, actual: 35 })
        ));
    }

    #[test]
    fn test_positions_follow_zscores() {
        let (y, x) = wavy_pair(150);
        let config = PairsConfig::default().with_window(30);
        let pipeline = PairsPipeline::with_test(config, mock_test(0.01)).unwrap();

        let report = pipeline.run(&y, &x).unwrap();

        assert!(report.stationarity.is_stationary());
        let z_ts: Vec<_> = report.zscores.timestamps().collect();
        let p_ts: Vec<_> = report.positions.timestamps().collect();
        assert_eq!(z_ts, p_ts);
        assert_eq!(report.backtest.returns.len(), report.positions.len() - 1);
        assert!(report
            .positions
            .values()
            .windows(2)
            .all(|w| (w[1].exposure() - w[0].exposure()).abs() <= 1));
        assert_eq!(report.positions.first().unwrap().value, {
            let z = report.zscores.first().unwrap().value;
            crate::strategy::signal::transition(SignalState::Flat, z, &SignalThresholds::default())
        });
    }
}
