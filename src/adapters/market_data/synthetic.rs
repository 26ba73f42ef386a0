//! Synthetic cointegrated pair
//!
//! X follows a Gaussian random walk. Y = alpha + beta * X + u, where u is a
//! stationary AR(1) disturbance. Same seed, same prices.

use chrono::{DateTime, Duration, TimeZone, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::domain::PriceSeries;
use crate::ports::market_data::{MarketDataError, PricePair, PriceSource};

/// Standard normal draw via Box-Muller
pub fn gaussian<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    // (0, 1] keeps ln() finite
    let u1: f64 = 1.0 - rng.gen::<f64>();
    let u2: f64 = rng.gen();
    (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()
}

/// Parameters of the synthetic pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SyntheticPairConfig {
    pub observations: usize,
    pub seed: u64,
    pub alpha: f64,
    pub beta: f64,
    /// Starting level of X
    pub x_start: f64,
    /// Standard deviation of X's daily step
    pub x_volatility: f64,
    /// AR(1) coefficient of the disturbance (|phi| < 1 keeps the pair cointegrated)
    pub spread_phi: f64,
    /// Standard deviation of the disturbance innovation
    pub spread_volatility: f64,
}

impl Default for SyntheticPairConfig {
    fn default() -> Self {
        Self {
            observations: 500,
            seed: 42,
            alpha: 10.0,
            beta: 1.5,
            x_start: 100.0,
            x_volatility: 1.0,
            spread_phi: 0.8,
            spread_volatility: 1.0,
        }
    }
}

/// Seeded generator of a cointegrated pair on daily timestamps
#[derive(Debug, Clone)]
pub struct SyntheticPairSource {
    config: SyntheticPairConfig,
    start: DateTime<Utc>,
}

impl SyntheticPairSource {
    pub fn new(config: SyntheticPairConfig) -> Self {
        Self {
            config,
            start: Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).single().unwrap_or_default(),
        }
    }

    pub fn with_start(mut self, start: DateTime<Utc>) -> Self {
        self.start = start;
        self
    }

    pub fn config(&self) -> &SyntheticPairConfig {
        &self.config
    }

    pub fn generate(&self) -> Result<PricePair, MarketDataError> {
        let c = &self.config;
        if c.observations == 0 {
            return Err(MarketDataError::Empty("synthetic pair with 0 observations".to_string()));
        }

        let mut rng = StdRng::seed_from_u64(c.seed);
        let mut x = c.x_start;
        let mut u = 0.0;
        let mut y_points = Vec::with_capacity(c.observations);
        let mut x_points = Vec::with_capacity(c.observations);

        for i in 0..c.observations {
            let ts = self.start + Duration::days(i as i64);
            if i > 0 {
                x += c.x_volatility * gaussian(&mut rng);
            }
            u = c.spread_phi * u + c.spread_volatility * gaussian(&mut rng);
            y_points.push((ts, c.alpha + c.beta * x + u));
            x_points.push((ts, x));
        }

        tracing::debug!(
            observations = c.observations,
            seed = c.seed,
            beta = c.beta,
            "synthetic pair generated"
        );

        Ok(PricePair {
            y_symbol: "SYN_Y".to_string(),
            x_symbol: "SYN_X".to_string(),
            y: PriceSeries::from_pairs(y_points)?,
            x: PriceSeries::from_pairs(x_points)?,
        })
    }
}

impl PriceSource for SyntheticPairSource {
    fn describe(&self) -> String {
        format!(
            "synthetic pair (n={}, seed={}, beta={})",
            self.config.observations, self.config.seed, self.config.beta
        )
    }

    fn load_pair(&self) -> Result<PricePair, MarketDataError> {
        self.generate()
    }
}
