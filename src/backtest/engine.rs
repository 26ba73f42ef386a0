//! Backtest Engine
//!
//! Marks positions against the spread with a one-bar lag:
//!
//!   return[t] = exposure(position[t-1]) * -(spread[t] - spread[t-1])
//!
//! The position decided from the z-score at `t` only earns the move over the
//! next interval. `spread[t-1]` is the previous point of the full spread, not
//! of the (shorter) position series, so the first position after the z-score
//! warm-up is marked against a real price move.
//!
//! Sign convention: a Long spread (entered on a low z-score) earns the
//! *negative* of the spread change, so it profits when the spread keeps
//! falling. That is opposite to the mean-reversion intent of the entry rule
//! and is reproduced as is; review it against the intended economics before
//! trusting the PnL.

use serde::Serialize;

use crate::backtest::metrics;
use crate::domain::{Observation, PairsError, PositionSeries, Spread, Stage, TimeSeries};

/// Default annualization for daily bars
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Output of one backtest run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BacktestResult {
    /// Per-period strategy returns, one per position after the first
    pub returns: TimeSeries<f64>,
    /// Running sum of `returns`
    pub cumulative_pnl: TimeSeries<f64>,
    /// Annualized Sharpe ratio; `None` when undefined
    pub sharpe: Option<f64>,
    /// Largest peak-to-trough fall of `cumulative_pnl` (<= 0)
    pub max_drawdown: f64,
    /// Entries plus exits
    pub trade_count: usize,
}

impl BacktestResult {
    /// Final cumulative PnL (0 with no returns)
    pub fn total_pnl(&self) -> f64 {
        self.cumulative_pnl.last().map_or(0.0, |p| p.value)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct BacktestEngine {
    periods_per_year: f64,
}

impl Default for BacktestEngine {
    fn default() -> Self {
        Self::new(TRADING_DAYS_PER_YEAR)
    }
}

impl BacktestEngine {
    pub fn new(periods_per_year: f64) -> Self {
        Self { periods_per_year }
    }

    pub fn periods_per_year(&self) -> f64 {
        self.periods_per_year
    }

    /// Run the backtest
    ///
    /// Every position timestamp must exist in the spread.
    pub fn run(&self, positions: &PositionSeries, spread: &Spread) -> Result<BacktestResult, PairsError> {
        let changes = spread_changes(positions, spread)?;

        let mut returns = Vec::with_capacity(positions.len().saturating_sub(1));
        let mut cumulative = Vec::with_capacity(returns.capacity());
        let mut running = 0.0;

        for (i, (prev, curr)) in positions.points().iter().zip(positions.points().iter().skip(1)).enumerate() {
            let ret = f64::from(prev.value.exposure()) * -changes[i + 1];
            running += ret;
            returns.push(Observation::new(curr.timestamp, ret));
            cumulative.push(Observation::new(curr.timestamp, running));
        }

        let return_values: Vec<f64> = returns.iter().map(|o| o.value).collect();
        let pnl_values: Vec<f64> = cumulative.iter().map(|o| o.value).collect();

        let sharpe = metrics::sharpe_ratio(&return_values, self.periods_per_year);
        let max_drawdown = metrics::max_drawdown(&pnl_values);
        let trade_count = metrics::trade_count(&positions.values());

        if sharpe.is_none() && !return_values.is_empty() {
            tracing::warn!("Sharpe ratio undefined: strategy returns have zero variance");
        }
        tracing::debug!(
            periods = return_values.len(),
            trade_count,
            max_drawdown,
            "backtest complete"
        );

        Ok(BacktestResult {
            returns: TimeSeries::from_ordered(returns),
            cumulative_pnl: TimeSeries::from_ordered(cumulative),
            sharpe,
            max_drawdown,
            trade_count,
        })
    }
}

/// Spread change at each position timestamp (0 at the first spread point)
fn spread_changes(positions: &PositionSeries, spread: &Spread) -> Result<Vec<f64>, PairsError> {
    let mut changes = Vec::with_capacity(positions.len());
    for (i, obs) in positions.iter().enumerate() {
        let k = spread.position_of(obs.timestamp).ok_or_else(|| PairsError::MisalignedSeries {
            stage: Stage::Backtest,
            index: i,
            detail: format!("position timestamp {} not in spread", obs.timestamp),
        })?;

        let change = match k.checked_sub(1).and_then(|j| spread.get(j)) {
            Some(prev) => spread.points()[k].value - prev.value,
            None => 0.0,
        };
        changes.push(change);
    }
    Ok(changes)
}
