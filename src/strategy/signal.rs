//! Signal State Machine
//!
//! Three states (Flat, Long, Short) driven by the spread z-score:
//!
//! | State         | Condition      | Next      |
//! |---------------|----------------|-----------|
//! | Flat          | z > entry_hi   | Short     |
//! | Flat          | z < entry_lo   | Long      |
//! | Long or Short | \|z\| < exit_th | Flat      |
//! | anything else |                | unchanged |
//!
//! An open position only ever evaluates the exit condition, so Long and
//! Short are never adjacent in the output.

use crate::domain::{Observation, PositionSeries, SignalState, ZScoreSeries};
use crate::strategy::params::{ConfigError, SignalThresholds};

/// Pure transition function of the state machine
pub fn transition(state: SignalState, z: f64, thresholds: &SignalThresholds) -> SignalState {
    match state {
        SignalState::Flat if z > thresholds.entry_hi => SignalState::Short,
        SignalState::Flat if z < thresholds.entry_lo => SignalState::Long,
        SignalState::Flat => SignalState::Flat,
        SignalState::Long | SignalState::Short if z.abs() < thresholds.exit_th => SignalState::Flat,
        open => open,
    }
}

/// Folds a z-score series into a position series
#[derive(Debug, Clone, Copy)]
pub struct SignalStateMachine {
    thresholds: SignalThresholds,
}

impl Default for SignalStateMachine {
    fn default() -> Self {
        Self {
            thresholds: SignalThresholds::default(),
        }
    }
}

impl SignalStateMachine {
    pub fn new(thresholds: SignalThresholds) -> Result<Self, ConfigError> {
        thresholds.validate()?;
        Ok(Self { thresholds })
    }

    pub fn thresholds(&self) -> &SignalThresholds {
        &self.thresholds
    }

    pub fn transition(&self, state: SignalState, z: f64) -> SignalState {
        transition(state, z, &self.thresholds)
    }

    /// One position per z-score, starting from Flat
    pub fn run(&self, zscores: &ZScoreSeries) -> PositionSeries {
        let points: Vec<Observation<SignalState>> = zscores
            .iter()
            .scan(SignalState::Flat, |state, obs| {
                *state = self.transition(*state, obs.value);
                Some(Observation::new(obs.timestamp, *state))
            })
            .collect();

        let active = points.iter().filter(|p| p.value.is_active()).count();
        tracing::debug!(positions = points.len(), active, "signals generated");

        PositionSeries::from_ordered(points)
    }
}
