//! Performance metrics over a per-period return stream

use crate::domain::SignalState;
use crate::strategy::stats;

/// Annualized Sharpe ratio with zero risk-free rate
///
/// `sqrt(periods_per_year) * mean / std` with the sample std. Returns `None`
/// when fewer than two returns exist or their standard deviation is zero;
/// an undefined ratio is never coerced to 0 or infinity.
pub fn sharpe_ratio(returns: &[f64], periods_per_year: f64) -> Option<f64> {
    if returns.len() < 2 {
        return None;
    }

    let mean = stats::mean(returns);
    let std_dev = stats::sample_std(returns, mean);
    if stats::is_zero_std(std_dev, mean) {
        return None;
    }

    Some(periods_per_year.sqrt() * mean / std_dev)
}

/// Largest peak-to-trough fall of a cumulative PnL curve, as a value <= 0
///
/// The running peak starts at the first point of the curve. An empty curve
/// has no drawdown.
pub fn max_drawdown(cumulative_pnl: &[f64]) -> f64 {
    let Some(&first) = cumulative_pnl.first() else {
        return 0.0;
    };

    let mut peak = first;
    let mut max_dd = 0.0_f64;
    for &value in cumulative_pnl {
        if value > peak {
            peak = value;
        }
        max_dd = max_dd.min(value - peak);
    }
    max_dd
}

/// Number of consecutive position pairs that differ (entries plus exits)
pub fn trade_count(positions: &[SignalState]) -> usize {
    positions.windows(2).filter(|w| w[0] != w[1]).count()
}
