//! Report rendering
//!
//! Turns a `PairAnalysis` into the text summary printed by the CLI or a JSON
//! document. The summary carries the headline numbers only; the full export
//! adds every series (spread, z-scores, positions, returns, cumulative PnL).

use serde::Serialize;

use crate::application::{PairAnalysis, StationarityOutcome};

/// Headline numbers of one run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportSummary {
    pub y_symbol: String,
    pub x_symbol: String,
    pub observations: usize,
    pub beta: f64,
    pub alpha: f64,
    pub adf_statistic: Option<f64>,
    pub p_value: Option<f64>,
    pub is_stationary: bool,
    pub half_life: Option<f64>,
    pub zscore_points: usize,
    pub undefined_zscores: usize,
    pub trade_count: usize,
    /// `None` is reported as undefined, never as 0
    pub sharpe: Option<f64>,
    pub max_drawdown: f64,
    pub total_pnl: f64,
}

impl From<&PairAnalysis> for ReportSummary {
    fn from(analysis: &PairAnalysis) -> Self {
        let report = &analysis.report;
        let test = report.stationarity.result();
        Self {
            y_symbol: analysis.y_symbol.clone(),
            x_symbol: analysis.x_symbol.clone(),
            observations: report.spread.len(),
            beta: report.hedge.beta,
            alpha: report.hedge.alpha,
            adf_statistic: test.map(|t| t.statistic),
            p_value: test.map(|t| t.p_value),
            is_stationary: report.stationarity.is_stationary(),
            half_life: report.diagnostics.half_life,
            zscore_points: report.zscores.len(),
            undefined_zscores: report.undefined_zscores.len(),
            trade_count: report.backtest.trade_count,
            sharpe: report.backtest.sharpe,
            max_drawdown: report.backtest.max_drawdown,
            total_pnl: report.backtest.total_pnl(),
        }
    }
}

/// Human-readable report
pub fn render_text(analysis: &PairAnalysis) -> String {
    let report = &analysis.report;
    let summary = ReportSummary::from(analysis);
    let mut out = String::new();

    out.push_str(&format!("Pair: {} ~ {}\n", summary.y_symbol, summary.x_symbol));
    out.push_str(&format!("Observations: {}\n\n", summary.observations));

    out.push_str("Hedge ratio\n");
    out.push_str(&format!("  Beta:  {:.4}\n", summary.beta));
    out.push_str(&format!("  Alpha: {:.4}\n", summary.alpha));
    out.push_str(&format!("  Residual std: {:.4}\n\n", report.hedge.residual_std));

    out.push_str("Stationarity\n");
    match &report.stationarity {
        StationarityOutcome::Tested(result) => {
            out.push_str(&format!("  {} statistic: {:.4}\n", result.test_name, result.statistic));
            out.push_str(&format!("  p-value: {:.4}\n", result.p_value));
            out.push_str(&format!("  Lags used: {} (nobs {})\n", result.used_lag, result.nobs));
            if let Some(cv) = result.critical_values {
                out.push_str(&format!(
                    "  Critical values: 1% {:.3}, 5% {:.3}, 10% {:.3}\n",
                    cv.one_pct, cv.five_pct, cv.ten_pct
                ));
            }
            let verdict = if result.is_stationary {
                "stationary"
            } else {
                "NOT stationary (unit root not rejected)"
            };
            out.push_str(&format!("  Verdict at {}: {}\n", result.significance, verdict));
        }
        StationarityOutcome::Untestable { reason } => {
            out.push_str(&format!("  Not testable: {}\n", reason));
        }
    }
    match summary.half_life {
        Some(hl) => out.push_str(&format!("  Half-life: {:.1} bars\n\n", hl)),
        None => out.push_str("  Half-life: n/a\n\n"),
    }

    out.push_str("Signals\n");
    out.push_str(&format!(
        "  Z-score points: {} (window {}, {} undefined)\n",
        summary.zscore_points, report.config.window, summary.undefined_zscores
    ));
    out.push_str(&format!(
        "  Thresholds: entry {:+.2} / {:+.2}, exit {:.2}\n\n",
        report.config.signal.entry_hi, report.config.signal.entry_lo, report.config.signal.exit_th
    ));

    out.push_str("Backtest\n");
    out.push_str(&format!("  Trades: {}\n", summary.trade_count));
    out.push_str(&format!("  Sharpe: {}\n", format_sharpe(summary.sharpe)));
    out.push_str(&format!("  Max drawdown: {:.4}\n", summary.max_drawdown));
    out.push_str(&format!("  Total PnL: {:.4}\n", summary.total_pnl));

    out
}

/// Headline numbers as pretty JSON
pub fn render_summary_json(analysis: &PairAnalysis) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&ReportSummary::from(analysis))
}

/// Full report including every series as pretty JSON
pub fn render_full_json(analysis: &PairAnalysis) -> serde_json::Result<String> {
    serde_json::to_string_pretty(analysis)
}

fn format_sharpe(sharpe: Option<f64>) -> String {
    sharpe.map_or_else(|| "undefined".to_string(), |s| format!("{:.3}", s))
}
