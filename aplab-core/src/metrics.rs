//! Performance metrics — pure functions that compute strategy statistics.
//!
//! Every metric is a pure function: NAV trajectory in, scalar out. The only
//! entry-point errors are caller contract violations (empty trajectory, zero
//! final capital); thin or degenerate data produces zeros, not errors.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::NavTrajectory;

/// Trading days per year used for all annualization.
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Contract violations at the metrics entry point.
#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("cannot compute metrics for an empty trajectory")]
    EmptyTrajectory,

    #[error("final cumulative capital is zero; total return is undefined")]
    ZeroFinalCapital,
}

/// Aggregate risk/return statistics for a single NAV trajectory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceMetrics {
    /// `NAV_last / capital_last - 1` — return on capital actually invested.
    pub total_return: f64,
    /// `(1 + total_return)^(252/n) - 1`.
    pub annualized_return: f64,
    /// Sample stdev of daily NAV returns × √252.
    pub annualized_volatility: f64,
    pub sharpe_ratio: f64,
    /// Most negative peak-to-trough decline of the cumulative-return index.
    pub max_drawdown: f64,
    /// Fraction of days with a positive daily NAV return.
    pub win_rate: f64,
    pub calmar_ratio: f64,
    pub sortino_ratio: f64,
    /// 5th percentile of the daily NAV return distribution.
    pub var_95: f64,
    /// Longest run of consecutive strictly-negative daily returns.
    pub max_consecutive_losses: usize,
}

impl PerformanceMetrics {
    /// Compute all metrics from a trajectory's NAV and cumulative capital.
    pub fn compute(
        trajectory: &NavTrajectory,
        risk_free_rate: f64,
    ) -> Result<Self, MetricsError> {
        if trajectory.is_empty() {
            return Err(MetricsError::EmptyTrajectory);
        }
        let final_nav = trajectory.last_nav().unwrap_or(0.0);
        let final_capital = trajectory.last_capital().unwrap_or(0.0);
        if final_capital == 0.0 {
            return Err(MetricsError::ZeroFinalCapital);
        }

        let returns = nav_returns(&trajectory.navs());
        let n = returns.len();

        let total_return = final_nav / final_capital - 1.0;
        let annualized_return = annualize_return(total_return, n);
        let annualized_volatility = std_dev(&returns) * TRADING_DAYS_PER_YEAR.sqrt();

        let sharpe_ratio = if annualized_volatility > 1e-15 {
            (annualized_return - risk_free_rate) / annualized_volatility
        } else {
            0.0
        };

        let max_drawdown = max_drawdown(&returns);
        let win_rate = returns.iter().filter(|&&r| r > 0.0).count() as f64 / n as f64;
        let calmar_ratio = if max_drawdown.abs() > 1e-15 {
            annualized_return / max_drawdown.abs()
        } else {
            0.0
        };

        let downside = downside_deviation(&returns);
        let sortino_ratio = if downside > 1e-15 {
            (annualized_return - risk_free_rate) / downside
        } else {
            0.0
        };

        Ok(Self {
            total_return,
            annualized_return,
            annualized_volatility,
            sharpe_ratio,
            max_drawdown,
            win_rate,
            calmar_ratio,
            sortino_ratio,
            var_95: percentile(&returns, 0.05),
            max_consecutive_losses: max_consecutive_losses(&returns),
        })
    }
}

// ─── Individual metric functions ────────────────────────────────────

/// Annualize a total return over `n` trading days at 252 days/year.
///
/// A total loss (base ≤ 0) annualizes to -1.0 rather than NaN.
pub fn annualize_return(total_return: f64, n: usize) -> f64 {
    if n == 0 {
        return 0.0;
    }
    let base = 1.0 + total_return;
    if base <= 0.0 {
        return -1.0;
    }
    base.powf(TRADING_DAYS_PER_YEAR / n as f64) - 1.0
}

/// Daily NAV returns aligned with the trajectory: first value 0, then
/// pct-change. A non-positive prior NAV yields 0 for that step.
pub fn nav_returns(navs: &[f64]) -> Vec<f64> {
    if navs.is_empty() {
        return Vec::new();
    }
    let mut returns = Vec::with_capacity(navs.len());
    returns.push(0.0);
    for pair in navs.windows(2) {
        if pair[0] > 0.0 {
            returns.push(pair[1] / pair[0] - 1.0);
        } else {
            returns.push(0.0);
        }
    }
    returns
}

/// Maximum drawdown of the cumulative-return index built from daily returns.
///
/// `cum_t = prod(1 + r)`, `dd_t = (cum_t - running_max_t) / running_max_t`;
/// reports the minimum (most negative) value. 0.0 for a non-losing series.
pub fn max_drawdown(returns: &[f64]) -> f64 {
    let mut cum = 1.0_f64;
    let mut peak = f64::MIN;
    let mut max_dd = 0.0_f64;
    for &r in returns {
        cum *= 1.0 + r;
        if cum > peak {
            peak = cum;
        }
        if peak > 0.0 {
            let dd = (cum - peak) / peak;
            if dd < max_dd {
                max_dd = dd;
            }
        }
    }
    max_dd
}

/// Annualized downside deviation: sample stdev of strictly negative daily
/// returns × √252. 0.0 with fewer than two losing days.
pub fn downside_deviation(returns: &[f64]) -> f64 {
    let negative: Vec<f64> = returns.iter().copied().filter(|&r| r < 0.0).collect();
    std_dev(&negative) * TRADING_DAYS_PER_YEAR.sqrt()
}

/// Longest run of consecutive strictly-negative daily returns.
pub fn max_consecutive_losses(returns: &[f64]) -> usize {
    let mut max_streak = 0;
    let mut current = 0;
    for &r in returns {
        if r < 0.0 {
            current += 1;
            if current > max_streak {
                max_streak = current;
            }
        } else {
            current = 0;
        }
    }
    max_streak
}

/// Linearly interpolated quantile, `q` in [0, 1].
///
/// Matches the usual statistics-package convention: position `q * (n - 1)`
/// in the sorted sample, interpolating between neighbors.
pub fn percentile(values: &[f64], q: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let frac = pos - lower as f64;
    if lower + 1 < sorted.len() {
        sorted[lower] + frac * (sorted[lower + 1] - sorted[lower])
    } else {
        sorted[lower]
    }
}

// ─── Helpers ────────────────────────────────────────────────────────

pub(crate) fn mean_f64(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation (n−1). 0.0 with fewer than two observations.
pub(crate) fn std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let mean = mean_f64(values);
    let variance =
        values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    variance.sqrt()
}
