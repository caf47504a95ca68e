//! Extended active-vs-passive analysis.
//!
//! Compares the two NAV trajectories day by day: annualized excess return
//! and volatility, information ratio, excess-drawdown, distribution shape of
//! the excess returns, and (when the active trajectory carries weights) the
//! weighting behavior itself.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::NavTrajectory;
use crate::metrics::{max_drawdown, mean_f64, std_dev, TRADING_DAYS_PER_YEAR};

/// Contract violations at the analysis entry point.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("need at least two NAV observations per trajectory, got {active} active / {passive} passive")]
    TooFewObservations { active: usize, passive: usize },
}

/// Weighting-behavior diagnostics for the active strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightDiagnostics {
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub max: f64,
    /// Fraction of days with weight outside [0.8, 1.2].
    pub extreme_frequency: f64,
    /// Mean absolute day-over-day weight change.
    pub turnover: f64,
}

/// Excess-return statistics of the active strategy over the passive one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtendedAnalysis {
    /// Mean daily excess return × 252.
    pub active_contribution: f64,
    /// Stdev of daily excess returns × √252.
    pub active_volatility: f64,
    /// Daily mean / daily stdev of excess returns; 0 if stdev is 0.
    pub information_ratio: f64,
    /// Fraction of days with positive excess return.
    pub positive_periods_ratio: f64,
    /// Max drawdown of the cumulative `(1 + excess)` index.
    pub max_active_drawdown: f64,
    /// Third standardized moment of the excess distribution.
    pub excess_skewness: f64,
    /// Excess kurtosis (fourth standardized moment − 3).
    pub excess_kurtosis: f64,
    /// Number of aligned excess-return observations.
    pub sample_size: usize,
    /// Present when the active trajectory carries a weight series.
    pub weights: Option<WeightDiagnostics>,
}

/// Compare the active strategy's NAV against the passive benchmark's.
///
/// Day-over-day NAV returns are computed per trajectory (length n−1, no
/// leading zero) and trailing-aligned to the shorter side: when lengths
/// differ, the longer series' earliest observations are discarded.
pub fn analyze_excess(
    active: &NavTrajectory,
    passive: &NavTrajectory,
) -> Result<ExtendedAnalysis, AnalysisError> {
    let active_returns = pct_changes(&active.navs());
    let passive_returns = pct_changes(&passive.navs());
    if active_returns.is_empty() || passive_returns.is_empty() {
        return Err(AnalysisError::TooFewObservations {
            active: active.len(),
            passive: passive.len(),
        });
    }

    let n = active_returns.len().min(passive_returns.len());
    let active_tail = &active_returns[active_returns.len() - n..];
    let passive_tail = &passive_returns[passive_returns.len() - n..];

    let excess: Vec<f64> = active_tail
        .iter()
        .zip(passive_tail.iter())
        .map(|(a, p)| a - p)
        .collect();

    let mean = mean_f64(&excess);
    let std = std_dev(&excess);
    let information_ratio = if std > 1e-15 { mean / std } else { 0.0 };
    let positive = excess.iter().filter(|&&e| e > 0.0).count();

    Ok(ExtendedAnalysis {
        active_contribution: mean * TRADING_DAYS_PER_YEAR,
        active_volatility: std * TRADING_DAYS_PER_YEAR.sqrt(),
        information_ratio,
        positive_periods_ratio: positive as f64 / n as f64,
        max_active_drawdown: max_drawdown(&excess),
        excess_skewness: skewness(&excess),
        excess_kurtosis: excess_kurtosis(&excess),
        sample_size: n,
        weights: active.weights().map(|w| weight_diagnostics(&w)),
    })
}

fn weight_diagnostics(weights: &[f64]) -> WeightDiagnostics {
    let min = weights.iter().copied().fold(f64::INFINITY, f64::min);
    let max = weights.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let extreme = weights.iter().filter(|&&w| !(0.8..=1.2).contains(&w)).count();
    let turnover = if weights.len() > 1 {
        let total: f64 = weights.windows(2).map(|p| (p[1] - p[0]).abs()).sum();
        total / (weights.len() - 1) as f64
    } else {
        0.0
    };
    WeightDiagnostics {
        mean: mean_f64(weights),
        std: std_dev(weights),
        min,
        max,
        extreme_frequency: extreme as f64 / weights.len() as f64,
        turnover,
    }
}

/// Day-over-day pct changes without a leading zero (length n−1).
fn pct_changes(navs: &[f64]) -> Vec<f64> {
    navs.windows(2)
        .map(|pair| {
            if pair[0] > 0.0 {
                pair[1] / pair[0] - 1.0
            } else {
                0.0
            }
        })
        .collect()
}

/// Skewness (third standardized moment, population formula).
fn skewness(values: &[f64]) -> f64 {
    let n = values.len() as f64;
    let mean = mean_f64(values);
    let std = std_dev(values);
    if std < 1e-15 {
        return 0.0;
    }
    values.iter().map(|v| ((v - mean) / std).powi(3)).sum::<f64>() / n
}

/// Excess kurtosis (fourth standardized moment − 3, population formula).
fn excess_kurtosis(values: &[f64]) -> f64 {
    let n = values.len() as f64;
    let mean = mean_f64(values);
    let std = std_dev(values);
    if std < 1e-15 {
        return 0.0;
    }
    values.iter().map(|v| ((v - mean) / std).powi(4)).sum::<f64>() / n - 3.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::NavPoint;
    use chrono::NaiveDate;

    fn trajectory(navs: &[f64], weights: Option<&[f64]>) -> NavTrajectory {
        let start = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let points = navs
            .iter()
            .enumerate()
            .map(|(i, &nav)| NavPoint {
                date: start + chrono::Duration::days(i as i64),
                nav,
                contribution: 0.0,
                cumulative_capital: 1.0,
                daily_return: 0.0,
                weight: weights.map(|w| w[i]),
            })
            .collect();
        NavTrajectory::new(points)
    }

    #[test]
    fn identical_trajectories_have_zero_excess() {
        let navs: Vec<f64> = (0..30).map(|i| 100.0 + i as f64).collect();
        let a = trajectory(&navs, None);
        let p = trajectory(&navs, None);
        let result = analyze_excess(&a, &p).unwrap();
        assert_eq!(result.active_contribution, 0.0);
        assert_eq!(result.information_ratio, 0.0);
        assert_eq!(result.max_active_drawdown, 0.0);
        assert_eq!(result.sample_size, 29);
        assert!(result.weights.is_none());
    }

    #[test]
    fn length_mismatch_discards_the_earliest_excess() {
        // Active has 5 extra leading days; only the common tail counts.
        let active_navs: Vec<f64> = (0..25).map(|i| 100.0 * 1.01_f64.powi(i)).collect();
        let passive_navs: Vec<f64> = (0..20).map(|i| 100.0 * 1.005_f64.powi(i)).collect();
        let result =
            analyze_excess(&trajectory(&active_navs, None), &trajectory(&passive_navs, None))
                .unwrap();
        assert_eq!(result.sample_size, 19);
        // Constant positive spread: every period is positive excess.
        assert!((result.positive_periods_ratio - 1.0).abs() < 1e-12);
        assert!(result.active_contribution > 0.0);
    }

    #[test]
    fn single_point_trajectory_is_an_error() {
        let a = trajectory(&[100.0], None);
        let p = trajectory(&[100.0, 101.0], None);
        assert!(matches!(
            analyze_excess(&a, &p),
            Err(AnalysisError::TooFewObservations { .. })
        ));
    }

    #[test]
    fn weight_diagnostics_report_extremes_and_turnover() {
        let navs: Vec<f64> = (0..4).map(|i| 100.0 + i as f64).collect();
        let weights = [1.3, 0.9, 0.7, 1.1];
        let a = trajectory(&navs, Some(&weights));
        let p = trajectory(&navs, None);
        let d = analyze_excess(&a, &p).unwrap().weights.unwrap();
        assert!((d.mean - 1.0).abs() < 1e-12);
        assert_eq!(d.min, 0.7);
        assert_eq!(d.max, 1.3);
        // 1.3 and 0.7 are outside [0.8, 1.2].
        assert!((d.extreme_frequency - 0.5).abs() < 1e-12);
        // |0.9-1.3| + |0.7-0.9| + |1.1-0.7| = 1.0 over 3 steps.
        assert!((d.turnover - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn one_crash_day_skews_left_and_fattens_tails() {
        // Active tracks passive except for a single -5% day: the excess
        // distribution is a spike of zeros with one far-left outlier.
        let mut active_navs = vec![100.0; 41];
        for nav in active_navs.iter_mut().skip(20) {
            *nav *= 0.95;
        }
        let passive_navs = vec![100.0; 41];
        let result =
            analyze_excess(&trajectory(&active_navs, None), &trajectory(&passive_navs, None))
                .unwrap();
        assert!(result.excess_skewness < 0.0);
        assert!(result.excess_kurtosis > 0.0);
    }
}
