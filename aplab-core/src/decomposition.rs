//! Lo (2007) Active-Passive decomposition.
//!
//! Expected strategy return decomposes into two orthogonal terms:
//!
//! ```text
//! E[w_t * r_t] = Cov(w_t, r_t) + E[w_t] * E[r_t]
//!                \____________/  \_____________/
//!                 active (δp)      passive (νp)
//! ```
//!
//! The covariance term measures market-timing value; the mean-product term
//! measures plain market exposure. The active ratio θp = δp / (δp + νp) is
//! the share of total decomposed return attributable to timing.
//!
//! Degenerate inputs soft-fail: the result is a discriminated
//! [`ApDecomposition`] so downstream code can tell "not enough data" and
//! "computation blew up" apart from a genuinely neutral strategy.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::NavTrajectory;
use crate::metrics::{mean_f64, std_dev};

/// Minimum paired (weight, return) observations for a reliable decomposition.
pub const MIN_PAIRED_OBSERVATIONS: usize = 10;

/// Near-zero guard for the active-ratio denominator.
const TOTAL_EPSILON: f64 = 1e-10;

/// Contract violations at the decomposition entry point.
#[derive(Debug, Error)]
pub enum DecompositionError {
    #[error("trajectory carries no weight series; decomposition needs paired (weight, return) data")]
    MissingWeightSeries,

    #[error("rolling window must be at least {MIN_PAIRED_OBSERVATIONS} observations, got {0}")]
    WindowTooSmall(usize),
}

/// Coarse reliability tier based on sample size alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Significance {
    /// More than 100 paired observations.
    High,
    /// More than 50 paired observations.
    Moderate,
    Low,
}

impl Significance {
    pub fn from_sample_size(n: usize) -> Self {
        if n > 100 {
            Self::High
        } else if n > 50 {
            Self::Moderate
        } else {
            Self::Low
        }
    }
}

/// A valid decomposition with its diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApRecord {
    /// δp = Cov(w, r), sample covariance (n−1).
    pub active: f64,
    /// νp = E[w] × E[r].
    pub passive: f64,
    /// θp = δp / (δp + νp); 0.0 when |δp + νp| ≤ 1e-10.
    pub active_ratio: f64,
    /// Pearson correlation of weight and return (0.0 for a constant series).
    pub correlation: f64,
    pub sample_size: usize,
    pub significance: Significance,
    pub weight_mean: f64,
    pub weight_std: f64,
    pub return_mean: f64,
    pub return_std: f64,
}

/// Outcome of a decomposition: valid, too thin, or arithmetically broken.
///
/// The two failure variants are soft: batch pipelines sliding many windows
/// must not abort on one bad slice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ApDecomposition {
    Valid(ApRecord),
    /// Fewer than [`MIN_PAIRED_OBSERVATIONS`] finite pairs.
    Insufficient { sample_size: usize },
    /// A statistic came out non-finite; message describes which.
    Failed { message: String },
}

impl ApDecomposition {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid(_))
    }

    pub fn record(&self) -> Option<&ApRecord> {
        match self {
            Self::Valid(record) => Some(record),
            _ => None,
        }
    }

    /// δp, or 0.0 for a degenerate result.
    pub fn active(&self) -> f64 {
        self.record().map_or(0.0, |r| r.active)
    }

    /// νp, or 0.0 for a degenerate result.
    pub fn passive(&self) -> f64 {
        self.record().map_or(0.0, |r| r.passive)
    }

    /// θp, or 0.0 for a degenerate result.
    pub fn active_ratio(&self) -> f64 {
        self.record().map_or(0.0, |r| r.active_ratio)
    }

    pub fn correlation(&self) -> f64 {
        self.record().map_or(0.0, |r| r.correlation)
    }
}

/// Decompose a weighted trajectory's return.
///
/// A trajectory without a weight series is a caller contract violation (the
/// passive benchmark has nothing to decompose); everything downstream of
/// that soft-fails via the [`ApDecomposition`] variants.
pub fn decompose(trajectory: &NavTrajectory) -> Result<ApDecomposition, DecompositionError> {
    let weights = trajectory
        .weights()
        .ok_or(DecompositionError::MissingWeightSeries)?;
    Ok(decompose_pairs(&weights, &trajectory.daily_returns()))
}

/// Decompose raw paired (weight, return) observations.
///
/// Pairs where either side is non-finite are dropped, mirroring row-wise
/// NaN handling in the usual dataframe workflow. Length mismatch truncates
/// to the shorter side.
pub fn decompose_pairs(weights: &[f64], returns: &[f64]) -> ApDecomposition {
    let (w, r): (Vec<f64>, Vec<f64>) = weights
        .iter()
        .zip(returns.iter())
        .filter(|(w, r)| w.is_finite() && r.is_finite())
        .map(|(&w, &r)| (w, r))
        .unzip();

    let n = w.len();
    if n < MIN_PAIRED_OBSERVATIONS {
        return ApDecomposition::Insufficient { sample_size: n };
    }

    let weight_mean = mean_f64(&w);
    let return_mean = mean_f64(&r);
    let weight_std = std_dev(&w);
    let return_std = std_dev(&r);

    let active = sample_covariance(&w, &r, weight_mean, return_mean);
    let passive = weight_mean * return_mean;

    let total = active + passive;
    let active_ratio = if total.abs() > TOTAL_EPSILON {
        active / total
    } else {
        0.0
    };

    let correlation = if weight_std > 1e-12 && return_std > 1e-12 {
        active / (weight_std * return_std)
    } else {
        0.0
    };

    for (name, value) in [
        ("active", active),
        ("passive", passive),
        ("active_ratio", active_ratio),
        ("correlation", correlation),
    ] {
        if !value.is_finite() {
            return ApDecomposition::Failed {
                message: format!("{name} is non-finite ({value})"),
            };
        }
    }

    ApDecomposition::Valid(ApRecord {
        active,
        passive,
        active_ratio,
        correlation,
        sample_size: n,
        significance: Significance::from_sample_size(n),
        weight_mean,
        weight_std,
        return_mean,
        return_std,
    })
}

/// One step of the rolling decomposition, dated at the day *after* its
/// trailing window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RollingApPoint {
    pub date: NaiveDate,
    pub active: f64,
    pub passive: f64,
    pub active_ratio: f64,
    pub correlation: f64,
}

/// Re-apply the decomposition to every trailing `window` slice, sliding one
/// day at a time.
///
/// Emits one point per day `i` in `[window, n)`, computed over rows
/// `[i - window, i)`. Degenerate windows emit zeros so the output stays
/// index-aligned with the input. O(window × n); fine for daily data.
pub fn rolling_decomposition(
    trajectory: &NavTrajectory,
    window: usize,
) -> Result<Vec<RollingApPoint>, DecompositionError> {
    if window < MIN_PAIRED_OBSERVATIONS {
        return Err(DecompositionError::WindowTooSmall(window));
    }
    let weights = trajectory
        .weights()
        .ok_or(DecompositionError::MissingWeightSeries)?;
    let returns = trajectory.daily_returns();
    let dates = trajectory.dates();

    let n = trajectory.len();
    let mut points = Vec::new();
    for i in window..n {
        let slice = (i - window)..i;
        let result = decompose_pairs(&weights[slice.clone()], &returns[slice]);
        points.push(RollingApPoint {
            date: dates[i],
            active: result.active(),
            passive: result.passive(),
            active_ratio: result.active_ratio(),
            correlation: result.correlation(),
        });
    }
    Ok(points)
}

fn sample_covariance(w: &[f64], r: &[f64], w_mean: f64, r_mean: f64) -> f64 {
    let n = w.len();
    debug_assert!(n >= 2);
    w.iter()
        .zip(r.iter())
        .map(|(w, r)| (w - w_mean) * (r - r_mean))
        .sum::<f64>()
        / (n - 1) as f64
}
