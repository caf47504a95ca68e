//! Momentum weight function — maps a rolling-return signal to a discrete
//! exposure multiplier via a four-bucket threshold rule.

use serde::{Deserialize, Serialize};

/// Four-tier weight scheme for the momentum strategy.
///
/// All multipliers are positive; `threshold` separates "strong" from "mild"
/// momentum in both directions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightScheme {
    pub strong_up: f64,
    pub mild_up: f64,
    pub mild_down: f64,
    pub strong_down: f64,
    pub threshold: f64,
}

impl Default for WeightScheme {
    fn default() -> Self {
        Self {
            strong_up: 1.3,
            mild_up: 1.1,
            mild_down: 0.9,
            strong_down: 0.7,
            threshold: 0.05,
        }
    }
}

/// Map a rolling return to its weight multiplier.
///
/// Bucket boundaries (strict `>` on the upper side of each cut):
/// - undefined signal → 1.0 (neutral)
/// - `m > threshold` → strong_up
/// - `0 < m <= threshold` → mild_up
/// - `-threshold < m <= 0` → mild_down
/// - `m <= -threshold` → strong_down
///
/// Exactly `threshold` is mild_up, exactly `0` is mild_down, exactly
/// `-threshold` is strong_down.
pub fn momentum_weight(rolling_return: Option<f64>, scheme: &WeightScheme) -> f64 {
    let m = match rolling_return {
        Some(m) if m.is_finite() => m,
        _ => return 1.0,
    };
    if m > scheme.threshold {
        scheme.strong_up
    } else if m > 0.0 {
        scheme.mild_up
    } else if m > -scheme.threshold {
        scheme.mild_down
    } else {
        scheme.strong_down
    }
}
