//! Multi-strategy AP comparison.
//!
//! Decomposes a set of named weighted trajectories in parallel (each
//! decomposition is independent) and ranks them by active component and
//! active ratio. Strategies whose trajectory carries no weight series are
//! skipped rather than aborting the batch.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use aplab_core::{decompose, ApDecomposition, NavTrajectory};

/// One strategy's decomposition summary within a comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyApSummary {
    pub name: String,
    pub active: f64,
    pub passive: f64,
    pub active_ratio: f64,
    pub correlation: f64,
    pub sample_size: usize,
    /// 1 = largest active component.
    pub active_rank: usize,
    /// 1 = largest active ratio.
    pub active_ratio_rank: usize,
}

/// Decompose every named trajectory and rank the results.
///
/// Degenerate decompositions (insufficient data, failed arithmetic) stay in
/// the table with zeroed statistics so the caller can see *that* a strategy
/// was thin, not just that it is missing.
pub fn compare_strategies(strategies: &[(String, NavTrajectory)]) -> Vec<StrategyApSummary> {
    let mut summaries: Vec<StrategyApSummary> = strategies
        .par_iter()
        .filter_map(|(name, trajectory)| {
            let result = decompose(trajectory).ok()?;
            let sample_size = match &result {
                ApDecomposition::Valid(record) => record.sample_size,
                ApDecomposition::Insufficient { sample_size } => *sample_size,
                ApDecomposition::Failed { .. } => 0,
            };
            Some(StrategyApSummary {
                name: name.clone(),
                active: result.active(),
                passive: result.passive(),
                active_ratio: result.active_ratio(),
                correlation: result.correlation(),
                sample_size,
                active_rank: 0,
                active_ratio_rank: 0,
            })
        })
        .collect();

    // par_iter preserves input order; ranks are assigned serially.
    assign_ranks(&mut summaries, |s| s.active, |s, rank| s.active_rank = rank);
    assign_ranks(
        &mut summaries,
        |s| s.active_ratio,
        |s, rank| s.active_ratio_rank = rank,
    );
    summaries
}

fn assign_ranks(
    summaries: &mut [StrategyApSummary],
    key: impl Fn(&StrategyApSummary) -> f64,
    set: impl Fn(&mut StrategyApSummary, usize),
) {
    let mut order: Vec<usize> = (0..summaries.len()).collect();
    order.sort_by(|&a, &b| {
        key(&summaries[b])
            .partial_cmp(&key(&summaries[a]))
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    for (rank, &index) in order.iter().enumerate() {
        set(&mut summaries[index], rank + 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aplab_core::{simulate_momentum_dca, simulate_passive_dca, MomentumParams, WeightScheme};

    use crate::data::synthetic_prices;

    #[test]
    fn ranks_strategies_by_active_component() {
        let prices = synthetic_prices("SYN", 400, 3);
        let aggressive = MomentumParams {
            weights: WeightScheme {
                strong_up: 1.6,
                mild_up: 1.2,
                mild_down: 0.8,
                strong_down: 0.4,
                threshold: 0.05,
            },
            ..MomentumParams::default()
        };
        let neutral = MomentumParams {
            weights: WeightScheme {
                strong_up: 1.0,
                mild_up: 1.0,
                mild_down: 1.0,
                strong_down: 1.0,
                threshold: 0.05,
            },
            ..MomentumParams::default()
        };

        let strategies = vec![
            (
                "aggressive".to_string(),
                simulate_momentum_dca(&prices, &aggressive),
            ),
            (
                "default".to_string(),
                simulate_momentum_dca(&prices, &MomentumParams::default()),
            ),
            (
                "neutral".to_string(),
                simulate_momentum_dca(&prices, &neutral),
            ),
        ];

        let summaries = compare_strategies(&strategies);
        assert_eq!(summaries.len(), 3);
        // Input order preserved.
        assert_eq!(summaries[0].name, "aggressive");

        // Constant weights: active is exactly zero, so neutral cannot
        // outrank a strategy with any nonzero covariance of matching sign.
        let neutral_summary = summaries.iter().find(|s| s.name == "neutral").unwrap();
        assert_eq!(neutral_summary.active, 0.0);

        // Every rank in 1..=3, no duplicates.
        let mut ranks: Vec<usize> = summaries.iter().map(|s| s.active_rank).collect();
        ranks.sort_unstable();
        assert_eq!(ranks, vec![1, 2, 3]);
    }

    #[test]
    fn unweighted_trajectories_are_skipped() {
        let prices = synthetic_prices("SYN", 200, 5);
        let strategies = vec![
            (
                "passive".to_string(),
                simulate_passive_dca(&prices, 1.0),
            ),
            (
                "momentum".to_string(),
                simulate_momentum_dca(&prices, &MomentumParams::default()),
            ),
        ];
        let summaries = compare_strategies(&strategies);
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].name, "momentum");
        assert_eq!(summaries[0].active_rank, 1);
    }
}
