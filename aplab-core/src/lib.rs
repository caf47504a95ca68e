//! aplab-core — numeric engine for Active-Passive decomposition of
//! dollar-cost-averaging strategies.
//!
//! The crate turns a daily close-price series into:
//! - NAV trajectories for a passive (unit-accumulation) and a
//!   momentum-weighted (return-scaling) DCA strategy
//! - a standard risk/return metrics record per trajectory
//! - the Lo (2007) decomposition of the momentum strategy's return into an
//!   active (timing) and a passive (exposure) component, plus rolling-window
//!   and excess-return diagnostics
//!
//! Everything here is a pure function over immutable input series: no I/O,
//! no shared state, no logging. Orchestration, loading, and export live in
//! `aplab-runner`.

pub mod analysis;
pub mod decomposition;
pub mod domain;
pub mod metrics;
pub mod schedule;
pub mod strategy;
pub mod weight;

pub use analysis::{analyze_excess, AnalysisError, ExtendedAnalysis, WeightDiagnostics};
pub use decomposition::{
    decompose, decompose_pairs, rolling_decomposition, ApDecomposition, ApRecord,
    DecompositionError, RollingApPoint, Significance, MIN_PAIRED_OBSERVATIONS,
};
pub use domain::{NavPoint, NavTrajectory, PricePoint, PriceSeries, SeriesError};
pub use metrics::{MetricsError, PerformanceMetrics, TRADING_DAYS_PER_YEAR};
pub use strategy::{simulate_momentum_dca, simulate_passive_dca, MomentumParams};
pub use weight::{momentum_weight, WeightScheme};

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: all result records cross thread boundaries, so a
    /// caller may fan rolling windows or strategies out over a thread pool.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        require_send::<PriceSeries>();
        require_sync::<PriceSeries>();
        require_send::<NavTrajectory>();
        require_sync::<NavTrajectory>();
        require_send::<PerformanceMetrics>();
        require_sync::<PerformanceMetrics>();
        require_send::<ApDecomposition>();
        require_sync::<ApDecomposition>();
        require_send::<ExtendedAnalysis>();
        require_sync::<ExtendedAnalysis>();
    }
}
