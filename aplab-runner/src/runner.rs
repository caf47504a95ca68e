//! Single-run orchestration: simulate, measure, decompose, validate.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use aplab_core::{
    analyze_excess, decompose, rolling_decomposition, simulate_momentum_dca,
    simulate_passive_dca, AnalysisError, ApDecomposition, DecompositionError, ExtendedAnalysis,
    MetricsError, MomentumParams, NavTrajectory, PerformanceMetrics, PriceSeries,
    RollingApPoint,
};

use crate::config::{RunConfig, RunId};
use crate::data::{survey, DataQuality, DataSource};
use crate::report::{validate_theory, TheoryValidation};

/// Version stamp written into every exported report. Bump on breaking
/// changes to the report layout.
pub const SCHEMA_VERSION: u32 = 1;

/// Errors from assembling an analysis report.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("metrics failed for the {strategy} strategy: {source}")]
    Metrics {
        strategy: &'static str,
        #[source]
        source: MetricsError,
    },

    #[error(transparent)]
    Decomposition(#[from] DecompositionError),

    #[error(transparent)]
    Analysis(#[from] AnalysisError),
}

/// One strategy's trajectory and its performance record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyResult {
    pub name: String,
    pub trajectory: NavTrajectory,
    pub metrics: PerformanceMetrics,
}

/// Complete, serializable result of one analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub schema_version: u32,
    pub run_id: RunId,
    pub symbol: String,
    pub data_source: DataSource,
    pub config: RunConfig,
    pub quality: DataQuality,
    pub passive: StrategyResult,
    pub momentum: StrategyResult,
    pub decomposition: ApDecomposition,
    pub extended: ExtendedAnalysis,
    pub rolling: Vec<RollingApPoint>,
    /// Theory verdicts; absent when the decomposition is degenerate.
    pub validation: Option<TheoryValidation>,
}

/// Run the full pipeline over one price series.
///
/// Order mirrors the research workflow: benchmark first, then the momentum
/// strategy, then the decomposition and its diagnostics. The rolling
/// decomposition is only attempted when the sample is long enough for at
/// least one window.
pub fn run_analysis(
    config: &RunConfig,
    prices: &PriceSeries,
    data_source: DataSource,
) -> Result<AnalysisReport, RunError> {
    let quality = survey(prices);

    let passive_trajectory = simulate_passive_dca(prices, config.monthly_amount);
    let passive_metrics = PerformanceMetrics::compute(&passive_trajectory, config.risk_free_rate)
        .map_err(|source| RunError::Metrics {
            strategy: "passive",
            source,
        })?;

    let params = MomentumParams {
        lookback: config.lookback,
        monthly_amount: config.monthly_amount,
        weights: config.weights,
    };
    let momentum_trajectory = simulate_momentum_dca(prices, &params);
    let momentum_metrics =
        PerformanceMetrics::compute(&momentum_trajectory, config.risk_free_rate).map_err(
            |source| RunError::Metrics {
                strategy: "momentum",
                source,
            },
        )?;

    let decomposition = decompose(&momentum_trajectory)?;
    let extended = analyze_excess(&momentum_trajectory, &passive_trajectory)?;
    let rolling = if momentum_trajectory.len() > config.rolling_window {
        rolling_decomposition(&momentum_trajectory, config.rolling_window)?
    } else {
        Vec::new()
    };
    let validation = decomposition.record().map(validate_theory);

    Ok(AnalysisReport {
        schema_version: SCHEMA_VERSION,
        run_id: config.run_id(),
        symbol: config.symbol.clone(),
        data_source,
        config: config.clone(),
        quality,
        passive: StrategyResult {
            name: "passive_dca".into(),
            trajectory: passive_trajectory,
            metrics: passive_metrics,
        },
        momentum: StrategyResult {
            name: "momentum_dca".into(),
            trajectory: momentum_trajectory,
            metrics: momentum_metrics,
        },
        decomposition,
        extended,
        rolling,
        validation,
    })
}
