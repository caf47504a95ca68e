//! aplab-runner — orchestration around the numeric core.
//!
//! Loads price data (CSV or deterministic synthetic fallback), runs the
//! passive and momentum strategies, assembles a versioned `AnalysisReport`,
//! validates it against the decomposition theory's predictions, compares
//! strategies in parallel, and exports JSON/CSV/markdown artifacts.

pub mod compare;
pub mod config;
pub mod data;
pub mod export;
pub mod report;
pub mod runner;

pub use compare::{compare_strategies, StrategyApSummary};
pub use config::{ConfigError, RunConfig, RunId};
pub use data::{load_close_csv, survey, synthetic_prices, DataQuality, DataSource, LoadError};
pub use export::{export_json, export_trajectory_csv, import_json, save_artifacts};
pub use report::{render_markdown, validate_theory, TheoryValidation};
pub use runner::{run_analysis, AnalysisReport, RunError, StrategyResult, SCHEMA_VERSION};
