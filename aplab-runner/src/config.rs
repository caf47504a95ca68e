//! Serializable run configuration.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use aplab_core::{WeightScheme, MIN_PAIRED_OBSERVATIONS};

/// Unique identifier for an analysis run (content-addressable hash).
pub type RunId = String;

/// Errors from loading or validating a run configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// All parameters needed to reproduce one analysis run.
///
/// Every field has a default, so a TOML file only needs the fields it
/// overrides. Two runs with identical configs share a `RunId`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Asset symbol, for labeling and artifact naming.
    pub symbol: String,

    /// Fixed contribution on the first trading day of each month.
    pub monthly_amount: f64,

    /// Momentum lookback in trading days.
    pub lookback: usize,

    /// Four-bucket weight scheme for the momentum strategy.
    pub weights: WeightScheme,

    /// Annualized risk-free rate for Sharpe/Sortino.
    pub risk_free_rate: f64,

    /// Window size for the rolling decomposition.
    pub rolling_window: usize,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            symbol: "SPY".into(),
            monthly_amount: 1.0,
            lookback: 5,
            weights: WeightScheme::default(),
            risk_free_rate: 0.02,
            rolling_window: 252,
        }
    }
}

impl RunConfig {
    /// Load and validate a TOML config file.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the simulators cannot honor.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.monthly_amount > 0.0 && self.monthly_amount.is_finite()) {
            return Err(ConfigError::Invalid(format!(
                "monthly_amount must be a positive number, got {}",
                self.monthly_amount
            )));
        }
        if self.lookback == 0 {
            return Err(ConfigError::Invalid("lookback must be at least 1".into()));
        }
        let w = &self.weights;
        for (name, value) in [
            ("strong_up", w.strong_up),
            ("mild_up", w.mild_up),
            ("mild_down", w.mild_down),
            ("strong_down", w.strong_down),
            ("threshold", w.threshold),
        ] {
            if !(value > 0.0 && value.is_finite()) {
                return Err(ConfigError::Invalid(format!(
                    "weights.{name} must be a positive number, got {value}"
                )));
            }
        }
        if self.rolling_window < MIN_PAIRED_OBSERVATIONS {
            return Err(ConfigError::Invalid(format!(
                "rolling_window must be at least {MIN_PAIRED_OBSERVATIONS}, got {}",
                self.rolling_window
            )));
        }
        Ok(())
    }

    /// Deterministic content hash of this configuration.
    ///
    /// Two runs with identical configs get the same `RunId`, so artifacts
    /// can be cached and deduplicated by name.
    pub fn run_id(&self) -> RunId {
        let json = serde_json::to_string(self).expect("RunConfig serialization failed");
        blake3::hash(json.as_bytes()).to_hex().to_string()
    }
}
