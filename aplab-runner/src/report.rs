//! Theory validation and the markdown research report.
//!
//! The decomposition framework makes checkable predictions: successful
//! timing shows up as δp > 0, θp inside (0, 1), and a positive weight-return
//! correlation. `validate_theory` turns a decomposition record into typed
//! verdicts; `render_markdown` lays the whole report out for humans.

use serde::{Deserialize, Serialize};

use aplab_core::{ApDecomposition, ApRecord, PerformanceMetrics, Significance};

use crate::runner::AnalysisReport;

/// Sign verdict on the active component, with a ±0.001 neutrality band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActiveVerdict {
    /// δp > 0.001: timing added value.
    Positive,
    /// δp < -0.001: timing destroyed value.
    Negative,
    /// |δp| ≤ 0.001.
    Neutral,
}

/// Range verdict on the active ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RatioVerdict {
    /// 0 < θp < 1 — the expected regime.
    InRange,
    /// θp ≥ 1 — anomalously high; passive component is negative or tiny.
    AboveOne,
    /// θp ≤ 0 — no active value.
    NonPositive,
}

/// Strength of the weight-return correlation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CorrelationStrength {
    /// |r| > 0.3.
    Strong,
    /// |r| > 0.2.
    Medium,
    /// |r| > 0.1.
    Weak,
    Negligible,
}

/// Typed verdicts on whether a decomposition matches theoretical expectations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TheoryValidation {
    pub active_component: ActiveVerdict,
    pub active_ratio: RatioVerdict,
    pub correlation_strength: CorrelationStrength,
    /// True when the correlation is positive (weights lean into gains).
    pub correlation_positive: bool,
    pub reliability: Significance,
}

/// Check a valid decomposition record against the theory's predictions.
pub fn validate_theory(record: &ApRecord) -> TheoryValidation {
    let active_component = if record.active > 0.001 {
        ActiveVerdict::Positive
    } else if record.active < -0.001 {
        ActiveVerdict::Negative
    } else {
        ActiveVerdict::Neutral
    };

    let active_ratio = if record.active_ratio > 0.0 && record.active_ratio < 1.0 {
        RatioVerdict::InRange
    } else if record.active_ratio >= 1.0 {
        RatioVerdict::AboveOne
    } else {
        RatioVerdict::NonPositive
    };

    let abs_correlation = record.correlation.abs();
    let correlation_strength = if abs_correlation > 0.3 {
        CorrelationStrength::Strong
    } else if abs_correlation > 0.2 {
        CorrelationStrength::Medium
    } else if abs_correlation > 0.1 {
        CorrelationStrength::Weak
    } else {
        CorrelationStrength::Negligible
    };

    TheoryValidation {
        active_component,
        active_ratio,
        correlation_strength,
        correlation_positive: record.correlation > 0.0,
        reliability: record.significance,
    }
}

// ─── Markdown rendering ─────────────────────────────────────────────

/// Render a full analysis report as markdown.
pub fn render_markdown(report: &AnalysisReport) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "# Active-Passive Decomposition — {}\n\n",
        report.symbol
    ));
    out.push_str(&format!(
        "- Run: `{}` (schema v{})\n- Data: {:?}, {} rows, {} to {}\n\n",
        &report.run_id[..16.min(report.run_id.len())],
        report.schema_version,
        report.data_source,
        report.quality.rows,
        report.quality.start,
        report.quality.end,
    ));

    out.push_str("## Strategy performance\n\n");
    out.push_str("| Metric | Passive DCA | Momentum DCA |\n");
    out.push_str("|---|---|---|\n");
    let p = &report.passive.metrics;
    let m = &report.momentum.metrics;
    for (name, pv, mv) in metric_rows(p, m) {
        out.push_str(&format!("| {name} | {pv} | {mv} |\n"));
    }
    out.push('\n');

    out.push_str("## Decomposition\n\n");
    match &report.decomposition {
        ApDecomposition::Valid(record) => {
            out.push_str(&format!(
                "- Active (δp): {:.6}\n- Passive (νp): {:.6}\n- Active ratio (θp): {:.4}\n\
                 - Weight-return correlation: {:.3}\n- Sample size: {} ({:?} significance)\n",
                record.active,
                record.passive,
                record.active_ratio,
                record.correlation,
                record.sample_size,
                record.significance,
            ));
        }
        ApDecomposition::Insufficient { sample_size } => {
            out.push_str(&format!(
                "Insufficient data for a reliable decomposition ({sample_size} paired observations).\n"
            ));
        }
        ApDecomposition::Failed { message } => {
            out.push_str(&format!("Decomposition failed: {message}\n"));
        }
    }
    out.push('\n');

    if let Some(validation) = &report.validation {
        out.push_str("## Theory validation\n\n");
        out.push_str(&format!(
            "- Active component: {:?}\n- Active ratio: {:?}\n- Correlation: {:?} ({})\n- Reliability: {:?}\n\n",
            validation.active_component,
            validation.active_ratio,
            validation.correlation_strength,
            if validation.correlation_positive {
                "positive"
            } else {
                "non-positive"
            },
            validation.reliability,
        ));
    }

    out.push_str("## Excess-return analysis\n\n");
    let e = &report.extended;
    out.push_str(&format!(
        "- Annualized active contribution: {:.4}\n- Active volatility: {:.4}\n\
         - Information ratio: {:.4}\n- Positive periods: {:.2}%\n\
         - Max active drawdown: {:.4}\n- Skewness: {:.4}\n- Excess kurtosis: {:.4}\n",
        e.active_contribution,
        e.active_volatility,
        e.information_ratio,
        e.positive_periods_ratio * 100.0,
        e.max_active_drawdown,
        e.excess_skewness,
        e.excess_kurtosis,
    ));
    if let Some(w) = &e.weights {
        out.push_str(&format!(
            "- Weight mean/std: {:.3} / {:.3} (range {:.1}–{:.1})\n\
             - Extreme-weight frequency: {:.2}%\n- Weight turnover: {:.4}\n",
            w.mean,
            w.std,
            w.min,
            w.max,
            w.extreme_frequency * 100.0,
            w.turnover,
        ));
    }

    if !report.rolling.is_empty() {
        out.push_str(&format!(
            "\n## Rolling decomposition\n\n{} windows of {} days; final window: \
             δp = {:.6}, θp = {:.4}\n",
            report.rolling.len(),
            report.config.rolling_window,
            report.rolling.last().map(|p| p.active).unwrap_or(0.0),
            report.rolling.last().map(|p| p.active_ratio).unwrap_or(0.0),
        ));
    }

    out
}

fn metric_rows(p: &PerformanceMetrics, m: &PerformanceMetrics) -> Vec<(String, String, String)> {
    let pct = |v: f64| format!("{:.2}%", v * 100.0);
    let num = |v: f64| format!("{v:.3}");
    vec![
        ("Total return".into(), pct(p.total_return), pct(m.total_return)),
        (
            "Annualized return".into(),
            pct(p.annualized_return),
            pct(m.annualized_return),
        ),
        (
            "Annualized volatility".into(),
            pct(p.annualized_volatility),
            pct(m.annualized_volatility),
        ),
        ("Sharpe".into(), num(p.sharpe_ratio), num(m.sharpe_ratio)),
        ("Max drawdown".into(), pct(p.max_drawdown), pct(m.max_drawdown)),
        ("Win rate".into(), pct(p.win_rate), pct(m.win_rate)),
        ("Calmar".into(), num(p.calmar_ratio), num(m.calmar_ratio)),
        ("Sortino".into(), num(p.sortino_ratio), num(m.sortino_ratio)),
        ("VaR 95".into(), pct(p.var_95), pct(m.var_95)),
        (
            "Max consecutive losses".into(),
            p.max_consecutive_losses.to_string(),
            m.max_consecutive_losses.to_string(),
        ),
    ]
}
