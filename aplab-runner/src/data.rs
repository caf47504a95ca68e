//! Price loading and data quality.
//!
//! Input policy:
//! 1. A local CSV with `date,close` columns (the cached output of whatever
//!    retrieval tool the user runs) → use it
//! 2. No file → a seeded synthetic random walk, tagged as such in the
//!    report metadata so synthetic results are never mistaken for real ones

use chrono::{Datelike, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use aplab_core::{PricePoint, PriceSeries, SeriesError};

/// Errors from the price-loading layer.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read price file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse price CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("price file contains no rows")]
    NoRows,

    #[error("invalid price series: {0}")]
    Series(#[from] SeriesError),
}

/// Where a price series came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSource {
    Csv,
    Synthetic,
}

#[derive(Debug, Deserialize)]
struct CsvRow {
    date: NaiveDate,
    close: f64,
}

/// Load a `date,close` CSV into a validated price series.
///
/// Rows must be in ascending date order with no duplicates; the series
/// constructor rejects anything else. Non-positive closes are allowed and
/// handled downstream as bad-data days.
pub fn load_close_csv(path: &Path, symbol: &str) -> Result<PriceSeries, LoadError> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut points = Vec::new();
    for row in reader.deserialize() {
        let row: CsvRow = row?;
        points.push(PricePoint {
            date: row.date,
            close: row.close,
        });
    }
    if points.is_empty() {
        return Err(LoadError::NoRows);
    }
    Ok(PriceSeries::new(symbol, points)?)
}

/// Deterministic synthetic price series: a geometric random walk over
/// weekdays, seeded so the same seed always produces the same path.
///
/// Daily step is `drift + vol * u` with `u` uniform on [-1, 1); prices stay
/// strictly positive.
pub fn synthetic_prices(symbol: &str, days: usize, seed: u64) -> PriceSeries {
    let mut rng = StdRng::seed_from_u64(seed);
    let drift = 0.0003;
    let vol = 0.012;

    let mut date = NaiveDate::from_ymd_opt(2019, 1, 2).expect("valid start date");
    let mut close = 100.0_f64;
    let mut points = Vec::with_capacity(days.max(1));
    for _ in 0..days.max(1) {
        points.push(PricePoint { date, close });
        let step: f64 = drift + vol * (rng.gen::<f64>() * 2.0 - 1.0);
        close *= 1.0 + step;
        date = next_weekday(date);
    }
    PriceSeries::new(symbol, points).expect("synthetic series is sorted by construction")
}

fn next_weekday(date: NaiveDate) -> NaiveDate {
    let mut next = date + chrono::Duration::days(1);
    while matches!(
        next.weekday(),
        chrono::Weekday::Sat | chrono::Weekday::Sun
    ) {
        next = next + chrono::Duration::days(1);
    }
    next
}

/// Descriptive survey of a price series, for the report header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataQuality {
    pub rows: usize,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub price_min: f64,
    pub price_max: f64,
    pub price_mean: f64,
    pub price_std: f64,
    /// Count of days with |daily move| > 20%.
    pub extreme_moves: usize,
    /// Count of non-positive or non-finite closes.
    pub bad_rows: usize,
}

/// Survey row count, date range, price range, and outlier days.
pub fn survey(prices: &PriceSeries) -> DataQuality {
    let closes = prices.closes();
    let finite: Vec<f64> = closes
        .iter()
        .copied()
        .filter(|c| c.is_finite() && *c > 0.0)
        .collect();
    let bad_rows = closes.len() - finite.len();
    // All statistics fall back to 0.0 when no row is usable; infinities
    // would not survive JSON export.
    let price_min = if finite.is_empty() {
        0.0
    } else {
        finite.iter().copied().fold(f64::INFINITY, f64::min)
    };
    let price_max = if finite.is_empty() {
        0.0
    } else {
        finite.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    };
    let price_mean = if finite.is_empty() {
        0.0
    } else {
        finite.iter().sum::<f64>() / finite.len() as f64
    };
    let price_std = if finite.len() < 2 {
        0.0
    } else {
        let variance = finite
            .iter()
            .map(|c| (c - price_mean).powi(2))
            .sum::<f64>()
            / (finite.len() - 1) as f64;
        variance.sqrt()
    };
    let extreme_moves = prices
        .daily_returns()
        .iter()
        .filter(|r| r.abs() > 0.2)
        .count();

    let dates = prices.dates();
    DataQuality {
        rows: prices.len(),
        start: dates[0],
        end: *dates.last().expect("series is non-empty"),
        price_min,
        price_max,
        price_mean,
        price_std,
        extreme_moves,
        bad_rows,
    }
}
