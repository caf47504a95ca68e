//! Price series — the fundamental input unit.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Closing price for a single symbol on a single trading day.
///
/// A non-positive or non-finite close is representable: the simulators treat
/// such a row as a zero-contribution / zero-value day rather than rejecting
/// the whole series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub close: f64,
}

/// Validation errors for price series construction.
#[derive(Debug, Error)]
pub enum SeriesError {
    #[error("price series is empty")]
    Empty,

    #[error("dates out of order at row {index}: {date} follows {previous}")]
    OutOfOrder {
        index: usize,
        previous: NaiveDate,
        date: NaiveDate,
    },

    #[error("duplicate date at row {index}: {date}")]
    DuplicateDate { index: usize, date: NaiveDate },
}

/// Ordered daily close-price series for one symbol.
///
/// Invariants enforced at construction: non-empty, dates strictly ascending
/// (which also rules out duplicates).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    symbol: String,
    points: Vec<PricePoint>,
}

impl PriceSeries {
    /// Build a validated series. Rows must already be in ascending date order.
    pub fn new(symbol: impl Into<String>, points: Vec<PricePoint>) -> Result<Self, SeriesError> {
        if points.is_empty() {
            return Err(SeriesError::Empty);
        }
        for (i, pair) in points.windows(2).enumerate() {
            let (prev, cur) = (pair[0].date, pair[1].date);
            if cur == prev {
                return Err(SeriesError::DuplicateDate {
                    index: i + 1,
                    date: cur,
                });
            }
            if cur < prev {
                return Err(SeriesError::OutOfOrder {
                    index: i + 1,
                    previous: prev,
                    date: cur,
                });
            }
        }
        Ok(Self {
            symbol: symbol.into(),
            points,
        })
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false: emptiness is rejected at construction.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.points.iter().map(|p| p.date).collect()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.close).collect()
    }

    /// Simple day-over-day returns, aligned with the series.
    ///
    /// `r_0 = 0` (no prior observation). A non-positive or non-finite price
    /// on either side of a step yields `0.0` for that step by convention —
    /// bad rows are data-quality failures, not fatal errors.
    pub fn daily_returns(&self) -> Vec<f64> {
        let mut returns = Vec::with_capacity(self.points.len());
        returns.push(0.0);
        for pair in self.points.windows(2) {
            let (prev, cur) = (pair[0].close, pair[1].close);
            if prev > 0.0 && prev.is_finite() && cur.is_finite() {
                returns.push(cur / prev - 1.0);
            } else {
                returns.push(0.0);
            }
        }
        returns
    }

    /// Rolling `lookback`-day returns: `m_t = p_t / p_{t-lookback} - 1`.
    ///
    /// `None` for the first `lookback` observations (insufficient history)
    /// and for steps where the base price is non-positive or either price is
    /// non-finite.
    pub fn rolling_returns(&self, lookback: usize) -> Vec<Option<f64>> {
        (0..self.points.len())
            .map(|t| {
                if t < lookback {
                    return None;
                }
                let base = self.points[t - lookback].close;
                let cur = self.points[t].close;
                if base > 0.0 && base.is_finite() && cur.is_finite() {
                    Some(cur / base - 1.0)
                } else {
                    None
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn series(closes: &[f64]) -> PriceSeries {
        let start = date(2024, 1, 2);
        let points = closes
            .iter()
            .enumerate()
            .map(|(i, &close)| PricePoint {
                date: start + chrono::Duration::days(i as i64),
                close,
            })
            .collect();
        PriceSeries::new("TEST", points).unwrap()
    }

    #[test]
    fn rejects_empty() {
        assert!(matches!(
            PriceSeries::new("TEST", vec![]),
            Err(SeriesError::Empty)
        ));
    }

    #[test]
    fn rejects_duplicate_and_unsorted_dates() {
        let p = |d: NaiveDate| PricePoint { date: d, close: 1.0 };
        let dup = vec![p(date(2024, 1, 2)), p(date(2024, 1, 2))];
        assert!(matches!(
            PriceSeries::new("TEST", dup),
            Err(SeriesError::DuplicateDate { index: 1, .. })
        ));

        let unsorted = vec![p(date(2024, 1, 3)), p(date(2024, 1, 2))];
        assert!(matches!(
            PriceSeries::new("TEST", unsorted),
            Err(SeriesError::OutOfOrder { index: 1, .. })
        ));
    }

    #[test]
    fn daily_returns_start_at_zero() {
        let s = series(&[100.0, 110.0, 99.0]);
        let r = s.daily_returns();
        assert_eq!(r.len(), 3);
        assert_eq!(r[0], 0.0);
        assert!((r[1] - 0.1).abs() < 1e-12);
        assert!((r[2] - (-0.1)).abs() < 1e-12);
    }

    #[test]
    fn zero_price_yields_zero_return() {
        let s = series(&[100.0, 0.0, 50.0]);
        let r = s.daily_returns();
        // 100 -> 0 is a -100% move, but 0 -> 50 is undefined and maps to 0.
        assert!((r[1] - (-1.0)).abs() < 1e-12);
        assert_eq!(r[2], 0.0);
    }

    #[test]
    fn rolling_returns_warmup_is_none() {
        let s = series(&[100.0, 101.0, 102.0, 103.0, 104.0, 105.0, 106.0]);
        let m = s.rolling_returns(5);
        assert!(m[..5].iter().all(Option::is_none));
        assert!((m[5].unwrap() - 0.05).abs() < 1e-12);
        assert!((m[6].unwrap() - (106.0 / 101.0 - 1.0)).abs() < 1e-12);
    }
}
