//! Monthly contribution schedule.
//!
//! The investor contributes a fixed amount on the first trading day of each
//! calendar month present in the series. Exactly one contribution event per
//! month, so cumulative capital grows by `monthly_amount` per month spanned.

use chrono::{Datelike, NaiveDate};

/// Per-day contribution amounts: `monthly_amount` on the first trading day of
/// each calendar month, `0.0` otherwise.
///
/// `dates` must be ascending (guaranteed by `PriceSeries`); the first row is
/// always a contribution day.
pub fn contribution_schedule(dates: &[NaiveDate], monthly_amount: f64) -> Vec<f64> {
    let mut schedule = Vec::with_capacity(dates.len());
    let mut current_month: Option<(i32, u32)> = None;
    for date in dates {
        let month = (date.year(), date.month());
        if current_month != Some(month) {
            schedule.push(monthly_amount);
            current_month = Some(month);
        } else {
            schedule.push(0.0);
        }
    }
    schedule
}

/// Running sum of contributions — the capital invested to date.
pub fn cumulative_capital(contributions: &[f64]) -> Vec<f64> {
    let mut total = 0.0;
    contributions
        .iter()
        .map(|c| {
            total += c;
            total
        })
        .collect()
}
