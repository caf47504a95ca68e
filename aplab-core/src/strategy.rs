//! The two DCA strategy simulators.
//!
//! The passive benchmark accumulates units of the asset bought with each
//! monthly contribution and never sells. The momentum variant instead scales
//! the day's realized return on existing NAV by a signal-driven weight — it
//! is that scaling, not the share count, that makes (weight, return) a
//! covariance-bearing pair for the decomposition engine.
//!
//! The two recurrences are deliberately different shapes. A constant-weight
//! momentum run reduces to pure return compounding of contributions, which
//! is *not* the same trajectory as the unit-based passive benchmark.

use crate::domain::{NavPoint, NavTrajectory, PriceSeries};
use crate::schedule::{contribution_schedule, cumulative_capital};
use crate::weight::{momentum_weight, WeightScheme};

/// Parameters for the momentum-weighted DCA simulator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MomentumParams {
    /// Rolling momentum lookback in trading days.
    pub lookback: usize,
    /// Fixed contribution on the first trading day of each month.
    pub monthly_amount: f64,
    pub weights: WeightScheme,
}

impl Default for MomentumParams {
    fn default() -> Self {
        Self {
            lookback: 5,
            monthly_amount: 1.0,
            weights: WeightScheme::default(),
        }
    }
}

/// Passive buy-and-hold DCA: spend each monthly contribution on units at
/// that day's close, hold forever.
///
/// `NAV_t = units_t × close_t`. A day with `close <= 0` buys nothing and is
/// valued at 0 (data-quality failure for that day only; units persist).
/// The trajectory carries no weight series — the benchmark's active
/// component is structurally zero.
pub fn simulate_passive_dca(prices: &PriceSeries, monthly_amount: f64) -> NavTrajectory {
    let dates = prices.dates();
    let contributions = contribution_schedule(&dates, monthly_amount);
    let capital = cumulative_capital(&contributions);
    let returns = prices.daily_returns();

    let mut units = 0.0_f64;
    let mut points = Vec::with_capacity(prices.len());
    for (t, point) in prices.points().iter().enumerate() {
        let close = point.close;
        let valid_price = close > 0.0 && close.is_finite();
        if contributions[t] > 0.0 && valid_price {
            units += contributions[t] / close;
        }
        let nav = if valid_price { units * close } else { 0.0 };
        points.push(NavPoint {
            date: point.date,
            nav,
            contribution: contributions[t],
            cumulative_capital: capital[t],
            daily_return: returns[t],
            weight: None,
        });
    }
    NavTrajectory::new(points)
}

/// Momentum-weighted DCA.
///
/// Recurrence:
/// ```text
/// NAV_t = max((NAV_{t-1} + c_t) * (1 + r_t * w_t), 0)
/// ```
/// where `c_t` is the monthly contribution (zero except on the first trading
/// day of a month), `r_t` the day's simple return, and `w_t` the weight from
/// the four-bucket rule applied to the `lookback`-day rolling return. Days
/// inside the lookback warmup carry the neutral weight 1.0. The floored
/// value is what carries into the next step.
pub fn simulate_momentum_dca(prices: &PriceSeries, params: &MomentumParams) -> NavTrajectory {
    let dates = prices.dates();
    let contributions = contribution_schedule(&dates, params.monthly_amount);
    let capital = cumulative_capital(&contributions);
    let returns = prices.daily_returns();
    let signal = prices.rolling_returns(params.lookback);

    let mut nav = 0.0_f64;
    let mut points = Vec::with_capacity(prices.len());
    for (t, point) in prices.points().iter().enumerate() {
        let weight = momentum_weight(signal[t], &params.weights);
        nav = (nav + contributions[t]) * (1.0 + returns[t] * weight);
        nav = nav.max(0.0);
        points.push(NavPoint {
            date: point.date,
            nav,
            contribution: contributions[t],
            cumulative_capital: capital[t],
            daily_return: returns[t],
            weight: Some(weight),
        });
    }
    NavTrajectory::new(points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PricePoint;
    use chrono::NaiveDate;

    fn series(closes: &[f64]) -> PriceSeries {
        let start = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
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

    /// Two-month series crossing the Jan/Feb boundary.
    fn two_month_series() -> PriceSeries {
        let closes: Vec<f64> = (0..40).map(|i| 100.0 + i as f64).collect();
        series(&closes)
    }

    #[test]
    fn passive_capital_counts_months() {
        let traj = simulate_passive_dca(&two_month_series(), 10.0);
        // 40 consecutive days from Jan 2 span January and February.
        assert_eq!(traj.last_capital(), Some(20.0));
    }

    #[test]
    fn passive_nav_is_units_times_price() {
        let prices = series(&[100.0, 110.0, 120.0]);
        let traj = simulate_passive_dca(&prices, 50.0);
        let units = 50.0 / 100.0;
        let navs = traj.navs();
        assert!((navs[0] - units * 100.0).abs() < 1e-12);
        assert!((navs[1] - units * 110.0).abs() < 1e-12);
        assert!((navs[2] - units * 120.0).abs() < 1e-12);
    }

    #[test]
    fn passive_skips_purchase_on_bad_price() {
        // Contribution day with close = 0: nothing bought, day valued at 0.
        let prices = series(&[0.0, 100.0, 110.0]);
        let traj = simulate_passive_dca(&prices, 50.0);
        let navs = traj.navs();
        assert_eq!(navs[0], 0.0);
        // No units were ever bought (the only contribution day was bad).
        assert_eq!(navs[1], 0.0);
        assert_eq!(traj.last_capital(), Some(50.0));
    }

    #[test]
    fn momentum_with_unit_weights_is_pure_compounding() {
        let prices = series(&[100.0, 102.0, 101.0, 104.0, 103.0, 108.0, 110.0, 107.0]);
        let params = MomentumParams {
            lookback: 3,
            monthly_amount: 1.0,
            weights: WeightScheme {
                strong_up: 1.0,
                mild_up: 1.0,
                mild_down: 1.0,
                strong_down: 1.0,
                threshold: 0.05,
            },
        };
        let traj = simulate_momentum_dca(&prices, &params);

        // Reference: compound contributions through raw returns.
        let returns = prices.daily_returns();
        let contributions =
            contribution_schedule(&prices.dates(), params.monthly_amount);
        let mut reference = 0.0;
        for t in 0..prices.len() {
            reference = (reference + contributions[t]) * (1.0 + returns[t]);
            let got = traj.navs()[t];
            assert!(
                (got - reference).abs() < 1e-12,
                "day {t}: {got} != {reference}"
            );
        }
    }

    #[test]
    fn momentum_warmup_days_are_neutral() {
        let closes: Vec<f64> = (0..8).map(|i| 100.0 * 1.02_f64.powi(i)).collect();
        let prices = series(&closes);
        let traj = simulate_momentum_dca(&prices, &MomentumParams::default());
        let weights = traj.weights().unwrap();
        assert!(weights[..5].iter().all(|&w| w == 1.0));
        // 5-day rolling return of a 2%/day climb clears the 5% threshold.
        assert!(weights[5..].iter().all(|&w| w == 1.3));
    }

    #[test]
    fn momentum_nav_floors_at_zero() {
        // Strong rally keeps the 5-day signal positive (weight 1.3) into a
        // -90% crash day: 1 + (-0.9 * 1.3) < 0, so the raw recurrence would
        // go negative. The floor clamps it and the clamped value carries.
        let prices = series(&[1.0, 2.0, 4.0, 8.0, 16.0, 32.0, 3.2]);
        let traj = simulate_momentum_dca(&prices, &MomentumParams::default());
        let navs = traj.navs();
        assert_eq!(navs[6], 0.0);
        assert!(navs.iter().all(|&v| v >= 0.0));
    }
}
