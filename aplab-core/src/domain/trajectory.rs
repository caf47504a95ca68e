//! NAV trajectory — one row per trading day of a simulated strategy.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One trading day of a simulated strategy.
///
/// `daily_return` is the *asset's* simple return for the day (the `r_t` the
/// decomposition engine pairs with `weight`), not the NAV's own return.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NavPoint {
    pub date: NaiveDate,
    pub nav: f64,
    pub contribution: f64,
    pub cumulative_capital: f64,
    pub daily_return: f64,
    /// Strategy weight multiplier for the day; `None` on trajectories with no
    /// active weighting (the passive benchmark).
    pub weight: Option<f64>,
}

/// Immutable per-day NAV trajectory produced by one strategy run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavTrajectory {
    points: Vec<NavPoint>,
}

impl NavTrajectory {
    pub fn new(points: Vec<NavPoint>) -> Self {
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[NavPoint] {
        &self.points
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.points.iter().map(|p| p.date).collect()
    }

    pub fn navs(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.nav).collect()
    }

    /// Asset daily returns, aligned with the trajectory.
    pub fn daily_returns(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.daily_return).collect()
    }

    /// Weight series, if every row carries one.
    pub fn weights(&self) -> Option<Vec<f64>> {
        self.points.iter().map(|p| p.weight).collect()
    }

    pub fn has_weights(&self) -> bool {
        !self.points.is_empty() && self.points.iter().all(|p| p.weight.is_some())
    }

    pub fn last_nav(&self) -> Option<f64> {
        self.points.last().map(|p| p.nav)
    }

    pub fn last_capital(&self) -> Option<f64> {
        self.points.last().map(|p| p.cumulative_capital)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(nav: f64, weight: Option<f64>) -> NavPoint {
        NavPoint {
            date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            nav,
            contribution: 0.0,
            cumulative_capital: 1.0,
            daily_return: 0.0,
            weight,
        }
    }

    #[test]
    fn weights_require_every_row() {
        let full = NavTrajectory::new(vec![point(1.0, Some(1.1)), point(1.1, Some(0.9))]);
        assert!(full.has_weights());
        assert_eq!(full.weights(), Some(vec![1.1, 0.9]));

        let partial = NavTrajectory::new(vec![point(1.0, Some(1.1)), point(1.1, None)]);
        assert!(!partial.has_weights());
        assert_eq!(partial.weights(), None);
    }
}
