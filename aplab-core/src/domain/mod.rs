//! Domain types: validated price series and simulated NAV trajectories.

pub mod series;
pub mod trajectory;

pub use series::{PricePoint, PriceSeries, SeriesError};
pub use trajectory::{NavPoint, NavTrajectory};
