//! Technical indicator calculations.
//!
//! Every function takes price points ordered oldest → newest. The
//! [`IndicatorEngine`] is the only entry point that sorts and validates input.

pub mod engine;
pub mod error;

pub mod momentum;
pub mod trend;
pub mod volatility;
pub mod volume;

pub use engine::{IndicatorConfig, IndicatorEngine, MIN_PRICE_POINTS};
pub use error::IndicatorError;

use crate::models::price::PricePoint;

/// Closing prices of a series.
pub(crate) fn closes(points: &[PricePoint]) -> Vec<f64> {
    points.iter().map(|p| p.close).collect()
}

/// Latest close, used when history is too short for a lookback.
pub(crate) fn latest_close(points: &[PricePoint]) -> f64 {
    points.last().map(|p| p.close).unwrap_or(0.0)
}
