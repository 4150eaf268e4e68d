//! SMA (Simple Moving Average) indicator

use crate::common::math;
use crate::indicators::{closes, latest_close};
use crate::models::price::PricePoint;

/// Average close over the trailing `period` points.
///
/// Degrades to the latest close when history is shorter than `period`.
pub fn calculate_sma(points: &[PricePoint], period: usize) -> f64 {
    math::sma(&closes(points), period).unwrap_or_else(|| latest_close(points))
}
