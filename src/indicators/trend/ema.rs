//! EMA (Exponential Moving Average) indicator

use crate::common::math;
use crate::indicators::{closes, latest_close};
use crate::models::price::PricePoint;

/// Calculate EMA for a specific period
///
/// Seeded from the first close and smoothed with `2 / (period + 1)` over the
/// whole series. Degrades to the latest close when history is shorter than
/// `period`.
pub fn calculate_ema(points: &[PricePoint], period: usize) -> f64 {
    math::ema(&closes(points), period).unwrap_or_else(|| latest_close(points))
}
