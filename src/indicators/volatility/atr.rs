//! ATR (Average True Range) indicator

use crate::common::math;
use crate::models::price::PricePoint;

/// Calculate ATR (Average True Range)
///
/// Plain mean of the trailing `period` true ranges. With less history the
/// available true ranges are averaged; a single point has no true range.
pub fn calculate_atr(points: &[PricePoint], period: usize) -> f64 {
    let tr_values: Vec<f64> = points
        .windows(2)
        .map(|w| math::true_range(w[1].high, w[1].low, w[0].close))
        .collect();

    if tr_values.len() < period {
        return math::mean(&tr_values);
    }

    math::mean(&tr_values[tr_values.len() - period..])
}

/// Calculate ATR with default period (14)
pub fn calculate_atr_default(points: &[PricePoint]) -> f64 {
    calculate_atr(points, 14)
}
