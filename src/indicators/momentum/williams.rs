//! Williams %R

use crate::common::math;
use crate::models::price::PricePoint;

/// Midpoint used when the trailing range is flat.
pub const NEUTRAL_WILLIAMS_R: f64 = -50.0;

/// Williams %R over the trailing `period` bars, in [-100, 0].
pub fn calculate_williams_r(points: &[PricePoint], period: usize) -> f64 {
    if period == 0 || points.len() < period {
        return NEUTRAL_WILLIAMS_R;
    }

    let window = &points[points.len() - period..];
    let highs: Vec<f64> = window.iter().map(|p| p.high).collect();
    let lows: Vec<f64> = window.iter().map(|p| p.low).collect();
    let (Some(highest), Some(lowest)) = (math::max(&highs), math::min(&lows)) else {
        return NEUTRAL_WILLIAMS_R;
    };

    let range = highest - lowest;
    if range == 0.0 {
        return NEUTRAL_WILLIAMS_R;
    }

    let close = window[window.len() - 1].close;
    ((highest - close) / range) * -100.0
}
