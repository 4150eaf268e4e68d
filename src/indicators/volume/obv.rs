//! OBV (On-Balance Volume) indicator

use crate::models::price::PricePoint;

/// Running OBV, one value per point. The first point contributes nothing.
pub fn obv_series(points: &[PricePoint]) -> Vec<f64> {
    let mut series = Vec::with_capacity(points.len());
    let mut obv = 0.0;
    for (i, point) in points.iter().enumerate() {
        if i > 0 {
            let prev = points[i - 1].close;
            if point.close > prev {
                obv += point.volume as f64;
            } else if point.close < prev {
                obv -= point.volume as f64;
            }
        }
        series.push(obv);
    }
    series
}

/// Final OBV value of the series.
pub fn calculate_obv(points: &[PricePoint]) -> f64 {
    obv_series(points).last().copied().unwrap_or(0.0)
}
