//! Stochastic oscillator (%K / %D)

use crate::common::math;
use crate::models::indicators::StochasticIndicator;
use crate::models::price::PricePoint;

/// Midpoint used when the trailing range is flat.
pub const NEUTRAL_STOCHASTIC: f64 = 50.0;

fn percent_k(window: &[PricePoint]) -> f64 {
    let highs: Vec<f64> = window.iter().map(|p| p.high).collect();
    let lows: Vec<f64> = window.iter().map(|p| p.low).collect();
    let (Some(highest), Some(lowest), Some(last)) = (math::max(&highs), math::min(&lows), window.last())
    else {
        return NEUTRAL_STOCHASTIC;
    };

    let range = highest - lowest;
    if range == 0.0 {
        return NEUTRAL_STOCHASTIC;
    }
    ((last.close - lowest) / range) * 100.0
}

/// %K over the trailing `k_period` bars, %D as the SMA of the last `d_period`
/// %K values.
pub fn calculate_stochastic(
    points: &[PricePoint],
    k_period: usize,
    d_period: usize,
) -> StochasticIndicator {
    if k_period == 0 || points.len() < k_period {
        return StochasticIndicator {
            k: NEUTRAL_STOCHASTIC,
            d: NEUTRAL_STOCHASTIC,
        };
    }

    let ks: Vec<f64> = (0..d_period.max(1))
        .map_while(|offset| {
            let end = points.len().checked_sub(offset)?;
            let start = end.checked_sub(k_period)?;
            Some(percent_k(&points[start..end]))
        })
        .collect();

    StochasticIndicator {
        k: ks[0],
        d: math::mean(&ks),
    }
}

/// Calculate Stochastic with default periods (14, 3)
pub fn calculate_stochastic_default(points: &[PricePoint]) -> StochasticIndicator {
    calculate_stochastic(points, 14, 3)
}
