//! Bollinger Bands indicator

use crate::common::math;
use crate::indicators::{closes, latest_close};
use crate::models::indicators::BollingerBandsIndicator;
use crate::models::price::PricePoint;

/// Calculate Bollinger Bands
///
/// Middle Band = SMA(period)
/// Upper Band = Middle + (std_dev * population standard deviation)
/// Lower Band = Middle - (std_dev * population standard deviation)
pub fn calculate_bollinger_bands(
    points: &[PricePoint],
    period: usize,
    std_dev: f64,
) -> BollingerBandsIndicator {
    let closes = closes(points);
    let (Some(middle), Some(std)) = (
        math::sma(&closes, period),
        math::standard_deviation(&closes, period),
    ) else {
        let price = latest_close(points);
        return BollingerBandsIndicator {
            upper: price,
            middle: price,
            lower: price,
        };
    };

    BollingerBandsIndicator {
        upper: middle + (std_dev * std),
        middle,
        lower: middle - (std_dev * std),
    }
}

/// Calculate Bollinger Bands with default parameters (20 SMA, 2σ)
pub fn calculate_bollinger_bands_default(points: &[PricePoint]) -> BollingerBandsIndicator {
    calculate_bollinger_bands(points, 20, 2.0)
}
