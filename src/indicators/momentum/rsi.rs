//! RSI (Relative Strength Index) indicator

use crate::models::price::PricePoint;

/// Returned when there is not enough history or the window did not move.
pub const NEUTRAL_RSI: f64 = 50.0;

/// Calculate RSI over the trailing `period` close-to-close deltas.
///
/// RSI = 100 - (100 / (1 + RS)), RS = average gain / average loss.
/// A window with losses of exactly zero saturates at 100, unless it also has
/// no gains, in which case the price did not move and RSI is neutral.
pub fn calculate_rsi(points: &[PricePoint], period: usize) -> f64 {
    if period == 0 || points.len() < period + 1 {
        return NEUTRAL_RSI;
    }

    let deltas: Vec<f64> = points.windows(2).map(|w| w[1].close - w[0].close).collect();
    let recent = &deltas[deltas.len() - period..];

    let avg_gain = recent.iter().filter(|d| **d > 0.0).sum::<f64>() / period as f64;
    let avg_loss = recent.iter().filter(|d| **d < 0.0).map(|d| -d).sum::<f64>() / period as f64;

    if avg_loss == 0.0 {
        if avg_gain == 0.0 {
            return NEUTRAL_RSI;
        }
        return 100.0;
    }

    let rs = avg_gain / avg_loss;
    (100.0 - (100.0 / (1.0 + rs))).clamp(0.0, 100.0)
}

/// Calculate RSI with default period (14)
pub fn calculate_rsi_default(points: &[PricePoint]) -> f64 {
    calculate_rsi(points, 14)
}
