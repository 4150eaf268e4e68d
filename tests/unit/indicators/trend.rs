//! Unit tests for SMA and EMA

use crate::test_utils::{falling_closes, flat_prices, prices_from_closes, rising_closes};
use tickerwise::indicators::trend::{calculate_ema, calculate_sma};

#[test]
fn test_sma_short_history_degrades_to_latest_close() {
    let prices = prices_from_closes(&[10.0, 11.0, 12.0]);
    assert_eq!(calculate_sma(&prices, 20), 12.0);
}

#[test]
fn test_sma_trailing_average() {
    let prices = prices_from_closes(&rising_closes(30, 1.0));
    // Last 20 closes are 11..=30
    assert_eq!(calculate_sma(&prices, 20), 20.5);
}

#[test]
fn test_ema_constant_series_converges_to_constant() {
    let prices = flat_prices(200, 73.25);
    for period in [12, 26, 50] {
        assert!((calculate_ema(&prices, period) - 73.25).abs() < 1e-9);
    }
}

#[test]
fn test_ema_short_history_degrades_to_latest_close() {
    let prices = prices_from_closes(&[10.0, 11.0]);
    assert_eq!(calculate_ema(&prices, 12), 11.0);
}

#[test]
fn test_faster_ema_tracks_trend_more_closely() {
    let up = prices_from_closes(&rising_closes(60, 100.0));
    assert!(calculate_ema(&up, 12) > calculate_ema(&up, 26));

    let down = prices_from_closes(&falling_closes(60, 200.0));
    assert!(calculate_ema(&down, 12) < calculate_ema(&down, 26));
}
