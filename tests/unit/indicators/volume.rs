//! Unit tests for OBV

use crate::test_utils::{flat_prices, prices_from_closes, rising_closes};
use tickerwise::indicators::volume::{calculate_obv, obv_series};

#[test]
fn test_obv_strictly_increasing_on_rising_closes() {
    let prices = prices_from_closes(&rising_closes(20, 100.0));
    let series = obv_series(&prices);
    assert_eq!(series.len(), 20);
    assert!(series.windows(2).all(|w| w[1] > w[0]));
    assert_eq!(calculate_obv(&prices), 19_000.0);
}

#[test]
fn test_obv_signed_by_direction() {
    let prices = prices_from_closes(&[10.0, 11.0, 10.5, 10.5, 12.0]);
    assert_eq!(obv_series(&prices), vec![0.0, 1000.0, 0.0, 0.0, 1000.0]);
}

#[test]
fn test_obv_flat_and_empty() {
    assert_eq!(calculate_obv(&flat_prices(10, 1.0)), 0.0);
    assert_eq!(calculate_obv(&[]), 0.0);
}
