//! Shared fixtures for unit tests
#![allow(dead_code)]

use chrono::{DateTime, Duration, TimeZone, Utc};
use tickerwise::models::decision::DecisionRequest;
use tickerwise::models::indicators::{
    BollingerBandsIndicator, IndicatorSet, MacdIndicator, StochasticIndicator, TechnicalIndicators,
};
use tickerwise::models::price::PricePoint;

pub const SYMBOL: &str = "AAPL";
pub const MARKET: &str = "NASDAQ";

pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
}

/// One daily point per close, high/low half a unit around the close.
pub fn prices_from_closes(closes: &[f64]) -> Vec<PricePoint> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            PricePoint::new(
                SYMBOL,
                MARKET,
                close,
                close + 0.5,
                close - 0.5,
                close,
                1_000,
                base_time() + Duration::days(i as i64),
            )
        })
        .collect()
}

/// Points with high == low == close.
pub fn flat_prices(count: usize, price: f64) -> Vec<PricePoint> {
    (0..count)
        .map(|i| {
            PricePoint::new(
                SYMBOL,
                MARKET,
                price,
                price,
                price,
                price,
                1_000,
                base_time() + Duration::days(i as i64),
            )
        })
        .collect()
}

pub fn rising_closes(count: usize, start: f64) -> Vec<f64> {
    (0..count).map(|i| start + i as f64).collect()
}

pub fn falling_closes(count: usize, start: f64) -> Vec<f64> {
    (0..count).map(|i| start - i as f64).collect()
}

pub fn indicators(rsi: f64, macd: f64, sma_20: f64, sma_50: f64) -> TechnicalIndicators {
    TechnicalIndicators {
        rsi,
        macd: MacdIndicator {
            macd,
            signal: macd * 0.8,
            histogram: macd * 0.2,
        },
        sma_20,
        sma_50,
        ema_12: sma_20,
        ema_26: sma_50,
        bollinger: BollingerBandsIndicator {
            upper: sma_20,
            middle: sma_20,
            lower: sma_20,
        },
        stochastic: StochasticIndicator { k: 50.0, d: 50.0 },
        williams_r: -50.0,
        atr: 0.0,
        obv: 0.0,
    }
}

pub fn request(values: TechnicalIndicators) -> DecisionRequest {
    let price = prices_from_closes(&[100.0]).remove(0);
    let set = IndicatorSet::new(SYMBOL.to_string(), values, 50).with_computed_at(price.timestamp);
    DecisionRequest::new(price, set)
}
