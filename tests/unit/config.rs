//! Unit tests for configuration

use std::time::Duration;
use tickerwise::config::{CacheTtl, PipelineConfig};
use tickerwise::indicators::momentum::SignalLineMethod;
use tickerwise::indicators::IndicatorConfig;
use tickerwise::logging::is_production;

#[test]
fn test_defaults() {
    let config = PipelineConfig::default();
    assert!(config.decision_service_url.is_none());
    assert_eq!(config.decision_timeout, Duration::from_secs(30));
    assert_eq!(config.max_attempts, 3);
    assert_eq!(config.retention_days, 730);
    assert_eq!(config.sweep_interval_seconds, 0);
    assert_eq!(config.worker_name, "tickerwise-worker");
    assert_eq!(
        config.cache_ttl,
        CacheTtl {
            price: Duration::from_secs(60),
            indicators: Duration::from_secs(600),
            signals: Duration::from_secs(900),
        }
    );
    assert_eq!(config.indicators.macd_signal_method, SignalLineMethod::Ema);
}

#[test]
fn test_effective_window_covers_lookbacks() {
    let mut config = PipelineConfig {
        price_window: 10,
        ..PipelineConfig::default()
    };
    assert_eq!(config.effective_price_window(), 50);

    config.indicators = IndicatorConfig {
        sma_long: 120,
        ..IndicatorConfig::default()
    };
    assert_eq!(config.effective_price_window(), 120);
}

#[test]
fn test_from_env() {
    std::env::set_var("PRICE_WINDOW", "20");
    std::env::set_var("WORKER_CONCURRENCY", "8");
    std::env::set_var("MACD_SIGNAL_METHOD", "scaled");
    std::env::set_var("CACHE_PRICE_TTL_SECONDS", "not-a-number");

    let config = PipelineConfig::from_env();
    assert_eq!(config.price_window, 50);
    assert_eq!(config.worker_concurrency, 8);
    assert_eq!(config.indicators.macd_signal_method, SignalLineMethod::Scaled);
    assert_eq!(config.cache_ttl.price, Duration::from_secs(60));

    std::env::remove_var("PRICE_WINDOW");
    std::env::remove_var("WORKER_CONCURRENCY");
    std::env::remove_var("MACD_SIGNAL_METHOD");
    std::env::remove_var("CACHE_PRICE_TTL_SECONDS");
}

#[test]
fn test_is_production() {
    assert!(is_production("production"));
    assert!(!is_production("sandbox"));
}
