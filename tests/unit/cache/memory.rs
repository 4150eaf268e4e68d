//! Unit tests for the in-memory cache

use crate::test_utils::{indicators, prices_from_closes, request, SYMBOL};
use std::time::Duration;
use tickerwise::cache::{indicators_key, instrument_keys, price_key, signals_key, InMemoryCache, SignalCache};
use tickerwise::config::CacheTtl;

#[test]
fn test_cache_keys() {
    assert_eq!(price_key("AAPL"), "price:AAPL");
    assert_eq!(indicators_key("AAPL"), "indicators:AAPL");
    assert_eq!(signals_key("AAPL"), "signals:AAPL");
    assert_eq!(
        instrument_keys("AAPL"),
        [
            "price:AAPL".to_string(),
            "indicators:AAPL".to_string(),
            "signals:AAPL".to_string()
        ]
    );
}

#[tokio::test]
async fn test_set_and_get() {
    let cache = InMemoryCache::new();
    let price = prices_from_closes(&[101.0]).remove(0);
    let set = request(indicators(50.0, 0.0, 100.0, 100.0)).indicators;

    assert!(cache.get_price(SYMBOL).await.unwrap().is_none());
    cache.set_price(&price).await.unwrap();
    cache.set_indicators(&set).await.unwrap();
    cache.set_signals(SYMBOL, &[]).await.unwrap();

    assert_eq!(cache.get_price(SYMBOL).await.unwrap(), Some(price));
    assert_eq!(cache.get_indicators(SYMBOL).await.unwrap(), Some(set));
    assert_eq!(cache.get_signals(SYMBOL).await.unwrap(), Some(vec![]));
    assert_eq!(cache.len().await, 3);
}

#[tokio::test]
async fn test_invalidate_instrument_clears_all_kinds() {
    let cache = InMemoryCache::new();
    let price = prices_from_closes(&[101.0]).remove(0);
    cache.set_price(&price).await.unwrap();
    cache.set_signals(SYMBOL, &[]).await.unwrap();
    cache.set_signals("MSFT", &[]).await.unwrap();

    cache.invalidate_instrument(SYMBOL).await.unwrap();

    assert!(cache.get_price(SYMBOL).await.unwrap().is_none());
    assert!(cache.get_signals(SYMBOL).await.unwrap().is_none());
    assert!(cache.get_signals("MSFT").await.unwrap().is_some());
}

#[tokio::test]
async fn test_entries_expire_independently() {
    let cache = InMemoryCache::with_ttl(CacheTtl {
        price: Duration::from_millis(20),
        indicators: Duration::from_secs(60),
        signals: Duration::from_secs(60),
    });
    let price = prices_from_closes(&[101.0]).remove(0);
    cache.set_price(&price).await.unwrap();
    cache.set_signals(SYMBOL, &[]).await.unwrap();

    tokio::time::sleep(Duration::from_millis(50)).await;

    assert!(cache.get_price(SYMBOL).await.unwrap().is_none());
    assert!(cache.get_signals(SYMBOL).await.unwrap().is_some());
    assert_eq!(cache.len().await, 1);
}
