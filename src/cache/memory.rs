//! In-process cache with per-entry expiry. Used by tests and single-process
//! runs without Redis.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

use super::{CacheError, SignalCache};
use crate::config::CacheTtl;
use crate::models::indicators::IndicatorSet;
use crate::models::price::PricePoint;
use crate::models::signal::Signal;

#[derive(Debug, Clone)]
struct Entry<T> {
    value: T,
    expires_at: Instant,
}

impl<T: Clone> Entry<T> {
    fn new(value: T, ttl: Duration) -> Self {
        Self {
            value,
            expires_at: Instant::now() + ttl,
        }
    }

    fn live(&self) -> Option<T> {
        (Instant::now() < self.expires_at).then(|| self.value.clone())
    }
}

#[derive(Default)]
struct Entries {
    prices: HashMap<String, Entry<PricePoint>>,
    indicators: HashMap<String, Entry<IndicatorSet>>,
    signals: HashMap<String, Entry<Vec<Signal>>>,
}

#[derive(Clone, Default)]
pub struct InMemoryCache {
    entries: Arc<RwLock<Entries>>,
    ttl: CacheTtl,
}

impl InMemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ttl(ttl: CacheTtl) -> Self {
        Self {
            entries: Arc::default(),
            ttl,
        }
    }

    /// Number of live entries across all kinds.
    pub async fn len(&self) -> usize {
        let entries = self.entries.read().await;
        let now = Instant::now();
        entries.prices.values().filter(|e| e.expires_at > now).count()
            + entries.indicators.values().filter(|e| e.expires_at > now).count()
            + entries.signals.values().filter(|e| e.expires_at > now).count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl SignalCache for InMemoryCache {
    async fn get_price(&self, symbol: &str) -> Result<Option<PricePoint>, CacheError> {
        let entries = self.entries.read().await;
        Ok(entries.prices.get(symbol).and_then(Entry::live))
    }

    async fn set_price(&self, price: &PricePoint) -> Result<(), CacheError> {
        let mut entries = self.entries.write().await;
        entries
            .prices
            .insert(price.symbol.clone(), Entry::new(price.clone(), self.ttl.price));
        Ok(())
    }

    async fn get_indicators(&self, symbol: &str) -> Result<Option<IndicatorSet>, CacheError> {
        let entries = self.entries.read().await;
        Ok(entries.indicators.get(symbol).and_then(Entry::live))
    }

    async fn set_indicators(&self, indicators: &IndicatorSet) -> Result<(), CacheError> {
        let mut entries = self.entries.write().await;
        entries.indicators.insert(
            indicators.symbol.clone(),
            Entry::new(indicators.clone(), self.ttl.indicators),
        );
        Ok(())
    }

    async fn get_signals(&self, symbol: &str) -> Result<Option<Vec<Signal>>, CacheError> {
        let entries = self.entries.read().await;
        Ok(entries.signals.get(symbol).and_then(Entry::live))
    }

    async fn set_signals(&self, symbol: &str, signals: &[Signal]) -> Result<(), CacheError> {
        let mut entries = self.entries.write().await;
        entries
            .signals
            .insert(symbol.to_string(), Entry::new(signals.to_vec(), self.ttl.signals));
        Ok(())
    }

    async fn invalidate_instrument(&self, symbol: &str) -> Result<(), CacheError> {
        let mut entries = self.entries.write().await;
        entries.prices.remove(symbol);
        entries.indicators.remove(symbol);
        entries.signals.remove(symbol);
        Ok(())
    }
}
