//! In-process store, used by tests and local runs.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::{PriceStore, StoreError};
use crate::models::indicators::IndicatorSet;
use crate::models::price::{Instrument, PricePoint};
use crate::models::signal::Signal;

#[derive(Default)]
struct State {
    instruments: HashMap<String, Instrument>,
    /// Per symbol, sorted by timestamp.
    prices: HashMap<String, Vec<PricePoint>>,
    indicators: Vec<IndicatorSet>,
    signals: Vec<Signal>,
}

#[derive(Clone, Default)]
pub struct InMemoryStore {
    state: Arc<RwLock<State>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every signal written for `symbol`, in append order.
    pub async fn signals(&self, symbol: &str) -> Vec<Signal> {
        let state = self.state.read().await;
        state
            .signals
            .iter()
            .filter(|s| s.symbol == symbol)
            .cloned()
            .collect()
    }

    /// Every indicator set written for `symbol`, in append order.
    pub async fn indicator_history(&self, symbol: &str) -> Vec<IndicatorSet> {
        let state = self.state.read().await;
        state
            .indicators
            .iter()
            .filter(|s| s.symbol == symbol)
            .cloned()
            .collect()
    }

    pub async fn price_count(&self, symbol: &str) -> usize {
        let state = self.state.read().await;
        state.prices.get(symbol).map(Vec::len).unwrap_or(0)
    }
}

#[async_trait]
impl PriceStore for InMemoryStore {
    async fn find_instrument(&self, symbol: &str) -> Result<Option<Instrument>, StoreError> {
        let state = self.state.read().await;
        Ok(state.instruments.get(symbol).cloned())
    }

    async fn active_instruments(&self) -> Result<Vec<Instrument>, StoreError> {
        let state = self.state.read().await;
        let mut active: Vec<Instrument> = state
            .instruments
            .values()
            .filter(|i| i.active)
            .cloned()
            .collect();
        active.sort_by(|a, b| a.symbol.cmp(&b.symbol));
        Ok(active)
    }

    async fn add_instrument(&self, instrument: &Instrument) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        state
            .instruments
            .insert(instrument.symbol.clone(), instrument.clone());
        Ok(())
    }

    async fn recent_prices(
        &self,
        symbol: &str,
        limit: usize,
    ) -> Result<Vec<PricePoint>, StoreError> {
        let state = self.state.read().await;
        let Some(prices) = state.prices.get(symbol) else {
            return Ok(Vec::new());
        };
        let start = prices.len().saturating_sub(limit);
        Ok(prices[start..].to_vec())
    }

    async fn latest_price(&self, symbol: &str) -> Result<Option<PricePoint>, StoreError> {
        let state = self.state.read().await;
        Ok(state.prices.get(symbol).and_then(|p| p.last()).cloned())
    }

    async fn append_price(&self, price: &PricePoint) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        let series = state.prices.entry(price.symbol.clone()).or_default();
        if let Err(pos) = series.binary_search_by_key(&price.timestamp, |p| p.timestamp) {
            series.insert(pos, price.clone());
        }
        Ok(())
    }

    async fn append_indicators(&self, indicators: &IndicatorSet) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        state.indicators.push(indicators.clone());
        Ok(())
    }

    async fn append_signal(&self, signal: &Signal) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        state.signals.push(signal.clone());
        Ok(())
    }

    async fn recent_signals(&self, symbol: &str, limit: usize) -> Result<Vec<Signal>, StoreError> {
        let state = self.state.read().await;
        let mut signals: Vec<Signal> = state
            .signals
            .iter()
            .filter(|s| s.symbol == symbol)
            .cloned()
            .collect();
        // Stable sort keeps append order for equal timestamps.
        signals.sort_by(|a, b| b.produced_at.cmp(&a.produced_at));
        signals.truncate(limit);
        Ok(signals)
    }

    async fn prune_history(&self, cutoff: DateTime<Utc>) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        for series in state.prices.values_mut() {
            series.retain(|p| p.timestamp >= cutoff);
        }
        state.indicators.retain(|i| i.computed_at >= cutoff);
        Ok(())
    }
}
