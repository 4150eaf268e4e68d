//! Test utilities for pipeline integration tests
#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration as StdDuration;
use tickerwise::cache::InMemoryCache;
use tickerwise::config::PipelineConfig;
use tickerwise::core::orchestrator::{Orchestrator, StageOutcome};
use tickerwise::db::{InMemoryStore, PriceStore, StoreError};
use tickerwise::decision::{DecisionSource, FallbackDecisionChain, RemoteDecisionSource};
use tickerwise::jobs::context::JobContext;
use tickerwise::jobs::publisher::{EventPublisher, InMemoryPublisher};
use tickerwise::jobs::types::{PipelineEvent, PriceIngestedJob};
use tickerwise::metrics::Metrics;
use tickerwise::models::indicators::IndicatorSet;
use tickerwise::models::price::{Instrument, PricePoint};
use tickerwise::models::signal::Signal;

pub const SYMBOL: &str = "AAPL";
pub const MARKET: &str = "NASDAQ";

pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
}

pub fn create_test_prices(closes: &[f64]) -> Vec<PricePoint> {
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

pub fn rising_closes(count: usize) -> Vec<f64> {
    (0..count).map(|i| 100.0 + i as f64).collect()
}

pub fn falling_closes(count: usize) -> Vec<f64> {
    (0..count).map(|i| 200.0 - i as f64).collect()
}

/// Store wrapper whose signal appends fail while `failing` is set.
#[derive(Clone)]
pub struct FlakyStore {
    pub inner: InMemoryStore,
    pub failing: Arc<AtomicBool>,
}

impl FlakyStore {
    pub fn new(inner: InMemoryStore) -> Self {
        Self {
            inner,
            failing: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn recover(&self) {
        self.failing.store(false, Ordering::SeqCst);
    }
}

#[async_trait]
impl PriceStore for FlakyStore {
    async fn find_instrument(&self, symbol: &str) -> Result<Option<Instrument>, StoreError> {
        self.inner.find_instrument(symbol).await
    }

    async fn active_instruments(&self) -> Result<Vec<Instrument>, StoreError> {
        self.inner.active_instruments().await
    }

    async fn add_instrument(&self, instrument: &Instrument) -> Result<(), StoreError> {
        self.inner.add_instrument(instrument).await
    }

    async fn recent_prices(&self, symbol: &str, limit: usize) -> Result<Vec<PricePoint>, StoreError> {
        self.inner.recent_prices(symbol, limit).await
    }

    async fn latest_price(&self, symbol: &str) -> Result<Option<PricePoint>, StoreError> {
        self.inner.latest_price(symbol).await
    }

    async fn append_price(&self, price: &PricePoint) -> Result<(), StoreError> {
        self.inner.append_price(price).await
    }

    async fn append_indicators(&self, indicators: &IndicatorSet) -> Result<(), StoreError> {
        self.inner.append_indicators(indicators).await
    }

    async fn append_signal(&self, signal: &Signal) -> Result<(), StoreError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(StoreError::NotConnected);
        }
        self.inner.append_signal(signal).await
    }

    async fn recent_signals(&self, symbol: &str, limit: usize) -> Result<Vec<Signal>, StoreError> {
        self.inner.recent_signals(symbol, limit).await
    }

    async fn prune_history(&self, cutoff: DateTime<Utc>) -> Result<(), StoreError> {
        self.inner.prune_history(cutoff).await
    }
}

/// Pipeline wired to in-memory adapters
pub struct TestPipeline {
    pub store: InMemoryStore,
    pub cache: InMemoryCache,
    pub publisher: InMemoryPublisher,
    pub metrics: Arc<Metrics>,
    pub orchestrator: Arc<Orchestrator>,
}

impl TestPipeline {
    /// Rule-only pipeline with the test instrument registered
    pub async fn new() -> Self {
        Self::with_chain(FallbackDecisionChain::rules_only()).await
    }

    /// Pipeline backed by a remote decision service at `uri`
    pub async fn with_remote(uri: &str, timeout: StdDuration) -> Self {
        let remote: Arc<dyn DecisionSource> = Arc::new(
            RemoteDecisionSource::with_timeout(uri, timeout).expect("Should build remote source"),
        );
        Self::with_chain(FallbackDecisionChain::new(remote)).await
    }

    pub async fn with_chain(chain: FallbackDecisionChain) -> Self {
        let store = InMemoryStore::new();
        Self::build(store.clone(), Arc::new(store), chain).await
    }

    /// Pipeline whose orchestrator writes through `backend`; `store` is the
    /// underlying in-memory state used for assertions.
    pub async fn build(
        store: InMemoryStore,
        backend: Arc<dyn PriceStore>,
        chain: FallbackDecisionChain,
    ) -> Self {
        store
            .add_instrument(&Instrument::new(SYMBOL, MARKET).with_name("Apple Inc."))
            .await
            .expect("Should add instrument");

        let metrics = Arc::new(Metrics::new().expect("Should create metrics"));
        let cache = InMemoryCache::new();
        let publisher = InMemoryPublisher::new();
        let orchestrator = Arc::new(
            Orchestrator::new(
                backend,
                Arc::new(cache.clone()),
                Arc::new(chain.with_metrics(metrics.clone())),
                Arc::new(publisher.clone()),
                PipelineConfig::default(),
            )
            .with_metrics(metrics.clone()),
        );

        Self {
            store,
            cache,
            publisher,
            metrics,
            orchestrator,
        }
    }

    pub fn job_context(&self) -> Arc<JobContext> {
        Arc::new(JobContext::new(
            self.orchestrator.clone(),
            Some(self.metrics.clone()),
        ))
    }

    /// Append prices directly to the store, bypassing the pipeline
    pub async fn seed_prices(&self, closes: &[f64]) {
        for price in create_test_prices(closes) {
            self.store.append_price(&price).await.expect("Should append price");
        }
    }

    /// Handle published events until nothing new is published.
    pub async fn run_until_idle(&self) -> Vec<(&'static str, StageOutcome)> {
        let mut handled = Vec::new();
        loop {
            let events = self.publisher.drain().await;
            if events.is_empty() {
                return handled;
            }
            for event in events {
                let stage = event.stage();
                let outcome = self
                    .orchestrator
                    .handle(event)
                    .await
                    .expect("Stage should succeed");
                handled.push((stage, outcome));
            }
        }
    }

    /// Publish PriceIngested for the test instrument and run the cycle.
    pub async fn run_cycle(&self) -> Vec<(&'static str, StageOutcome)> {
        self.publisher
            .publish(PipelineEvent::PriceIngested(PriceIngestedJob {
                symbol: SYMBOL.to_string(),
                market: MARKET.to_string(),
            }))
            .await
            .expect("Should publish");
        self.run_until_idle().await
    }
}
