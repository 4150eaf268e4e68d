//! Stage coordination for the signal pipeline.
//!
//! Each [`PipelineEvent`] is handled by exactly one stage method. Stages
//! always re-read current state from the store rather than trusting payload
//! freshness, and every write is an append.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::cache::SignalCache;
use crate::config::PipelineConfig;
use crate::db::PriceStore;
use crate::decision::FallbackDecisionChain;
use crate::error::{PipelineError, PipelineResult};
use crate::indicators::{IndicatorEngine, IndicatorError};
use crate::jobs::publisher::EventPublisher;
use crate::jobs::types::{
    DecisionRequestedJob, IndicatorRequestedJob, PipelineEvent, PriceIngestedJob,
    SignalGeneratedJob,
};
use crate::metrics::Metrics;
use crate::models::decision::DecisionRequest;
use crate::models::price::{Instrument, PricePoint};
use crate::models::signal::{derive_strength, Signal};

/// How a stage finished.
#[derive(Debug, Clone, PartialEq)]
pub enum StageOutcome {
    /// The next stage event was published.
    Advanced,
    /// Not enough history yet; the cycle ends without a signal.
    InsufficientData { required: usize, available: usize },
    /// Indicator inputs were unusable; the cycle ends without a signal.
    InvalidPrices(String),
    /// Terminal stage reached.
    Completed,
}

pub struct Orchestrator {
    store: Arc<dyn PriceStore>,
    cache: Arc<dyn SignalCache>,
    chain: Arc<FallbackDecisionChain>,
    publisher: Arc<dyn EventPublisher>,
    engine: IndicatorEngine,
    config: PipelineConfig,
    metrics: Option<Arc<Metrics>>,
}

impl Orchestrator {
    pub fn new(
        store: Arc<dyn PriceStore>,
        cache: Arc<dyn SignalCache>,
        chain: Arc<FallbackDecisionChain>,
        publisher: Arc<dyn EventPublisher>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            store,
            cache,
            chain,
            publisher,
            engine: IndicatorEngine::new(config.indicators.clone()),
            config,
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Store a new observation and start a cycle for its instrument.
    pub async fn record_price(&self, price: &PricePoint) -> PipelineResult<()> {
        self.validate(&price.symbol, &price.market).await?;
        self.store.append_price(price).await?;
        self.publisher
            .publish(
                PriceIngestedJob {
                    symbol: price.symbol.clone(),
                    market: price.market.clone(),
                }
                .into(),
            )
            .await?;
        Ok(())
    }

    /// Run the stage for one event.
    pub async fn handle(&self, event: PipelineEvent) -> PipelineResult<StageOutcome> {
        if let Some(ref metrics) = self.metrics {
            metrics
                .stage_events_total
                .with_label_values(&[event.stage()])
                .inc();
        }

        match event {
            PipelineEvent::PriceIngested(job) => self.on_price_ingested(job).await,
            PipelineEvent::IndicatorRequested(job) => self.on_indicator_requested(job).await,
            PipelineEvent::DecisionRequested(job) => self.on_decision_requested(job).await,
            PipelineEvent::SignalGenerated(job) => self.on_signal_generated(job).await,
        }
    }

    async fn validate(&self, symbol: &str, market: &str) -> PipelineResult<Instrument> {
        if symbol.trim().is_empty() {
            return Err(PipelineError::MalformedEvent("empty symbol".to_string()));
        }
        let instrument = self.store.find_instrument(symbol).await?.ok_or_else(|| {
            PipelineError::MalformedEvent(format!("unknown instrument {}", symbol))
        })?;
        if instrument.market != market {
            return Err(PipelineError::MalformedEvent(format!(
                "market mismatch for {}: event {}, instrument {}",
                symbol, market, instrument.market
            )));
        }
        Ok(instrument)
    }

    async fn on_price_ingested(&self, job: PriceIngestedJob) -> PipelineResult<StageOutcome> {
        self.validate(&job.symbol, &job.market).await?;

        self.cache.invalidate_instrument(&job.symbol).await?;
        debug!(symbol = %job.symbol, "PriceIngested: cache invalidated");

        self.publisher
            .publish(
                IndicatorRequestedJob {
                    symbol: job.symbol,
                    market: job.market,
                }
                .into(),
            )
            .await?;
        Ok(StageOutcome::Advanced)
    }

    async fn on_indicator_requested(
        &self,
        job: IndicatorRequestedJob,
    ) -> PipelineResult<StageOutcome> {
        self.validate(&job.symbol, &job.market).await?;

        let window = self.config.effective_price_window();
        let prices = self.store.recent_prices(&job.symbol, window).await?;

        let indicators = match self.engine.compute(&job.symbol, &prices) {
            Ok(indicators) => indicators,
            Err(IndicatorError::InsufficientData { required, available }) => {
                info!(
                    symbol = %job.symbol,
                    required,
                    available,
                    "IndicatorRequested: insufficient price history for {} ({} < {})",
                    job.symbol,
                    available,
                    required
                );
                if let Some(ref metrics) = self.metrics {
                    metrics.insufficient_data_total.inc();
                }
                return Ok(StageOutcome::InsufficientData { required, available });
            }
            Err(IndicatorError::InvalidPrice(reason)) => {
                warn!(symbol = %job.symbol, reason = %reason, "IndicatorRequested: unusable prices");
                return Ok(StageOutcome::InvalidPrices(reason));
            }
        };

        self.store.append_indicators(&indicators).await?;
        self.cache.set_indicators(&indicators).await?;
        debug!(
            symbol = %job.symbol,
            data_points = indicators.data_points,
            rsi = indicators.values.rsi,
            "IndicatorRequested: indicators computed for {}",
            job.symbol
        );

        self.publisher
            .publish(
                DecisionRequestedJob {
                    symbol: job.symbol,
                    market: job.market,
                    indicators,
                }
                .into(),
            )
            .await?;
        Ok(StageOutcome::Advanced)
    }

    async fn on_decision_requested(
        &self,
        job: DecisionRequestedJob,
    ) -> PipelineResult<StageOutcome> {
        self.validate(&job.symbol, &job.market).await?;
        if job.indicators.symbol != job.symbol {
            return Err(PipelineError::MalformedEvent(format!(
                "indicator snapshot for {} attached to {}",
                job.indicators.symbol, job.symbol
            )));
        }

        let price = self.latest_price(&job.symbol).await?.ok_or_else(|| {
            PipelineError::MalformedEvent(format!("no price recorded for {}", job.symbol))
        })?;

        let request = DecisionRequest::new(price, job.indicators.clone())
            .with_metadata("data_points", job.indicators.data_points)
            .with_metadata("timestamp", job.indicators.computed_at.to_rfc3339())
            .with_metadata("worker", self.config.worker_name.clone());

        let decision = self.chain.decide(&request).await;
        let strength = derive_strength(&decision, &job.indicators.values);
        let signal = Signal::from_decision(decision, job.market.clone(), strength);

        self.store.append_signal(&signal).await?;
        let recent = self
            .store
            .recent_signals(&job.symbol, self.config.recent_signals)
            .await?;
        self.cache.set_signals(&job.symbol, &recent).await?;

        if let Some(ref metrics) = self.metrics {
            metrics
                .signals_total
                .with_label_values(&[signal.source.as_str()])
                .inc();
        }

        self.publisher
            .publish(
                SignalGeneratedJob {
                    symbol: job.symbol,
                    market: job.market,
                    signal,
                }
                .into(),
            )
            .await?;
        Ok(StageOutcome::Advanced)
    }

    async fn on_signal_generated(&self, job: SignalGeneratedJob) -> PipelineResult<StageOutcome> {
        self.validate(&job.symbol, &job.market).await?;

        let confidence_pct = (job.signal.confidence * 10000.0).round() / 100.0;
        info!(
            symbol = %job.symbol,
            action = %job.signal.action,
            source = %job.signal.source,
            strength = job.signal.strength,
            confidence = confidence_pct,
            "SignalGenerated: {} {} from {} (confidence: {:.2}%)",
            job.symbol,
            job.signal.action,
            job.signal.source,
            confidence_pct
        );
        Ok(StageOutcome::Completed)
    }

    /// Latest price, served from the cache when present.
    pub async fn latest_price(&self, symbol: &str) -> PipelineResult<Option<PricePoint>> {
        match self.cache.get_price(symbol).await {
            Ok(Some(price)) => return Ok(Some(price)),
            Ok(None) => {}
            Err(e) => warn!(symbol = %symbol, error = %e, "Price cache read failed, using store"),
        }

        let price = self.store.latest_price(symbol).await?;
        if let Some(ref p) = price {
            self.cache.set_price(p).await?;
        }
        Ok(price)
    }

    /// Newest-first signal history, served from the cache when present.
    pub async fn recent_signals(&self, symbol: &str) -> PipelineResult<Vec<Signal>> {
        match self.cache.get_signals(symbol).await {
            Ok(Some(signals)) => return Ok(signals),
            Ok(None) => {}
            Err(e) => warn!(symbol = %symbol, error = %e, "Signal cache read failed, using store"),
        }

        let signals = self
            .store
            .recent_signals(symbol, self.config.recent_signals)
            .await?;
        self.cache.set_signals(symbol, &signals).await?;
        Ok(signals)
    }

    /// Publish an indicator refresh for every active instrument.
    pub async fn refresh_active(&self) -> PipelineResult<usize> {
        let instruments = self.store.active_instruments().await?;
        for instrument in &instruments {
            self.publisher
                .publish(
                    IndicatorRequestedJob {
                        symbol: instrument.symbol.clone(),
                        market: instrument.market.clone(),
                    }
                    .into(),
                )
                .await?;
        }
        Ok(instruments.len())
    }

    /// Drop price and indicator history older than the configured retention.
    ///
    /// Returns the cutoff used, or `None` when the retention window reaches
    /// past the earliest representable time and nothing can be old enough.
    pub async fn prune_history(
        &self,
        now: DateTime<Utc>,
    ) -> PipelineResult<Option<DateTime<Utc>>> {
        let retention = chrono::Duration::days(i64::from(self.config.retention_days));
        let Some(cutoff) = now.checked_sub_signed(retention) else {
            warn!(
                retention_days = self.config.retention_days,
                "Retention window exceeds representable time, skipping prune"
            );
            return Ok(None);
        };
        self.store.prune_history(cutoff).await?;
        info!(cutoff = %cutoff, "Pruned history older than {}", cutoff);
        Ok(Some(cutoff))
    }
}
