//! Event publishing between pipeline stages

use crate::jobs::types::{
    DecisionRequestedJob, IndicatorRequestedJob, PipelineEvent, PriceIngestedJob,
    SignalGeneratedJob, DECISION_REQUESTED_QUEUE, INDICATOR_REQUESTED_QUEUE,
    PRICE_INGESTED_QUEUE, SIGNAL_GENERATED_QUEUE,
};
use apalis::prelude::*;
use apalis_redis::{Config, ConnectionManager, RedisStorage};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::debug;

#[derive(Debug, Error)]
pub enum PublishError {
    #[error("failed to enqueue on {queue}: {message}")]
    Broker { queue: &'static str, message: String },
}

/// Hands a stage event to whatever carries it to the next stage.
#[async_trait]
pub trait EventPublisher: Send + Sync {
    async fn publish(&self, event: PipelineEvent) -> Result<(), PublishError>;
}

/// One apalis Redis storage per stage queue.
#[derive(Clone)]
pub struct ApalisPublisher {
    price_ingested: RedisStorage<PriceIngestedJob>,
    indicator_requested: RedisStorage<IndicatorRequestedJob>,
    decision_requested: RedisStorage<DecisionRequestedJob>,
    signal_generated: RedisStorage<SignalGeneratedJob>,
}

impl ApalisPublisher {
    /// Build the four queue storages on a shared connection.
    pub fn new(conn: ConnectionManager) -> Self {
        Self {
            price_ingested: RedisStorage::new_with_config(
                conn.clone(),
                Config::default().set_namespace(PRICE_INGESTED_QUEUE),
            ),
            indicator_requested: RedisStorage::new_with_config(
                conn.clone(),
                Config::default().set_namespace(INDICATOR_REQUESTED_QUEUE),
            ),
            decision_requested: RedisStorage::new_with_config(
                conn.clone(),
                Config::default().set_namespace(DECISION_REQUESTED_QUEUE),
            ),
            signal_generated: RedisStorage::new_with_config(
                conn,
                Config::default().set_namespace(SIGNAL_GENERATED_QUEUE),
            ),
        }
    }

    pub fn price_ingested_storage(&self) -> RedisStorage<PriceIngestedJob> {
        self.price_ingested.clone()
    }

    pub fn indicator_requested_storage(&self) -> RedisStorage<IndicatorRequestedJob> {
        self.indicator_requested.clone()
    }

    pub fn decision_requested_storage(&self) -> RedisStorage<DecisionRequestedJob> {
        self.decision_requested.clone()
    }

    pub fn signal_generated_storage(&self) -> RedisStorage<SignalGeneratedJob> {
        self.signal_generated.clone()
    }
}

fn broker_error(queue: &'static str, err: impl std::fmt::Display) -> PublishError {
    PublishError::Broker {
        queue,
        message: err.to_string(),
    }
}

#[async_trait]
impl EventPublisher for ApalisPublisher {
    async fn publish(&self, event: PipelineEvent) -> Result<(), PublishError> {
        let queue = event.stage();
        debug!(queue, symbol = %event.symbol(), "Publishing pipeline event");

        match event {
            PipelineEvent::PriceIngested(job) => {
                let mut storage = self.price_ingested.clone();
                storage.push(job).await.map_err(|e| broker_error(queue, e))?;
            }
            PipelineEvent::IndicatorRequested(job) => {
                let mut storage = self.indicator_requested.clone();
                storage.push(job).await.map_err(|e| broker_error(queue, e))?;
            }
            PipelineEvent::DecisionRequested(job) => {
                let mut storage = self.decision_requested.clone();
                storage.push(job).await.map_err(|e| broker_error(queue, e))?;
            }
            PipelineEvent::SignalGenerated(job) => {
                let mut storage = self.signal_generated.clone();
                storage.push(job).await.map_err(|e| broker_error(queue, e))?;
            }
        }
        Ok(())
    }
}

/// Records published events in order. Used by tests and local runs.
#[derive(Clone, Default)]
pub struct InMemoryPublisher {
    events: Arc<Mutex<Vec<PipelineEvent>>>,
}

impl InMemoryPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything published so far.
    pub async fn events(&self) -> Vec<PipelineEvent> {
        self.events.lock().await.clone()
    }

    /// Take all recorded events, leaving the log empty.
    pub async fn drain(&self) -> Vec<PipelineEvent> {
        std::mem::take(&mut *self.events.lock().await)
    }
}

#[async_trait]
impl EventPublisher for InMemoryPublisher {
    async fn publish(&self, event: PipelineEvent) -> Result<(), PublishError> {
        self.events.lock().await.push(event);
        Ok(())
    }
}
