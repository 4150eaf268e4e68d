//! Price/indicator/signal store port and its adapters.

pub mod memory;
pub mod questdb;

pub use memory::InMemoryStore;
pub use questdb::QuestDatabase;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::models::indicators::IndicatorSet;
use crate::models::price::{Instrument, PricePoint};
use crate::models::signal::Signal;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] tokio_postgres::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("store not connected")]
    NotConnected,

    #[error("invalid row: {0}")]
    InvalidRow(String),
}

/// Source of truth for the pipeline. Writes are appends keyed by
/// (instrument, timestamp); nothing is updated in place.
#[async_trait]
pub trait PriceStore: Send + Sync {
    async fn find_instrument(&self, symbol: &str) -> Result<Option<Instrument>, StoreError>;

    async fn active_instruments(&self) -> Result<Vec<Instrument>, StoreError>;

    async fn add_instrument(&self, instrument: &Instrument) -> Result<(), StoreError>;

    /// Up to `limit` most recent prices, ordered oldest first.
    async fn recent_prices(&self, symbol: &str, limit: usize)
        -> Result<Vec<PricePoint>, StoreError>;

    async fn latest_price(&self, symbol: &str) -> Result<Option<PricePoint>, StoreError>;

    /// Append a price. A second write for the same (symbol, timestamp) keeps
    /// the row already stored.
    async fn append_price(&self, price: &PricePoint) -> Result<(), StoreError>;

    async fn append_indicators(&self, indicators: &IndicatorSet) -> Result<(), StoreError>;

    async fn append_signal(&self, signal: &Signal) -> Result<(), StoreError>;

    /// Up to `limit` most recent signals, newest first.
    async fn recent_signals(&self, symbol: &str, limit: usize) -> Result<Vec<Signal>, StoreError>;

    /// Drop price and indicator history older than `cutoff`. Signals are kept.
    async fn prune_history(&self, cutoff: DateTime<Utc>) -> Result<(), StoreError>;
}
