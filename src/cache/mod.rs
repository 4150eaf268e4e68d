//! Advisory cache for the latest price, indicators and recent signals.
//!
//! Entries expire on independent TTLs and are dropped for an instrument as
//! soon as a new price is ingested. Every reader must fall back to the store
//! on a miss.

pub mod memory;
pub mod redis;

pub use self::memory::InMemoryCache;
pub use self::redis::RedisCache;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::indicators::IndicatorSet;
use crate::models::price::PricePoint;
use crate::models::signal::Signal;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("redis error: {0}")]
    Redis(#[from] ::redis::RedisError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub fn price_key(symbol: &str) -> String {
    format!("price:{}", symbol)
}

pub fn indicators_key(symbol: &str) -> String {
    format!("indicators:{}", symbol)
}

pub fn signals_key(symbol: &str) -> String {
    format!("signals:{}", symbol)
}

/// Every key held for one instrument.
pub fn instrument_keys(symbol: &str) -> [String; 3] {
    [price_key(symbol), indicators_key(symbol), signals_key(symbol)]
}

#[async_trait]
pub trait SignalCache: Send + Sync {
    async fn get_price(&self, symbol: &str) -> Result<Option<PricePoint>, CacheError>;
    async fn set_price(&self, price: &PricePoint) -> Result<(), CacheError>;

    async fn get_indicators(&self, symbol: &str) -> Result<Option<IndicatorSet>, CacheError>;
    async fn set_indicators(&self, indicators: &IndicatorSet) -> Result<(), CacheError>;

    /// Recent signals, newest first.
    async fn get_signals(&self, symbol: &str) -> Result<Option<Vec<Signal>>, CacheError>;
    async fn set_signals(&self, symbol: &str, signals: &[Signal]) -> Result<(), CacheError>;

    /// Drop every entry held for the instrument.
    async fn invalidate_instrument(&self, symbol: &str) -> Result<(), CacheError>;
}
