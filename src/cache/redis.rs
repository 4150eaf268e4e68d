//! Redis-backed cache. Values are JSON strings written with `SET EX`.

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::warn;

use super::{indicators_key, instrument_keys, price_key, signals_key, CacheError, SignalCache};
use crate::config::CacheTtl;
use crate::models::indicators::IndicatorSet;
use crate::models::price::PricePoint;
use crate::models::signal::Signal;

#[derive(Clone)]
pub struct RedisCache {
    conn: ConnectionManager,
    ttl: CacheTtl,
}

impl RedisCache {
    pub async fn connect(url: &str, ttl: CacheTtl) -> Result<Self, CacheError> {
        let client = redis::Client::open(url)?;
        let conn = client.get_connection_manager().await?;
        Ok(Self { conn, ttl })
    }

    pub async fn ping(&self) -> Result<(), CacheError> {
        let mut conn = self.conn.clone();
        let _: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(())
    }

    async fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, CacheError> {
        let mut conn = self.conn.clone();
        let raw: Option<String> = conn.get(key).await?;
        let Some(raw) = raw else {
            return Ok(None);
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                // Treat unreadable entries as a miss; the store is authoritative.
                warn!(key = %key, error = %e, "RedisCache: dropping undecodable entry");
                Ok(None)
            }
        }
    }

    async fn set_json<T: Serialize + ?Sized>(
        &self,
        key: &str,
        value: &T,
        ttl: Duration,
    ) -> Result<(), CacheError> {
        let data = serde_json::to_string(value)?;
        let mut conn = self.conn.clone();
        let _: () = conn.set_ex(key, data, ttl.as_secs().max(1)).await?;
        Ok(())
    }
}

#[async_trait]
impl SignalCache for RedisCache {
    async fn get_price(&self, symbol: &str) -> Result<Option<PricePoint>, CacheError> {
        self.get_json(&price_key(symbol)).await
    }

    async fn set_price(&self, price: &PricePoint) -> Result<(), CacheError> {
        self.set_json(&price_key(&price.symbol), price, self.ttl.price)
            .await
    }

    async fn get_indicators(&self, symbol: &str) -> Result<Option<IndicatorSet>, CacheError> {
        self.get_json(&indicators_key(symbol)).await
    }

    async fn set_indicators(&self, indicators: &IndicatorSet) -> Result<(), CacheError> {
        self.set_json(
            &indicators_key(&indicators.symbol),
            indicators,
            self.ttl.indicators,
        )
        .await
    }

    async fn get_signals(&self, symbol: &str) -> Result<Option<Vec<Signal>>, CacheError> {
        self.get_json(&signals_key(symbol)).await
    }

    async fn set_signals(&self, symbol: &str, signals: &[Signal]) -> Result<(), CacheError> {
        self.set_json(&signals_key(symbol), signals, self.ttl.signals)
            .await
    }

    async fn invalidate_instrument(&self, symbol: &str) -> Result<(), CacheError> {
        let keys = instrument_keys(symbol);
        let mut conn = self.conn.clone();
        let _: () = conn.del(&keys[..]).await?;
        Ok(())
    }
}
