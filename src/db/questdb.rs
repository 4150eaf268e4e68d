//! QuestDB store for instruments, prices, indicator history and signals

use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio_postgres::{Client, NoTls, Row};

use super::{PriceStore, StoreError};
use crate::models::decision::{Action, DecisionOrigin};
use crate::models::indicators::IndicatorSet;
use crate::models::price::{Instrument, PricePoint};
use crate::models::signal::Signal;

// Every table bypasses WAL: stages read back what they just wrote.
const SCHEMA: [&str; 4] = [
    "CREATE TABLE IF NOT EXISTS instruments (
        created_at TIMESTAMP,
        symbol SYMBOL,
        market SYMBOL,
        name STRING,
        active BOOLEAN
    ) TIMESTAMP(created_at) PARTITION BY YEAR BYPASS WAL",
    // Without WAL there is no DEDUP; duplicate (timestamp, symbol) rows are
    // collapsed on read.
    "CREATE TABLE IF NOT EXISTS prices (
        timestamp TIMESTAMP,
        symbol SYMBOL,
        market SYMBOL,
        open DOUBLE,
        high DOUBLE,
        low DOUBLE,
        close DOUBLE,
        volume LONG,
        trade_amount LONG
    ) TIMESTAMP(timestamp) PARTITION BY MONTH BYPASS WAL",
    "CREATE TABLE IF NOT EXISTS indicators (
        timestamp TIMESTAMP,
        symbol SYMBOL,
        indicator_name SYMBOL,
        value DOUBLE,
        data_points INT
    ) TIMESTAMP(timestamp) PARTITION BY MONTH BYPASS WAL",
    "CREATE TABLE IF NOT EXISTS signals (
        timestamp TIMESTAMP,
        symbol SYMBOL,
        market SYMBOL,
        action SYMBOL,
        strength DOUBLE,
        confidence DOUBLE,
        source SYMBOL,
        reasons_json STRING
    ) TIMESTAMP(timestamp) PARTITION BY DAY BYPASS WAL",
];

/// QuestDB timestamp literal for DDL statements, which take no parameters.
pub fn timestamp_literal(ts: DateTime<Utc>) -> String {
    ts.format("%Y-%m-%dT%H:%M:%S%.6fZ").to_string()
}

/// Keep the first row for each timestamp of an oldest-first series.
pub fn collapse_duplicate_timestamps(prices: Vec<PricePoint>) -> Vec<PricePoint> {
    let mut collapsed: Vec<PricePoint> = Vec::with_capacity(prices.len());
    for price in prices {
        if collapsed
            .last()
            .is_some_and(|last| last.timestamp == price.timestamp)
        {
            continue;
        }
        collapsed.push(price);
    }
    collapsed
}

fn to_utc(naive: NaiveDateTime) -> DateTime<Utc> {
    DateTime::from_naive_utc_and_offset(naive, Utc)
}

fn price_from_row(row: &Row) -> Result<PricePoint, StoreError> {
    let timestamp: NaiveDateTime = row.try_get(0)?;
    let volume: i64 = row.try_get(7)?;
    let trade_amount: Option<i64> = row.try_get(8)?;
    Ok(PricePoint {
        symbol: row.try_get(1)?,
        market: row.try_get(2)?,
        open: row.try_get(3)?,
        high: row.try_get(4)?,
        low: row.try_get(5)?,
        close: row.try_get(6)?,
        volume: volume.max(0) as u64,
        trade_amount: trade_amount.unwrap_or(0).max(0) as u64,
        timestamp: to_utc(timestamp),
    })
}

fn signal_from_row(row: &Row) -> Result<Signal, StoreError> {
    let timestamp: NaiveDateTime = row.try_get(0)?;
    let action: String = row.try_get(3)?;
    let source: String = row.try_get(6)?;
    let reasons_json: String = row.try_get(7)?;
    Ok(Signal {
        symbol: row.try_get(1)?,
        market: row.try_get(2)?,
        action: action.parse::<Action>().map_err(StoreError::InvalidRow)?,
        strength: row.try_get(4)?,
        confidence: row.try_get(5)?,
        source: source
            .parse::<DecisionOrigin>()
            .map_err(StoreError::InvalidRow)?,
        reasons: serde_json::from_str(&reasons_json)?,
        produced_at: to_utc(timestamp),
    })
}

pub struct QuestDatabase {
    client: Arc<RwLock<Option<Client>>>,
}

impl QuestDatabase {
    pub async fn connect(url: &str) -> Result<Self, StoreError> {
        let (client, connection) = tokio_postgres::connect(url, NoTls).await?;

        // Spawn connection task
        tokio::spawn(async move {
            if let Err(e) = connection.await {
                tracing::error!(error = %e, "QuestDB connection error");
            }
        });

        let db = Self {
            client: Arc::new(RwLock::new(Some(client))),
        };
        db.init_schema().await?;
        Ok(db)
    }

    async fn init_schema(&self) -> Result<(), StoreError> {
        let client = self.client.read().await;
        let c = client.as_ref().ok_or(StoreError::NotConnected)?;
        for statement in SCHEMA {
            c.execute(statement, &[]).await?;
        }
        Ok(())
    }

    /// False once the connection task has ended.
    pub async fn is_available(&self) -> bool {
        let client = self.client.read().await;
        client.as_ref().is_some_and(|c| !c.is_closed())
    }
}

#[async_trait]
impl PriceStore for QuestDatabase {
    async fn find_instrument(&self, symbol: &str) -> Result<Option<Instrument>, StoreError> {
        let client = self.client.read().await;
        let c = client.as_ref().ok_or(StoreError::NotConnected)?;
        let rows = c
            .query(
                "SELECT symbol, market, name, active FROM instruments
                 WHERE symbol = $1
                 LATEST ON created_at PARTITION BY symbol",
                &[&symbol],
            )
            .await?;

        rows.first()
            .map(|row| {
                let name: Option<String> = row.try_get(2)?;
                Ok(Instrument {
                    symbol: row.try_get(0)?,
                    market: row.try_get(1)?,
                    name: name.unwrap_or_default(),
                    active: row.try_get(3)?,
                })
            })
            .transpose()
    }

    async fn active_instruments(&self) -> Result<Vec<Instrument>, StoreError> {
        let client = self.client.read().await;
        let c = client.as_ref().ok_or(StoreError::NotConnected)?;
        let rows = c
            .query(
                "SELECT symbol, market, name, active FROM instruments
                 LATEST ON created_at PARTITION BY symbol",
                &[],
            )
            .await?;

        let mut instruments = Vec::with_capacity(rows.len());
        for row in rows {
            let active: bool = row.try_get(3)?;
            if !active {
                continue;
            }
            let name: Option<String> = row.try_get(2)?;
            instruments.push(Instrument {
                symbol: row.try_get(0)?,
                market: row.try_get(1)?,
                name: name.unwrap_or_default(),
                active,
            });
        }
        instruments.sort_by(|a, b| a.symbol.cmp(&b.symbol));
        Ok(instruments)
    }

    async fn add_instrument(&self, instrument: &Instrument) -> Result<(), StoreError> {
        let client = self.client.read().await;
        let c = client.as_ref().ok_or(StoreError::NotConnected)?;
        c.execute(
            "INSERT INTO instruments (created_at, symbol, market, name, active)
             VALUES ($1, $2, $3, $4, $5)",
            &[
                &Utc::now().naive_utc(),
                &instrument.symbol,
                &instrument.market,
                &instrument.name,
                &instrument.active,
            ],
        )
        .await?;
        Ok(())
    }

    async fn recent_prices(
        &self,
        symbol: &str,
        limit: usize,
    ) -> Result<Vec<PricePoint>, StoreError> {
        let client = self.client.read().await;
        let c = client.as_ref().ok_or(StoreError::NotConnected)?;
        // Over-fetch so replayed duplicates do not shrink the window.
        let query = format!(
            "SELECT timestamp, symbol, market, open, high, low, close, volume, trade_amount
             FROM prices
             WHERE symbol = $1
             ORDER BY timestamp DESC
             LIMIT {}",
            limit.saturating_mul(2)
        );
        let rows = c.query(&query, &[&symbol]).await?;

        let mut prices = rows
            .iter()
            .map(price_from_row)
            .collect::<Result<Vec<_>, _>>()?;
        // Reverse to get oldest first
        prices.reverse();
        let mut prices = collapse_duplicate_timestamps(prices);
        let excess = prices.len().saturating_sub(limit);
        prices.drain(..excess);
        Ok(prices)
    }

    async fn latest_price(&self, symbol: &str) -> Result<Option<PricePoint>, StoreError> {
        Ok(self.recent_prices(symbol, 1).await?.pop())
    }

    async fn append_price(&self, price: &PricePoint) -> Result<(), StoreError> {
        let client = self.client.read().await;
        let c = client.as_ref().ok_or(StoreError::NotConnected)?;
        c.execute(
            "INSERT INTO prices (timestamp, symbol, market, open, high, low, close, volume, trade_amount)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
            &[
                &price.timestamp.naive_utc(),
                &price.symbol,
                &price.market,
                &price.open,
                &price.high,
                &price.low,
                &price.close,
                &(price.volume as i64),
                &(price.trade_amount as i64),
            ],
        )
        .await?;
        Ok(())
    }

    async fn append_indicators(&self, indicators: &IndicatorSet) -> Result<(), StoreError> {
        let client = self.client.read().await;
        let c = client.as_ref().ok_or(StoreError::NotConnected)?;
        let timestamp = indicators.computed_at.naive_utc();
        let data_points = indicators.data_points as i32;
        for (name, value) in indicators.values.to_map() {
            c.execute(
                "INSERT INTO indicators (timestamp, symbol, indicator_name, value, data_points)
                 VALUES ($1, $2, $3, $4, $5)",
                &[&timestamp, &indicators.symbol, &name, &value, &data_points],
            )
            .await?;
        }
        Ok(())
    }

    async fn append_signal(&self, signal: &Signal) -> Result<(), StoreError> {
        let client = self.client.read().await;
        let c = client.as_ref().ok_or(StoreError::NotConnected)?;
        let reasons_json = serde_json::to_string(&signal.reasons)?;
        c.execute(
            "INSERT INTO signals (timestamp, symbol, market, action, strength, confidence, source, reasons_json)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
            &[
                &signal.produced_at.naive_utc(),
                &signal.symbol,
                &signal.market,
                &signal.action.as_str(),
                &signal.strength,
                &signal.confidence,
                &signal.source.as_str(),
                &reasons_json,
            ],
        )
        .await?;
        Ok(())
    }

    async fn recent_signals(&self, symbol: &str, limit: usize) -> Result<Vec<Signal>, StoreError> {
        let client = self.client.read().await;
        let c = client.as_ref().ok_or(StoreError::NotConnected)?;
        let query = format!(
            "SELECT timestamp, symbol, market, action, strength, confidence, source, reasons_json
             FROM signals
             WHERE symbol = $1
             ORDER BY timestamp DESC
             LIMIT {}",
            limit
        );
        let rows = c.query(&query, &[&symbol]).await?;
        rows.iter().map(signal_from_row).collect()
    }

    async fn prune_history(&self, cutoff: DateTime<Utc>) -> Result<(), StoreError> {
        let client = self.client.read().await;
        let c = client.as_ref().ok_or(StoreError::NotConnected)?;
        let literal = timestamp_literal(cutoff);
        for table in ["prices", "indicators"] {
            c.batch_execute(&format!(
                "ALTER TABLE {} DROP PARTITION WHERE timestamp < '{}'",
                table, literal
            ))
            .await?;
        }
        Ok(())
    }
}
