use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One OHLCV observation for an instrument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub symbol: String,
    pub market: String,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
    pub trade_amount: u64,
    pub timestamp: DateTime<Utc>,
}

impl PricePoint {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        symbol: impl Into<String>,
        market: impl Into<String>,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: u64,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            market: market.into(),
            open,
            high,
            low,
            close,
            volume,
            trade_amount: 0,
            timestamp,
        }
    }
}

/// A tracked instrument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instrument {
    pub symbol: String,
    pub market: String,
    #[serde(default)]
    pub name: String,
    pub active: bool,
}

impl Instrument {
    pub fn new(symbol: impl Into<String>, market: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            market: market.into(),
            name: String::new(),
            active: true,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }
}
