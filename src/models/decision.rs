use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::indicators::IndicatorSet;
use super::price::PricePoint;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Action {
    Buy,
    Sell,
    Hold,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Buy => "BUY",
            Action::Sell => "SELL",
            Action::Hold => "HOLD",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "BUY" => Ok(Action::Buy),
            "SELL" => Ok(Action::Sell),
            "HOLD" => Ok(Action::Hold),
            other => Err(format!("unknown action '{}'", other)),
        }
    }
}

/// Which decision source produced a decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DecisionOrigin {
    Remote,
    Rule,
}

impl DecisionOrigin {
    pub fn as_str(&self) -> &'static str {
        match self {
            DecisionOrigin::Remote => "REMOTE",
            DecisionOrigin::Rule => "RULE",
        }
    }
}

impl fmt::Display for DecisionOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DecisionOrigin {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "REMOTE" => Ok(DecisionOrigin::Remote),
            "RULE" => Ok(DecisionOrigin::Rule),
            other => Err(format!("unknown decision origin '{}'", other)),
        }
    }
}

/// Input handed to a decision source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionRequest {
    pub symbol: String,
    pub market: String,
    pub price: PricePoint,
    pub indicators: IndicatorSet,
    #[serde(default)]
    pub metadata: serde_json::Map<String, serde_json::Value>,
}

impl DecisionRequest {
    pub fn new(price: PricePoint, indicators: IndicatorSet) -> Self {
        Self {
            symbol: price.symbol.clone(),
            market: price.market.clone(),
            price,
            indicators,
            metadata: serde_json::Map::new(),
        }
    }

    pub fn with_metadata(mut self, key: &str, value: impl Into<serde_json::Value>) -> Self {
        self.metadata.insert(key.to_string(), value.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    pub symbol: String,
    pub action: Action,
    pub confidence: f64,
    pub reasons: Vec<String>,
    pub source: DecisionOrigin,
    pub produced_at: DateTime<Utc>,
}
