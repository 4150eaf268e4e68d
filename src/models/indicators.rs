use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MacdIndicator {
    pub macd: f64,
    pub signal: f64,
    pub histogram: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BollingerBandsIndicator {
    pub upper: f64,
    pub middle: f64,
    pub lower: f64,
}

impl BollingerBandsIndicator {
    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StochasticIndicator {
    pub k: f64,
    pub d: f64,
}

/// Every indicator the engine derives for one window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TechnicalIndicators {
    pub rsi: f64,
    pub macd: MacdIndicator,
    pub sma_20: f64,
    pub sma_50: f64,
    pub ema_12: f64,
    pub ema_26: f64,
    pub bollinger: BollingerBandsIndicator,
    pub stochastic: StochasticIndicator,
    pub williams_r: f64,
    pub atr: f64,
    pub obv: f64,
}

impl TechnicalIndicators {
    /// Flat `name -> value` projection, used for the decision service payload,
    /// the indicator cache and indicator history rows.
    pub fn to_map(&self) -> BTreeMap<String, f64> {
        [
            ("rsi", self.rsi),
            ("macd", self.macd.macd),
            ("macd_signal", self.macd.signal),
            ("macd_histogram", self.macd.histogram),
            ("sma_20", self.sma_20),
            ("sma_50", self.sma_50),
            ("ema_12", self.ema_12),
            ("ema_26", self.ema_26),
            ("bollinger_upper", self.bollinger.upper),
            ("bollinger_mid", self.bollinger.middle),
            ("bollinger_lower", self.bollinger.lower),
            ("stochastic_k", self.stochastic.k),
            ("stochastic_d", self.stochastic.d),
            ("williams_r", self.williams_r),
            ("atr", self.atr),
            ("obv", self.obv),
        ]
        .into_iter()
        .map(|(name, value)| (name.to_string(), value))
        .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSet {
    pub symbol: String,
    pub values: TechnicalIndicators,
    /// Number of price points the values were derived from.
    pub data_points: usize,
    pub computed_at: DateTime<Utc>,
}

impl IndicatorSet {
    pub fn new(symbol: String, values: TechnicalIndicators, data_points: usize) -> Self {
        Self {
            symbol,
            values,
            data_points,
            computed_at: Utc::now(),
        }
    }

    pub fn with_computed_at(mut self, computed_at: DateTime<Utc>) -> Self {
        self.computed_at = computed_at;
        self
    }
}
