use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::decision::{Action, Decision, DecisionOrigin};
use super::indicators::TechnicalIndicators;
use crate::common::math::clamp_unit;

/// Rule decisions are discounted against remote ones.
pub const RULE_STRENGTH_FACTOR: f64 = 0.8;
pub const BAND_WIDTH_BONUS: f64 = 0.1;
pub const HIGH_VOLATILITY_ATR: f64 = 1000.0;
pub const HIGH_VOLATILITY_BONUS: f64 = 0.05;

/// Signal strength for a decision, always in `[0, 1]`.
///
/// Rule decisions score `confidence * 0.8`. Remote decisions start from
/// their confidence and gain a bonus for a non-degenerate Bollinger band and
/// another for high volatility.
pub fn derive_strength(decision: &Decision, indicators: &TechnicalIndicators) -> f64 {
    let strength = match decision.source {
        DecisionOrigin::Rule => decision.confidence * RULE_STRENGTH_FACTOR,
        DecisionOrigin::Remote => {
            let mut strength = decision.confidence;
            if indicators.bollinger.width() > 0.0 {
                strength += BAND_WIDTH_BONUS;
            }
            if indicators.atr > HIGH_VOLATILITY_ATR {
                strength += HIGH_VOLATILITY_BONUS;
            }
            strength
        }
    };
    clamp_unit(strength)
}

/// Persisted projection of a [`Decision`]. Rows are append-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    pub symbol: String,
    pub market: String,
    pub action: Action,
    pub strength: f64,
    pub confidence: f64,
    pub reasons: Vec<String>,
    pub source: DecisionOrigin,
    pub produced_at: DateTime<Utc>,
}

impl Signal {
    pub fn from_decision(decision: Decision, market: impl Into<String>, strength: f64) -> Self {
        Self {
            symbol: decision.symbol,
            market: market.into(),
            action: decision.action,
            strength: clamp_unit(strength),
            confidence: clamp_unit(decision.confidence),
            reasons: decision.reasons,
            source: decision.source,
            produced_at: decision.produced_at,
        }
    }
}
