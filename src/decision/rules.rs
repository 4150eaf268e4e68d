//! Deterministic rule engine used when the remote decision service fails.

use async_trait::async_trait;
use chrono::Utc;

use crate::decision::error::DecisionError;
use crate::decision::source::DecisionSource;
use crate::models::decision::{Action, Decision, DecisionOrigin, DecisionRequest};

pub const FALLBACK_NARRATIVE: &str =
    "Remote decision service unavailable, using rule-based analysis";

pub const RSI_OVERSOLD: f64 = 30.0;
pub const RSI_OVERBOUGHT: f64 = 70.0;

/// Confidence when one side wins the vote.
pub const MAJORITY_CONFIDENCE: f64 = 0.6;
/// Confidence on a tied vote.
pub const TIE_CONFIDENCE: f64 = 0.5;

#[derive(Debug, Default)]
struct Votes {
    bullish: u32,
    bearish: u32,
    reasons: Vec<String>,
}

impl Votes {
    fn bullish(&mut self, reason: &str) {
        self.bullish += 1;
        self.reasons.push(reason.to_string());
    }

    fn bearish(&mut self, reason: &str) {
        self.bearish += 1;
        self.reasons.push(reason.to_string());
    }
}

/// Majority vote over RSI, MACD and the SMA20/SMA50 relation.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleDecisionSource;

impl RuleDecisionSource {
    pub fn new() -> Self {
        Self
    }

    /// Infallible evaluation; the trait impl wraps this in `Ok`.
    pub fn evaluate(&self, request: &DecisionRequest) -> Decision {
        let values = &request.indicators.values;
        let mut votes = Votes {
            reasons: vec![FALLBACK_NARRATIVE.to_string()],
            ..Votes::default()
        };

        if values.rsi < RSI_OVERSOLD {
            votes.bullish("RSI oversold");
        } else if values.rsi > RSI_OVERBOUGHT {
            votes.bearish("RSI overbought");
        }

        if values.macd.macd > 0.0 {
            votes.bullish("MACD positive");
        } else {
            votes.bearish("MACD negative");
        }

        if values.sma_20 > values.sma_50 {
            votes.bullish("SMA20 > SMA50");
        } else {
            votes.bearish("SMA20 <= SMA50");
        }

        let (action, confidence) = if votes.bullish > votes.bearish {
            (Action::Buy, MAJORITY_CONFIDENCE)
        } else if votes.bearish > votes.bullish {
            (Action::Sell, MAJORITY_CONFIDENCE)
        } else {
            (Action::Hold, TIE_CONFIDENCE)
        };

        Decision {
            symbol: request.symbol.clone(),
            action,
            confidence,
            reasons: votes.reasons,
            source: DecisionOrigin::Rule,
            produced_at: Utc::now(),
        }
    }
}

#[async_trait]
impl DecisionSource for RuleDecisionSource {
    fn origin(&self) -> DecisionOrigin {
        DecisionOrigin::Rule
    }

    async fn decide(&self, request: &DecisionRequest) -> Result<Decision, DecisionError> {
        Ok(self.evaluate(request))
    }
}
