//! Unit tests for the fallback decision chain

use crate::test_utils::{indicators, request, SYMBOL};
use async_trait::async_trait;
use std::sync::Arc;
use tickerwise::decision::error::DecisionError;
use tickerwise::decision::{DecisionSource, FallbackDecisionChain};
use tickerwise::models::decision::{Action, Decision, DecisionOrigin, DecisionRequest};

/// Remote-origin source that answers with a mislabelled decision.
struct MislabelledSource;

#[async_trait]
impl DecisionSource for MislabelledSource {
    fn origin(&self) -> DecisionOrigin {
        DecisionOrigin::Remote
    }

    async fn decide(&self, request: &DecisionRequest) -> Result<Decision, DecisionError> {
        Ok(Decision {
            symbol: request.symbol.clone(),
            action: Action::Buy,
            confidence: 0.9,
            reasons: vec!["Breakout".to_string()],
            source: DecisionOrigin::Rule,
            produced_at: chrono::Utc::now(),
        })
    }
}

#[tokio::test]
async fn test_primary_decision_carries_primary_origin() {
    let chain = FallbackDecisionChain::new(Arc::new(MislabelledSource));
    let decision = chain.decide(&request(indicators(50.0, 0.5, 101.0, 100.0))).await;

    assert_eq!(decision.symbol, SYMBOL);
    assert_eq!(decision.action, Action::Buy);
    assert_eq!(decision.reasons, vec!["Breakout".to_string()]);
    assert_eq!(decision.source, DecisionOrigin::Remote);
}

#[tokio::test]
async fn test_rules_only_chain_yields_rule_origin() {
    let chain = FallbackDecisionChain::rules_only();
    let decision = chain.decide(&request(indicators(25.0, 1.2, 105.0, 100.0))).await;
    assert_eq!(decision.source, DecisionOrigin::Rule);
}
