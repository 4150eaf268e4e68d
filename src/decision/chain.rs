//! Remote-first decision chain with an in-cycle rule fallback.

use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

use crate::decision::rules::RuleDecisionSource;
use crate::decision::source::DecisionSource;
use crate::metrics::Metrics;
use crate::models::decision::{Decision, DecisionRequest};

/// Always yields a decision: the primary source is tried once, and any error
/// is answered by the rule engine in the same call.
pub struct FallbackDecisionChain {
    primary: Option<Arc<dyn DecisionSource>>,
    fallback: RuleDecisionSource,
    metrics: Option<Arc<Metrics>>,
}

impl FallbackDecisionChain {
    pub fn new(primary: Arc<dyn DecisionSource>) -> Self {
        Self {
            primary: Some(primary),
            fallback: RuleDecisionSource::new(),
            metrics: None,
        }
    }

    /// Chain with no remote source; every decision comes from the rules.
    pub fn rules_only() -> Self {
        Self {
            primary: None,
            fallback: RuleDecisionSource::new(),
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub async fn decide(&self, request: &DecisionRequest) -> Decision {
        let Some(primary) = &self.primary else {
            return self.fallback.evaluate(request);
        };

        let start = Instant::now();
        let result = primary.decide(request).await;
        if let Some(ref metrics) = self.metrics {
            metrics
                .decision_duration_seconds
                .observe(start.elapsed().as_secs_f64());
        }

        match result {
            Ok(mut decision) => {
                decision.source = primary.origin();
                debug!(
                    symbol = %request.symbol,
                    source = %decision.source,
                    action = %decision.action,
                    "FallbackDecisionChain: primary source decided"
                );
                decision
            }
            Err(e) => {
                warn!(
                    symbol = %request.symbol,
                    error = %e,
                    "FallbackDecisionChain: primary source failed, using rule-based fallback"
                );
                if let Some(ref metrics) = self.metrics {
                    metrics.decision_fallbacks_total.inc();
                }
                self.fallback.evaluate(request)
            }
        }
    }
}
