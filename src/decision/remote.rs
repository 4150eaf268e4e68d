//! HTTP client for the external decision service.

use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::debug;

use crate::decision::error::DecisionError;
use crate::decision::source::DecisionSource;
use crate::models::decision::{Action, Decision, DecisionOrigin, DecisionRequest};
use crate::models::price::PricePoint;

pub const DEFAULT_DECISION_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Serialize)]
struct DecisionPayload<'a> {
    symbol: &'a str,
    market: &'a str,
    price: &'a PricePoint,
    indicators: BTreeMap<String, f64>,
    metadata: &'a serde_json::Map<String, serde_json::Value>,
}

/// Body returned by `POST /api/v1/decision`.
#[derive(Debug, Clone, Deserialize)]
pub struct DecisionResponse {
    pub symbol: String,
    pub decision: String,
    pub confidence: f64,
    #[serde(default)]
    pub reasoning: Vec<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

impl DecisionResponse {
    /// Validate the response against the request and convert it.
    ///
    /// `produced_at` is stamped locally so signal order per instrument never
    /// depends on the remote clock.
    pub fn into_decision(self, request: &DecisionRequest) -> Result<Decision, DecisionError> {
        if self.symbol != request.symbol {
            return Err(DecisionError::InvalidResponse(format!(
                "response for '{}' does not match request for '{}'",
                self.symbol, request.symbol
            )));
        }

        let action: Action = self
            .decision
            .parse()
            .map_err(DecisionError::InvalidResponse)?;

        if !(0.0..=1.0).contains(&self.confidence) {
            return Err(DecisionError::InvalidResponse(format!(
                "confidence {} outside [0, 1]",
                self.confidence
            )));
        }

        Ok(Decision {
            symbol: request.symbol.clone(),
            action,
            confidence: self.confidence,
            reasons: self.reasoning,
            source: DecisionOrigin::Remote,
            produced_at: Utc::now(),
        })
    }
}

pub struct RemoteDecisionSource {
    base_url: String,
    client: reqwest::Client,
    timeout: Duration,
}

impl RemoteDecisionSource {
    pub fn new(base_url: impl Into<String>) -> Result<Self, DecisionError> {
        Self::with_timeout(base_url, DEFAULT_DECISION_TIMEOUT)
    }

    pub fn with_timeout(
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, DecisionError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DecisionError::Unavailable(format!("failed to build client: {}", e)))?;
        Ok(Self::with_client(base_url, client, timeout))
    }

    /// Use a pre-built client. `timeout` is only reported in errors; the client
    /// is expected to enforce it.
    pub fn with_client(base_url: impl Into<String>, client: reqwest::Client, timeout: Duration) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
            timeout,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn map_transport_error(&self, error: reqwest::Error) -> DecisionError {
        if error.is_timeout() {
            DecisionError::Timeout(self.timeout)
        } else {
            DecisionError::Unavailable(error.to_string())
        }
    }

    pub async fn health_check(&self) -> Result<(), DecisionError> {
        let url = format!("{}/health", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        if !response.status().is_success() {
            return Err(DecisionError::Unavailable(format!(
                "health check failed with status {}",
                response.status()
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl DecisionSource for RemoteDecisionSource {
    fn origin(&self) -> DecisionOrigin {
        DecisionOrigin::Remote
    }

    async fn decide(&self, request: &DecisionRequest) -> Result<Decision, DecisionError> {
        let url = format!("{}/api/v1/decision", self.base_url);
        let payload = DecisionPayload {
            symbol: &request.symbol,
            market: &request.market,
            price: &request.price,
            indicators: request.indicators.values.to_map(),
            metadata: &request.metadata,
        };

        debug!(symbol = %request.symbol, url = %url, "RemoteDecisionSource: requesting decision");

        let response = self
            .client
            .post(&url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DecisionError::Unavailable(format!(
                "decision service returned status {}",
                status
            )));
        }

        let body: DecisionResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                DecisionError::Timeout(self.timeout)
            } else {
                DecisionError::InvalidResponse(format!("failed to decode response: {}", e))
            }
        })?;

        body.into_decision(request)
    }
}
