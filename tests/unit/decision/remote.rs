//! Unit tests for the remote decision source

use crate::test_utils::{indicators, request, SYMBOL};
use serde_json::json;
use std::time::Duration;
use tickerwise::decision::remote::DecisionResponse;
use tickerwise::decision::{DecisionError, DecisionSource, RemoteDecisionSource};
use tickerwise::models::decision::{Action, DecisionOrigin};
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn response(body: serde_json::Value) -> DecisionResponse {
    serde_json::from_value(body).unwrap()
}

#[test]
fn test_response_converts_to_remote_decision() {
    let req = request(indicators(50.0, 0.1, 100.0, 100.0));
    let decision = response(json!({
        "symbol": SYMBOL,
        "decision": "buy",
        "confidence": 0.82,
        "reasoning": ["Breakout above resistance"],
        "timestamp": "2024-01-01T00:00:00Z"
    }))
    .into_decision(&req)
    .unwrap();

    assert_eq!(decision.action, Action::Buy);
    assert_eq!(decision.source, DecisionOrigin::Remote);
    assert_eq!(decision.confidence, 0.82);
    assert_eq!(decision.reasons, vec!["Breakout above resistance".to_string()]);
}

#[test]
fn test_response_without_reasoning_is_accepted() {
    let req = request(indicators(50.0, 0.1, 100.0, 100.0));
    let decision = response(json!({"symbol": SYMBOL, "decision": "HOLD", "confidence": 0.5}))
        .into_decision(&req)
        .unwrap();
    assert!(decision.reasons.is_empty());
}

#[test]
fn test_response_validation() {
    let req = request(indicators(50.0, 0.1, 100.0, 100.0));
    let cases = [
        json!({"symbol": SYMBOL, "decision": "STRONG_BUY", "confidence": 0.5}),
        json!({"symbol": SYMBOL, "decision": "SELL", "confidence": 1.5}),
        json!({"symbol": SYMBOL, "decision": "SELL", "confidence": -0.1}),
        json!({"symbol": "MSFT", "decision": "SELL", "confidence": 0.5}),
    ];
    for body in cases {
        let result = response(body.clone()).into_decision(&req);
        assert!(
            matches!(result, Err(DecisionError::InvalidResponse(_))),
            "expected invalid response for {}",
            body
        );
    }
}

#[tokio::test]
async fn test_decide_posts_payload() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/decision"))
        .and(body_partial_json(json!({"symbol": SYMBOL, "market": "NASDAQ"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "symbol": SYMBOL,
            "decision": "SELL",
            "confidence": 0.7,
            "reasoning": ["Momentum fading"]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let source = RemoteDecisionSource::new(server.uri()).unwrap();
    let decision = source
        .decide(&request(indicators(50.0, 0.1, 100.0, 100.0)))
        .await
        .unwrap();
    assert_eq!(decision.action, Action::Sell);
    assert_eq!(decision.source, DecisionOrigin::Remote);
}

#[tokio::test]
async fn test_decide_error_status_is_unavailable() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/decision"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let source = RemoteDecisionSource::new(server.uri()).unwrap();
    let result = source.decide(&request(indicators(50.0, 0.1, 100.0, 100.0))).await;
    assert!(matches!(result, Err(DecisionError::Unavailable(_))));
}

#[tokio::test]
async fn test_decide_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/decision"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"symbol": SYMBOL, "decision": "BUY", "confidence": 0.9}))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let source = RemoteDecisionSource::with_timeout(server.uri(), Duration::from_millis(100)).unwrap();
    let result = source.decide(&request(indicators(50.0, 0.1, 100.0, 100.0))).await;
    assert!(matches!(result, Err(DecisionError::Timeout(_))));
    assert!(result.unwrap_err().is_retryable());
}

#[tokio::test]
async fn test_undecodable_body_is_invalid_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/decision"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let source = RemoteDecisionSource::new(server.uri()).unwrap();
    let result = source.decide(&request(indicators(50.0, 0.1, 100.0, 100.0))).await;
    assert!(matches!(result, Err(DecisionError::InvalidResponse(_))));
}

#[tokio::test]
async fn test_health_check() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let source = RemoteDecisionSource::new(format!("{}/", server.uri())).unwrap();
    assert_eq!(source.base_url(), server.uri());
    assert!(source.health_check().await.is_ok());
}
