//! Unit tests for pipeline event types

use tickerwise::jobs::types::{IndicatorRequestedJob, PipelineEvent, PriceIngestedJob};

#[test]
fn test_stage_names_match_queues() {
    let event: PipelineEvent = PriceIngestedJob {
        symbol: "AAPL".to_string(),
        market: "NASDAQ".to_string(),
    }
    .into();
    assert_eq!(event.stage(), "price-ingested");
    assert_eq!(event.symbol(), "AAPL");
    assert_eq!(event.market(), "NASDAQ");

    let event: PipelineEvent = IndicatorRequestedJob {
        symbol: "AAPL".to_string(),
        market: "NASDAQ".to_string(),
    }
    .into();
    assert_eq!(event.stage(), "indicator-requested");
}

#[test]
fn test_event_serialization_is_tagged() {
    let event = PipelineEvent::PriceIngested(PriceIngestedJob {
        symbol: "AAPL".to_string(),
        market: "NASDAQ".to_string(),
    });
    let value = serde_json::to_value(&event).unwrap();
    assert_eq!(value["type"], "price_ingested");
    assert_eq!(value["symbol"], "AAPL");

    let back: PipelineEvent = serde_json::from_value(value).unwrap();
    assert_eq!(back, event);
}
