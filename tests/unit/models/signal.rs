//! Unit tests for signal projection and strength derivation

use crate::test_utils::{base_time, indicators, MARKET, SYMBOL};
use tickerwise::models::decision::{Action, Decision, DecisionOrigin};
use tickerwise::models::indicators::BollingerBandsIndicator;
use tickerwise::models::signal::{derive_strength, Signal};

fn decision(source: DecisionOrigin, confidence: f64) -> Decision {
    Decision {
        symbol: SYMBOL.to_string(),
        action: Action::Buy,
        confidence,
        reasons: vec!["test".to_string()],
        source,
        produced_at: base_time(),
    }
}

#[test]
fn test_rule_strength_is_discounted() {
    let values = indicators(50.0, 0.0, 100.0, 100.0);
    let strength = derive_strength(&decision(DecisionOrigin::Rule, 0.6), &values);
    assert!((strength - 0.48).abs() < 1e-12);
}

#[test]
fn test_remote_strength_bonuses() {
    let mut values = indicators(50.0, 0.0, 100.0, 100.0);
    let remote = decision(DecisionOrigin::Remote, 0.5);
    assert_eq!(derive_strength(&remote, &values), 0.5);

    values.bollinger = BollingerBandsIndicator {
        upper: 110.0,
        middle: 100.0,
        lower: 90.0,
    };
    assert!((derive_strength(&remote, &values) - 0.6).abs() < 1e-12);

    values.atr = 1500.0;
    assert!((derive_strength(&remote, &values) - 0.65).abs() < 1e-12);
}

#[test]
fn test_strength_is_clamped() {
    let mut values = indicators(50.0, 0.0, 100.0, 100.0);
    values.bollinger.upper = 120.0;
    values.atr = 5000.0;
    assert_eq!(derive_strength(&decision(DecisionOrigin::Remote, 0.95), &values), 1.0);
}

#[test]
fn test_signal_from_decision() {
    let signal = Signal::from_decision(decision(DecisionOrigin::Rule, 0.6), MARKET, 0.48);
    assert_eq!(signal.symbol, SYMBOL);
    assert_eq!(signal.market, MARKET);
    assert_eq!(signal.action, Action::Buy);
    assert_eq!(signal.source, DecisionOrigin::Rule);
    assert_eq!(signal.produced_at, base_time());
    assert_eq!(signal.strength, 0.48);
}

#[test]
fn test_action_and_origin_round_trip_as_strings() {
    assert_eq!("sell".parse::<Action>(), Ok(Action::Sell));
    assert_eq!(Action::Hold.to_string(), "HOLD");
    assert_eq!("RULE".parse::<DecisionOrigin>(), Ok(DecisionOrigin::Rule));
    assert!("AI".parse::<DecisionOrigin>().is_err());
    assert_eq!(serde_json::to_string(&Action::Buy).unwrap(), "\"BUY\"");
}
