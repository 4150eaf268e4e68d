//! MACD (Moving Average Convergence Divergence) indicator

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::common::math;
use crate::indicators::closes;
use crate::models::indicators::MacdIndicator;
use crate::models::price::PricePoint;

/// Scale applied to the MACD line by [`SignalLineMethod::Scaled`].
pub const SCALED_SIGNAL_FACTOR: f64 = 0.8;

/// How the MACD signal line is derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalLineMethod {
    /// EMA of the MACD series.
    #[default]
    Ema,
    /// MACD line scaled by [`SCALED_SIGNAL_FACTOR`].
    Scaled,
}

impl FromStr for SignalLineMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ema" => Ok(SignalLineMethod::Ema),
            "scaled" => Ok(SignalLineMethod::Scaled),
            other => Err(format!("unknown MACD signal line method '{}'", other)),
        }
    }
}

/// Calculate MACD indicator
///
/// MACD = EMA(fast) - EMA(slow), both seeded from the first close.
/// Histogram = MACD - Signal.
pub fn calculate_macd(
    points: &[PricePoint],
    fast_period: usize,
    slow_period: usize,
    signal_period: usize,
    method: SignalLineMethod,
) -> MacdIndicator {
    if points.len() < slow_period {
        return MacdIndicator {
            macd: 0.0,
            signal: 0.0,
            histogram: 0.0,
        };
    }

    let closes = closes(points);
    let fast = math::ema_series(&closes, fast_period);
    let slow = math::ema_series(&closes, slow_period);
    let macd_series: Vec<f64> = fast.iter().zip(&slow).map(|(f, s)| f - s).collect();
    let macd = macd_series.last().copied().unwrap_or(0.0);

    let signal = match method {
        SignalLineMethod::Ema => math::ema_series(&macd_series, signal_period)
            .last()
            .copied()
            .unwrap_or(macd),
        SignalLineMethod::Scaled => macd * SCALED_SIGNAL_FACTOR,
    };

    MacdIndicator {
        macd,
        signal,
        histogram: macd - signal,
    }
}

/// Calculate MACD with default periods (12, 26, 9)
pub fn calculate_macd_default(points: &[PricePoint]) -> MacdIndicator {
    calculate_macd(points, 12, 26, 9, SignalLineMethod::Ema)
}
