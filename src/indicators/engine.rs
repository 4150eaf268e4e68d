//! Indicator engine: ordered price window → [`IndicatorSet`].

use crate::indicators::error::IndicatorError;
use crate::indicators::momentum::{
    calculate_macd, calculate_rsi, calculate_stochastic, calculate_williams_r, SignalLineMethod,
};
use crate::indicators::trend::{calculate_ema, calculate_sma};
use crate::indicators::volatility::{calculate_atr, calculate_bollinger_bands};
use crate::indicators::volume::calculate_obv;
use crate::models::indicators::{IndicatorSet, TechnicalIndicators};
use crate::models::price::PricePoint;

/// Minimum window the engine accepts, regardless of configured lookbacks.
pub const MIN_PRICE_POINTS: usize = 50;

/// Lookback periods for every indicator the engine derives.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorConfig {
    pub rsi_period: usize,
    pub sma_short: usize,
    pub sma_long: usize,
    pub ema_fast: usize,
    pub ema_slow: usize,
    pub macd_signal_period: usize,
    pub macd_signal_method: SignalLineMethod,
    pub bollinger_period: usize,
    pub bollinger_std_dev: f64,
    pub stochastic_k: usize,
    pub stochastic_d: usize,
    pub williams_period: usize,
    pub atr_period: usize,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            rsi_period: 14,
            sma_short: 20,
            sma_long: 50,
            ema_fast: 12,
            ema_slow: 26,
            macd_signal_period: 9,
            macd_signal_method: SignalLineMethod::Ema,
            bollinger_period: 20,
            bollinger_std_dev: 2.0,
            stochastic_k: 14,
            stochastic_d: 3,
            williams_period: 14,
            atr_period: 14,
        }
    }
}

impl IndicatorConfig {
    /// Largest lookback among the configured indicators, never below
    /// [`MIN_PRICE_POINTS`].
    pub fn required_points(&self) -> usize {
        [
            MIN_PRICE_POINTS,
            self.rsi_period + 1,
            self.sma_short,
            self.sma_long,
            self.ema_fast,
            self.ema_slow,
            self.bollinger_period,
            (self.stochastic_k + self.stochastic_d).saturating_sub(1),
            self.williams_period,
            self.atr_period + 1,
        ]
        .into_iter()
        .max()
        .unwrap_or(MIN_PRICE_POINTS)
    }
}

/// Stateless indicator calculator. Safe to share across tasks.
#[derive(Debug, Clone, Default)]
pub struct IndicatorEngine {
    config: IndicatorConfig,
}

impl IndicatorEngine {
    pub fn new(config: IndicatorConfig) -> Self {
        Self { config }
    }

    /// Compute every indicator for one instrument.
    ///
    /// The input is copied and sorted by ascending timestamp; the caller's
    /// slice is left untouched. `computed_at` is the timestamp of the newest
    /// observation, so identical windows always produce identical sets.
    pub fn compute(
        &self,
        symbol: &str,
        prices: &[PricePoint],
    ) -> Result<IndicatorSet, IndicatorError> {
        let required = self.config.required_points();
        if prices.len() < required {
            return Err(IndicatorError::InsufficientData {
                required,
                available: prices.len(),
            });
        }

        if let Some(bad) = prices
            .iter()
            .find(|p| ![p.open, p.high, p.low, p.close].iter().all(|v| v.is_finite()))
        {
            return Err(IndicatorError::InvalidPrice(format!(
                "non-finite price for {} at {}",
                bad.symbol, bad.timestamp
            )));
        }

        let mut sorted = prices.to_vec();
        sorted.sort_by_key(|p| p.timestamp);

        let cfg = &self.config;
        let values = TechnicalIndicators {
            rsi: calculate_rsi(&sorted, cfg.rsi_period),
            macd: calculate_macd(
                &sorted,
                cfg.ema_fast,
                cfg.ema_slow,
                cfg.macd_signal_period,
                cfg.macd_signal_method,
            ),
            sma_20: calculate_sma(&sorted, cfg.sma_short),
            sma_50: calculate_sma(&sorted, cfg.sma_long),
            ema_12: calculate_ema(&sorted, cfg.ema_fast),
            ema_26: calculate_ema(&sorted, cfg.ema_slow),
            bollinger: calculate_bollinger_bands(
                &sorted,
                cfg.bollinger_period,
                cfg.bollinger_std_dev,
            ),
            stochastic: calculate_stochastic(&sorted, cfg.stochastic_k, cfg.stochastic_d),
            williams_r: calculate_williams_r(&sorted, cfg.williams_period),
            atr: calculate_atr(&sorted, cfg.atr_period),
            obv: calculate_obv(&sorted),
        };

        let computed_at = sorted[sorted.len() - 1].timestamp;
        Ok(IndicatorSet::new(symbol.to_string(), values, sorted.len()).with_computed_at(computed_at))
    }
}
