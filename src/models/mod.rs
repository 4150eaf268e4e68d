//! Shared data models spanning the pipeline layers.

pub mod decision;
pub mod indicators;
pub mod price;
pub mod signal;

pub use decision::{Action, Decision, DecisionOrigin, DecisionRequest};
pub use indicators::{
    BollingerBandsIndicator, IndicatorSet, MacdIndicator, StochasticIndicator, TechnicalIndicators,
};
pub use price::{Instrument, PricePoint};
pub use signal::Signal;
