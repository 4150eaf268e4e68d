//! Momentum indicators: RSI, MACD, Stochastic, Williams %R

pub mod macd;
pub mod rsi;
pub mod stochastic;
pub mod williams;

pub use macd::*;
pub use rsi::*;
pub use stochastic::*;
pub use williams::*;
