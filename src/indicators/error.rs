use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum IndicatorError {
    /// Fewer price points than the largest lookback. Expected for new
    /// instruments; the pipeline ends the cycle without a signal.
    #[error("insufficient data: {available} price points available, {required} required")]
    InsufficientData { required: usize, available: usize },

    #[error("invalid price data: {0}")]
    InvalidPrice(String),
}
