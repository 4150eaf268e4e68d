use thiserror::Error;

/// Failure of a decision source. Every variant is retryable and triggers the
/// rule-engine fallback within the same cycle.
#[derive(Debug, Error)]
pub enum DecisionError {
    #[error("decision service unavailable: {0}")]
    Unavailable(String),

    #[error("decision service timed out after {0:?}")]
    Timeout(std::time::Duration),

    #[error("invalid decision response: {0}")]
    InvalidResponse(String),
}

impl DecisionError {
    pub fn is_retryable(&self) -> bool {
        true
    }
}
