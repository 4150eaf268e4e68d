//! Pipeline error taxonomy.

use thiserror::Error;

use crate::cache::CacheError;
use crate::db::StoreError;
use crate::jobs::publisher::PublishError;

/// Errors surfaced by a pipeline stage.
///
/// Insufficient data and decision-service failures never appear here: the
/// former ends a cycle normally and the latter is absorbed by the fallback
/// chain.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("cache error: {0}")]
    Cache(#[from] CacheError),

    #[error("publish error: {0}")]
    Publish(#[from] PublishError),

    #[error("malformed event: {0}")]
    MalformedEvent(String),
}

impl PipelineError {
    /// Retryable errors are returned to the broker for redelivery; the rest
    /// are logged and acknowledged.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, PipelineError::MalformedEvent(_))
    }
}

pub type PipelineResult<T> = Result<T, PipelineError>;
