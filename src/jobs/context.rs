//! Job context for dependency injection

use crate::core::orchestrator::Orchestrator;
use crate::metrics::Metrics;
use std::sync::Arc;

/// Context passed to job handlers via Apalis Data<T> pattern
///
/// Handlers only translate jobs into pipeline events; the orchestrator owns
/// the store, cache, decision chain and publisher.
pub struct JobContext {
    pub orchestrator: Arc<Orchestrator>,
    pub metrics: Option<Arc<Metrics>>,
}

impl JobContext {
    pub fn new(orchestrator: Arc<Orchestrator>, metrics: Option<Arc<Metrics>>) -> Self {
        Self {
            orchestrator,
            metrics,
        }
    }
}
