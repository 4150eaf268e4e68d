//! Job handlers for the signal pipeline
//!
//! One handler per stage queue. Malformed events are acknowledged; store,
//! cache and publish failures are returned so the broker redelivers the job.

use crate::core::orchestrator::StageOutcome;
use crate::jobs::context::JobContext;
use crate::jobs::types::{
    DecisionRequestedJob, IndicatorRequestedJob, PipelineEvent, PriceIngestedJob,
    SignalGeneratedJob,
};
use apalis::prelude::*;
use std::sync::Arc;
use tracing::{debug, error, warn};

pub type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

/// Run one event through the orchestrator and map the result onto the
/// broker's ack/retry contract.
pub async fn dispatch(ctx: &JobContext, event: PipelineEvent) -> HandlerResult {
    let stage = event.stage();
    let symbol = event.symbol().to_string();

    match ctx.orchestrator.handle(event).await {
        Ok(outcome) => {
            match outcome {
                StageOutcome::InsufficientData { .. } | StageOutcome::InvalidPrices(_) => {
                    debug!(stage, symbol = %symbol, outcome = ?outcome, "Cycle ended without a signal")
                }
                StageOutcome::Advanced | StageOutcome::Completed => {
                    debug!(stage, symbol = %symbol, "Stage finished")
                }
            }
            Ok(())
        }
        Err(e) if !e.is_retryable() => {
            warn!(stage, symbol = %symbol, error = %e, "Dropping malformed event");
            if let Some(ref metrics) = ctx.metrics {
                metrics.malformed_events_total.inc();
            }
            Ok(())
        }
        Err(e) => {
            error!(stage, symbol = %symbol, error = %e, "Stage failed, job will be retried");
            if let Some(ref metrics) = ctx.metrics {
                metrics.stage_failures_total.with_label_values(&[stage]).inc();
            }
            Err(e.into())
        }
    }
}

pub async fn handle_price_ingested(
    job: PriceIngestedJob,
    ctx: Data<Arc<JobContext>>,
) -> HandlerResult {
    dispatch(&ctx, job.into()).await
}

pub async fn handle_indicator_requested(
    job: IndicatorRequestedJob,
    ctx: Data<Arc<JobContext>>,
) -> HandlerResult {
    dispatch(&ctx, job.into()).await
}

pub async fn handle_decision_requested(
    job: DecisionRequestedJob,
    ctx: Data<Arc<JobContext>>,
) -> HandlerResult {
    dispatch(&ctx, job.into()).await
}

pub async fn handle_signal_generated(
    job: SignalGeneratedJob,
    ctx: Data<Arc<JobContext>>,
) -> HandlerResult {
    dispatch(&ctx, job.into()).await
}
