//! Apalis worker setup for the pipeline stage queues

use crate::jobs::context::JobContext;
use crate::jobs::handlers;
use crate::jobs::publisher::ApalisPublisher;
use apalis::layers::retry::RetryPolicy;
use apalis::prelude::*;
use std::sync::Arc;
use tracing::info;

/// Configuration for the job runtime
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Jobs processed at once by each stage worker.
    pub concurrency: usize,
    /// Delivery attempts per job, first attempt included.
    pub max_attempts: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            concurrency: 4,
            max_attempts: 3,
        }
    }
}

impl RuntimeConfig {
    fn retries(&self) -> usize {
        self.max_attempts.saturating_sub(1)
    }
}

/// Pipeline runtime: one Apalis worker per stage queue
pub struct PipelineRuntime {
    config: RuntimeConfig,
    job_context: Arc<JobContext>,
    queues: ApalisPublisher,
}

impl PipelineRuntime {
    /// Create a new runtime with job context and the stage queues
    pub fn new(config: RuntimeConfig, job_context: Arc<JobContext>, queues: ApalisPublisher) -> Self {
        Self {
            config,
            job_context,
            queues,
        }
    }

    /// Start all workers and return handles for graceful shutdown
    pub async fn start_workers(
        &self,
    ) -> Result<Vec<tokio::task::JoinHandle<()>>, Box<dyn std::error::Error + Send + Sync>> {
        let mut handles = Vec::new();
        let concurrency = self.config.concurrency.max(1);
        let retries = self.config.retries();

        info!(
            concurrency,
            max_attempts = self.config.max_attempts,
            "PipelineRuntime: starting Apalis workers with concurrency {}",
            concurrency
        );

        let storage = self.queues.price_ingested_storage();
        let ctx = self.job_context.clone();
        handles.push(tokio::spawn(async move {
            let worker = WorkerBuilder::new("price-ingested-worker")
                .data(ctx)
                .retry(RetryPolicy::retries(retries))
                .concurrency(concurrency)
                .backend(storage)
                .build_fn(handlers::handle_price_ingested);

            info!("PipelineRuntime: PriceIngested worker started");
            worker.run().await;
        }));

        let storage = self.queues.indicator_requested_storage();
        let ctx = self.job_context.clone();
        handles.push(tokio::spawn(async move {
            let worker = WorkerBuilder::new("indicator-requested-worker")
                .data(ctx)
                .retry(RetryPolicy::retries(retries))
                .concurrency(concurrency)
                .backend(storage)
                .build_fn(handlers::handle_indicator_requested);

            info!("PipelineRuntime: IndicatorRequested worker started");
            worker.run().await;
        }));

        let storage = self.queues.decision_requested_storage();
        let ctx = self.job_context.clone();
        handles.push(tokio::spawn(async move {
            let worker = WorkerBuilder::new("decision-requested-worker")
                .data(ctx)
                .retry(RetryPolicy::retries(retries))
                .concurrency(concurrency)
                .backend(storage)
                .build_fn(handlers::handle_decision_requested);

            info!("PipelineRuntime: DecisionRequested worker started");
            worker.run().await;
        }));

        let storage = self.queues.signal_generated_storage();
        let ctx = self.job_context.clone();
        handles.push(tokio::spawn(async move {
            let worker = WorkerBuilder::new("signal-generated-worker")
                .data(ctx)
                .retry(RetryPolicy::retries(retries))
                .concurrency(concurrency)
                .backend(storage)
                .build_fn(handlers::handle_signal_generated);

            info!("PipelineRuntime: SignalGenerated worker started");
            worker.run().await;
        }));

        info!("PipelineRuntime: all workers started");
        Ok(handles)
    }
}
