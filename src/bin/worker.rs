//! Tickerwise Worker
//!
//! Runs the four pipeline stage workers and the background scheduler.
//! Configured entirely from the environment.

use backon::{ExponentialBuilder, Retryable};
use dotenvy::dotenv;
use std::sync::Arc;
use std::time::Duration;
use tickerwise::cache::{RedisCache, SignalCache};
use tickerwise::config::{self, PipelineConfig};
use tickerwise::core::orchestrator::Orchestrator;
use tickerwise::core::runtime::{PipelineRuntime, RuntimeConfig};
use tickerwise::core::scheduler::JobScheduler;
use tickerwise::db::{PriceStore, QuestDatabase};
use tickerwise::decision::{DecisionSource, FallbackDecisionChain, RemoteDecisionSource};
use tickerwise::jobs::context::JobContext;
use tickerwise::jobs::publisher::{ApalisPublisher, EventPublisher};
use tickerwise::logging;
use tickerwise::metrics::Metrics;
use tokio::signal;
use tracing::{info, warn};

const CONNECTION_CHECK_INTERVAL: Duration = Duration::from_secs(30);

fn startup_backoff() -> ExponentialBuilder {
    ExponentialBuilder::default()
        .with_min_delay(Duration::from_millis(500))
        .with_max_delay(Duration::from_secs(10))
        .with_max_times(5)
}

/// Keep the connection gauges current for the life of the worker.
fn spawn_connection_monitor(
    database: Arc<QuestDatabase>,
    cache: Arc<RedisCache>,
    metrics: Arc<Metrics>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(CONNECTION_CHECK_INTERVAL);
        loop {
            ticker.tick().await;

            let db_up = database.is_available().await;
            metrics.database_connected.set(if db_up { 1.0 } else { 0.0 });
            if !db_up {
                warn!("QuestDB connection lost");
            }

            match cache.ping().await {
                Ok(()) => metrics.cache_connected.set(1.0),
                Err(e) => {
                    metrics.cache_connected.set(0.0);
                    warn!(error = %e, "Redis ping failed");
                }
            }
        }
    })
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env if present
    dotenv().ok();

    // Initialize logging based on environment
    logging::init_logging();

    let env = config::get_environment();
    info!("Starting Tickerwise Worker");
    info!(environment = %env, "Environment");

    let pipeline_config = PipelineConfig::from_env();
    info!(
        concurrency = pipeline_config.worker_concurrency,
        max_attempts = pipeline_config.max_attempts,
        price_window = pipeline_config.effective_price_window(),
        "Pipeline configuration loaded"
    );

    // Initialize metrics
    let metrics = Arc::new(Metrics::new()?);

    info!("Initializing QuestDB connection...");
    let questdb_url = config::get_questdb_url();
    let database = (|| async { QuestDatabase::connect(&questdb_url).await })
        .retry(startup_backoff())
        .notify(|e, delay| warn!(error = %e, ?delay, "QuestDB not reachable, retrying"))
        .await
        .map_err(|e| format!("QuestDB connection required for worker: {}", e))?;
    info!("QuestDB connected");
    let database = Arc::new(database);
    let store: Arc<dyn PriceStore> = database.clone();

    info!("Initializing Redis connection...");
    let redis_url = config::get_redis_url();
    let cache_ttl = pipeline_config.cache_ttl.clone();
    let cache = (|| async { RedisCache::connect(&redis_url, cache_ttl.clone()).await })
        .retry(startup_backoff())
        .notify(|e, delay| warn!(error = %e, ?delay, "Redis not reachable, retrying"))
        .await
        .map_err(|e| format!("Redis connection required for worker: {}", e))?;
    info!("Redis connected");
    let redis_cache = Arc::new(cache);
    let cache: Arc<dyn SignalCache> = redis_cache.clone();

    let health_handle = spawn_connection_monitor(database, redis_cache, metrics.clone());

    let chain = match pipeline_config.decision_service_url.as_deref() {
        Some(url) => {
            let remote = RemoteDecisionSource::with_timeout(url, pipeline_config.decision_timeout)?;
            if let Err(e) = remote.health_check().await {
                warn!(error = %e, url = %url, "Decision service health check failed, rule fallback will cover outages");
            }
            info!(url = %url, "Using remote decision service");
            let remote: Arc<dyn DecisionSource> = Arc::new(remote);
            FallbackDecisionChain::new(remote)
        }
        None => {
            warn!("DECISION_SERVICE_URL not set, all decisions come from the rule engine");
            FallbackDecisionChain::rules_only()
        }
    }
    .with_metrics(metrics.clone());

    // Initialize Apalis storage backends
    info!("Initializing Apalis Redis storage...");
    let conn = apalis_redis::connect(redis_url.clone()).await?;
    let queues = ApalisPublisher::new(conn);
    let publisher: Arc<dyn EventPublisher> = Arc::new(queues.clone());
    info!("Apalis Redis storage initialized");

    let orchestrator = Arc::new(
        Orchestrator::new(
            store,
            cache,
            Arc::new(chain),
            publisher,
            pipeline_config.clone(),
        )
        .with_metrics(metrics.clone()),
    );

    let job_context = Arc::new(JobContext::new(orchestrator.clone(), Some(metrics.clone())));

    // Initialize and start job runtime (workers)
    info!("Starting Apalis workers...");
    let runtime = PipelineRuntime::new(
        RuntimeConfig {
            concurrency: pipeline_config.worker_concurrency,
            max_attempts: pipeline_config.max_attempts,
        },
        job_context,
        queues,
    );
    let worker_handles = runtime
        .start_workers()
        .await
        .map_err(|e| format!("Failed to start workers: {}", e))?;

    // Initialize and start scheduler
    info!("Starting job scheduler...");
    let scheduler = JobScheduler::new(orchestrator, pipeline_config.sweep_interval_seconds)
        .map_err(|e| format!("Failed to create scheduler: {}", e))?;
    scheduler
        .start()
        .await
        .map_err(|e| format!("Failed to start scheduler: {}", e))?;

    // Graceful shutdown
    info!("Worker started, waiting for shutdown signal...");
    signal::ctrl_c().await?;
    info!("Shutting down worker...");
    scheduler.stop().await;
    health_handle.abort();
    for handle in worker_handles {
        handle.abort();
    }
    info!("Worker stopped");

    Ok(())
}
