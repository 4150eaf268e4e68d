//! Scheduler for background pipeline upkeep

use crate::core::orchestrator::Orchestrator;
use crate::error::PipelineResult;
use cron::Schedule;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{error, info};

/// Daily at 03:00 UTC.
pub const RETENTION_CRON: &str = "0 0 3 * * *";

/// Independently scheduled background tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduledTask {
    /// Request fresh indicators for every active instrument.
    RefreshSweep,
    /// Drop price and indicator history past the retention window.
    HistoryRetention,
}

impl ScheduledTask {
    pub fn name(&self) -> &'static str {
        match self {
            ScheduledTask::RefreshSweep => "refresh-sweep",
            ScheduledTask::HistoryRetention => "history-retention",
        }
    }
}

fn parse_schedule(expr: &str) -> Result<Schedule, Box<dyn std::error::Error + Send + Sync>> {
    Schedule::from_str(expr).map_err(|e| {
        Box::new(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("Invalid cron expression '{}': {}", expr, e),
        )) as Box<dyn std::error::Error + Send + Sync>
    })
}

/// Scheduler owning one cancellable task per [`ScheduledTask`]
///
/// The refresh sweep ticks on a fixed interval; retention follows a cron
/// expression.
pub struct JobScheduler {
    orchestrator: Arc<Orchestrator>,
    sweep_period: Option<Duration>,
    schedules: Vec<(ScheduledTask, Schedule)>,
    handles: Arc<RwLock<Vec<JoinHandle<()>>>>,
}

impl JobScheduler {
    /// Create a new scheduler
    ///
    /// # Arguments
    /// * `orchestrator` - Pipeline the tasks act on
    /// * `sweep_interval_seconds` - Refresh sweep interval (0 = sweep disabled)
    pub fn new(
        orchestrator: Arc<Orchestrator>,
        sweep_interval_seconds: u64,
    ) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let sweep_period = if sweep_interval_seconds > 0 {
            info!(
                interval = sweep_interval_seconds,
                "JobScheduler: refresh sweep every {}s", sweep_interval_seconds
            );
            Some(Duration::from_secs(sweep_interval_seconds))
        } else {
            info!("JobScheduler: refresh sweep disabled");
            None
        };

        let schedules = vec![(
            ScheduledTask::HistoryRetention,
            parse_schedule(RETENTION_CRON)?,
        )];

        Ok(Self {
            orchestrator,
            sweep_period,
            schedules,
            handles: Arc::new(RwLock::new(Vec::new())),
        })
    }

    pub fn tasks(&self) -> Vec<ScheduledTask> {
        self.sweep_period
            .map(|_| ScheduledTask::RefreshSweep)
            .into_iter()
            .chain(self.schedules.iter().map(|(task, _)| *task))
            .collect()
    }

    /// Time between refresh sweeps, `None` when disabled.
    pub fn sweep_period(&self) -> Option<Duration> {
        self.sweep_period
    }

    /// Run one task immediately.
    pub async fn run_task(orchestrator: &Orchestrator, task: ScheduledTask) -> PipelineResult<()> {
        match task {
            ScheduledTask::RefreshSweep => {
                let count = orchestrator.refresh_active().await?;
                info!(instruments = count, "JobScheduler: refresh sweep enqueued {} instruments", count);
            }
            ScheduledTask::HistoryRetention => {
                orchestrator.prune_history(chrono::Utc::now()).await?;
            }
        }
        Ok(())
    }

    /// Start the scheduler
    pub async fn start(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let mut handles = self.handles.write().await;
        if !handles.is_empty() {
            return Ok(());
        }

        if let Some(period) = self.sweep_period {
            let orchestrator = self.orchestrator.clone();
            handles.push(tokio::spawn(async move {
                let task = ScheduledTask::RefreshSweep;
                let mut ticker = interval_at(Instant::now() + period, period);
                ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
                info!(task = task.name(), "JobScheduler: task started, first run in {:?}", period);

                loop {
                    ticker.tick().await;
                    if let Err(e) = JobScheduler::run_task(&orchestrator, task).await {
                        error!(task = task.name(), error = %e, "JobScheduler: scheduled task failed");
                    }
                }
            }));
        }

        for (task, schedule) in &self.schedules {
            let task = *task;
            let schedule = schedule.clone();
            let orchestrator = self.orchestrator.clone();

            handles.push(tokio::spawn(async move {
                info!(task = task.name(), "JobScheduler: task started, waiting for cron schedule...");

                loop {
                    // Get the next scheduled time
                    let mut upcoming = schedule.upcoming(chrono::Utc);
                    if let Some(next_tick) = upcoming.next() {
                        let now = chrono::Utc::now();
                        if next_tick > now {
                            let duration = (next_tick - now).to_std().unwrap_or_default();
                            tokio::time::sleep(duration).await;
                        }
                    } else {
                        // No more scheduled times, wait a bit and check again
                        tokio::time::sleep(Duration::from_secs(60)).await;
                        continue;
                    }

                    if let Err(e) = JobScheduler::run_task(&orchestrator, task).await {
                        error!(task = task.name(), error = %e, "JobScheduler: scheduled task failed");
                    }
                }
            }));
        }

        info!(tasks = handles.len(), "JobScheduler: started successfully");
        Ok(())
    }

    /// Stop the scheduler
    pub async fn stop(&self) {
        let mut handles = self.handles.write().await;
        if handles.is_empty() {
            return;
        }
        for h in handles.drain(..) {
            h.abort();
        }
        info!("JobScheduler: stopped");
    }

    /// Check if the scheduler is running
    pub async fn is_running(&self) -> bool {
        let handles = self.handles.read().await;
        !handles.is_empty()
    }
}
