//! Core application primitives (orchestrator, workers, scheduler)

pub mod orchestrator;
pub mod runtime;
pub mod scheduler;

pub use orchestrator::{Orchestrator, StageOutcome};
pub use runtime::{PipelineRuntime, RuntimeConfig};
pub use scheduler::{JobScheduler, ScheduledTask};
