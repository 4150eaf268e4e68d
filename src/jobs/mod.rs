//! Job queue system for the signal pipeline

pub mod context;
pub mod handlers;
pub mod publisher;
pub mod types;

pub use context::JobContext;
pub use publisher::{ApalisPublisher, EventPublisher, InMemoryPublisher, PublishError};
pub use types::{
    DecisionRequestedJob, IndicatorRequestedJob, PipelineEvent, PriceIngestedJob,
    SignalGeneratedJob,
};
