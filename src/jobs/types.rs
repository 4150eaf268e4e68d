//! Stage events of the signal pipeline

use crate::models::indicators::IndicatorSet;
use crate::models::signal::Signal;
use serde::{Deserialize, Serialize};

pub const PRICE_INGESTED_QUEUE: &str = "price-ingested";
pub const INDICATOR_REQUESTED_QUEUE: &str = "indicator-requested";
pub const DECISION_REQUESTED_QUEUE: &str = "decision-requested";
pub const SIGNAL_GENERATED_QUEUE: &str = "signal-generated";

/// A new price point was stored for an instrument
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceIngestedJob {
    pub symbol: String,
    pub market: String,
}

/// Indicators should be recomputed for an instrument
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorRequestedJob {
    pub symbol: String,
    pub market: String,
}

/// A fresh indicator snapshot is ready for a decision
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionRequestedJob {
    pub symbol: String,
    pub market: String,
    pub indicators: IndicatorSet,
}

/// Terminal event carrying the persisted signal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalGeneratedJob {
    pub symbol: String,
    pub market: String,
    pub signal: Signal,
}

/// Every event the pipeline routes between stages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PipelineEvent {
    PriceIngested(PriceIngestedJob),
    IndicatorRequested(IndicatorRequestedJob),
    DecisionRequested(DecisionRequestedJob),
    SignalGenerated(SignalGeneratedJob),
}

impl PipelineEvent {
    /// Stage name, also the queue the event travels on.
    pub fn stage(&self) -> &'static str {
        match self {
            PipelineEvent::PriceIngested(_) => PRICE_INGESTED_QUEUE,
            PipelineEvent::IndicatorRequested(_) => INDICATOR_REQUESTED_QUEUE,
            PipelineEvent::DecisionRequested(_) => DECISION_REQUESTED_QUEUE,
            PipelineEvent::SignalGenerated(_) => SIGNAL_GENERATED_QUEUE,
        }
    }

    pub fn symbol(&self) -> &str {
        match self {
            PipelineEvent::PriceIngested(job) => &job.symbol,
            PipelineEvent::IndicatorRequested(job) => &job.symbol,
            PipelineEvent::DecisionRequested(job) => &job.symbol,
            PipelineEvent::SignalGenerated(job) => &job.symbol,
        }
    }

    pub fn market(&self) -> &str {
        match self {
            PipelineEvent::PriceIngested(job) => &job.market,
            PipelineEvent::IndicatorRequested(job) => &job.market,
            PipelineEvent::DecisionRequested(job) => &job.market,
            PipelineEvent::SignalGenerated(job) => &job.market,
        }
    }
}

impl From<PriceIngestedJob> for PipelineEvent {
    fn from(job: PriceIngestedJob) -> Self {
        PipelineEvent::PriceIngested(job)
    }
}

impl From<IndicatorRequestedJob> for PipelineEvent {
    fn from(job: IndicatorRequestedJob) -> Self {
        PipelineEvent::IndicatorRequested(job)
    }
}

impl From<DecisionRequestedJob> for PipelineEvent {
    fn from(job: DecisionRequestedJob) -> Self {
        PipelineEvent::DecisionRequested(job)
    }
}

impl From<SignalGeneratedJob> for PipelineEvent {
    fn from(job: SignalGeneratedJob) -> Self {
        PipelineEvent::SignalGenerated(job)
    }
}
