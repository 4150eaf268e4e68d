//! Prometheus metrics for the pipeline workers.

use prometheus::{
    Encoder, Gauge, Histogram, HistogramOpts, IntCounter, IntCounterVec, Opts, Registry,
    TextEncoder,
};

pub struct Metrics {
    registry: Registry,
    pub database_connected: Gauge,
    pub cache_connected: Gauge,
    /// Handled events, labelled by stage.
    pub stage_events_total: IntCounterVec,
    /// Handler failures returned to the broker for redelivery, by stage.
    pub stage_failures_total: IntCounterVec,
    pub insufficient_data_total: IntCounter,
    pub malformed_events_total: IntCounter,
    pub decision_fallbacks_total: IntCounter,
    /// Persisted signals, labelled by decision source.
    pub signals_total: IntCounterVec,
    pub decision_duration_seconds: Histogram,
}

impl Metrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let database_connected = Gauge::new("database_connected", "1 when the price store is reachable")?;
        let cache_connected = Gauge::new("cache_connected", "1 when the cache is reachable")?;
        let stage_events_total = IntCounterVec::new(
            Opts::new("pipeline_stage_events_total", "Pipeline events handled per stage"),
            &["stage"],
        )?;
        let stage_failures_total = IntCounterVec::new(
            Opts::new(
                "pipeline_stage_failures_total",
                "Pipeline handler failures returned for redelivery",
            ),
            &["stage"],
        )?;
        let insufficient_data_total = IntCounter::new(
            "pipeline_insufficient_data_total",
            "Cycles ended because the price window was too short",
        )?;
        let malformed_events_total = IntCounter::new(
            "pipeline_malformed_events_total",
            "Events acknowledged without processing",
        )?;
        let decision_fallbacks_total = IntCounter::new(
            "decision_fallbacks_total",
            "Decisions served by the rule engine after a remote failure",
        )?;
        let signals_total = IntCounterVec::new(
            Opts::new("signals_total", "Signals persisted per decision source"),
            &["source"],
        )?;
        let decision_duration_seconds = Histogram::with_opts(
            HistogramOpts::new(
                "decision_duration_seconds",
                "Latency of the primary decision source",
            )
            .buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]),
        )?;

        registry.register(Box::new(database_connected.clone()))?;
        registry.register(Box::new(cache_connected.clone()))?;
        registry.register(Box::new(stage_events_total.clone()))?;
        registry.register(Box::new(stage_failures_total.clone()))?;
        registry.register(Box::new(insufficient_data_total.clone()))?;
        registry.register(Box::new(malformed_events_total.clone()))?;
        registry.register(Box::new(decision_fallbacks_total.clone()))?;
        registry.register(Box::new(signals_total.clone()))?;
        registry.register(Box::new(decision_duration_seconds.clone()))?;

        Ok(Self {
            registry,
            database_connected,
            cache_connected,
            stage_events_total,
            stage_failures_total,
            insufficient_data_total,
            malformed_events_total,
            decision_fallbacks_total,
            signals_total,
            decision_duration_seconds,
        })
    }

    /// Render all metrics in the Prometheus text format.
    pub fn export(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}
