//! Environment-based configuration.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::indicators::engine::{IndicatorConfig, MIN_PRICE_POINTS};
use crate::indicators::momentum::SignalLineMethod;

pub fn get_environment() -> String {
    env::var("ENVIRONMENT").unwrap_or_else(|_| "sandbox".to_string())
}

pub fn get_redis_url() -> String {
    env::var("REDIS_URL").unwrap_or_else(|_| "redis://127.0.0.1:6379/".to_string())
}

pub fn get_questdb_url() -> String {
    env::var("QUESTDB_URL")
        .unwrap_or_else(|_| "host=127.0.0.1 port=8812 user=admin password=quest dbname=qdb".to_string())
}

pub fn get_decision_service_url() -> Option<String> {
    env::var("DECISION_SERVICE_URL")
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

/// Time-to-live for each cache entry kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheTtl {
    pub price: Duration,
    pub indicators: Duration,
    pub signals: Duration,
}

impl Default for CacheTtl {
    fn default() -> Self {
        Self {
            price: Duration::from_secs(60),
            indicators: Duration::from_secs(10 * 60),
            signals: Duration::from_secs(15 * 60),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// `None` runs every cycle on the rule engine.
    pub decision_service_url: Option<String>,
    pub decision_timeout: Duration,
    /// Price points fetched per indicator cycle. Never below the engine minimum.
    pub price_window: usize,
    /// Recent signals kept in the signal cache.
    pub recent_signals: usize,
    pub worker_concurrency: usize,
    /// Delivery attempts per job before it is left dead in the broker.
    pub max_attempts: usize,
    pub cache_ttl: CacheTtl,
    /// 0 disables the refresh sweep.
    pub sweep_interval_seconds: u64,
    pub retention_days: u32,
    pub indicators: IndicatorConfig,
    /// Reported as `worker` in decision request metadata.
    pub worker_name: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            decision_service_url: None,
            decision_timeout: Duration::from_secs(30),
            price_window: 100,
            recent_signals: 20,
            worker_concurrency: 4,
            max_attempts: 3,
            cache_ttl: CacheTtl::default(),
            sweep_interval_seconds: 0,
            retention_days: 730,
            indicators: IndicatorConfig::default(),
            worker_name: "tickerwise-worker".to_string(),
        }
    }
}

impl PipelineConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let mut indicators = IndicatorConfig::default();
        if let Ok(method) = env::var("MACD_SIGNAL_METHOD") {
            match method.parse::<SignalLineMethod>() {
                Ok(m) => indicators.macd_signal_method = m,
                Err(e) => tracing::warn!(error = %e, "Ignoring MACD_SIGNAL_METHOD"),
            }
        }

        Self {
            decision_service_url: get_decision_service_url(),
            decision_timeout: Duration::from_secs(env_or(
                "DECISION_TIMEOUT_SECONDS",
                defaults.decision_timeout.as_secs(),
            )),
            price_window: env_or("PRICE_WINDOW", defaults.price_window).max(MIN_PRICE_POINTS),
            recent_signals: env_or("RECENT_SIGNALS", defaults.recent_signals).max(1),
            worker_concurrency: env_or("WORKER_CONCURRENCY", defaults.worker_concurrency).max(1),
            max_attempts: env_or("MAX_ATTEMPTS", defaults.max_attempts).max(1),
            cache_ttl: CacheTtl {
                price: Duration::from_secs(env_or(
                    "CACHE_PRICE_TTL_SECONDS",
                    defaults.cache_ttl.price.as_secs(),
                )),
                indicators: Duration::from_secs(env_or(
                    "CACHE_INDICATORS_TTL_SECONDS",
                    defaults.cache_ttl.indicators.as_secs(),
                )),
                signals: Duration::from_secs(env_or(
                    "CACHE_SIGNALS_TTL_SECONDS",
                    defaults.cache_ttl.signals.as_secs(),
                )),
            },
            sweep_interval_seconds: env_or("SWEEP_INTERVAL_SECONDS", defaults.sweep_interval_seconds),
            retention_days: env_or("RETENTION_DAYS", defaults.retention_days),
            indicators,
            worker_name: env::var("WORKER_NAME")
                .ok()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .unwrap_or(defaults.worker_name),
        }
    }

    /// Window fetched per cycle, raised to what the indicator lookbacks need.
    pub fn effective_price_window(&self) -> usize {
        self.price_window.max(self.indicators.required_points())
    }
}
