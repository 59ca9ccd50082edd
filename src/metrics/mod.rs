//! Metrics collection for observability

use once_cell::sync::Lazy;
use prometheus::{
    register_counter_vec_with_registry, register_counter_with_registry,
    register_histogram_vec_with_registry, Counter, CounterVec, HistogramVec, Opts, Registry,
};
use std::sync::Arc;

/// Global metrics registry
pub static METRICS: Lazy<Arc<Metrics>> =
    Lazy::new(|| Arc::new(Metrics::new().expect("Failed to initialize metrics")));

/// Metrics collector
pub struct Metrics {
    registry: Registry,

    // Session metrics
    pub sessions_started: Counter,
    pub sessions_finished: CounterVec,

    // Fact verification metrics
    pub facts_verified: CounterVec,
    pub conflicts_detected: CounterVec,
    pub resolutions: CounterVec,

    // Source fetch metrics
    pub cache_hits: Counter,
    pub cache_misses: Counter,
    pub provider_failures: CounterVec,
    pub fetch_duration: HistogramVec,
}

impl Metrics {
    /// Create a new metrics collector
    pub fn new() -> Result<Self, Box<dyn std::error::Error>> {
        let registry = Registry::new();

        let sessions_started = register_counter_with_registry!(
            Opts::new("verification_sessions_started_total", "Total verification sessions started"),
            registry
        )?;

        let sessions_finished = register_counter_vec_with_registry!(
            Opts::new("verification_sessions_finished_total", "Total verification sessions finished"),
            &["status"],
            registry
        )?;

        let facts_verified = register_counter_vec_with_registry!(
            Opts::new("facts_verified_total", "Total fact verifications"),
            &["outcome"],
            registry
        )?;

        let conflicts_detected = register_counter_vec_with_registry!(
            Opts::new("conflicts_detected_total", "Total conflicts detected between sources"),
            &["conflict_type"],
            registry
        )?;

        let resolutions = register_counter_vec_with_registry!(
            Opts::new("conflict_resolutions_total", "Total conflict resolutions by method"),
            &["method"],
            registry
        )?;

        let cache_hits = register_counter_with_registry!(
            Opts::new("source_cache_hits_total", "Total source cache hits"),
            registry
        )?;

        let cache_misses = register_counter_with_registry!(
            Opts::new("source_cache_misses_total", "Total source cache misses"),
            registry
        )?;

        let provider_failures = register_counter_vec_with_registry!(
            Opts::new("provider_failures_total", "Total provider fetch failures"),
            &["provider"],
            registry
        )?;

        let fetch_duration = register_histogram_vec_with_registry!(
            "source_fetch_duration_seconds",
            "Source fetch duration in seconds",
            &["provider"],
            registry
        )?;

        Ok(Self {
            registry,
            sessions_started,
            sessions_finished,
            facts_verified,
            conflicts_detected,
            resolutions,
            cache_hits,
            cache_misses,
            provider_failures,
            fetch_duration,
        })
    }

    /// Access the underlying registry (for exposition by the embedding app)
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Gather all metric families
    pub fn gather(&self) -> Vec<prometheus::proto::MetricFamily> {
        self.registry.gather()
    }
}
