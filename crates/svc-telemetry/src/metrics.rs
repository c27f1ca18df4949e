//! Prometheus metrics for the service registry.
//!
//! All metrics follow the naming convention: `svc_registry_<metric>_<unit>`
//!
//! ## Metric Types
//!
//! - **Gauge**: services currently registered
//! - **Counter**: registry operations by outcome, shutdown deadline misses
//! - **Histogram**: time spent in `stop_all`

use lazy_static::lazy_static;
use prometheus::{
    exponential_buckets, Encoder, Histogram, HistogramOpts, IntCounter, IntCounterVec, IntGauge,
    Opts, Registry, TextEncoder,
};
use std::sync::Arc;
use std::time::Duration;

use svc_registry::MetricsRecorder;

use crate::TelemetryError;

lazy_static! {
    /// Global metrics registry
    pub static ref REGISTRY: Registry = Registry::new();

    /// Services currently registered
    pub static ref SERVICES_REGISTERED: IntGauge = IntGauge::new(
        "svc_registry_services",
        "Number of services currently registered"
    ).expect("metric creation failed");

    /// Registry operations by kind and outcome
    pub static ref REGISTRY_OPERATIONS: IntCounterVec = IntCounterVec::new(
        Opts::new("svc_registry_operations_total", "Registry operations by outcome"),
        &["operation", "outcome"]  // operation: add/remove/lookup/find_method
    ).expect("metric creation failed");

    /// Wall time of the two-phase shutdown
    pub static ref SHUTDOWN_DURATION: Histogram = Histogram::with_opts(
        HistogramOpts::new(
            "svc_registry_shutdown_duration_seconds",
            "Time spent stopping and draining all services"
        ).buckets(exponential_buckets(0.001, 2.0, 16).expect("valid bucket layout"))
    ).expect("metric creation failed");

    /// Shutdowns that hit their deadline
    pub static ref SHUTDOWN_TIMEOUTS: IntCounter = IntCounter::new(
        "svc_registry_shutdown_timeouts_total",
        "Shutdowns abandoned after the configured deadline"
    ).expect("metric creation failed");
}

/// Handle for the registered metrics
pub struct MetricsHandle {
    _registry: Arc<Registry>,
}

impl MetricsHandle {
    /// Prometheus text exposition of everything registered.
    pub fn encode(&self) -> Result<String, TelemetryError> {
        encode_metrics()
    }
}

/// Register all metrics with the global registry.
///
/// Fails with `TelemetryError::MetricsInit` when called a second time.
pub fn register_metrics() -> Result<MetricsHandle, TelemetryError> {
    let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
        Box::new(SERVICES_REGISTERED.clone()),
        Box::new(REGISTRY_OPERATIONS.clone()),
        Box::new(SHUTDOWN_DURATION.clone()),
        Box::new(SHUTDOWN_TIMEOUTS.clone()),
    ];

    for metric in metrics {
        REGISTRY
            .register(metric)
            .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    }

    Ok(MetricsHandle {
        _registry: Arc::new(REGISTRY.clone()),
    })
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> Result<String, TelemetryError> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsInit(e.to_string()))
}

/// Feeds registry events into the global Prometheus metrics.
#[derive(Debug, Default, Clone, Copy)]
pub struct PrometheusRecorder;

impl PrometheusRecorder {
    fn operation(operation: &str, outcome: &str) {
        REGISTRY_OPERATIONS
            .with_label_values(&[operation, outcome])
            .inc();
    }
}

impl MetricsRecorder for PrometheusRecorder {
    fn record_added(&self, registered: usize) {
        Self::operation("add", "ok");
        SERVICES_REGISTERED.set(registered as i64);
    }

    fn record_duplicate_rejected(&self) {
        Self::operation("add", "duplicate");
    }

    fn record_removed(&self, registered: usize) {
        Self::operation("remove", "ok");
        SERVICES_REGISTERED.set(registered as i64);
    }

    fn record_remove_rejected(&self) {
        Self::operation("remove", "not_registered");
    }

    fn record_lookup(&self, hit: bool) {
        Self::operation("lookup", if hit { "hit" } else { "miss" });
    }

    fn record_blank_method_query(&self) {
        Self::operation("find_method", "blank_key");
    }

    fn record_shutdown(&self, duration: Duration, _services: usize, timed_out: bool) {
        SHUTDOWN_DURATION.observe(duration.as_secs_f64());
        if timed_out {
            SHUTDOWN_TIMEOUTS.inc();
        }
    }
}
