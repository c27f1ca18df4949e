//! # Service Registry Telemetry
//!
//! Logging bootstrap and Prometheus metrics for processes hosting a
//! [`svc_registry::ServiceRegistry`].
//!
//! ## Components
//!
//! - **Logging**: `tracing-subscriber` with env filter, pretty or JSON output
//! - **Metrics**: Prometheus gauge/counters/histogram fed by [`PrometheusRecorder`]
//!
//! ## Usage
//!
//! ```rust,ignore
//! use svc_telemetry::{init_telemetry, PrometheusRecorder, TelemetryConfig};
//!
//! fn main() -> anyhow::Result<()> {
//!     let _guard = init_telemetry(TelemetryConfig::from_env())?;
//!     let registry = ServiceRegistry::with_metrics(Arc::new(PrometheusRecorder));
//!     // ...
//!     Ok(())
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `SVC_SERVICE_NAME` | `svc-runtime` | Name attached to startup logs |
//! | `SVC_LOG_LEVEL` | `info` | Log filter directive (falls back to `RUST_LOG`) |
//! | `SVC_JSON_LOGS` | `false` (`true` in containers) | JSON log lines |
//! | `SVC_CONSOLE_OUTPUT` | `true` | Write logs to stdout |

mod config;
mod logging;
mod metrics;

pub use config::TelemetryConfig;
pub use logging::init_logging;
pub use metrics::{
    encode_metrics, register_metrics, MetricsHandle, PrometheusRecorder, REGISTRY_OPERATIONS,
    SERVICES_REGISTERED, SHUTDOWN_DURATION, SHUTDOWN_TIMEOUTS,
};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Failed to initialize logging: {0}")]
    LoggingInit(String),

    #[error("Failed to initialize Prometheus metrics: {0}")]
    MetricsInit(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Register metrics and install the global log subscriber.
///
/// Returns a guard that should be held for the lifetime of the application.
///
/// # Errors
///
/// Fails if metrics were already registered or a subscriber is already set.
pub fn init_telemetry(config: TelemetryConfig) -> Result<TelemetryGuard, TelemetryError> {
    let metrics_handle = register_metrics()?;
    logging::init_logging(&config)?;

    Ok(TelemetryGuard {
        service_name: config.service_name,
        metrics: metrics_handle,
    })
}

/// Guard that keeps telemetry active.
pub struct TelemetryGuard {
    service_name: String,
    metrics: MetricsHandle,
}

impl TelemetryGuard {
    pub fn metrics(&self) -> &MetricsHandle {
        &self.metrics
    }
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        tracing::info!(service = %self.service_name, "Shutting down telemetry...");
    }
}
