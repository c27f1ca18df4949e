//! # Service Runtime
//!
//! Hosts a single [`ServiceHost`] for the lifetime of the process.
//!
//! ## Startup Sequence
//!
//! 1. Load configuration (defaults, then environment)
//! 2. Initialize telemetry (logging + Prometheus metrics)
//! 3. Build the host around an instrumented registry
//! 4. Start and register the configured workers
//! 5. Log a registry snapshot on every status tick
//!
//! ## Shutdown Sequence
//!
//! 1. Ctrl+C
//! 2. `ServiceHost::stop_all` on a blocking thread (signal every service,
//!    then wait for every service)
//! 3. Join the worker threads

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, error, info, warn};

use svc_registry::{ServiceHost, ServiceRegistry};
use svc_runtime::{RuntimeConfig, Worker};
use svc_telemetry::{init_telemetry, PrometheusRecorder};

#[tokio::main]
async fn main() -> Result<()> {
    let config = RuntimeConfig::from_env();
    let telemetry =
        init_telemetry(config.telemetry.clone()).context("Failed to init telemetry")?;
    config.validate().context("Invalid runtime configuration")?;

    info!("===========================================");
    info!("  Service Runtime v{}", env!("CARGO_PKG_VERSION"));
    info!("===========================================");

    let registry = Arc::new(ServiceRegistry::with_metrics(Arc::new(PrometheusRecorder)));
    let host = Arc::new(ServiceHost::with_registry(registry, config.registry.clone()));

    let workers = start_workers(&host, &config)?;
    info!(
        services = host.registry().len(),
        methods = host.registry().list_methods().len(),
        "All workers registered"
    );

    let status = tokio::spawn(report_status(Arc::clone(&host), config.status_interval));

    info!("Runtime is running. Press Ctrl+C to stop.");
    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for Ctrl+C")?;

    info!("Initiating graceful shutdown...");
    status.abort();

    let stopping = Arc::clone(&host);
    let outcome = tokio::task::spawn_blocking(move || stopping.stop_all())
        .await
        .context("Shutdown task failed")?;

    match outcome {
        Ok(report) => {
            info!(stopped = report.stopped, elapsed = ?report.elapsed, "All services stopped");
            for worker in workers {
                let name = worker.name().to_string();
                match worker.join() {
                    Ok(ticks) => info!(worker = %name, ticks, "worker joined"),
                    Err(e) => error!(worker = %name, "{}", e),
                }
            }
        }
        // Stuck workers are left behind; the process exits anyway.
        Err(_) => warn!(workers = workers.len(), "Exiting without joining workers"),
    }

    match telemetry.metrics().encode() {
        Ok(metrics) => debug!("final metrics:\n{}", metrics),
        Err(e) => warn!("Failed to encode metrics: {}", e),
    }

    info!("Shutdown complete");
    Ok(())
}

/// Start every configured worker and register its service with the host.
fn start_workers(host: &ServiceHost, config: &RuntimeConfig) -> Result<Vec<Worker>> {
    let mut workers = Vec::with_capacity(config.workers.len());
    for spec in &config.workers {
        let worker = Worker::start(host, spec, config.heartbeat)
            .with_context(|| format!("Failed to start worker {}", spec.name))?;
        host.register(worker.service())
            .with_context(|| format!("Failed to register worker {}", spec.name))?;
        info!(worker = %spec.name, service = %worker.id(), "worker online");
        workers.push(worker);
    }
    Ok(workers)
}

/// Periodically log the registry contents as JSON.
async fn report_status(host: Arc<ServiceHost>, every: std::time::Duration) {
    let mut ticker = tokio::time::interval(every);
    ticker.tick().await;
    loop {
        ticker.tick().await;
        match serde_json::to_string(&host.registry().snapshot()) {
            Ok(snapshot) => info!(services = host.registry().len(), %snapshot, "registry status"),
            Err(e) => warn!("Failed to encode registry snapshot: {}", e),
        }
    }
}
