//! Thread-backed worker services.
//!
//! Each worker runs on its own OS thread and reports its lifecycle through a
//! [`ServiceLifecycle`]: it ticks on the heartbeat until a stop is requested,
//! then marks itself stopped. The registry only ever sees the [`Service`]
//! built around that lifecycle.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use svc_registry::ServiceHost;
use svc_types::{Service, ServiceId, ServiceLifecycle, TypeError};
use thiserror::Error;
use tracing::{debug, trace};

use crate::config::WorkerSpec;

/// Worker errors.
#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("invalid worker definition: {0}")]
    Definition(#[from] TypeError),

    #[error("failed to spawn worker thread {name}: {source}")]
    Spawn {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("worker thread {0} panicked")]
    Panicked(String),
}

/// A running worker service.
pub struct Worker {
    name: String,
    service: Service,
    lifecycle: Arc<ServiceLifecycle>,
    ticks: Arc<AtomicU64>,
    handle: Option<JoinHandle<()>>,
}

impl Worker {
    /// Build the worker's service (ids from the host) and start its thread.
    ///
    /// The service is not registered; that is left to the caller.
    pub fn start(
        host: &ServiceHost,
        spec: &WorkerSpec,
        heartbeat: Duration,
    ) -> Result<Self, WorkerError> {
        let lifecycle = Arc::new(ServiceLifecycle::new());

        let mut service = Service::new(host.next_service_id(), lifecycle.clone());
        for name in &spec.methods {
            service.add_method(host.method(name.as_str()))?;
        }

        let ticks = Arc::new(AtomicU64::new(0));
        let handle = {
            let lifecycle = Arc::clone(&lifecycle);
            let ticks = Arc::clone(&ticks);
            let id = service.id().clone();
            std::thread::Builder::new()
                .name(format!("svc-{}", spec.name))
                .spawn(move || run(&id, &lifecycle, &ticks, heartbeat))
                .map_err(|source| WorkerError::Spawn {
                    name: spec.name.clone(),
                    source,
                })?
        };

        debug!(worker = %spec.name, service = %service.id(), "worker started");

        Ok(Self {
            name: spec.name.clone(),
            service,
            lifecycle,
            ticks,
            handle: Some(handle),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn id(&self) -> &ServiceId {
        self.service.id()
    }

    /// The service to hand to the registry.
    pub fn service(&self) -> Service {
        self.service.clone()
    }

    pub fn lifecycle(&self) -> &Arc<ServiceLifecycle> {
        &self.lifecycle
    }

    /// Heartbeats completed so far.
    pub fn ticks(&self) -> u64 {
        self.ticks.load(Ordering::Relaxed)
    }

    /// Join the thread and return the final tick count.
    ///
    /// Blocks until the worker has been asked to stop and has exited.
    pub fn join(mut self) -> Result<u64, WorkerError> {
        if let Some(handle) = self.handle.take() {
            handle
                .join()
                .map_err(|_| WorkerError::Panicked(self.name.clone()))?;
        }
        Ok(self.ticks())
    }
}

fn run(id: &ServiceId, lifecycle: &ServiceLifecycle, ticks: &AtomicU64, heartbeat: Duration) {
    while !lifecycle.wait_for_stop_request(heartbeat) {
        let n = ticks.fetch_add(1, Ordering::Relaxed) + 1;
        trace!(service = %id, tick = n, "heartbeat");
    }
    debug!(service = %id, ticks = ticks.load(Ordering::Relaxed), "worker stopping");
    lifecycle.mark_stopped();
}
