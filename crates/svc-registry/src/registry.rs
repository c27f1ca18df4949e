//! # Service Registry
//!
//! The single authoritative map from service id to service.
//!
//! ## Locking Discipline
//!
//! One `RwLock` guards the whole map:
//!
//! | Operation | Mode | Notes |
//! |-----------|------|-------|
//! | `lookup`, `list_all`, `list_methods`, `find_method` | shared | never queued behind a parked writer |
//! | `add`, `remove` | exclusive | the only membership changes |
//! | `stop_all`, `stop_all_within` | shared, for the whole drain | quiescence barrier |
//!
//! Holding a shared guard across the drain blocks `add`/`remove` until every
//! service stopped, while lookups and enumeration keep working against the
//! fixed membership.
//!
//! ## Two-Phase Shutdown
//!
//! ```text
//! ┌──────────┐  stop()  ┌──────────┐  wait()  ┌──────────┐
//! │registered│ ───────→ │ stopping │ ───────→ │ stopped  │
//! └──────────┘          └──────────┘          └──────────┘
//!
//! pass 1: stop() every service   (signal only)
//! pass 2: wait() every service   (blocking)
//! ```
//!
//! Signalling everything before waiting on anything lets services wind down
//! concurrently; the drain takes as long as the slowest service rather than
//! the sum of all of them.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::RwLock;
use svc_types::{Method, Service, ServiceId, ServiceInfo};
use tracing::{debug, info, trace, warn};

use crate::error::RegistryError;
use crate::metrics::{MetricsRecorder, NoOpMetrics};

/// Outcome of a completed coordinated shutdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShutdownReport {
    /// Services signalled and awaited.
    pub stopped: usize,
    /// Wall time of the whole drain.
    pub elapsed: Duration,
}

/// Concurrent registry of running services.
///
/// Read operations hand out owned copies; the registry never leaks a
/// reference to its own entries.
pub struct ServiceRegistry {
    services: RwLock<HashMap<ServiceId, Service>>,
    metrics: Arc<dyn MetricsRecorder>,
}

impl ServiceRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::with_metrics(Arc::new(NoOpMetrics))
    }

    /// Create an empty registry reporting to `metrics`.
    pub fn with_metrics(metrics: Arc<dyn MetricsRecorder>) -> Self {
        Self {
            services: RwLock::new(HashMap::new()),
            metrics,
        }
    }

    // =========================================================================
    // IDENTITY & LOOKUP
    // =========================================================================

    /// Copy of the service registered under `id`.
    pub fn lookup(&self, id: &ServiceId) -> Option<Service> {
        let found = self.services.read_recursive().get(id).cloned();
        self.metrics.record_lookup(found.is_some());
        found
    }

    /// Copies of every registered service, in unspecified order.
    pub fn list_all(&self) -> Vec<Service> {
        self.services.read_recursive().values().cloned().collect()
    }

    /// Every method of every registered service, flattened, in unspecified
    /// order.
    pub fn list_methods(&self) -> Vec<Method> {
        self.methods_with_owner()
            .into_iter()
            .map(|(_, method)| method)
            .collect()
    }

    /// Find a method by id across all services.
    ///
    /// A blank id never matches and is logged. If several services expose
    /// the same method id, the one owned by the greatest service id wins.
    pub fn find_method(&self, id: &str) -> Option<Method> {
        if id.trim().is_empty() {
            info!("trying to fetch method by illegal key");
            self.metrics.record_blank_method_query();
            return None;
        }

        self.methods_with_owner()
            .into_iter()
            .filter(|(_, method)| method.id.as_str() == id)
            .max_by(|(a, _), (b, _)| a.cmp(b))
            .map(|(_, method)| method)
    }

    fn methods_with_owner(&self) -> Vec<(ServiceId, Method)> {
        let services = self.services.read_recursive();
        services
            .values()
            .flat_map(|service| {
                service
                    .methods()
                    .iter()
                    .map(move |method| (service.id().clone(), method.clone()))
            })
            .collect()
    }

    /// Number of registered services.
    pub fn len(&self) -> usize {
        self.services.read_recursive().len()
    }

    /// True when nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.services.read_recursive().is_empty()
    }

    /// Check if a service is registered.
    pub fn contains(&self, id: &ServiceId) -> bool {
        self.services.read_recursive().contains_key(id)
    }

    /// All registered ids, sorted.
    pub fn service_ids(&self) -> Vec<ServiceId> {
        let mut ids: Vec<ServiceId> = self.services.read_recursive().keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Serializable view of every registered service, sorted by id.
    pub fn snapshot(&self) -> Vec<ServiceInfo> {
        let mut infos: Vec<ServiceInfo> = self
            .services
            .read_recursive()
            .values()
            .map(Service::info)
            .collect();
        infos.sort_by(|a, b| a.id.cmp(&b.id));
        infos
    }

    // =========================================================================
    // MUTATION
    // =========================================================================

    /// Register a service under its own id.
    ///
    /// The id must already be assigned; only its uniqueness is checked.
    pub(crate) fn add(&self, service: Service) -> Result<(), RegistryError> {
        let mut services = self.services.write();
        let id = service.id().clone();

        if services.contains_key(&id) {
            drop(services);
            debug!(service = %id, "rejecting duplicate service id");
            self.metrics.record_duplicate_rejected();
            return Err(RegistryError::DuplicateIdentifier { id });
        }

        services.insert(id.clone(), service);
        let registered = services.len();
        drop(services);

        debug!(service = %id, registered, "added service");
        self.metrics.record_added(registered);
        Ok(())
    }

    /// Detach a service from the registry. Does not stop it.
    pub(crate) fn remove(&self, id: &ServiceId) -> Result<Service, RegistryError> {
        debug!(service = %id, "removing service");

        let mut services = self.services.write();
        let Some(service) = services.remove(id) else {
            drop(services);
            self.metrics.record_remove_rejected();
            return Err(RegistryError::NotRegistered { id: id.clone() });
        };
        let registered = services.len();
        drop(services);

        trace!(service = %id, "removed service");
        self.metrics.record_removed(registered);
        Ok(service)
    }

    // =========================================================================
    // COORDINATED SHUTDOWN
    // =========================================================================

    /// Stop every registered service and block until all have stopped.
    ///
    /// Membership changes block for the whole call; reads do not. Services
    /// must not add or remove registry entries from inside `stop`/`wait`.
    pub fn stop_all(&self) -> Result<ShutdownReport, RegistryError> {
        self.drain(None)
    }

    /// Like [`stop_all`](Self::stop_all), but gives up waiting once
    /// `timeout` has elapsed overall.
    ///
    /// Every service is still signalled. Services that had not stopped by
    /// the deadline are listed in `RegistryError::ShutdownTimedOut`.
    pub fn stop_all_within(&self, timeout: Duration) -> Result<ShutdownReport, RegistryError> {
        self.drain(Some(timeout))
    }

    fn drain(&self, timeout: Option<Duration>) -> Result<ShutdownReport, RegistryError> {
        let started = Instant::now();
        // A deadline past what `Instant` can represent is no deadline at all
        let deadline = timeout.and_then(|t| started.checked_add(t));

        let services = self.services.read();
        info!(services = services.len(), ?timeout, "stopping all services");

        for service in services.values() {
            debug!(service = %service.id(), "stopping service");
            service.stop();
        }

        let mut pending = Vec::new();
        for service in services.values() {
            debug!(service = %service.id(), "waiting for service to stop");
            match deadline {
                None => service.wait(),
                Some(deadline) => {
                    let remaining = deadline.saturating_duration_since(Instant::now());
                    if !service.wait_timeout(remaining) {
                        warn!(service = %service.id(), "service did not stop before deadline");
                        pending.push(service.id().clone());
                    }
                }
            }
        }

        let stopped = services.len();
        drop(services);

        let elapsed = started.elapsed();
        self.metrics
            .record_shutdown(elapsed, stopped, !pending.is_empty());

        if let Some(timeout) = timeout.filter(|_| !pending.is_empty()) {
            pending.sort();
            return Err(RegistryError::ShutdownTimedOut { pending, timeout });
        }

        info!(stopped, ?elapsed, "all services stopped");
        Ok(ShutdownReport { stopped, elapsed })
    }
}

impl Default for ServiceRegistry {
    fn default() -> Self {
        Self::new()
    }
}
