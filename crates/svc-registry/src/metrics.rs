//! Metrics hooks for registry operations
//!
//! Provides instrumentation points for monitoring membership churn, read
//! hit rates and shutdown latency.
//!
//! ## Usage
//!
//! ```ignore
//! use std::sync::Arc;
//! use svc_registry::{Metrics, ServiceRegistry};
//!
//! let metrics = Arc::new(Metrics::new());
//! let registry = ServiceRegistry::with_metrics(metrics.clone());
//!
//! // ... registry in use ...
//!
//! let snapshot = metrics.snapshot();
//! println!("lookups: {} hits / {} total", snapshot.lookup_hits, snapshot.lookups);
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Trait for custom metrics recording implementations
///
/// Implement this trait to integrate with external metrics systems
/// like Prometheus or StatsD.
pub trait MetricsRecorder: Send + Sync {
    /// A service was added. `registered` is the membership count afterwards.
    fn record_added(&self, registered: usize);

    /// An add was rejected because the id was taken.
    fn record_duplicate_rejected(&self);

    /// A service was removed. `registered` is the membership count afterwards.
    fn record_removed(&self, registered: usize);

    /// A remove was rejected because the id was unknown.
    fn record_remove_rejected(&self);

    /// A point lookup completed.
    fn record_lookup(&self, hit: bool);

    /// A method query with a blank key was ignored.
    fn record_blank_method_query(&self);

    /// A coordinated shutdown finished.
    fn record_shutdown(&self, duration: Duration, services: usize, timed_out: bool);
}

/// No-op metrics recorder for when metrics are disabled
#[derive(Default)]
pub struct NoOpMetrics;

impl MetricsRecorder for NoOpMetrics {
    fn record_added(&self, _: usize) {}
    fn record_duplicate_rejected(&self) {}
    fn record_removed(&self, _: usize) {}
    fn record_remove_rejected(&self) {}
    fn record_lookup(&self, _: bool) {}
    fn record_blank_method_query(&self) {}
    fn record_shutdown(&self, _: Duration, _: usize, _: bool) {}
}

/// In-process metrics collector
///
/// Thread-safe counters for tests and diagnostics.
#[derive(Default)]
pub struct Metrics {
    /// Successful adds
    pub added: AtomicU64,
    /// Adds rejected as duplicates
    pub duplicates_rejected: AtomicU64,
    /// Successful removes
    pub removed: AtomicU64,
    /// Removes of unknown ids
    pub removes_rejected: AtomicU64,
    /// Point lookups performed
    pub lookups: AtomicU64,
    /// Point lookups that found a service
    pub lookup_hits: AtomicU64,
    /// Blank method queries ignored
    pub blank_method_queries: AtomicU64,
    /// Current membership
    pub registered: AtomicU64,
    /// Completed shutdowns
    pub shutdowns: AtomicU64,
    /// Shutdowns that hit their deadline
    pub shutdown_timeouts: AtomicU64,
    /// Duration of the last shutdown in nanoseconds
    pub last_shutdown_ns: AtomicU64,
}

impl Metrics {
    /// Create a new metrics collector
    pub fn new() -> Self {
        Self::default()
    }

    /// Get current metrics snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            added: self.added.load(Ordering::Relaxed),
            duplicates_rejected: self.duplicates_rejected.load(Ordering::Relaxed),
            removed: self.removed.load(Ordering::Relaxed),
            removes_rejected: self.removes_rejected.load(Ordering::Relaxed),
            lookups: self.lookups.load(Ordering::Relaxed),
            lookup_hits: self.lookup_hits.load(Ordering::Relaxed),
            blank_method_queries: self.blank_method_queries.load(Ordering::Relaxed),
            registered: self.registered.load(Ordering::Relaxed),
            shutdowns: self.shutdowns.load(Ordering::Relaxed),
            shutdown_timeouts: self.shutdown_timeouts.load(Ordering::Relaxed),
            last_shutdown: Duration::from_nanos(self.last_shutdown_ns.load(Ordering::Relaxed)),
        }
    }

    /// Ratio of lookups that found a service
    pub fn lookup_hit_rate(&self) -> f64 {
        let total = self.lookups.load(Ordering::Relaxed);
        let hits = self.lookup_hits.load(Ordering::Relaxed);
        if total > 0 {
            hits as f64 / total as f64
        } else {
            0.0
        }
    }
}

impl MetricsRecorder for Metrics {
    fn record_added(&self, registered: usize) {
        self.added.fetch_add(1, Ordering::Relaxed);
        self.registered.store(registered as u64, Ordering::Relaxed);
    }

    fn record_duplicate_rejected(&self) {
        self.duplicates_rejected.fetch_add(1, Ordering::Relaxed);
    }

    fn record_removed(&self, registered: usize) {
        self.removed.fetch_add(1, Ordering::Relaxed);
        self.registered.store(registered as u64, Ordering::Relaxed);
    }

    fn record_remove_rejected(&self) {
        self.removes_rejected.fetch_add(1, Ordering::Relaxed);
    }

    fn record_lookup(&self, hit: bool) {
        self.lookups.fetch_add(1, Ordering::Relaxed);
        if hit {
            self.lookup_hits.fetch_add(1, Ordering::Relaxed);
        }
    }

    fn record_blank_method_query(&self) {
        self.blank_method_queries.fetch_add(1, Ordering::Relaxed);
    }

    fn record_shutdown(&self, duration: Duration, _services: usize, timed_out: bool) {
        self.shutdowns.fetch_add(1, Ordering::Relaxed);
        if timed_out {
            self.shutdown_timeouts.fetch_add(1, Ordering::Relaxed);
        }
        let nanos = u64::try_from(duration.as_nanos()).unwrap_or(u64::MAX);
        self.last_shutdown_ns.store(nanos, Ordering::Relaxed);
    }
}

/// Point-in-time metrics snapshot
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MetricsSnapshot {
    pub added: u64,
    pub duplicates_rejected: u64,
    pub removed: u64,
    pub removes_rejected: u64,
    pub lookups: u64,
    pub lookup_hits: u64,
    pub blank_method_queries: u64,
    pub registered: u64,
    pub shutdowns: u64,
    pub shutdown_timeouts: u64,
    pub last_shutdown: Duration,
}
