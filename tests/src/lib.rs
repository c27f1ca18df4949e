//! # Service Registry Test Suite
//!
//! Unified test crate containing:
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! ├── benchmarks/       # Criterion benchmarks for the registry read/write paths
//! │   └── registry.rs
//! │
//! └── integration/      # Cross-crate flows
//!     ├── host_flows.rs # Host + registry membership and lookups
//!     ├── concurrency.rs# Randomized concurrent schedules
//!     └── shutdown.rs   # Two-phase shutdown with real workers and telemetry
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p svc-tests
//!
//! # By category
//! cargo test -p svc-tests integration::shutdown::
//!
//! # Benchmarks
//! cargo bench -p svc-tests
//! ```

pub mod benchmarks;

use std::sync::Arc;
use std::time::Duration;

use svc_registry::{RegistryError, ServiceHost};
use svc_types::{Method, Service, ServiceId, ServiceLifecycle, TypeError};

/// Register a service with the given id and method ids, returning its
/// lifecycle so tests can play the worker side.
pub fn register_named(
    host: &ServiceHost,
    id: &str,
    methods: &[&str],
) -> Result<Arc<ServiceLifecycle>, RegistryError> {
    let lifecycle = Arc::new(ServiceLifecycle::new());
    host.register(build_service(id, methods, &lifecycle)?)?;
    Ok(lifecycle)
}

/// Build a service whose method ids double as their names.
pub fn build_service(
    id: &str,
    methods: &[&str],
    lifecycle: &Arc<ServiceLifecycle>,
) -> Result<Service, TypeError> {
    let mut service = Service::new(ServiceId::from(id), lifecycle.clone());
    for name in methods {
        service.add_method(Method::new(*name, *name))?;
    }
    Ok(service)
}

/// Run the worker side of a lifecycle on its own thread: wait for the stop
/// request, hold `linger`, then report stopped.
pub fn spawn_worker(
    lifecycle: &Arc<ServiceLifecycle>,
    linger: Duration,
) -> std::thread::JoinHandle<()> {
    let lifecycle = Arc::clone(lifecycle);
    std::thread::spawn(move || {
        while !lifecycle.wait_for_stop_request(Duration::from_millis(5)) {}
        std::thread::sleep(linger);
        lifecycle.mark_stopped();
    })
}
