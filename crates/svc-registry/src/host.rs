//! # Service Host - Owning Orchestrator
//!
//! The one place allowed to change registry membership. It owns the
//! identifier generators for services and methods, registers and
//! deregisters services, and exposes the once-per-process shutdown entry
//! point.
//!
//! ## Usage
//!
//! ```rust,ignore
//! let host = ServiceHost::new(RegistryConfig::from_env());
//!
//! let lifecycle = Arc::new(ServiceLifecycle::new());
//! let service = Service::new(host.next_service_id(), lifecycle.clone())
//!     .with_method(host.method("ping"))?;
//! host.register(service)?;
//!
//! // Readers go through the registry
//! let methods = host.registry().list_methods();
//!
//! // Later: graceful shutdown, exactly once
//! host.stop_all();
//! ```

use std::sync::Arc;

use svc_types::{IdGenerator, Method, MethodId, SequentialIdGen, Service, ServiceId};
use tracing::{error, info};

use crate::config::RegistryConfig;
use crate::error::RegistryError;
use crate::registry::{ServiceRegistry, ShutdownReport};

/// Prefix for generated service ids.
pub const SERVICE_ID_PREFIX: &str = "service";

/// Prefix for generated method ids.
pub const METHOD_ID_PREFIX: &str = "method";

/// Explicitly constructed context object around the process's registry.
pub struct ServiceHost {
    registry: Arc<ServiceRegistry>,
    service_ids: Arc<dyn IdGenerator>,
    method_ids: Arc<dyn IdGenerator>,
    config: RegistryConfig,
}

impl ServiceHost {
    /// Create a host with an empty registry and sequential id generators.
    pub fn new(config: RegistryConfig) -> Self {
        Self::with_registry(Arc::new(ServiceRegistry::new()), config)
    }

    /// Create a host around an existing (typically instrumented) registry.
    pub fn with_registry(registry: Arc<ServiceRegistry>, config: RegistryConfig) -> Self {
        Self {
            registry,
            service_ids: Arc::new(sequential(SERVICE_ID_PREFIX)),
            method_ids: Arc::new(sequential(METHOD_ID_PREFIX)),
            config,
        }
    }

    /// Replace the identifier generators.
    #[must_use]
    pub fn with_id_generators(
        mut self,
        service_ids: Arc<dyn IdGenerator>,
        method_ids: Arc<dyn IdGenerator>,
    ) -> Self {
        self.service_ids = service_ids;
        self.method_ids = method_ids;
        self
    }

    /// Read access to the registry.
    pub fn registry(&self) -> &Arc<ServiceRegistry> {
        &self.registry
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Fresh service id. Uniqueness is still enforced at `register`.
    pub fn next_service_id(&self) -> ServiceId {
        ServiceId::new(self.service_ids.next_id())
    }

    /// Fresh method id.
    pub fn next_method_id(&self) -> MethodId {
        MethodId::new(self.method_ids.next_id())
    }

    /// Build a method with a generated id.
    pub fn method(&self, name: impl Into<String>) -> Method {
        Method::new(self.next_method_id(), name)
    }

    /// Add a service to the registry.
    ///
    /// # Errors
    ///
    /// - `RegistryError::DuplicateIdentifier` - id already registered
    pub fn register(&self, service: Service) -> Result<ServiceId, RegistryError> {
        let id = service.id().clone();
        let methods = service.methods().len();
        self.registry.add(service)?;
        info!(service = %id, methods, "registered service");
        Ok(id)
    }

    /// Detach a service from the registry without stopping it.
    ///
    /// # Errors
    ///
    /// - `RegistryError::NotRegistered` - id unknown
    pub fn deregister(&self, id: &ServiceId) -> Result<Service, RegistryError> {
        self.registry.remove(id)
    }

    /// Stop everything and block until it has stopped.
    ///
    /// Intended to run exactly once during graceful shutdown. Applies the
    /// configured deadline, if any. Failures are logged here; the outcome is
    /// returned for callers that want it.
    pub fn stop_all(&self) -> Result<ShutdownReport, RegistryError> {
        let result = match self.config.shutdown_timeout {
            Some(timeout) => self.registry.stop_all_within(timeout),
            None => self.registry.stop_all(),
        };

        if let Err(e) = &result {
            error!("{}", e);
        }
        result
    }
}

fn sequential(prefix: &'static str) -> SequentialIdGen {
    match SequentialIdGen::new(prefix) {
        Ok(gen) => gen,
        Err(e) => unreachable!("built-in id prefix {prefix:?} rejected: {e}"),
    }
}
