//! # Service - Managed Unit of Work
//!
//! A service owns a method set and a control handle. The registry stores
//! services, hands out copies, and drives their shutdown through the
//! control handle.
//!
//! ## Copy Semantics
//!
//! `Service: Clone` deep-copies the method set: editing a copy never
//! reaches the registry's entry. The control handle is shared between all
//! copies because it *is* the running unit; stopping any copy stops the unit.
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use svc_types::{Method, Service, ServiceLifecycle};
//!
//! let lifecycle = Arc::new(ServiceLifecycle::new());
//! let service = Service::new("svc-a", lifecycle.clone())
//!     .with_method(Method::new("m1", "ping"))?
//!     .with_method(Method::new("m2", "pong"))?;
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::errors::TypeError;
use crate::ids::{MethodId, ServiceId};
use crate::method::{Method, Methods};

/// Contract every service must honour to be tracked by the registry.
pub trait ServiceControl: Send + Sync {
    /// Signal the service to begin shutting down.
    ///
    /// Must not block materially. Repeated calls should be harmless.
    fn stop(&self);

    /// Block until the service has fully stopped.
    fn wait(&self);

    /// Block until the service has fully stopped or `timeout` elapsed.
    ///
    /// Returns `true` if the service stopped. The default falls back to an
    /// unbounded `wait()`.
    fn wait_timeout(&self, timeout: Duration) -> bool {
        let _ = timeout;
        self.wait();
        true
    }
}

/// A registered unit of work.
#[derive(Clone)]
pub struct Service {
    id: ServiceId,
    methods: Methods,
    control: Arc<dyn ServiceControl>,
}

impl Service {
    /// Create a service with no methods.
    pub fn new(id: impl Into<ServiceId>, control: Arc<dyn ServiceControl>) -> Self {
        Self {
            id: id.into(),
            methods: Methods::new(),
            control,
        }
    }

    /// Builder-style `add_method`.
    ///
    /// # Errors
    ///
    /// - `TypeError::DuplicateMethod` - method id already present
    pub fn with_method(mut self, method: Method) -> Result<Self, TypeError> {
        self.add_method(method)?;
        Ok(self)
    }

    /// Add a method to this service's method set.
    ///
    /// # Errors
    ///
    /// - `TypeError::DuplicateMethod` - method id already present
    pub fn add_method(&mut self, method: Method) -> Result<(), TypeError> {
        let method_id = method.id.clone();
        if !self.methods.insert(method) {
            return Err(TypeError::DuplicateMethod {
                service: self.id.clone(),
                method: method_id,
            });
        }
        Ok(())
    }

    /// Remove a method from this service's method set.
    pub fn remove_method(&mut self, id: &MethodId) -> Option<Method> {
        self.methods.remove(id)
    }

    #[must_use]
    pub fn id(&self) -> &ServiceId {
        &self.id
    }

    #[must_use]
    pub fn methods(&self) -> &Methods {
        &self.methods
    }

    #[must_use]
    pub fn method(&self, id: &MethodId) -> Option<&Method> {
        self.methods.get(id)
    }

    /// Shared control handle of the running unit.
    #[must_use]
    pub fn control(&self) -> &Arc<dyn ServiceControl> {
        &self.control
    }

    /// Signal shutdown.
    pub fn stop(&self) {
        self.control.stop();
    }

    /// Block until fully stopped.
    pub fn wait(&self) {
        self.control.wait();
    }

    /// Block until fully stopped or `timeout` elapsed.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        self.control.wait_timeout(timeout)
    }

    /// Serializable snapshot of the descriptive data.
    #[must_use]
    pub fn info(&self) -> ServiceInfo {
        let mut methods: Vec<Method> = self.methods.iter().cloned().collect();
        methods.sort_by(|a, b| a.id.cmp(&b.id));
        ServiceInfo {
            id: self.id.clone(),
            methods,
        }
    }
}

impl fmt::Debug for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Service")
            .field("id", &self.id)
            .field("methods", &self.methods.ids())
            .finish_non_exhaustive()
    }
}

/// Metadata about a service for status dumps and monitoring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceInfo {
    /// Service identity.
    pub id: ServiceId,
    /// Methods sorted by id.
    pub methods: Vec<Method>,
}
