//! Error types for the service registry

use std::time::Duration;

use svc_types::{ServiceId, TypeError};
use thiserror::Error;

/// Errors that can occur in registry operations.
///
/// Absence on read paths (`lookup`, `find_method`) is not an error; those
/// return `None`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// `add` with an id that is already registered. Registry unchanged.
    #[error("Service {id} must have a unique id: already registered")]
    DuplicateIdentifier { id: ServiceId },

    /// `remove` with an id that is not registered. Registry unchanged.
    #[error("Service {id} not registered, cannot be removed")]
    NotRegistered { id: ServiceId },

    /// Bounded shutdown gave up on services that had not stopped.
    #[error("Shutdown timed out after {timeout:?}: {} service(s) still stopping", pending.len())]
    ShutdownTimedOut {
        pending: Vec<ServiceId>,
        timeout: Duration,
    },

    /// Invalid service shape.
    #[error("Invalid service: {0}")]
    Service(#[from] TypeError),
}
