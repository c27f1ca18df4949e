//! # Error Types
//!
//! Errors raised while building services and generating identifiers.

use crate::ids::{MethodId, ServiceId};
use thiserror::Error;

/// Errors from constructing service shapes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypeError {
    /// A method with the same id already belongs to the service.
    #[error("Service {service} already exposes method {method}")]
    DuplicateMethod { service: ServiceId, method: MethodId },

    /// Identifier generator prefix is blank or contains whitespace.
    #[error("Invalid identifier prefix: {0:?}")]
    InvalidIdPrefix(String),
}
