//! # Service Types Crate
//!
//! This crate contains the passive shapes the service registry stores and
//! hands back to callers.
//!
//! ## Design Principles
//!
//! - **Leaves first**: `Method` → `Service`; the registry builds on both.
//! - **Owned copies**: cloning a `Service` deep-copies its method set, so a
//!   copy handed out by the registry cannot change registry-owned data.
//! - **Shared control**: the `ServiceControl` handle is the running unit
//!   itself and is shared by every copy of a `Service`.

pub mod errors;
pub mod id_gen;
pub mod ids;
pub mod lifecycle;
pub mod method;
pub mod service;

pub use errors::TypeError;
pub use id_gen::{IdGenerator, SequentialIdGen, UuidIdGen};
pub use ids::{MethodId, ServiceId};
pub use lifecycle::{ServiceLifecycle, ServiceState};
pub use method::{Method, Methods};
pub use service::{Service, ServiceControl, ServiceInfo};
