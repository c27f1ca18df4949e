//! # Service Registry
//!
//! Concurrent in-memory registry tracking a set of independently running
//! services and the methods they expose.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                        ServiceHost                              │
//! │   id generators ── register / deregister ── stop_all (once)     │
//! │                            │                                    │
//! │                            ▼                                    │
//! │  ┌───────────────────────────────────────────────────────────┐  │
//! │  │ ServiceRegistry   RwLock<HashMap<ServiceId, Service>>     │  │
//! │  │   shared:    lookup  list_all  list_methods  find_method  │  │
//! │  │   exclusive: add  remove                                  │  │
//! │  │   shared (held for the drain): stop_all                   │  │
//! │  └───────────────────────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **Identity**: at most one service per id; duplicates are rejected.
//! - **Copy-out reads**: lookups and enumeration return owned copies.
//! - **Quiescence barrier**: shutdown blocks membership changes, not reads.
//! - **Two-phase shutdown**: signal every service, then wait on every service.

// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod config;
pub mod error;
pub mod host;
pub mod metrics;
pub mod registry;

// Re-export main types
pub use config::RegistryConfig;
pub use error::RegistryError;
pub use host::{ServiceHost, METHOD_ID_PREFIX, SERVICE_ID_PREFIX};
pub use metrics::{Metrics, MetricsRecorder, MetricsSnapshot, NoOpMetrics};
pub use registry::{ServiceRegistry, ShutdownReport};
