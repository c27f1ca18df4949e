//! # Service Runtime Library
//!
//! Building blocks of the `svc-runtime` binary, exposed for testing.
//!
//! - `config` - runtime configuration from defaults and environment
//! - `worker` - thread-backed demo services driven by a `ServiceLifecycle`

pub mod config;
pub mod worker;

pub use config::{ConfigError, RuntimeConfig, WorkerSpec};
pub use worker::{Worker, WorkerError};
