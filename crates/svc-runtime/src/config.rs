//! # Runtime Configuration
//!
//! Unified configuration for the registry, telemetry and the worker services
//! the binary hosts.
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `SVC_WORKERS` | `echo:ping,echo;clock:now` | `name:m1,m2;name2:m3` |
//! | `SVC_HEARTBEAT_MS` | `500` | Worker tick interval |
//! | `SVC_STATUS_INTERVAL_SECS` | `30` | Registry status log interval |
//!
//! Registry and telemetry variables are documented on their own configs.

use std::collections::HashSet;
use std::time::Duration;

use svc_registry::RegistryConfig;
use svc_telemetry::TelemetryConfig;
use thiserror::Error;
use tracing::warn;

/// Complete runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Registry configuration.
    pub registry: RegistryConfig,
    /// Logging and metrics configuration.
    pub telemetry: TelemetryConfig,
    /// Worker services to start.
    pub workers: Vec<WorkerSpec>,
    /// Worker tick interval.
    pub heartbeat: Duration,
    /// How often the registry snapshot is logged.
    pub status_interval: Duration,
}

/// A worker service and the method names it exposes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerSpec {
    pub name: String,
    pub methods: Vec<String>,
}

impl WorkerSpec {
    pub fn new(name: impl Into<String>, methods: &[&str]) -> Self {
        Self {
            name: name.into(),
            methods: methods.iter().map(|m| (*m).to_string()).collect(),
        }
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            registry: RegistryConfig::default(),
            telemetry: TelemetryConfig::default(),
            workers: vec![
                WorkerSpec::new("echo", &["ping", "echo"]),
                WorkerSpec::new("clock", &["now"]),
            ],
            heartbeat: Duration::from_millis(500),
            status_interval: Duration::from_secs(30),
        }
    }
}

impl RuntimeConfig {
    /// Load configuration from defaults overridden by the environment.
    ///
    /// Values that fail to parse are reported and the default is kept.
    pub fn from_env() -> Self {
        let mut config = Self {
            registry: RegistryConfig::from_env(),
            telemetry: TelemetryConfig::from_env(),
            ..Self::default()
        };

        if let Ok(raw) = std::env::var("SVC_WORKERS") {
            config.workers = parse_workers(&raw);
        }
        if let Some(ms) = env_u64("SVC_HEARTBEAT_MS") {
            config.heartbeat = Duration::from_millis(ms);
        }
        if let Some(secs) = env_u64("SVC_STATUS_INTERVAL_SECS") {
            config.status_interval = Duration::from_secs(secs);
        }

        config
    }

    /// Check the configuration before anything is started.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.heartbeat.is_zero() {
            return Err(ConfigError::ZeroInterval("heartbeat"));
        }
        if self.status_interval.is_zero() {
            return Err(ConfigError::ZeroInterval("status_interval"));
        }

        let mut names = HashSet::new();
        for worker in &self.workers {
            if worker.name.trim().is_empty() {
                return Err(ConfigError::EmptyWorkerName);
            }
            if !names.insert(worker.name.as_str()) {
                return Err(ConfigError::DuplicateWorker(worker.name.clone()));
            }

            let mut methods = HashSet::new();
            for method in &worker.methods {
                if method.trim().is_empty() {
                    return Err(ConfigError::EmptyMethodName(worker.name.clone()));
                }
                if !methods.insert(method.as_str()) {
                    return Err(ConfigError::DuplicateMethod {
                        worker: worker.name.clone(),
                        method: method.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}

/// Configuration errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("worker name must not be empty")]
    EmptyWorkerName,

    #[error("worker {0:?} configured more than once")]
    DuplicateWorker(String),

    #[error("worker {0:?} has an empty method name")]
    EmptyMethodName(String),

    #[error("worker {worker:?} lists method {method:?} more than once")]
    DuplicateMethod { worker: String, method: String },

    #[error("{0} must be greater than zero")]
    ZeroInterval(&'static str),
}

/// Parse `name:m1,m2;name2:m3`. Empty segments are skipped; names are kept
/// as written (trimmed) so `validate` can reject the bad ones.
fn parse_workers(raw: &str) -> Vec<WorkerSpec> {
    raw.split(';')
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(|segment| {
            let (name, methods) = segment.split_once(':').unwrap_or((segment, ""));
            WorkerSpec {
                name: name.trim().to_string(),
                methods: methods
                    .split(',')
                    .map(str::trim)
                    .filter(|m| !m.is_empty())
                    .map(str::to_string)
                    .collect(),
            }
        })
        .collect()
}

fn env_u64(key: &str) -> Option<u64> {
    let raw = std::env::var(key).ok()?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(key, value = %raw, "ignoring unparsable setting");
            None
        }
    }
}
