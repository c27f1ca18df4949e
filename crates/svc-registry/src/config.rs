//! Registry configuration.

use std::time::Duration;

/// Tunables for the registry and its host.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistryConfig {
    /// Overall deadline for the coordinated shutdown.
    ///
    /// `None` waits for every service without limit.
    pub shutdown_timeout: Option<Duration>,
}

impl RegistryConfig {
    /// Environment variable holding the shutdown deadline in whole seconds.
    pub const SHUTDOWN_TIMEOUT_ENV: &'static str = "SVC_SHUTDOWN_TIMEOUT_SECS";

    /// Bounded shutdown configuration.
    #[must_use]
    pub fn with_shutdown_timeout(timeout: Duration) -> Self {
        Self {
            shutdown_timeout: Some(timeout),
        }
    }

    /// Load from environment variables.
    ///
    /// `SVC_SHUTDOWN_TIMEOUT_SECS` of `0`, or a value that does not parse,
    /// leaves shutdown unbounded.
    pub fn from_env() -> Self {
        let raw = std::env::var(Self::SHUTDOWN_TIMEOUT_ENV).ok();
        Self::from_timeout_value(raw.as_deref())
    }

    fn from_timeout_value(raw: Option<&str>) -> Self {
        let shutdown_timeout = raw
            .and_then(|v| v.trim().parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs);

        Self { shutdown_timeout }
    }
}
