//! # Service Lifecycle
//!
//! Reference `ServiceControl` implementation shared between a running
//! worker and whoever wants to stop it.
//!
//! ```text
//! [Running] ──stop()──→ [Stopping] ──mark_stopped()──→ [Stopped]
//!     │                                                    ↑
//!     └──────────────── mark_stopped() ────────────────────┘
//! ```
//!
//! | Side | Calls |
//! |------|-------|
//! | Control (registry, host) | `stop`, `wait`, `wait_timeout`, `state` |
//! | Worker | `is_stop_requested`, `wait_for_stop_request`, `mark_stopped` |

use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::service::ServiceControl;

/// Lifecycle state of a service as seen by its control handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ServiceState {
    /// Running normally.
    Running,
    /// Stop requested, worker still winding down.
    Stopping,
    /// Fully stopped.
    Stopped,
}

/// Condvar-backed lifecycle handle.
#[derive(Debug)]
pub struct ServiceLifecycle {
    state: Mutex<ServiceState>,
    changed: Condvar,
}

impl ServiceLifecycle {
    /// Create a handle in the `Running` state.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Mutex::new(ServiceState::Running),
            changed: Condvar::new(),
        }
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> ServiceState {
        *self.state.lock()
    }

    /// True once `stop()` was called or the worker already stopped.
    #[must_use]
    pub fn is_stop_requested(&self) -> bool {
        *self.state.lock() != ServiceState::Running
    }

    /// Block the worker until stop is requested or `timeout` elapses.
    ///
    /// Returns `true` if stop was requested.
    pub fn wait_for_stop_request(&self, timeout: Duration) -> bool {
        let deadline = Instant::now().checked_add(timeout);
        let mut state = self.state.lock();
        while *state == ServiceState::Running {
            match deadline {
                Some(deadline) => {
                    if self.changed.wait_until(&mut state, deadline).timed_out() {
                        return *state != ServiceState::Running;
                    }
                }
                None => self.changed.wait(&mut state),
            }
        }
        true
    }

    /// Worker reports it has fully ceased activity.
    pub fn mark_stopped(&self) {
        let mut state = self.state.lock();
        *state = ServiceState::Stopped;
        self.changed.notify_all();
    }
}

impl Default for ServiceLifecycle {
    fn default() -> Self {
        Self::new()
    }
}

impl ServiceControl for ServiceLifecycle {
    fn stop(&self) {
        let mut state = self.state.lock();
        if *state == ServiceState::Running {
            *state = ServiceState::Stopping;
            trace!("stop requested");
            self.changed.notify_all();
        }
    }

    fn wait(&self) {
        let mut state = self.state.lock();
        while *state != ServiceState::Stopped {
            self.changed.wait(&mut state);
        }
    }

    fn wait_timeout(&self, timeout: Duration) -> bool {
        let Some(deadline) = Instant::now().checked_add(timeout) else {
            self.wait();
            return true;
        };
        let mut state = self.state.lock();
        while *state != ServiceState::Stopped {
            if self.changed.wait_until(&mut state, deadline).timed_out() {
                return *state == ServiceState::Stopped;
            }
        }
        true
    }
}
