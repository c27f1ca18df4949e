//! # Identifier Generation
//!
//! Generators that hand out service and method identifiers on request.
//!
//! The registry never trusts a generator for uniqueness: `add` still rejects
//! a duplicate id. Generators only make collisions unlikely (`UuidIdGen`) or
//! impossible within one generator instance (`SequentialIdGen`).

use std::sync::atomic::{AtomicU64, Ordering};

use uuid::Uuid;

use crate::errors::TypeError;

/// Source of fresh identifiers.
pub trait IdGenerator: Send + Sync {
    /// Produce the next identifier.
    fn next_id(&self) -> String;

    /// Prefix every produced identifier starts with.
    fn prefix(&self) -> &str;
}

fn validate_prefix(prefix: &str) -> Result<(), TypeError> {
    if prefix.trim().is_empty() || prefix.chars().any(char::is_whitespace) {
        return Err(TypeError::InvalidIdPrefix(prefix.to_string()));
    }
    Ok(())
}

/// Monotonic generator: `<prefix>-1`, `<prefix>-2`, ...
#[derive(Debug)]
pub struct SequentialIdGen {
    prefix: String,
    counter: AtomicU64,
}

impl SequentialIdGen {
    /// Create a generator for the given prefix.
    ///
    /// # Errors
    ///
    /// - `TypeError::InvalidIdPrefix` - prefix is blank or contains whitespace
    pub fn new(prefix: impl Into<String>) -> Result<Self, TypeError> {
        let prefix = prefix.into();
        validate_prefix(&prefix)?;
        Ok(Self {
            prefix,
            counter: AtomicU64::new(0),
        })
    }

    /// Number of identifiers handed out so far.
    #[must_use]
    pub fn issued(&self) -> u64 {
        self.counter.load(Ordering::Relaxed)
    }
}

impl IdGenerator for SequentialIdGen {
    fn next_id(&self) -> String {
        let n = self.counter.fetch_add(1, Ordering::Relaxed) + 1;
        format!("{}-{}", self.prefix, n)
    }

    fn prefix(&self) -> &str {
        &self.prefix
    }
}

/// Random generator: `<prefix>-<uuid v4>`.
#[derive(Debug, Clone)]
pub struct UuidIdGen {
    prefix: String,
}

impl UuidIdGen {
    /// Create a generator for the given prefix.
    ///
    /// # Errors
    ///
    /// - `TypeError::InvalidIdPrefix` - prefix is blank or contains whitespace
    pub fn new(prefix: impl Into<String>) -> Result<Self, TypeError> {
        let prefix = prefix.into();
        validate_prefix(&prefix)?;
        Ok(Self { prefix })
    }
}

impl IdGenerator for UuidIdGen {
    fn next_id(&self) -> String {
        format!("{}-{}", self.prefix, Uuid::new_v4())
    }

    fn prefix(&self) -> &str {
        &self.prefix
    }
}
