//! # Methods
//!
//! A method is a named capability belonging to exactly one service. The
//! registry only cares about its identity; `name` is descriptive.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::ids::MethodId;

/// A capability exposed by a service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Method {
    /// Identity, unique within the owning service.
    pub id: MethodId,
    /// Human-readable capability name.
    pub name: String,
}

impl Method {
    /// Create a method.
    pub fn new(id: impl Into<MethodId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// A service's method set, keyed by method id.
///
/// Insertion order is irrelevant. Cloning copies every method.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Methods {
    list: HashMap<MethodId, Method>,
}

impl Methods {
    /// Create an empty method set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a method. Returns `false` and leaves the set untouched if a
    /// method with the same id is already present.
    pub fn insert(&mut self, method: Method) -> bool {
        if self.list.contains_key(&method.id) {
            return false;
        }
        self.list.insert(method.id.clone(), method);
        true
    }

    /// Remove a method by id.
    pub fn remove(&mut self, id: &MethodId) -> Option<Method> {
        self.list.remove(id)
    }

    /// Get a method by id.
    #[must_use]
    pub fn get(&self, id: &MethodId) -> Option<&Method> {
        self.list.get(id)
    }

    #[must_use]
    pub fn contains(&self, id: &MethodId) -> bool {
        self.list.contains_key(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.list.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// Iterate over the methods in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = &Method> {
        self.list.values()
    }

    /// All method ids in unspecified order.
    #[must_use]
    pub fn ids(&self) -> Vec<MethodId> {
        self.list.keys().cloned().collect()
    }
}

impl FromIterator<Method> for Methods {
    /// Later duplicates are dropped.
    fn from_iter<I: IntoIterator<Item = Method>>(iter: I) -> Self {
        let mut methods = Self::new();
        for method in iter {
            methods.insert(method);
        }
        methods
    }
}
