//! Keyed state: one instance of a reducer's state per instance key.

use std::borrow::Borrow;

use im::OrdMap;
use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_INSTANCE_KEY;

/// Persistent map from instance key to per-instance state.
///
/// Cloning is cheap and updates return a new map that shares every untouched
/// entry with the old one. Entries are never removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
#[serde(bound(serialize = "S: Serialize + Clone", deserialize = "S: Deserialize<'de> + Clone"))]
pub struct KeyedState<S: Clone> {
    instances: OrdMap<String, S>,
}

impl<S: Clone> Default for KeyedState<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Clone> KeyedState<S> {
    pub fn new() -> Self {
        Self {
            instances: OrdMap::new(),
        }
    }

    pub fn get<K>(&self, key: &K) -> Option<&S>
    where
        String: Borrow<K>,
        K: Ord + ?Sized,
    {
        self.instances.get(key)
    }

    /// The `"default"` slot, present after the first dispatch.
    pub fn default_instance(&self) -> Option<&S> {
        self.instances.get(DEFAULT_INSTANCE_KEY)
    }

    pub fn contains_key<K>(&self, key: &K) -> bool
    where
        String: Borrow<K>,
        K: Ord + ?Sized,
    {
        self.instances.contains_key(key)
    }

    /// Returns a new state with `key` set to `value`.
    pub fn set(&self, key: impl Into<String>, value: S) -> Self {
        Self {
            instances: self.instances.update(key.into(), value),
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.instances.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &S)> {
        self.instances.iter()
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// True when both states share the same underlying tree.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        self.instances.ptr_eq(&other.instances)
    }

    pub(crate) fn map_instances<F>(&self, mut f: F) -> Self
    where
        F: FnMut(&str, &S) -> S,
    {
        Self {
            instances: self
                .instances
                .iter()
                .map(|(key, value)| (key.clone(), f(key.as_str(), value)))
                .collect(),
        }
    }
}

impl<S: Clone, K: Into<String>> FromIterator<(K, S)> for KeyedState<S> {
    fn from_iter<I: IntoIterator<Item = (K, S)>>(iter: I) -> Self {
        Self {
            instances: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

impl<S: Clone> From<OrdMap<String, S>> for KeyedState<S> {
    fn from(instances: OrdMap<String, S>) -> Self {
        Self { instances }
    }
}
