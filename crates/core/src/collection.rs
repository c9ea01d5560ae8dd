//! De-duplicated ordered collections
//!
//! One engine serves both favorites and visit history. Entries are unique by key
//! and keep insertion order; the policy decides where new entries go and whether
//! the collection is capped.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::country::Country;

/// Maximum number of countries kept in the visit history.
pub const HISTORY_LIMIT: usize = 20;

/// Anything that can live in a [`Collection`]
pub trait Keyed {
    fn key(&self) -> &str;
}

impl Keyed for Country {
    fn key(&self) -> &str {
        Country::key(self)
    }
}

/// Insertion and eviction policy for a collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollectionPolicy {
    /// Append new keys at the end, never evict.
    Unbounded,
    /// Prepend new keys, keep at most `n` entries, evict from the tail.
    BoundedMostRecentFirst(usize),
}

impl CollectionPolicy {
    pub fn favorites() -> Self {
        CollectionPolicy::Unbounded
    }

    pub fn history() -> Self {
        CollectionPolicy::BoundedMostRecentFirst(HISTORY_LIMIT)
    }

    pub fn capacity(&self) -> Option<usize> {
        match self {
            CollectionPolicy::Unbounded => None,
            CollectionPolicy::BoundedMostRecentFirst(limit) => Some(*limit),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Collection<T> {
    policy: CollectionPolicy,
    entries: Vec<T>,
    keys: HashSet<String>,
}

impl<T: Keyed> Collection<T> {
    pub fn new(policy: CollectionPolicy) -> Self {
        Self {
            policy,
            entries: Vec::new(),
            keys: HashSet::new(),
        }
    }

    /// Rebuild a collection from persisted entries.
    ///
    /// Stored order is kept as-is. Duplicate keys keep their first occurrence and
    /// bounded collections are cut down to capacity from the tail.
    pub fn from_entries(policy: CollectionPolicy, entries: Vec<T>) -> Self {
        let mut collection = Self::new(policy);

        for entry in entries {
            if collection.keys.insert(entry.key().to_string()) {
                collection.entries.push(entry);
            }
        }
        collection.evict_overflow();

        collection
    }

    pub fn policy(&self) -> CollectionPolicy {
        self.policy
    }

    pub fn entries(&self) -> &[T] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    pub fn get(&self, key: &str) -> Option<&T> {
        if !self.contains(key) {
            return None;
        }
        self.entries.iter().find(|entry| entry.key() == key)
    }

    /// Insert `entry` unless its key is already present.
    ///
    /// A present key is left exactly where it is; revisiting a history entry does
    /// not move it to the front. Returns `true` when the collection changed.
    pub fn insert(&mut self, entry: T) -> bool {
        if self.contains(entry.key()) {
            return false;
        }

        match self.policy {
            CollectionPolicy::Unbounded => {
                self.keys.insert(entry.key().to_string());
                self.entries.push(entry);
                true
            }
            CollectionPolicy::BoundedMostRecentFirst(0) => false,
            CollectionPolicy::BoundedMostRecentFirst(_) => {
                self.keys.insert(entry.key().to_string());
                self.entries.insert(0, entry);
                self.evict_overflow();
                true
            }
        }
    }

    /// Remove the entry with `key`. Returns `true` when something was removed.
    pub fn remove(&mut self, key: &str) -> bool {
        if !self.keys.remove(key) {
            return false;
        }
        self.entries.retain(|entry| entry.key() != key);
        true
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.keys.clear();
    }

    fn evict_overflow(&mut self) {
        let Some(limit) = self.policy.capacity() else {
            return;
        };

        while self.entries.len() > limit {
            if let Some(evicted) = self.entries.pop() {
                self.keys.remove(evicted.key());
            }
        }
    }
}
