//! IndexTable implementation
//!
//! BTreeMap-backed so snapshots come out in key order.

use std::collections::BTreeMap;

use crate::storage::RecordLocation;

/// In-memory index: key → record location
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexTable {
    entries: BTreeMap<String, RecordLocation>,
}

impl IndexTable {
    /// Create a new empty index
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Location of `key`'s record, if the key is present
    pub fn lookup(&self, key: &str) -> Option<RecordLocation> {
        self.entries.get(key).copied()
    }

    /// Insert or replace the location of `key`
    ///
    /// Returns the previous location, if any.
    pub fn put(&mut self, key: impl Into<String>, location: RecordLocation) -> Option<RecordLocation> {
        self.entries.insert(key.into(), location)
    }

    /// Drop `key`; its record becomes dead space
    pub fn remove(&mut self, key: &str) -> Option<RecordLocation> {
        self.entries.remove(key)
    }

    /// Keep only the entries for which `keep` returns `true`
    ///
    /// Returns the number of entries dropped.
    pub fn retain(&mut self, mut keep: impl FnMut(&str, &RecordLocation) -> bool) -> usize {
        let before = self.entries.len();
        self.entries.retain(|key, location| keep(key, location));
        before - self.entries.len()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in ascending key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &RecordLocation)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Owned copy of all entries in ascending key order
    pub fn snapshot(&self) -> Vec<(String, RecordLocation)> {
        self.entries
            .iter()
            .map(|(k, v)| (k.clone(), *v))
            .collect()
    }

    /// Bytes of the medium owned by live records
    pub fn live_bytes(&self) -> u64 {
        self.entries.values().map(|loc| loc.reserved_len()).sum()
    }
}
