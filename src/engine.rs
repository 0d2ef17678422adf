//! Engine Module
//!
//! The store facade that composes the index and the record medium.
//!
//! ## Responsibilities
//! - Load the index on open, save it on close
//! - Implement insert/delete/find on top of `RecordStore::commit`
//! - Keep the index in step with every location change, within the same call
//! - Offline compaction and space statistics

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::error::{Result, SetKvError};
use crate::index::{IndexFile, IndexTable};
use crate::protocol::{Command, Response};
use crate::set::SortedSet;
use crate::storage::{self, CompactionStats, RecordLocation, RecordStore};

/// Space usage of the medium
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreStats {
    /// Keys with a non-empty set
    pub keys: usize,
    /// Bytes reserved by live records
    pub live_bytes: u64,
    /// Size of the medium file
    pub medium_bytes: u64,
    /// Bytes of abandoned records
    pub dead_bytes: u64,
}

/// The main store
///
/// ## Key lifecycle
/// `Absent → Present(non-empty) → Absent`. Only present keys have an index
/// entry; a set that empties is dropped from the index and its record
/// becomes dead space.
///
/// Mutating operations take `&mut self`: one writer, no locks.
pub struct Engine {
    /// Engine configuration
    config: Config,

    /// Where each key's record lives
    index: IndexTable,

    /// The record medium
    records: RecordStore,

    /// Side file the index is saved to
    index_path: PathBuf,

    /// Medium size as of the last write this engine made
    medium_len: u64,
}

impl Engine {
    /// Open or create a store with the given config
    ///
    /// On startup:
    /// 1. Create the data directory
    /// 2. Open/create the record medium
    /// 3. Load the index side file (empty if missing or unusable)
    /// 4. Drop index entries that point past the end of the medium
    pub fn open(config: Config) -> Result<Self> {
        config.validate()?;

        // Step 1: Create data directory if it doesn't exist
        fs::create_dir_all(&config.data_dir)?;

        // Step 2: Open record medium (creating it is fatal on failure)
        let records = RecordStore::open(&config.data_path(), config.record_slack)?;

        // Step 3: Load index
        let index = IndexFile::load(&config.index_path());

        // Step 4: Reconcile index with the medium
        let engine = Self::from_parts(config, index, records)?;

        tracing::info!(
            data_dir = %engine.config.data_dir.display(),
            keys = engine.index.len(),
            "Store opened"
        );

        Ok(engine)
    }

    /// Open with a path (convenience method)
    ///
    /// Uses default config with the specified data directory
    pub fn open_path(path: &Path) -> Result<Self> {
        let config = Config::builder().data_dir(path).build();
        Self::open(config)
    }

    /// Assemble an engine from an already loaded index and medium
    ///
    /// Index entries whose record extends past the end of the medium are
    /// dropped.
    pub fn from_parts(config: Config, mut index: IndexTable, records: RecordStore) -> Result<Self> {
        let medium_len = records.len()?;
        let dropped = index.retain(|_, location| location.end() <= medium_len);
        if dropped > 0 {
            tracing::warn!(dropped, medium_len, "Index entries past end of medium dropped");
        }

        let index_path = config.index_path();
        Ok(Self {
            config,
            index,
            records,
            index_path,
            medium_len,
        })
    }

    /// Execute a command
    ///
    /// Routes commands to appropriate handlers
    pub fn execute(&mut self, command: Command) -> Result<Response> {
        match command {
            Command::Insert { key, value } => {
                self.insert(&key, value)?;
                Ok(Response::Done)
            }
            Command::Delete { key, value } => {
                self.delete(&key, value)?;
                Ok(Response::Done)
            }
            Command::Find { key } => Ok(Response::from_find(self.find(&key))),
        }
    }

    /// Add `value` to `key`'s set
    ///
    /// A value already present causes no write. An unreadable record is
    /// abandoned and the set starts over empty in a fresh record.
    pub fn insert(&mut self, key: &str, value: i32) -> Result<()> {
        self.reconcile_medium()?;

        let (location, mut set) = match self.index.lookup(key) {
            Some(location) => match self.records.read(&location) {
                Ok(set) => (Some(location), set),
                Err(e) => {
                    self.drop_unreadable(key, &location, &e);
                    (None, SortedSet::new())
                }
            },
            None => (None, SortedSet::new()),
        };

        if !set.insert(value) {
            return Ok(());
        }

        let new_location = self.records.commit(location.as_ref(), &set)?;
        self.record_write(key, new_location);
        Ok(())
    }

    /// Remove `value` from `key`'s set
    ///
    /// Absent keys and absent values are no-ops. Removing the last value drops
    /// the key without touching the medium. A key whose record is unreadable
    /// is dropped.
    pub fn delete(&mut self, key: &str, value: i32) -> Result<()> {
        self.reconcile_medium()?;

        let Some(location) = self.index.lookup(key) else {
            return Ok(());
        };

        let mut set = match self.records.read(&location) {
            Ok(set) => set,
            Err(e) => {
                self.drop_unreadable(key, &location, &e);
                return Ok(());
            }
        };

        if !set.remove(value) {
            return Ok(());
        }

        if set.is_empty() {
            self.index.remove(key);
            tracing::debug!(key, offset = location.offset, "Key emptied, record abandoned");
            return Ok(());
        }

        let new_location = self.records.commit(Some(&location), &set)?;
        self.record_write(key, new_location);
        Ok(())
    }

    /// Get `key`'s values in ascending order
    ///
    /// Returns `None` if the key is absent. A present key never has an empty
    /// set; an unreadable record is reported as absent.
    pub fn find(&self, key: &str) -> Option<SortedSet> {
        let location = self.index.lookup(key)?;
        match self.records.read(&location) {
            Ok(set) if !set.is_empty() => Some(set),
            Ok(_) => None,
            Err(e) => {
                tracing::warn!(key, offset = location.offset, "Unreadable record: {}", e);
                None
            }
        }
    }

    /// Rewrite the medium without dead space and save the index
    ///
    /// Keys whose record cannot be read are dropped.
    pub fn compact(&mut self) -> Result<CompactionStats> {
        self.reconcile_medium()?;

        let snapshot = self.index.snapshot();
        let live: Vec<RecordLocation> = snapshot.iter().map(|(_, loc)| *loc).collect();

        let outcome = storage::compact(&self.records, &live)?;

        let mut index = IndexTable::new();
        for ((key, _), location) in snapshot.into_iter().zip(outcome.locations) {
            match location {
                Some(location) => {
                    index.put(key, location);
                }
                None => tracing::warn!(key = %key, "Key dropped by compaction"),
            }
        }
        self.index = index;
        self.medium_len = outcome.stats.bytes_after;

        self.save_index()?;
        Ok(outcome.stats)
    }

    /// Space usage of the medium
    pub fn stats(&self) -> Result<StoreStats> {
        let live_bytes = self.index.live_bytes();
        let medium_bytes = self.records.len()?;
        Ok(StoreStats {
            keys: self.index.len(),
            live_bytes,
            medium_bytes,
            dead_bytes: medium_bytes.saturating_sub(live_bytes),
        })
    }

    /// Write the index side file now
    pub fn save_index(&self) -> Result<()> {
        IndexFile::save(&self.index_path, &self.index)
    }

    /// Close the store gracefully
    ///
    /// Saves the index; without this, changes since the last save are lost.
    pub fn close(self) -> Result<()> {
        self.save_index()?;
        tracing::info!(keys = self.index.len(), "Store closed");
        Ok(())
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    /// Drop every index entry the medium no longer covers
    ///
    /// Must run before each write: after the medium shrinks, an append can
    /// land under a stale location.
    fn reconcile_medium(&mut self) -> Result<()> {
        let actual = self.records.len()?;
        if actual < self.medium_len {
            let dropped = self.index.retain(|_, location| location.end() <= actual);
            tracing::warn!(
                expected = self.medium_len,
                actual,
                dropped,
                "Medium shrank, index entries past its end dropped"
            );
        }
        self.medium_len = actual;
        Ok(())
    }

    /// Forget a key whose record cannot be read
    fn drop_unreadable(&mut self, key: &str, location: &RecordLocation, err: &SetKvError) {
        tracing::warn!(
            key,
            offset = location.offset,
            count = location.count,
            "Unreadable record abandoned: {}",
            err
        );
        self.index.remove(key);
    }

    /// Point `key` at its new record and track the medium's end
    fn record_write(&mut self, key: &str, location: RecordLocation) {
        self.medium_len = self.medium_len.max(location.end());
        self.index.put(key, location);
    }

    // =========================================================================
    // Accessors (for testing and debugging)
    // =========================================================================

    /// Get the data directory path
    pub fn data_dir(&self) -> &Path {
        &self.config.data_dir
    }

    /// Get the index
    pub fn index(&self) -> &IndexTable {
        &self.index
    }

    /// Get the record medium
    pub fn records(&self) -> &RecordStore {
        &self.records
    }

    /// Number of keys currently present
    pub fn key_count(&self) -> usize {
        self.index.len()
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }
}
