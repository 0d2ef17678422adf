//! Record Store
//!
//! Owns the record medium and implements the placement policy.
//!
//! ## Placement
//! - No previous location → append at end of medium
//! - New count fits the reserved slots → rewrite in place (offset kept)
//! - Otherwise → append a fresh record, abandon the old bytes
//!
//! File handles live for a single `read` or `commit` call.

use std::fs::{File, OpenOptions};
use std::io::{ErrorKind, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use crate::error::{Result, SetKvError};
use crate::set::SortedSet;

use super::record;
use super::RecordLocation;

/// The record medium
pub struct RecordStore {
    /// Path of the medium file
    path: PathBuf,

    /// Spare value slots claimed on every append
    record_slack: u32,
}

impl RecordStore {
    /// Open or create the medium at `path`
    ///
    /// Failing to create the file is fatal to the store.
    pub fn open(path: &Path, record_slack: u32) -> Result<Self> {
        OpenOptions::new().create(true).append(true).open(path)?;

        Ok(Self {
            path: path.to_path_buf(),
            record_slack,
        })
    }

    /// Read the value set at `location`
    ///
    /// Fails with `Io` if the medium cannot be opened and `Corruption` if the
    /// record lies past the end of the medium or disagrees with `location`.
    /// Nothing outside the medium is ever read.
    pub fn read(&self, location: &RecordLocation) -> Result<SortedSet> {
        let mut file = File::open(&self.path)?;
        let medium_len = file.metadata()?.len();
        read_record(&mut file, medium_len, location)
    }

    /// Persist `set`, reusing `existing` when it has room
    ///
    /// Returns the location now holding `set`. The caller owns that location
    /// and must replace its copy of `existing` with it.
    pub fn commit(
        &self,
        existing: Option<&RecordLocation>,
        set: &SortedSet,
    ) -> Result<RecordLocation> {
        let count = record::count_of(set)?;

        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .open(&self.path)?;
        let medium_len = file.metadata()?.len();

        if let Some(location) = existing {
            // The reserved range must still be inside the medium; a location
            // past the end (medium replaced or truncated) is never written to.
            if location.fits(count) && location.end() <= medium_len {
                let bytes = record::encode(set, count)?;
                file.seek(SeekFrom::Start(location.offset))?;
                file.write_all(&bytes)?;
                file.flush()?;

                tracing::debug!(
                    offset = location.offset,
                    count,
                    reserved = location.reserved,
                    "Record rewritten in place"
                );
                return Ok(RecordLocation::new(location.offset, count, location.reserved));
            }

            tracing::debug!(
                offset = location.offset,
                count,
                reserved = location.reserved,
                "Record relocated"
            );
        }

        let reserved = count.saturating_add(self.record_slack);
        let bytes = record::encode(set, reserved)?;
        file.seek(SeekFrom::Start(medium_len))?;
        file.write_all(&bytes)?;
        file.flush()?;

        tracing::debug!(offset = medium_len, count, reserved, "Record appended");
        Ok(RecordLocation::new(medium_len, count, reserved))
    }

    /// Current size of the medium in bytes (0 if it has gone missing)
    pub fn len(&self) -> Result<u64> {
        match std::fs::metadata(&self.path) {
            Ok(meta) => Ok(meta.len()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(0),
            Err(e) => Err(e.into()),
        }
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Path of the medium file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Spare slots claimed on append
    pub fn record_slack(&self) -> u32 {
        self.record_slack
    }
}

/// Read one record from an open medium of `medium_len` bytes
pub(crate) fn read_record(
    file: &mut File,
    medium_len: u64,
    location: &RecordLocation,
) -> Result<SortedSet> {
    let end = location
        .offset
        .checked_add(location.encoded_len())
        .ok_or_else(|| {
            SetKvError::Corruption(format!("record offset {} overflows", location.offset))
        })?;

    if end > medium_len {
        return Err(SetKvError::Corruption(format!(
            "record [{}, {}) extends past end of medium ({} bytes)",
            location.offset, end, medium_len
        )));
    }

    let mut buf = vec![0u8; location.encoded_len() as usize];
    file.seek(SeekFrom::Start(location.offset))?;
    file.read_exact(&mut buf)?;

    record::decode(&buf, location.count)
}
