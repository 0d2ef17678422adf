//! Index side file
//!
//! Persists an [`IndexTable`] between runs. Loading never fails: a missing,
//! truncated or corrupt file yields an empty table.

use std::fs::{self, OpenOptions};
use std::io::{BufWriter, ErrorKind, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SetKvError};
use crate::storage::RecordLocation;

use super::IndexTable;

/// Size of the CRC32 trailer
const CRC_SIZE: usize = 4;

/// One persisted entry (load side)
#[derive(Debug, Deserialize)]
struct IndexEntry {
    key: String,
    location: RecordLocation,
}

/// One persisted entry (save side, borrows from the table)
#[derive(Debug, Serialize)]
struct IndexEntryRef<'a> {
    key: &'a str,
    location: &'a RecordLocation,
}

/// Reader/writer for the index side file
pub struct IndexFile;

impl IndexFile {
    /// Load the index at `path`, degrading to an empty table on any failure
    pub fn load(path: &Path) -> IndexTable {
        match Self::try_load(path) {
            Ok(table) => table,
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    "Index side file unusable, starting with an empty index: {}",
                    e
                );
                IndexTable::new()
            }
        }
    }

    /// Load the index at `path`, reporting why it could not be used
    ///
    /// A missing file is not an error: it is a store that was never closed.
    pub fn try_load(path: &Path) -> Result<IndexTable> {
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No index side file, starting empty");
                return Ok(IndexTable::new());
            }
            Err(e) => return Err(e.into()),
        };

        if bytes.len() < CRC_SIZE {
            return Err(SetKvError::Corruption(format!(
                "index file truncated: {} bytes",
                bytes.len()
            )));
        }

        let (body, trailer) = bytes.split_at(bytes.len() - CRC_SIZE);
        let stored_crc = u32::from_le_bytes([trailer[0], trailer[1], trailer[2], trailer[3]]);
        let actual_crc = crc32fast::hash(body);
        if stored_crc != actual_crc {
            return Err(SetKvError::Corruption(format!(
                "index checksum mismatch: stored {:#010x}, computed {:#010x}",
                stored_crc, actual_crc
            )));
        }

        let entries: Vec<IndexEntry> = bincode::deserialize(body)?;

        let mut table = IndexTable::new();
        for entry in entries {
            let location = entry.location;
            if location.count == 0 || !location.fits(location.count) {
                return Err(SetKvError::Corruption(format!(
                    "invalid location for key {:?}: count {}, reserved {}",
                    entry.key, location.count, location.reserved
                )));
            }
            table.put(entry.key, location);
        }

        tracing::debug!(path = %path.display(), entries = table.len(), "Index loaded");
        Ok(table)
    }

    /// Write `table` to `path`, replacing any previous contents
    pub fn save(path: &Path, table: &IndexTable) -> Result<()> {
        let entries: Vec<IndexEntryRef<'_>> = table
            .iter()
            .map(|(key, location)| IndexEntryRef { key, location })
            .collect();

        let body = bincode::serialize(&entries)?;
        let crc = crc32fast::hash(&body);

        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)?;
        let mut writer = BufWriter::new(file);
        writer.write_all(&body)?;
        writer.write_all(&crc.to_le_bytes())?;
        writer.flush()?;

        tracing::debug!(path = %path.display(), entries = entries.len(), "Index saved");
        Ok(())
    }
}
