//! Offline compaction
//!
//! Rebuilds the medium from a list of live locations, dropping dead space.
//! Not part of the hot path; the engine calls it on request only.

use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use crate::error::{Result, SetKvError};

use super::record;
use super::store::read_record;
use super::{RecordLocation, RecordStore};

/// Suffix of the temporary file the compacted medium is written to
const COMPACT_SUFFIX: &str = "compact";

/// Summary of one compaction run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CompactionStats {
    /// Records written to the new medium
    pub records: usize,
    /// Records that could not be read and were dropped
    pub dropped: usize,
    /// Medium size before compaction
    pub bytes_before: u64,
    /// Medium size after compaction
    pub bytes_after: u64,
}

/// Result of [`compact`]
#[derive(Debug)]
pub struct CompactionOutcome {
    /// New location for each input location, in input order.
    /// `None` where the record was unreadable and has been dropped.
    pub locations: Vec<Option<RecordLocation>>,
    pub stats: CompactionStats,
}

/// Rewrite every record in `live` into a fresh medium, back to back
///
/// The new medium replaces the old file by rename once fully written. Each
/// record is reserved at its count plus the store's slack.
pub fn compact(store: &RecordStore, live: &[RecordLocation]) -> Result<CompactionOutcome> {
    let bytes_before = store.len()?;
    let tmp_path = compact_path(store);

    let mut source = match File::open(store.path()) {
        Ok(file) => Some(file),
        Err(e) => {
            tracing::warn!("Medium unreadable during compaction: {}", e);
            None
        }
    };

    let target = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(&tmp_path)?;
    let mut writer = BufWriter::new(target);

    let mut locations = Vec::with_capacity(live.len());
    let mut stats = CompactionStats {
        bytes_before,
        ..CompactionStats::default()
    };
    let mut offset = 0u64;

    for location in live {
        let set = match source.as_mut() {
            Some(file) => read_record(file, bytes_before, location),
            None => Err(SetKvError::Storage("medium missing".to_string())),
        };

        let set = match set {
            Ok(set) if !set.is_empty() => set,
            Ok(_) => {
                tracing::warn!(offset = location.offset, "Dropping empty record during compaction");
                locations.push(None);
                stats.dropped += 1;
                continue;
            }
            Err(e) => {
                tracing::warn!(
                    offset = location.offset,
                    count = location.count,
                    "Dropping unreadable record during compaction: {}",
                    e
                );
                locations.push(None);
                stats.dropped += 1;
                continue;
            }
        };

        let count = record::count_of(&set)?;
        let reserved = count.saturating_add(store.record_slack());
        let bytes = record::encode(&set, reserved)?;
        writer.write_all(&bytes)?;

        locations.push(Some(RecordLocation::new(offset, count, reserved)));
        offset += bytes.len() as u64;
        stats.records += 1;
    }

    let file = writer.into_inner().map_err(|e| {
        SetKvError::Storage(format!("Failed to flush compacted medium: {}", e))
    })?;
    file.sync_all()?;
    drop(file);
    drop(source);

    fs::rename(&tmp_path, store.path())?;
    stats.bytes_after = offset;

    tracing::info!(
        records = stats.records,
        dropped = stats.dropped,
        bytes_before = stats.bytes_before,
        bytes_after = stats.bytes_after,
        "Compaction finished"
    );

    Ok(CompactionOutcome { locations, stats })
}

fn compact_path(store: &RecordStore) -> PathBuf {
    let mut name = store.path().as_os_str().to_os_string();
    name.push(".");
    name.push(COMPACT_SUFFIX);
    PathBuf::from(name)
}
