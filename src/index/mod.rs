//! Index Module
//!
//! Key → record location mapping, fully materialized in memory.
//!
//! ## Responsibilities
//! - Sole owner of "where does key K live"
//! - Deterministic (key-sorted) enumeration for persistence
//! - Load at startup / save at shutdown through the side file
//!
//! ## Side File Format
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │ Body (bincode, fixed-width little-endian)               │
//! │   EntryCount: u64                                       │
//! │   [KeyLen: u64][Key][Offset: u64][Count: u32][Reserved: u32]
//! │   ... repeated for each entry ...                       │
//! ├─────────────────────────────────────────────────────────┤
//! │ Trailer: CRC32 of body (4)                              │
//! └─────────────────────────────────────────────────────────┘
//! ```

mod file;
mod table;

pub use file::IndexFile;
pub use table::IndexTable;
