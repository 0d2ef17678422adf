//! Storage Module
//!
//! The record medium: one flat file holding every key's value set.
//!
//! ## Responsibilities
//! - Encode/decode a value set as a fixed-width record
//! - Decide placement on commit (rewrite in place vs. relocate)
//! - Offline compaction of abandoned records
//!
//! Storage never sees keys. It is handed a [`RecordLocation`] and either reads
//! from it or returns a new one after a write; the index owns every location.
//!
//! ## File Format
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │ Record                                                   │
//! │ ┌───────────┬──────────────────────┬──────────────────┐  │
//! │ │ Count (4) │ Count × i32 LE (4)   │ Zero padding     │  │
//! │ └───────────┴──────────────────────┴──────────────────┘  │
//! │   |<------------- reserved × 4 + 4 bytes ------------>|  │
//! ├──────────────────────────────────────────────────────────┤
//! │ Dead record (relocated or emptied, never reclaimed)      │
//! ├──────────────────────────────────────────────────────────┤
//! │ Record ...                                               │
//! └──────────────────────────────────────────────────────────┘
//! ```

mod compaction;
mod location;
pub mod record;
mod store;

pub use compaction::{compact, CompactionOutcome, CompactionStats};
pub use location::RecordLocation;
pub use store::RecordStore;
