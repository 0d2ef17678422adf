//! # SetKV
//!
//! A persistent store mapping string keys to sorted sets of integers:
//! - One flat record file holding every key's set
//! - In-place rewrites while a set fits its reserved slots, relocation otherwise
//! - In-memory index, saved to a side file on close
//! - Line-oriented command stream (`insert` / `delete` / `find`)
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     Command Stream                           │
//! │              (insert / delete / find lines)                  │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                       Engine                                 │
//! │          (read set → mutate → commit → update index)         │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │ IndexTable  │          │ RecordStore │
//!   │ (key → loc) │          │ (placement) │
//!   └──────┬──────┘          └──────┬──────┘
//!          │                        │
//!          ▼                        ▼
//!     index.idx                values.dat
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod set;
pub mod storage;
pub mod index;
pub mod protocol;
pub mod engine;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{SetKvError, Result};
pub use config::Config;
pub use engine::{Engine, StoreStats};
pub use set::SortedSet;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of SetKV
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
