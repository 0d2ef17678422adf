//! Set Module
//!
//! In-memory value set for a single key.
//!
//! ## Responsibilities
//! - Keep values ascending and duplicate-free at every observable point
//! - Binary search for membership, insertion and removal
//!
//! ## Data Structure Choice
//! A sorted `Vec<i32>`:
//! - Matches the on-disk record layout one to one (no reordering on encode)
//! - O(log n) search, O(n) shift on insert/remove
//! - Sets are read, mutated once and written back, so the shift cost is
//!   dominated by the record I/O anyway

mod sorted;

pub use sorted::SortedSet;
