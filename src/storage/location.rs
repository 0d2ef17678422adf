//! Record addressing
//!
//! Where a value set lives inside the record medium.

use serde::{Deserialize, Serialize};

use super::record;

/// Address of one record in the medium
///
/// `reserved` is the element capacity claimed when the record was appended.
/// In-place rewrites keep it unchanged; only a relocation resets it. Deriving
/// it from `count` instead would let a grow/shrink/regrow sequence overrun
/// the following record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordLocation {
    /// Byte offset of the record header
    pub offset: u64,
    /// Number of values currently stored
    pub count: u32,
    /// Number of value slots owned by this record
    pub reserved: u32,
}

impl RecordLocation {
    pub fn new(offset: u64, count: u32, reserved: u32) -> Self {
        Self {
            offset,
            count,
            reserved,
        }
    }

    /// Bytes occupied by the current values (header included)
    pub fn encoded_len(&self) -> u64 {
        record::record_len(self.count)
    }

    /// Bytes owned by this record (header included)
    pub fn reserved_len(&self) -> u64 {
        record::record_len(self.reserved)
    }

    /// First byte past the reserved range
    pub fn end(&self) -> u64 {
        self.offset.saturating_add(self.reserved_len())
    }

    /// Whether `count` values can be written without relocating
    pub fn fits(&self, count: u32) -> bool {
        count <= self.reserved
    }
}
