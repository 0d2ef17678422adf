//! Record codec
//!
//! `[count: u32 LE][count × i32 LE][zero padding]`

use bytes::{Buf, BufMut, BytesMut};

use crate::error::{Result, SetKvError};
use crate::set::SortedSet;

/// Width of the record header (element count)
pub const COUNT_WIDTH: u64 = 4;

/// Width of one stored value
pub const ELEMENT_WIDTH: u64 = 4;

/// Encoded size of a record with `slots` value slots
pub fn record_len(slots: u32) -> u64 {
    COUNT_WIDTH + slots as u64 * ELEMENT_WIDTH
}

/// Number of values in `set`, as stored in the header
pub fn count_of(set: &SortedSet) -> Result<u32> {
    u32::try_from(set.len()).map_err(|_| {
        SetKvError::Storage(format!("value set too large for a record: {} values", set.len()))
    })
}

/// Encode a set, padding with zeros up to `reserved` slots
///
/// `reserved` smaller than the set size is clamped to the set size.
pub fn encode(set: &SortedSet, reserved: u32) -> Result<BytesMut> {
    let count = count_of(set)?;
    let slots = reserved.max(count);

    let mut buf = BytesMut::with_capacity(record_len(slots) as usize);
    buf.put_u32_le(count);
    for value in set {
        buf.put_i32_le(*value);
    }
    buf.put_bytes(0, ((slots - count) as u64 * ELEMENT_WIDTH) as usize);

    Ok(buf)
}

/// Decode a record holding `expected` values
///
/// `bytes` must cover at least the header and `expected` values. The header
/// must agree with `expected`.
pub fn decode(mut bytes: &[u8], expected: u32) -> Result<SortedSet> {
    let needed = record_len(expected);
    if (bytes.len() as u64) < needed {
        return Err(SetKvError::Corruption(format!(
            "record truncated: expected {} bytes, got {}",
            needed,
            bytes.len()
        )));
    }

    let count = bytes.get_u32_le();
    if count != expected {
        return Err(SetKvError::Corruption(format!(
            "record header holds {} values, index expects {}",
            count, expected
        )));
    }

    let mut values = Vec::with_capacity(count as usize);
    for _ in 0..count {
        values.push(bytes.get_i32_le());
    }

    // Sorting is a no-op for records this crate wrote; it keeps the set
    // invariant for anything else.
    Ok(SortedSet::from(values))
}
