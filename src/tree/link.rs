//! Leaf Links
//!
//! One Link per distinct original key that routes into a leaf bucket.

use crate::value::Value;

/// Sentinel for a Link whose index record has never been written; the first
/// record write appends a new slot and makes its offset permanent.
pub const UNWRITTEN: i64 = -1;

/// A leaf entry disambiguating one original key within a bucket and pointing
/// at its stored value.
///
/// Invariant: within one leaf, `key_digest` values are pairwise distinct, and
/// `(value_offset, value_length)` always refers to bytes already durably
/// appended to the value log before the Link became visible to readers.
#[derive(Debug, Clone)]
pub struct Link {
    /// Strong 128-bit digest of the original key (disambiguation only)
    pub key_digest: [u8; 16],

    /// Byte offset of this key's fixed-width slot in the index log,
    /// or [`UNWRITTEN`] if no record has been appended yet
    pub record_offset: i64,

    /// Start of the value bytes in the value log
    pub value_offset: u32,

    /// Length of the value bytes
    pub value_length: u32,

    /// Decoded value, kept in memory for the scan engine
    pub cached: Value,
}

impl Link {
    /// Create a fresh Link for a key that has never been written
    pub fn new(key_digest: [u8; 16]) -> Self {
        Self {
            key_digest,
            record_offset: UNWRITTEN,
            value_offset: 0,
            value_length: 0,
            cached: Value::Null,
        }
    }
}
