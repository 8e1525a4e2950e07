//! Key Encoding
//!
//! Derives routing keys and strong digests from original keys, and provides
//! the fixed-width textual field codec used by on-disk index records.
//!
//! ## Routing vs. disambiguation
//!
//! Two different hashes serve two different jobs:
//! - The **routing key** (32-bit) only decides which leaf bucket a key lands
//!   in. Collisions are expected and harmless.
//! - The **digest** (128-bit) tells colliding original keys apart inside a
//!   bucket. It is never used for routing.
//!
//! ## Record field widths
//!
//! Index records are fixed-width ASCII with no delimiters, so record N of a
//! fresh log always sits at byte `N * RECORD_WIDTH`. The widths below bound
//! the representable key space, per-log file size and per-value size; they
//! are on-disk format constants and must not change for an existing database.

use crate::error::{RadixError, Result};

// =============================================================================
// Record Field Widths (on-disk format constants)
// =============================================================================

/// Zero-padded decimal digits for the 32-bit routing key (u32 max is 10 digits)
pub const KEY_WIDTH: usize = 10;

/// Lowercase hex characters for the 16-byte key digest
pub const DIGEST_WIDTH: usize = 32;

/// Zero-padded decimal digits for a value-log offset (bounds a log at 4 GiB)
pub const OFFSET_WIDTH: usize = 10;

/// Zero-padded decimal digits for a value length (bounds one value below 100 MB)
pub const LENGTH_WIDTH: usize = 8;

/// Total width of one index record in bytes
pub const RECORD_WIDTH: usize = KEY_WIDTH + DIGEST_WIDTH + OFFSET_WIDTH + LENGTH_WIDTH;

/// Largest value length the length field can represent. Appends check this
/// bound up front so an unindexable value is rejected before any byte lands.
pub const MAX_VALUE_LENGTH: u64 = 10u64.pow(LENGTH_WIDTH as u32) - 1;

// =============================================================================
// Routing Key
// =============================================================================

/// Derive the 32-bit routing key for an original key.
///
/// Keys that are plain ASCII decimals fitting a u32 route as the integer
/// itself. Auto-increment ids therefore keep their numeric order in the tree,
/// which is what makes an ascending scan over an id-keyed primary index come
/// out in id order. Everything else routes through CRC32.
pub fn routing_key(key: &[u8]) -> u32 {
    if let Some(n) = parse_decimal_u32(key) {
        return n;
    }
    crc32fast::hash(key)
}

/// Parse an ASCII decimal that fits u32, rejecting empty input and leading
/// zeros (so "007" hashes instead of aliasing "7").
fn parse_decimal_u32(key: &[u8]) -> Option<u32> {
    if key.is_empty() || key.len() > 10 {
        return None;
    }
    if key.len() > 1 && key[0] == b'0' {
        return None;
    }
    let mut n: u64 = 0;
    for &b in key {
        if !b.is_ascii_digit() {
            return None;
        }
        n = n * 10 + u64::from(b - b'0');
    }
    u32::try_from(n).ok()
}

// =============================================================================
// Key Digest
// =============================================================================

/// Strong 128-bit digest of an original key (first 16 bytes of BLAKE3).
///
/// Purely a disambiguator within one leaf bucket; collision probability is
/// negligible at any realistic bucket cardinality.
pub fn key_digest(key: &[u8]) -> [u8; 16] {
    let hash = blake3::hash(key);
    let mut digest = [0u8; 16];
    digest.copy_from_slice(&hash.as_bytes()[..16]);
    digest
}

/// Render a digest as the fixed-width lowercase hex used in index records
pub fn digest_hex(digest: &[u8; 16]) -> String {
    let mut out = String::with_capacity(DIGEST_WIDTH);
    for byte in digest {
        out.push_str(&format!("{:02x}", byte));
    }
    out
}

// =============================================================================
// Fixed-Width Decimal Codec
// =============================================================================

/// Encode an unsigned integer as a zero-padded decimal string of exactly
/// `width` characters. A value too large for the field is an error, never a
/// silent truncation.
pub fn encode_fixed(n: u64, width: usize) -> Result<String> {
    let encoded = format!("{:0width$}", n, width = width);
    if encoded.len() > width {
        return Err(RadixError::Encoding(format!(
            "value {} does not fit in a {}-digit field",
            n, width
        )));
    }
    Ok(encoded)
}

/// Decode a fixed-width decimal field. Exact inverse of [`encode_fixed`].
pub fn decode_fixed(s: &str) -> Result<u64> {
    s.parse::<u64>()
        .map_err(|e| RadixError::Encoding(format!("bad fixed-width field {:?}: {}", s, e)))
}

// =============================================================================
// Index Record Assembly
// =============================================================================

/// Build one fixed-width index record:
/// `[routing key (10)][digest hex (32)][value offset (10)][value length (8)]`
pub fn encode_record(
    routing: u32,
    digest: &[u8; 16],
    value_offset: u32,
    value_length: u32,
) -> Result<Vec<u8>> {
    let mut record = String::with_capacity(RECORD_WIDTH);
    record.push_str(&encode_fixed(u64::from(routing), KEY_WIDTH)?);
    record.push_str(&digest_hex(digest));
    record.push_str(&encode_fixed(u64::from(value_offset), OFFSET_WIDTH)?);
    record.push_str(&encode_fixed(u64::from(value_length), LENGTH_WIDTH)?);
    debug_assert_eq!(record.len(), RECORD_WIDTH);
    Ok(record.into_bytes())
}
