//! Tests for key encoding
//!
//! These tests verify:
//! - Routing-key derivation (identity for decimals, CRC32 otherwise)
//! - Strong digest properties
//! - The fixed-width decimal codec and record assembly

use radixdb::keys::{
    decode_fixed, digest_hex, encode_fixed, encode_record, key_digest, routing_key, DIGEST_WIDTH,
    KEY_WIDTH, LENGTH_WIDTH, OFFSET_WIDTH, RECORD_WIDTH,
};

// =============================================================================
// Routing Key Tests
// =============================================================================

#[test]
fn test_routing_key_is_deterministic() {
    for key in [b"alpha".as_slice(), b"beta", b"42", b""] {
        assert_eq!(routing_key(key), routing_key(key));
    }
}

#[test]
fn test_decimal_keys_route_as_themselves() {
    assert_eq!(routing_key(b"0"), 0);
    assert_eq!(routing_key(b"42"), 42);
    assert_eq!(routing_key(b"110000"), 110_000);
    assert_eq!(routing_key(b"4294967295"), u32::MAX);
}

#[test]
fn test_non_identity_keys_are_hashed() {
    // Leading zeros must not alias the plain decimal
    assert_ne!(routing_key(b"007"), 7);

    // Too large for u32 falls back to hashing
    assert_ne!(routing_key(b"4294967296"), 0);

    // Hashed keys still deterministic
    assert_eq!(routing_key(b"hello"), routing_key(b"hello"));
}

#[test]
fn test_distinct_string_keys_usually_differ() {
    assert_ne!(routing_key(b"alpha"), routing_key(b"beta"));
}

// =============================================================================
// Digest Tests
// =============================================================================

#[test]
fn test_digest_is_deterministic_and_distinct() {
    let a = key_digest(b"alpha");
    let b = key_digest(b"beta");

    assert_eq!(a, key_digest(b"alpha"));
    assert_ne!(a, b);
}

#[test]
fn test_digest_hex_width() {
    let digest = key_digest(b"some key");
    let hex = digest_hex(&digest);

    assert_eq!(hex.len(), DIGEST_WIDTH);
    assert!(hex.chars().all(|c| c.is_ascii_hexdigit()));
}

// =============================================================================
// Fixed-Width Codec Tests
// =============================================================================

#[test]
fn test_encode_decode_round_trip() {
    for n in [0u64, 1, 42, 9_999_999_999] {
        let encoded = encode_fixed(n, KEY_WIDTH).unwrap();
        assert_eq!(encoded.len(), KEY_WIDTH);
        assert_eq!(decode_fixed(&encoded).unwrap(), n);
    }
}

#[test]
fn test_encode_zero_pads() {
    assert_eq!(encode_fixed(7, 10).unwrap(), "0000000007");
    assert_eq!(encode_fixed(0, 8).unwrap(), "00000000");
}

#[test]
fn test_encode_rejects_overflow() {
    // 11 digits cannot fit a 10-digit field
    assert!(encode_fixed(10_000_000_000, KEY_WIDTH).is_err());
    assert!(encode_fixed(100_000_000, LENGTH_WIDTH).is_err());
}

#[test]
fn test_decode_rejects_garbage() {
    assert!(decode_fixed("00abc").is_err());
    assert!(decode_fixed("").is_err());
}

// =============================================================================
// Record Assembly Tests
// =============================================================================

#[test]
fn test_record_width_is_the_sum_of_fields() {
    assert_eq!(
        RECORD_WIDTH,
        KEY_WIDTH + DIGEST_WIDTH + OFFSET_WIDTH + LENGTH_WIDTH
    );
}

#[test]
fn test_encode_record_layout() {
    let digest = key_digest(b"k");
    let record = encode_record(1234, &digest, 500, 77).unwrap();

    assert_eq!(record.len(), RECORD_WIDTH);

    let text = String::from_utf8(record).unwrap();
    assert_eq!(&text[..KEY_WIDTH], "0000001234");
    assert_eq!(&text[KEY_WIDTH..KEY_WIDTH + DIGEST_WIDTH], digest_hex(&digest));
    assert_eq!(
        decode_fixed(&text[KEY_WIDTH + DIGEST_WIDTH..KEY_WIDTH + DIGEST_WIDTH + OFFSET_WIDTH])
            .unwrap(),
        500
    );
    assert_eq!(decode_fixed(&text[RECORD_WIDTH - LENGTH_WIDTH..]).unwrap(), 77);
}
