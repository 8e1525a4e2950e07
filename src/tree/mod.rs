//! Radix Index Tree
//!
//! A sparse, lazily-materialized fixed-degree tree that routes a 32-bit
//! routing key to a leaf bucket through successive digit extraction.
//!
//! ## Shape
//!
//! ```text
//! level 0           root (no rank)
//! level 1           16-way top dispatch        digit = key / 128^4
//! level 2..=4       128-ary interior levels    digit = rem / 128^(5-level)
//! level 5           leaf buckets (Links)       digit = rem
//! ```
//!
//! The five level divisors `[128^4, 128^3, 128^2, 128, 1]` partition the u32
//! key space exactly: the digits of `route(k)` always recombine to `k`.
//!
//! A bucket is not a unique key — distinct original keys can share one leaf
//! because the 32-bit hash is not injective. Telling them apart is the
//! [`Link`] layer's job, via the 128-bit key digest.

mod link;
mod node;

pub use link::{Link, UNWRITTEN};
pub use node::Node;

/// Fan-out of the interior levels
pub const DEGREE: u32 = 128;

/// Number of digit-extraction steps from root to leaf
pub const LEVELS: usize = 5;

/// Tree level at which nodes hold Links instead of children
pub const LEAF_LEVEL: u8 = LEVELS as u8;

/// Per-level divisors; geometric so the digits partition the key space with
/// no gaps and no overlap
pub const DIVISORS: [u32; LEVELS] = [
    DEGREE * DEGREE * DEGREE * DEGREE, // 128^4, top dispatch digit in 0..16
    DEGREE * DEGREE * DEGREE,
    DEGREE * DEGREE,
    DEGREE,
    1,
];

/// Extract the per-level digits for a routing key.
///
/// Pure: the same key always yields the same path, and
/// `sum(digit[i] * DIVISORS[i]) == key` exactly.
pub fn route(routing_key: u32) -> [u8; LEVELS] {
    let mut digits = [0u8; LEVELS];
    let mut remaining = routing_key;
    for (level, divisor) in DIVISORS.iter().enumerate() {
        digits[level] = (remaining / divisor) as u8;
        remaining %= divisor;
    }
    digits
}
