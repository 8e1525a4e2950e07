//! Catalog Module
//!
//! The naming and ownership layer: a Database owns Forms, a Form owns one
//! primary and any number of secondary Indexes, each Index owns one radix
//! tree and one on-disk index log.
//!
//! ## Identity
//!
//! Names are user-chosen and mutable; ids are derived once from the name
//! (salted digest, re-salted on collision) and immutable for the object's
//! lifetime. On-disk paths use ids, never names, so a rename can never
//! orphan data.

mod database;
mod form;
mod index;

pub use database::Database;
pub use form::{Form, FormKind};
pub use index::{Index, KeyField, FIELD_ID, FIELD_KEY};

/// Derive a stable 16-hex-char id from a name, re-salting while the result
/// collides with an already-taken id.
pub(crate) fn derive_id<F>(name: &str, is_taken: F) -> String
where
    F: Fn(&str) -> bool,
{
    let mut salt = 0u32;
    loop {
        let input = if salt == 0 {
            name.to_string()
        } else {
            format!("{}#{}", name, salt)
        };
        let hash = blake3::hash(input.as_bytes());
        let id: String = hash.as_bytes()[..8]
            .iter()
            .map(|b| format!("{:02x}", b))
            .collect();
        if !is_taken(&id) {
            return id;
        }
        salt += 1;
    }
}
