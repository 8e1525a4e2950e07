//! Structured Values
//!
//! The generic value representation stored in forms: a map/array/scalar tree
//! with a compact bincode codec and dot-path field extraction for secondary
//! indexes.
//!
//! The wire format is not part of any external contract — the only
//! requirement is that `decode(encode(v)) == v`.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{RadixError, Result};

/// A structured value: scalar, array, or string-keyed map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Array(Vec<Value>),
    Map(BTreeMap<String, Value>),
}

impl Value {
    // =========================================================================
    // Codec
    // =========================================================================

    /// Serialize to the compact binary form stored in the value log
    pub fn encode(&self) -> Result<Vec<u8>> {
        bincode::serialize(self).map_err(|e| RadixError::Encoding(e.to_string()))
    }

    /// Deserialize from value-log bytes
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        bincode::deserialize(bytes).map_err(|e| RadixError::Encoding(e.to_string()))
    }

    // =========================================================================
    // Field Access
    // =========================================================================

    /// Follow a dot-separated field path ("user.address.0") through maps
    /// (by field name) and arrays (by numeric index).
    ///
    /// Returns None when any segment is missing or the shape does not match.
    pub fn get_path(&self, path: &str) -> Option<&Value> {
        let mut current = self;
        for segment in path.split('.') {
            current = match current {
                Value::Map(fields) => fields.get(segment)?,
                Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
                _ => return None,
            };
        }
        Some(current)
    }

    /// Canonical bytes of a scalar used as an index key.
    ///
    /// Only scalars can key an index; a structured value here means the
    /// field path points at the wrong shape.
    pub fn index_bytes(&self) -> Result<Vec<u8>> {
        match self {
            Value::Bool(b) => Ok(if *b { b"true".to_vec() } else { b"false".to_vec() }),
            Value::Int(n) => Ok(n.to_string().into_bytes()),
            Value::Float(f) => Ok(f.to_string().into_bytes()),
            Value::Str(s) => Ok(s.as_bytes().to_vec()),
            Value::Null => Err(RadixError::InvalidFieldPath(
                "field resolved to null".to_string(),
            )),
            Value::Array(_) | Value::Map(_) => Err(RadixError::InvalidFieldPath(
                "field resolved to a non-scalar value".to_string(),
            )),
        }
    }

    /// True for scalar shapes (everything except arrays and maps)
    pub fn is_scalar(&self) -> bool {
        !matches!(self, Value::Array(_) | Value::Map(_))
    }

    // =========================================================================
    // Ordering (for selector predicates and sorting)
    // =========================================================================

    /// Compare two values for selector purposes.
    ///
    /// Int/Float cross-compare numerically; strings compare lexicographically;
    /// bools compare false < true. Mismatched kinds are incomparable and the
    /// selector treats them as filtered out.
    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
            (Value::Float(a), Value::Float(b)) => a.partial_cmp(b),
            (Value::Int(a), Value::Float(b)) => (*a as f64).partial_cmp(b),
            (Value::Float(a), Value::Int(b)) => a.partial_cmp(&(*b as f64)),
            (Value::Str(a), Value::Str(b)) => Some(a.cmp(b)),
            (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
            (Value::Null, Value::Null) => Some(Ordering::Equal),
            _ => None,
        }
    }
}

// =============================================================================
// Conversions
// =============================================================================

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl FromIterator<(String, Value)> for Value {
    fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
        Value::Map(iter.into_iter().collect())
    }
}
