//! Index
//!
//! One secondary (or primary) index: a key-derivation rule, a radix tree
//! root, and the path of its fixed-width index log.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::{RadixError, Result};
use crate::tree::Node;
use crate::value::Value;

/// Reserved field path: index the caller-supplied original key verbatim
pub const FIELD_KEY: &str = "@key";

/// Reserved field path: index the numeric auto-increment id
pub const FIELD_ID: &str = "@id";

/// What an index derives its key from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyField {
    /// The original key as supplied by the caller
    OriginalKey,
    /// The numeric auto-increment id assigned to the record
    AutoId,
    /// A dot-separated path into the stored value
    Path(String),
}

impl KeyField {
    /// Parse a field-path string, mapping the reserved names
    pub fn parse(path: &str) -> Self {
        match path {
            FIELD_KEY => KeyField::OriginalKey,
            FIELD_ID => KeyField::AutoId,
            other => KeyField::Path(other.to_string()),
        }
    }

    /// The textual field path this was parsed from
    pub fn as_str(&self) -> &str {
        match self {
            KeyField::OriginalKey => FIELD_KEY,
            KeyField::AutoId => FIELD_ID,
            KeyField::Path(p) => p,
        }
    }
}

/// One index over a form
#[derive(Debug)]
pub struct Index {
    /// Position among the form's indexes; also names the on-disk directory
    id: u32,

    /// True for the form's primary index (always over [`FIELD_KEY`])
    is_primary: bool,

    /// Key-derivation rule
    field: KeyField,

    /// Root of this index's radix tree
    root: Arc<Node>,

    /// Path of this index's fixed-width record log
    log_path: PathBuf,
}

impl Index {
    const LOG_FILENAME: &'static str = "index.log";

    /// Create an index rooted in `dir` (the directory must already exist)
    pub fn new(id: u32, is_primary: bool, field: KeyField, dir: &Path) -> Self {
        Self {
            id,
            is_primary,
            field,
            root: Node::root(),
            log_path: dir.join(Self::LOG_FILENAME),
        }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn is_primary(&self) -> bool {
        self.is_primary
    }

    pub fn field(&self) -> &KeyField {
        &self.field
    }

    pub fn root(&self) -> &Arc<Node> {
        &self.root
    }

    pub fn log_path(&self) -> &Path {
        &self.log_path
    }

    /// Derive the bytes this index keys the record by.
    ///
    /// A field path that does not resolve to a scalar fails immediately with
    /// `InvalidFieldPath` — never a silent null entry.
    pub fn key_bytes(&self, id: u32, original_key: &[u8], value: &Value) -> Result<Vec<u8>> {
        match &self.field {
            KeyField::OriginalKey => Ok(original_key.to_vec()),
            KeyField::AutoId => Ok(id.to_string().into_bytes()),
            KeyField::Path(path) => value
                .get_path(path)
                .ok_or_else(|| {
                    RadixError::InvalidFieldPath(format!("no field at path {:?}", path))
                })?
                .index_bytes(),
        }
    }
}
