//! Form
//!
//! A named collection of records inside a database. Owns the shared value
//! log, the auto-id counter, and the form's indexes (one primary plus any
//! secondaries).

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::{RadixError, Result};
use crate::value::Value;

use super::index::{Index, KeyField};

/// Shape discipline of a form's records
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormKind {
    /// Flat rows: the value must be a map of scalars
    Tabular,
    /// Free-form structured values
    Document,
}

/// A form and everything it owns
#[derive(Debug)]
pub struct Form {
    /// Immutable id derived from the name; used in paths
    id: String,

    /// User-chosen name
    name: String,

    /// Free-text comment supplied at creation
    comment: String,

    /// Record shape discipline
    kind: FormKind,

    /// Next auto-increment id; fetch-add on every insert that needs one,
    /// never decremented or reused, even when the write later fails
    auto_id: AtomicU32,

    /// Indexes in creation order; element 0 is always the primary
    indexes: RwLock<Vec<Arc<Index>>>,

    /// This form's directory
    path: PathBuf,

    /// Append-only value log shared by all of this form's indexes
    value_log: PathBuf,
}

impl Form {
    const VALUE_LOG_FILENAME: &'static str = "values.log";

    /// Create a form directory under `parent` with its primary index
    pub fn create(
        parent: &Path,
        id: String,
        name: &str,
        comment: &str,
        kind: FormKind,
    ) -> Result<Self> {
        let path = parent.join(&id);
        std::fs::create_dir_all(&path)?;

        let form = Self {
            id,
            name: name.to_string(),
            comment: comment.to_string(),
            kind,
            auto_id: AtomicU32::new(1),
            indexes: RwLock::new(Vec::new()),
            value_log: path.join(Self::VALUE_LOG_FILENAME),
            path,
        };

        // The primary index always keys by the original key
        form.add_index(KeyField::OriginalKey, true)?;
        Ok(form)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn comment(&self) -> &str {
        &self.comment
    }

    pub fn kind(&self) -> FormKind {
        self.kind
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn value_log(&self) -> &Path {
        &self.value_log
    }

    // =========================================================================
    // Auto-Increment Ids
    // =========================================================================

    /// Claim the next auto-increment id (atomic; ids are never reused)
    pub fn next_auto_id(&self) -> u32 {
        self.auto_id.fetch_add(1, Ordering::SeqCst)
    }

    /// Keep the counter ahead of an explicitly supplied numeric key so a
    /// later auto insert cannot collide with it
    pub fn observe_id(&self, id: u32) {
        self.auto_id.fetch_max(id.saturating_add(1), Ordering::SeqCst);
    }

    // =========================================================================
    // Indexes
    // =========================================================================

    /// Create a secondary index over a field path.
    ///
    /// Fails with AlreadyExists when an index over the same path exists.
    /// The new index covers subsequent writes only.
    pub fn create_index(&self, field_path: &str) -> Result<Arc<Index>> {
        let field = KeyField::parse(field_path);
        self.add_index(field, false)
    }

    fn add_index(&self, field: KeyField, is_primary: bool) -> Result<Arc<Index>> {
        let mut indexes = self.indexes.write();
        if indexes.iter().any(|index| index.field() == &field) {
            return Err(RadixError::AlreadyExists(format!(
                "index over {:?} on form {:?}",
                field.as_str(),
                self.name
            )));
        }

        let id = indexes.len() as u32;
        let dir = self.path.join(format!("index_{}", id));
        std::fs::create_dir_all(&dir)?;

        let index = Arc::new(Index::new(id, is_primary, field, &dir));
        indexes.push(Arc::clone(&index));
        Ok(index)
    }

    /// The primary index (position 0 by construction)
    pub fn primary(&self) -> Arc<Index> {
        Arc::clone(&self.indexes.read()[0])
    }

    /// Snapshot of all indexes in creation order
    pub fn indexes(&self) -> Vec<Arc<Index>> {
        self.indexes.read().iter().map(Arc::clone).collect()
    }

    /// Find an index by its field path
    pub fn index_for_field(&self, field_path: &str) -> Result<Arc<Index>> {
        let field = KeyField::parse(field_path);
        self.indexes
            .read()
            .iter()
            .find(|index| index.field() == &field)
            .map(Arc::clone)
            .ok_or_else(|| {
                RadixError::NotFound(format!(
                    "index over {:?} on form {:?}",
                    field_path, self.name
                ))
            })
    }

    // =========================================================================
    // Validation
    // =========================================================================

    /// Enforce the form kind's shape discipline on an incoming value
    pub fn validate(&self, value: &Value) -> Result<()> {
        match self.kind {
            FormKind::Document => Ok(()),
            FormKind::Tabular => match value {
                Value::Map(fields) if fields.values().all(Value::is_scalar) => Ok(()),
                _ => Err(RadixError::Encoding(format!(
                    "tabular form {:?} requires a flat map of scalars",
                    self.name
                ))),
            },
        }
    }
}
