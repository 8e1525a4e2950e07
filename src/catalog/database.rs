//! Database
//!
//! The top catalog object: a named directory tree owning forms.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::{RadixError, Result};

use super::form::{Form, FormKind};
use super::derive_id;

/// A database and its forms
#[derive(Debug)]
pub struct Database {
    /// Immutable id derived from the name; names the on-disk directory
    id: String,

    /// User-chosen name
    name: String,

    /// Free-text comment supplied at creation
    comment: String,

    /// This database's directory
    path: PathBuf,

    /// Forms by name
    forms: RwLock<HashMap<String, Arc<Form>>>,
}

impl Database {
    /// Create the database directory
    pub fn create(data_dir: &Path, id: String, name: &str, comment: &str) -> Result<Self> {
        let path = data_dir.join(&id);
        std::fs::create_dir_all(&path)?;

        Ok(Self {
            id,
            name: name.to_string(),
            comment: comment.to_string(),
            path,
            forms: RwLock::new(HashMap::new()),
        })
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

    pub fn path(&self) -> &Path {
        &self.path
    }

    // =========================================================================
    // Forms
    // =========================================================================

    /// Create a form (and its primary index) under this database
    pub fn create_form(&self, name: &str, comment: &str, kind: FormKind) -> Result<Arc<Form>> {
        let mut forms = self.forms.write();
        if forms.contains_key(name) {
            return Err(RadixError::AlreadyExists(format!(
                "form {:?} in database {:?}",
                name, self.name
            )));
        }

        let id = derive_id(name, |candidate| {
            forms.values().any(|form| form.id() == candidate)
        });
        let form = Arc::new(Form::create(&self.path, id, name, comment, kind)?);

        tracing::debug!(db = %self.name, form = %name, id = %form.id(), "created form");
        forms.insert(name.to_string(), Arc::clone(&form));
        Ok(form)
    }

    /// Look up a form by name
    pub fn form(&self, name: &str) -> Result<Arc<Form>> {
        self.forms
            .read()
            .get(name)
            .map(Arc::clone)
            .ok_or_else(|| {
                RadixError::NotFound(format!("form {:?} in database {:?}", name, self.name))
            })
    }

    /// Number of forms
    pub fn form_count(&self) -> usize {
        self.forms.read().len()
    }
}
