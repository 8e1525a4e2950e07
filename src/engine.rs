//! Engine Module
//!
//! The top-level entry point that owns all shared resources and the catalog.
//!
//! ## Responsibilities
//! - Construct the StorageEngine, WorkerPool, and WriteCoordinator once at
//!   startup and hand them to everything that needs them (no globals)
//! - Own the database map and route the public operations through the
//!   catalog, coordinator, and scan engine

use std::collections::HashMap;
use std::fs;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::catalog::{derive_id, Database, Form, FormKind};
use crate::config::Config;
use crate::error::{RadixError, Result};
use crate::keys::{key_digest, routing_key};
use crate::pool::WorkerPool;
use crate::select::Selector;
use crate::storage::StorageEngine;
use crate::tree::route;
use crate::value::Value;
use crate::writer::{PutOutcome, WriteCoordinator};

/// The embedded storage engine
///
/// ## Concurrency Model
///
/// - Catalog mutations (create/drop database, create form/index) take the
///   relevant map's write lock.
/// - Puts fan out on the worker pool; per-bucket leaf locks serialize
///   colliding writers, writers to different buckets proceed independently.
/// - Gets and selects are read-only: shared locks down the tree, then either
///   a gated file read (get) or the value cache (select).
pub struct Engine {
    /// Engine configuration
    config: Config,

    /// File I/O engine (value logs, index logs, FD gate)
    storage: Arc<StorageEngine>,

    /// Worker pool for write fan-out
    pool: Arc<WorkerPool>,

    /// Write path coordinator
    coordinator: WriteCoordinator,

    /// Databases by name
    databases: RwLock<HashMap<String, Arc<Database>>>,
}

impl Engine {
    /// Open an engine with the given config, creating the data directory
    pub fn open(config: Config) -> Result<Self> {
        fs::create_dir_all(&config.data_dir)?;

        let storage = Arc::new(StorageEngine::new(config.max_open_files));
        let pool = Arc::new(WorkerPool::new(config.worker_threads)?);
        let coordinator = WriteCoordinator::new(Arc::clone(&storage), Arc::clone(&pool));

        tracing::info!(
            data_dir = %config.data_dir.display(),
            workers = pool.size(),
            "engine opened"
        );

        Ok(Self {
            config,
            storage,
            pool,
            coordinator,
            databases: RwLock::new(HashMap::new()),
        })
    }

    /// Open with default config rooted at `path` (convenience)
    pub fn open_path(path: &std::path::Path) -> Result<Self> {
        Self::open(Config::builder().data_dir(path).build())
    }

    // =========================================================================
    // Catalog Operations
    // =========================================================================

    /// Create a database
    pub fn create_database(&self, name: &str, comment: &str) -> Result<Arc<Database>> {
        let mut databases = self.databases.write();
        if databases.contains_key(name) {
            return Err(RadixError::AlreadyExists(format!("database {:?}", name)));
        }

        let id = derive_id(name, |candidate| {
            databases.values().any(|db| db.id() == candidate)
        });
        let database = Arc::new(Database::create(&self.config.data_dir, id, name, comment)?);

        tracing::info!(db = %name, id = %database.id(), "created database");
        databases.insert(name.to_string(), Arc::clone(&database));
        Ok(database)
    }

    /// Drop a database and remove its directory tree
    pub fn drop_database(&self, name: &str) -> Result<()> {
        let database = self
            .databases
            .write()
            .remove(name)
            .ok_or_else(|| RadixError::NotFound(format!("database {:?}", name)))?;

        fs::remove_dir_all(database.path())?;
        tracing::info!(db = %name, "dropped database");
        Ok(())
    }

    /// Look up a database by name
    pub fn database(&self, name: &str) -> Result<Arc<Database>> {
        self.databases
            .read()
            .get(name)
            .map(Arc::clone)
            .ok_or_else(|| RadixError::NotFound(format!("database {:?}", name)))
    }

    /// Create a form (with its primary index) in a database
    pub fn create_form(
        &self,
        db: &str,
        name: &str,
        comment: &str,
        kind: FormKind,
    ) -> Result<Arc<Form>> {
        self.database(db)?.create_form(name, comment, kind)
    }

    /// Create a secondary index over a field path
    pub fn create_index(&self, db: &str, form: &str, field_path: &str) -> Result<()> {
        let form = self.database(db)?.form(form)?;
        form.create_index(field_path)?;
        tracing::info!(db = %db, form = %form.name(), field = %field_path, "created index");
        Ok(())
    }

    // =========================================================================
    // Data Operations
    // =========================================================================

    /// Put a value. `key` of None requests an auto-increment key; `is_update`
    /// of false refuses to overwrite an existing key.
    ///
    /// Returns the key the record is now addressable by.
    pub fn put(
        &self,
        db: &str,
        form: &str,
        key: Option<&str>,
        value: Value,
        is_update: bool,
    ) -> Result<PutOutcome> {
        let form = self.database(db)?.form(form)?;
        self.coordinator.put(&form, key, value, is_update)
    }

    /// Get a value by its original key via the primary index.
    ///
    /// Reads the value bytes back from the value log; the Link only tells us
    /// where to look.
    pub fn get(&self, db: &str, form: &str, key: &str) -> Result<Value> {
        let form = self.database(db)?.form(form)?;
        let primary = form.primary();

        let key_bytes = key.as_bytes();
        let digits = route(routing_key(key_bytes));
        let leaf = primary
            .root()
            .descend(&digits)
            .ok_or_else(|| RadixError::NotFound(format!("key {:?}", key)))?;
        let link = leaf
            .find_link(&key_digest(key_bytes))
            .ok_or_else(|| RadixError::NotFound(format!("key {:?}", key)))?;

        let raw = self
            .storage
            .read_value(form.value_log(), link.value_offset, link.value_length)?;
        Value::decode(&raw)
    }

    /// Run a selector against one of a form's indexes, chosen by field path
    /// (`@key` for the primary)
    pub fn select(
        &self,
        db: &str,
        form: &str,
        index_field: &str,
        selector: &Selector,
    ) -> Result<Vec<Value>> {
        let form = self.database(db)?.form(form)?;
        let index = form.index_for_field(index_field)?;
        selector.run(&index)
    }

    // =========================================================================
    // Accessors (for testing and debugging)
    // =========================================================================

    /// Get the data directory path
    pub fn data_dir(&self) -> &std::path::Path {
        &self.config.data_dir
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Number of databases
    pub fn database_count(&self) -> usize {
        self.databases.read().len()
    }

    /// Number of fan-out worker threads
    pub fn worker_count(&self) -> usize {
        self.pool.size()
    }
}
