//! Configuration for RadixDB
//!
//! Centralized configuration with sensible defaults.

use std::path::PathBuf;

/// Main configuration for a RadixDB instance
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Storage Configuration
    // -------------------------------------------------------------------------
    /// Root directory for all data files.
    /// Internal structure:
    ///   {data_dir}/
    ///     └── {db_id}/
    ///         └── {form_id}/
    ///             ├── values.log       (append-only value log)
    ///             └── index_{n}/
    ///                 └── index.log    (fixed-width index records)
    pub data_dir: PathBuf,

    /// Max number of concurrently open file handles (process-wide gate)
    pub max_open_files: usize,

    // -------------------------------------------------------------------------
    // Worker Pool Configuration
    // -------------------------------------------------------------------------
    /// Number of worker threads used for per-index fan-out
    pub worker_threads: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./radixdb_data"),
            max_open_files: 64,
            worker_threads: 8,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the data directory (root for all storage)
    pub fn data_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.data_dir = path.into();
        self
    }

    /// Set the file-handle gate capacity
    pub fn max_open_files(mut self, count: usize) -> Self {
        self.config.max_open_files = count.max(1);
        self
    }

    /// Set the worker pool size
    pub fn worker_threads(mut self, count: usize) -> Self {
        self.config.worker_threads = count.max(1);
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
