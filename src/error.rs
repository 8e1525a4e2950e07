//! Error types for RadixDB
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

/// Result type alias using RadixError
pub type Result<T> = std::result::Result<T, RadixError>;

/// Unified error type for RadixDB operations
#[derive(Debug, Error)]
pub enum RadixError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Catalog Errors
    // -------------------------------------------------------------------------
    #[error("already exists: {0}")]
    AlreadyExists(String),

    #[error("not found: {0}")]
    NotFound(String),

    // -------------------------------------------------------------------------
    // Index Errors
    // -------------------------------------------------------------------------
    #[error("invalid field path: {0}")]
    InvalidFieldPath(String),

    // -------------------------------------------------------------------------
    // Serialization Errors
    // -------------------------------------------------------------------------
    #[error("encoding error: {0}")]
    Encoding(String),

    // -------------------------------------------------------------------------
    // Storage Errors
    // -------------------------------------------------------------------------
    #[error("storage error: {0}")]
    Storage(String),
}
