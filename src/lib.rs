//! # RadixDB
//!
//! An embedded, single-process key/value storage engine with secondary
//! indexing:
//! - Deterministic, sparsely-materialized radix index tree routing hashed
//!   keys to fixed-width on-disk index records
//! - Append-only value log with collision-safe leaf resolution
//! - Concurrent write coordinator fanning one logical write across all of a
//!   form's indexes before committing
//! - Scan engine with scope/condition/match filters, sort, skip and limit
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Engine                                │
//! │        (databases → forms → indexes, shared resources)       │
//! └──────────┬────────────────────────────────┬─────────────────┘
//!            │ writes                         │ reads
//! ┌──────────▼──────────┐          ┌──────────▼──────────┐
//! │  Write Coordinator  │          │      Selector       │
//! │  (fan-out on pool)  │          │   (tree traversal)  │
//! └──────────┬──────────┘          └──────────┬──────────┘
//!            │                                │
//! ┌──────────▼────────────────────────────────▼─────────────────┐
//! │                   Radix Index Tree                           │
//! │        (sorted sparse nodes → leaf buckets → Links)          │
//! └──────────────────────────┬──────────────────────────────────┘
//!                            │
//! ┌──────────────────────────▼──────────────────────────────────┐
//! │                    Storage Engine                            │
//! │      (value log + index logs, bounded FD gate)               │
//! └─────────────────────────────────────────────────────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod keys;
pub mod value;
pub mod tree;
pub mod storage;
pub mod pool;
pub mod catalog;
pub mod writer;
pub mod select;
pub mod engine;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use catalog::{Database, Form, FormKind, Index, FIELD_ID, FIELD_KEY};
pub use config::Config;
pub use engine::Engine;
pub use error::{RadixError, Result};
pub use select::{CondOp, Selector};
pub use value::Value;
pub use writer::PutOutcome;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of RadixDB
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
