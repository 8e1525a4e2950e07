//! Storage Module
//!
//! File-backed persistence: one append-only value log per form and one
//! fixed-width index log per index.
//!
//! ## Responsibilities
//! - Append serialized values, returning their (offset, length)
//! - Append or overwrite fixed-width index records at stable slot offsets
//! - Read back exact value byte ranges
//! - Cap concurrently open file handles with a process-wide gate
//!
//! ## File Formats
//! ```text
//! values.log     [blob][blob][blob]...
//!                no delimiters; offset + length always travel in the
//!                index record, never inside the log
//!
//! index.log      [record 0][record 1][record 2]...
//!                each record exactly RECORD_WIDTH bytes:
//!                [routing key (10)][digest hex (32)][offset (10)][len (8)]
//!                record N sits at byte N * RECORD_WIDTH
//! ```

mod engine;
mod gate;

pub use engine::{StorageEngine, WriteResult};
pub use gate::{FdGate, FdPermit};
