//! Storage Engine
//!
//! Append-only value-log writes, fixed-width index-record writes, and exact
//! value reads, behind the file-handle gate.
//!
//! ## Concurrency
//! - Appends to one log are serialized by a per-path lock so two writers
//!   cannot interleave between the end-of-file probe and the write.
//! - In-place index-record overwrites target disjoint fixed-width slots and
//!   need no cross-writer ordering.
//! - Every open holds an [`FdGate`] permit for its whole scope.

use std::collections::HashMap;
use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use bytes::Bytes;
use parking_lot::Mutex;

use crate::error::{RadixError, Result};
use crate::keys::{MAX_VALUE_LENGTH, RECORD_WIDTH};
use crate::tree::UNWRITTEN;

use super::FdGate;

/// Outcome of one value append: the byte range now holding the value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteResult {
    /// Start offset of the appended bytes
    pub offset: u32,
    /// Number of bytes appended
    pub length: u32,
}

/// File I/O engine shared by every index and form.
///
/// Constructed once at startup and passed by handle into the write
/// coordinator and catalog — no global state.
pub struct StorageEngine {
    /// Process-wide cap on open file handles
    gate: FdGate,

    /// Per-log append locks, created on first touch
    append_locks: Mutex<HashMap<PathBuf, Arc<Mutex<()>>>>,
}

impl StorageEngine {
    /// Create an engine admitting at most `max_open_files` concurrent opens
    pub fn new(max_open_files: usize) -> Self {
        Self {
            gate: FdGate::new(max_open_files),
            append_locks: Mutex::new(HashMap::new()),
        }
    }

    // =========================================================================
    // Value Log
    // =========================================================================

    /// Append a serialized value to a value log.
    ///
    /// Returns the start offset and length actually written. Payloads longer
    /// than [`MAX_VALUE_LENGTH`] are rejected here, before any byte lands —
    /// their index records could never encode the length field, so appending
    /// first would strand an unreachable value. Safe for concurrent callers:
    /// the per-path lock keeps offset probe and write atomic with respect to
    /// other appends to the same log.
    pub fn append_value(&self, log: &Path, payload: &Bytes) -> Result<WriteResult> {
        let length = u32::try_from(payload.len())
            .ok()
            .filter(|&n| u64::from(n) <= MAX_VALUE_LENGTH)
            .ok_or_else(|| {
                RadixError::Encoding(format!(
                    "value of {} bytes exceeds the {}-byte per-value bound",
                    payload.len(),
                    MAX_VALUE_LENGTH
                ))
            })?;

        let lock = self.append_lock(log);
        let _append_guard = lock.lock();
        let _permit = self.gate.acquire()?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(log)?;
        let offset = file.seek(SeekFrom::End(0))?;
        let offset = u32::try_from(offset).map_err(|_| {
            RadixError::Storage(format!("value log {} exceeds 4 GiB", log.display()))
        })?;

        file.write_all(payload)?;
        file.sync_data()?;

        Ok(WriteResult { offset, length })
    }

    /// Read back exactly `length` bytes at `offset` from a value log
    pub fn read_value(&self, log: &Path, offset: u32, length: u32) -> Result<Vec<u8>> {
        let _permit = self.gate.acquire()?;

        let mut file = File::open(log)?;
        file.seek(SeekFrom::Start(u64::from(offset)))?;

        let mut buffer = vec![0u8; length as usize];
        file.read_exact(&mut buffer)?;
        Ok(buffer)
    }

    // =========================================================================
    // Index Log
    // =========================================================================

    /// Write one fixed-width index record.
    ///
    /// With `record_offset` = [`UNWRITTEN`], a new slot is appended at
    /// end-of-file and its offset becomes the slot's permanent address for
    /// all future overwrites. Otherwise the record overwrites its existing
    /// slot in place.
    ///
    /// Returns the slot offset the record landed at.
    pub fn write_index_record(
        &self,
        log: &Path,
        record_offset: i64,
        record: &[u8],
    ) -> Result<u64> {
        if record.len() != RECORD_WIDTH {
            return Err(RadixError::Storage(format!(
                "index record must be {} bytes, got {}",
                RECORD_WIDTH,
                record.len()
            )));
        }

        if record_offset == UNWRITTEN {
            // New slot: appends to one log serialize so slots never overlap
            let lock = self.append_lock(log);
            let _append_guard = lock.lock();
            let _permit = self.gate.acquire()?;

            let mut file = OpenOptions::new().create(true).write(true).open(log)?;
            let offset = file.seek(SeekFrom::End(0))?;
            file.write_all(record)?;
            file.sync_data()?;
            Ok(offset)
        } else {
            let offset = u64::try_from(record_offset).map_err(|_| {
                RadixError::Storage(format!("negative record offset {}", record_offset))
            })?;
            let _permit = self.gate.acquire()?;

            let mut file = OpenOptions::new().write(true).open(log)?;
            file.seek(SeekFrom::Start(offset))?;
            file.write_all(record)?;
            file.sync_data()?;
            Ok(offset)
        }
    }

    /// Current length of a log file (0 if it does not exist yet)
    pub fn log_len(&self, log: &Path) -> Result<u64> {
        match std::fs::metadata(log) {
            Ok(meta) => Ok(meta.len()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(0),
            Err(e) => Err(e.into()),
        }
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    /// Get or create the append lock for a log path
    fn append_lock(&self, log: &Path) -> Arc<Mutex<()>> {
        let mut locks = self.append_locks.lock();
        Arc::clone(
            locks
                .entry(log.to_path_buf())
                .or_insert_with(|| Arc::new(Mutex::new(()))),
        )
    }
}
