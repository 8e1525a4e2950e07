//! Write Coordinator
//!
//! Fans a single logical put across all of a form's indexes before
//! committing: every per-index key computation must succeed before any byte
//! is durably written, the value is appended exactly once, and every index
//! record write uses the same (offset, length).
//!
//! ## Ordering within one logical write
//! 1. resolve the numeric id and original key
//! 2. fan out per-index key computation on the worker pool, join
//! 3. any computation failure fails the write — nothing observable changed
//! 4. no-overwrite pre-check against the primary leaf when not updating
//! 5. append the value once
//! 6. fan out per-index record writes, join; the primary repeats the
//!    no-overwrite check under its leaf lock, so racing first inserts of
//!    one key admit exactly one writer
//!
//! A record write failing after step 5 leaves the value reachable from some
//! indexes but not others. That inconsistency window is deliberate (no
//! rollback); it is logged and surfaced as the write's error.

use std::sync::Arc;

use bytes::Bytes;
use crossbeam::channel::bounded;

use crate::catalog::{Form, Index};
use crate::error::{RadixError, Result};
use crate::keys::{encode_record, key_digest, routing_key};
use crate::pool::WorkerPool;
use crate::storage::{StorageEngine, WriteResult};
use crate::tree::{route, Link, LEVELS, UNWRITTEN};
use crate::value::Value;

/// Outcome of one logical put
#[derive(Debug, Clone)]
pub struct PutOutcome {
    /// The key the record is addressable by (caller-supplied or the decimal
    /// auto-id)
    pub key: String,

    /// The numeric id assigned or reused for this write
    pub id: u32,

    /// Byte range of the appended value
    pub result: WriteResult,
}

/// Where one index places the record: everything needed to write its Link
/// and index record, computed before any durable write.
struct Placement {
    index: Arc<Index>,
    routing: u32,
    digits: [u8; LEVELS],
    digest: [u8; 16],
}

/// Coordinates the write path for every form
pub struct WriteCoordinator {
    storage: Arc<StorageEngine>,
    pool: Arc<WorkerPool>,
}

impl WriteCoordinator {
    pub fn new(storage: Arc<StorageEngine>, pool: Arc<WorkerPool>) -> Self {
        Self { storage, pool }
    }

    /// Execute one logical put against a form
    pub fn put(
        &self,
        form: &Arc<Form>,
        key: Option<&str>,
        value: Value,
        is_update: bool,
    ) -> Result<PutOutcome> {
        form.validate(&value)?;

        // Step 1: assign/reuse the numeric id. A caller-supplied decimal key
        // is the id itself; anything else claims a fresh one.
        let (id, original_key) = match key {
            Some(k) => match k.parse::<u32>() {
                Ok(n) => {
                    form.observe_id(n);
                    (n, k.to_string())
                }
                Err(_) => (form.next_auto_id(), k.to_string()),
            },
            None => {
                let n = form.next_auto_id();
                (n, n.to_string())
            }
        };

        // Step 2/3: compute every index placement concurrently; a single
        // failure (e.g. a bad field path) fails the write before any byte
        // lands on disk.
        let value = Arc::new(value);
        let placements = self.compute_placements(form, id, &original_key, &value)?;

        // Step 4: refuse to silently overwrite an existing key. This is a
        // fast path only; the authoritative check runs under the leaf lock
        // in step 6, which a racing insert cannot slip past.
        if !is_update {
            let primary = placements
                .iter()
                .find(|p| p.index.is_primary())
                .ok_or_else(|| RadixError::Storage("form has no primary index".to_string()))?;
            if let Some(leaf) = primary.index.root().descend(&primary.digits) {
                if leaf.find_link(&primary.digest).is_some() {
                    return Err(RadixError::AlreadyExists(format!(
                        "key {:?} in form {:?}",
                        original_key,
                        form.name()
                    )));
                }
            }
        }

        // Step 5: append the value once
        let payload = Bytes::from(value.encode()?);
        let write = self.storage.append_value(form.value_log(), &payload)?;

        // Step 6: write every index record with the same (offset, length)
        let write_result =
            self.write_placements(placements, write, &value, &original_key, is_update);
        if let Err(ref e) = write_result {
            // Known weak point: the value is already durable; some indexes
            // may now reach it and others not. Surfaced, not rolled back.
            tracing::warn!(
                form = %form.name(),
                key = %original_key,
                error = %e,
                "index record write failed after value append; indexes may disagree"
            );
        }
        write_result?;

        tracing::debug!(
            form = %form.name(),
            key = %original_key,
            offset = write.offset,
            length = write.length,
            "put committed"
        );

        Ok(PutOutcome {
            key: original_key,
            id,
            result: write,
        })
    }

    // =========================================================================
    // Fan-Out Phases
    // =========================================================================

    /// Phase one: pure per-index key computation on the pool
    fn compute_placements(
        &self,
        form: &Arc<Form>,
        id: u32,
        original_key: &str,
        value: &Arc<Value>,
    ) -> Result<Vec<Placement>> {
        let indexes = form.indexes();
        let jobs: Vec<_> = indexes
            .into_iter()
            .map(|index| {
                let value = Arc::clone(value);
                let original_key = original_key.as_bytes().to_vec();
                move || -> Result<Placement> {
                    let key_bytes = index.key_bytes(id, &original_key, &value)?;
                    let routing = routing_key(&key_bytes);
                    Ok(Placement {
                        routing,
                        digits: route(routing),
                        digest: key_digest(&key_bytes),
                        index,
                    })
                }
            })
            .collect();

        self.fan_out(jobs)
    }

    /// Phase two: per-index Link update + record write on the pool
    fn write_placements(
        &self,
        placements: Vec<Placement>,
        write: WriteResult,
        value: &Arc<Value>,
        original_key: &str,
        is_update: bool,
    ) -> Result<()> {
        let storage = &self.storage;
        let jobs: Vec<_> = placements
            .into_iter()
            .map(|placement| {
                let storage = Arc::clone(storage);
                let cached = Value::clone(value);
                let key = original_key.to_string();
                let deny_existing = !is_update && placement.index.is_primary();
                move || write_index_link(&storage, &placement, write, cached, deny_existing, &key)
            })
            .collect();

        self.fan_out(jobs).map(|_: Vec<()>| ())
    }

    /// Run jobs on the pool and join all results over a bounded channel.
    ///
    /// Every job runs to completion even when another fails; the first error
    /// (in job order) becomes the fan-out's result.
    fn fan_out<T, F>(&self, jobs: Vec<F>) -> Result<Vec<T>>
    where
        T: Send + 'static,
        F: FnOnce() -> Result<T> + Send + 'static,
    {
        let total = jobs.len();
        let (tx, rx) = bounded(total);

        for (position, job) in jobs.into_iter().enumerate() {
            let tx = tx.clone();
            self.pool.execute(move || {
                let _ = tx.send((position, job()));
            })?;
        }
        drop(tx);

        let mut slots: Vec<Option<T>> = std::iter::repeat_with(|| None).take(total).collect();
        let mut first_error: Option<(usize, RadixError)> = None;

        for _ in 0..total {
            let (position, outcome) = rx
                .recv()
                .map_err(|_| RadixError::Storage("fan-out worker disconnected".to_string()))?;
            match outcome {
                Ok(result) => slots[position] = Some(result),
                Err(e) => match first_error {
                    Some((held, _)) if held < position => {}
                    _ => first_error = Some((position, e)),
                },
            }
        }

        if let Some((_, e)) = first_error {
            return Err(e);
        }

        slots
            .into_iter()
            .map(|slot| {
                slot.ok_or_else(|| RadixError::Storage("fan-out result missing".to_string()))
            })
            .collect()
    }
}

/// Update (or create) the Link for one index and write its fixed-width
/// record, holding the bucket lock for the whole step.
///
/// With `deny_existing`, an already-present digest fails the write instead
/// of updating the Link — the decisive no-overwrite check for the primary.
fn write_index_link(
    storage: &StorageEngine,
    placement: &Placement,
    write: WriteResult,
    cached: Value,
    deny_existing: bool,
    key: &str,
) -> Result<()> {
    let leaf = placement.index.root().descend_or_create(&placement.digits);

    // Bucket lock: serializes Link creation/update and the record write for
    // this leaf, so two writers cannot double-allocate a slot.
    let mut links = leaf.links_mut();

    let existing = links
        .iter()
        .position(|link| link.key_digest == placement.digest);

    // A racing first insert may have created this Link after the unlocked
    // pre-check in put
    if deny_existing && existing.is_some() {
        return Err(RadixError::AlreadyExists(format!("key {:?}", key)));
    }

    let record_offset = match existing {
        Some(pos) => links[pos].record_offset,
        None => UNWRITTEN,
    };

    let record = encode_record(placement.routing, &placement.digest, write.offset, write.length)?;
    let slot = storage.write_index_record(placement.index.log_path(), record_offset, &record)?;
    let slot = i64::try_from(slot)
        .map_err(|_| RadixError::Storage("index log slot offset overflow".to_string()))?;

    match existing {
        Some(pos) => {
            // Update in place: same slot, new value range
            let link = &mut links[pos];
            link.record_offset = slot;
            link.value_offset = write.offset;
            link.value_length = write.length;
            link.cached = cached;
        }
        None => {
            let mut link = Link::new(placement.digest);
            link.record_offset = slot;
            link.value_offset = write.offset;
            link.value_length = write.length;
            link.cached = cached;
            links.push(link);
        }
    }

    Ok(())
}
