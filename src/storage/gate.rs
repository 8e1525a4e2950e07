//! File-Descriptor Gate
//!
//! A bounded, process-wide cap on concurrently open file handles. Every file
//! open acquires a permit; the permit returns to the gate on drop, including
//! on error paths.

use crossbeam::channel::{bounded, Receiver, Sender};

use crate::error::{RadixError, Result};

/// Bounded gate over open file handles.
///
/// Implemented as a token channel: the channel starts full with `capacity`
/// tokens; acquiring a permit takes one out and may block until a slot
/// frees.
pub struct FdGate {
    slots: Receiver<()>,
    returns: Sender<()>,
}

impl FdGate {
    /// Create a gate admitting at most `capacity` concurrent opens
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let (returns, slots) = bounded(capacity);
        for _ in 0..capacity {
            // Channel was just created with exactly this capacity
            let _ = returns.send(());
        }
        Self { slots, returns }
    }

    /// Take a slot, blocking until one is free
    pub fn acquire(&self) -> Result<FdPermit> {
        self.slots
            .recv()
            .map_err(|_| RadixError::Storage("file gate closed".to_string()))?;
        Ok(FdPermit {
            returns: self.returns.clone(),
        })
    }

    /// Slots currently free (approximate under concurrency; used by tests)
    pub fn available(&self) -> usize {
        self.slots.len()
    }
}

/// Scoped gate slot; returns itself on drop
pub struct FdPermit {
    returns: Sender<()>,
}

impl Drop for FdPermit {
    fn drop(&mut self) {
        let _ = self.returns.send(());
    }
}
