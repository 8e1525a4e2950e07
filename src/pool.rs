//! Worker Pool
//!
//! A fixed set of worker threads consuming jobs from a crossbeam channel.
//! The write coordinator uses it to fan one logical write out across all of
//! a form's indexes.
//!
//! Constructed once by the Engine and passed by handle — no global pool.

use std::thread::JoinHandle;

use crossbeam::channel::{unbounded, Sender};

use crate::error::{RadixError, Result};

type Job = Box<dyn FnOnce() + Send + 'static>;

/// Fixed-size thread pool
pub struct WorkerPool {
    /// Job queue; dropping it signals the workers to exit
    sender: Option<Sender<Job>>,

    /// Worker handles, joined on drop
    workers: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    /// Spawn `size` worker threads
    pub fn new(size: usize) -> Result<Self> {
        let size = size.max(1);
        let (sender, receiver) = unbounded::<Job>();

        let mut workers = Vec::with_capacity(size);
        for id in 0..size {
            let receiver = receiver.clone();
            let handle = std::thread::Builder::new()
                .name(format!("radixdb-worker-{}", id))
                .spawn(move || {
                    // Exits when the sender side is dropped
                    while let Ok(job) = receiver.recv() {
                        job();
                    }
                })?;
            workers.push(handle);
        }

        Ok(Self {
            sender: Some(sender),
            workers,
        })
    }

    /// Submit a job for execution on some worker
    pub fn execute<F>(&self, job: F) -> Result<()>
    where
        F: FnOnce() + Send + 'static,
    {
        let sender = self
            .sender
            .as_ref()
            .ok_or_else(|| RadixError::Storage("worker pool shut down".to_string()))?;
        sender
            .send(Box::new(job))
            .map_err(|_| RadixError::Storage("worker pool shut down".to_string()))
    }

    /// Number of worker threads
    pub fn size(&self) -> usize {
        self.workers.len()
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        // Close the queue, then wait for in-flight jobs to finish
        self.sender.take();
        for handle in self.workers.drain(..) {
            let _ = handle.join();
        }
    }
}
