//! Dedicated background thread for asynchronous screen ticks.
//!
//! Screens configured with an asynchronous tick do their periodic work on a
//! [`Worker`] instead of the host main thread. The worker processes jobs
//! sequentially, in the order they were sent, on a single named thread.
//!
//! Jobs must not touch live host views directly; anything that has to reach
//! the host is posted to a [`MainThreadQueue`](crate::MainThreadQueue).
//!
//! # Example
//!
//! ```
//! use lattice_inventory_core::worker::{Worker, WorkerConfig};
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//!
//! let worker = Worker::spawn(WorkerConfig::with_name("tick-worker")).unwrap();
//! let runs = Arc::new(AtomicUsize::new(0));
//!
//! let counter = runs.clone();
//! worker.send(move || {
//!     counter.fetch_add(1, Ordering::SeqCst);
//! });
//!
//! worker.stop_and_join();
//! assert_eq!(runs.load(Ordering::SeqCst), 1);
//! ```

use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::thread::{self, JoinHandle};

use crossbeam_channel::{Receiver, Sender, TrySendError, bounded};
use parking_lot::Mutex;

/// Default capacity for the worker's job queue.
const DEFAULT_QUEUE_CAPACITY: usize = 256;

/// Configuration for spawning a [`Worker`].
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Name for the worker thread.
    pub name: String,
    /// Stack size for the worker thread in bytes. `None` uses the default.
    pub stack_size: Option<usize>,
    /// Capacity of the job queue. Sends beyond it are rejected.
    pub queue_capacity: usize,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            name: "lattice-inventory-tick".to_string(),
            stack_size: None,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
        }
    }
}

impl WorkerConfig {
    /// Create a configuration with the given thread name.
    pub fn with_name(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

/// A job run on the worker thread.
pub type WorkerJob = Box<dyn FnOnce() + Send + 'static>;

enum WorkerMessage {
    Run(WorkerJob),
    Shutdown,
}

/// State shared between the handle and the worker thread.
struct WorkerState {
    running: AtomicBool,
    pending_jobs: AtomicUsize,
}

/// A single background thread with its own job queue.
pub struct Worker {
    sender: Sender<WorkerMessage>,
    handle: Mutex<Option<JoinHandle<()>>>,
    state: Arc<WorkerState>,
}

impl Worker {
    /// Spawn the worker thread.
    ///
    /// # Errors
    ///
    /// Returns the OS error if the thread cannot be spawned.
    pub fn spawn(config: WorkerConfig) -> io::Result<Self> {
        let (sender, receiver) = bounded(config.queue_capacity.max(1));
        let state = Arc::new(WorkerState {
            running: AtomicBool::new(true),
            pending_jobs: AtomicUsize::new(0),
        });

        let mut builder = thread::Builder::new().name(config.name.clone());
        if let Some(stack_size) = config.stack_size {
            builder = builder.stack_size(stack_size);
        }

        let thread_state = state.clone();
        let handle = builder.spawn(move || {
            worker_loop(receiver, &thread_state);
            thread_state.running.store(false, Ordering::Release);
        })?;

        tracing::debug!(target: "lattice_inventory::tick", name = %config.name, "tick worker started");

        Ok(Self {
            sender,
            handle: Mutex::new(Some(handle)),
            state,
        })
    }

    /// Check if the worker still accepts jobs.
    pub fn is_running(&self) -> bool {
        self.state.running.load(Ordering::Acquire)
    }

    /// Number of jobs queued or running.
    pub fn pending_jobs(&self) -> usize {
        self.state.pending_jobs.load(Ordering::Acquire)
    }

    /// Queue a job.
    ///
    /// Returns `false` if the worker has been stopped or the queue is full.
    pub fn send<F>(&self, job: F) -> bool
    where
        F: FnOnce() + Send + 'static,
    {
        if !self.is_running() {
            return false;
        }

        self.state.pending_jobs.fetch_add(1, Ordering::AcqRel);
        match self.sender.try_send(WorkerMessage::Run(Box::new(job))) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) | Err(TrySendError::Disconnected(_)) => {
                self.state.pending_jobs.fetch_sub(1, Ordering::AcqRel);
                tracing::warn!(target: "lattice_inventory::tick", "tick worker queue rejected a job");
                false
            }
        }
    }

    /// Stop accepting jobs. Jobs already queued still run.
    pub fn stop(&self) {
        self.state.running.store(false, Ordering::Release);
        let _ = self.sender.try_send(WorkerMessage::Shutdown);
    }

    /// Wait for the worker thread to exit.
    ///
    /// Returns `false` if already joined or the thread panicked.
    pub fn join(&self) -> bool {
        let handle = self.handle.lock().take();
        match handle {
            Some(handle) => handle.join().is_ok(),
            None => false,
        }
    }

    /// [`Worker::stop`] followed by [`Worker::join`].
    pub fn stop_and_join(&self) -> bool {
        self.stop();
        self.join()
    }
}

impl Drop for Worker {
    fn drop(&mut self) {
        // Don't block in drop.
        self.stop();
    }
}

fn worker_loop(receiver: Receiver<WorkerMessage>, state: &WorkerState) {
    while let Ok(message) = receiver.recv() {
        match message {
            WorkerMessage::Run(job) => {
                job();
                state.pending_jobs.fetch_sub(1, Ordering::AcqRel);
            }
            WorkerMessage::Shutdown => {
                // Finish what was queued before the shutdown request.
                while let Ok(message) = receiver.try_recv() {
                    if let WorkerMessage::Run(job) = message {
                        job();
                        state.pending_jobs.fetch_sub(1, Ordering::AcqRel);
                    }
                }
                break;
            }
        }
    }
}
