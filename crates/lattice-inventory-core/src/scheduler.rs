//! Host-tick scheduler for periodic screen updates.
//!
//! Game servers advance in discrete ticks. The scheduler counts those ticks
//! instead of wall-clock time: the host calls [`TickScheduler::advance`] once
//! per server tick, and every task whose turn has come is handed back to the
//! caller for execution.
//!
//! Tasks are returned rather than run in place so the caller can release any
//! lock around the scheduler first. A task is then free to cancel itself or
//! schedule new work without deadlocking.
//!
//! # Example
//!
//! ```
//! use lattice_inventory_core::TickScheduler;
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//!
//! let mut scheduler = TickScheduler::new();
//! let runs = Arc::new(AtomicUsize::new(0));
//! let counter = runs.clone();
//!
//! scheduler.schedule_repeating(2, move || {
//!     counter.fetch_add(1, Ordering::SeqCst);
//! });
//!
//! for _ in 0..4 {
//!     for task in scheduler.advance() {
//!         task();
//!     }
//! }
//! assert_eq!(runs.load(Ordering::SeqCst), 2);
//! ```

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::sync::Arc;

use parking_lot::Mutex;
use slotmap::{SlotMap, new_key_type};

use crate::error::{GridError, Result};

new_key_type! {
    /// A unique identifier for a scheduled tick task.
    pub struct TickTaskId;
}

/// A task handed back by [`TickScheduler::advance`].
pub type TickTask = Arc<dyn Fn() + Send + Sync + 'static>;

/// Internal scheduled task data.
struct TickTaskData {
    /// The tick on which this task should next run.
    next_run: u64,
    /// Ticks between runs. Never zero.
    interval: u64,
    /// Whether this task is active.
    active: bool,
    /// The task closure to execute.
    task: TickTask,
}

/// An entry in the scheduler queue (min-heap by run tick).
#[derive(Debug, Clone, Copy)]
struct SchedulerQueueEntry {
    id: TickTaskId,
    run_tick: u64,
}

impl PartialEq for SchedulerQueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.run_tick == other.run_tick
    }
}

impl Eq for SchedulerQueueEntry {}

impl PartialOrd for SchedulerQueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SchedulerQueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse order for min-heap (BinaryHeap is max-heap by default).
        other.run_tick.cmp(&self.run_tick)
    }
}

/// Schedules repeating tasks measured in host ticks.
pub struct TickScheduler {
    /// Ticks elapsed since the scheduler was created.
    current_tick: u64,
    /// All registered tasks.
    tasks: SlotMap<TickTaskId, TickTaskData>,
    /// Priority queue of pending runs (min-heap by run tick).
    queue: BinaryHeap<SchedulerQueueEntry>,
}

impl TickScheduler {
    /// Create an empty scheduler at tick zero.
    pub fn new() -> Self {
        Self {
            current_tick: 0,
            tasks: SlotMap::with_key(),
            queue: BinaryHeap::new(),
        }
    }

    /// Ticks elapsed since the scheduler was created.
    pub fn current_tick(&self) -> u64 {
        self.current_tick
    }

    /// Schedule a task to run every `interval` ticks.
    ///
    /// The first run happens `interval` ticks from now. An interval of zero
    /// is treated as one.
    pub fn schedule_repeating<F>(&mut self, interval: u64, task: F) -> TickTaskId
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.schedule_repeating_with_delay(interval, interval, task)
    }

    /// Schedule a repeating task whose first run is `initial_delay` ticks away.
    pub fn schedule_repeating_with_delay<F>(
        &mut self,
        initial_delay: u64,
        interval: u64,
        task: F,
    ) -> TickTaskId
    where
        F: Fn() + Send + Sync + 'static,
    {
        let next_run = self.current_tick + initial_delay.max(1);
        let data = TickTaskData {
            next_run,
            interval: interval.max(1),
            active: true,
            task: Arc::new(task),
        };

        let id = self.tasks.insert(data);
        self.queue.push(SchedulerQueueEntry {
            id,
            run_tick: next_run,
        });
        id
    }

    /// Cancel and remove a task.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::InvalidTaskId`] if the task does not exist.
    pub fn cancel(&mut self, id: TickTaskId) -> Result<()> {
        match self.tasks.remove(id) {
            Some(_) => Ok(()),
            None => Err(GridError::InvalidTaskId),
        }
    }

    /// Check if a task is currently scheduled.
    pub fn is_active(&self, id: TickTaskId) -> bool {
        self.tasks.get(id).is_some_and(|t| t.active)
    }

    /// Number of scheduled tasks.
    pub fn active_count(&self) -> usize {
        self.tasks.iter().filter(|(_, t)| t.active).count()
    }

    /// Ticks until the next task is due, if any task is scheduled.
    pub fn ticks_until_next(&mut self) -> Option<u64> {
        self.prune();
        self.queue
            .peek()
            .map(|entry| entry.run_tick.saturating_sub(self.current_tick))
    }

    /// Advance by one host tick and collect every task due on it.
    ///
    /// Repeating tasks are rescheduled before they are returned.
    #[tracing::instrument(skip(self), target = "lattice_inventory::tick", level = "trace")]
    pub fn advance(&mut self) -> Vec<TickTask> {
        self.current_tick += 1;
        let now = self.current_tick;
        let mut ready = Vec::new();

        while let Some(entry) = self.queue.peek().copied() {
            if entry.run_tick > now {
                break;
            }
            self.queue.pop();

            let Some(data) = self.tasks.get_mut(entry.id) else {
                continue;
            };
            if !data.active || entry.run_tick != data.next_run {
                continue;
            }

            tracing::trace!(target: "lattice_inventory::tick", id = ?entry.id, tick = now, "tick task due");
            ready.push(data.task.clone());

            data.next_run = now + data.interval;
            self.queue.push(SchedulerQueueEntry {
                id: entry.id,
                run_tick: data.next_run,
            });
        }

        ready
    }

    /// Drop queue entries whose task is gone.
    fn prune(&mut self) {
        while let Some(entry) = self.queue.peek() {
            if self.tasks.get(entry.id).is_some_and(|t| t.active) {
                break;
            }
            self.queue.pop();
        }
    }
}

impl Default for TickScheduler {
    fn default() -> Self {
        Self::new()
    }
}

/// A thread-safe wrapper around `TickScheduler`.
pub struct SharedTickScheduler {
    inner: Mutex<TickScheduler>,
}

impl SharedTickScheduler {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(TickScheduler::new()),
        }
    }

    pub fn schedule_repeating<F>(&self, interval: u64, task: F) -> TickTaskId
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.inner.lock().schedule_repeating(interval, task)
    }

    pub fn cancel(&self, id: TickTaskId) -> Result<()> {
        self.inner.lock().cancel(id)
    }

    pub fn is_active(&self, id: TickTaskId) -> bool {
        self.inner.lock().is_active(id)
    }

    pub fn active_count(&self) -> usize {
        self.inner.lock().active_count()
    }

    /// Advance one tick and run every due task after releasing the lock.
    ///
    /// Returns the number of tasks run.
    pub fn run_tick(&self) -> usize {
        let ready = self.inner.lock().advance();
        let count = ready.len();
        for task in ready {
            task();
        }
        count
    }
}

impl Default for SharedTickScheduler {
    fn default() -> Self {
        Self::new()
    }
}
