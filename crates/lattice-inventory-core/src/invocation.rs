//! Main-thread invocation queue.
//!
//! Work that must touch host state (pushing a rendered slot into a live view,
//! reopening a view whose close was vetoed) is funnelled through a
//! [`MainThreadQueue`]:
//!
//! 1. Code already on the main thread runs the work immediately
//!    ([`MainThreadQueue::invoke`]).
//! 2. Code on any other thread, such as an asynchronous tick worker, posts a
//!    closure instead.
//! 3. The host drains the queue from its main thread once per server tick
//!    ([`MainThreadQueue::drain`]).

use std::fmt;

use crossbeam_channel::{Receiver, Sender, unbounded};

use crate::thread_check::ThreadAffinity;

/// A type-erased invocation waiting to run on the main thread.
pub struct QueuedInvocation {
    invoke: Box<dyn FnOnce() + Send>,
}

impl QueuedInvocation {
    /// Wrap a closure.
    pub fn new<F>(invoke: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        Self {
            invoke: Box::new(invoke),
        }
    }

    /// Execute the invocation.
    pub fn execute(self) {
        (self.invoke)();
    }
}

/// A queue of closures to be executed on the host main thread.
pub struct MainThreadQueue {
    sender: Sender<QueuedInvocation>,
    receiver: Receiver<QueuedInvocation>,
    affinity: ThreadAffinity,
}

impl MainThreadQueue {
    /// Create a queue bound to the current thread.
    pub fn new() -> Self {
        Self::with_affinity(ThreadAffinity::current())
    }

    /// Create a queue bound to a specific thread.
    pub fn with_affinity(affinity: ThreadAffinity) -> Self {
        let (sender, receiver) = unbounded();
        Self {
            sender,
            receiver,
            affinity,
        }
    }

    /// The thread this queue executes on.
    pub fn affinity(&self) -> ThreadAffinity {
        self.affinity
    }

    /// Check whether the caller is on the main thread.
    pub fn is_main_thread(&self) -> bool {
        self.affinity.is_same_thread()
    }

    /// Queue a closure for the next drain.
    pub fn post<F>(&self, invoke: F)
    where
        F: FnOnce() + Send + 'static,
    {
        // Both channel ends live in `self`, so sending cannot fail.
        let _ = self.sender.send(QueuedInvocation::new(invoke));
    }

    /// Run the closure now when on the main thread, otherwise queue it.
    ///
    /// Returns `true` if the closure ran immediately.
    pub fn invoke<F>(&self, invoke: F) -> bool
    where
        F: FnOnce() + Send + 'static,
    {
        if self.is_main_thread() {
            invoke();
            true
        } else {
            tracing::trace!(target: "lattice_inventory::invocation", "queueing invocation for main thread");
            self.post(invoke);
            false
        }
    }

    /// Number of queued invocations.
    pub fn pending_count(&self) -> usize {
        self.receiver.len()
    }

    /// Execute every invocation queued before this call.
    ///
    /// Invocations posted while draining wait for the next drain. Returns the
    /// number of invocations executed.
    pub fn drain(&self) -> usize {
        self.affinity
            .debug_assert_same_thread("MainThreadQueue::drain must run on the main thread");

        let pending = self.receiver.len();
        let mut executed = 0;
        for _ in 0..pending {
            match self.receiver.try_recv() {
                Ok(invocation) => {
                    invocation.execute();
                    executed += 1;
                }
                Err(_) => break,
            }
        }
        executed
    }
}

impl Default for MainThreadQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for MainThreadQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MainThreadQueue")
            .field("pending", &self.pending_count())
            .field("affinity", &self.affinity)
            .finish()
    }
}
