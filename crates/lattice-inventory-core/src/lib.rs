//! Core primitives for Lattice Inventory.
//!
//! This crate provides the host-independent building blocks of the Lattice
//! Inventory menu toolkit:
//!
//! - **Slot coordinates**: [`SlotPos`] and row-major index conversion
//! - **Payloads**: [`ItemStack`], the value rendered into a host slot
//! - **Patterns**: [`Pattern`], character templates mapped onto values
//! - **Errors**: [`GridError`] for argument and bounds violations
//! - **Tick scheduling**: [`TickScheduler`] counting host ticks
//! - **Main-thread marshalling**: [`MainThreadQueue`] and [`ThreadAffinity`]
//! - **Background work**: [`Worker`] for asynchronous screen ticks
//!
//! # Pattern Example
//!
//! ```
//! use lattice_inventory_core::{Pattern, SlotPos};
//!
//! let mut frame = Pattern::new(["XXX", "X X", "XXX"])?;
//! frame.attach('X', true).set_default(false);
//!
//! assert_eq!(frame.get_object(1, 1)?, Some(&false));
//! assert_eq!(frame.find_key(' '), Some(SlotPos::new(1, 1)));
//! # Ok::<(), lattice_inventory_core::GridError>(())
//! ```

pub mod error;
pub mod invocation;
pub mod item;
pub mod logging;
pub mod pattern;
pub mod scheduler;
pub mod slot;
pub mod thread_check;
pub mod worker;

pub use error::{GridError, Result};
pub use invocation::{MainThreadQueue, QueuedInvocation};
pub use item::ItemStack;
pub use logging::PerfSpan;
pub use pattern::Pattern;
pub use scheduler::{SharedTickScheduler, TickScheduler, TickTask, TickTaskId};
pub use slot::SlotPos;
pub use thread_check::ThreadAffinity;
pub use worker::{Worker, WorkerConfig};

static_assertions::assert_impl_all!(SharedTickScheduler: Send, Sync);
static_assertions::assert_impl_all!(MainThreadQueue: Send, Sync);
static_assertions::assert_impl_all!(Worker: Send, Sync);
static_assertions::assert_impl_all!(Pattern<bool>: Send, Sync);
