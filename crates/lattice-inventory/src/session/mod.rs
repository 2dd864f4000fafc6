//! Session tracking and host event routing.
//!
//! The [`InventoryManager`] opens screens and tracks the one screen each
//! viewer has open in a [`SessionRegistry`]. The [`InteractionRouter`] is the
//! inbound surface: the host's event bridge forwards clicks, drags, closes,
//! ticks, disconnects and shutdown to it.

mod manager;
mod registry;
mod router;

pub use manager::InventoryManager;
pub(crate) use manager::ManagerShared;
pub use registry::{Session, SessionRegistry};
pub use router::{CloseOutcome, InteractionOutcome, InteractionRouter};
