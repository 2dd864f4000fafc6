//! The types most menus need.
//!
//! ```
//! use lattice_inventory::prelude::*;
//! ```

pub use lattice_inventory_core::{ItemStack, Pattern, SlotPos};

pub use crate::content::{GridContent, IteratorKind, Pagination, SharedContent, SlotIterator};
pub use crate::error::{Error, Result};
pub use crate::event::{
    ClickEvent, CloseEvent, DragEvent, Handle, IconEvent, IconEventKind, InitEvent, OpenEvent,
    PageEvent, PageEventKind, Target, TickEvent,
};
pub use crate::host::{ClickType, InventoryAction, InventoryOpener, ViewerId};
pub use crate::icon::Icon;
pub use crate::page::{EmptyProvider, InventoryKind, InventoryProvider, Page, PageConfig};
pub use crate::session::{InteractionRouter, InventoryManager};
