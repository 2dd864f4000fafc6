//! Lattice Inventory - slot-grid menus for game servers.
//!
//! Menus are built from four pieces:
//!
//! - **Grids**: [`GridContent`](content::GridContent) holds the [`Icon`]s of
//!   an open screen, with [`SlotIterator`](content::SlotIterator)s and
//!   [`Pagination`](content::Pagination) to lay them out
//! - **Icons**: [`Icon`] pairs a rendered [`ItemStack`] with guarded handlers
//! - **Screens**: [`Page`](page::Page) is a validated
//!   [`PageConfig`](page::PageConfig) plus the provider that fills its grid
//! - **Sessions**: [`InventoryManager`](session::InventoryManager) opens
//!   screens through a host [`InventoryOpener`](host::InventoryOpener) and the
//!   [`InteractionRouter`](session::InteractionRouter) routes host events back
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use lattice_inventory::prelude::*;
//!
//! let shop = Page::new(PageConfig::chest("shop", "Shop", 3), |_viewer: ViewerId, contents: &mut GridContent| {
//!     contents.fill_borders(Icon::new(ItemStack::new("minecraft:black_stained_glass_pane")));
//!     contents.set(1, 4, Icon::click(ItemStack::new("minecraft:emerald"), |event| {
//!         event.close();
//!     }));
//! })?;
//!
//! let manager = InventoryManager::new();
//! // Without an opener for chests the screen cannot be shown.
//! assert!(matches!(
//!     manager.open(&Arc::new(shop), ViewerId(1)),
//!     Err(Error::NoOpener { kind: InventoryKind::Chest })
//! ));
//! # Ok::<(), lattice_inventory::Error>(())
//! ```

pub mod content;
pub mod error;
pub mod event;
pub mod host;
pub mod icon;
pub mod page;
pub mod prelude;
pub mod session;

pub use error::{Error, Result};
pub use icon::Icon;
pub use lattice_inventory_core;
pub use lattice_inventory_core::{GridError, ItemStack, Pattern, SlotPos};

static_assertions::assert_impl_all!(content::GridContent: Send, Sync);
static_assertions::assert_impl_all!(Icon: Send, Sync);
static_assertions::assert_impl_all!(page::Page: Send, Sync);
static_assertions::assert_impl_all!(session::InventoryManager: Send, Sync);
static_assertions::assert_impl_all!(session::InteractionRouter: Send, Sync);
