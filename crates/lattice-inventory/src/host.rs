//! Host-facing types and collaborator traits.
//!
//! The toolkit never talks to a game server directly. The host supplies:
//!
//! - an [`InventoryOpener`] per host inventory kind, which materializes a
//!   screen into a live view ([`LiveView`](crate::content::LiveView));
//! - a [`HostEventBridge`], which forwards host interaction events to an
//!   [`InteractionRouter`].

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::content::{GridContent, LiveView};
use crate::error::Result;
use crate::page::{InventoryKind, Page};
use crate::session::InteractionRouter;

/// Identity of a player looking at a screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ViewerId(pub u64);

impl fmt::Display for ViewerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "viewer#{}", self.0)
    }
}

impl From<u64> for ViewerId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// How the viewer clicked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ClickType {
    #[default]
    Left,
    ShiftLeft,
    Right,
    ShiftRight,
    Middle,
    NumberKey,
    DoubleClick,
    Drop,
    ControlDrop,
    Creative,
    WindowBorderLeft,
    WindowBorderRight,
    Unknown,
}

impl ClickType {
    pub fn is_left_click(self) -> bool {
        matches!(self, Self::Left | Self::ShiftLeft | Self::DoubleClick | Self::Creative)
    }

    pub fn is_right_click(self) -> bool {
        matches!(self, Self::Right | Self::ShiftRight)
    }

    pub fn is_shift_click(self) -> bool {
        matches!(self, Self::ShiftLeft | Self::ShiftRight)
    }
}

/// What the host would do with the click if it were allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum InventoryAction {
    #[default]
    Nothing,
    PickupAll,
    PickupSome,
    PickupHalf,
    PickupOne,
    PlaceAll,
    PlaceSome,
    PlaceOne,
    SwapWithCursor,
    DropAllCursor,
    DropOneCursor,
    DropAllSlot,
    DropOneSlot,
    MoveToOtherInventory,
    HotbarMoveAndReadd,
    HotbarSwap,
    CloneStack,
    CollectToCursor,
    Unknown,
}

/// How a drag spreads the cursor stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DragType {
    /// One item per slot.
    Single,
    /// The stack split evenly across slots.
    #[default]
    Even,
}

/// Materializes screens into host-native inventory views.
///
/// Openers are registered on the
/// [`InventoryManager`](crate::session::InventoryManager) and looked up by
/// [`InventoryKind`]; the most recently registered opener supporting a kind
/// wins.
pub trait InventoryOpener: Send + Sync {
    /// Whether this opener can show screens of `kind`.
    fn supports(&self, kind: InventoryKind) -> bool;

    /// Open a live view of `page` for `viewer`, filled with `contents`.
    ///
    /// [`GridContent::rendered`] yields the payload for every slot.
    fn open(&self, page: &Page, viewer: ViewerId, contents: &GridContent)
    -> Result<Arc<dyn LiveView>>;
}

/// Forwards host interaction events into the toolkit.
///
/// A host implements this to subscribe the router to its own listener
/// system; see [`InventoryManager::install`](crate::session::InventoryManager::install).
pub trait HostEventBridge {
    fn install(&mut self, router: InteractionRouter);
}
