//! Event payloads.

use std::sync::Arc;

use lattice_inventory_core::SlotPos;

use super::context::EventContext;
use crate::content::SharedContent;
use crate::host::{ClickType, DragType, InventoryAction, ViewerId};
use crate::icon::Icon;
use crate::page::Page;

macro_rules! context_accessors {
    ($($event:ty),* $(,)?) => {$(
        impl $event {
            pub fn context(&self) -> &EventContext {
                &self.context
            }

            pub fn viewer(&self) -> ViewerId {
                self.context.viewer()
            }

            pub fn page(&self) -> &Arc<Page> {
                self.context.page()
            }

            pub fn contents(&self) -> &SharedContent {
                self.context.contents()
            }

            /// Close the viewer's screen.
            pub fn close(&self) {
                self.context.close();
            }
        }
    )*};
}

macro_rules! cancellable {
    ($($event:ty),* $(,)?) => {$(
        impl $event {
            /// Whether the host should revert the interaction.
            pub fn is_cancelled(&self) -> bool {
                self.cancelled
            }

            pub fn set_cancelled(&mut self, cancelled: bool) {
                self.cancelled = cancelled;
            }

            /// Revert the interaction on the host.
            pub fn cancel(&mut self) {
                self.cancelled = true;
            }

            /// Let the interaction through to the host.
            pub fn allow(&mut self) {
                self.cancelled = false;
            }
        }
    )*};
}

/// Fired after the provider filled a freshly opened grid.
#[derive(Debug, Clone)]
pub struct InitEvent {
    context: EventContext,
}

/// Fired when the host reports the view as open.
#[derive(Debug, Clone)]
pub struct OpenEvent {
    context: EventContext,
}

/// Fired when a screen closes for a viewer.
///
/// `can_close` predicates receive this event before it is dispatched.
#[derive(Debug, Clone)]
pub struct CloseEvent {
    context: EventContext,
}

/// Fired on every scheduled tick of an open screen.
#[derive(Debug, Clone)]
pub struct TickEvent {
    context: EventContext,
    tick: u64,
}

/// Fired after the provider refreshed an open grid.
#[derive(Debug, Clone)]
pub struct UpdateEvent {
    context: EventContext,
}

/// A click on a slot of the screen.
#[derive(Debug, Clone)]
pub struct ClickEvent {
    context: EventContext,
    slot: SlotPos,
    raw_slot: usize,
    click: ClickType,
    action: InventoryAction,
    icon: Option<Arc<Icon>>,
    cancelled: bool,
}

/// A click on a slot of the viewer's own inventory below the screen.
#[derive(Debug, Clone)]
pub struct BottomClickEvent {
    context: EventContext,
    raw_slot: usize,
    click: ClickType,
    action: InventoryAction,
    cancelled: bool,
}

/// A click outside of the inventory window.
#[derive(Debug, Clone)]
pub struct OutsideClickEvent {
    context: EventContext,
    click: ClickType,
    cancelled: bool,
}

/// A drag spreading the cursor stack over several slots.
#[derive(Debug, Clone)]
pub struct DragEvent {
    context: EventContext,
    slots: Vec<SlotPos>,
    raw_slots: Vec<usize>,
    drag_type: DragType,
    cancelled: bool,
}

context_accessors!(
    InitEvent,
    OpenEvent,
    CloseEvent,
    TickEvent,
    UpdateEvent,
    ClickEvent,
    BottomClickEvent,
    OutsideClickEvent,
    DragEvent,
);

cancellable!(ClickEvent, BottomClickEvent, OutsideClickEvent, DragEvent);

impl InitEvent {
    pub fn new(context: EventContext) -> Self {
        Self { context }
    }
}

impl OpenEvent {
    pub fn new(context: EventContext) -> Self {
        Self { context }
    }
}

impl CloseEvent {
    pub fn new(context: EventContext) -> Self {
        Self { context }
    }
}

impl TickEvent {
    pub fn new(context: EventContext, tick: u64) -> Self {
        Self { context, tick }
    }

    /// How many times this screen has ticked for the viewer, starting at 1.
    pub fn tick(&self) -> u64 {
        self.tick
    }
}

impl UpdateEvent {
    pub fn new(context: EventContext) -> Self {
        Self { context }
    }
}

impl ClickEvent {
    /// A click on `raw_slot`, at `slot` of the grid.
    ///
    /// The event starts cancelled unless `editable` is set.
    pub fn new(
        context: EventContext,
        slot: SlotPos,
        raw_slot: usize,
        click: ClickType,
        action: InventoryAction,
        icon: Option<Arc<Icon>>,
        editable: bool,
    ) -> Self {
        Self {
            context,
            slot,
            raw_slot,
            click,
            action,
            icon,
            cancelled: !editable,
        }
    }

    pub fn slot(&self) -> SlotPos {
        self.slot
    }

    /// Host slot index as reported by the host.
    pub fn raw_slot(&self) -> usize {
        self.raw_slot
    }

    pub fn click_type(&self) -> ClickType {
        self.click
    }

    pub fn action(&self) -> InventoryAction {
        self.action
    }

    /// The icon under the cursor when the click happened.
    pub fn icon(&self) -> Option<&Arc<Icon>> {
        self.icon.as_ref()
    }
}

impl BottomClickEvent {
    /// Actions that would move items into the screen start cancelled.
    pub fn new(context: EventContext, raw_slot: usize, click: ClickType, action: InventoryAction) -> Self {
        let cancelled = matches!(
            action,
            InventoryAction::MoveToOtherInventory | InventoryAction::CollectToCursor
        );
        Self {
            context,
            raw_slot,
            click,
            action,
            cancelled,
        }
    }

    pub fn raw_slot(&self) -> usize {
        self.raw_slot
    }

    pub fn click_type(&self) -> ClickType {
        self.click
    }

    pub fn action(&self) -> InventoryAction {
        self.action
    }
}

impl OutsideClickEvent {
    pub fn new(context: EventContext, click: ClickType) -> Self {
        Self {
            context,
            click,
            cancelled: false,
        }
    }

    pub fn click_type(&self) -> ClickType {
        self.click
    }
}

impl DragEvent {
    /// A drag over `raw_slots`; `slots` are the affected grid positions.
    pub fn new(
        context: EventContext,
        slots: Vec<SlotPos>,
        raw_slots: Vec<usize>,
        drag_type: DragType,
        cancelled: bool,
    ) -> Self {
        Self {
            context,
            slots,
            raw_slots,
            drag_type,
            cancelled,
        }
    }

    /// Affected positions inside the screen's grid.
    pub fn slots(&self) -> &[SlotPos] {
        &self.slots
    }

    /// Every affected host slot, including the viewer's own inventory.
    pub fn raw_slots(&self) -> &[usize] {
        &self.raw_slots
    }

    pub fn drag_type(&self) -> DragType {
        self.drag_type
    }
}
