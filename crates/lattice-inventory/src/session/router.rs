//! Routing of host interaction events.

use std::sync::Arc;

use lattice_inventory_core::{PerfSpan, SlotPos};

use super::manager::InventoryManager;
use crate::event::{
    BottomClickEvent, ClickEvent, CloseEvent, DragEvent, EventVariant, IconEvent, OpenEvent,
    OutsideClickEvent, PageEvent, Target,
};
use crate::host::{ClickType, DragType, InventoryAction, ViewerId};
use crate::icon::Icon;

/// What the host should do with an interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionOutcome {
    /// The viewer has no open screen; leave the event alone.
    Ignored,
    /// Let the interaction through.
    Allowed,
    /// Revert the interaction.
    Cancelled,
}

impl InteractionOutcome {
    fn from_cancelled(cancelled: bool) -> Self {
        if cancelled { Self::Cancelled } else { Self::Allowed }
    }

    pub fn is_cancelled(self) -> bool {
        self == Self::Cancelled
    }
}

/// What happened to a host-reported close.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseOutcome {
    /// The viewer has no open screen.
    Ignored,
    /// The session ended.
    Closed,
    /// A close predicate refused; the view is shown again on the next tick.
    Reopen,
}

/// The inbound surface a host event bridge calls into.
///
/// Every method must be called on the host main thread. Handlers run
/// synchronously, without any lock held.
#[derive(Clone, Debug)]
pub struct InteractionRouter {
    manager: InventoryManager,
}

impl InteractionRouter {
    pub fn new(manager: InventoryManager) -> Self {
        Self { manager }
    }

    pub fn manager(&self) -> &InventoryManager {
        &self.manager
    }

    /// Route a click.
    ///
    /// `raw_slot` is `None` for clicks outside the window. Slots past the
    /// screen's grid belong to the viewer's own inventory.
    #[tracing::instrument(skip(self), target = "lattice_inventory::router", level = "trace")]
    pub fn on_click(
        &self,
        viewer: ViewerId,
        raw_slot: Option<usize>,
        click: ClickType,
        action: InventoryAction,
    ) -> InteractionOutcome {
        let Some(session) = self.manager.session(viewer) else {
            return InteractionOutcome::Ignored;
        };
        let _span = PerfSpan::new("on_click");
        let context = self.manager.context(viewer, &session);
        let page = session.page();

        let Some(raw_slot) = raw_slot else {
            let mut event = PageEvent::OutsideClick(OutsideClickEvent::new(context, click));
            page.dispatch(&mut event);
            return outcome::<OutsideClickEvent>(&event, OutsideClickEvent::is_cancelled);
        };

        if raw_slot >= page.size() {
            let mut event = PageEvent::BottomClick(BottomClickEvent::new(context, raw_slot, click, action));
            page.dispatch(&mut event);
            return outcome::<BottomClickEvent>(&event, BottomClickEvent::is_cancelled);
        }

        let (slot, icon, editable) = {
            let contents = session.contents().lock();
            let slot = SlotPos::from_index(raw_slot, contents.columns());
            (slot, contents.get_at(slot).cloned(), contents.is_editable(slot))
        };

        let mut event = PageEvent::Click(ClickEvent::new(
            context,
            slot,
            raw_slot,
            click,
            action,
            icon.clone(),
            editable,
        ));
        page.dispatch(&mut event);

        let Some(click_event) = ClickEvent::into_variant(event) else {
            return InteractionOutcome::Cancelled;
        };
        let mut event = IconEvent::Click(click_event);
        if let Some(icon) = icon {
            icon.accept(&mut event);
        }

        let cancelled = ClickEvent::into_variant(event).is_none_or(|event| event.is_cancelled());
        tracing::trace!(target: "lattice_inventory::router", %viewer, %slot, cancelled, "click routed");
        InteractionOutcome::from_cancelled(cancelled)
    }

    /// Route a drag over `raw_slots`.
    ///
    /// The drag starts cancelled if any affected slot of the screen is not
    /// editable.
    #[tracing::instrument(skip(self), target = "lattice_inventory::router", level = "trace")]
    pub fn on_drag(&self, viewer: ViewerId, raw_slots: Vec<usize>, drag_type: DragType) -> InteractionOutcome {
        let Some(session) = self.manager.session(viewer) else {
            return InteractionOutcome::Ignored;
        };
        let _span = PerfSpan::new("on_drag");
        let context = self.manager.context(viewer, &session);
        let page = session.page();
        let size = page.size();

        let (slots, icons, cancelled) = {
            let contents = session.contents().lock();
            let slots: Vec<SlotPos> = raw_slots
                .iter()
                .filter(|&&raw| raw < size)
                .map(|&raw| SlotPos::from_index(raw, contents.columns()))
                .collect();
            let cancelled = slots.iter().any(|&slot| !contents.is_editable(slot));
            let icons: Vec<Arc<Icon>> = slots
                .iter()
                .filter_map(|&slot| contents.get_at(slot).cloned())
                .collect();
            (slots, icons, cancelled)
        };

        let mut event = PageEvent::Drag(DragEvent::new(context, slots, raw_slots, drag_type, cancelled));
        page.dispatch(&mut event);

        let Some(drag_event) = DragEvent::into_variant(event) else {
            return InteractionOutcome::Cancelled;
        };
        let mut event = IconEvent::Drag(drag_event);
        for icon in &icons {
            icon.accept(&mut event);
        }

        let cancelled = DragEvent::into_variant(event).is_none_or(|event| event.is_cancelled());
        InteractionOutcome::from_cancelled(cancelled)
    }

    /// The host showed the view. Runs open handlers.
    ///
    /// Returns `false` if the viewer has no open screen.
    pub fn on_open(&self, viewer: ViewerId) -> bool {
        let Some(session) = self.manager.session(viewer) else {
            return false;
        };
        let context = self.manager.context(viewer, &session);
        session.page().dispatch(&mut PageEvent::Open(OpenEvent::new(context)));
        true
    }

    /// The host closed the view.
    ///
    /// If a close predicate refuses, the session stays and the same grid is
    /// shown again on the next [`InteractionRouter::on_tick`].
    pub fn on_close(&self, viewer: ViewerId) -> CloseOutcome {
        let Some(session) = self.manager.session(viewer) else {
            return CloseOutcome::Ignored;
        };

        let event = CloseEvent::new(self.manager.context(viewer, &session));
        if !session.page().can_close(&event) {
            let manager = self.manager.downgrade();
            self.manager.main_queue().post(move || {
                let Some(manager) = manager.upgrade().map(InventoryManager::from_shared) else {
                    return;
                };
                if let Err(err) = manager.reopen(viewer) {
                    tracing::warn!(target: "lattice_inventory::session", %viewer, error = %err, "reopen after vetoed close failed");
                }
            });
            tracing::debug!(target: "lattice_inventory::session", %viewer, page = session.page().id(), "close vetoed");
            return CloseOutcome::Reopen;
        }

        if self.manager.closed_by_host(viewer) {
            CloseOutcome::Closed
        } else {
            CloseOutcome::Ignored
        }
    }

    /// Advance one host tick.
    ///
    /// Queued main-thread work runs first, then every due screen tick.
    pub fn on_tick(&self) {
        self.manager.main_queue().drain();
        self.manager.scheduler().run_tick();
    }

    /// The viewer left the server.
    ///
    /// Close handlers run only if the page closes on disconnect.
    pub fn on_disconnect(&self, viewer: ViewerId) {
        if self.manager.disconnect(viewer) {
            tracing::debug!(target: "lattice_inventory::session", %viewer, "viewer disconnected");
        }
    }

    /// The host is shutting down. Every screen is closed.
    pub fn on_shutdown(&self) {
        self.manager.shutdown();
    }
}

fn outcome<V>(event: &PageEvent, cancelled: fn(&V) -> bool) -> InteractionOutcome
where
    V: EventVariant<PageEvent>,
{
    InteractionOutcome::from_cancelled(V::from_event(event).is_none_or(cancelled))
}
