//! Icons: cell payloads with their own interaction handlers.
//!
//! An [`Icon`] is what a grid cell holds. It carries the [`ItemStack`] shown
//! in the slot, optional visibility and usability predicates, a fallback
//! payload shown while hidden, and the [`Handle`]s that react to clicks and
//! drags on the slot.
//!
//! Icons are built with chained calls and then placed; they hold no
//! reference to the grid they are placed in.
//!
//! ```
//! use lattice_inventory::prelude::*;
//!
//! let next_page = Icon::click(ItemStack::new("minecraft:arrow").with_name("Next"), |event| {
//!     let mut contents = event.contents().lock();
//!     contents.pagination_mut().next();
//! })
//! .can_see(|contents| !contents.pagination().is_last())
//! .fallback(ItemStack::new("minecraft:gray_stained_glass_pane"));
//!
//! let contents = GridContent::new(1, 9)?;
//! // A single empty page is also the last one.
//! assert_eq!(next_page.calculate_item(&contents).material, "minecraft:gray_stained_glass_pane");
//! # Ok::<(), lattice_inventory::Error>(())
//! ```

use std::fmt;
use std::sync::Arc;

use lattice_inventory_core::ItemStack;

use crate::content::GridContent;
use crate::event::{ClickEvent, Handle, IconEvent, Target};

/// A predicate over the grid an icon is shown in.
///
/// Predicates run while the grid is locked; they must not lock it again.
pub type IconPredicate = Arc<dyn Fn(&GridContent) -> bool + Send + Sync>;

/// A cell payload plus its guarded handlers.
#[derive(Clone)]
pub struct Icon {
    item: ItemStack,
    fallback: ItemStack,
    visibility: Option<IconPredicate>,
    usability: Option<IconPredicate>,
    handles: Vec<Arc<Handle<IconEvent>>>,
}

impl Icon {
    /// An icon showing `item`, always visible and usable.
    pub fn new(item: ItemStack) -> Self {
        Self {
            item,
            fallback: ItemStack::air(),
            visibility: None,
            usability: None,
            handles: Vec::new(),
        }
    }

    /// An icon showing nothing.
    pub fn empty() -> Self {
        Self::new(ItemStack::air())
    }

    /// An icon with a single click handler.
    pub fn click<F>(item: ItemStack, callback: F) -> Self
    where
        F: Fn(&mut ClickEvent) + Send + Sync + 'static,
    {
        Self::new(item).handle(Handle::of(callback))
    }

    pub fn item(&self) -> &ItemStack {
        &self.item
    }

    /// The payload shown while the icon is hidden.
    pub fn fallback_item(&self) -> &ItemStack {
        &self.fallback
    }

    /// Hide the icon unless `predicate` holds.
    pub fn can_see<P>(mut self, predicate: P) -> Self
    where
        P: Fn(&GridContent) -> bool + Send + Sync + 'static,
    {
        self.visibility = Some(Arc::new(predicate));
        self
    }

    /// Ignore interaction unless `predicate` holds.
    pub fn can_use<P>(mut self, predicate: P) -> Self
    where
        P: Fn(&GridContent) -> bool + Send + Sync + 'static,
    {
        self.usability = Some(Arc::new(predicate));
        self
    }

    /// Set the payload shown while hidden.
    pub fn fallback(mut self, item: ItemStack) -> Self {
        self.fallback = item;
        self
    }

    /// Append a handler.
    pub fn handle(mut self, handle: Handle<IconEvent>) -> Self {
        self.handles.push(Arc::new(handle));
        self
    }

    /// A copy of this icon showing another payload. Handlers and predicates
    /// are shared.
    pub fn with_item(&self, item: ItemStack) -> Self {
        Self {
            item,
            ..self.clone()
        }
    }

    pub fn is_visible(&self, contents: &GridContent) -> bool {
        self.visibility.as_ref().is_none_or(|visible| visible(contents))
    }

    /// Visible and usable.
    pub fn is_usable(&self, contents: &GridContent) -> bool {
        self.is_visible(contents) && self.usability.as_ref().is_none_or(|usable| usable(contents))
    }

    /// The payload the viewer sees: the item if visible, else the fallback.
    pub fn calculate_item(&self, contents: &GridContent) -> ItemStack {
        if self.is_visible(contents) {
            self.item.clone()
        } else {
            self.fallback.clone()
        }
    }

    /// Offer an event to this icon's handlers.
    ///
    /// The icon's usability is checked once against the event's grid; an
    /// unusable icon runs no handler. The grid must not be locked by the
    /// caller. Returns the number of handlers that ran.
    pub fn accept(&self, event: &mut IconEvent) -> usize {
        let usable = {
            let contents = event.context().contents().lock();
            self.is_usable(&contents)
        };
        if !usable {
            return 0;
        }
        self.dispatch(event)
    }
}

impl Target<IconEvent> for Icon {
    fn handles(&self) -> &[Arc<Handle<IconEvent>>] {
        &self.handles
    }
}

impl From<ItemStack> for Icon {
    fn from(item: ItemStack) -> Self {
        Self::new(item)
    }
}

impl fmt::Debug for Icon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Icon")
            .field("item", &self.item)
            .field("handles", &self.handles.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use lattice_inventory_core::SlotPos;
    use parking_lot::Mutex;

    use super::*;
    use crate::event::{DragEvent, EventContext};
    use crate::host::{ClickType, DragType, InventoryAction, ViewerId};
    use crate::page::{EmptyProvider, Page, PageConfig};

    fn context_with(contents: GridContent) -> EventContext {
        let page = Arc::new(Page::new(PageConfig::chest("icons", "Icons", 1), EmptyProvider).unwrap());
        EventContext::detached(ViewerId(9), page, Arc::new(Mutex::new(contents)))
    }

    fn click_event(context: EventContext) -> IconEvent {
        IconEvent::Click(ClickEvent::new(
            context,
            SlotPos::new(0, 0),
            0,
            ClickType::Left,
            InventoryAction::PickupAll,
            None,
            false,
        ))
    }

    #[test]
    fn test_calculate_item_uses_fallback_when_hidden() {
        let contents = GridContent::new(1, 9).unwrap();
        let hidden = Icon::new(ItemStack::new("minecraft:diamond"))
            .can_see(|_| false)
            .fallback(ItemStack::new("minecraft:barrier"));
        assert_eq!(hidden.calculate_item(&contents).material, "minecraft:barrier");
        assert!(!hidden.is_usable(&contents));

        let shown = Icon::new(ItemStack::new("minecraft:diamond"));
        assert_eq!(shown.calculate_item(&contents).material, "minecraft:diamond");
        assert!(Icon::empty().calculate_item(&contents).is_air());
    }

    #[test]
    fn test_predicates_see_grid() {
        let mut contents = GridContent::new(1, 9).unwrap();
        let icon = Icon::new(ItemStack::new("minecraft:lever"))
            .can_use(|contents| contents.property_or("unlocked", false));

        assert!(icon.is_visible(&contents));
        assert!(!icon.is_usable(&contents));
        contents.set_property("unlocked", true);
        assert!(icon.is_usable(&contents));
    }

    #[test]
    fn test_accept_runs_handlers_in_order() {
        let order = Arc::new(Mutex::new(Vec::new()));
        let first = order.clone();
        let second = order.clone();

        let icon = Icon::click(ItemStack::new("minecraft:stone"), move |_| first.lock().push(1))
            .handle(Handle::of(|_: &mut DragEvent| panic!("drag handle ran")))
            .handle(Handle::of(move |event: &mut ClickEvent| {
                second.lock().push(2);
                event.allow();
            }));

        let mut event = click_event(context_with(GridContent::new(1, 9).unwrap()));
        assert_eq!(icon.accept(&mut event), 2);
        assert_eq!(*order.lock(), vec![1, 2]);
        let IconEvent::Click(click) = event else {
            panic!("expected click");
        };
        assert!(!click.is_cancelled());
    }

    #[test]
    fn test_unusable_icon_runs_nothing() {
        let runs = Arc::new(AtomicUsize::new(0));
        let counter = runs.clone();
        let icon = Icon::click(ItemStack::new("minecraft:stone"), move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        })
        .can_use(|_| false);

        let mut event = click_event(context_with(GridContent::new(1, 9).unwrap()));
        assert_eq!(icon.accept(&mut event), 0);

        let drag = DragEvent::new(
            context_with(GridContent::new(1, 9).unwrap()),
            vec![SlotPos::new(0, 0)],
            vec![0],
            DragType::Even,
            true,
        );
        assert_eq!(icon.accept(&mut IconEvent::Drag(drag)), 0);
        assert_eq!(runs.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_with_item_keeps_handlers() {
        let icon = Icon::click(ItemStack::new("minecraft:stone"), |_| {}).can_see(|_| true);
        let copy = icon.with_item(ItemStack::new("minecraft:dirt"));

        assert_eq!(copy.item().material, "minecraft:dirt");
        assert_eq!(copy.handles().len(), 1);
        assert!(Arc::ptr_eq(&copy.handles()[0], &icon.handles()[0]));
    }
}
