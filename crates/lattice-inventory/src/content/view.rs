//! Binding between grid content and a live host view.

use std::fmt;
use std::sync::Arc;

use lattice_inventory_core::{ItemStack, MainThreadQueue};

/// A host inventory view currently shown to a viewer.
///
/// Implementations are provided by the host. They are only ever called on
/// the host main thread.
pub trait LiveView: Send + Sync {
    /// Show `item` in host slot `slot`, or clear the slot.
    fn set_slot(&self, slot: usize, item: Option<ItemStack>);

    /// Change the title of the open view.
    fn rename(&self, title: &str);

    /// Close the view on the host side.
    fn close(&self);
}

/// Pushes slot updates to a [`LiveView`] from any thread.
///
/// Updates made on the main thread reach the view immediately; updates made
/// elsewhere are queued on the [`MainThreadQueue`] and applied on the next
/// drain.
#[derive(Clone)]
pub struct ViewBinding {
    view: Arc<dyn LiveView>,
    queue: Arc<MainThreadQueue>,
}

impl ViewBinding {
    pub fn new(view: Arc<dyn LiveView>, queue: Arc<MainThreadQueue>) -> Self {
        Self { view, queue }
    }

    /// The bound view.
    pub fn view(&self) -> &Arc<dyn LiveView> {
        &self.view
    }

    /// Push a slot update.
    pub fn push(&self, slot: usize, item: Option<ItemStack>) {
        let view = self.view.clone();
        self.queue.invoke(move || view.set_slot(slot, item));
    }

    /// Rename the view.
    pub fn rename(&self, title: impl Into<String>) {
        let view = self.view.clone();
        let title = title.into();
        self.queue.invoke(move || view.rename(&title));
    }
}

impl fmt::Debug for ViewBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewBinding")
            .field("queue", &self.queue)
            .finish_non_exhaustive()
    }
}
