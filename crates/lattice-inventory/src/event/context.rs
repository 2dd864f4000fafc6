//! Context shared by every routed event.

use std::fmt;
use std::sync::{Arc, Weak};

use crate::content::SharedContent;
use crate::host::ViewerId;
use crate::page::Page;
use crate::session::{InventoryManager, ManagerShared};

/// The viewer, screen and grid an event concerns.
///
/// Handlers run without any lock held, so they may lock
/// [`EventContext::contents`] freely and may open or close screens through
/// [`EventContext::manager`].
#[derive(Clone)]
pub struct EventContext {
    viewer: ViewerId,
    page: Arc<Page>,
    contents: SharedContent,
    manager: Weak<ManagerShared>,
}

impl EventContext {
    pub(crate) fn new(
        viewer: ViewerId,
        page: Arc<Page>,
        contents: SharedContent,
        manager: Weak<ManagerShared>,
    ) -> Self {
        Self {
            viewer,
            page,
            contents,
            manager,
        }
    }

    /// A context with no manager behind it.
    ///
    /// [`EventContext::close`] does nothing on such a context. Useful for
    /// dispatching events by hand.
    pub fn detached(viewer: ViewerId, page: Arc<Page>, contents: SharedContent) -> Self {
        Self::new(viewer, page, contents, Weak::new())
    }

    pub fn viewer(&self) -> ViewerId {
        self.viewer
    }

    pub fn page(&self) -> &Arc<Page> {
        &self.page
    }

    /// The grid shown to the viewer.
    pub fn contents(&self) -> &SharedContent {
        &self.contents
    }

    /// The manager that opened the screen, if it is still alive.
    pub fn manager(&self) -> Option<InventoryManager> {
        self.manager.upgrade().map(InventoryManager::from_shared)
    }

    /// Close the viewer's screen.
    ///
    /// Does nothing if the viewer has moved on to another screen or the
    /// manager is gone.
    pub fn close(&self) {
        let Some(manager) = self.manager() else {
            return;
        };
        let current = manager
            .contents(self.viewer)
            .is_some_and(|contents| Arc::ptr_eq(&contents, &self.contents));
        if current {
            // The session exists, so closing cannot fail.
            let _ = manager.close(self.viewer);
        }
    }
}

impl fmt::Debug for EventContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventContext")
            .field("viewer", &self.viewer)
            .field("page", &self.page.id())
            .finish_non_exhaustive()
    }
}
