//! Viewer to screen tracking.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use lattice_inventory_core::TickTaskId;
use parking_lot::RwLock;

use crate::content::{LiveView, SharedContent};
use crate::host::ViewerId;
use crate::page::Page;

/// The screen a viewer has open.
#[derive(Clone)]
pub struct Session {
    page: Arc<Page>,
    contents: SharedContent,
    view: Arc<dyn LiveView>,
    tick: Option<TickTaskId>,
}

impl Session {
    pub fn new(page: Arc<Page>, contents: SharedContent, view: Arc<dyn LiveView>) -> Self {
        Self {
            page,
            contents,
            view,
            tick: None,
        }
    }

    pub fn page(&self) -> &Arc<Page> {
        &self.page
    }

    pub fn contents(&self) -> &SharedContent {
        &self.contents
    }

    /// The host view showing the grid.
    pub fn view(&self) -> &Arc<dyn LiveView> {
        &self.view
    }

    /// The scheduled tick task, if the page ticks.
    pub fn tick(&self) -> Option<TickTaskId> {
        self.tick
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("page", &self.page.id())
            .field("tick", &self.tick)
            .finish_non_exhaustive()
    }
}

/// Maps each viewer to the one screen it has open.
///
/// Entries are added on open and removed on close, disconnect and shutdown.
#[derive(Default)]
pub struct SessionRegistry {
    sessions: RwLock<HashMap<ViewerId, Session>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Track `session` for `viewer`, returning the session it replaces.
    pub fn insert(&self, viewer: ViewerId, session: Session) -> Option<Session> {
        self.sessions.write().insert(viewer, session)
    }

    pub fn remove(&self, viewer: ViewerId) -> Option<Session> {
        self.sessions.write().remove(&viewer)
    }

    pub fn get(&self, viewer: ViewerId) -> Option<Session> {
        self.sessions.read().get(&viewer).cloned()
    }

    pub fn contains(&self, viewer: ViewerId) -> bool {
        self.sessions.read().contains_key(&viewer)
    }

    /// Viewers that have the page with `page_id` open.
    pub fn viewers_of(&self, page_id: &str) -> Vec<ViewerId> {
        let mut viewers: Vec<_> = self
            .sessions
            .read()
            .iter()
            .filter(|(_, session)| session.page.id() == page_id)
            .map(|(viewer, _)| *viewer)
            .collect();
        viewers.sort_unstable_by_key(|viewer| viewer.0);
        viewers
    }

    pub fn contents(&self, viewer: ViewerId) -> Option<SharedContent> {
        self.sessions.read().get(&viewer).map(|session| session.contents.clone())
    }

    pub fn page(&self, viewer: ViewerId) -> Option<Arc<Page>> {
        self.sessions.read().get(&viewer).map(|session| session.page.clone())
    }

    /// Record the tick task of the viewer's session.
    ///
    /// Returns `false` if the viewer has no session.
    pub fn set_tick(&self, viewer: ViewerId, tick: TickTaskId) -> bool {
        match self.sessions.write().get_mut(&viewer) {
            Some(session) => {
                session.tick = Some(tick);
                true
            }
            None => false,
        }
    }

    /// Swap the host view of the viewer's session.
    pub(crate) fn set_view(&self, viewer: ViewerId, view: Arc<dyn LiveView>) -> bool {
        match self.sessions.write().get_mut(&viewer) {
            Some(session) => {
                session.view = view;
                true
            }
            None => false,
        }
    }

    /// Detach the tick task from the viewer's session.
    pub fn take_tick(&self, viewer: ViewerId) -> Option<TickTaskId> {
        self.sessions.write().get_mut(&viewer).and_then(|session| session.tick.take())
    }

    /// Remove every session.
    pub fn drain(&self) -> Vec<(ViewerId, Session)> {
        let mut drained: Vec<_> = self.sessions.write().drain().collect();
        drained.sort_unstable_by_key(|(viewer, _)| viewer.0);
        drained
    }

    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.read().is_empty()
    }
}

impl fmt::Debug for SessionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionRegistry").field("sessions", &self.len()).finish()
    }
}
