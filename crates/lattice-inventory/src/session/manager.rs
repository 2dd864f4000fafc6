//! The inventory manager.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use lattice_inventory_core::{
    MainThreadQueue, SharedTickScheduler, ThreadAffinity, Worker, WorkerConfig,
};
use parking_lot::{Mutex, RwLock};

use super::registry::{Session, SessionRegistry};
use super::router::InteractionRouter;
use crate::content::{GridContent, PropertyValue, SharedContent, ViewBinding};
use crate::error::{Error, Result};
use crate::event::{CloseEvent, EventContext, InitEvent, PageEvent, Target, TickEvent, UpdateEvent};
use crate::host::{HostEventBridge, InventoryOpener, ViewerId};
use crate::page::{InventoryKind, Page};

/// Why a session ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Ending {
    /// Another page was opened for the viewer.
    Replaced,
    /// Closed through the manager.
    Closed,
    /// The host closed the view.
    ClosedByHost,
    Disconnected,
    Shutdown,
}

impl Ending {
    /// Whether the manager must close the host view itself.
    fn closes_view(self) -> bool {
        matches!(self, Self::Closed | Self::Shutdown)
    }
}

pub(crate) struct ManagerShared {
    sessions: SessionRegistry,
    openers: RwLock<Vec<Arc<dyn InventoryOpener>>>,
    scheduler: SharedTickScheduler,
    main_queue: Arc<MainThreadQueue>,
    worker: Mutex<Option<Arc<Worker>>>,
    worker_config: WorkerConfig,
}

/// Opens, tracks and closes screens for viewers.
///
/// The manager owns the session registry, the registered
/// [`InventoryOpener`]s, the tick scheduler and the main-thread queue. It is
/// cheap to clone; clones share the same state.
///
/// The manager must be created on the host main thread, or given that
/// thread's [`ThreadAffinity`]. Live-view writes made on other threads are
/// queued and applied by [`InteractionRouter::on_tick`].
#[derive(Clone)]
pub struct InventoryManager {
    inner: Arc<ManagerShared>,
}

impl InventoryManager {
    /// Create a manager bound to the current thread.
    pub fn new() -> Self {
        Self::with_affinity(ThreadAffinity::current())
    }

    /// Create a manager bound to the given main thread.
    pub fn with_affinity(affinity: ThreadAffinity) -> Self {
        Self::build(affinity, WorkerConfig::with_name("lattice-inventory-tick"))
    }

    /// Create a manager bound to the current thread with a custom async tick
    /// worker.
    pub fn with_worker_config(worker_config: WorkerConfig) -> Self {
        Self::build(ThreadAffinity::current(), worker_config)
    }

    fn build(affinity: ThreadAffinity, worker_config: WorkerConfig) -> Self {
        Self {
            inner: Arc::new(ManagerShared {
                sessions: SessionRegistry::new(),
                openers: RwLock::new(Vec::new()),
                scheduler: SharedTickScheduler::new(),
                main_queue: Arc::new(MainThreadQueue::with_affinity(affinity)),
                worker: Mutex::new(None),
                worker_config,
            }),
        }
    }

    pub(crate) fn from_shared(inner: Arc<ManagerShared>) -> Self {
        Self { inner }
    }

    pub(crate) fn downgrade(&self) -> Weak<ManagerShared> {
        Arc::downgrade(&self.inner)
    }

    // -------------------------------------------------------------------------
    // Openers
    // -------------------------------------------------------------------------

    /// Register an opener. Later registrations take precedence.
    pub fn register_opener(&self, opener: impl InventoryOpener + 'static) {
        self.inner.openers.write().push(Arc::new(opener));
    }

    /// The most recently registered opener supporting `kind`.
    pub fn find_opener(&self, kind: InventoryKind) -> Option<Arc<dyn InventoryOpener>> {
        self.inner
            .openers
            .read()
            .iter()
            .rev()
            .find(|opener| opener.supports(kind))
            .cloned()
    }

    // -------------------------------------------------------------------------
    // Lifecycle
    // -------------------------------------------------------------------------

    /// Open `page` for `viewer` on its first pagination page.
    pub fn open(&self, page: &Arc<Page>, viewer: ViewerId) -> Result<SharedContent> {
        self.open_at(page, viewer, 0, std::iter::empty())
    }

    /// Open `page` for `viewer` on pagination page `page_index`, with the
    /// given named properties set before the provider runs.
    ///
    /// A screen the viewer already has open is closed first: its close
    /// handlers run and its tick stops, but its close predicates are not
    /// consulted.
    ///
    /// # Errors
    ///
    /// - [`Error::OpenDenied`] if an open predicate refuses the viewer.
    /// - [`Error::NoOpener`] if no opener supports the page's kind.
    /// - [`Error::Worker`] if the page ticks asynchronously and the worker
    ///   thread cannot be started.
    /// - Whatever the opener returns.
    pub fn open_at<I>(
        &self,
        page: &Arc<Page>,
        viewer: ViewerId,
        page_index: usize,
        properties: I,
    ) -> Result<SharedContent>
    where
        I: IntoIterator<Item = (String, PropertyValue)>,
    {
        if !page.can_open(viewer) {
            tracing::debug!(target: "lattice_inventory::session", %viewer, page = page.id(), "open refused");
            return Err(Error::OpenDenied {
                page: page.id().to_owned(),
                viewer,
            });
        }

        let kind = page.kind();
        let Some(opener) = self.find_opener(kind) else {
            tracing::warn!(target: "lattice_inventory::session", ?kind, page = page.id(), "no opener for inventory kind");
            return Err(Error::NoOpener { kind });
        };

        let worker = if page.tick() > 0 && page.is_async() {
            Some(self.worker()?)
        } else {
            None
        };

        if let Some(previous) = self.inner.sessions.remove(viewer) {
            self.end_session(viewer, previous, Ending::Replaced);
        }

        let mut grid = GridContent::new(page.rows(), page.columns())?.with_viewer(viewer);
        for &pos in &page.config().editable {
            grid.set_editable(pos, true);
        }
        grid.pagination_mut().set_page(page_index);
        for (name, value) in properties {
            grid.set_property_boxed(name, value);
        }
        let contents: SharedContent = Arc::new(Mutex::new(grid));

        page.provider().init(viewer, &mut contents.lock());

        let context = EventContext::new(viewer, page.clone(), contents.clone(), self.downgrade());
        page.dispatch(&mut PageEvent::Init(InitEvent::new(context)));

        let view = {
            let grid = contents.lock();
            opener.open(page, viewer, &grid)?
        };
        contents
            .lock()
            .bind_view(ViewBinding::new(view.clone(), self.inner.main_queue.clone()));

        // An Init handler may already have opened another screen for the viewer.
        let displaced = self
            .inner
            .sessions
            .insert(viewer, Session::new(page.clone(), contents.clone(), view));
        if let Some(displaced) = displaced {
            self.end_session(viewer, displaced, Ending::Replaced);
        }
        self.start_tick(page, viewer, &contents, worker);

        tracing::debug!(target: "lattice_inventory::session", %viewer, page = page.id(), page_index, "opened screen");
        Ok(contents)
    }

    /// Close the viewer's screen.
    ///
    /// Close predicates are not consulted; they only veto closes the viewer
    /// starts.
    pub fn close(&self, viewer: ViewerId) -> Result<()> {
        let session = self.inner.sessions.remove(viewer).ok_or(Error::NotOpen { viewer })?;
        self.end_session(viewer, session, Ending::Closed);
        Ok(())
    }

    /// Open the parent of the viewer's screen, or close it if it has none.
    ///
    /// Returns the parent's grid when one was opened.
    pub fn back(&self, viewer: ViewerId) -> Result<Option<SharedContent>> {
        let page = self.page(viewer).ok_or(Error::NotOpen { viewer })?;
        match page.parent() {
            Some(parent) => self.open(parent, viewer).map(Some),
            None => self.close(viewer).map(|()| None),
        }
    }

    /// Refresh every open grid of `page`.
    ///
    /// The provider's `update` hook runs for each viewer, every occupied
    /// cell is pushed to the live view again, then update handlers run.
    pub fn notify_update(&self, page: &Page) {
        for viewer in self.inner.sessions.viewers_of(page.id()) {
            let Some(session) = self.inner.sessions.get(viewer) else {
                continue;
            };
            {
                let mut contents = session.contents().lock();
                session.page().provider().update(viewer, &mut contents);
                contents.notify_update();
            }
            let context = self.context(viewer, &session);
            session
                .page()
                .dispatch(&mut PageEvent::Update(UpdateEvent::new(context)));
        }
    }

    /// Change the title of the viewer's live view.
    pub fn rename(&self, viewer: ViewerId, title: impl Into<String>) -> Result<()> {
        let session = self.inner.sessions.get(viewer).ok_or(Error::NotOpen { viewer })?;
        let view = session.view().clone();
        let title = title.into();
        self.inner.main_queue.invoke(move || view.rename(&title));
        Ok(())
    }

    /// Remove every session, firing close handlers and closing the views.
    ///
    /// The async tick worker is stopped and joined.
    pub fn shutdown(&self) {
        let sessions = self.inner.sessions.drain();
        tracing::debug!(target: "lattice_inventory::session", sessions = sessions.len(), "shutting down");
        for (viewer, session) in sessions {
            self.end_session(viewer, session, Ending::Shutdown);
        }

        let worker = self.inner.worker.lock().take();
        if let Some(worker) = worker {
            worker.stop_and_join();
        }
    }

    pub(crate) fn disconnect(&self, viewer: ViewerId) -> bool {
        match self.inner.sessions.remove(viewer) {
            Some(session) => {
                self.end_session(viewer, session, Ending::Disconnected);
                true
            }
            None => false,
        }
    }

    /// Remove the viewer's session after the host closed its view.
    pub(crate) fn closed_by_host(&self, viewer: ViewerId) -> bool {
        match self.inner.sessions.remove(viewer) {
            Some(session) => {
                self.end_session(viewer, session, Ending::ClosedByHost);
                true
            }
            None => false,
        }
    }

    /// Show the viewer's current grid in a fresh host view.
    ///
    /// Used after a close was vetoed and the host dropped its view anyway.
    pub(crate) fn reopen(&self, viewer: ViewerId) -> Result<()> {
        let session = self.inner.sessions.get(viewer).ok_or(Error::NotOpen { viewer })?;
        let page = session.page();
        let kind = page.kind();
        let opener = self.find_opener(kind).ok_or(Error::NoOpener { kind })?;

        let mut contents = session.contents().lock();
        let view = opener.open(page, viewer, &contents)?;
        contents.bind_view(ViewBinding::new(view.clone(), self.inner.main_queue.clone()));
        drop(contents);

        self.inner.sessions.set_view(viewer, view);
        tracing::debug!(target: "lattice_inventory::session", %viewer, page = page.id(), "reopened vetoed close");
        Ok(())
    }

    fn end_session(&self, viewer: ViewerId, session: Session, ending: Ending) {
        if let Some(task) = session.tick() {
            if let Err(err) = self.inner.scheduler.cancel(task) {
                tracing::trace!(target: "lattice_inventory::tick", %viewer, error = %err, "tick already gone");
            }
        }
        session.contents().lock().unbind_view();

        let fire_close = ending != Ending::Disconnected || session.page().config().close_on_disconnect;
        if fire_close {
            let context = self.context(viewer, &session);
            session
                .page()
                .dispatch(&mut PageEvent::Close(CloseEvent::new(context)));
        }

        if ending.closes_view() {
            let view = session.view().clone();
            self.inner.main_queue.invoke(move || view.close());
        }

        tracing::debug!(target: "lattice_inventory::session", %viewer, page = session.page().id(), ?ending, "closed screen");
    }

    // -------------------------------------------------------------------------
    // Ticks
    // -------------------------------------------------------------------------

    fn start_tick(
        &self,
        page: &Arc<Page>,
        viewer: ViewerId,
        contents: &SharedContent,
        worker: Option<Arc<Worker>>,
    ) {
        let interval = page.tick();
        if interval == 0 {
            return;
        }

        let run = TickRun {
            manager: self.downgrade(),
            viewer,
            page: page.clone(),
            contents: contents.clone(),
            count: Arc::new(AtomicU64::new(0)),
        };
        let task = self.inner.scheduler.schedule_repeating(interval, move || {
            let run = run.clone();
            match &worker {
                Some(worker) => {
                    if !worker.send(move || run.execute()) {
                        tracing::warn!(target: "lattice_inventory::tick", %viewer, "async tick dropped");
                    }
                }
                None => run.execute(),
            }
        });
        self.inner.sessions.set_tick(viewer, task);
        tracing::debug!(target: "lattice_inventory::tick", %viewer, interval, tick_async = page.is_async(), "tick scheduled");
    }

    /// Stop the viewer's tick. Does nothing if none is scheduled.
    ///
    /// Returns `true` if a tick was stopped.
    pub fn stop_tick(&self, viewer: ViewerId) -> bool {
        match self.inner.sessions.take_tick(viewer) {
            Some(task) => {
                let stopped = self.inner.scheduler.cancel(task).is_ok();
                tracing::debug!(target: "lattice_inventory::tick", %viewer, "tick stopped");
                stopped
            }
            None => false,
        }
    }

    fn worker(&self) -> Result<Arc<Worker>> {
        let mut slot = self.inner.worker.lock();
        if let Some(worker) = slot.as_ref().filter(|worker| worker.is_running()) {
            return Ok(worker.clone());
        }
        let worker = Arc::new(Worker::spawn(self.inner.worker_config.clone())?);
        *slot = Some(worker.clone());
        Ok(worker)
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    /// Viewers that have the page with `page_id` open.
    pub fn viewers_of(&self, page_id: &str) -> Vec<ViewerId> {
        self.inner.sessions.viewers_of(page_id)
    }

    /// The viewer's open grid.
    pub fn contents(&self, viewer: ViewerId) -> Option<SharedContent> {
        self.inner.sessions.contents(viewer)
    }

    /// The viewer's open screen.
    pub fn page(&self, viewer: ViewerId) -> Option<Arc<Page>> {
        self.inner.sessions.page(viewer)
    }

    pub fn has_open(&self, viewer: ViewerId) -> bool {
        self.inner.sessions.contains(viewer)
    }

    pub fn sessions(&self) -> &SessionRegistry {
        &self.inner.sessions
    }

    pub(crate) fn session(&self, viewer: ViewerId) -> Option<Session> {
        self.inner.sessions.get(viewer)
    }

    pub(crate) fn context(&self, viewer: ViewerId, session: &Session) -> EventContext {
        EventContext::new(
            viewer,
            session.page().clone(),
            session.contents().clone(),
            self.downgrade(),
        )
    }

    // -------------------------------------------------------------------------
    // Host surface
    // -------------------------------------------------------------------------

    /// The inbound surface for host events.
    pub fn router(&self) -> InteractionRouter {
        InteractionRouter::new(self.clone())
    }

    /// Hand a router to the host's event bridge.
    pub fn install(&self, bridge: &mut impl HostEventBridge) {
        bridge.install(self.router());
    }

    /// Closures waiting for the host main thread.
    pub fn main_queue(&self) -> &Arc<MainThreadQueue> {
        &self.inner.main_queue
    }

    pub fn scheduler(&self) -> &SharedTickScheduler {
        &self.inner.scheduler
    }
}

impl Default for InventoryManager {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for InventoryManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InventoryManager")
            .field("sessions", &self.inner.sessions.len())
            .field("openers", &self.inner.openers.read().len())
            .field("ticks", &self.inner.scheduler.active_count())
            .finish_non_exhaustive()
    }
}

/// One scheduled tick of a viewer's screen.
#[derive(Clone)]
struct TickRun {
    manager: Weak<ManagerShared>,
    viewer: ViewerId,
    page: Arc<Page>,
    contents: SharedContent,
    count: Arc<AtomicU64>,
}

impl TickRun {
    #[tracing::instrument(skip(self), fields(viewer = %self.viewer), target = "lattice_inventory::tick", level = "trace")]
    fn execute(self) {
        let Some(manager) = self.manager.upgrade().map(InventoryManager::from_shared) else {
            return;
        };
        // The viewer may have moved on while an async run was queued.
        let current = manager
            .contents(self.viewer)
            .is_some_and(|contents| Arc::ptr_eq(&contents, &self.contents));
        if !current {
            return;
        }

        let tick = self.count.fetch_add(1, Ordering::Relaxed) + 1;
        self.page.provider().tick(self.viewer, &mut self.contents.lock());

        let context = EventContext::new(self.viewer, self.page.clone(), self.contents.clone(), self.manager.clone());
        self.page
            .dispatch(&mut PageEvent::Tick(TickEvent::new(context, tick)));
    }
}
