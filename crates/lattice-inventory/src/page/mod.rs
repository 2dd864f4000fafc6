//! Screens.
//!
//! A [`Page`] is one configured, openable menu: a validated [`PageConfig`],
//! the [`InventoryProvider`] that fills its grid, its page-level handles and
//! its open/close veto predicates. Pages are immutable once built and shared
//! as `Arc<Page>` between every viewer that has them open.

mod config;
mod provider;

use std::fmt;
use std::sync::Arc;

pub use config::{InventoryKind, PageConfig};
pub use provider::{EmptyProvider, InventoryProvider};

use crate::error::Result;
use crate::event::{CloseEvent, Handle, PageEvent, Target};
use crate::host::ViewerId;

type OpenPredicate = Box<dyn Fn(ViewerId) -> bool + Send + Sync>;
type ClosePredicate = Box<dyn Fn(&CloseEvent) -> bool + Send + Sync>;

/// One configured, openable menu.
pub struct Page {
    config: PageConfig,
    provider: Arc<dyn InventoryProvider>,
    handles: Vec<Arc<Handle<PageEvent>>>,
    parent: Option<Arc<Page>>,
    can_open: Vec<OpenPredicate>,
    can_close: Vec<ClosePredicate>,
}

impl Page {
    /// Build a page, validating `config`.
    pub fn new(config: PageConfig, provider: impl InventoryProvider + 'static) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            provider: Arc::new(provider),
            handles: Vec::new(),
            parent: None,
            can_open: Vec::new(),
            can_close: Vec::new(),
        })
    }

    /// Append a page-level handler.
    pub fn with_handle(mut self, handle: Handle<PageEvent>) -> Self {
        self.handles.push(Arc::new(handle));
        self
    }

    /// Set the screen [`InventoryManager::back`](crate::session::InventoryManager::back)
    /// returns to.
    pub fn with_parent(mut self, parent: Arc<Page>) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Refuse to open unless `predicate` holds for the viewer.
    pub fn with_can_open<P>(mut self, predicate: P) -> Self
    where
        P: Fn(ViewerId) -> bool + Send + Sync + 'static,
    {
        self.can_open.push(Box::new(predicate));
        self
    }

    /// Refuse viewer-initiated closes unless `predicate` holds.
    pub fn with_can_close<P>(mut self, predicate: P) -> Self
    where
        P: Fn(&CloseEvent) -> bool + Send + Sync + 'static,
    {
        self.can_close.push(Box::new(predicate));
        self
    }

    pub fn id(&self) -> &str {
        &self.config.id
    }

    pub fn title(&self) -> &str {
        &self.config.title
    }

    pub fn rows(&self) -> usize {
        self.config.rows
    }

    pub fn columns(&self) -> usize {
        self.config.columns
    }

    pub fn size(&self) -> usize {
        self.config.size()
    }

    pub fn kind(&self) -> InventoryKind {
        self.config.kind
    }

    /// Tick interval in host ticks; 0 when the page does not tick.
    pub fn tick(&self) -> u64 {
        self.config.tick
    }

    /// Whether ticks run on the background worker.
    pub fn is_async(&self) -> bool {
        self.config.tick_async
    }

    pub fn config(&self) -> &PageConfig {
        &self.config
    }

    pub fn provider(&self) -> &Arc<dyn InventoryProvider> {
        &self.provider
    }

    pub fn parent(&self) -> Option<&Arc<Page>> {
        self.parent.as_ref()
    }

    /// Whether every open predicate accepts the viewer.
    pub fn can_open(&self, viewer: ViewerId) -> bool {
        self.can_open.iter().all(|predicate| predicate(viewer))
    }

    /// Whether every close predicate accepts the close.
    pub fn can_close(&self, event: &CloseEvent) -> bool {
        self.can_close.iter().all(|predicate| predicate(event))
    }
}

impl Target<PageEvent> for Page {
    fn handles(&self) -> &[Arc<Handle<PageEvent>>] {
        &self.handles
    }
}

impl fmt::Debug for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Page")
            .field("config", &self.config)
            .field("handles", &self.handles.len())
            .field("parent", &self.parent.as_ref().map(|parent| parent.id()))
            .finish_non_exhaustive()
    }
}
