use crate::content::GridContent;
use crate::host::ViewerId;

/// Fills and refreshes a screen's grid.
///
/// Every hook runs with the grid locked. Hooks must not lock the grid again
/// or open and close screens; register a [`Handle`](crate::event::Handle)
/// for that instead.
pub trait InventoryProvider: Send + Sync {
    /// Fill a freshly opened grid.
    fn init(&self, viewer: ViewerId, contents: &mut GridContent);

    /// Called on every scheduled tick of the screen.
    fn tick(&self, viewer: ViewerId, contents: &mut GridContent) {
        let _ = (viewer, contents);
    }

    /// Called when the screen is asked to refresh.
    fn update(&self, viewer: ViewerId, contents: &mut GridContent) {
        let _ = (viewer, contents);
    }
}

/// A provider that leaves the grid empty.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyProvider;

impl InventoryProvider for EmptyProvider {
    fn init(&self, _viewer: ViewerId, _contents: &mut GridContent) {}
}

impl<F> InventoryProvider for F
where
    F: Fn(ViewerId, &mut GridContent) + Send + Sync,
{
    fn init(&self, viewer: ViewerId, contents: &mut GridContent) {
        self(viewer, contents);
    }
}
