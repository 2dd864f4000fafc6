use super::types::{
    BottomClickEvent, ClickEvent, CloseEvent, DragEvent, InitEvent, OpenEvent, OutsideClickEvent,
    TickEvent, UpdateEvent,
};

routed_event! {
    /// Events delivered to a screen's handles.
    pub enum PageEvent: PageEventKind {
        /// The provider filled a freshly opened grid.
        Init(InitEvent),
        /// The host showed the view.
        Open(OpenEvent),
        /// The screen closed.
        Close(CloseEvent),
        /// A scheduled tick ran.
        Tick(TickEvent),
        /// The provider refreshed the grid.
        Update(UpdateEvent),
        /// A slot of the screen was clicked.
        Click(ClickEvent),
        /// A slot of the viewer's own inventory was clicked.
        BottomClick(BottomClickEvent),
        /// The viewer clicked outside the window.
        OutsideClick(OutsideClickEvent),
        /// The viewer dragged items over slots.
        Drag(DragEvent),
    }
}
