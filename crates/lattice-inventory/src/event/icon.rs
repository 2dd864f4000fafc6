use super::types::{ClickEvent, DragEvent};

routed_event! {
    /// Events delivered to an icon's handles.
    pub enum IconEvent: IconEventKind {
        /// The icon's slot was clicked.
        Click(ClickEvent),
        /// A drag touched the icon's slot.
        Drag(DragEvent),
    }
}
