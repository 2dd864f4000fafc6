//! Grid content, slot iterators and pagination.

mod grid;
mod iterator;
mod pagination;
mod view;

pub use grid::{GridContent, PropertyValue, SharedContent};
pub use iterator::{IteratorKind, SlotIterator};
pub use pagination::Pagination;
pub use view::{LiveView, ViewBinding};
