//! Page splitting for long icon lists.

use std::sync::Arc;

use lattice_inventory_core::{GridError, Result as GridResult};

use super::grid::GridContent;
use super::iterator::SlotIterator;
use crate::icon::Icon;

/// Splits a flat list of icons into fixed-size pages.
///
/// Every [`GridContent`] owns one pagination, sized to the whole grid until
/// [`Pagination::set_items_per_page`] says otherwise.
#[derive(Debug, Clone)]
pub struct Pagination {
    page: usize,
    items: Vec<Arc<Icon>>,
    items_per_page: usize,
}

impl Pagination {
    /// Create an empty pagination. A page size of zero is treated as one.
    pub fn new(items_per_page: usize) -> Self {
        Self {
            page: 0,
            items: Vec::new(),
            items_per_page: items_per_page.max(1),
        }
    }

    /// Replace the backing list.
    pub fn set_items<I, T>(&mut self, items: I) -> &mut Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Arc<Icon>>,
    {
        self.items = items.into_iter().map(Into::into).collect();
        self
    }

    pub fn items(&self) -> &[Arc<Icon>] {
        &self.items
    }

    pub fn items_per_page(&self) -> usize {
        self.items_per_page
    }

    /// Change the page size. Zero is treated as one.
    pub fn set_items_per_page(&mut self, items_per_page: usize) -> &mut Self {
        self.items_per_page = items_per_page.max(1);
        self
    }

    /// Number of pages needed for the backing list.
    pub fn page_count(&self) -> usize {
        self.items.len().div_ceil(self.items_per_page)
    }

    /// Index of the current page.
    pub fn page(&self) -> usize {
        self.page
    }

    /// Jump to a page. No bounds are applied.
    pub fn set_page(&mut self, page: usize) -> &mut Self {
        self.page = page;
        self
    }

    /// Items of the current page.
    ///
    /// The final page may be shorter than the page size.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::PageOutOfRange`] if the page starts past the end
    /// of the backing list.
    pub fn page_items(&self) -> GridResult<&[Arc<Icon>]> {
        let len = self.items.len();
        let start = self.page.saturating_mul(self.items_per_page);
        if start > len {
            return Err(GridError::PageOutOfRange {
                page: self.page,
                start,
                len,
            });
        }
        let end = start.saturating_add(self.items_per_page).min(len);
        Ok(&self.items[start..end])
    }

    pub fn is_first(&self) -> bool {
        self.page == 0
    }

    pub fn is_last(&self) -> bool {
        self.page + 1 >= self.page_count()
    }

    pub fn first(&mut self) -> &mut Self {
        self.page = 0;
        self
    }

    /// Step back one page. Does nothing on the first page.
    pub fn previous(&mut self) -> &mut Self {
        if !self.is_first() {
            self.page -= 1;
        }
        self
    }

    /// Step forward one page. Does nothing on the last page.
    pub fn next(&mut self) -> &mut Self {
        if !self.is_last() {
            self.page += 1;
        }
        self
    }

    pub fn last(&mut self) -> &mut Self {
        self.page = self.page_count().saturating_sub(1);
        self
    }

    /// Place the current page's items through `iterator`.
    ///
    /// An iterator that has not started places its first item on its own
    /// position; every following item goes to the iterator's next position.
    /// Placement stops early once the iterator ends.
    ///
    /// # Errors
    ///
    /// Same as [`Pagination::page_items`].
    pub fn add_to_iterator(&self, iterator: &mut SlotIterator, contents: &mut GridContent) -> GridResult<()> {
        for icon in self.page_items()? {
            if iterator.started() {
                iterator.next(contents);
            } else {
                iterator.start(contents);
            }
            iterator.set(contents, icon.clone());
            if iterator.ended() {
                break;
            }
        }
        Ok(())
    }
}
