//! The per-viewer grid of icons behind an open screen.
//!
//! A [`GridContent`] is created when a screen opens for a viewer and lives
//! until that screen closes. Every cell holds an optional [`Icon`]; cells are
//! addressed by `(row, column)`, by row-major index, or by [`SlotPos`].
//!
//! Coordinates outside the grid are tolerated everywhere: reads return
//! `None` and writes do nothing. Fill loops and iterators can therefore run
//! past the edges without checking.
//!
//! While the screen is shown, the grid is bound to a live host view and
//! every write pushes the rendered payload of the changed cell to it.
//!
//! # Example
//!
//! ```
//! use lattice_inventory::prelude::*;
//!
//! let mut contents = GridContent::new(3, 9)?;
//! let glass = Icon::new(ItemStack::new("minecraft:black_stained_glass_pane"));
//!
//! contents.fill_borders(glass);
//! contents.set(1, 4, Icon::new(ItemStack::new("minecraft:diamond")));
//!
//! assert!(contents.get(0, 0).is_some());
//! assert!(contents.get(1, 1).is_none());
//! assert_eq!(contents.first_empty(), Some(SlotPos::new(1, 1)));
//! # Ok::<(), lattice_inventory::Error>(())
//! ```

use std::any::Any;
use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use lattice_inventory_core::{GridError, ItemStack, Pattern, Result as GridResult, SlotPos};
use parking_lot::Mutex;

use super::iterator::{IteratorKind, SlotIterator};
use super::pagination::Pagination;
use super::view::ViewBinding;
use crate::host::ViewerId;
use crate::icon::Icon;

/// Grid content shared between the session registry and event handlers.
pub type SharedContent = Arc<Mutex<GridContent>>;

/// A value stored in the property bag.
pub type PropertyValue = Box<dyn Any + Send + Sync>;

/// The mutable 2D icon array of one open screen.
pub struct GridContent {
    rows: usize,
    columns: usize,
    viewer: Option<ViewerId>,
    /// Row-major cells, `rows * columns` long.
    entries: Vec<Option<Arc<Icon>>>,
    editable: HashSet<SlotPos>,
    iterators: HashMap<String, SlotIterator>,
    properties: HashMap<String, PropertyValue>,
    pagination: Pagination,
    view: Option<ViewBinding>,
}

impl GridContent {
    /// Create an empty grid.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::InvalidDimensions`] if either dimension is zero.
    pub fn new(rows: usize, columns: usize) -> GridResult<Self> {
        if rows == 0 || columns == 0 {
            return Err(GridError::InvalidDimensions { rows, columns });
        }

        Ok(Self {
            rows,
            columns,
            viewer: None,
            entries: vec![None; rows * columns],
            editable: HashSet::new(),
            iterators: HashMap::new(),
            properties: HashMap::new(),
            pagination: Pagination::new(rows * columns),
            view: None,
        })
    }

    /// Attach the viewer this grid belongs to.
    pub fn with_viewer(mut self, viewer: ViewerId) -> Self {
        self.viewer = Some(viewer);
        self
    }

    /// The viewer this grid belongs to, if any.
    pub fn viewer(&self) -> Option<ViewerId> {
        self.viewer
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Total number of cells.
    pub fn size(&self) -> usize {
        self.entries.len()
    }

    fn index_of(&self, row: usize, column: usize) -> Option<usize> {
        (row < self.rows && column < self.columns).then(|| row * self.columns + column)
    }

    fn pos_of(&self, index: usize) -> SlotPos {
        SlotPos::from_index(index, self.columns)
    }

    // -------------------------------------------------------------------------
    // Reads
    // -------------------------------------------------------------------------

    /// The icon at `(row, column)`. `None` for empty or out-of-range cells.
    pub fn get(&self, row: usize, column: usize) -> Option<&Arc<Icon>> {
        self.index_of(row, column)
            .and_then(|index| self.entries[index].as_ref())
    }

    /// The icon at a row-major index.
    pub fn get_index(&self, index: usize) -> Option<&Arc<Icon>> {
        self.entries.get(index).and_then(Option::as_ref)
    }

    /// The icon at a slot position.
    pub fn get_at(&self, pos: SlotPos) -> Option<&Arc<Icon>> {
        self.get(pos.row(), pos.column())
    }

    /// The payload the viewer sees at a row-major index.
    pub fn render(&self, index: usize) -> Option<ItemStack> {
        self.get_index(index).map(|icon| icon.calculate_item(self))
    }

    /// Rendered payloads of every cell, row-major.
    pub fn rendered(&self) -> Vec<Option<ItemStack>> {
        (0..self.size()).map(|index| self.render(index)).collect()
    }

    /// The first empty cell, scanning row-major.
    pub fn first_empty(&self) -> Option<SlotPos> {
        self.entries
            .iter()
            .position(Option::is_none)
            .map(|index| self.pos_of(index))
    }

    /// Every position of the grid in row-major order.
    pub fn slots(&self) -> Vec<SlotPos> {
        (0..self.size()).map(|index| self.pos_of(index)).collect()
    }

    /// The first cell whose rendered payload equals `item`.
    pub fn find_item(&self, item: &ItemStack) -> Option<SlotPos> {
        (0..self.size())
            .find(|&index| self.render(index).as_ref() == Some(item))
            .map(|index| self.pos_of(index))
    }

    /// The first cell whose rendered payload equals the payload of `icon`.
    pub fn find_icon(&self, icon: &Icon) -> Option<SlotPos> {
        self.find_item(icon.item())
    }

    // -------------------------------------------------------------------------
    // Writes
    // -------------------------------------------------------------------------

    /// Store an icon at `(row, column)`. Out-of-range writes do nothing.
    pub fn set(&mut self, row: usize, column: usize, icon: impl Into<Arc<Icon>>) -> &mut Self {
        self.set_entry(row, column, Some(icon.into()))
    }

    /// Empty the cell at `(row, column)`.
    pub fn clear(&mut self, row: usize, column: usize) -> &mut Self {
        self.set_entry(row, column, None)
    }

    /// Replace the cell at `(row, column)` and push it to the live view.
    pub fn set_entry(&mut self, row: usize, column: usize, entry: Option<Arc<Icon>>) -> &mut Self {
        let Some(index) = self.index_of(row, column) else {
            return self;
        };
        self.entries[index] = entry;
        self.push(index);
        self
    }

    /// Store an icon at a row-major index.
    pub fn set_index(&mut self, index: usize, icon: impl Into<Arc<Icon>>) -> &mut Self {
        if index < self.size() {
            let pos = self.pos_of(index);
            self.set_entry(pos.row(), pos.column(), Some(icon.into()));
        }
        self
    }

    /// Empty the cell at a row-major index.
    pub fn clear_index(&mut self, index: usize) -> &mut Self {
        if index < self.size() {
            let pos = self.pos_of(index);
            self.set_entry(pos.row(), pos.column(), None);
        }
        self
    }

    /// Store an icon at a slot position.
    pub fn set_at(&mut self, pos: SlotPos, icon: impl Into<Arc<Icon>>) -> &mut Self {
        self.set(pos.row(), pos.column(), icon)
    }

    /// Empty the cell at a slot position.
    pub fn clear_at(&mut self, pos: SlotPos) -> &mut Self {
        self.clear(pos.row(), pos.column())
    }

    /// Place an icon in the first empty cell. Does nothing on a full grid.
    pub fn add(&mut self, icon: impl Into<Arc<Icon>>) -> &mut Self {
        if let Some(pos) = self.first_empty() {
            self.set_at(pos, icon);
        }
        self
    }

    /// Clear the first cell whose rendered payload equals `item`.
    pub fn remove_first(&mut self, item: &ItemStack) -> &mut Self {
        if let Some(pos) = self.find_item(item) {
            self.clear_at(pos);
        }
        self
    }

    /// Take `amount` items from the first cell holding a similar payload.
    ///
    /// The cell keeps a reduced stack while items remain and is cleared once
    /// the stack is used up. Only the first match is touched.
    pub fn remove_amount(&mut self, item: &ItemStack, amount: u32) -> &mut Self {
        let found = (0..self.size()).find_map(|index| {
            let icon = self.get_index(index)?;
            let rendered = icon.calculate_item(self);
            rendered
                .is_similar(item)
                .then(|| (index, icon.clone(), rendered, icon.is_visible(self)))
        });
        let Some((index, icon, rendered, visible)) = found else {
            return self;
        };

        let pos = self.pos_of(index);
        let remaining = rendered.amount.saturating_sub(amount);
        if remaining == 0 {
            self.clear_at(pos);
            return self;
        }

        // A hidden icon shows its fallback, so that is the stack to reduce.
        let reduced = rendered.with_amount(remaining);
        let reduced = if visible {
            icon.with_item(reduced)
        } else {
            Icon::clone(&icon).fallback(reduced)
        };
        self.set_at(pos, reduced);
        self
    }

    /// Clear every cell whose rendered payload equals `item`.
    pub fn remove_all(&mut self, item: &ItemStack) -> &mut Self {
        let matches: Vec<usize> = (0..self.size())
            .filter(|&index| self.render(index).as_ref() == Some(item))
            .collect();
        for index in matches {
            self.clear_index(index);
        }
        self
    }

    // -------------------------------------------------------------------------
    // Fills
    // -------------------------------------------------------------------------

    /// Put the icon in every cell.
    pub fn fill(&mut self, icon: impl Into<Arc<Icon>>) -> &mut Self {
        let icon = icon.into();
        for index in 0..self.size() {
            self.set_index(index, icon.clone());
        }
        self
    }

    /// Put the icon in every cell of a row. Invalid rows do nothing.
    pub fn fill_row(&mut self, row: usize, icon: impl Into<Arc<Icon>>) -> &mut Self {
        if row >= self.rows {
            return self;
        }
        let icon = icon.into();
        for column in 0..self.columns {
            self.set(row, column, icon.clone());
        }
        self
    }

    /// Put the icon in every cell of a column. Invalid columns do nothing.
    pub fn fill_column(&mut self, column: usize, icon: impl Into<Arc<Icon>>) -> &mut Self {
        if column >= self.columns {
            return self;
        }
        let icon = icon.into();
        for row in 0..self.rows {
            self.set(row, column, icon.clone());
        }
        self
    }

    /// Put the icon on the outer edge of the grid.
    pub fn fill_borders(&mut self, icon: impl Into<Arc<Icon>>) -> &mut Self {
        let (last_row, last_column) = (self.rows - 1, self.columns - 1);
        self.fill_rect(0, 0, last_row, last_column, icon)
    }

    /// Put the icon on the edge of a rectangle, bounds inclusive.
    ///
    /// The interior is left untouched.
    pub fn fill_rect(
        &mut self,
        from_row: usize,
        from_column: usize,
        to_row: usize,
        to_column: usize,
        icon: impl Into<Arc<Icon>>,
    ) -> &mut Self {
        let icon = icon.into();
        self.apply_rect(from_row, from_column, to_row, to_column, |contents, row, column| {
            let edge = row == from_row || row == to_row || column == from_column || column == to_column;
            if edge {
                contents.set(row, column, icon.clone());
            }
        })
    }

    /// [`GridContent::fill_rect`] with row-major index corners.
    pub fn fill_rect_index(&mut self, from: usize, to: usize, icon: impl Into<Arc<Icon>>) -> &mut Self {
        let (from, to) = (self.pos_of(from), self.pos_of(to));
        self.fill_rect_pos(from, to, icon)
    }

    /// [`GridContent::fill_rect`] with slot position corners.
    pub fn fill_rect_pos(&mut self, from: SlotPos, to: SlotPos, icon: impl Into<Arc<Icon>>) -> &mut Self {
        self.fill_rect(from.row(), from.column(), to.row(), to.column(), icon)
    }

    /// Put the icon in every cell of a rectangle, bounds inclusive.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::InvalidRect`] unless `from_row < to_row` and
    /// `from_column < to_column`.
    pub fn fill_square(
        &mut self,
        from_row: usize,
        from_column: usize,
        to_row: usize,
        to_column: usize,
        icon: impl Into<Arc<Icon>>,
    ) -> GridResult<&mut Self> {
        if from_row >= to_row || from_column >= to_column {
            return Err(GridError::invalid_rect(from_row, from_column, to_row, to_column));
        }

        let icon = icon.into();
        Ok(self.apply_rect(from_row, from_column, to_row, to_column, |contents, row, column| {
            contents.set(row, column, icon.clone());
        }))
    }

    /// [`GridContent::fill_square`] with row-major index corners.
    ///
    /// # Errors
    ///
    /// Same as [`GridContent::fill_square`].
    pub fn fill_square_index(
        &mut self,
        from: usize,
        to: usize,
        icon: impl Into<Arc<Icon>>,
    ) -> GridResult<&mut Self> {
        let (from, to) = (self.pos_of(from), self.pos_of(to));
        self.fill_square_pos(from, to, icon)
    }

    /// [`GridContent::fill_square`] with slot position corners.
    ///
    /// # Errors
    ///
    /// Same as [`GridContent::fill_square`].
    pub fn fill_square_pos(
        &mut self,
        from: SlotPos,
        to: SlotPos,
        icon: impl Into<Arc<Icon>>,
    ) -> GridResult<&mut Self> {
        self.fill_square(from.row(), from.column(), to.row(), to.column(), icon)
    }

    /// Call `f` for every cell of a rectangle, row-major, bounds inclusive.
    ///
    /// Cells past the grid edge are skipped.
    pub fn apply_rect<F>(
        &mut self,
        from_row: usize,
        from_column: usize,
        to_row: usize,
        to_column: usize,
        mut f: F,
    ) -> &mut Self
    where
        F: FnMut(&mut Self, usize, usize),
    {
        let to_row = to_row.min(self.rows - 1);
        let to_column = to_column.min(self.columns - 1);
        for row in from_row..=to_row {
            for column in from_column..=to_column {
                f(self, row, column);
            }
        }
        self
    }

    /// Paint a pattern with its top-left corner at `(start_row, start_column)`.
    ///
    /// Pattern cells without a value are skipped.
    pub fn fill_pattern<T>(&mut self, pattern: &Pattern<T>, start_row: usize, start_column: usize) -> &mut Self
    where
        T: Clone + Into<Arc<Icon>>,
    {
        for row in 0..pattern.row_count() {
            for column in 0..pattern.column_count() {
                if let Ok(Some(icon)) = pattern.get_object(row as isize, column as isize) {
                    self.set(start_row + row, start_column + column, icon.clone());
                }
            }
        }
        self
    }

    /// Tile a wrap-around pattern over a rectangle starting at
    /// `(start_row, start_column)`.
    ///
    /// `None` ends default to the grid's row and column counts. The pattern
    /// is read at the offset from the start, inclusive of both ends, and cells
    /// past the grid edge are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::PatternNotWrapping`] if the pattern does not wrap
    /// and [`GridError::InvalidRect`] unless the start precedes the end on
    /// both axes.
    pub fn fill_pattern_repeating<T>(
        &mut self,
        pattern: &Pattern<T>,
        start_row: usize,
        start_column: usize,
        end_row: Option<usize>,
        end_column: Option<usize>,
    ) -> GridResult<&mut Self>
    where
        T: Clone + Into<Arc<Icon>>,
    {
        if !pattern.is_wrap_around() {
            return Err(GridError::PatternNotWrapping);
        }

        let end_row = end_row.unwrap_or(self.rows);
        let end_column = end_column.unwrap_or(self.columns);
        if start_row >= end_row || start_column >= end_column {
            return Err(GridError::invalid_rect(start_row, start_column, end_row, end_column));
        }

        for row in 0..=(end_row - start_row) {
            for column in 0..=(end_column - start_column) {
                if let Ok(Some(icon)) = pattern.get_object(row as isize, column as isize) {
                    self.set(start_row + row, start_column + column, icon.clone());
                }
            }
        }
        Ok(self)
    }

    // -------------------------------------------------------------------------
    // Editable slots
    // -------------------------------------------------------------------------

    /// Allow or forbid the viewer to change a slot's host contents.
    pub fn set_editable(&mut self, pos: SlotPos, editable: bool) -> &mut Self {
        if editable {
            self.editable.insert(pos);
        } else {
            self.editable.remove(&pos);
        }
        self
    }

    pub fn is_editable(&self, pos: SlotPos) -> bool {
        self.editable.contains(&pos)
    }

    pub fn editable_slots(&self) -> impl Iterator<Item = SlotPos> + '_ {
        self.editable.iter().copied()
    }

    // -------------------------------------------------------------------------
    // Iterators
    // -------------------------------------------------------------------------

    /// Create an iterator over this grid starting at `(start_row, start_column)`.
    pub fn new_iterator(&self, kind: IteratorKind, start_row: usize, start_column: usize) -> SlotIterator {
        SlotIterator::new(self, kind, start_row, start_column)
    }

    /// Store an iterator under `id`, replacing any previous one.
    pub fn register_iterator(&mut self, id: impl Into<String>, iterator: SlotIterator) -> &mut SlotIterator {
        match self.iterators.entry(id.into()) {
            Entry::Occupied(mut entry) => {
                entry.insert(iterator);
                entry.into_mut()
            }
            Entry::Vacant(entry) => entry.insert(iterator),
        }
    }

    pub fn iterator(&self, id: &str) -> Option<&SlotIterator> {
        self.iterators.get(id)
    }

    pub fn iterator_mut(&mut self, id: &str) -> Option<&mut SlotIterator> {
        self.iterators.get_mut(id)
    }

    pub fn remove_iterator(&mut self, id: &str) -> Option<SlotIterator> {
        self.iterators.remove(id)
    }

    /// Run `f` with a registered iterator and mutable access to this grid.
    ///
    /// Returns `None` if no iterator is registered under `id`.
    pub fn with_iterator<R>(
        &mut self,
        id: &str,
        f: impl FnOnce(&mut SlotIterator, &mut GridContent) -> R,
    ) -> Option<R> {
        let (key, mut iterator) = self.iterators.remove_entry(id)?;
        let result = f(&mut iterator, self);
        self.iterators.insert(key, iterator);
        Some(result)
    }

    // -------------------------------------------------------------------------
    // Pagination
    // -------------------------------------------------------------------------

    pub fn pagination(&self) -> &Pagination {
        &self.pagination
    }

    pub fn pagination_mut(&mut self) -> &mut Pagination {
        &mut self.pagination
    }

    /// Place the current page of the pagination through `iterator`.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::PageOutOfRange`] if the current page starts past
    /// the last entry.
    pub fn paginate_into(&mut self, iterator: &mut SlotIterator) -> GridResult<&mut Self> {
        let pagination = std::mem::replace(&mut self.pagination, Pagination::new(1));
        let result = pagination.add_to_iterator(iterator, self);
        self.pagination = pagination;
        result.map(|()| self)
    }

    // -------------------------------------------------------------------------
    // Properties
    // -------------------------------------------------------------------------

    /// Store a named value.
    pub fn set_property<T: Any + Send + Sync>(&mut self, name: impl Into<String>, value: T) -> &mut Self {
        self.properties.insert(name.into(), Box::new(value));
        self
    }

    /// Store an already boxed named value.
    pub fn set_property_boxed(&mut self, name: impl Into<String>, value: PropertyValue) -> &mut Self {
        self.properties.insert(name.into(), value);
        self
    }

    /// A named value, if set and of type `T`.
    pub fn property<T: Any>(&self, name: &str) -> Option<&T> {
        self.properties.get(name)?.downcast_ref::<T>()
    }

    /// A named value, or `default` if unset or of another type.
    pub fn property_or<T: Any + Clone>(&self, name: &str, default: T) -> T {
        self.property::<T>(name).cloned().unwrap_or(default)
    }

    pub fn remove_property(&mut self, name: &str) -> bool {
        self.properties.remove(name).is_some()
    }

    // -------------------------------------------------------------------------
    // Live view
    // -------------------------------------------------------------------------

    /// Bind the grid to a live view. Later writes are pushed to it.
    pub fn bind_view(&mut self, binding: ViewBinding) {
        self.view = Some(binding);
    }

    /// Detach the live view.
    pub fn unbind_view(&mut self) -> Option<ViewBinding> {
        self.view.take()
    }

    pub fn view(&self) -> Option<&ViewBinding> {
        self.view.as_ref()
    }

    /// Whether the grid is currently shown in a live view.
    pub fn is_live(&self) -> bool {
        self.view.is_some()
    }

    /// Re-render every occupied cell into the live view.
    pub fn notify_update(&self) {
        if self.view.is_none() {
            return;
        }
        for index in 0..self.size() {
            if self.entries[index].is_some() {
                self.push(index);
            }
        }
    }

    fn push(&self, index: usize) {
        if let Some(view) = &self.view {
            tracing::trace!(target: "lattice_inventory::content", slot = index, "pushing slot to live view");
            view.push(index, self.render(index));
        }
    }
}

impl fmt::Debug for GridContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GridContent")
            .field("rows", &self.rows)
            .field("columns", &self.columns)
            .field("viewer", &self.viewer)
            .field("occupied", &self.entries.iter().filter(|e| e.is_some()).count())
            .field("editable", &self.editable.len())
            .field("live", &self.is_live())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use lattice_inventory_core::MainThreadQueue;

    use super::*;
    use crate::content::LiveView;

    fn icon(material: &str) -> Icon {
        Icon::new(ItemStack::new(material))
    }

    fn occupied(contents: &GridContent) -> Vec<SlotPos> {
        contents
            .slots()
            .into_iter()
            .filter(|&pos| contents.get_at(pos).is_some())
            .collect()
    }

    #[derive(Default)]
    struct Recorder {
        pushes: Mutex<Vec<(usize, Option<ItemStack>)>>,
    }

    impl LiveView for Recorder {
        fn set_slot(&self, slot: usize, item: Option<ItemStack>) {
            self.pushes.lock().push((slot, item));
        }

        fn rename(&self, _title: &str) {}

        fn close(&self) {}
    }

    #[test]
    fn test_rejects_zero_dimensions() {
        assert_eq!(
            GridContent::new(0, 9).unwrap_err(),
            GridError::InvalidDimensions { rows: 0, columns: 9 }
        );
    }

    #[test]
    fn test_set_then_get() {
        let mut contents = GridContent::new(3, 9).unwrap();
        for row in 0..3 {
            for column in 0..9 {
                let entry = Arc::new(icon("minecraft:stone"));
                contents.set(row, column, entry.clone());
                assert!(Arc::ptr_eq(contents.get(row, column).unwrap(), &entry));

                contents.clear(row, column);
                assert!(contents.get(row, column).is_none());
            }
        }
    }

    #[test]
    fn test_addressing_forms_agree() {
        let mut contents = GridContent::new(3, 9).unwrap();
        contents.set_index(13, icon("minecraft:dirt"));

        let by_pos = contents.get_at(SlotPos::new(1, 4)).unwrap();
        let by_coords = contents.get(1, 4).unwrap();
        assert!(Arc::ptr_eq(by_pos, by_coords));
        assert!(Arc::ptr_eq(contents.get_index(13).unwrap(), by_coords));
    }

    #[test]
    fn test_out_of_bounds_is_absent_and_no_op() {
        let mut contents = GridContent::new(3, 9).unwrap();
        contents.set(3, 0, icon("minecraft:stone"));
        contents.set(0, 9, icon("minecraft:stone"));
        contents.set_index(27, icon("minecraft:stone"));

        assert!(contents.get(3, 0).is_none());
        assert!(contents.get(0, 9).is_none());
        assert!(contents.get_index(27).is_none());
        assert!(occupied(&contents).is_empty());
    }

    #[test]
    fn test_fill_square_fills_inclusive_block() {
        let mut contents = GridContent::new(5, 5).unwrap();
        contents.fill_square(0, 0, 2, 2, icon("minecraft:glass")).unwrap();

        let filled = occupied(&contents);
        assert_eq!(filled.len(), 9);
        assert!(filled.iter().all(|pos| pos.row() <= 2 && pos.column() <= 2));
    }

    #[test]
    fn test_fill_square_rejects_unordered_corners() {
        let mut contents = GridContent::new(5, 5).unwrap();
        let err = contents
            .fill_square(2, 0, 2, 3, icon("minecraft:glass"))
            .unwrap_err();
        assert_eq!(err, GridError::invalid_rect(2, 0, 2, 3));
        assert!(occupied(&contents).is_empty());
    }

    #[test]
    fn test_fill_rect_fills_only_perimeter() {
        let mut contents = GridContent::new(5, 5).unwrap();
        contents.fill_rect(0, 0, 2, 2, icon("minecraft:glass"));

        let filled = occupied(&contents);
        assert_eq!(filled.len(), 8);
        assert!(contents.get(1, 1).is_none());
        assert!(contents.get(3, 3).is_none());
    }

    #[test]
    fn test_fill_rect_overloads_agree() {
        let mut by_index = GridContent::new(4, 9).unwrap();
        by_index.fill_rect_index(10, 30, icon("minecraft:glass"));

        let mut by_pos = GridContent::new(4, 9).unwrap();
        by_pos.fill_rect_pos(SlotPos::new(1, 1), SlotPos::new(3, 3), icon("minecraft:glass"));

        assert_eq!(occupied(&by_index), occupied(&by_pos));
        assert_eq!(occupied(&by_index).len(), 8);
    }

    #[test]
    fn test_fill_borders() {
        let mut contents = GridContent::new(3, 9).unwrap();
        contents.fill_borders(icon("minecraft:glass"));

        assert_eq!(occupied(&contents).len(), 9 + 9 + 2);
        assert_eq!(contents.first_empty(), Some(SlotPos::new(1, 1)));
    }

    #[test]
    fn test_fill_row_and_column_ignore_invalid() {
        let mut contents = GridContent::new(3, 9).unwrap();
        contents.fill_row(5, icon("minecraft:glass"));
        contents.fill_column(9, icon("minecraft:glass"));
        assert!(occupied(&contents).is_empty());

        contents.fill_row(1, icon("minecraft:glass"));
        contents.fill_column(0, icon("minecraft:glass"));
        assert_eq!(occupied(&contents).len(), 9 + 2);
    }

    #[test]
    fn test_fill_shares_one_icon() {
        let mut contents = GridContent::new(2, 2).unwrap();
        contents.fill(icon("minecraft:glass"));

        let first = contents.get(0, 0).unwrap().clone();
        assert!(contents.slots().iter().all(|&pos| Arc::ptr_eq(contents.get_at(pos).unwrap(), &first)));
        assert_eq!(contents.first_empty(), None);
    }

    #[test]
    fn test_add_uses_first_empty() {
        let mut contents = GridContent::new(1, 3).unwrap();
        contents.set(0, 0, icon("minecraft:a"));
        contents.add(icon("minecraft:b"));
        assert_eq!(contents.get(0, 1).unwrap().item().material, "minecraft:b");

        contents.add(icon("minecraft:c"));
        contents.add(icon("minecraft:d"));
        assert_eq!(contents.get(0, 2).unwrap().item().material, "minecraft:c");
        assert_eq!(contents.find_item(&ItemStack::new("minecraft:d")), None);
    }

    #[test]
    fn test_find_and_remove_by_equality() {
        let mut contents = GridContent::new(2, 3).unwrap();
        let apple = ItemStack::new("minecraft:apple").with_amount(3);
        contents.set(0, 2, Icon::new(apple.clone()));
        contents.set(1, 0, Icon::new(apple.clone()));
        contents.set(1, 1, Icon::new(apple.clone().with_amount(4)));

        assert_eq!(contents.find_item(&apple), Some(SlotPos::new(0, 2)));
        assert_eq!(contents.find_icon(&Icon::new(apple.clone())), Some(SlotPos::new(0, 2)));

        contents.remove_first(&apple);
        assert_eq!(contents.find_item(&apple), Some(SlotPos::new(1, 0)));

        contents.set(0, 0, Icon::new(apple.clone()));
        contents.remove_all(&apple);
        assert_eq!(contents.find_item(&apple), None);
        // Different amount is not equal.
        assert!(contents.get(1, 1).is_some());
    }

    #[test]
    fn test_remove_amount_reduces_then_clears() {
        let mut contents = GridContent::new(1, 3).unwrap();
        let arrows = ItemStack::new("minecraft:arrow").with_amount(10);
        contents.set(0, 1, Icon::new(arrows.clone()));
        contents.set(0, 2, Icon::new(arrows.clone()));

        contents.remove_amount(&ItemStack::new("minecraft:arrow"), 4);
        assert_eq!(contents.get(0, 1).unwrap().item().amount, 6);
        assert_eq!(contents.get(0, 2).unwrap().item().amount, 10);

        contents.remove_amount(&ItemStack::new("minecraft:arrow"), 6);
        assert!(contents.get(0, 1).is_none());
        assert_eq!(contents.get(0, 2).unwrap().item().amount, 10);
    }

    #[test]
    fn test_remove_amount_takes_from_shown_fallback() {
        let mut contents = GridContent::new(1, 2).unwrap();
        let diamonds = ItemStack::new("minecraft:diamond").with_amount(5);
        let barrier = ItemStack::new("minecraft:barrier");
        contents.set(
            0,
            0,
            Icon::new(diamonds.clone()).can_see(|_| false).fallback(barrier.clone()),
        );
        contents.set(
            0,
            1,
            Icon::new(diamonds.clone())
                .can_see(|_| false)
                .fallback(barrier.clone().with_amount(3)),
        );

        contents.remove_amount(&barrier, 1);
        assert!(contents.get(0, 0).is_none());

        contents.remove_amount(&barrier, 1);
        let kept = contents.get(0, 1).unwrap();
        assert_eq!(kept.item(), &diamonds);
        assert_eq!(contents.render(1).unwrap().amount, 2);
    }

    #[test]
    fn test_fill_pattern_skips_unmapped() {
        let mut contents = GridContent::new(3, 9).unwrap();
        let mut pattern = Pattern::new(["X X", " X "]).unwrap();
        pattern.attach('X', icon("minecraft:glass"));

        contents.fill_pattern(&pattern, 1, 3);
        assert_eq!(
            occupied(&contents),
            vec![SlotPos::new(1, 3), SlotPos::new(1, 5), SlotPos::new(2, 4)]
        );
    }

    #[test]
    fn test_fill_pattern_repeating_requires_wrap() {
        let mut contents = GridContent::new(3, 9).unwrap();
        let mut pattern = Pattern::new(["XO"]).unwrap();
        pattern.attach('X', icon("minecraft:glass"));

        assert_eq!(
            contents
                .fill_pattern_repeating(&pattern, 0, 0, None, None)
                .unwrap_err(),
            GridError::PatternNotWrapping
        );
    }

    #[test]
    fn test_fill_pattern_repeating_tiles_grid() {
        let mut contents = GridContent::new(2, 4).unwrap();
        let mut pattern = Pattern::wrapping(["XO"]).unwrap();
        pattern
            .attach('X', icon("minecraft:black"))
            .attach('O', icon("minecraft:white"));

        contents.fill_pattern_repeating(&pattern, 0, 0, None, None).unwrap();

        for pos in contents.slots() {
            let expected = if pos.column() % 2 == 0 {
                "minecraft:black"
            } else {
                "minecraft:white"
            };
            assert_eq!(contents.get_at(pos).unwrap().item().material, expected);
        }

        assert!(matches!(
            contents.fill_pattern_repeating(&pattern, 1, 0, Some(1), None),
            Err(GridError::InvalidRect { .. })
        ));
    }

    #[test]
    fn test_slots_are_row_major() {
        let contents = GridContent::new(2, 2).unwrap();
        assert_eq!(
            contents.slots(),
            vec![
                SlotPos::new(0, 0),
                SlotPos::new(0, 1),
                SlotPos::new(1, 0),
                SlotPos::new(1, 1)
            ]
        );
    }

    #[test]
    fn test_editable_toggle() {
        let mut contents = GridContent::new(3, 9).unwrap();
        let pos = SlotPos::new(1, 1);
        assert!(!contents.is_editable(pos));
        contents.set_editable(pos, true);
        assert!(contents.is_editable(pos));
        contents.set_editable(pos, false);
        assert!(!contents.is_editable(pos));
    }

    #[test]
    fn test_properties() {
        let mut contents = GridContent::new(1, 9).unwrap();
        contents.set_property("page_size", 12usize);

        assert_eq!(contents.property::<usize>("page_size"), Some(&12));
        assert_eq!(contents.property::<String>("page_size"), None);
        assert_eq!(contents.property::<usize>("missing"), None);
        assert_eq!(contents.property_or("missing", 3usize), 3);
        assert!(contents.remove_property("page_size"));
        assert!(!contents.remove_property("page_size"));
    }

    #[test]
    fn test_registered_iterator_round_trip() {
        let mut contents = GridContent::new(3, 3).unwrap();
        let iterator = contents.new_iterator(IteratorKind::Horizontal, 0, 0);
        contents.register_iterator("items", iterator);

        let placed = contents.with_iterator("items", |iterator, contents| {
            iterator.next(contents);
            iterator.set(contents, icon("minecraft:stone"));
            iterator.position()
        });
        assert_eq!(placed, Some(SlotPos::new(0, 1)));
        assert!(contents.get(0, 1).is_some());
        assert_eq!(contents.iterator("items").unwrap().position(), SlotPos::new(0, 1));
        assert!(contents.with_iterator("missing", |_, _| ()).is_none());
    }

    #[test]
    fn test_paginate_into_places_current_page() {
        let mut contents = GridContent::new(2, 3).unwrap();
        let items: Vec<Icon> = (0..10).map(|i| icon(&format!("minecraft:item_{i}"))).collect();
        contents.pagination_mut().set_items(items).set_items_per_page(4);
        contents.pagination_mut().next();

        let mut iterator = contents.new_iterator(IteratorKind::Horizontal, 0, 0);
        contents.paginate_into(&mut iterator).unwrap();

        let placed: Vec<String> = contents
            .slots()
            .into_iter()
            .filter_map(|pos| contents.get_at(pos).map(|i| i.item().material.clone()))
            .collect();
        assert_eq!(
            placed,
            ["minecraft:item_4", "minecraft:item_5", "minecraft:item_6", "minecraft:item_7"]
        );
        assert_eq!(contents.pagination().page(), 1);
    }

    #[test]
    fn test_writes_push_to_live_view() {
        let recorder = Arc::new(Recorder::default());
        let mut contents = GridContent::new(2, 9).unwrap();
        contents.set(0, 0, icon("minecraft:stone"));
        assert!(recorder.pushes.lock().is_empty());

        contents.bind_view(ViewBinding::new(recorder.clone(), Arc::new(MainThreadQueue::new())));
        contents.set(1, 2, icon("minecraft:dirt"));
        contents.clear(0, 0);
        contents.set(5, 5, icon("minecraft:dirt"));

        assert_eq!(
            *recorder.pushes.lock(),
            vec![(11, Some(ItemStack::new("minecraft:dirt"))), (0, None)]
        );

        recorder.pushes.lock().clear();
        contents.notify_update();
        assert_eq!(
            *recorder.pushes.lock(),
            vec![(11, Some(ItemStack::new("minecraft:dirt")))]
        );

        contents.unbind_view();
        contents.set(0, 0, icon("minecraft:stone"));
        assert_eq!(recorder.pushes.lock().len(), 1);
    }
}
