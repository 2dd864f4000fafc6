//! Stateful cursors for filling a grid.
//!
//! A [`SlotIterator`] walks a [`GridContent`] row by row or column by column,
//! skipping positions where it may not place an icon. The iterator holds no
//! reference to the grid; every operation that needs the grid takes it as an
//! argument, so an iterator can be stored inside the very grid it walks.
//!
//! A position is *placeable* when all of these hold:
//!
//! - it is not blacklisted;
//! - overriding is allowed, or the cell is empty;
//! - the inclusion pattern, if any, marks it `true`;
//! - the exclusion pattern, if any, does not mark it `true`.
//!
//! # Example
//!
//! ```
//! use lattice_inventory::prelude::*;
//!
//! let mut contents = GridContent::new(5, 5)?;
//! let mut iterator = contents.new_iterator(IteratorKind::Horizontal, 0, 0);
//! iterator.blacklist(0, 1);
//!
//! iterator.next(&contents);
//! assert_eq!(iterator.position(), SlotPos::new(0, 2));
//!
//! iterator.set(&mut contents, Icon::new(ItemStack::new("minecraft:emerald")));
//! assert!(contents.get(0, 2).is_some());
//! # Ok::<(), lattice_inventory::Error>(())
//! ```

use std::collections::HashSet;
use std::sync::Arc;

use lattice_inventory_core::{GridError, Pattern, Result as GridResult, SlotPos};

use super::grid::GridContent;
use crate::icon::Icon;

/// Traversal order of a [`SlotIterator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum IteratorKind {
    /// Left to right, then down to the next row.
    #[default]
    Horizontal,
    /// Top to bottom, then right to the next column.
    Vertical,
}

/// A boolean pattern anchored at an offset inside the grid.
#[derive(Debug, Clone)]
struct PatternGate {
    pattern: Pattern<bool>,
    row_offset: usize,
    column_offset: usize,
}

impl PatternGate {
    fn new(mut pattern: Pattern<bool>, row_offset: usize, column_offset: usize) -> Self {
        if pattern.default_value().is_none() {
            pattern.set_default(false);
        }
        Self {
            pattern,
            row_offset,
            column_offset,
        }
    }

    /// Whether the pattern marks `(row, column)` as `true`.
    ///
    /// Wrap-around patterns cover the whole grid. Other patterns only cover
    /// their own extent from the offset; positions outside it are never
    /// marked.
    fn marks(&self, row: usize, column: usize) -> bool {
        let pattern = &self.pattern;
        let local_row = row as isize - self.row_offset as isize;
        let local_column = column as isize - self.column_offset as isize;

        if !pattern.is_wrap_around() {
            let inside = local_row >= 0
                && local_column >= 0
                && (local_row as usize) < pattern.row_count()
                && (local_column as usize) < pattern.column_count();
            if !inside {
                return false;
            }
        }

        matches!(pattern.get_object(local_row, local_column), Ok(Some(true)))
    }
}

/// A cursor over the cells of a [`GridContent`].
#[derive(Debug, Clone)]
pub struct SlotIterator {
    kind: IteratorKind,
    rows: usize,
    columns: usize,
    row: usize,
    column: usize,
    start_row: usize,
    start_column: usize,
    end_row: usize,
    end_column: usize,
    blacklisted: HashSet<SlotPos>,
    started: bool,
    allow_override: bool,
    pattern: Option<PatternGate>,
    blacklist_pattern: Option<PatternGate>,
}

impl SlotIterator {
    /// Create an iterator over `contents` starting at `(start_row, start_column)`.
    ///
    /// The end position defaults to the last cell of the grid.
    pub fn new(contents: &GridContent, kind: IteratorKind, start_row: usize, start_column: usize) -> Self {
        let (rows, columns) = (contents.rows(), contents.columns());
        Self {
            kind,
            rows,
            columns,
            row: start_row,
            column: start_column,
            start_row,
            start_column,
            end_row: rows - 1,
            end_column: columns - 1,
            blacklisted: HashSet::new(),
            started: false,
            allow_override: true,
            pattern: None,
            blacklist_pattern: None,
        }
    }

    pub fn kind(&self) -> IteratorKind {
        self.kind
    }

    /// The icon under the cursor.
    pub fn get<'a>(&self, contents: &'a GridContent) -> Option<&'a Arc<Icon>> {
        contents.get(self.row, self.column)
    }

    /// Store an icon under the cursor if the position is placeable.
    pub fn set(&mut self, contents: &mut GridContent, icon: impl Into<Arc<Icon>>) -> &mut Self {
        if self.can_place(contents) {
            contents.set(self.row, self.column, icon);
        }
        self
    }

    /// Step backward to the previous placeable position.
    ///
    /// Stops at `(0, 0)` regardless of the start position.
    pub fn previous(&mut self, contents: &GridContent) -> &mut Self {
        self.started = true;
        if self.at_origin() {
            return self;
        }

        loop {
            self.step_back();
            if self.can_place(contents) || self.at_origin() {
                break;
            }
        }
        self
    }

    /// Step forward to the next placeable position.
    ///
    /// Once the end position is reached further calls do nothing. Walking off
    /// the grid also ends the iterator.
    pub fn next(&mut self, contents: &GridContent) -> &mut Self {
        self.started = true;
        if self.ended() {
            return self;
        }

        loop {
            self.step_forward();
            if self.row >= self.rows || self.column >= self.columns {
                self.row = self.end_row;
                self.column = self.end_column;
                break;
            }
            if self.can_place(contents) || self.ended() {
                break;
            }
        }
        self
    }

    /// Mark the iterator started without stepping off a placeable position.
    ///
    /// If the current position is not placeable the iterator advances as
    /// [`SlotIterator::next`] would. Does nothing once started.
    pub fn start(&mut self, contents: &GridContent) -> &mut Self {
        if self.started {
            return self;
        }
        if self.can_place(contents) || self.ended() {
            self.started = true;
            self
        } else {
            self.next(contents)
        }
    }

    fn step_forward(&mut self) {
        match self.kind {
            IteratorKind::Horizontal => {
                self.column = (self.column + 1) % self.columns;
                if self.column == 0 {
                    self.row += 1;
                }
            }
            IteratorKind::Vertical => {
                self.row = (self.row + 1) % self.rows;
                if self.row == 0 {
                    self.column += 1;
                }
            }
        }
    }

    fn step_back(&mut self) {
        match self.kind {
            IteratorKind::Horizontal => {
                if self.column == 0 {
                    self.column = self.columns - 1;
                    self.row -= 1;
                } else {
                    self.column -= 1;
                }
            }
            IteratorKind::Vertical => {
                if self.row == 0 {
                    self.row = self.rows - 1;
                    self.column -= 1;
                } else {
                    self.row -= 1;
                }
            }
        }
    }

    fn at_origin(&self) -> bool {
        self.row == 0 && self.column == 0
    }

    /// Exclude a row-major index from placement.
    pub fn blacklist_index(&mut self, index: usize) -> &mut Self {
        self.blacklist_pos(SlotPos::from_index(index, self.columns))
    }

    /// Exclude `(row, column)` from placement.
    pub fn blacklist(&mut self, row: usize, column: usize) -> &mut Self {
        self.blacklist_pos(SlotPos::new(row, column))
    }

    /// Exclude a slot position from placement.
    pub fn blacklist_pos(&mut self, pos: SlotPos) -> &mut Self {
        self.blacklisted.insert(pos);
        self
    }

    pub fn is_blacklisted(&self, pos: SlotPos) -> bool {
        self.blacklisted.contains(&pos)
    }

    pub fn row(&self) -> usize {
        self.row
    }

    pub fn column(&self) -> usize {
        self.column
    }

    /// The current position.
    pub fn position(&self) -> SlotPos {
        SlotPos::new(self.row, self.column)
    }

    /// Move the cursor to another row.
    pub fn set_row(&mut self, row: usize) -> &mut Self {
        self.row = row;
        self
    }

    /// Move the cursor to another column.
    pub fn set_column(&mut self, column: usize) -> &mut Self {
        self.column = column;
        self
    }

    pub fn started(&self) -> bool {
        self.started
    }

    /// Whether the cursor sits on the end position.
    pub fn ended(&self) -> bool {
        self.row == self.end_row && self.column == self.end_column
    }

    /// Return to the start position, not started.
    pub fn reset(&mut self) -> &mut Self {
        self.row = self.start_row;
        self.column = self.start_column;
        self.started = false;
        self
    }

    pub fn end(&self) -> SlotPos {
        SlotPos::new(self.end_row, self.end_column)
    }

    /// Set the end position. `None` selects the last row or column.
    ///
    /// The end is compared to the start by the products `row * column`, so
    /// ends in the same "product band" as the start are accepted. Such an end
    /// may precede the start row-major, and walking off the grid then moves
    /// the cursor back to it.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::EndOutOfGrid`] if the end lies outside the grid
    /// and [`GridError::EndBeforeStart`] if its product is below the start's.
    pub fn end_position(&mut self, row: Option<usize>, column: Option<usize>) -> GridResult<&mut Self> {
        let row = row.unwrap_or(self.rows - 1);
        let column = column.unwrap_or(self.columns - 1);

        if row >= self.rows || column >= self.columns {
            return Err(GridError::EndOutOfGrid {
                row,
                column,
                rows: self.rows,
                columns: self.columns,
            });
        }
        if row * column < self.start_row * self.start_column {
            return Err(GridError::EndBeforeStart {
                row,
                column,
                start_row: self.start_row,
                start_column: self.start_column,
            });
        }

        self.end_row = row;
        self.end_column = column;
        Ok(self)
    }

    /// [`SlotIterator::end_position`] addressed by a [`SlotPos`].
    ///
    /// # Errors
    ///
    /// Same as [`SlotIterator::end_position`].
    pub fn end_position_at(&mut self, pos: SlotPos) -> GridResult<&mut Self> {
        self.end_position(Some(pos.row()), Some(pos.column()))
    }

    pub fn allows_override(&self) -> bool {
        self.allow_override
    }

    /// Allow or forbid writing over occupied cells.
    pub fn allow_override(&mut self, allow: bool) -> &mut Self {
        self.allow_override = allow;
        self
    }

    /// Only place where `pattern`, anchored at the grid origin, marks `true`.
    ///
    /// A pattern without a default gets `false` as its default.
    pub fn with_pattern(&mut self, pattern: Pattern<bool>) -> &mut Self {
        self.with_pattern_offset(pattern, 0, 0)
    }

    /// [`SlotIterator::with_pattern`] anchored at an offset.
    pub fn with_pattern_offset(&mut self, pattern: Pattern<bool>, row_offset: usize, column_offset: usize) -> &mut Self {
        self.pattern = Some(PatternGate::new(pattern, row_offset, column_offset));
        self
    }

    /// Remove the inclusion pattern.
    pub fn clear_pattern(&mut self) -> &mut Self {
        self.pattern = None;
        self
    }

    /// Never place where `pattern`, anchored at the grid origin, marks `true`.
    pub fn blacklist_pattern(&mut self, pattern: Pattern<bool>) -> &mut Self {
        self.blacklist_pattern_offset(pattern, 0, 0)
    }

    /// [`SlotIterator::blacklist_pattern`] anchored at an offset.
    pub fn blacklist_pattern_offset(
        &mut self,
        pattern: Pattern<bool>,
        row_offset: usize,
        column_offset: usize,
    ) -> &mut Self {
        self.blacklist_pattern = Some(PatternGate::new(pattern, row_offset, column_offset));
        self
    }

    /// Remove the exclusion pattern.
    pub fn clear_blacklist_pattern(&mut self) -> &mut Self {
        self.blacklist_pattern = None;
        self
    }

    /// Whether an icon may be placed at the current position.
    pub fn can_place(&self, contents: &GridContent) -> bool {
        let (row, column) = (self.row, self.column);

        !self.blacklisted.contains(&SlotPos::new(row, column))
            && (self.allow_override || contents.get(row, column).is_none())
            && self.pattern.as_ref().is_none_or(|gate| gate.marks(row, column))
            && self
                .blacklist_pattern
                .as_ref()
                .is_none_or(|gate| !gate.marks(row, column))
    }
}
