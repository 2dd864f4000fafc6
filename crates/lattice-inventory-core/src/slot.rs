//! Slot coordinates.

use std::fmt;

use serde::{Deserialize, Serialize};

/// An immutable `(row, column)` coordinate inside a slot grid.
///
/// `SlotPos` never owns a cell; it only names one. Grids convert between a
/// `SlotPos` and a flat row-major index with [`SlotPos::index`] and
/// [`SlotPos::from_index`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct SlotPos {
    row: usize,
    column: usize,
}

impl SlotPos {
    /// Create a coordinate.
    #[inline]
    pub const fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }

    /// Convert a row-major index into a coordinate for a grid `columns` wide.
    ///
    /// # Panics
    ///
    /// Panics if `columns` is zero.
    #[inline]
    pub const fn from_index(index: usize, columns: usize) -> Self {
        Self {
            row: index / columns,
            column: index % columns,
        }
    }

    /// The row of this coordinate.
    #[inline]
    pub const fn row(&self) -> usize {
        self.row
    }

    /// The column of this coordinate.
    #[inline]
    pub const fn column(&self) -> usize {
        self.column
    }

    /// The row-major index of this coordinate in a grid `columns` wide.
    #[inline]
    pub const fn index(&self, columns: usize) -> usize {
        self.row * columns + self.column
    }
}

impl From<(usize, usize)> for SlotPos {
    fn from((row, column): (usize, usize)) -> Self {
        Self::new(row, column)
    }
}

impl fmt::Display for SlotPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.column)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_index_round_trip() {
        let pos = SlotPos::new(2, 7);
        assert_eq!(pos.index(9), 25);
        assert_eq!(SlotPos::from_index(25, 9), pos);
    }

    #[test]
    fn test_value_equality_as_key() {
        let mut set = HashSet::new();
        set.insert(SlotPos::new(1, 1));
        assert!(set.contains(&SlotPos::from((1, 1))));
        assert!(!set.contains(&SlotPos::new(1, 2)));
    }

    #[test]
    fn test_display() {
        assert_eq!(SlotPos::new(3, 4).to_string(), "(3, 4)");
    }
}
