//! Character patterns mapped onto values.
//!
//! A [`Pattern`] is a small grid of characters, written as equal-length text
//! lines, whose characters are mapped to values. Patterns are used to paint
//! icons onto a grid and to gate where a slot iterator may place entries.
//!
//! # Example
//!
//! ```
//! use lattice_inventory_core::Pattern;
//!
//! let mut border = Pattern::new(["XXXX", "X  X", "XXXX"]).unwrap();
//! border.attach('X', "Full").set_default("Empty");
//!
//! assert_eq!(border.get_object(0, 0).unwrap(), Some(&"Full"));
//! assert_eq!(border.get_object(1, 1).unwrap(), Some(&"Empty"));
//! ```
//!
//! # Wrap-around
//!
//! A pattern built with [`Pattern::wrapping`] repeats itself in every
//! direction: any coordinate, including negative ones, is reduced onto the
//! pattern. A non-wrapping pattern rejects coordinates outside its extent.

use std::collections::HashMap;

use crate::error::{GridError, Result};
use crate::slot::SlotPos;

/// A 2D character template mapped to values of type `T`.
#[derive(Debug, Clone)]
pub struct Pattern<T> {
    /// The shape, one `Vec<char>` per line. All lines have the same length.
    lines: Vec<Vec<char>>,
    /// Character to value mapping.
    mapping: HashMap<char, T>,
    /// Value returned for characters without a mapping.
    default: Option<T>,
    /// Whether lookups wrap around the pattern's extent.
    wrap_around: bool,
}

impl<T> Pattern<T> {
    /// Build a non-wrapping pattern from text lines.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::EmptyPattern`] when there are no lines or the
    /// lines are empty, and [`GridError::PatternShape`] when the lines differ
    /// in length.
    pub fn new<I, S>(lines: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::build(lines, false)
    }

    /// Build a wrap-around pattern from text lines.
    ///
    /// # Errors
    ///
    /// Same as [`Pattern::new`].
    pub fn wrapping<I, S>(lines: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::build(lines, true)
    }

    fn build<I, S>(lines: I, wrap_around: bool) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let lines: Vec<Vec<char>> = lines
            .into_iter()
            .map(|line| line.as_ref().chars().collect())
            .collect();

        let Some(first) = lines.first() else {
            return Err(GridError::EmptyPattern);
        };
        let expected = first.len();
        if expected == 0 {
            return Err(GridError::EmptyPattern);
        }
        for (line, chars) in lines.iter().enumerate() {
            if chars.len() != expected {
                return Err(GridError::PatternShape {
                    line,
                    expected,
                    found: chars.len(),
                });
            }
        }

        Ok(Self {
            lines,
            mapping: HashMap::new(),
            default: None,
            wrap_around,
        })
    }

    /// Map a character to a value, replacing any previous mapping.
    pub fn attach(&mut self, key: char, value: T) -> &mut Self {
        self.mapping.insert(key, value);
        self
    }

    /// Set the value returned for characters without a mapping.
    pub fn set_default(&mut self, value: T) -> &mut Self {
        self.default = Some(value);
        self
    }

    /// The fallback value, if one was set.
    pub fn default_value(&self) -> Option<&T> {
        self.default.as_ref()
    }

    /// Whether lookups wrap around the pattern's extent.
    pub fn is_wrap_around(&self) -> bool {
        self.wrap_around
    }

    /// Number of lines in the pattern.
    pub fn row_count(&self) -> usize {
        self.lines.len()
    }

    /// Length of every line in the pattern.
    pub fn column_count(&self) -> usize {
        self.lines[0].len()
    }

    /// The raw character at a position.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::PatternIndex`] when the pattern does not wrap and
    /// the position lies outside it.
    pub fn get_key(&self, row: isize, column: isize) -> Result<char> {
        let (row, column) = self.resolve(row, column)?;
        Ok(self.lines[row][column])
    }

    /// The value mapped at a position, or the default when the character has
    /// no mapping. `Ok(None)` means neither exists.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::PatternIndex`] when the pattern does not wrap and
    /// the position lies outside it.
    pub fn get_object(&self, row: isize, column: isize) -> Result<Option<&T>> {
        let key = self.get_key(row, column)?;
        Ok(self.mapping.get(&key).or(self.default.as_ref()))
    }

    /// [`Pattern::get_object`] addressed by a [`SlotPos`].
    ///
    /// # Errors
    ///
    /// Same as [`Pattern::get_object`].
    pub fn get_object_at(&self, pos: SlotPos) -> Result<Option<&T>> {
        self.get_object(pos.row() as isize, pos.column() as isize)
    }

    /// The first position holding `key`, scanning row-major.
    ///
    /// This looks at raw characters and ignores the value mapping.
    pub fn find_key(&self, key: char) -> Option<SlotPos> {
        self.positions_of(key).next()
    }

    /// Every position holding `key`, in row-major order.
    pub fn find_all_keys(&self, key: char) -> Vec<SlotPos> {
        self.positions_of(key).collect()
    }

    fn positions_of(&self, key: char) -> impl Iterator<Item = SlotPos> + '_ {
        self.lines.iter().enumerate().flat_map(move |(row, line)| {
            line.iter()
                .enumerate()
                .filter(move |&(_, &c)| c == key)
                .map(move |(column, _)| SlotPos::new(row, column))
        })
    }

    fn resolve(&self, row: isize, column: isize) -> Result<(usize, usize)> {
        let rows = self.row_count();
        let columns = self.column_count();

        if self.wrap_around {
            return Ok((
                row.rem_euclid(rows as isize) as usize,
                column.rem_euclid(columns as isize) as usize,
            ));
        }

        if row < 0 || column < 0 || row as usize >= rows || column as usize >= columns {
            return Err(GridError::PatternIndex {
                row,
                column,
                rows,
                columns,
            });
        }
        Ok((row as usize, column as usize))
    }
}
