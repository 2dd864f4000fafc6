//! Error types for the grid primitives.
//!
//! Only argument and bounds violations made by embedding code are errors.
//! Reading or writing a grid coordinate that lies outside the grid is not an
//! error anywhere in Lattice Inventory; those calls yield `None` or do nothing.

/// Result type alias for grid operations.
pub type Result<T> = std::result::Result<T, GridError>;

/// Errors raised when a grid primitive is misused.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GridError {
    /// A grid or screen was declared with a zero dimension.
    #[error("Invalid grid dimensions {rows}x{columns}: rows and columns must be positive")]
    InvalidDimensions { rows: usize, columns: usize },

    /// A rectangle's start corner does not precede its end corner.
    #[error(
        "Invalid rectangle ({from_row}, {from_column}) -> ({to_row}, {to_column}): start must be lower than end on both axes"
    )]
    InvalidRect {
        from_row: usize,
        from_column: usize,
        to_row: usize,
        to_column: usize,
    },

    /// A pattern was built from lines of differing length.
    #[error("Pattern line {line} has length {found}, expected {expected}")]
    PatternShape {
        line: usize,
        expected: usize,
        found: usize,
    },

    /// A pattern was built from no lines, or from empty lines.
    #[error("Pattern must contain at least one non-empty line")]
    EmptyPattern,

    /// A repeating fill was requested with a pattern that does not wrap.
    #[error("Repeating pattern fills require a wrap-around pattern")]
    PatternNotWrapping,

    /// A non-wrapping pattern was read outside its extent.
    #[error("Pattern position ({row}, {column}) is outside the {rows}x{columns} pattern")]
    PatternIndex {
        row: isize,
        column: isize,
        rows: usize,
        columns: usize,
    },

    /// An iterator end position was placed before its start position.
    #[error("End position ({row}, {column}) precedes start position ({start_row}, {start_column})")]
    EndBeforeStart {
        row: usize,
        column: usize,
        start_row: usize,
        start_column: usize,
    },

    /// An iterator end position lies outside the grid.
    #[error("End position ({row}, {column}) is outside the {rows}x{columns} grid")]
    EndOutOfGrid {
        row: usize,
        column: usize,
        rows: usize,
        columns: usize,
    },

    /// A pagination page starts past the end of its entries.
    #[error("Page {page} starts at entry {start}, but only {len} entries exist")]
    PageOutOfRange { page: usize, start: usize, len: usize },

    /// A scheduled tick task id is unknown or was already cancelled.
    #[error("Invalid or expired tick task ID")]
    InvalidTaskId,
}

impl GridError {
    /// Create a rectangle ordering error.
    pub fn invalid_rect(from_row: usize, from_column: usize, to_row: usize, to_column: usize) -> Self {
        Self::InvalidRect {
            from_row,
            from_column,
            to_row,
            to_column,
        }
    }
}
