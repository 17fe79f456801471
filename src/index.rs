//! Row/column index pair and flat-index linearization.
//!
//! [`RowCol`] is the coordinate type shared by every storage strategy, and
//! the only place the `(row, col) -> row * columns + col` mapping lives.
//! The mapping depends on the *current* column count, which is why a
//! column-count change invalidates previously computed flat keys (see
//! [`SparseGrid::set_size`](crate::SparseGrid::set_size)).

use serde::{Deserialize, Serialize};
use std::fmt;

/// A row/column coordinate pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RowCol {
    /// Row index (0-based)
    pub row: usize,
    /// Column index (0-based)
    pub col: usize,
}

impl RowCol {
    /// Create a coordinate pair
    #[inline]
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Linearize against a grid with the given column count.
    ///
    /// Row-major: `(r, c) -> r * columns + c`.
    #[inline]
    pub const fn to_linear(self, columns: usize) -> usize {
        self.row * columns + self.col
    }

    /// Decode a flat index produced by [`to_linear`](Self::to_linear) with
    /// the same column count.
    ///
    /// `columns` must be non-zero; a zero-column grid has no cells and
    /// therefore no valid flat indices.
    #[inline]
    pub const fn from_linear(index: usize, columns: usize) -> Self {
        Self {
            row: index / columns,
            col: index % columns,
        }
    }

    /// True if this coordinate addresses a cell of a `rows` x `columns` grid
    #[inline]
    pub const fn in_bounds(self, rows: usize, columns: usize) -> bool {
        self.row < rows && self.col < columns
    }
}

impl From<(usize, usize)> for RowCol {
    #[inline]
    fn from((row, col): (usize, usize)) -> Self {
        Self { row, col }
    }
}

impl From<RowCol> for (usize, usize) {
    #[inline]
    fn from(at: RowCol) -> Self {
        (at.row, at.col)
    }
}

impl fmt::Display for RowCol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_round_trip() {
        let columns = 7;
        for row in 0..5 {
            for col in 0..columns {
                let at = RowCol::new(row, col);
                let flat = at.to_linear(columns);
                assert_eq!(RowCol::from_linear(flat, columns), at);
            }
        }
    }

    #[test]
    fn test_linear_depends_on_columns() {
        let at = RowCol::new(2, 1);
        assert_eq!(at.to_linear(3), 7);
        assert_eq!(at.to_linear(5), 11);
        // Decoding with the wrong column count lands on a different cell
        assert_eq!(RowCol::from_linear(7, 5), RowCol::new(1, 2));
    }

    #[test]
    fn test_in_bounds() {
        assert!(RowCol::new(0, 0).in_bounds(1, 1));
        assert!(RowCol::new(2, 4).in_bounds(3, 5));
        assert!(!RowCol::new(3, 0).in_bounds(3, 5));
        assert!(!RowCol::new(0, 5).in_bounds(3, 5));
        assert!(!RowCol::new(0, 0).in_bounds(0, 5));
    }

    #[test]
    fn test_tuple_conversions() {
        let at: RowCol = (4, 2).into();
        assert_eq!(at, RowCol::new(4, 2));
        let (row, col): (usize, usize) = at.into();
        assert_eq!((row, col), (4, 2));
    }

    #[test]
    fn test_display() {
        assert_eq!(RowCol::new(1, 2).to_string(), "(1, 2)");
    }
}
