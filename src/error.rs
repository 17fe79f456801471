//! Error types for jaala.

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, GridError>;

/// Grid error types.
///
/// Every variant is a caller/precondition error surfaced synchronously at
/// the offending call; there are no transient conditions and no retry
/// policy. Validation runs before mutation begins, so a failed call never
/// leaves a grid partially mutated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    /// Index outside the grid's current bounds
    #[error("index ({row}, {col}) out of bounds for {rows}x{columns} grid")]
    OutOfBounds {
        /// Offending row index
        row: usize,
        /// Offending column index
        col: usize,
        /// Grid row count at the time of the call
        rows: usize,
        /// Grid column count at the time of the call
        columns: usize,
    },

    /// Two grids (or a grid and a range) do not have the same shape
    #[error("dimension mismatch: {rows}x{columns} vs {other_rows}x{other_columns}")]
    DimensionMismatch {
        /// Left-hand row count
        rows: usize,
        /// Left-hand column count
        columns: usize,
        /// Right-hand row count
        other_rows: usize,
        /// Right-hand column count
        other_columns: usize,
    },

    /// Rectangle with inverted corners (start past end)
    #[error("invalid range ({row_start}, {col_start})..({row_end}, {col_end})")]
    InvalidRange {
        /// Inclusive start row
        row_start: usize,
        /// Inclusive start column
        col_start: usize,
        /// Exclusive end row
        row_end: usize,
        /// Exclusive end column
        col_end: usize,
    },

    /// `rows * columns` does not fit in `usize`
    #[error("grid dimensions {rows}x{columns} overflow")]
    DimensionOverflow {
        /// Requested row count
        rows: usize,
        /// Requested column count
        columns: usize,
    },

    /// Zero divisor encountered by a checked element-wise division
    #[error("division by zero at ({row}, {col})")]
    DivisionByZero {
        /// Row of the zero divisor
        row: usize,
        /// Column of the zero divisor
        col: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = GridError::OutOfBounds {
            row: 5,
            col: 7,
            rows: 3,
            columns: 4,
        };
        assert_eq!(err.to_string(), "index (5, 7) out of bounds for 3x4 grid");

        let err = GridError::DimensionMismatch {
            rows: 2,
            columns: 3,
            other_rows: 3,
            other_columns: 2,
        };
        assert_eq!(err.to_string(), "dimension mismatch: 2x3 vs 3x2");
    }

    #[test]
    fn test_error_eq() {
        let a = GridError::DivisionByZero { row: 1, col: 2 };
        let b = GridError::DivisionByZero { row: 1, col: 2 };
        assert_eq!(a, b);
    }
}
