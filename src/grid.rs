//! The grid contract: one operation set, many storage strategies.
//!
//! [`Grid`] is the seam every backing strategy implements. Callers treat any
//! implementation as an opaque 2D container and interact only through the
//! contract; strategies are externally indistinguishable except for
//! performance and concurrency characteristics.
//!
//! The trait is deliberately not object-safe: `map` and `merge` are
//! type-changing and each strategy picks its own output family through the
//! `Map` associated type (sparse maps to sparse, the concurrent wrappers
//! snapshot to dense).

use crate::dense::DenseGrid;
use crate::error::{GridError, Result};
use crate::index::RowCol;

/// Shared contract for all 2D grid storage strategies.
///
/// Guarantees common to every implementation:
///
/// - `size() == rows() * columns()` at all times.
/// - `get`/`set` are bounds-checked against the current dimensions and fail
///   with [`GridError::OutOfBounds`] rather than panicking.
/// - Range operations validate the whole rectangle before mutating, so a
///   failed call never leaves the grid partially written.
/// - `sub_grid`, `resized`, `transposed`, `map` and `merge` return freshly
///   allocated grids that never alias the source's backing storage.
/// - Structural equality ([`eq_grid`](Self::eq_grid)) is storage-independent:
///   equal dimensions and equal values at every coordinate.
///
/// Values are returned by clone so that dense, sparse, locked and per-cell
/// atomic backings can share one signature (an atomic cell cannot hand out a
/// reference into itself).
pub trait Grid<T: Clone + Default>: Sized {
    /// Output family for type-changing transforms (`map`, `merge`).
    type Map<U: Clone + Default>: Grid<U>;

    /// Number of rows
    fn rows(&self) -> usize;

    /// Number of columns
    fn columns(&self) -> usize;

    /// Total number of addressable cells
    #[inline]
    fn size(&self) -> usize {
        self.rows() * self.columns()
    }

    /// Value at `(row, col)`.
    ///
    /// For sparse storage an absent cell reads as `T::default()`.
    fn get(&self, row: usize, col: usize) -> Result<T>;

    /// Value at `(row, col)`, or `fallback` when the cell is absent.
    ///
    /// Only sparse storage can report absence; dense-backed strategies never
    /// return the fallback.
    fn get_or(&self, row: usize, col: usize, _fallback: T) -> Result<T> {
        self.get(row, col)
    }

    /// Store `value` at `(row, col)`
    fn set(&mut self, row: usize, col: usize, value: T) -> Result<()>;

    /// Apply `f` to every cell in place, with its coordinate
    fn update_indexed(&mut self, f: impl FnMut(RowCol, T) -> T);

    /// Apply `f` to every cell in place
    fn update(&mut self, mut f: impl FnMut(T) -> T) {
        self.update_indexed(|_, value| f(value));
    }

    /// Assign `value` to every cell
    fn fill(&mut self, value: T) {
        self.update(|_| value.clone());
    }

    /// Assign `value` to every cell of `[row_start, row_end) x [col_start, col_end)`.
    ///
    /// The full rectangle is validated before any cell is written. An empty
    /// rectangle is a valid no-op.
    fn fill_range(
        &mut self,
        row_start: usize,
        col_start: usize,
        row_end: usize,
        col_end: usize,
        value: T,
    ) -> Result<()> {
        check_range(
            row_start,
            col_start,
            row_end,
            col_end,
            self.rows(),
            self.columns(),
        )?;
        for row in row_start..row_end {
            for col in col_start..col_end {
                self.set(row, col, value.clone())?;
            }
        }
        Ok(())
    }

    /// Replace every cell equal to `old` with `new`
    fn replace_all(&mut self, old: &T, new: T)
    where
        T: PartialEq,
    {
        self.update(|value| if value == *old { new.clone() } else { value });
    }

    /// Independently-owned copy of `[row_start, row_end) x [col_start, col_end)`.
    ///
    /// Never a view into `self`.
    fn sub_grid(
        &self,
        row_start: usize,
        col_start: usize,
        row_end: usize,
        col_end: usize,
    ) -> Result<Self>;

    /// Assign all of `source` into the rectangle anchored at
    /// `(row_start, col_start)`. Inverse of [`sub_grid`](Self::sub_grid).
    ///
    /// The full destination rectangle is bounds-checked before any write.
    fn set_range<G: Grid<T>>(&mut self, row_start: usize, col_start: usize, source: &G) -> Result<()> {
        let row_end = row_start
            .checked_add(source.rows())
            .ok_or(GridError::DimensionOverflow {
                rows: row_start,
                columns: source.rows(),
            })?;
        let col_end = col_start
            .checked_add(source.columns())
            .ok_or(GridError::DimensionOverflow {
                rows: col_start,
                columns: source.columns(),
            })?;
        check_range(
            row_start,
            col_start,
            row_end,
            col_end,
            self.rows(),
            self.columns(),
        )?;
        for (at, value) in source.cells() {
            self.set(row_start + at.row, col_start + at.col, value)?;
        }
        Ok(())
    }

    /// New grid with the given dimensions.
    ///
    /// Cells inside both the old and new bounds keep their values; cells
    /// only in the new bounds take `T::default()`; cells only in the old
    /// bounds are dropped (not recoverable by resizing back).
    fn resized(&self, rows: usize, columns: usize) -> Result<Self>;

    /// New grid with `result(c, r) = self(r, c)`
    fn transposed(&self) -> Self;

    /// Element-wise type-changing transform; same dimensions, new grid
    fn map<U: Clone + Default>(&self, f: impl FnMut(T) -> U) -> Self::Map<U>;

    /// Pairwise combine with another grid of identical dimensions.
    ///
    /// Fails with [`GridError::DimensionMismatch`] on a shape difference;
    /// neither input is mutated.
    fn merge<U, V, G>(&self, other: &G, f: impl FnMut(T, U) -> V) -> Result<Self::Map<V>>
    where
        U: Clone + Default,
        V: Clone + Default,
        G: Grid<U>;

    /// Visit every cell with its coordinate.
    ///
    /// No traversal order is guaranteed across storage strategies.
    fn for_each(&self, f: impl FnMut(RowCol, &T));

    /// Snapshot of every cell with its coordinate.
    ///
    /// For the thread-safe wrapper this is captured atomically at the call;
    /// the returned data never observes later mutation.
    fn cells(&self) -> Vec<(RowCol, T)> {
        let mut out = Vec::with_capacity(self.size());
        self.for_each(|at, value| out.push((at, value.clone())));
        out
    }

    /// Materialize into the baseline dense form.
    ///
    /// This is the general representation every strategy converts to; two
    /// grids with equal content produce equal dense forms.
    fn to_dense(&self) -> DenseGrid<T> {
        let columns = self.columns();
        let mut out = DenseGrid::new(self.rows(), columns);
        self.for_each(|at, value| out.as_mut_slice()[at.to_linear(columns)] = value.clone());
        out
    }

    /// Structural, storage-independent equality: dimensions match and every
    /// corresponding cell value is equal.
    fn eq_grid<G: Grid<T>>(&self, other: &G) -> bool
    where
        T: PartialEq,
    {
        if self.rows() != other.rows() || self.columns() != other.columns() {
            return false;
        }
        for row in 0..self.rows() {
            for col in 0..self.columns() {
                match (self.get(row, col), other.get(row, col)) {
                    (Ok(a), Ok(b)) if a == b => {}
                    _ => return false,
                }
            }
        }
        true
    }
}

/// Check a single coordinate against grid bounds
#[inline]
pub(crate) fn check_bounds(row: usize, col: usize, rows: usize, columns: usize) -> Result<()> {
    if row < rows && col < columns {
        Ok(())
    } else {
        Err(GridError::OutOfBounds {
            row,
            col,
            rows,
            columns,
        })
    }
}

/// Check a half-open rectangle `[row_start, row_end) x [col_start, col_end)`.
///
/// Inverted corners are [`GridError::InvalidRange`]; an exclusive corner past
/// the grid bounds is [`GridError::OutOfBounds`] (reported with the exclusive
/// corner). Empty rectangles are valid.
pub(crate) fn check_range(
    row_start: usize,
    col_start: usize,
    row_end: usize,
    col_end: usize,
    rows: usize,
    columns: usize,
) -> Result<()> {
    if row_start > row_end || col_start > col_end {
        return Err(GridError::InvalidRange {
            row_start,
            col_start,
            row_end,
            col_end,
        });
    }
    if row_end > rows || col_end > columns {
        return Err(GridError::OutOfBounds {
            row: row_end,
            col: col_end,
            rows,
            columns,
        });
    }
    Ok(())
}

/// `rows * columns`, or [`GridError::DimensionOverflow`]
#[inline]
pub(crate) fn checked_area(rows: usize, columns: usize) -> Result<usize> {
    rows.checked_mul(columns)
        .ok_or(GridError::DimensionOverflow { rows, columns })
}

/// Check that two shapes match
#[inline]
pub(crate) fn check_same_shape(
    rows: usize,
    columns: usize,
    other_rows: usize,
    other_columns: usize,
) -> Result<()> {
    if rows == other_rows && columns == other_columns {
        Ok(())
    } else {
        Err(GridError::DimensionMismatch {
            rows,
            columns,
            other_rows,
            other_columns,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_bounds() {
        assert!(check_bounds(2, 3, 3, 4).is_ok());
        assert_eq!(
            check_bounds(3, 0, 3, 4),
            Err(GridError::OutOfBounds {
                row: 3,
                col: 0,
                rows: 3,
                columns: 4
            })
        );
        assert!(check_bounds(0, 0, 0, 0).is_err());
    }

    #[test]
    fn test_check_range_inverted() {
        assert_eq!(
            check_range(2, 0, 1, 3, 5, 5),
            Err(GridError::InvalidRange {
                row_start: 2,
                col_start: 0,
                row_end: 1,
                col_end: 3
            })
        );
    }

    #[test]
    fn test_check_range_out_of_bounds() {
        assert!(check_range(0, 0, 5, 5, 5, 5).is_ok());
        assert!(check_range(0, 0, 6, 5, 5, 5).is_err());
        assert!(check_range(0, 0, 5, 6, 5, 5).is_err());
    }

    #[test]
    fn test_check_range_empty_ok() {
        assert!(check_range(2, 2, 2, 2, 5, 5).is_ok());
        assert!(check_range(5, 5, 5, 5, 5, 5).is_ok());
    }

    #[test]
    fn test_checked_area() {
        assert_eq!(checked_area(3, 4), Ok(12));
        assert_eq!(checked_area(0, 10), Ok(0));
        assert!(checked_area(usize::MAX, 2).is_err());
    }

    #[test]
    fn test_check_same_shape() {
        assert!(check_same_shape(2, 3, 2, 3).is_ok());
        assert_eq!(
            check_same_shape(2, 3, 3, 2),
            Err(GridError::DimensionMismatch {
                rows: 2,
                columns: 3,
                other_rows: 3,
                other_columns: 2
            })
        );
    }
}
