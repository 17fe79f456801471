//! Dense grid storage.
//!
//! Fully materialized row-major backing with one slot per cell, allocated at
//! construction for exactly `rows * columns` cells. This is the baseline
//! strategy: every other variant must match its externally observable
//! semantics.

use crate::error::{GridError, Result};
use crate::grid::{check_bounds, check_range, check_same_shape, checked_area, Grid};
use crate::index::RowCol;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Dense rectangular grid backed by a flat row-major `Vec`.
///
/// Every cell holds a value (possibly `T::default()`); there is no "absent"
/// state. All per-cell operations are O(1), bulk operations are
/// O(rows * columns). The backing allocation is fixed for the lifetime of an
/// instance; [`resized`](Grid::resized) allocates a new grid and copies the
/// overlapping rectangle.
#[derive(Clone, Debug, Default, Serialize)]
pub struct DenseGrid<T> {
    cells: Vec<T>,
    rows: usize,
    columns: usize,
}

// Deserialization validates that the cell count matches the declared
// dimensions; a derived impl would accept a mismatched payload and later
// panic on an in-bounds index.
impl<'de, T: Deserialize<'de>> Deserialize<'de> for DenseGrid<T> {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Repr<T> {
            cells: Vec<T>,
            rows: usize,
            columns: usize,
        }
        let repr = Repr::deserialize(deserializer)?;
        match repr.rows.checked_mul(repr.columns) {
            Some(area) if area == repr.cells.len() => Ok(Self {
                cells: repr.cells,
                rows: repr.rows,
                columns: repr.columns,
            }),
            _ => Err(serde::de::Error::custom(format!(
                "cell count {} does not match a {}x{} grid",
                repr.cells.len(),
                repr.rows,
                repr.columns
            ))),
        }
    }
}

impl<T: Clone + Default> DenseGrid<T> {
    /// Create a grid with every cell set to `T::default()`.
    ///
    /// # Panics
    ///
    /// Panics when `rows * columns` overflows `usize`.
    pub fn new(rows: usize, columns: usize) -> Self {
        let size = checked_area(rows, columns).unwrap_or_else(|err| panic!("{err}"));
        Self {
            cells: vec![T::default(); size],
            rows,
            columns,
        }
    }

    /// Create a grid with every cell set to `value`.
    ///
    /// Panics when `rows * columns` overflows `usize`.
    pub fn filled(rows: usize, columns: usize, value: T) -> Self {
        let size = checked_area(rows, columns).unwrap_or_else(|err| panic!("{err}"));
        Self {
            cells: vec![value; size],
            rows,
            columns,
        }
    }

    /// Create a grid by evaluating `f` at every coordinate (row-major).
    ///
    /// Panics when `rows * columns` overflows `usize`.
    pub fn from_fn(rows: usize, columns: usize, mut f: impl FnMut(RowCol) -> T) -> Self {
        let size = checked_area(rows, columns).unwrap_or_else(|err| panic!("{err}"));
        let mut cells = Vec::with_capacity(size);
        for row in 0..rows {
            for col in 0..columns {
                cells.push(f(RowCol::new(row, col)));
            }
        }
        Self {
            cells,
            rows,
            columns,
        }
    }

    /// Create a grid from row vectors.
    ///
    /// All rows must have the same length; a ragged input fails with
    /// [`GridError::DimensionMismatch`]. An empty input is a 0x0 grid.
    pub fn from_rows(rows_in: Vec<Vec<T>>) -> Result<Self> {
        let rows = rows_in.len();
        let columns = rows_in.first().map_or(0, Vec::len);
        let mut cells = Vec::with_capacity(rows * columns);
        for row in rows_in {
            if row.len() != columns {
                return Err(GridError::DimensionMismatch {
                    rows,
                    columns,
                    other_rows: rows,
                    other_columns: row.len(),
                });
            }
            cells.extend(row);
        }
        Ok(Self {
            cells,
            rows,
            columns,
        })
    }

    /// Copy any grid into dense form
    pub fn from_grid<G: Grid<T>>(source: &G) -> Self {
        source.to_dense()
    }

    #[inline]
    fn index(&self, row: usize, col: usize) -> usize {
        row * self.columns + col
    }

    /// Row `row` as a slice, or `None` when out of bounds
    #[inline]
    pub fn row(&self, row: usize) -> Option<&[T]> {
        if row < self.rows {
            let start = row * self.columns;
            Some(&self.cells[start..start + self.columns])
        } else {
            None
        }
    }

    /// Raw access to the row-major backing slice
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.cells
    }

    /// Mutable raw access to the row-major backing slice
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.cells
    }

    /// Iterate over all cells with their coordinates (row-major)
    pub fn iter(&self) -> impl Iterator<Item = (RowCol, &T)> + '_ {
        let columns = self.columns;
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, value)| (RowCol::new(i / columns.max(1), i % columns.max(1)), value))
    }

    /// Iterate over rows as slices
    pub fn rows_iter(&self) -> impl Iterator<Item = &[T]> + '_ {
        (0..self.rows).map(move |row| {
            let start = row * self.columns;
            &self.cells[start..start + self.columns]
        })
    }
}

impl<T: Clone + Default> Grid<T> for DenseGrid<T> {
    type Map<U: Clone + Default> = DenseGrid<U>;

    #[inline]
    fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    fn columns(&self) -> usize {
        self.columns
    }

    #[inline]
    fn get(&self, row: usize, col: usize) -> Result<T> {
        check_bounds(row, col, self.rows, self.columns)?;
        Ok(self.cells[self.index(row, col)].clone())
    }

    #[inline]
    fn set(&mut self, row: usize, col: usize, value: T) -> Result<()> {
        check_bounds(row, col, self.rows, self.columns)?;
        let i = self.index(row, col);
        self.cells[i] = value;
        Ok(())
    }

    fn update_indexed(&mut self, mut f: impl FnMut(RowCol, T) -> T) {
        let columns = self.columns;
        for (i, cell) in self.cells.iter_mut().enumerate() {
            let at = RowCol::new(i / columns.max(1), i % columns.max(1));
            let value = std::mem::take(cell);
            *cell = f(at, value);
        }
    }

    fn fill(&mut self, value: T) {
        self.cells.fill(value);
    }

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
            self.rows,
            self.columns,
        )?;
        for row in row_start..row_end {
            let start = self.index(row, col_start);
            self.cells[start..start + (col_end - col_start)].fill(value.clone());
        }
        Ok(())
    }

    fn replace_all(&mut self, old: &T, new: T)
    where
        T: PartialEq,
    {
        for cell in &mut self.cells {
            if *cell == *old {
                *cell = new.clone();
            }
        }
    }

    fn sub_grid(
        &self,
        row_start: usize,
        col_start: usize,
        row_end: usize,
        col_end: usize,
    ) -> Result<Self> {
        check_range(
            row_start,
            col_start,
            row_end,
            col_end,
            self.rows,
            self.columns,
        )?;
        let rows = row_end - row_start;
        let columns = col_end - col_start;
        let mut cells = Vec::with_capacity(rows * columns);
        for row in row_start..row_end {
            let start = self.index(row, col_start);
            cells.extend_from_slice(&self.cells[start..start + columns]);
        }
        Ok(Self {
            cells,
            rows,
            columns,
        })
    }

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
            self.rows,
            self.columns,
        )?;
        let src = source.to_dense();
        let width = src.columns;
        for (offset, src_row) in src.rows_iter().enumerate() {
            let start = self.index(row_start + offset, col_start);
            self.cells[start..start + width].clone_from_slice(src_row);
        }
        Ok(())
    }

    /// New dense grid; the overlapping rectangle is copied row by row
    fn resized(&self, rows: usize, columns: usize) -> Result<Self> {
        checked_area(rows, columns)?;
        let mut out = Self::new(rows, columns);
        let copy_rows = self.rows.min(rows);
        let copy_cols = self.columns.min(columns);
        for row in 0..copy_rows {
            let src = self.index(row, 0);
            let dst = row * columns;
            out.cells[dst..dst + copy_cols].clone_from_slice(&self.cells[src..src + copy_cols]);
        }
        Ok(out)
    }

    fn transposed(&self) -> Self {
        Self::from_fn(self.columns, self.rows, |at| {
            self.cells[self.index(at.col, at.row)].clone()
        })
    }

    fn map<U: Clone + Default>(&self, mut f: impl FnMut(T) -> U) -> DenseGrid<U> {
        DenseGrid {
            cells: self.cells.iter().map(|value| f(value.clone())).collect(),
            rows: self.rows,
            columns: self.columns,
        }
    }

    fn merge<U, V, G>(&self, other: &G, mut f: impl FnMut(T, U) -> V) -> Result<DenseGrid<V>>
    where
        U: Clone + Default,
        V: Clone + Default,
        G: Grid<U>,
    {
        check_same_shape(self.rows, self.columns, other.rows(), other.columns())?;
        let rhs = other.to_dense();
        Ok(DenseGrid {
            cells: self
                .cells
                .iter()
                .zip(rhs.cells.iter())
                .map(|(a, b)| f(a.clone(), b.clone()))
                .collect(),
            rows: self.rows,
            columns: self.columns,
        })
    }

    fn for_each(&self, mut f: impl FnMut(RowCol, &T)) {
        for row in 0..self.rows {
            for col in 0..self.columns {
                f(RowCol::new(row, col), &self.cells[row * self.columns + col]);
            }
        }
    }

    fn to_dense(&self) -> DenseGrid<T> {
        self.clone()
    }
}

impl<T: PartialEq> PartialEq for DenseGrid<T> {
    fn eq(&self, other: &Self) -> bool {
        self.rows == other.rows && self.columns == other.columns && self.cells == other.cells
    }
}

impl<T: Eq> Eq for DenseGrid<T> {}

/// Diagnostic textual form: `{[a, b], [c, d]}`. Human inspection only, not
/// round-trippable.
impl<T: fmt::Display> fmt::Display for DenseGrid<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for row in 0..self.rows {
            if row > 0 {
                write!(f, ", ")?;
            }
            write!(f, "[")?;
            for col in 0..self.columns {
                if col > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", self.cells[row * self.columns + col])?;
            }
            write!(f, "]")?;
        }
        write!(f, "}}")
    }
}
