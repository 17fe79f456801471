//! Sparse dynamic grid storage.
//!
//! Mapping-backed storage keyed by the linearized `(row, col)` index; an
//! absent key means the cell is logically empty and reads as `T::default()`.
//! Bounds are independent mutable fields, decoupled from the map's contents:
//! changing them re-keys existing entries only through
//! [`SparseGrid::set_size`], which is the failure-prone heart of this module.
//!
//! Because the flat key depends on the current column count, a column-count
//! change invalidates every stored key. `set_size` therefore remaps over a
//! snapshot: two different old keys can decode to coordinates whose *new*
//! keys collide with not-yet-processed old keys, so destructive in-place
//! re-keying corrupts data.

use crate::dense::DenseGrid;
use crate::error::Result;
use crate::grid::{check_bounds, check_range, check_same_shape, checked_area, Grid};
use crate::index::RowCol;
use log::{debug, trace};
use serde::{Deserialize, Serialize};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fmt;

/// Sparse grid backed by a flat-key map of non-empty cells.
///
/// Distinguishes an absent cell from an explicitly stored default value:
/// [`set`](Grid::set) with `T::default()` *creates* an entry, while
/// [`remove`](SparseGrid::remove) deletes one. [`clean`](SparseGrid::clean)
/// reconciles the two by dropping entries equal to the default.
///
/// Whole-grid transforms (`fill`, `update`, `map`, `merge`, `replace_all`
/// with a default `old`) evaluate every logical cell, not just present
/// entries, so sparse grids stay observably identical to dense ones; they
/// materialize entries as a side effect. Call `clean()` afterwards to
/// restore sparsity, or use [`update_present`](SparseGrid::update_present) /
/// [`map_present`](SparseGrid::map_present) to touch stored entries only.
#[derive(Clone, Debug, Default, Serialize)]
pub struct SparseGrid<T> {
    cells: HashMap<usize, T>,
    rows: usize,
    columns: usize,
}

// Deserialization validates that every entry key addresses a cell of the
// declared bounds; a derived impl would accept stray keys that later leak
// out-of-bounds coordinates through iteration.
impl<'de, T: Deserialize<'de>> Deserialize<'de> for SparseGrid<T> {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Repr<T> {
            cells: HashMap<usize, T>,
            rows: usize,
            columns: usize,
        }
        let repr = Repr::deserialize(deserializer)?;
        let area = repr.rows.checked_mul(repr.columns).ok_or_else(|| {
            serde::de::Error::custom(format!(
                "grid dimensions {}x{} overflow",
                repr.rows, repr.columns
            ))
        })?;
        if let Some(&key) = repr.cells.keys().find(|&&key| key >= area) {
            return Err(serde::de::Error::custom(format!(
                "entry key {} outside a {}x{} grid",
                key, repr.rows, repr.columns
            )));
        }
        Ok(Self {
            cells: repr.cells,
            rows: repr.rows,
            columns: repr.columns,
        })
    }
}

impl<T: Clone + Default> SparseGrid<T> {
    /// Create an empty sparse grid with the given declared bounds
    pub fn new(rows: usize, columns: usize) -> Self {
        Self {
            cells: HashMap::new(),
            rows,
            columns,
        }
    }

    /// Copy any grid into sparse form, storing only non-default cells
    pub fn from_grid<G: Grid<T>>(source: &G) -> Self
    where
        T: PartialEq,
    {
        let empty = T::default();
        let columns = source.columns();
        let mut cells = HashMap::new();
        source.for_each(|at, value| {
            if *value != empty {
                cells.insert(at.to_linear(columns), value.clone());
            }
        });
        Self {
            cells,
            rows: source.rows(),
            columns,
        }
    }

    /// Number of backing entries (not the logical cell count)
    #[inline]
    pub fn entry_count(&self) -> usize {
        self.cells.len()
    }

    /// True when no entries are stored (every cell reads as default)
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Iterate over present entries with their coordinates.
    ///
    /// Absent cells are skipped; map order, no ordering guarantee.
    pub fn entries(&self) -> impl Iterator<Item = (RowCol, &T)> + '_ {
        let columns = self.columns;
        self.cells
            .iter()
            .map(move |(&key, value)| (RowCol::from_linear(key, columns), value))
    }

    /// Mutate declared bounds in place, re-keying every entry.
    ///
    /// One atomic sequence:
    /// 1. remap every entry over a snapshot of the map, decoding keys with
    ///    the old column count and re-encoding with the new one;
    /// 2. classify: expansive iff both new dimensions are >= the old ones;
    /// 3. prune uncontainable entries (`r >= new_rows || c >= new_columns`)
    ///    unless the resize is expansive;
    /// 4. commit the new bounds last.
    ///
    /// Fails with [`DimensionOverflow`](crate::GridError::DimensionOverflow)
    /// before any mutation when
    /// `new_rows * new_columns` does not fit in `usize`; the grid is
    /// unchanged on failure.
    pub fn set_size(&mut self, new_rows: usize, new_columns: usize) -> Result<()> {
        checked_area(new_rows, new_columns)?;
        let expansive = new_rows >= self.rows && new_columns >= self.columns;
        let old_columns = self.columns;

        // Drain into a fresh map rather than re-keying in place: an entry's
        // new key can equal a not-yet-processed entry's old key.
        let mut remapped = HashMap::with_capacity(self.cells.len());
        let mut pruned = 0usize;
        for (key, value) in self.cells.drain() {
            let at = RowCol::from_linear(key, old_columns);
            if !expansive && !at.in_bounds(new_rows, new_columns) {
                pruned += 1;
                continue;
            }
            remapped.insert(at.to_linear(new_columns), value);
        }
        let kept = remapped.len();
        self.cells = remapped;

        // Bounds commit only after remap and prune; reads before this point
        // see the old dimensions.
        let (old_rows, old_cols) = (self.rows, old_columns);
        self.rows = new_rows;
        self.columns = new_columns;
        debug!(
            "sparse set_size {}x{} -> {}x{}: {} kept, {} pruned",
            old_rows, old_cols, new_rows, new_columns, kept, pruned
        );
        Ok(())
    }

    /// Delete the entry at `(row, col)` if present; returns whether one
    /// existed.
    ///
    /// Distinct from `set(row, col, T::default())`, which creates an entry.
    pub fn remove(&mut self, row: usize, col: usize) -> Result<bool> {
        check_bounds(row, col, self.rows, self.columns)?;
        let key = RowCol::new(row, col).to_linear(self.columns);
        Ok(self.cells.remove(&key).is_some())
    }

    /// Drop entries whose value equals `T::default()`; bounds unchanged.
    ///
    /// After `clean`, reading any dropped cell still yields the default, so
    /// the grid's logical content is unchanged.
    pub fn clean(&mut self)
    where
        T: PartialEq,
    {
        let empty = T::default();
        let before = self.cells.len();
        self.cells.retain(|_, value| *value != empty);
        trace!("sparse clean: {} -> {} entries", before, self.cells.len());
    }

    /// Shrink bounds to the minimal rectangle containing all present
    /// entries, anchored at the origin: `(max_row + 1) x (max_col + 1)`,
    /// or 0x0 when no entries are stored.
    ///
    /// Anchoring at the origin keeps every entry's coordinates stable; a
    /// tightest bounding box re-anchored at a non-zero minimum would
    /// translate cells, which no other operation does. Routes through
    /// [`set_size`](Self::set_size) so keys stay consistent with the new
    /// column count.
    pub fn trim(&mut self) -> Result<()> {
        if self.cells.is_empty() {
            return self.set_size(0, 0);
        }
        let mut max_row = 0usize;
        let mut max_col = 0usize;
        for &key in self.cells.keys() {
            let at = RowCol::from_linear(key, self.columns);
            max_row = max_row.max(at.row);
            max_col = max_col.max(at.col);
        }
        trace!(
            "sparse trim {}x{} -> {}x{}",
            self.rows,
            self.columns,
            max_row + 1,
            max_col + 1
        );
        self.set_size(max_row + 1, max_col + 1)
    }

    /// [`clean`](Self::clean) then [`trim`](Self::trim)
    pub fn clean_and_trim(&mut self) -> Result<()>
    where
        T: PartialEq,
    {
        self.clean();
        self.trim()
    }

    /// Remove all entries without changing declared bounds (pure storage
    /// reclaim; every cell reads as default afterwards)
    pub fn clear(&mut self) {
        self.cells.clear();
    }

    /// Apply `f` to present entries only, preserving sparsity.
    ///
    /// Absent cells stay absent even when `f(T::default())` would be
    /// non-default; use [`update`](Grid::update) for dense-equivalent
    /// semantics.
    pub fn update_present(&mut self, mut f: impl FnMut(RowCol, T) -> T) {
        let columns = self.columns;
        for (&key, value) in self.cells.iter_mut() {
            let at = RowCol::from_linear(key, columns);
            let old = std::mem::take(value);
            *value = f(at, old);
        }
    }

    /// Type-changing transform of present entries only, preserving sparsity
    pub fn map_present<U: Clone + Default>(&self, mut f: impl FnMut(T) -> U) -> SparseGrid<U> {
        SparseGrid {
            cells: self
                .cells
                .iter()
                .map(|(&key, value)| (key, f(value.clone())))
                .collect(),
            rows: self.rows,
            columns: self.columns,
        }
    }
}

impl<T: Clone + Default> Grid<T> for SparseGrid<T> {
    type Map<U: Clone + Default> = SparseGrid<U>;

    #[inline]
    fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    fn columns(&self) -> usize {
        self.columns
    }

    fn get(&self, row: usize, col: usize) -> Result<T> {
        check_bounds(row, col, self.rows, self.columns)?;
        let key = RowCol::new(row, col).to_linear(self.columns);
        Ok(self.cells.get(&key).cloned().unwrap_or_default())
    }

    fn get_or(&self, row: usize, col: usize, fallback: T) -> Result<T> {
        check_bounds(row, col, self.rows, self.columns)?;
        let key = RowCol::new(row, col).to_linear(self.columns);
        Ok(self.cells.get(&key).cloned().unwrap_or(fallback))
    }

    /// Stores an entry even when `value` is the default; see
    /// [`remove`](SparseGrid::remove) for the distinction.
    fn set(&mut self, row: usize, col: usize, value: T) -> Result<()> {
        check_bounds(row, col, self.rows, self.columns)?;
        let key = RowCol::new(row, col).to_linear(self.columns);
        self.cells.insert(key, value);
        Ok(())
    }

    fn update_indexed(&mut self, mut f: impl FnMut(RowCol, T) -> T) {
        for row in 0..self.rows {
            for col in 0..self.columns {
                let at = RowCol::new(row, col);
                let key = at.to_linear(self.columns);
                let old = self.cells.remove(&key).unwrap_or_default();
                self.cells.insert(key, f(at, old));
            }
        }
    }

    fn fill(&mut self, value: T) {
        for row in 0..self.rows {
            for col in 0..self.columns {
                let key = RowCol::new(row, col).to_linear(self.columns);
                self.cells.insert(key, value.clone());
            }
        }
    }

    fn replace_all(&mut self, old: &T, new: T)
    where
        T: PartialEq,
    {
        if *old == T::default() {
            // Absent cells logically hold the default and must be replaced too
            for row in 0..self.rows {
                for col in 0..self.columns {
                    let key = RowCol::new(row, col).to_linear(self.columns);
                    match self.cells.entry(key) {
                        Entry::Occupied(mut entry) => {
                            if *entry.get() == *old {
                                entry.insert(new.clone());
                            }
                        }
                        Entry::Vacant(entry) => {
                            entry.insert(new.clone());
                        }
                    }
                }
            }
        } else {
            for value in self.cells.values_mut() {
                if *value == *old {
                    *value = new.clone();
                }
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
        let mut cells = HashMap::new();
        for (&key, value) in &self.cells {
            let at = RowCol::from_linear(key, self.columns);
            if at.row >= row_start && at.row < row_end && at.col >= col_start && at.col < col_end {
                let local = RowCol::new(at.row - row_start, at.col - col_start);
                cells.insert(local.to_linear(columns), value.clone());
            }
        }
        Ok(Self {
            cells,
            rows,
            columns,
        })
    }

    /// New grid: copy of `self` put through [`set_size`](SparseGrid::set_size)
    fn resized(&self, rows: usize, columns: usize) -> Result<Self> {
        let mut out = self.clone();
        out.set_size(rows, columns)?;
        Ok(out)
    }

    fn transposed(&self) -> Self {
        let mut cells = HashMap::with_capacity(self.cells.len());
        for (&key, value) in &self.cells {
            let at = RowCol::from_linear(key, self.columns);
            let flipped = RowCol::new(at.col, at.row);
            cells.insert(flipped.to_linear(self.rows), value.clone());
        }
        Self {
            cells,
            rows: self.columns,
            columns: self.rows,
        }
    }

    /// Evaluates every logical cell (absent cells as `T::default()`) so the
    /// result matches a dense grid's `map`; materializes entries
    fn map<U: Clone + Default>(&self, mut f: impl FnMut(T) -> U) -> SparseGrid<U> {
        let mut cells = HashMap::with_capacity(self.rows * self.columns);
        for row in 0..self.rows {
            for col in 0..self.columns {
                let key = RowCol::new(row, col).to_linear(self.columns);
                let value = self.cells.get(&key).cloned().unwrap_or_default();
                cells.insert(key, f(value));
            }
        }
        SparseGrid {
            cells,
            rows: self.rows,
            columns: self.columns,
        }
    }

    fn merge<U, V, G>(&self, other: &G, mut f: impl FnMut(T, U) -> V) -> Result<SparseGrid<V>>
    where
        U: Clone + Default,
        V: Clone + Default,
        G: Grid<U>,
    {
        check_same_shape(self.rows, self.columns, other.rows(), other.columns())?;
        let rhs = other.to_dense();
        let mut cells = HashMap::with_capacity(self.rows * self.columns);
        for row in 0..self.rows {
            for col in 0..self.columns {
                let key = RowCol::new(row, col).to_linear(self.columns);
                let a = self.cells.get(&key).cloned().unwrap_or_default();
                let b = rhs.as_slice()[key].clone();
                cells.insert(key, f(a, b));
            }
        }
        Ok(SparseGrid {
            cells,
            rows: self.rows,
            columns: self.columns,
        })
    }

    fn for_each(&self, mut f: impl FnMut(RowCol, &T)) {
        let empty = T::default();
        for row in 0..self.rows {
            for col in 0..self.columns {
                let at = RowCol::new(row, col);
                let key = at.to_linear(self.columns);
                f(at, self.cells.get(&key).unwrap_or(&empty));
            }
        }
    }

    fn to_dense(&self) -> DenseGrid<T> {
        let mut out = DenseGrid::new(self.rows, self.columns);
        for (&key, value) in &self.cells {
            out.as_mut_slice()[key] = value.clone();
        }
        out
    }
}

// Structural equality: an explicitly stored default and an absent cell read
// the same, so entry sets are not compared directly.
impl<T: Clone + Default + PartialEq> PartialEq for SparseGrid<T> {
    fn eq(&self, other: &Self) -> bool {
        self.eq_grid(other)
    }
}

impl<T: Clone + Default + PartialEq> PartialEq<DenseGrid<T>> for SparseGrid<T> {
    fn eq(&self, other: &DenseGrid<T>) -> bool {
        self.eq_grid(other)
    }
}

impl<T: Clone + Default + PartialEq> PartialEq<SparseGrid<T>> for DenseGrid<T> {
    fn eq(&self, other: &SparseGrid<T>) -> bool {
        self.eq_grid(other)
    }
}

/// Diagnostic textual form, identical layout to the dense one: absent cells
/// render as the default value.
impl<T: Clone + Default + fmt::Display> fmt::Display for SparseGrid<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let empty = T::default();
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
                let key = RowCol::new(row, col).to_linear(self.columns);
                write!(f, "{}", self.cells.get(&key).unwrap_or(&empty))?;
            }
            write!(f, "]")?;
        }
        write!(f, "}}")
    }
}
