//! Per-cell atomic grid storage.
//!
//! [`AtomicGrid`] holds one independently updatable atomic cell per
//! coordinate. Per-cell operations are individually atomic; whole-grid bulk
//! operations iterate cell by cell without a grid-wide lock, so a bulk
//! operation may interleave with concurrent single-cell writers and leave
//! the grid, at any instant, mixing pre- and post-bulk values across
//! different cells. Intentionally weaker whole-grid consistency than
//! [`SharedGrid`](crate::SharedGrid), in exchange for true per-cell
//! atomicity that a coarse lock cannot give.

use crate::dense::DenseGrid;
use crate::error::Result;
use crate::grid::{check_bounds, checked_area, Grid};
use crate::index::RowCol;
use crossbeam_utils::atomic::AtomicCell;

/// Grid of independently atomic cells.
///
/// Element types must be `Copy` (values move through the cells by value).
/// For types where `AtomicCell` is lock-free (most primitives up to the
/// platform word size) every per-cell operation is non-blocking.
///
/// `AtomicGrid<T>` is `Sync` when `T: Send`, so it can be shared across
/// threads behind an `Arc` without any wrapper.
pub struct AtomicGrid<T> {
    cells: Vec<AtomicCell<T>>,
    rows: usize,
    columns: usize,
}

impl<T: Copy + Default> AtomicGrid<T> {
    /// Create a grid with every cell set to `T::default()`.
    ///
    /// Panics when `rows * columns` overflows `usize`.
    pub fn new(rows: usize, columns: usize) -> Self {
        let size = checked_area(rows, columns).unwrap_or_else(|err| panic!("{err}"));
        Self {
            cells: (0..size).map(|_| AtomicCell::new(T::default())).collect(),
            rows,
            columns,
        }
    }

    /// Copy a snapshot of any grid into atomic cells
    pub fn from_grid<G: Grid<T>>(source: &G) -> Self {
        let dense = source.to_dense();
        Self {
            cells: dense.as_slice().iter().map(|&v| AtomicCell::new(v)).collect(),
            rows: dense.rows(),
            columns: dense.columns(),
        }
    }

    /// Number of rows
    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns
    #[inline]
    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Total number of cells
    #[inline]
    pub fn size(&self) -> usize {
        self.rows * self.columns
    }

    #[inline]
    fn cell(&self, row: usize, col: usize) -> Result<&AtomicCell<T>> {
        check_bounds(row, col, self.rows, self.columns)?;
        Ok(&self.cells[row * self.columns + col])
    }

    /// Atomic load of the value at `(row, col)`
    #[inline]
    pub fn load(&self, row: usize, col: usize) -> Result<T> {
        Ok(self.cell(row, col)?.load())
    }

    /// Atomic store of `value` at `(row, col)`
    #[inline]
    pub fn store(&self, row: usize, col: usize, value: T) -> Result<()> {
        self.cell(row, col)?.store(value);
        Ok(())
    }

    /// Atomically replace the value at `(row, col)`, returning the previous
    /// value
    #[inline]
    pub fn swap(&self, row: usize, col: usize, value: T) -> Result<T> {
        Ok(self.cell(row, col)?.swap(value))
    }

    /// Atomic compare-and-exchange at `(row, col)`.
    ///
    /// On success returns `Ok(previous)` (== `current`); on failure returns
    /// `Err(actual)` with the value that was found instead. The outer
    /// `Result` carries the bounds check.
    pub fn compare_exchange(
        &self,
        row: usize,
        col: usize,
        current: T,
        new: T,
    ) -> Result<std::result::Result<T, T>>
    where
        T: Eq,
    {
        Ok(self.cell(row, col)?.compare_exchange(current, new))
    }

    /// Atomic read-modify-write of a single cell via a CAS loop; returns the
    /// previous value.
    ///
    /// `f` may be called multiple times under contention and must be pure.
    pub fn fetch_update(&self, row: usize, col: usize, mut f: impl FnMut(T) -> T) -> Result<T>
    where
        T: Eq,
    {
        let cell = self.cell(row, col)?;
        let previous = cell
            .fetch_update(|value| Some(f(value)))
            .unwrap_or_else(|value| value);
        Ok(previous)
    }

    /// Store `value` in every cell, one atomic store at a time (no
    /// grid-wide lock; may interleave with concurrent writers)
    pub fn fill(&self, value: T) {
        for cell in &self.cells {
            cell.store(value);
        }
    }

    /// Per-cell compare-and-exchange scan replacing `old` with `new`.
    ///
    /// Each replacement is individually atomic: a concurrent write between
    /// load and store makes that cell's swap fail and the scan moves on
    /// without clobbering the newer value.
    pub fn replace_all(&self, old: T, new: T)
    where
        T: Eq,
    {
        for cell in &self.cells {
            let _ = cell.compare_exchange(old, new);
        }
    }

    /// Apply `f` to every cell, each as an individually atomic
    /// read-modify-write
    pub fn update(&self, mut f: impl FnMut(T) -> T)
    where
        T: Eq,
    {
        for cell in &self.cells {
            let _ = cell.fetch_update(|value| Some(f(value)));
        }
    }

    /// Copy of the grid as a plain dense grid.
    ///
    /// Cells are loaded one at a time; concurrent writers can make the
    /// snapshot mix values from different instants (no whole-grid
    /// linearizability).
    pub fn snapshot(&self) -> DenseGrid<T> {
        let columns = self.columns;
        DenseGrid::from_fn(self.rows, columns, |at| {
            self.cells[at.to_linear(columns)].load()
        })
    }
}

/// Contract impl; derived grids are built from per-cell snapshots and
/// `map`/`merge` produce plain dense grids.
impl<T: Copy + Default> Grid<T> for AtomicGrid<T> {
    type Map<U: Clone + Default> = DenseGrid<U>;

    fn rows(&self) -> usize {
        self.rows
    }

    fn columns(&self) -> usize {
        self.columns
    }

    fn get(&self, row: usize, col: usize) -> Result<T> {
        self.load(row, col)
    }

    fn set(&mut self, row: usize, col: usize, value: T) -> Result<()> {
        self.store(row, col, value)
    }

    fn update_indexed(&mut self, mut f: impl FnMut(RowCol, T) -> T) {
        let columns = self.columns;
        for (i, cell) in self.cells.iter().enumerate() {
            let at = RowCol::from_linear(i, columns.max(1));
            cell.store(f(at, cell.load()));
        }
    }

    fn fill(&mut self, value: T) {
        AtomicGrid::fill(self, value);
    }

    fn sub_grid(
        &self,
        row_start: usize,
        col_start: usize,
        row_end: usize,
        col_end: usize,
    ) -> Result<Self> {
        Ok(Self::from_grid(&self.snapshot().sub_grid(
            row_start, col_start, row_end, col_end,
        )?))
    }

    fn resized(&self, rows: usize, columns: usize) -> Result<Self> {
        Ok(Self::from_grid(&self.snapshot().resized(rows, columns)?))
    }

    fn transposed(&self) -> Self {
        Self::from_grid(&self.snapshot().transposed())
    }

    fn map<U: Clone + Default>(&self, f: impl FnMut(T) -> U) -> DenseGrid<U> {
        self.snapshot().map(f)
    }

    fn merge<U, V, G>(&self, other: &G, f: impl FnMut(T, U) -> V) -> Result<DenseGrid<V>>
    where
        U: Clone + Default,
        V: Clone + Default,
        G: Grid<U>,
    {
        self.snapshot().merge(other, f)
    }

    fn for_each(&self, mut f: impl FnMut(RowCol, &T)) {
        let columns = self.columns;
        for (i, cell) in self.cells.iter().enumerate() {
            let value = cell.load();
            f(RowCol::from_linear(i, columns.max(1)), &value);
        }
    }

    fn to_dense(&self) -> DenseGrid<T> {
        self.snapshot()
    }
}

impl<T: Copy + Default + std::fmt::Debug> std::fmt::Debug for AtomicGrid<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AtomicGrid")
            .field("rows", &self.rows)
            .field("columns", &self.columns)
            .field("cells", &self.snapshot().as_slice())
            .finish()
    }
}

impl<T: Copy + Default> Clone for AtomicGrid<T> {
    fn clone(&self) -> Self {
        Self::from_grid(&self.snapshot())
    }
}

impl<T: Copy + Default + PartialEq> PartialEq for AtomicGrid<T> {
    fn eq(&self, other: &Self) -> bool {
        self.snapshot().eq_grid(&other.snapshot())
    }
}

impl<T: Copy + Default + PartialEq> PartialEq<DenseGrid<T>> for AtomicGrid<T> {
    fn eq(&self, other: &DenseGrid<T>) -> bool {
        self.snapshot().eq_grid(other)
    }
}
