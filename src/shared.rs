//! Thread-safe grid wrapper.
//!
//! [`SharedGrid`] puts a dense grid behind a per-instance mutex: the whole
//! effect of one call is atomic relative to other calls on the same
//! instance. No cross-call atomicity is provided; a read followed by a
//! dependent write as two calls can race with another thread's call in
//! between (use [`AtomicGrid`](crate::AtomicGrid) for per-cell
//! read-modify-write).

use crate::dense::DenseGrid;
use crate::error::Result;
use crate::grid::Grid;
use crate::index::RowCol;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Dense grid behind a per-call exclusive critical section.
///
/// All primary operations take `&self`, so an `Arc<SharedGrid<T>>` can be
/// shared across threads (`SharedGrid<T>` is `Send + Sync` when `T: Send`).
/// Iteration-shaped operations ([`snapshot`](Self::snapshot),
/// [`cells`](Self::cells)) hold the lock only long enough to copy; the
/// returned data never observes later mutation.
///
/// A poisoned lock is recovered with [`PoisonError::into_inner`]: every
/// operation leaves the inner grid structurally valid, so a panicked caller
/// must not permanently disable the container.
#[derive(Debug, Default)]
pub struct SharedGrid<T> {
    inner: Mutex<DenseGrid<T>>,
}

impl<T: Clone + Default> SharedGrid<T> {
    /// Create a grid with every cell set to `T::default()`.
    ///
    /// Panics when `rows * columns` overflows `usize`.
    pub fn new(rows: usize, columns: usize) -> Self {
        Self {
            inner: Mutex::new(DenseGrid::new(rows, columns)),
        }
    }

    /// Wrap a snapshot of any grid
    pub fn from_grid<G: Grid<T>>(source: &G) -> Self {
        Self {
            inner: Mutex::new(source.to_dense()),
        }
    }

    #[inline]
    fn lock(&self) -> MutexGuard<'_, DenseGrid<T>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Number of rows
    pub fn rows(&self) -> usize {
        self.lock().rows()
    }

    /// Number of columns
    pub fn columns(&self) -> usize {
        self.lock().columns()
    }

    /// Total number of cells
    pub fn size(&self) -> usize {
        self.lock().size()
    }

    /// Value at `(row, col)`
    pub fn get(&self, row: usize, col: usize) -> Result<T> {
        self.lock().get(row, col)
    }

    /// Store `value` at `(row, col)`
    pub fn set(&self, row: usize, col: usize, value: T) -> Result<()> {
        self.lock().set(row, col, value)
    }

    /// Assign `value` to every cell in one critical section
    pub fn fill(&self, value: T) {
        self.lock().fill(value);
    }

    /// Assign `value` to a rectangle in one critical section
    pub fn fill_range(
        &self,
        row_start: usize,
        col_start: usize,
        row_end: usize,
        col_end: usize,
        value: T,
    ) -> Result<()> {
        self.lock()
            .fill_range(row_start, col_start, row_end, col_end, value)
    }

    /// Apply `f` to every cell in one critical section
    pub fn update(&self, f: impl FnMut(T) -> T) {
        self.lock().update(f);
    }

    /// Apply `f` with coordinates to every cell in one critical section
    pub fn update_indexed(&self, f: impl FnMut(RowCol, T) -> T) {
        self.lock().update_indexed(f);
    }

    /// Replace every cell equal to `old` with `new` in one critical section
    pub fn replace_all(&self, old: &T, new: T)
    where
        T: PartialEq,
    {
        self.lock().replace_all(old, new);
    }

    /// Copy of the rectangle as an independent dense grid
    pub fn sub_grid(
        &self,
        row_start: usize,
        col_start: usize,
        row_end: usize,
        col_end: usize,
    ) -> Result<DenseGrid<T>> {
        self.lock().sub_grid(row_start, col_start, row_end, col_end)
    }

    /// Assign all of `source` into the rectangle anchored at
    /// `(row_start, col_start)`, atomically with respect to other calls
    pub fn set_range<G: Grid<T>>(&self, row_start: usize, col_start: usize, source: &G) -> Result<()> {
        self.lock().set_range(row_start, col_start, source)
    }

    /// Defensive copy of the whole grid, captured in one critical section
    pub fn snapshot(&self) -> DenseGrid<T> {
        self.lock().clone()
    }

    /// Snapshot of every cell with its coordinate (snapshot-at-call; the
    /// result never observes later mutation)
    pub fn cells(&self) -> Vec<(RowCol, T)> {
        self.lock().cells()
    }
}

impl<T: Clone + Default> Clone for SharedGrid<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Mutex::new(self.snapshot()),
        }
    }
}

impl<T: Clone + Default> From<DenseGrid<T>> for SharedGrid<T> {
    fn from(grid: DenseGrid<T>) -> Self {
        Self {
            inner: Mutex::new(grid),
        }
    }
}

/// Contract impl: each call is one critical section. Derived grids are
/// snapshots; `map`/`merge` produce plain dense grids.
impl<T: Clone + Default> Grid<T> for SharedGrid<T> {
    type Map<U: Clone + Default> = DenseGrid<U>;

    fn rows(&self) -> usize {
        SharedGrid::rows(self)
    }

    fn columns(&self) -> usize {
        SharedGrid::columns(self)
    }

    fn get(&self, row: usize, col: usize) -> Result<T> {
        SharedGrid::get(self, row, col)
    }

    fn set(&mut self, row: usize, col: usize, value: T) -> Result<()> {
        SharedGrid::set(self, row, col, value)
    }

    fn update_indexed(&mut self, f: impl FnMut(RowCol, T) -> T) {
        SharedGrid::update_indexed(self, f);
    }

    fn fill(&mut self, value: T) {
        SharedGrid::fill(self, value);
    }

    fn fill_range(
        &mut self,
        row_start: usize,
        col_start: usize,
        row_end: usize,
        col_end: usize,
        value: T,
    ) -> Result<()> {
        SharedGrid::fill_range(self, row_start, col_start, row_end, col_end, value)
    }

    fn replace_all(&mut self, old: &T, new: T)
    where
        T: PartialEq,
    {
        SharedGrid::replace_all(self, old, new);
    }

    fn sub_grid(
        &self,
        row_start: usize,
        col_start: usize,
        row_end: usize,
        col_end: usize,
    ) -> Result<Self> {
        Ok(Self::from(SharedGrid::sub_grid(
            self, row_start, col_start, row_end, col_end,
        )?))
    }

    fn set_range<G: Grid<T>>(&mut self, row_start: usize, col_start: usize, source: &G) -> Result<()> {
        SharedGrid::set_range(self, row_start, col_start, source)
    }

    fn resized(&self, rows: usize, columns: usize) -> Result<Self> {
        Ok(Self::from(self.snapshot().resized(rows, columns)?))
    }

    fn transposed(&self) -> Self {
        Self::from(self.snapshot().transposed())
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

    /// Iterates over a snapshot captured at the call; `f` runs outside the
    /// critical section and may touch the grid without deadlocking
    fn for_each(&self, mut f: impl FnMut(RowCol, &T)) {
        for (at, value) in self.snapshot().iter() {
            f(at, value);
        }
    }

    fn cells(&self) -> Vec<(RowCol, T)> {
        SharedGrid::cells(self)
    }

    fn to_dense(&self) -> DenseGrid<T> {
        self.snapshot()
    }
}

impl<T: Clone + Default + PartialEq> PartialEq for SharedGrid<T> {
    fn eq(&self, other: &Self) -> bool {
        self.snapshot().eq_grid(&other.snapshot())
    }
}

impl<T: Clone + Default + PartialEq> PartialEq<DenseGrid<T>> for SharedGrid<T> {
    fn eq(&self, other: &DenseGrid<T>) -> bool {
        self.snapshot().eq_grid(other)
    }
}
