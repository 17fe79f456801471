//! # Jaala: Generic 2D Grid Containers
//!
//! One logical container contract — fixed dimensions, indexed access, bulk
//! mutation, rectangular sub-region extraction/assignment, resizing,
//! transposition, type-changing transform/merge, iteration, structural
//! equality — implemented across structurally different backing strategies.
//!
//! ## Storage strategies
//!
//! - [`DenseGrid`]: fully materialized row-major backing; the baseline
//!   semantics every other variant matches
//! - [`SparseGrid`]: flat-key map of non-empty cells with independently
//!   mutable bounds, resize-time re-keying, pruning and trimming
//! - [`SharedGrid`]: dense grid behind a per-call exclusive critical
//!   section for coarse thread safety
//! - [`AtomicGrid`]: one atomic cell per coordinate; per-cell atomicity,
//!   weaker whole-grid consistency
//!
//! Callers hold any of these through the [`Grid`] trait and cannot tell
//! them apart except by performance and concurrency characteristics.
//! Every derived grid (`sub_grid`, `resized`, `transposed`, `map`, `merge`)
//! is an independently owned copy; nothing in this crate returns a view
//! that aliases another grid's storage.
//!
//! ## Quick Start
//!
//! ```rust
//! use jaala::{DenseGrid, Grid, SparseGrid};
//!
//! # fn main() -> jaala::Result<()> {
//! let mut grid = DenseGrid::new(3, 3);
//! grid.set(1, 1, 5)?;
//! assert_eq!(grid.get(1, 1)?, 5);
//!
//! // Sparse storage with the same observable behavior
//! let sparse = SparseGrid::from_grid(&grid);
//! assert_eq!(sparse, grid);
//!
//! // Derived grids are independent copies
//! let wider = grid.resized(3, 5)?;
//! assert_eq!(wider.get(1, 1)?, 5);
//! assert_eq!(wider.get(1, 4)?, 0);
//! # Ok(())
//! # }
//! ```
//!
//! ## Concurrency model
//!
//! All operations are synchronous and run to completion on the calling
//! thread; there is no async, cancellation or timeout concept. Dense and
//! sparse grids carry no internal synchronization. [`SharedGrid`] makes the
//! whole effect of one call atomic; [`AtomicGrid`] makes single-cell
//! operations lock-free and individually atomic while bulk operations may
//! interleave with concurrent writers.

pub mod atomic;
pub mod dense;
pub mod error;
pub mod grid;
pub mod index;
pub mod numeric;
pub mod shared;
pub mod sparse;

// Re-export main types at crate root
pub use atomic::AtomicGrid;
pub use dense::DenseGrid;
pub use error::{GridError, Result};
pub use grid::Grid;
pub use index::RowCol;
pub use numeric::NumericGrid;
pub use shared::SharedGrid;
pub use sparse::SparseGrid;
