//! Numeric convenience layer over the grid contract.
//!
//! Generics monomorphize over the element type, so there is no need for a
//! per-primitive grid family: one extension trait gives every storage
//! strategy per-element widening/narrowing conversion between numeric
//! grids, element-wise arithmetic with shape checking, a checked division
//! that rejects zero divisors before any element is computed, scalar
//! broadcasts and whole-grid reductions.
//!
//! [`Grid::to_dense`] is the general materialized form shared by all
//! element types, and structural equality is storage-independent, so no
//! per-type equality rule is needed.

use crate::dense::DenseGrid;
use crate::error::{GridError, Result};
use crate::grid::{check_same_shape, Grid};
use crate::index::RowCol;
use num_traits::{AsPrimitive, Num};

/// Numeric operations available on any grid of `Copy` numeric elements.
///
/// Blanket-implemented for every [`Grid`] implementation; arithmetic results
/// come out in the grid's own `map` family (sparse stays sparse, the
/// concurrent strategies produce dense snapshots).
pub trait NumericGrid<T>: Grid<T>
where
    T: Copy + Default + 'static,
{
    /// Per-element numeric conversion to another element type.
    ///
    /// Uses the `as` cast semantics of [`AsPrimitive`]: widening is exact,
    /// narrowing truncates/saturates the way `as` does.
    fn cast<U>(&self) -> DenseGrid<U>
    where
        T: AsPrimitive<U>,
        U: Copy + Default + 'static,
    {
        self.to_dense().map(|value| value.as_())
    }

    /// Element-wise sum with shape checking
    fn added<G: Grid<T>>(&self, other: &G) -> Result<Self::Map<T>>
    where
        T: Num,
    {
        self.merge(other, |a, b| a + b)
    }

    /// Element-wise difference with shape checking
    fn subtracted<G: Grid<T>>(&self, other: &G) -> Result<Self::Map<T>>
    where
        T: Num,
    {
        self.merge(other, |a, b| a - b)
    }

    /// Element-wise product with shape checking
    fn multiplied<G: Grid<T>>(&self, other: &G) -> Result<Self::Map<T>>
    where
        T: Num,
    {
        self.merge(other, |a, b| a * b)
    }

    /// Element-wise quotient, rejecting zero divisors.
    ///
    /// The divisor grid is scanned before any element is divided; a zero
    /// anywhere fails with [`GridError::DivisionByZero`] carrying the first
    /// offending coordinate, and no partial result is produced. The zero
    /// check applies to floats as well: this operation is for callers who
    /// want division to be a checked precondition, not an infinity.
    fn divided<G: Grid<T>>(&self, other: &G) -> Result<Self::Map<T>>
    where
        T: Num,
    {
        check_same_shape(self.rows(), self.columns(), other.rows(), other.columns())?;
        let mut zero_at: Option<RowCol> = None;
        other.for_each(|at, value| {
            if zero_at.is_none() && *value == T::zero() {
                zero_at = Some(at);
            }
        });
        if let Some(at) = zero_at {
            return Err(GridError::DivisionByZero {
                row: at.row,
                col: at.col,
            });
        }
        self.merge(other, |a, b| a / b)
    }

    /// Every element multiplied by `factor`
    fn scaled(&self, factor: T) -> Self::Map<T>
    where
        T: Num,
    {
        self.map(move |value| value * factor)
    }

    /// Every element shifted by `delta`
    fn offset(&self, delta: T) -> Self::Map<T>
    where
        T: Num,
    {
        self.map(move |value| value + delta)
    }

    /// Sum of all elements (zero for an empty grid)
    fn sum(&self) -> T
    where
        T: Num,
    {
        let mut total = T::zero();
        self.for_each(|_, value| total = total + *value);
        total
    }

    /// Smallest element, or `None` for a zero-sized grid.
    ///
    /// Elements that compare unordered (a float `NaN`) are skipped: the
    /// result is the smallest ordered element, or `None` when no element
    /// is ordered.
    fn min_value(&self) -> Option<T>
    where
        T: PartialOrd,
    {
        let mut best: Option<T> = None;
        self.for_each(|_, value| {
            // An element not equal to itself (float NaN) is unordered and
            // must never seed or replace the running best.
            if *value != *value {
                return;
            }
            match best {
                Some(current) if current <= *value => {}
                _ => best = Some(*value),
            }
        });
        best
    }

    /// Largest element, or `None` for a zero-sized grid.
    ///
    /// Unordered elements are skipped, as in [`min_value`](Self::min_value).
    fn max_value(&self) -> Option<T>
    where
        T: PartialOrd,
    {
        let mut best: Option<T> = None;
        self.for_each(|_, value| {
            if *value != *value {
                return;
            }
            match best {
                Some(current) if current >= *value => {}
                _ => best = Some(*value),
            }
        });
        best
    }
}

impl<T, G> NumericGrid<T> for G
where
    T: Copy + Default + 'static,
    G: Grid<T>,
{
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sparse::SparseGrid;
    use approx::assert_relative_eq;

    fn grid_2x2(values: [i32; 4]) -> DenseGrid<i32> {
        DenseGrid::from_rows(vec![
            vec![values[0], values[1]],
            vec![values[2], values[3]],
        ])
        .unwrap()
    }

    #[test]
    fn test_cast_widening_and_narrowing() {
        let ints = grid_2x2([1, 2, 3, 4]);
        let floats: DenseGrid<f64> = ints.cast();
        assert_relative_eq!(floats.get(1, 1).unwrap(), 4.0);

        let halves = DenseGrid::from_rows(vec![vec![1.9f64, 2.5], vec![-1.2, 0.0]]).unwrap();
        let truncated: DenseGrid<i32> = halves.cast();
        assert_eq!(truncated, grid_2x2([1, 2, -1, 0]));
    }

    #[test]
    fn test_cast_from_sparse() {
        let mut sparse: SparseGrid<u8> = SparseGrid::new(2, 2);
        sparse.set(0, 1, 200).unwrap();
        let wide: DenseGrid<u32> = sparse.cast();
        assert_eq!(wide.get(0, 1).unwrap(), 200);
        assert_eq!(wide.get(0, 0).unwrap(), 0);
    }

    #[test]
    fn test_arithmetic() {
        let a = grid_2x2([1, 2, 3, 4]);
        let b = grid_2x2([10, 20, 30, 40]);
        assert_eq!(a.added(&b).unwrap(), grid_2x2([11, 22, 33, 44]));
        assert_eq!(b.subtracted(&a).unwrap(), grid_2x2([9, 18, 27, 36]));
        assert_eq!(a.multiplied(&a).unwrap(), grid_2x2([1, 4, 9, 16]));
        assert_eq!(b.divided(&a).unwrap(), grid_2x2([10, 10, 10, 10]));
    }

    #[test]
    fn test_arithmetic_shape_mismatch() {
        let a = grid_2x2([1, 2, 3, 4]);
        let b: DenseGrid<i32> = DenseGrid::new(2, 3);
        assert!(matches!(
            a.added(&b),
            Err(GridError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_divided_rejects_zero_before_computing() {
        let a = grid_2x2([4, 8, 12, 16]);
        let b = grid_2x2([2, 0, 4, 0]);
        let err = a.divided(&b).unwrap_err();
        // Dense scans row-major; the first zero is at (0, 1)
        assert_eq!(err, GridError::DivisionByZero { row: 0, col: 1 });
    }

    #[test]
    fn test_divided_float_zero_is_also_rejected() {
        let a = DenseGrid::filled(1, 2, 1.0f32);
        let b = DenseGrid::from_rows(vec![vec![2.0f32, 0.0]]).unwrap();
        assert!(matches!(
            a.divided(&b),
            Err(GridError::DivisionByZero { row: 0, col: 1 })
        ));
    }

    #[test]
    fn test_scalar_broadcasts() {
        let a = grid_2x2([1, 2, 3, 4]);
        assert_eq!(a.scaled(3), grid_2x2([3, 6, 9, 12]));
        assert_eq!(a.offset(-1), grid_2x2([0, 1, 2, 3]));
    }

    #[test]
    fn test_sparse_arithmetic_stays_in_family() {
        let mut a: SparseGrid<i64> = SparseGrid::new(2, 2);
        a.set(0, 0, 5).unwrap();
        let b = SparseGrid::from_grid(&grid_2x2([1, 1, 1, 1]).cast::<i64>());
        let sum: SparseGrid<i64> = a.added(&b).unwrap();
        assert_eq!(sum.get(0, 0).unwrap(), 6);
        assert_eq!(sum.get(1, 1).unwrap(), 1);
    }

    #[test]
    fn test_reductions() {
        let a = grid_2x2([4, -2, 9, 1]);
        assert_eq!(a.sum(), 12);
        assert_eq!(a.min_value(), Some(-2));
        assert_eq!(a.max_value(), Some(9));

        let empty: DenseGrid<i32> = DenseGrid::new(0, 0);
        assert_eq!(empty.sum(), 0);
        assert_eq!(empty.min_value(), None);
        assert_eq!(empty.max_value(), None);

        let floats = DenseGrid::from_rows(vec![vec![1.5f64, 2.5]]).unwrap();
        assert_relative_eq!(floats.sum(), 4.0);
    }

    #[test]
    fn test_reductions_skip_nan() {
        let grid = DenseGrid::from_rows(vec![vec![1.0f64, f64::NAN]]).unwrap();
        assert_eq!(grid.min_value(), Some(1.0));
        assert_eq!(grid.max_value(), Some(1.0));

        // A NaN in the middle must not reset the running best
        let grid = DenseGrid::from_rows(vec![vec![1.0f64, f64::NAN, 5.0]]).unwrap();
        assert_eq!(grid.min_value(), Some(1.0));
        assert_eq!(grid.max_value(), Some(5.0));

        let all_nan = DenseGrid::filled(1, 2, f64::NAN);
        assert_eq!(all_nan.min_value(), None);
        assert_eq!(all_nan.max_value(), None);
    }
}
