//! Cross-strategy contract tests: every storage strategy must be externally
//! indistinguishable from the dense baseline, apart from performance and
//! concurrency characteristics.

use jaala::{AtomicGrid, DenseGrid, Grid, GridError, NumericGrid, SharedGrid, SparseGrid};
use rand::Rng;

/// Run the shared contract properties against one strategy's constructor.
fn exercise_contract<G, F>(make: F)
where
    G: Grid<i32>,
    F: Fn(usize, usize) -> G,
{
    // size() == rows * columns
    let grid = make(3, 4);
    assert_eq!(grid.rows(), 3);
    assert_eq!(grid.columns(), 4);
    assert_eq!(grid.size(), 12);

    // set then get round-trips at every in-bounds coordinate
    let mut grid = make(3, 3);
    for row in 0..3 {
        for col in 0..3 {
            grid.set(row, col, (row * 3 + col) as i32).unwrap();
        }
    }
    for row in 0..3 {
        for col in 0..3 {
            assert_eq!(grid.get(row, col).unwrap(), (row * 3 + col) as i32);
        }
    }

    // out-of-bounds fails, in both directions
    assert!(matches!(
        grid.get(3, 0),
        Err(GridError::OutOfBounds { row: 3, col: 0, .. })
    ));
    assert!(grid.set(0, 3, 1).is_err());

    // transpose is an involution on content
    let transposed = grid.transposed();
    assert_eq!(transposed.rows(), 3);
    assert_eq!(transposed.get(0, 2).unwrap(), 6);
    assert_eq!(transposed.transposed().to_dense(), grid.to_dense());

    // resize keeps the overlap, defaults the rest, drops the remainder
    let mut grid = make(3, 3);
    for row in 0..3 {
        for col in 0..3 {
            grid.set(row, col, (row * 3 + col + 1) as i32).unwrap();
        }
    }
    let restored = grid.resized(2, 2).unwrap().resized(3, 3).unwrap();
    assert_eq!(restored.get(0, 0).unwrap(), 1);
    assert_eq!(restored.get(0, 1).unwrap(), 2);
    assert_eq!(restored.get(1, 0).unwrap(), 4);
    assert_eq!(restored.get(1, 1).unwrap(), 5);
    assert_eq!(restored.get(0, 2).unwrap(), 0);
    assert_eq!(restored.get(1, 2).unwrap(), 0);
    for col in 0..3 {
        assert_eq!(restored.get(2, col).unwrap(), 0);
    }

    // sub_grid / set_range are inverses
    let sub = grid.sub_grid(1, 0, 3, 2).unwrap();
    assert_eq!(sub.rows(), 2);
    assert_eq!(sub.columns(), 2);
    assert_eq!(sub.get(0, 0).unwrap(), 4);
    let mut target = make(4, 4);
    target.set_range(2, 2, &sub).unwrap();
    assert_eq!(
        target.sub_grid(2, 2, 4, 4).unwrap().to_dense(),
        sub.to_dense()
    );

    // range validation happens before mutation
    let mut target = make(2, 2);
    target.fill(7);
    assert!(target.fill_range(0, 0, 3, 1, 9).is_err());
    assert_eq!(target.to_dense(), DenseGrid::filled(2, 2, 7));

    // merge requires matching shapes and mutates neither input
    let other = make(3, 4);
    assert!(matches!(
        grid.merge(&other, |a, b| a + b),
        Err(GridError::DimensionMismatch { .. })
    ));
    let same = grid.map(|v| v * 10);
    let merged = grid.merge(&same, |a, b| a + b).unwrap();
    assert_eq!(merged.get(2, 2).unwrap(), 99);
    assert_eq!(grid.get(2, 2).unwrap(), 9);

    // update / replace_all / fill
    let mut grid = make(2, 2);
    grid.fill(1);
    grid.update(|v| v + 1);
    grid.update_indexed(|at, v| v + (at.row * 10 + at.col) as i32);
    assert_eq!(grid.get(1, 1).unwrap(), 13);
    grid.replace_all(&13, -1);
    assert_eq!(grid.get(1, 1).unwrap(), -1);
    assert_eq!(grid.get(1, 0).unwrap(), 12);

    // iteration visits every cell exactly once
    let grid = make(3, 3);
    let mut cells = grid.cells();
    assert_eq!(cells.len(), 9);
    cells.sort_by_key(|(at, _)| (at.row, at.col));
    for (i, (at, _)) in cells.iter().enumerate() {
        assert_eq!((at.row, at.col), (i / 3, i % 3));
    }
}

#[test]
fn dense_satisfies_contract() {
    exercise_contract(DenseGrid::<i32>::new);
}

#[test]
fn sparse_satisfies_contract() {
    exercise_contract(SparseGrid::<i32>::new);
}

#[test]
fn shared_satisfies_contract() {
    exercise_contract(SharedGrid::<i32>::new);
}

#[test]
fn atomic_satisfies_contract() {
    exercise_contract(AtomicGrid::<i32>::new);
}

#[test]
fn all_strategies_compare_equal() {
    let mut dense = DenseGrid::new(3, 3);
    dense.set(0, 0, 1).unwrap();
    dense.set(1, 2, 2).unwrap();
    dense.set(2, 1, 3).unwrap();

    let sparse = SparseGrid::from_grid(&dense);
    let shared = SharedGrid::from_grid(&dense);
    let atomic = AtomicGrid::from_grid(&dense);

    assert_eq!(sparse, dense);
    assert_eq!(dense, sparse);
    assert_eq!(shared, dense);
    assert_eq!(atomic, dense);
    assert!(sparse.eq_grid(&shared));
    assert!(atomic.eq_grid(&sparse));

    // One differing cell breaks equality everywhere
    let mut other = dense.clone();
    other.set(1, 1, 9).unwrap();
    assert_ne!(other, sparse);
    assert!(!other.eq_grid(&atomic));

    // Shape difference breaks equality even with identical values
    let tall: DenseGrid<i32> = DenseGrid::new(9, 1);
    let flat: SparseGrid<i32> = SparseGrid::new(1, 9);
    assert!(!tall.eq_grid(&flat));
}

#[test]
fn diagnostic_form_matches_across_strategies() {
    let mut dense = DenseGrid::new(2, 3);
    dense.set(0, 0, 1).unwrap();
    dense.set(1, 2, 6).unwrap();
    let sparse = SparseGrid::from_grid(&dense);
    assert_eq!(dense.to_string(), "{[1, 0, 0], [0, 0, 6]}");
    assert_eq!(sparse.to_string(), dense.to_string());
}

#[test]
fn numeric_layer_works_across_strategies() {
    let mut sparse: SparseGrid<i32> = SparseGrid::new(2, 2);
    sparse.set(0, 0, 6).unwrap();
    sparse.set(1, 1, 8).unwrap();
    let shared = SharedGrid::from_grid(&sparse);

    let summed = shared.added(&sparse).unwrap();
    assert_eq!(summed.get(0, 0).unwrap(), 12);

    let floats: DenseGrid<f64> = sparse.cast();
    assert_eq!(floats.sum(), 14.0);

    let zeroes: DenseGrid<i32> = DenseGrid::new(2, 2);
    assert!(matches!(
        shared.divided(&zeroes),
        Err(GridError::DivisionByZero { row: 0, col: 0 })
    ));
}

/// Randomized oracle: a sparse grid driven through sets, removes and
/// in-place resizes must stay structurally equal to a dense grid driven
/// through the equivalent operations. This leans on the resize remap being
/// collision-free.
#[test]
fn sparse_tracks_dense_oracle_through_random_resizes() {
    let mut rng = rand::thread_rng();
    for _ in 0..30 {
        let mut rows = rng.gen_range(1..8usize);
        let mut cols = rng.gen_range(1..8usize);
        let mut sparse: SparseGrid<i32> = SparseGrid::new(rows, cols);
        let mut dense: DenseGrid<i32> = DenseGrid::new(rows, cols);

        for step in 0..120 {
            match rng.gen_range(0..6) {
                0..=2 => {
                    let row = rng.gen_range(0..rows);
                    let col = rng.gen_range(0..cols);
                    let value = rng.gen_range(1..100);
                    sparse.set(row, col, value).unwrap();
                    dense.set(row, col, value).unwrap();
                }
                3 => {
                    let row = rng.gen_range(0..rows);
                    let col = rng.gen_range(0..cols);
                    sparse.remove(row, col).unwrap();
                    dense.set(row, col, 0).unwrap();
                }
                4 => {
                    let new_rows = rng.gen_range(1..10usize);
                    let new_cols = rng.gen_range(1..10usize);
                    sparse.set_size(new_rows, new_cols).unwrap();
                    dense = dense.resized(new_rows, new_cols).unwrap();
                    rows = new_rows;
                    cols = new_cols;
                }
                _ => {
                    sparse.clean();
                }
            }
            assert!(
                sparse.eq_grid(&dense),
                "diverged at step {}: sparse {} vs dense {}",
                step,
                sparse,
                dense
            );
        }
    }
}
