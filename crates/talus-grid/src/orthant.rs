//! Folded storage for isotropic automata: one cell per symmetry orbit.
//!
//! The stored region is the canonical orthant `max >= p0 >= p1 >= ... >= 0`
//! laid out as a flat simplex array, the n-dimensional generalization of the
//! triangular `grid[x][y]` with `x >= y` allocation.

use crate::bounds::AxisBounds;
use crate::error::GridError;
use crate::position::Position;
use std::ops::AddAssign;

/// Grid over the canonical orthant, indexed by canonical positions only.
///
/// Out-of-bounds reads return the background (default) value; out-of-bounds
/// writes are contract violations and panic. Growth allocates a region one
/// layer larger and re-indexes every existing cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrthantGrid<T> {
    dimension: usize,
    max_coord: i64,
    cells: Vec<T>,
}

impl<T: Clone + Default + AddAssign<T>> OrthantGrid<T> {
    /// Creates a grid covering canonical positions with coordinates up to
    /// `max_coord`, filled with the background value.
    pub fn new(dimension: usize, max_coord: i64) -> Result<Self, GridError> {
        if dimension == 0 {
            return Err(GridError::ZeroDimension);
        }
        let cells = simplex_cells(max_coord, dimension)?;
        Ok(Self {
            dimension,
            max_coord,
            cells: vec![T::default(); cells],
        })
    }

    /// Reconstructs a grid from a flat value array in iteration order.
    pub fn from_flat(dimension: usize, max_coord: i64, values: Vec<T>) -> Result<Self, GridError> {
        if dimension == 0 {
            return Err(GridError::ZeroDimension);
        }
        let expected = simplex_cells(max_coord, dimension)?;
        if values.len() != expected {
            return Err(GridError::LengthMismatch {
                expected,
                got: values.len(),
            });
        }
        Ok(Self {
            dimension,
            max_coord,
            cells: values,
        })
    }

    /// Number of axes.
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Largest allocated coordinate on every axis.
    pub fn max_coord(&self) -> i64 {
        self.max_coord
    }

    /// Number of stored cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// True if the grid stores no cells.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Flat index of a canonical position, `None` outside the allocation.
    pub fn index_of(&self, position: &Position) -> Option<usize> {
        debug_assert_eq!(position.dimension(), self.dimension);
        debug_assert!(position.is_canonical());
        if position.coord(0) > self.max_coord {
            return None;
        }
        let n = self.dimension;
        let mut index = 0u128;
        for (i, &c) in position.coords().iter().enumerate() {
            index += binomial(c as u128 + (n - 1 - i) as u128, (n - i) as u128);
        }
        Some(index as usize)
    }

    /// Value at a canonical position, background outside the allocation.
    pub fn get(&self, position: &Position) -> T {
        match self.index_of(position) {
            Some(index) => self.cells[index].clone(),
            None => T::default(),
        }
    }

    /// Overwrites an in-bounds cell.
    ///
    /// # Panics
    /// Panics if the position is outside the allocation; callers must grow
    /// the grid before writing near the boundary.
    pub fn set(&mut self, position: &Position, value: T) {
        let index = self.checked_index(position);
        self.cells[index] = value;
    }

    /// Adds a delta to an in-bounds cell.
    ///
    /// # Panics
    /// Panics if the position is outside the allocation.
    pub fn add(&mut self, position: &Position, delta: T) {
        let index = self.checked_index(position);
        self.cells[index] += delta;
    }

    fn checked_index(&self, position: &Position) -> usize {
        match self.index_of(position) {
            Some(index) => index,
            None => panic!(
                "write to {:?} outside allocated orthant (max coordinate {})",
                position.coords(),
                self.max_coord
            ),
        }
    }

    /// Allocates a grid one layer larger and copies every cell into its
    /// re-indexed slot.
    pub fn grow(&self) -> Result<Self, GridError> {
        let mut next = Self::new(self.dimension, self.max_coord + 1)?;
        for (index, position) in self.positions().enumerate() {
            let target = next
                .index_of(&position)
                .expect("grown region covers the old region");
            next.cells[target] = self.cells[index].clone();
        }
        Ok(next)
    }

    /// Iterates canonical positions in flat index order.
    pub fn positions(&self) -> OrthantIter {
        OrthantIter {
            max_coord: self.max_coord,
            next: Some(vec![0; self.dimension]),
        }
    }

    /// The stored values in iteration order.
    pub fn flat(&self) -> &[T] {
        &self.cells
    }

    /// Bounds of `axis` within the canonical orthant, given the already-fixed
    /// coordinates of other axes as `(axis, coordinate)` pairs.
    ///
    /// The orthant constraint is `max_coord >= p0 >= p1 >= ... >= 0`, so an
    /// axis is bounded above by fixed lower-index axes and below by fixed
    /// higher-index axes.
    pub fn bound(&self, axis: usize, fixed: &[(usize, i64)]) -> AxisBounds {
        assert!(axis < self.dimension, "axis {axis} out of range");
        let mut min = 0;
        let mut max = self.max_coord;
        for &(other, coord) in fixed {
            if other < axis {
                max = max.min(coord);
            } else if other > axis {
                min = min.max(coord);
            }
        }
        AxisBounds::new(min, max)
    }
}

/// Iterator over canonical positions in flat index order.
#[derive(Debug, Clone)]
pub struct OrthantIter {
    max_coord: i64,
    next: Option<Vec<i64>>,
}

impl Iterator for OrthantIter {
    type Item = Position;

    fn next(&mut self) -> Option<Position> {
        let current = self.next.take()?;
        let mut successor = current.clone();
        let n = successor.len();
        let mut advanced = false;
        for i in (0..n).rev() {
            let limit = if i == 0 {
                self.max_coord
            } else {
                successor[i - 1]
            };
            if successor[i] < limit {
                successor[i] += 1;
                for coord in successor.iter_mut().skip(i + 1) {
                    *coord = 0;
                }
                advanced = true;
                break;
            }
        }
        if advanced {
            self.next = Some(successor);
        }
        Some(Position::new(current))
    }
}

/// Number of canonical positions with coordinates up to `max_coord`:
/// the multiset coefficient C(max_coord + n, n).
fn simplex_cells(max_coord: i64, dimension: usize) -> Result<usize, GridError> {
    assert!(max_coord >= 0, "max_coord must be non-negative");
    let cells = binomial(max_coord as u128 + dimension as u128, dimension as u128);
    if cells > isize::MAX as u128 {
        return Err(GridError::CapacityOverflow { cells });
    }
    Ok(cells as usize)
}

fn binomial(n: u128, k: u128) -> u128 {
    if k > n {
        return 0;
    }
    let k = k.min(n - k);
    let mut result = 1u128;
    for i in 1..=k {
        result = result * (n - k + i) / i;
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(coords: &[i64]) -> Position {
        Position::new(coords.to_vec())
    }

    #[test]
    fn test_cell_count_matches_simplex_size() {
        // C(2 + 3, 3) = 10 canonical cells for max coordinate 2 in 3D.
        let grid: OrthantGrid<i64> = OrthantGrid::new(3, 2).unwrap();
        assert_eq!(grid.len(), 10);
        assert_eq!(grid.positions().count(), 10);
    }

    #[test]
    fn test_iteration_order_matches_flat_index() {
        let grid: OrthantGrid<i64> = OrthantGrid::new(3, 3).unwrap();
        for (expected, position) in grid.positions().enumerate() {
            assert_eq!(grid.index_of(&position), Some(expected));
        }
    }

    #[test]
    fn test_get_outside_allocation_is_background() {
        let mut grid: OrthantGrid<i64> = OrthantGrid::new(2, 2).unwrap();
        grid.set(&pos(&[2, 1]), 7);
        assert_eq!(grid.get(&pos(&[2, 1])), 7);
        assert_eq!(grid.get(&pos(&[3, 0])), 0);
    }

    #[test]
    fn test_add_accumulates() {
        let mut grid: OrthantGrid<i64> = OrthantGrid::new(2, 2).unwrap();
        grid.add(&pos(&[1, 0]), 5);
        grid.add(&pos(&[1, 0]), -2);
        assert_eq!(grid.get(&pos(&[1, 0])), 3);
    }

    #[test]
    #[should_panic(expected = "outside allocated orthant")]
    fn test_write_outside_allocation_panics() {
        let mut grid: OrthantGrid<i64> = OrthantGrid::new(2, 2).unwrap();
        grid.add(&pos(&[3, 3]), 1);
    }

    #[test]
    fn test_grow_reindexes_values() {
        let mut grid: OrthantGrid<i64> = OrthantGrid::new(3, 2).unwrap();
        grid.set(&pos(&[0, 0, 0]), 1);
        grid.set(&pos(&[2, 1, 0]), 2);
        grid.set(&pos(&[2, 2, 2]), 3);

        let grown = grid.grow().unwrap();
        assert_eq!(grown.max_coord(), 3);
        assert_eq!(grown.get(&pos(&[0, 0, 0])), 1);
        assert_eq!(grown.get(&pos(&[2, 1, 0])), 2);
        assert_eq!(grown.get(&pos(&[2, 2, 2])), 3);
        assert_eq!(grown.get(&pos(&[3, 1, 0])), 0);
    }

    #[test]
    fn test_flat_roundtrip() {
        let mut grid: OrthantGrid<i64> = OrthantGrid::new(2, 3).unwrap();
        grid.set(&pos(&[3, 2]), 9);
        let restored =
            OrthantGrid::from_flat(2, 3, grid.flat().to_vec()).unwrap();
        assert_eq!(restored, grid);
    }

    #[test]
    fn test_from_flat_rejects_wrong_length() {
        let result = OrthantGrid::<i64>::from_flat(2, 2, vec![0; 5]);
        assert!(matches!(result, Err(GridError::LengthMismatch { expected: 6, got: 5 })));
    }

    #[test]
    fn test_bound_respects_fixed_axes() {
        let grid: OrthantGrid<i64> = OrthantGrid::new(3, 4).unwrap();
        // Free axis with nothing fixed spans the whole allocation.
        assert_eq!(grid.bound(0, &[]), AxisBounds::new(0, 4));
        // Middle axis squeezed between a fixed outer and inner axis.
        assert_eq!(grid.bound(1, &[(0, 2), (2, 1)]), AxisBounds::new(1, 2));
        // Innermost axis only bounded above.
        assert_eq!(grid.bound(2, &[(0, 3), (1, 2)]), AxisBounds::new(0, 2));
    }
}
