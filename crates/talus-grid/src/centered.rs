//! Full storage with the origin at the center of a hypercubic allocation.

use crate::bounds::AxisBounds;
use crate::error::GridError;
use crate::position::Position;
use std::ops::AddAssign;

/// Dense grid over `[-radius, radius]^n` with the origin mid-array.
///
/// Every lattice position in range is stored directly; no symmetry folding.
/// Out-of-bounds reads return the background (default) value, out-of-bounds
/// writes panic. Growth adds one layer on every side of every axis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CenteredGrid<T> {
    dimension: usize,
    radius: i64,
    cells: Vec<T>,
}

impl<T: Clone + Default + AddAssign<T>> CenteredGrid<T> {
    /// Creates a grid covering `[-radius, radius]` on every axis, filled with
    /// the background value.
    pub fn new(dimension: usize, radius: i64) -> Result<Self, GridError> {
        if dimension == 0 {
            return Err(GridError::ZeroDimension);
        }
        assert!(radius >= 0, "radius must be non-negative");
        let cells = hypercube_cells(radius, dimension)?;
        Ok(Self {
            dimension,
            radius,
            cells: vec![T::default(); cells],
        })
    }

    /// Reconstructs a grid from a flat value array in row-major order.
    pub fn from_flat(dimension: usize, radius: i64, values: Vec<T>) -> Result<Self, GridError> {
        if dimension == 0 {
            return Err(GridError::ZeroDimension);
        }
        let expected = hypercube_cells(radius, dimension)?;
        if values.len() != expected {
            return Err(GridError::LengthMismatch {
                expected,
                got: values.len(),
            });
        }
        Ok(Self {
            dimension,
            radius,
            cells: values,
        })
    }

    /// Number of axes.
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Largest stored coordinate magnitude on every axis.
    pub fn radius(&self) -> i64 {
        self.radius
    }

    /// Number of stored cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// True if the grid stores no cells.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// True if the position lies within the allocation.
    pub fn contains(&self, position: &Position) -> bool {
        position.coords().iter().all(|c| c.abs() <= self.radius)
    }

    /// Flat row-major index, `None` outside the allocation.
    pub fn index_of(&self, position: &Position) -> Option<usize> {
        debug_assert_eq!(position.dimension(), self.dimension);
        if !self.contains(position) {
            return None;
        }
        let side = (2 * self.radius + 1) as usize;
        let mut index = 0usize;
        for &c in position.coords() {
            index = index * side + (c + self.radius) as usize;
        }
        Some(index)
    }

    /// Value at a position, background outside the allocation.
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
                "write to {:?} outside allocated region (radius {})",
                position.coords(),
                self.radius
            ),
        }
    }

    /// Allocates a grid one layer larger on every side and copies every cell
    /// into its re-indexed slot.
    pub fn grow(&self) -> Result<Self, GridError> {
        let mut next = Self::new(self.dimension, self.radius + 1)?;
        for (index, position) in self.positions().enumerate() {
            let target = next
                .index_of(&position)
                .expect("grown region covers the old region");
            next.cells[target] = self.cells[index].clone();
        }
        Ok(next)
    }

    /// Iterates all positions in row-major (native scan) order.
    pub fn positions(&self) -> CenteredIter {
        CenteredIter {
            radius: self.radius,
            next: Some(vec![-self.radius; self.dimension]),
        }
    }

    /// The stored values in row-major order.
    pub fn flat(&self) -> &[T] {
        &self.cells
    }

    /// Bounds of `axis`; independent of fixed coordinates for a hypercubic
    /// region.
    pub fn bound(&self, axis: usize, _fixed: &[(usize, i64)]) -> AxisBounds {
        assert!(axis < self.dimension, "axis {axis} out of range");
        AxisBounds::new(-self.radius, self.radius)
    }
}

/// Iterator over all positions of a centered grid in row-major order.
#[derive(Debug, Clone)]
pub struct CenteredIter {
    radius: i64,
    next: Option<Vec<i64>>,
}

impl Iterator for CenteredIter {
    type Item = Position;

    fn next(&mut self) -> Option<Position> {
        let current = self.next.take()?;
        let mut successor = current.clone();
        let mut advanced = false;
        for i in (0..successor.len()).rev() {
            if successor[i] < self.radius {
                successor[i] += 1;
                for coord in successor.iter_mut().skip(i + 1) {
                    *coord = -self.radius;
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

fn hypercube_cells(radius: i64, dimension: usize) -> Result<usize, GridError> {
    let side = 2 * radius as u128 + 1;
    let mut cells = 1u128;
    for _ in 0..dimension {
        cells = cells.checked_mul(side).unwrap_or(u128::MAX);
        if cells > isize::MAX as u128 {
            return Err(GridError::CapacityOverflow { cells });
        }
    }
    Ok(cells as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(coords: &[i64]) -> Position {
        Position::new(coords.to_vec())
    }

    #[test]
    fn test_cell_count() {
        let grid: CenteredGrid<i64> = CenteredGrid::new(2, 2).unwrap();
        assert_eq!(grid.len(), 25);
        assert_eq!(grid.positions().count(), 25);
    }

    #[test]
    fn test_iteration_order_matches_flat_index() {
        let grid: CenteredGrid<i64> = CenteredGrid::new(3, 1).unwrap();
        for (expected, position) in grid.positions().enumerate() {
            assert_eq!(grid.index_of(&position), Some(expected));
        }
    }

    #[test]
    fn test_get_outside_allocation_is_background() {
        let mut grid: CenteredGrid<i64> = CenteredGrid::new(2, 2).unwrap();
        grid.set(&pos(&[-2, 1]), 42);
        assert_eq!(grid.get(&pos(&[-2, 1])), 42);
        assert_eq!(grid.get(&pos(&[3, 0])), 0);
        assert_eq!(grid.get(&pos(&[0, -3])), 0);
    }

    #[test]
    #[should_panic(expected = "outside allocated region")]
    fn test_write_outside_allocation_panics() {
        let mut grid: CenteredGrid<i64> = CenteredGrid::new(2, 1).unwrap();
        grid.add(&pos(&[2, 0]), 1);
    }

    #[test]
    fn test_grow_keeps_origin_centered() {
        let mut grid: CenteredGrid<i64> = CenteredGrid::new(2, 1).unwrap();
        grid.set(&pos(&[0, 0]), 5);
        grid.set(&pos(&[1, -1]), 6);

        let grown = grid.grow().unwrap();
        assert_eq!(grown.radius(), 2);
        assert_eq!(grown.get(&pos(&[0, 0])), 5);
        assert_eq!(grown.get(&pos(&[1, -1])), 6);
        assert_eq!(grown.get(&pos(&[2, 2])), 0);
    }

    #[test]
    fn test_flat_roundtrip() {
        let mut grid: CenteredGrid<i64> = CenteredGrid::new(2, 1).unwrap();
        grid.set(&pos(&[1, 1]), 3);
        let restored = CenteredGrid::from_flat(2, 1, grid.flat().to_vec()).unwrap();
        assert_eq!(restored, grid);
    }

    #[test]
    fn test_bound_is_symmetric() {
        let grid: CenteredGrid<i64> = CenteredGrid::new(3, 4).unwrap();
        assert_eq!(grid.bound(1, &[(0, 3)]), AxisBounds::new(-4, 4));
    }
}
