//! Lattice positions, axis directions, and isotropy folding.

use serde::{Deserialize, Serialize};

/// One of the 2n axis-adjacent (von Neumann) directions in an n-dimensional
/// lattice: a unit step along one axis, either positive or negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Direction {
    axis: usize,
    positive: bool,
}

impl Direction {
    /// Creates a direction along `axis`.
    pub fn new(axis: usize, positive: bool) -> Self {
        Self { axis, positive }
    }

    /// The axis this direction steps along.
    pub fn axis(&self) -> usize {
        self.axis
    }

    /// True for the +1 step, false for the -1 step.
    pub fn is_positive(&self) -> bool {
        self.positive
    }

    /// The unit offset applied to the axis coordinate.
    pub fn offset(&self) -> i64 {
        if self.positive {
            1
        } else {
            -1
        }
    }

    /// Dense index in `0..2n`, stable across calls. Positive directions take
    /// the even slots.
    pub fn index(&self) -> usize {
        self.axis * 2 + usize::from(!self.positive)
    }

    /// Inverse of [`Direction::index`].
    pub fn from_index(index: usize) -> Self {
        Self {
            axis: index / 2,
            positive: index % 2 == 0,
        }
    }

    /// All 2n directions of an n-dimensional lattice, in index order.
    pub fn all(dimension: usize) -> impl Iterator<Item = Direction> {
        (0..dimension * 2).map(Direction::from_index)
    }
}

/// A lattice position: an n-tuple of signed integer coordinates.
///
/// The dimension is fixed per value; mixing positions of different dimensions
/// is a caller error.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position(Vec<i64>);

impl Position {
    /// Creates a position from its coordinates.
    pub fn new(coords: Vec<i64>) -> Self {
        Self(coords)
    }

    /// The origin of an n-dimensional lattice.
    pub fn origin(dimension: usize) -> Self {
        Self(vec![0; dimension])
    }

    /// Number of axes.
    pub fn dimension(&self) -> usize {
        self.0.len()
    }

    /// The coordinates as a slice.
    pub fn coords(&self) -> &[i64] {
        &self.0
    }

    /// The coordinate along one axis.
    ///
    /// # Panics
    /// Panics if `axis` is out of range.
    pub fn coord(&self, axis: usize) -> i64 {
        self.0[axis]
    }

    /// Largest coordinate magnitude (the Chebyshev distance to the origin).
    pub fn radius(&self) -> i64 {
        self.0.iter().map(|c| c.abs()).max().unwrap_or(0)
    }

    /// True if every coordinate is non-negative and the coordinates are
    /// sorted in non-increasing order (the canonical orthant).
    pub fn is_canonical(&self) -> bool {
        self.0.windows(2).all(|w| w[0] >= w[1]) && self.0.last().map_or(true, |&c| c >= 0)
    }

    /// The representative of this position's symmetry orbit: absolute values
    /// sorted in non-increasing order.
    ///
    /// Idempotent, and identical for every position reachable from `self` by
    /// permuting axes and/or flipping coordinate signs.
    pub fn canonical(&self) -> Position {
        let mut coords: Vec<i64> = self.0.iter().map(|c| c.abs()).collect();
        coords.sort_unstable_by(|a, b| b.cmp(a));
        Position(coords)
    }

    /// The position one step away along `direction`.
    pub fn neighbor(&self, direction: Direction) -> Position {
        let mut coords = self.0.clone();
        coords[direction.axis()] += direction.offset();
        Position(coords)
    }

    /// The 2n axis-adjacent neighbors, each tagged with its direction.
    ///
    /// Neighbor positions are not canonicalized; callers fold them for
    /// storage lookup so that direction identity survives for delta routing.
    pub fn neighbors(&self) -> Vec<(Direction, Position)> {
        Direction::all(self.dimension())
            .map(|d| (d, self.neighbor(d)))
            .collect()
    }

    /// Number of lattice positions in this position's symmetry orbit:
    /// distinct axis permutations times sign choices for the nonzero
    /// coordinates.
    pub fn orbit_weight(&self) -> u64 {
        let canonical = self.canonical();
        let coords = canonical.coords();
        let n = coords.len();
        let mut weight = factorial(n);
        let mut run = 1u64;
        for i in 1..n {
            if coords[i] == coords[i - 1] {
                run += 1;
            } else {
                weight /= factorial(run as usize);
                run = 1;
            }
        }
        weight /= factorial(run as usize);
        let nonzero = coords.iter().filter(|&&c| c != 0).count() as u32;
        weight << nonzero
    }
}

fn factorial(n: usize) -> u64 {
    (1..=n as u64).product()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_sorts_absolute_values() {
        let p = Position::new(vec![-3, 1, -2]);
        assert_eq!(p.canonical(), Position::new(vec![3, 2, 1]));
    }

    #[test]
    fn test_canonical_is_idempotent() {
        let p = Position::new(vec![0, -5, 2, 2]);
        let c = p.canonical();
        assert!(c.is_canonical());
        assert_eq!(c.canonical(), c);
    }

    #[test]
    fn test_canonical_constant_on_orbit() {
        // Every permutation/sign-flip image of (2, 1) folds to the same cell.
        let images = [
            [2, 1],
            [1, 2],
            [-2, 1],
            [2, -1],
            [-1, -2],
            [1, -2],
            [-2, -1],
            [-1, 2],
        ];
        for image in images {
            let p = Position::new(image.to_vec());
            assert_eq!(p.canonical(), Position::new(vec![2, 1]));
        }
    }

    #[test]
    fn test_neighbors_enumerates_2n_directions() {
        let p = Position::new(vec![1, -1, 0]);
        let neighbors = p.neighbors();
        assert_eq!(neighbors.len(), 6);

        let (d, q) = &neighbors[0];
        assert_eq!(d.axis(), 0);
        assert!(d.is_positive());
        assert_eq!(q.coords(), &[2, -1, 0]);

        let (d, q) = &neighbors[3];
        assert_eq!(d.axis(), 1);
        assert!(!d.is_positive());
        assert_eq!(q.coords(), &[1, -2, 0]);
    }

    #[test]
    fn test_direction_index_roundtrip() {
        for d in Direction::all(4) {
            assert_eq!(Direction::from_index(d.index()), d);
        }
    }

    #[test]
    fn test_orbit_weight_2d() {
        assert_eq!(Position::new(vec![0, 0]).orbit_weight(), 1);
        assert_eq!(Position::new(vec![1, 0]).orbit_weight(), 4);
        assert_eq!(Position::new(vec![1, 1]).orbit_weight(), 4);
        assert_eq!(Position::new(vec![2, 1]).orbit_weight(), 8);
    }

    #[test]
    fn test_orbit_weight_3d() {
        assert_eq!(Position::new(vec![0, 0, 0]).orbit_weight(), 1);
        assert_eq!(Position::new(vec![1, 0, 0]).orbit_weight(), 6);
        assert_eq!(Position::new(vec![1, 1, 0]).orbit_weight(), 12);
        assert_eq!(Position::new(vec![1, 1, 1]).orbit_weight(), 8);
        assert_eq!(Position::new(vec![2, 1, 0]).orbit_weight(), 24);
    }

    #[test]
    fn test_orbit_weight_counts_orbit_members() {
        // Brute-force the orbit of (2, 1, 1) inside a small window.
        let target = Position::new(vec![2, 1, 1]);
        let mut count = 0u64;
        for x in -3i64..=3 {
            for y in -3i64..=3 {
                for z in -3i64..=3 {
                    if Position::new(vec![x, y, z]).canonical() == target {
                        count += 1;
                    }
                }
            }
        }
        assert_eq!(count, target.orbit_weight());
    }
}
