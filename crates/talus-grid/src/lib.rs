//! Growable N-dimensional lattice storage for single-source chip-firing
//! automata.
//!
//! Provides the coordinate model and the two storage shapes the step engines
//! run on:
//! - [`Position`] / [`Direction`]: signed lattice coordinates, von Neumann
//!   neighbor enumeration, and canonicalization for isotropic folding
//! - [`OrthantGrid`]: folded storage holding one representative per symmetry
//!   orbit (coordinates non-negative and sorted descending)
//! - [`CenteredGrid`]: full storage with the origin in the middle of a
//!   hypercubic allocation
//!
//! Both grids read as an unbounded lattice (out-of-bounds lookups return the
//! background value) and grow by whole layers, re-indexing existing cells.
//!
//! # Example
//!
//! ```
//! use talus_grid::{CenteredGrid, Position};
//!
//! let mut grid: CenteredGrid<i64> = CenteredGrid::new(2, 2).unwrap();
//! grid.set(&Position::origin(2), 100);
//!
//! assert_eq!(grid.get(&Position::new(vec![0, 0])), 100);
//! // Reads outside the allocation are the implicit background zero.
//! assert_eq!(grid.get(&Position::new(vec![9, 9])), 0);
//! ```

mod bounds;
mod centered;
mod error;
mod orthant;
mod position;

pub use crate::bounds::AxisBounds;
pub use crate::centered::{CenteredGrid, CenteredIter};
pub use crate::error::GridError;
pub use crate::orthant::{OrthantGrid, OrthantIter};
pub use crate::position::{Direction, Position};
