//! Automaton construction and stepping errors.

use talus_grid::GridError;
use thiserror::Error;

/// Errors raised when building or advancing an automaton.
#[derive(Debug, Error)]
pub enum ModelError {
    /// The origin seed falls outside the range the cell type can carry
    /// through a worst-case sweep without overflowing.
    #[error(
        "initial value {value} outside the safe range [{min}, {max}] for dimension {dimension}"
    )]
    InvalidInitialValue {
        value: String,
        min: String,
        max: String,
        dimension: usize,
    },

    /// Zero-dimensional lattices have no cells.
    #[error("dimension must be at least 1")]
    ZeroDimension,

    /// The requested scheduling and symmetry cannot be combined.
    #[error("unsupported configuration: {0}")]
    UnsupportedConfiguration(String),

    /// Storage allocation or reconstruction failed.
    #[error(transparent)]
    Grid(#[from] GridError),

    /// The snapshot was written by an incompatible format revision.
    #[error("unsupported snapshot version {0}")]
    UnsupportedSnapshotVersion(u32),

    /// The snapshot's fields are inconsistent with each other.
    #[error("malformed snapshot: {0}")]
    MalformedSnapshot(String),
}
