//! Error types for lattice storage.

use thiserror::Error;

/// Errors from grid allocation and reconstruction.
#[derive(Debug, Clone, Error)]
pub enum GridError {
    /// The requested region holds more cells than can be addressed.
    ///
    /// Raised by construction and by [`grow`](crate::OrthantGrid::grow)
    /// before any allocation is attempted; a grid that fails to grow is left
    /// untouched but the model owning it must be considered unusable.
    #[error("region of {cells} cells exceeds addressable capacity")]
    CapacityOverflow {
        /// Cell count of the rejected region.
        cells: u128,
    },

    /// A flat value array does not match the region it claims to cover.
    #[error("flat value array holds {got} cells, region needs {expected}")]
    LengthMismatch {
        /// Cell count of the region.
        expected: usize,
        /// Length of the provided array.
        got: usize,
    },

    /// Grids require at least one axis.
    #[error("dimension must be at least 1")]
    ZeroDimension,
}
