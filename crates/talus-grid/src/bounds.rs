//! Axis bounds of an allocated grid region.

use serde::{Deserialize, Serialize};

/// Inclusive coordinate bounds of one axis within an allocated region.
///
/// Replaces the per-axis-combination accessor families
/// (`minXAtYZ`, `maxWAtXY`, ...) with one value produced by a single
/// `bound(axis, partial_coordinates)` query per grid shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxisBounds {
    /// Smallest coordinate inside the region.
    pub min: i64,
    /// Largest coordinate inside the region.
    pub max: i64,
}

impl AxisBounds {
    /// Creates inclusive bounds.
    pub fn new(min: i64, max: i64) -> Self {
        Self { min, max }
    }

    /// True if `coord` lies within the bounds.
    pub fn contains(&self, coord: i64) -> bool {
        coord >= self.min && coord <= self.max
    }

    /// Number of coordinates covered, zero when the bounds are empty.
    pub fn len(&self) -> u64 {
        if self.max < self.min {
            0
        } else {
            (self.max - self.min) as u64 + 1
        }
    }

    /// True when no coordinate satisfies the bounds.
    pub fn is_empty(&self) -> bool {
        self.max < self.min
    }
}
