//! Exact-arithmetic cell values.
//!
//! The engines are generic over the integer type held in each lattice cell.
//! Fixed-width cells (`i32`, `i64`) validate the initial value against an
//! analytic safe range at construction; `BigInt` cells have no limit.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use std::ops::AddAssign;

/// An exact signed integer usable as a cell value.
///
/// Division truncates toward zero, matching the remainder-retention rule of
/// the redistribution policies. Arithmetic overflow on fixed-width
/// implementations is a contract violation (construction validation is meant
/// to rule it out) and panics rather than wrapping.
pub trait Cell:
    Clone
    + Ord
    + Default
    + AddAssign<Self>
    + fmt::Debug
    + fmt::Display
    + Serialize
    + DeserializeOwned
    + Send
    + Sync
    + 'static
{
    /// The background value of unpopulated cells.
    fn zero() -> Self;

    /// True if this is the background value.
    fn is_zero(&self) -> bool;

    /// Converts a small non-negative constant (thresholds, share counts).
    fn from_u64(value: u64) -> Self;

    /// Exact sum.
    fn add(&self, rhs: &Self) -> Self;

    /// Exact difference.
    fn sub(&self, rhs: &Self) -> Self;

    /// Exact product with a small constant.
    fn mul_u64(&self, factor: u64) -> Self;

    /// Quotient and remainder of division by a small positive constant,
    /// truncating toward zero.
    fn div_rem_u64(&self, divisor: u64) -> (Self, Self);

    /// Inclusive range of origin seeds guaranteed not to overflow this type
    /// during any sweep in the given dimension, or `None` when the type
    /// cannot overflow.
    fn safe_origin_range(dimension: usize) -> Option<(Self, Self)>;
}

/// Worst-case factor between an origin seed and any intermediate sum: one
/// share from each of 2n neighbors plus the cell's own value, times the
/// largest symmetry-orbit weight a folded delta can be scaled by.
fn worst_case_divisor(dimension: usize) -> u64 {
    let n = dimension as u64;
    let orbit_max = (1..=n).product::<u64>() << n;
    (2 * n + 1).saturating_mul(orbit_max)
}

impl Cell for i64 {
    fn zero() -> Self {
        0
    }

    fn is_zero(&self) -> bool {
        *self == 0
    }

    fn from_u64(value: u64) -> Self {
        value as i64
    }

    fn add(&self, rhs: &Self) -> Self {
        self.checked_add(*rhs).expect("cell value overflow")
    }

    fn sub(&self, rhs: &Self) -> Self {
        self.checked_sub(*rhs).expect("cell value overflow")
    }

    fn mul_u64(&self, factor: u64) -> Self {
        self.checked_mul(factor as i64).expect("cell value overflow")
    }

    fn div_rem_u64(&self, divisor: u64) -> (Self, Self) {
        let divisor = divisor as i64;
        (self / divisor, self % divisor)
    }

    fn safe_origin_range(dimension: usize) -> Option<(Self, Self)> {
        let magnitude = i64::MAX / worst_case_divisor(dimension) as i64;
        Some((-magnitude, magnitude))
    }
}

impl Cell for i32 {
    fn zero() -> Self {
        0
    }

    fn is_zero(&self) -> bool {
        *self == 0
    }

    fn from_u64(value: u64) -> Self {
        value as i32
    }

    fn add(&self, rhs: &Self) -> Self {
        self.checked_add(*rhs).expect("cell value overflow")
    }

    fn sub(&self, rhs: &Self) -> Self {
        self.checked_sub(*rhs).expect("cell value overflow")
    }

    fn mul_u64(&self, factor: u64) -> Self {
        self.checked_mul(factor as i32).expect("cell value overflow")
    }

    fn div_rem_u64(&self, divisor: u64) -> (Self, Self) {
        let divisor = divisor as i32;
        (self / divisor, self % divisor)
    }

    fn safe_origin_range(dimension: usize) -> Option<(Self, Self)> {
        let divisor = worst_case_divisor(dimension).min(i32::MAX as u64) as i32;
        let magnitude = i32::MAX / divisor;
        Some((-magnitude, magnitude))
    }
}

#[cfg(feature = "bigint")]
mod bigint {
    use super::Cell;
    use num_bigint::BigInt;
    use num_traits::Zero;

    impl Cell for BigInt {
        fn zero() -> Self {
            Zero::zero()
        }

        fn is_zero(&self) -> bool {
            Zero::is_zero(self)
        }

        fn from_u64(value: u64) -> Self {
            BigInt::from(value)
        }

        fn add(&self, rhs: &Self) -> Self {
            self + rhs
        }

        fn sub(&self, rhs: &Self) -> Self {
            self - rhs
        }

        fn mul_u64(&self, factor: u64) -> Self {
            self * BigInt::from(factor)
        }

        fn div_rem_u64(&self, divisor: u64) -> (Self, Self) {
            let divisor = BigInt::from(divisor);
            (self / &divisor, self % &divisor)
        }

        fn safe_origin_range(_dimension: usize) -> Option<(Self, Self)> {
            None
        }
    }
}
