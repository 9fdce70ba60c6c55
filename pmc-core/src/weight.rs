//! Numeric weight constraints for transition matrices
//!
//! This module defines the trait that constrains what types can be
//! stored as probabilities or rewards in a sparse matrix.

use core::fmt::{Debug, Display};
use core::ops::{Add, AddAssign, Div, Mul, Neg, Sub};

/// Trait for types that can be stored as matrix weights
///
/// Weights need field-like arithmetic, recognizable additive and
/// multiplicative identities, and a plain-old-data representation so that
/// their raw bytes can feed the structural hashes.
///
/// Only the floating-point types implement it: Jacobi splitting and
/// distribution scaling divide by stored weights.
pub trait Weight:
    Copy
    + PartialEq
    + PartialOrd
    + Debug
    + Display
    + Send
    + Sync
    + bytemuck::Pod
    + Add<Output = Self>
    + AddAssign
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + Neg<Output = Self>
    + 'static
{
    /// Additive identity
    fn zero() -> Self;

    /// Multiplicative identity
    fn one() -> Self;

    /// Convert from f64 for generic construction
    fn from_f64(value: f64) -> Self;

    /// Convert to f64 for reporting
    fn to_f64(self) -> f64;

    /// Exact comparison against the additive identity
    fn is_zero(&self) -> bool {
        *self == Self::zero()
    }

    /// Exact comparison against the multiplicative identity
    fn is_one(&self) -> bool {
        *self == Self::one()
    }
}

impl Weight for f32 {
    fn zero() -> Self {
        0.0
    }

    fn one() -> Self {
        1.0
    }

    fn from_f64(value: f64) -> Self {
        value as f32
    }

    fn to_f64(self) -> f64 {
        self as f64
    }
}

impl Weight for f64 {
    fn zero() -> Self {
        0.0
    }

    fn one() -> Self {
        1.0
    }

    fn from_f64(value: f64) -> Self {
        value
    }

    fn to_f64(self) -> f64 {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identities() {
        assert!(0.0f64.is_zero());
        assert!(1.0f32.is_one());
        assert!(f32::zero().is_zero());
        assert!(!f64::one().is_zero());
        // Negative zero compares equal to zero
        assert!((-0.0f64).is_zero());
    }

    #[test]
    fn test_conversions() {
        assert_eq!(<f32 as Weight>::from_f64(0.25), 0.25f32);
        assert_eq!(<f32 as Weight>::to_f64(0.5), 0.5);
    }
}
