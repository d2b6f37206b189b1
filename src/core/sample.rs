//! Element types accepted by filters and signals.

use std::fmt::Debug;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Div, Mul, Sub};

use num_complex::Complex;

/// A filter coefficient or signal sample.
///
/// `Default::default()` must be the additive identity; it stands in for
/// every sample outside a signal's extent.
pub trait Sample:
    Copy
    + Debug
    + Default
    + PartialEq
    + Send
    + Sync
    + 'static
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + AddAssign
    + Sum
{
    /// Converts a phase count into a gain.
    fn from_usize(value: usize) -> Self;

    /// Converts an exact integer blend weight.
    fn from_weight(weight: u64) -> Self;

    /// Absolute value, used to detect degenerate gains.
    fn magnitude(self) -> f64;

    #[inline]
    fn zero() -> Self {
        Self::default()
    }
}

impl Sample for f32 {
    #[inline]
    fn from_usize(value: usize) -> Self {
        value as f32
    }

    #[inline]
    fn from_weight(weight: u64) -> Self {
        weight as f32
    }

    #[inline]
    fn magnitude(self) -> f64 {
        self.abs() as f64
    }
}

impl Sample for f64 {
    #[inline]
    fn from_usize(value: usize) -> Self {
        value as f64
    }

    #[inline]
    fn from_weight(weight: u64) -> Self {
        weight as f64
    }

    #[inline]
    fn magnitude(self) -> f64 {
        self.abs()
    }
}

impl Sample for Complex<f32> {
    #[inline]
    fn from_usize(value: usize) -> Self {
        Complex::new(value as f32, 0.0)
    }

    #[inline]
    fn from_weight(weight: u64) -> Self {
        Complex::new(weight as f32, 0.0)
    }

    #[inline]
    fn magnitude(self) -> f64 {
        self.norm() as f64
    }
}

impl Sample for Complex<f64> {
    #[inline]
    fn from_usize(value: usize) -> Self {
        Complex::new(value as f64, 0.0)
    }

    #[inline]
    fn from_weight(weight: u64) -> Self {
        Complex::new(weight as f64, 0.0)
    }

    #[inline]
    fn magnitude(self) -> f64 {
        self.norm()
    }
}
