//! Exact rational arithmetic for driftless sample positions.
//!
//! Every value is kept in canonical form: positive denominator and
//! coprime numerator/denominator (zero is `0/1`). Intermediate products are
//! computed in `i128` and narrowed back after reduction, so comparisons can
//! never overflow and arithmetic overflow is reported instead of wrapping.

use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use num_integer::Integer;
use serde::{Deserialize, Serialize};

use crate::error::{ResampleError, ResampleResult};

/// A reduced fraction over `i64`.
///
/// Used for sample rate ratios and for output/input positions, where a float
/// would accumulate phase drift over long streams.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RationalRepr", into = "RationalRepr")]
pub struct Rational {
    num: i64,
    den: i64,
}

/// Wire form of [`Rational`]; deserialization goes back through reduction.
#[derive(Serialize, Deserialize)]
struct RationalRepr {
    numerator: i64,
    denominator: i64,
}

impl TryFrom<RationalRepr> for Rational {
    type Error = ResampleError;

    fn try_from(repr: RationalRepr) -> Result<Self, Self::Error> {
        Rational::try_new(repr.numerator, repr.denominator)
    }
}

impl From<Rational> for RationalRepr {
    fn from(r: Rational) -> Self {
        Self {
            numerator: r.num,
            denominator: r.den,
        }
    }
}

impl Rational {
    pub const ZERO: Rational = Rational { num: 0, den: 1 };
    pub const ONE: Rational = Rational { num: 1, den: 1 };

    /// Creates `numerator / denominator` in reduced form.
    ///
    /// # Panics
    /// Panics if `denominator` is zero or the reduced value does not fit.
    /// Use [`Rational::try_new`] for a fallible constructor.
    pub fn new(numerator: i64, denominator: i64) -> Self {
        match Self::try_new(numerator, denominator) {
            Ok(r) => r,
            Err(err) => panic!("invalid rational {}/{}: {}", numerator, denominator, err),
        }
    }

    /// Creates `numerator / denominator` in reduced form.
    ///
    /// A negative denominator moves its sign to the numerator.
    ///
    /// # Errors
    /// Returns [`ResampleError::ZeroDenominator`] if `denominator` is zero.
    pub fn try_new(numerator: i64, denominator: i64) -> ResampleResult<Self> {
        Self::reduce(numerator as i128, denominator as i128)
    }

    /// Creates a whole number (denominator 1).
    pub const fn from_integer(value: i64) -> Self {
        Self { num: value, den: 1 }
    }

    fn reduce(num: i128, den: i128) -> ResampleResult<Self> {
        if den == 0 {
            return Err(ResampleError::ZeroDenominator);
        }
        let (num, den) = if den < 0 { (-num, -den) } else { (num, den) };
        // den > 0, so g >= 1 and zero reduces to 0/1.
        let g = num.unsigned_abs().gcd(&(den as u128)) as i128;
        let num = i64::try_from(num / g).map_err(|_| ResampleError::Overflow)?;
        let den = i64::try_from(den / g).map_err(|_| ResampleError::Overflow)?;
        Ok(Self { num, den })
    }

    #[inline]
    pub const fn numerator(&self) -> i64 {
        self.num
    }

    /// Always positive.
    #[inline]
    pub const fn denominator(&self) -> i64 {
        self.den
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.num == 0
    }

    /// Largest integer not greater than `self`.
    #[inline]
    pub fn floor(&self) -> i64 {
        self.num.div_euclid(self.den)
    }

    /// Smallest integer not less than `self`.
    #[inline]
    pub fn ceil(&self) -> i64 {
        let q = self.num.div_euclid(self.den);
        if self.num.rem_euclid(self.den) == 0 {
            q
        } else {
            q + 1
        }
    }

    /// Fractional part, `self - floor(self)`, always in `[0, 1)`.
    #[inline]
    pub fn frac(&self) -> Self {
        // gcd(num mod den, den) == gcd(num, den) == 1, so this stays reduced.
        let rem = self.num.rem_euclid(self.den);
        if rem == 0 {
            Self::ZERO
        } else {
            Self {
                num: rem,
                den: self.den,
            }
        }
    }

    /// `1 / self`.
    ///
    /// # Panics
    /// Panics if `self` is zero.
    pub fn recip(self) -> Self {
        Self::ONE / self
    }

    pub fn checked_add(self, rhs: Self) -> ResampleResult<Self> {
        Self::reduce(
            self.num as i128 * rhs.den as i128 + rhs.num as i128 * self.den as i128,
            self.den as i128 * rhs.den as i128,
        )
    }

    pub fn checked_sub(self, rhs: Self) -> ResampleResult<Self> {
        Self::reduce(
            self.num as i128 * rhs.den as i128 - rhs.num as i128 * self.den as i128,
            self.den as i128 * rhs.den as i128,
        )
    }

    pub fn checked_mul(self, rhs: Self) -> ResampleResult<Self> {
        Self::reduce(
            self.num as i128 * rhs.num as i128,
            self.den as i128 * rhs.den as i128,
        )
    }

    /// # Errors
    /// Returns [`ResampleError::DivisionByZero`] if `rhs` is zero.
    pub fn checked_div(self, rhs: Self) -> ResampleResult<Self> {
        if rhs.is_zero() {
            return Err(ResampleError::DivisionByZero);
        }
        Self::reduce(
            self.num as i128 * rhs.den as i128,
            self.den as i128 * rhs.num as i128,
        )
    }

    /// Lossy conversion for reporting. Never used for position tracking.
    #[inline]
    pub fn to_f64(&self) -> f64 {
        self.num as f64 / self.den as f64
    }

    #[inline]
    pub fn to_f32(&self) -> f32 {
        self.to_f64() as f32
    }
}

impl Default for Rational {
    fn default() -> Self {
        Self::ZERO
    }
}

impl From<i64> for Rational {
    fn from(value: i64) -> Self {
        Self::from_integer(value)
    }
}

impl fmt::Display for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.num, self.den)
    }
}

impl Ord for Rational {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.num as i128 * other.den as i128).cmp(&(other.num as i128 * self.den as i128))
    }
}

impl PartialOrd for Rational {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq<i64> for Rational {
    fn eq(&self, other: &i64) -> bool {
        self.den == 1 && self.num == *other
    }
}

impl PartialOrd<i64> for Rational {
    fn partial_cmp(&self, other: &i64) -> Option<Ordering> {
        Some(self.cmp(&Rational::from_integer(*other)))
    }
}

impl Neg for Rational {
    type Output = Rational;

    fn neg(self) -> Rational {
        match self.num.checked_neg() {
            Some(num) => Rational { num, den: self.den },
            None => panic!("rational negation failed: {}", ResampleError::Overflow),
        }
    }
}

macro_rules! rational_binop {
    ($op:ident, $method:ident, $checked:ident, $assign_op:ident, $assign_method:ident) => {
        impl $op for Rational {
            type Output = Rational;

            fn $method(self, rhs: Rational) -> Rational {
                match self.$checked(rhs) {
                    Ok(r) => r,
                    Err(err) => panic!(
                        concat!("rational ", stringify!($method), " of {} and {} failed: {}"),
                        self, rhs, err
                    ),
                }
            }
        }

        impl $op<i64> for Rational {
            type Output = Rational;

            fn $method(self, rhs: i64) -> Rational {
                $op::$method(self, Rational::from_integer(rhs))
            }
        }

        impl $op<Rational> for i64 {
            type Output = Rational;

            fn $method(self, rhs: Rational) -> Rational {
                $op::$method(Rational::from_integer(self), rhs)
            }
        }

        impl $assign_op for Rational {
            fn $assign_method(&mut self, rhs: Rational) {
                *self = $op::$method(*self, rhs);
            }
        }

        impl $assign_op<i64> for Rational {
            fn $assign_method(&mut self, rhs: i64) {
                *self = $op::$method(*self, rhs);
            }
        }
    };
}

rational_binop!(Add, add, checked_add, AddAssign, add_assign);
rational_binop!(Sub, sub, checked_sub, SubAssign, sub_assign);
rational_binop!(Mul, mul, checked_mul, MulAssign, mul_assign);
rational_binop!(Div, div, checked_div, DivAssign, div_assign);
