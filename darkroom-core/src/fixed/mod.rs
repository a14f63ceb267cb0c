//! Fixed-point arithmetic for the exposure engine
//!
//! Uses Q8.24 fixed-point format: 8 integer bits, 24 fractional bits.
//! Every exposure quantity is a base-2 logarithm, so the integer range is
//! small while resolution matters. No hardware floating point is needed on
//! Cortex-M0.

mod math;
mod tables;

pub use math::{exp2, interpolate_table, log2, sqrt, SQRT_EPS};

use core::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

/// Q8.24 fixed-point number
///
/// Range: approximately -128.0 to +127.99999994
/// Resolution: 2^-24 (approximately 0.00000006)
///
/// Addition and subtraction wrap; callers keep values inside the 8-bit
/// integer range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Fix24(i32);

impl Fix24 {
    /// Fractional bits (24)
    pub const FRAC_BITS: u32 = 24;

    /// Zero value
    pub const ZERO: Self = Self(0);

    /// One (1.0)
    pub const ONE: Self = Self(1 << Self::FRAC_BITS);

    /// Two (2.0)
    pub const TWO: Self = Self(2 << Self::FRAC_BITS);

    /// Four (4.0)
    pub const FOUR: Self = Self(4 << Self::FRAC_BITS);

    /// Smallest positive value (one LSB)
    pub const EPSILON: Self = Self(1);

    /// Most negative representable value
    pub const MIN: Self = Self(i32::MIN);

    /// Most positive representable value
    pub const MAX: Self = Self(i32::MAX);

    /// Create from a whole integer in [-128, 127]
    ///
    /// # Example
    /// ```
    /// use darkroom_core::fixed::Fix24;
    /// let three = Fix24::from_int(3);
    /// assert_eq!(three.to_int(), 3);
    /// ```
    #[inline]
    pub const fn from_int(n: i32) -> Self {
        Self(n << Self::FRAC_BITS)
    }

    /// Create from a scaled integer (value × 1000)
    ///
    /// Used for literals such as bounds: `-5.000` is written `-5000`.
    ///
    /// # Example
    /// ```
    /// use darkroom_core::fixed::Fix24;
    /// assert_eq!(Fix24::from_scaled_1000(-2500), -Fix24::from_int(5) / Fix24::TWO);
    /// ```
    #[inline]
    pub const fn from_scaled_1000(n: i32) -> Self {
        Self((((n as i64) << Self::FRAC_BITS) / 1000) as i32)
    }

    /// Create from a floating-point value, rounding to nearest
    ///
    /// Intended for host tooling and tests; the engine itself never
    /// touches floating point.
    #[inline]
    pub fn from_f64(x: f64) -> Self {
        let scaled = x * (1u32 << Self::FRAC_BITS) as f64;
        let rounded = if scaled >= 0.0 {
            scaled + 0.5
        } else {
            scaled - 0.5
        };
        Self(rounded as i32)
    }

    /// Create a seconds value from a millisecond count
    ///
    /// Saturates at [`Fix24::MIN`] / [`Fix24::MAX`] (about ±128 s).
    #[inline]
    pub fn from_millis(ms: i32) -> Self {
        let scaled = (ms as i64) << Self::FRAC_BITS;
        let half = if scaled >= 0 { 500 } else { -500 };
        let seconds = (scaled + half) / 1000;
        Self(seconds.clamp(Self::MIN.0 as i64, Self::MAX.0 as i64) as i32)
    }

    /// Convert to floating point
    #[inline]
    pub fn to_f64(self) -> f64 {
        self.0 as f64 / (1u32 << Self::FRAC_BITS) as f64
    }

    /// Convert to whole integer (floors toward negative infinity)
    #[inline]
    pub const fn to_int(self) -> i32 {
        self.0 >> Self::FRAC_BITS
    }

    /// Convert a seconds value to milliseconds, rounded to nearest
    #[inline]
    pub const fn to_millis(self) -> i32 {
        ((self.0 as i64 * 1000 + (1 << (Self::FRAC_BITS - 1))) >> Self::FRAC_BITS) as i32
    }

    /// Get the raw i32 representation
    #[inline]
    pub const fn raw(self) -> i32 {
        self.0
    }

    /// Create from raw i32 representation
    #[inline]
    pub const fn from_raw(raw: i32) -> Self {
        Self(raw)
    }

    /// Absolute value
    #[inline]
    pub const fn abs(self) -> Self {
        Self(self.0.wrapping_abs())
    }

    /// Check if value is zero
    #[inline]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Check if value is negative
    #[inline]
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Clamp value to a range
    #[inline]
    pub fn clamp(self, min: Self, max: Self) -> Self {
        Self(self.0.clamp(min.0, max.0))
    }

    /// Snap values smaller in magnitude than `eps` to exactly zero
    ///
    /// Table lookups and Newton iterations leave a few LSBs of noise;
    /// this separates that noise from a real discrepancy.
    #[inline]
    pub fn zapsmall(self, eps: Self) -> Self {
        if self.abs() < eps {
            Self::ZERO
        } else {
            self
        }
    }

    /// Base-2 logarithm, see [`log2`]
    #[inline]
    pub fn log2(self) -> Self {
        log2(self)
    }

    /// Power of two, see [`exp2`]
    #[inline]
    pub fn exp2(self) -> Self {
        exp2(self)
    }

    /// Square root, see [`sqrt`]
    #[inline]
    pub fn sqrt(self) -> Self {
        sqrt(self)
    }
}

impl Add for Fix24 {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Self(self.0.wrapping_add(other.0))
    }
}

impl Sub for Fix24 {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Self(self.0.wrapping_sub(other.0))
    }
}

impl Mul for Fix24 {
    type Output = Self;

    /// Uses i64 intermediate to avoid overflow.
    #[inline]
    fn mul(self, other: Self) -> Self {
        let result = ((self.0 as i64) * (other.0 as i64)) >> Self::FRAC_BITS;
        Self(result as i32)
    }
}

impl Div for Fix24 {
    type Output = Self;

    /// Returns ZERO if divisor is zero.
    #[inline]
    fn div(self, other: Self) -> Self {
        debug_assert!(other.0 != 0, "Fix24 division by zero");
        if other.0 == 0 {
            return Self::ZERO;
        }
        let result = ((self.0 as i64) << Self::FRAC_BITS) / (other.0 as i64);
        Self(result as i32)
    }
}

impl Neg for Fix24 {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Self(self.0.wrapping_neg())
    }
}

impl AddAssign for Fix24 {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        *self = *self + other;
    }
}

impl SubAssign for Fix24 {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        *self = *self - other;
    }
}
