//! Literal value keys.
//!
//! Floats are carried as their IEEE-754 bit pattern so literal values can be
//! hashed and compared for deduplication.

use std::fmt;

/// A floating-point literal stored as `u64` bits.
///
/// Equality is bitwise: `0.0` and `-0.0` are distinct, and NaNs with the
/// same payload are equal.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
#[repr(transparent)]
pub struct FloatBits(u64);

impl FloatBits {
    #[inline]
    pub const fn from_bits(bits: u64) -> Self {
        FloatBits(bits)
    }

    #[inline]
    pub fn from_f64(value: f64) -> Self {
        FloatBits(value.to_bits())
    }

    #[inline]
    pub const fn bits(self) -> u64 {
        self.0
    }

    #[inline]
    pub fn to_f64(self) -> f64 {
        f64::from_bits(self.0)
    }
}

impl From<f64> for FloatBits {
    fn from(value: f64) -> Self {
        FloatBits::from_f64(value)
    }
}

impl fmt::Debug for FloatBits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FloatBits({})", self.to_f64())
    }
}
