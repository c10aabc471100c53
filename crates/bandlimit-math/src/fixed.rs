//! Wrapping fixed-point values for phase accumulation.
//!
//! A phase accumulator is modular by nature: advancing past the end of a
//! period must land back at the start. Representing the phase as a fixed-point
//! unsigned integer makes that wrap a plain integer overflow and makes the
//! table index and the interpolation fraction cheap bit extractions.

use std::ops::{Add, AddAssign, Sub, SubAssign};

/// Fixed-point value over an unsigned integer of `BITS` bits, of which
/// `INT_BITS` form the integer part.
///
/// Addition and subtraction wrap modulo `2^BITS`, which is exactly the
/// modular behavior a phase accumulator needs: with `INT_BITS = log2(table
/// size)`, overflowing the integer part is the period wrap.
///
/// `BITS` must be one of 8, 16, 32 or 64 and `INT_BITS` must not exceed
/// `BITS`; both are checked at compile time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Fixed<const BITS: u32, const INT_BITS: u32> {
    value: u64,
}

impl<const BITS: u32, const INT_BITS: u32> Fixed<BITS, INT_BITS> {
    const VALID: () = assert!(
        (BITS == 8 || BITS == 16 || BITS == 32 || BITS == 64) && INT_BITS <= BITS,
        "BITS must be 8, 16, 32 or 64 and INT_BITS must not exceed BITS"
    );

    /// Number of fractional bits.
    pub const FRACTIONAL_BITS: u32 = BITS - INT_BITS;

    const MASK: u64 = if BITS == 64 {
        u64::MAX
    } else {
        (1u64 << BITS) - 1
    };
    const FRACTIONAL_MASK: u64 = if Self::FRACTIONAL_BITS == 64 {
        u64::MAX
    } else {
        (1u64 << Self::FRACTIONAL_BITS) - 1
    };
    const SCALE: f64 = (1u128 << Self::FRACTIONAL_BITS) as f64;

    /// Zero phase.
    pub const ZERO: Self = Self { value: 0 };

    /// Converts a non-negative float; values beyond the representable range
    /// wrap.
    pub fn from_f64(value: f64) -> Self {
        // Force the compile-time parameter check.
        #[allow(clippy::let_unit_value)]
        let _ = Self::VALID;
        let raw = (value * Self::SCALE).round() as u64;
        Self {
            value: raw & Self::MASK,
        }
    }

    /// Builds a value directly from its raw bit pattern.
    pub const fn from_bits(bits: u64) -> Self {
        Self {
            value: bits & Self::MASK,
        }
    }

    /// Raw bit pattern.
    pub const fn to_bits(self) -> u64 {
        self.value
    }

    /// The full value as a float.
    pub fn to_f64(self) -> f64 {
        self.value as f64 / Self::SCALE
    }

    /// Integer part, e.g. the table index of a phase accumulator.
    pub const fn integer(self) -> u64 {
        self.value >> Self::FRACTIONAL_BITS
    }

    /// Fractional part in [0, 1), e.g. the interpolation offset.
    pub fn fractional(self) -> f64 {
        (self.value & Self::FRACTIONAL_MASK) as f64 / Self::SCALE
    }

    /// Scales by an integer factor, wrapping.
    pub const fn scaled(self, factor: u64) -> Self {
        Self {
            value: self.value.wrapping_mul(factor) & Self::MASK,
        }
    }
}

impl<const BITS: u32, const INT_BITS: u32> Add for Fixed<BITS, INT_BITS> {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            value: self.value.wrapping_add(rhs.value) & Self::MASK,
        }
    }
}

impl<const BITS: u32, const INT_BITS: u32> AddAssign for Fixed<BITS, INT_BITS> {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl<const BITS: u32, const INT_BITS: u32> Sub for Fixed<BITS, INT_BITS> {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self {
            value: self.value.wrapping_sub(rhs.value) & Self::MASK,
        }
    }
}

impl<const BITS: u32, const INT_BITS: u32> SubAssign for Fixed<BITS, INT_BITS> {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}
