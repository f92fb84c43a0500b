//! fixed-point numerical types

use core::ops::{Add, AddAssign, Neg, Sub, SubAssign};

// shared between F2Dot14 and F26Dot6
macro_rules! fixed_impl {
    ($name:ident, $bits:literal, $fract_bits:literal, $ty:ty) => {
        #[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
        #[doc = concat!(stringify!($bits), "-bit signed fixed point number with ", stringify!($fract_bits), " bits of fraction." )]
        #[repr(transparent)]
        pub struct $name($ty);

        impl $name {
            /// Zero.
            pub const ZERO: Self = Self(0);

            /// One.
            pub const ONE: Self = Self(1 << $fract_bits);

            const INT_MASK: $ty = !0 << $fract_bits;

            /// Creates a value from the raw bits.
            pub const fn from_bits(bits: $ty) -> Self {
                Self(bits)
            }

            /// Returns the raw bits of the value.
            pub const fn to_bits(self) -> $ty {
                self.0
            }

            /// Returns the absolute value of the number.
            pub fn abs(self) -> Self {
                Self(self.0.wrapping_abs())
            }

            /// Returns the largest integer less than or equal to the number.
            pub fn floor(self) -> Self {
                Self(self.0 & Self::INT_MASK)
            }

            /// Returns the smallest integer greater than or equal to the number.
            pub fn ceil(self) -> Self {
                Self(self.0.wrapping_add(!Self::INT_MASK) & Self::INT_MASK)
            }

            /// Returns the nearest integer value, rounding halves up.
            pub fn round(self) -> Self {
                Self(self.0.wrapping_add(1 << ($fract_bits - 1)) & Self::INT_MASK)
            }
        }

        impl Add for $name {
            type Output = Self;
            #[inline(always)]
            fn add(self, other: Self) -> Self {
                Self(self.0.wrapping_add(other.0))
            }
        }

        impl AddAssign for $name {
            fn add_assign(&mut self, rhs: Self) {
                *self = *self + rhs;
            }
        }

        impl Sub for $name {
            type Output = Self;
            #[inline(always)]
            fn sub(self, other: Self) -> Self {
                Self(self.0.wrapping_sub(other.0))
            }
        }

        impl SubAssign for $name {
            fn sub_assign(&mut self, rhs: Self) {
                *self = *self - rhs;
            }
        }

        impl Neg for $name {
            type Output = Self;
            fn neg(self) -> Self {
                Self(self.0.wrapping_neg())
            }
        }

        impl core::fmt::Debug for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
                write!(f, "{}", self.to_f64())
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
                write!(f, "{}", self.to_f64())
            }
        }

        impl $name {
            /// Returns the value as an `f64`.
            pub fn to_f64(self) -> f64 {
                self.0 as f64 / (1i64 << $fract_bits) as f64
            }
        }
    };
}

fixed_impl!(F2Dot14, 16, 14, i16);
fixed_impl!(F26Dot6, 32, 6, i32);

impl F26Dot6 {
    /// Creates a 26.6 value from an integer pixel count.
    pub const fn from_i32(value: i32) -> Self {
        Self(value << 6)
    }

    /// Returns the integer part, truncating toward negative infinity.
    pub const fn to_i32(self) -> i32 {
        self.0 >> 6
    }

    /// Multiplication with rounding: `(a * b + 32) >> 6`.
    pub fn mul(self, other: Self) -> Self {
        Self(((self.0 as i64 * other.0 as i64 + 32) >> 6) as i32)
    }

    /// Division with a 6-bit pre-shift: `(a << 6) / b`.
    ///
    /// Returns `None` if `other` is zero.
    pub fn div(self, other: Self) -> Option<Self> {
        if other.0 == 0 {
            return None;
        }
        Some(Self((((self.0 as i64) << 6) / other.0 as i64) as i32))
    }
}
