//! Fixed point math helpers that are specific to TrueType hinting.

use crate::fixed::{F26Dot6, F2Dot14};

/// A direction vector with 2.14 components.
///
/// Vectors created through [`UnitVector::normalize`] have unit length.
#[derive(Copy, Clone, PartialEq, Eq, Default, Debug)]
pub struct UnitVector {
    pub x: F2Dot14,
    pub y: F2Dot14,
}

impl UnitVector {
    pub const X_AXIS: Self = Self {
        x: F2Dot14::ONE,
        y: F2Dot14::ZERO,
    };

    pub const Y_AXIS: Self = Self {
        x: F2Dot14::ZERO,
        y: F2Dot14::ONE,
    };

    /// Creates a vector from raw 2.14 bits.
    pub const fn from_bits(x: i16, y: i16) -> Self {
        Self {
            x: F2Dot14::from_bits(x),
            y: F2Dot14::from_bits(y),
        }
    }

    /// Scales (x, y) to unit length in 2.14, rounding each component half
    /// away from zero.
    ///
    /// Returns `None` for a zero length vector.
    pub fn normalize(x: i32, y: i32) -> Option<Self> {
        if x == 0 && y == 0 {
            return None;
        }
        let (fx, fy) = (x as f64, y as f64);
        let len = 0x4000 as f64 / fx.hypot(fy);
        let round = |v: f64| {
            if v >= 0.0 {
                v + 0.5
            } else {
                v - 0.5
            }
        };
        Some(Self {
            x: F2Dot14::from_bits(round(fx * len) as i16),
            y: F2Dot14::from_bits(round(fy * len) as i16),
        })
    }

    /// Creates a unit vector through two points.
    ///
    /// If `rotate` is true, the vector is rotated 90 degrees counter
    /// clockwise. Coincident points produce the x axis.
    pub fn from_line(dx: i32, dy: i32, rotate: bool) -> Self {
        let (dx, dy) = if dx == 0 && dy == 0 {
            (0x4000, 0)
        } else if rotate {
            (-dy, dx)
        } else {
            (dx, dy)
        };
        Self::normalize(dx, dy).unwrap_or(Self::X_AXIS)
    }

    /// Returns true if this is exactly the x axis.
    pub fn is_x_axis(self) -> bool {
        self == Self::X_AXIS
    }

    /// Returns true if this is exactly the y axis.
    pub fn is_y_axis(self) -> bool {
        self == Self::Y_AXIS
    }

    /// Returns the dot product of the vector (x, y) with this unit vector.
    pub fn dot(self, x: i32, y: i32) -> F26Dot6 {
        F26Dot6::from_bits(dot14(x, y, self))
    }
}

/// Dot product of a 26.6 vector with a 2.14 vector, divided by 2^14 with
/// rounding.
///
/// The computation is done with 32-bit limbs to reproduce the rounding
/// behavior of FreeType exactly. Halves round away from zero.
pub fn dot14(x: i32, y: i32, v: UnitVector) -> i32 {
    let (lo1, hi1) = long_mul(x, v.x.to_bits() as i32);
    let (lo2, hi2) = long_mul(y, v.y.to_bits() as i32);
    let lo = lo1.wrapping_add(lo2);
    let mut hi = hi1.wrapping_add(hi2).wrapping_add((lo < lo1) as i32);
    // Subtract one for negative values so that halves round away from zero.
    let s = hi >> 31;
    let l = lo.wrapping_add(s as u32);
    hi = hi.wrapping_add(s).wrapping_add((l < lo) as i32);
    let lo = l;
    let l = lo.wrapping_add(0x2000);
    hi = hi.wrapping_add((l < lo) as i32);
    (((hi as u32) << 18) | (l >> 14)) as i32
}

/// 32 x 16 bit multiply producing a 64-bit result as (low, high) limbs.
fn long_mul(x: i32, q: i32) -> (u32, i32) {
    let l = (x & 0xFFFF).wrapping_mul(q) as u32;
    let m = (x >> 16).wrapping_mul(q);
    let lo = l.wrapping_add((m as u32) << 16);
    let hi = (m >> 16)
        .wrapping_add((l as i32) >> 31)
        .wrapping_add((lo < l) as i32);
    (lo, hi)
}

/// Computes `x * y / z` rounded to the nearest integer with halves rounded
/// away from zero.
///
/// Returns 0 when `z` is 0.
pub fn mul_div(x: i64, y: i64, z: i64) -> i64 {
    if z == 0 {
        return 0;
    }
    let (mut xy, mut z) = (x.wrapping_mul(y), z);
    if z < 0 {
        xy = xy.wrapping_neg();
        z = -z;
    }
    if xy >= 0 {
        xy += z / 2;
    } else {
        xy -= z / 2;
    }
    xy / z
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_axes() {
        assert_eq!(UnitVector::normalize(5, 0), Some(UnitVector::X_AXIS));
        assert_eq!(UnitVector::normalize(0, 100), Some(UnitVector::Y_AXIS));
        assert_eq!(
            UnitVector::normalize(0, -3),
            Some(UnitVector::from_bits(0, -0x4000))
        );
        assert_eq!(UnitVector::normalize(0, 0), None);
    }

    #[test]
    fn normalize_diagonal() {
        // 0x4000 / sqrt(2) = 11585.24
        assert_eq!(
            UnitVector::normalize(64, 64),
            Some(UnitVector::from_bits(11585, 11585))
        );
        assert_eq!(
            UnitVector::normalize(-64, 64),
            Some(UnitVector::from_bits(-11585, 11585))
        );
        // 3-4-5 triangle: 0x4000 * 0.6 = 9830.4, 0x4000 * 0.8 = 13107.2
        assert_eq!(
            UnitVector::normalize(3, -4),
            Some(UnitVector::from_bits(9830, -13107))
        );
    }

    #[test]
    fn line_vectors() {
        assert_eq!(UnitVector::from_line(0, 0, true), UnitVector::X_AXIS);
        assert_eq!(UnitVector::from_line(10, 0, false), UnitVector::X_AXIS);
        // Rotating the x axis counter clockwise gives the y axis.
        assert_eq!(UnitVector::from_line(10, 0, true), UnitVector::Y_AXIS);
    }

    #[test]
    fn dot_matches_wide_multiply() {
        let vectors = [
            UnitVector::X_AXIS,
            UnitVector::Y_AXIS,
            UnitVector::from_bits(11585, 11585),
            UnitVector::from_bits(-9830, 13107),
        ];
        let values = [0, 1, 63, 64, 1000, -1000, 123456, -654321, 0x7FFF_FF];
        for v in vectors {
            for &x in &values {
                for &y in &values {
                    let wide = x as i64 * v.x.to_bits() as i64 + y as i64 * v.y.to_bits() as i64;
                    // Round half away from zero.
                    let expected = if wide >= 0 {
                        (wide + 0x2000) >> 14
                    } else {
                        -((-wide + 0x2000) >> 14)
                    };
                    assert_eq!(dot14(x, y, v) as i64, expected, "{x} {y} {v:?}");
                }
            }
        }
    }

    #[test]
    fn dot_rounds_halves_away_from_zero() {
        let half = UnitVector::from_bits(0x2000, 0);
        assert_eq!(dot14(1, 0, half), 1);
        assert_eq!(dot14(-1, 0, half), -1);
        assert_eq!(dot14(3, 0, half), 2);
        assert_eq!(dot14(-3, 0, half), -2);
    }

    #[test]
    fn mul_div_rounding() {
        assert_eq!(mul_div(10, 10, 3), 33);
        assert_eq!(mul_div(10, 10, -3), -33);
        assert_eq!(mul_div(5, 1, 2), 3);
        assert_eq!(mul_div(-5, 1, 2), -3);
        assert_eq!(mul_div(5, 1, -2), -3);
        assert_eq!(mul_div(7, 3, 0), 0);
    }
}
