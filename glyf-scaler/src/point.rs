//! Points shared by the loader and the interpreter.

/// Touch state recorded on a point by the interpreter.
///
/// IUP reads these to decide which points are anchors and which are
/// interpolated.
#[derive(Copy, Clone, PartialEq, Eq, Default, Debug)]
pub struct PointMarker(u8);

impl PointMarker {
    pub const TOUCHED_X: Self = Self(1 << 4);
    pub const TOUCHED_Y: Self = Self(1 << 5);
    pub const TOUCHED: Self = Self(Self::TOUCHED_X.0 | Self::TOUCHED_Y.0);
}

/// On-curve bit of a point plus interpreter markers.
///
/// Only bit 0 survives [`PointFlags::from_bits`] and
/// [`PointFlags::without_markers`], so glyph data and finished outlines
/// never carry touch state.
#[derive(Copy, Clone, PartialEq, Eq, Default, Debug)]
#[repr(transparent)]
pub struct PointFlags(u8);

impl PointFlags {
    const ON_CURVE: u8 = 1;

    pub const fn on_curve() -> Self {
        Self(Self::ON_CURVE)
    }

    pub const fn off_curve() -> Self {
        Self(0)
    }

    pub const fn from_bits(bits: u8) -> Self {
        Self(bits & Self::ON_CURVE)
    }

    pub const fn to_bits(self) -> u8 {
        self.0
    }

    #[inline]
    pub const fn is_on_curve(self) -> bool {
        self.0 & Self::ON_CURVE != 0
    }

    /// FLIPPT
    pub fn flip_on_curve(&mut self) {
        self.0 ^= Self::ON_CURVE;
    }

    /// FLIPRGON
    pub fn set_on_curve(&mut self) {
        self.0 |= Self::ON_CURVE;
    }

    /// FLIPRGOFF
    pub fn clear_on_curve(&mut self) {
        self.0 &= !Self::ON_CURVE;
    }

    /// True if any bit of `marker` is set.
    pub fn has_marker(self, marker: PointMarker) -> bool {
        self.0 & marker.0 != 0
    }

    pub fn set_marker(&mut self, marker: PointMarker) {
        self.0 |= marker.0;
    }

    pub fn clear_marker(&mut self, marker: PointMarker) {
        self.0 &= !marker.0;
    }

    pub const fn without_markers(self) -> Self {
        Self::from_bits(self.0)
    }
}

/// Outline point in font units or 26.6 depending on the zone that holds it.
#[derive(Copy, Clone, PartialEq, Eq, Default, Debug)]
pub struct Point {
    pub x: i32,
    pub y: i32,
    pub flags: PointFlags,
}

impl Point {
    pub const fn new(x: i32, y: i32, flags: PointFlags) -> Self {
        Self { x, y, flags }
    }

    pub fn coord(&self, axis: CoordAxis) -> i32 {
        match axis {
            CoordAxis::X => self.x,
            CoordAxis::Y => self.y,
        }
    }

    pub fn coord_mut(&mut self, axis: CoordAxis) -> &mut i32 {
        match axis {
            CoordAxis::X => &mut self.x,
            CoordAxis::Y => &mut self.y,
        }
    }
}

/// Axis processed by an IUP pass.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum CoordAxis {
    X,
    Y,
}

impl CoordAxis {
    pub fn touched_marker(self) -> PointMarker {
        match self {
            Self::X => PointMarker::TOUCHED_X,
            Self::Y => PointMarker::TOUCHED_Y,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn touch_state_is_separate_from_curve_state() {
        let mut point = Point::new(3, -4, PointFlags::off_curve());
        point.flags.set_marker(CoordAxis::Y.touched_marker());
        point.flags.set_on_curve();
        assert!(point.flags.has_marker(PointMarker::TOUCHED));
        assert!(!point.flags.has_marker(PointMarker::TOUCHED_X));
        assert_eq!(point.flags.without_markers(), PointFlags::on_curve());
        point.flags.flip_on_curve();
        assert!(!point.flags.is_on_curve());
        assert!(point.flags.has_marker(PointMarker::TOUCHED_Y));
        point.flags.clear_marker(PointMarker::TOUCHED);
        assert_eq!(point.flags, PointFlags::off_curve());
        // Glyph flag bytes such as repeat and x-short are dropped.
        assert_eq!(PointFlags::from_bits(0x3F).to_bits(), 1);
    }

    #[test]
    fn axis_access() {
        let mut point = Point::new(10, 20, PointFlags::on_curve());
        *point.coord_mut(CoordAxis::Y) += 5;
        assert_eq!(
            (point.coord(CoordAxis::X), point.coord(CoordAxis::Y)),
            (10, 25)
        );
    }
}
