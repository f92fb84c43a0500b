//! Decoding of composite glyph records.

use super::simple::GLYPH_HEADER_LEN;
use crate::{
    error::LoadError,
    font::GlyphId,
    font_data::{Cursor, FontData},
    point::Point,
};

/// Flags that describe a single component.
///
/// See <https://learn.microsoft.com/en-us/typography/opentype/spec/glyf#composite-glyph-description>
#[derive(Copy, Clone, PartialEq, Eq, Default, Debug)]
pub struct ComponentFlags(u16);

impl ComponentFlags {
    pub const ARG_1_AND_2_ARE_WORDS: Self = Self(0x0001);
    pub const ARGS_ARE_XY_VALUES: Self = Self(0x0002);
    pub const ROUND_XY_TO_GRID: Self = Self(0x0004);
    pub const WE_HAVE_A_SCALE: Self = Self(0x0008);
    pub const MORE_COMPONENTS: Self = Self(0x0020);
    pub const WE_HAVE_AN_X_AND_Y_SCALE: Self = Self(0x0040);
    pub const WE_HAVE_A_TWO_BY_TWO: Self = Self(0x0080);
    pub const WE_HAVE_INSTRUCTIONS: Self = Self(0x0100);
    pub const USE_MY_METRICS: Self = Self(0x0200);

    pub const fn from_bits(bits: u16) -> Self {
        Self(bits)
    }

    pub const fn to_bits(self) -> u16 {
        self.0
    }

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

/// Linear transform in 2.14 applied to the points of a component.
///
/// The terms are ordered as stored: `xx`, `yx`, `xy`, `yy`. A point maps to
/// `(x * xx + y * xy, x * yx + y * yy)`.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct Transform([i16; 4]);

impl Transform {
    pub fn apply(&self, point: &mut Point) {
        let [xx, yx, xy, yy] = self.0;
        let (x, y) = (point.x, point.y);
        point.x = mul_2dot14(x, xx).wrapping_add(mul_2dot14(y, xy));
        point.y = mul_2dot14(x, yx).wrapping_add(mul_2dot14(y, yy));
    }
}

/// Multiplies by a 2.14 value, rounding the 14 fractional bits.
fn mul_2dot14(value: i32, factor: i16) -> i32 {
    ((value as i64 * factor as i64 + 0x2000) >> 14) as i32
}

/// A single reference to another glyph.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct Component {
    pub flags: ComponentFlags,
    pub glyph_id: GlyphId,
    /// Offset in font units.
    pub dx: i32,
    pub dy: i32,
    pub transform: Option<Transform>,
}

/// Iterator over the components of a composite glyph.
///
/// Once exhausted, [`Components::instructions`] returns the program that
/// follows the final component.
pub struct Components<'a> {
    glyph_id: GlyphId,
    cursor: Cursor<'a>,
    done: bool,
    have_instructions: bool,
}

impl<'a> Components<'a> {
    pub fn new(glyph_id: GlyphId, data: &'a [u8]) -> Self {
        let mut cursor = FontData::new(data).cursor();
        cursor.advance_by(GLYPH_HEADER_LEN);
        Self {
            glyph_id,
            cursor,
            done: false,
            have_instructions: false,
        }
    }

    /// Returns the program for the composite glyph, if any of the components
    /// signaled one.
    pub fn instructions(mut self) -> Result<&'a [u8], LoadError> {
        while self.next().transpose()?.is_some() {}
        if !self.have_instructions {
            return Ok(&[]);
        }
        let truncated = |_| LoadError::UnexpectedEndOfGlyph(self.glyph_id);
        let len = self.cursor.read::<u16>().map_err(truncated)? as usize;
        self.cursor.read_bytes(len).map_err(truncated)
    }

    fn read_component(&mut self) -> Result<Component, LoadError> {
        let glyph_id = self.glyph_id;
        let truncated = |_| LoadError::UnexpectedEndOfGlyph(glyph_id);
        let cursor = &mut self.cursor;
        let flags = ComponentFlags::from_bits(cursor.read::<u16>().map_err(truncated)?);
        let component_id = GlyphId::new(cursor.read::<u16>().map_err(truncated)?);
        let (dx, dy) = if flags.contains(ComponentFlags::ARG_1_AND_2_ARE_WORDS) {
            (
                cursor.read::<i16>().map_err(truncated)? as i32,
                cursor.read::<i16>().map_err(truncated)? as i32,
            )
        } else {
            (
                cursor.read::<i8>().map_err(truncated)? as i32,
                cursor.read::<i8>().map_err(truncated)? as i32,
            )
        };
        if !flags.contains(ComponentFlags::ARGS_ARE_XY_VALUES) {
            return Err(LoadError::AnchorPointsUnsupported(glyph_id));
        }
        let mut read_f2dot14 = || cursor.read::<i16>().map_err(truncated);
        let transform = if flags.contains(ComponentFlags::WE_HAVE_A_SCALE) {
            let scale = read_f2dot14()?;
            Some([scale, 0, 0, scale])
        } else if flags.contains(ComponentFlags::WE_HAVE_AN_X_AND_Y_SCALE) {
            let x_scale = read_f2dot14()?;
            let y_scale = read_f2dot14()?;
            Some([x_scale, 0, 0, y_scale])
        } else if flags.contains(ComponentFlags::WE_HAVE_A_TWO_BY_TWO) {
            Some([
                read_f2dot14()?,
                read_f2dot14()?,
                read_f2dot14()?,
                read_f2dot14()?,
            ])
        } else {
            None
        };
        Ok(Component {
            flags,
            glyph_id: component_id,
            dx,
            dy,
            transform: transform.map(Transform),
        })
    }
}

impl Iterator for Components<'_> {
    type Item = Result<Component, LoadError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let component = self.read_component();
        match &component {
            Ok(component) => {
                self.have_instructions |= component
                    .flags
                    .contains(ComponentFlags::WE_HAVE_INSTRUCTIONS);
                self.done = !component.flags.contains(ComponentFlags::MORE_COMPONENTS);
            }
            Err(_) => self.done = true,
        }
        Some(component)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::point::PointFlags;

    const HEADER: [u8; GLYPH_HEADER_LEN] = [0xFF, 0xFF, 0, 0, 0, 0, 0, 0, 0, 0];

    fn composite(records: &[u8]) -> Vec<u8> {
        let mut data = HEADER.to_vec();
        data.extend_from_slice(records);
        data
    }

    #[test]
    fn read_components() {
        #[rustfmt::skip]
        let data = composite(&[
            // words, xy values, round, scale, more
            0x00, 0x2F, 0x00, 0x03, 0x01, 0x00, 0xFF, 0x38, 0x20, 0x00,
            // bytes, xy values, x and y scale, more, instructions
            0x01, 0x62, 0x00, 0x04, 0x05, 0xFB, 0x40, 0x00, 0xE0, 0x00,
            // bytes, xy values, two by two, use my metrics
            0x02, 0x82, 0x00, 0x05, 0x00, 0x00,
            0x40, 0x00, 0x10, 0x00, 0xF0, 0x00, 0x40, 0x00,
            // program
            0x00, 0x02, 0xB0, 0x07,
        ]);
        let gid = GlyphId::new(9);
        let components = Components::new(gid, &data)
            .collect::<Result<Vec<_>, _>>()
            .unwrap();
        let summary: Vec<_> = components
            .iter()
            .map(|c| (c.glyph_id.to_u16(), c.dx, c.dy, c.transform.map(|t| t.0)))
            .collect();
        assert_eq!(
            summary,
            [
                (3, 256, -200, Some([0x2000, 0, 0, 0x2000])),
                (4, 5, -5, Some([0x4000, 0, 0, -0x2000])),
                (5, 0, 0, Some([0x4000, 0x1000, -0x1000, 0x4000])),
            ]
        );
        assert!(components[0]
            .flags
            .contains(ComponentFlags::ROUND_XY_TO_GRID));
        assert!(components[2].flags.contains(ComponentFlags::USE_MY_METRICS));
        let program = Components::new(gid, &data).instructions().unwrap();
        assert_eq!(program, &[0xB0, 0x07]);
    }

    #[test]
    fn no_instructions_without_flag() {
        // A trailing program is ignored when no component signals it.
        let data = composite(&[0x00, 0x02, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0xB0]);
        let program = Components::new(GlyphId::new(1), &data)
            .instructions()
            .unwrap();
        assert!(program.is_empty());
    }

    #[test]
    fn anchor_points_unsupported() {
        let data = composite(&[0x00, 0x00, 0x00, 0x01, 0x02, 0x03]);
        let gid = GlyphId::new(2);
        let mut components = Components::new(gid, &data);
        assert_eq!(
            components.next(),
            Some(Err(LoadError::AnchorPointsUnsupported(gid)))
        );
        assert_eq!(components.next(), None);
    }

    #[test]
    fn truncated() {
        let data = composite(&[0x00, 0x22, 0x00, 0x01, 0x00]);
        let gid = GlyphId::new(2);
        let result: Result<Vec<_>, _> = Components::new(gid, &data).collect();
        assert_eq!(result, Err(LoadError::UnexpectedEndOfGlyph(gid)));
    }

    #[test]
    fn transform_rounds_each_term() {
        let mut point = Point::new(100, -30, PointFlags::on_curve());
        // Half scale, with a skew of a quarter in x.
        Transform([0x2000, 0, 0x1000, 0x2000]).apply(&mut point);
        // 50 + round(-7.5) and round(-15)
        assert_eq!((point.x, point.y), (50 - 7, -15));
    }
}
