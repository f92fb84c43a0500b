//! Decoding of simple glyph records.

use super::GlyphBuf;
use crate::{
    error::LoadError,
    font::GlyphId,
    font_data::FontData,
    point::{Point, PointFlags},
};

/// Size of the contour count and bounding box that begin every glyph record.
pub(super) const GLYPH_HEADER_LEN: usize = 10;

// Flags for each point.
const ON_CURVE_POINT: u8 = 0x01;
const X_SHORT_VECTOR: u8 = 0x02;
const Y_SHORT_VECTOR: u8 = 0x04;
const REPEAT_FLAG: u8 = 0x08;
const X_IS_SAME_OR_POSITIVE_X_SHORT_VECTOR: u8 = 0x10;
const Y_IS_SAME_OR_POSITIVE_Y_SHORT_VECTOR: u8 = 0x20;

impl GlyphBuf {
    /// Decodes a simple glyph, appending its points in font units and its
    /// contour ends relative to the first point of the glyph.
    ///
    /// Returns the glyph program.
    pub(super) fn read_simple<'a>(
        &mut self,
        glyph_id: GlyphId,
        data: &'a [u8],
        contour_count: usize,
    ) -> Result<&'a [u8], LoadError> {
        let truncated = |_| LoadError::UnexpectedEndOfGlyph(glyph_id);
        let mut cursor = FontData::new(data).cursor();
        cursor.advance_by(GLYPH_HEADER_LEN);
        let mut num_points = 0;
        for _ in 0..contour_count {
            let end = cursor.read::<u16>().map_err(truncated)? as usize + 1;
            if end < num_points {
                return Err(LoadError::InvalidContourEnds(glyph_id));
            }
            self.contours.push(end);
            num_points = end;
        }
        let instruction_len = cursor.read::<u16>().map_err(truncated)? as usize;
        let instructions = cursor.read_bytes(instruction_len).map_err(truncated)?;
        self.flags.clear();
        while self.flags.len() < num_points {
            let flag = cursor.read::<u8>().map_err(truncated)?;
            let count = if flag & REPEAT_FLAG != 0 {
                cursor.read::<u8>().map_err(truncated)? as usize + 1
            } else {
                1
            };
            if self.flags.len() + count > num_points {
                return Err(LoadError::InvalidPointFlags(glyph_id));
            }
            self.flags.extend(core::iter::repeat(flag).take(count));
        }
        let start = self.points.len();
        self.points.extend(
            self.flags
                .iter()
                .map(|flag| Point::new(0, 0, PointFlags::from_bits(flag & ON_CURVE_POINT))),
        );
        let points = &mut self.points[start..];
        // Coordinates are deltas from the previous point with 16-bit
        // wrapping.
        let mut x = 0i16;
        for (point, &flag) in points.iter_mut().zip(&self.flags) {
            if flag & X_SHORT_VECTOR != 0 {
                let dx = cursor.read::<u8>().map_err(truncated)? as i16;
                if flag & X_IS_SAME_OR_POSITIVE_X_SHORT_VECTOR != 0 {
                    x = x.wrapping_add(dx);
                } else {
                    x = x.wrapping_sub(dx);
                }
            } else if flag & X_IS_SAME_OR_POSITIVE_X_SHORT_VECTOR == 0 {
                x = x.wrapping_add(cursor.read::<i16>().map_err(truncated)?);
            }
            point.x = x as i32;
        }
        let mut y = 0i16;
        for (point, &flag) in points.iter_mut().zip(&self.flags) {
            if flag & Y_SHORT_VECTOR != 0 {
                let dy = cursor.read::<u8>().map_err(truncated)? as i16;
                if flag & Y_IS_SAME_OR_POSITIVE_Y_SHORT_VECTOR != 0 {
                    y = y.wrapping_add(dy);
                } else {
                    y = y.wrapping_sub(dy);
                }
            } else if flag & Y_IS_SAME_OR_POSITIVE_Y_SHORT_VECTOR == 0 {
                y = y.wrapping_add(cursor.read::<i16>().map_err(truncated)?);
            }
            point.y = y as i32;
        }
        Ok(instructions)
    }
}
