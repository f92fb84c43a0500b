//! Managing outlines.
//!
//! See <https://learn.microsoft.com/en-us/typography/opentype/spec/tt_instructions#managing-outlines>
//! and <https://learn.microsoft.com/en-us/typography/opentype/spec/tt_instructions#moving-points>

use super::{
    super::{math::mul_div, zone::ZonePointer},
    Engine, HintErrorKind, OpResult,
};
use crate::point::CoordAxis;

impl<'a> Engine<'a> {
    /// Flip point.
    ///
    /// FLIPPT[] (0x80)
    ///
    /// Pops: p: point number (uint32)
    ///
    /// Uses the loop counter. Always operates on the glyph zone.
    ///
    /// See <https://learn.microsoft.com/en-us/typography/opentype/spec/tt_instructions#flip-point>
    pub(super) fn op_flippt(&mut self) -> OpResult {
        self.for_each_looped_point(|engine, point_ix| {
            engine
                .zone_mut(ZonePointer::Glyph)
                .flip_on_curve(point_ix)
        })
    }

    /// Flip range on.
    ///
    /// FLIPRGON[] (0x81)
    ///
    /// Pops: highpoint: highest point number in range of points to be flipped
    ///       lowpoint: lowest point number in range of points to be flipped
    ///
    /// See <https://learn.microsoft.com/en-us/typography/opentype/spec/tt_instructions#flip-range-on>
    pub(super) fn op_fliprgon(&mut self) -> OpResult {
        self.set_on_curve_for_range(true)
    }

    /// Flip range off.
    ///
    /// FLIPRGOFF[] (0x82)
    ///
    /// See <https://learn.microsoft.com/en-us/typography/opentype/spec/tt_instructions#flip-range-off>
    pub(super) fn op_fliprgoff(&mut self) -> OpResult {
        self.set_on_curve_for_range(false)
    }

    fn set_on_curve_for_range(&mut self, on: bool) -> OpResult {
        let high_point = self.value_stack.pop_usize()?;
        let low_point = self.value_stack.pop_usize()?;
        self.zone_mut(ZonePointer::Glyph)
            .set_on_curve(low_point, high_point, on)
    }

    /// Shift point by the last point.
    ///
    /// SHP\[a\] (0x32 - 0x33)
    ///
    /// Pops: p: point to be shifted
    ///
    /// Uses the loop counter. Points in zp2 are shifted by the distance the
    /// reference point has moved from its original position.
    ///
    /// See <https://learn.microsoft.com/en-us/typography/opentype/spec/tt_instructions#shift-point-by-the-last-point>
    pub(super) fn op_shp(&mut self, opcode: u8) -> OpResult {
        let (_, _, displacement) = self.displacement(opcode)?;
        let zp2 = self.graphics.zp2;
        self.for_each_looped_point(|engine, point_ix| {
            engine.move_point(zp2, point_ix, displacement, true)
        })
    }

    /// Shift contour by the last point.
    ///
    /// SHC\[a\] (0x34 - 0x35)
    ///
    /// Pops: c: contour to be shifted
    ///
    /// The reference point is not moved if it belongs to the contour.
    ///
    /// See <https://learn.microsoft.com/en-us/typography/opentype/spec/tt_instructions#shift-contour-by-the-last-point>
    pub(super) fn op_shc(&mut self, opcode: u8) -> OpResult {
        let contour_ix = self.value_stack.pop_usize()?;
        let (ref_zone, ref_ix, displacement) = self.displacement(opcode)?;
        let zp2 = self.graphics.zp2;
        if zp2.is_twilight() {
            return Err(HintErrorKind::UnsupportedTwilightShift);
        }
        let contour = self.zone(zp2).contour(contour_ix)?;
        for point_ix in contour {
            if ref_zone != zp2 || point_ix != ref_ix {
                self.move_point(zp2, point_ix, displacement, true)?;
            }
        }
        Ok(())
    }

    /// Shift zone by the last point.
    ///
    /// SHZ\[a\] (0x36 - 0x37)
    ///
    /// Pops: e: zone to be shifted
    ///
    /// The zone operand is ignored and every point in zp2 is shifted instead.
    /// Phantom points are left in place and nothing is marked as touched.
    ///
    /// See <https://learn.microsoft.com/en-us/typography/opentype/spec/tt_instructions#shift-zone-by-the-last-pt>
    pub(super) fn op_shz(&mut self, opcode: u8) -> OpResult {
        self.value_stack.pop()?;
        let (ref_zone, ref_ix, displacement) = self.displacement(opcode)?;
        let zp2 = self.graphics.zp2;
        let mut limit = self.zone(zp2).len();
        if !zp2.is_twilight() {
            limit = limit.saturating_sub(4);
        }
        for point_ix in 0..limit {
            if ref_zone != zp2 || point_ix != ref_ix {
                self.move_point(zp2, point_ix, displacement, false)?;
            }
        }
        Ok(())
    }

    /// Shift point by a pixel amount.
    ///
    /// SHPIX[] (0x38)
    ///
    /// Pops: amount: magnitude of the shift (F26Dot6)
    ///       p1, p2,.. pn: points to be shifted
    ///
    /// Uses the loop counter.
    ///
    /// See <https://learn.microsoft.com/en-us/typography/opentype/spec/tt_instructions#shift-point-by-a-pixel-amount>
    pub(super) fn op_shpix(&mut self) -> OpResult {
        if self.value_stack.len() < self.graphics.loop_counter as usize + 1 {
            return Err(HintErrorKind::ValueStackUnderflow);
        }
        let amount = self.value_stack.pop()?;
        let zp2 = self.graphics.zp2;
        self.for_each_looped_point(|engine, point_ix| {
            engine.move_point(zp2, point_ix, amount, true)
        })
    }

    /// Move stack indirect relative point.
    ///
    /// MSIRP\[a\] (0x3A - 0x3B)
    ///
    /// Pops: d: distance (F26Dot6)
    ///       p: point number
    ///
    /// Moves p in zp1 so that its distance from rp0 in zp0 is d.
    ///
    /// See <https://learn.microsoft.com/en-us/typography/opentype/spec/tt_instructions#move-stack-indirect-relative-point>
    pub(super) fn op_msirp(&mut self, opcode: u8) -> OpResult {
        let distance = self.value_stack.pop()?;
        let point_ix = self.value_stack.pop_usize()?;
        let gs = &self.graphics;
        let (zp0, zp1, rp0) = (gs.zp0, gs.zp1, gs.rp0);
        let reference = self.zone(zp0).point(rp0)?;
        let point = self.zone(zp1).point(point_ix)?;
        let current_distance = self.project(point, reference);
        if opcode & 1 != 0 {
            self.graphics.rp0 = point_ix;
        }
        self.graphics.rp1 = self.graphics.rp0;
        self.graphics.rp2 = point_ix;
        self.move_point(zp1, point_ix, distance.wrapping_sub(current_distance), true)
    }

    /// Move direct absolute point.
    ///
    /// MDAP\[a\] (0x2E - 0x2F)
    ///
    /// Pops: p: point number
    ///
    /// Touches the point in zp0 and, when the low bit is set, rounds its
    /// projection. Sets rp0 and rp1 to the point.
    ///
    /// See <https://learn.microsoft.com/en-us/typography/opentype/spec/tt_instructions#move-direct-absolute-point>
    pub(super) fn op_mdap(&mut self, opcode: u8) -> OpResult {
        let point_ix = self.value_stack.pop_usize()?;
        let zp0 = self.graphics.zp0;
        let point = self.zone(zp0).point(point_ix)?;
        let distance = if opcode & 1 != 0 {
            let projection = self.graphics.proj_vector.dot(point.x, point.y).to_bits();
            self.round(projection).wrapping_sub(projection)
        } else {
            0
        };
        self.move_point(zp0, point_ix, distance, true)?;
        self.graphics.rp0 = point_ix;
        self.graphics.rp1 = point_ix;
        Ok(())
    }

    /// Move indirect absolute point.
    ///
    /// MIAP\[a\] (0x3E - 0x3F)
    ///
    /// Pops: n: CVT entry number
    ///       p: point number
    ///
    /// Moves the point in zp0 so that its projection is the CVT value. In
    /// the twilight zone the point is first placed along the freedom vector
    /// at that distance from the origin.
    ///
    /// See <https://learn.microsoft.com/en-us/typography/opentype/spec/tt_instructions#move-indirect-absolute-point>
    pub(super) fn op_miap(&mut self, opcode: u8) -> OpResult {
        let cvt_ix = self.value_stack.pop_usize()?;
        let point_ix = self.value_stack.pop_usize()?;
        let mut distance = self.cvt_get(cvt_ix)?;
        let zp0 = self.graphics.zp0;
        if zp0.is_twilight() {
            let fv = self.graphics.freedom_vector;
            let x = ((distance as i64 * fv.x.to_bits() as i64) >> 14) as i32;
            let y = ((distance as i64 * fv.y.to_bits() as i64) >> 14) as i32;
            let zone = self.zone_mut(zp0);
            let original = zone.original_mut(point_ix)?;
            original.x = x;
            original.y = y;
            let point = zone.point_mut(point_ix)?;
            point.x = x;
            point.y = y;
        }
        let point = self.zone(zp0).point(point_ix)?;
        let original_distance = self.graphics.proj_vector.dot(point.x, point.y).to_bits();
        if opcode & 1 != 0 {
            if distance.wrapping_sub(original_distance).wrapping_abs()
                > self.graphics.control_value_cutin
            {
                distance = original_distance;
            }
            distance = self.round(distance);
        }
        self.move_point(zp0, point_ix, distance.wrapping_sub(original_distance), true)?;
        self.graphics.rp0 = point_ix;
        self.graphics.rp1 = point_ix;
        Ok(())
    }

    /// Move direct relative point.
    ///
    /// MDRP\[abcde\] (0xC0 - 0xDF)
    ///
    /// Pops: p: point number
    ///
    /// Preserves the original distance between p in zp1 and rp0 in zp0,
    /// subject to the flags:
    ///
    /// * 0x10: set rp0 to p after the move
    /// * 0x08: keep the distance greater than or equal to the minimum distance
    /// * 0x04: round the distance
    ///
    /// The low two bits select a distance type that is not used.
    ///
    /// See <https://learn.microsoft.com/en-us/typography/opentype/spec/tt_instructions#move-direct-relative-point>
    pub(super) fn op_mdrp(&mut self, opcode: u8) -> OpResult {
        let point_ix = self.value_stack.pop_usize()?;
        let gs = &self.graphics;
        let (zp0, zp1, rp0) = (gs.zp0, gs.zp1, gs.rp0);
        let reference = self.zone(zp0).point(rp0)?;
        let point = self.zone(zp1).point(point_ix)?;
        let mut original_distance = if zp0.is_twilight() || zp1.is_twilight() {
            let p = self.zone(zp1).original(point_ix)?;
            let r = self.zone(zp0).original(rp0)?;
            self.dual_project(p, r)
        } else {
            let p = self.zone(zp1).unscaled(point_ix)?;
            let r = self.zone(zp0).unscaled(rp0)?;
            let distance = self.dual_project(p, r);
            self.font.scale(distance, self.scale)
        };
        original_distance = self.apply_single_width(original_distance);
        let mut distance = original_distance;
        if opcode & 4 != 0 {
            distance = self.round(distance);
        }
        if opcode & 8 != 0 {
            distance = self.apply_min_distance(original_distance, distance);
        }
        self.graphics.rp1 = rp0;
        self.graphics.rp2 = point_ix;
        if opcode & 16 != 0 {
            self.graphics.rp0 = point_ix;
        }
        let current_distance = self.project(point, reference);
        self.move_point(zp1, point_ix, distance.wrapping_sub(current_distance), true)
    }

    /// Move indirect relative point.
    ///
    /// MIRP\[abcde\] (0xE0 - 0xFF)
    ///
    /// Pops: n: CVT entry number
    ///       p: point number
    ///
    /// Moves p in zp1 so that its distance from rp0 in zp0 is the CVT value,
    /// subject to the same flags as MDRP. With rounding enabled, the CVT
    /// value is replaced by the original distance when they differ by more
    /// than the control value cut in.
    ///
    /// See <https://learn.microsoft.com/en-us/typography/opentype/spec/tt_instructions#move-indirect-relative-point>
    pub(super) fn op_mirp(&mut self, opcode: u8) -> OpResult {
        let cvt_ix = self.value_stack.pop_usize()?;
        let point_ix = self.value_stack.pop_usize()?;
        let mut cvt_distance = self.cvt_get(cvt_ix)?;
        cvt_distance = self.apply_single_width(cvt_distance);
        let gs = &self.graphics;
        let (zp0, zp1, rp0) = (gs.zp0, gs.zp1, gs.rp0);
        if zp1.is_twilight() {
            return Err(HintErrorKind::UnsupportedTwilightIndirectMove);
        }
        let original_distance = {
            let p = self.zone(zp1).original(point_ix)?;
            let r = self.zone(zp0).original(rp0)?;
            self.dual_project(p, r)
        };
        let current_distance = {
            let p = self.zone(zp1).point(point_ix)?;
            let r = self.zone(zp0).point(rp0)?;
            self.project(p, r)
        };
        if self.graphics.auto_flip && (original_distance ^ cvt_distance) < 0 {
            cvt_distance = cvt_distance.wrapping_neg();
        }
        let mut distance = cvt_distance;
        if opcode & 4 != 0 {
            if zp0 == zp1
                && cvt_distance.wrapping_sub(original_distance).wrapping_abs()
                    > self.graphics.control_value_cutin
            {
                distance = original_distance;
            }
            distance = self.round(distance);
        }
        if opcode & 8 != 0 {
            distance = self.apply_min_distance(original_distance, distance);
        }
        self.graphics.rp1 = rp0;
        self.graphics.rp2 = point_ix;
        if opcode & 16 != 0 {
            self.graphics.rp0 = point_ix;
        }
        self.move_point(zp1, point_ix, distance.wrapping_sub(current_distance), true)
    }

    /// Align to reference point.
    ///
    /// ALIGNRP[] (0x3C)
    ///
    /// Pops: p: point number (uint32)
    ///
    /// Uses the loop counter. Moves each point in zp1 onto rp0 in zp0 along
    /// the projection vector.
    ///
    /// See <https://learn.microsoft.com/en-us/typography/opentype/spec/tt_instructions#align-to-reference-point>
    pub(super) fn op_alignrp(&mut self) -> OpResult {
        let gs = &self.graphics;
        let (zp0, zp1, rp0) = (gs.zp0, gs.zp1, gs.rp0);
        let reference = self.zone(zp0).point(rp0)?;
        self.for_each_looped_point(|engine, point_ix| {
            let point = engine.zone(zp1).point(point_ix)?;
            let distance = engine.project(point, reference);
            engine.move_point(zp1, point_ix, distance.wrapping_neg(), true)
        })
    }

    /// Move point to intersection of two lines.
    ///
    /// ISECT[] (0x0F)
    ///
    /// Pops: b1: end point of line 2
    ///       b0: start point of line 2
    ///       a1: end point of line 1
    ///       a0: start point of line 1
    ///       p: point to move
    ///
    /// Line 1 is in zp1, line 2 in zp0 and the point in zp2. Nearly parallel
    /// lines place the point at the average of the four end points.
    ///
    /// See <https://learn.microsoft.com/en-us/typography/opentype/spec/tt_instructions#moves-point-p-to-the-intersection-of-two-lines>
    pub(super) fn op_isect(&mut self) -> OpResult {
        let b1_ix = self.value_stack.pop_usize()?;
        let b0_ix = self.value_stack.pop_usize()?;
        let a1_ix = self.value_stack.pop_usize()?;
        let a0_ix = self.value_stack.pop_usize()?;
        let point_ix = self.value_stack.pop_usize()?;
        let gs = &self.graphics;
        let (zp0, zp1, zp2) = (gs.zp0, gs.zp1, gs.zp2);
        let a0 = self.zone(zp1).point(a0_ix)?;
        let a1 = self.zone(zp1).point(a1_ix)?;
        let b0 = self.zone(zp0).point(b0_ix)?;
        let b1 = self.zone(zp0).point(b1_ix)?;
        let (dbx, dby) = (b1.x as i64 - b0.x as i64, b1.y as i64 - b0.y as i64);
        let (dax, day) = (a1.x as i64 - a0.x as i64, a1.y as i64 - a0.y as i64);
        let (dx, dy) = (b0.x as i64 - a0.x as i64, b0.y as i64 - a0.y as i64);
        let discriminant = mul_div(dax, -dby, 64) + mul_div(day, dbx, 64);
        let dot_product = mul_div(dax, dbx, 64) + mul_div(day, dby, 64);
        // Reject intersections at angles under about 3 degrees, where
        // |tan(angle)| < 1/19.
        let (x, y) = if 19 * discriminant.abs() > dot_product.abs() {
            let v = mul_div(dx, -dby, 64) + mul_div(dy, dbx, 64);
            let x = mul_div(v, dax, discriminant);
            let y = mul_div(v, day, discriminant);
            (a0.x.wrapping_add(x as i32), a0.y.wrapping_add(y as i32))
        } else {
            (
                ((a0.x as i64 + a1.x as i64 + b0.x as i64 + b1.x as i64) / 4) as i32,
                ((a0.y as i64 + a1.y as i64 + b0.y as i64 + b1.y as i64) / 4) as i32,
            )
        };
        let zone = self.zone_mut(zp2);
        let point = zone.point_mut(point_ix)?;
        point.x = x;
        point.y = y;
        zone.touch(point_ix, CoordAxis::X)?;
        zone.touch(point_ix, CoordAxis::Y)
    }

    /// Align points.
    ///
    /// ALIGNPTS[] (0x27)
    ///
    /// Pops: p2: point number (zp0)
    ///       p1: point number (zp1)
    ///
    /// Both points move halfway towards each other along the freedom
    /// vector.
    ///
    /// See <https://learn.microsoft.com/en-us/typography/opentype/spec/tt_instructions#align-points>
    pub(super) fn op_alignpts(&mut self) -> OpResult {
        let p2_ix = self.value_stack.pop_usize()?;
        let p1_ix = self.value_stack.pop_usize()?;
        let (zp0, zp1) = (self.graphics.zp0, self.graphics.zp1);
        let p1 = self.zone(zp1).point(p1_ix)?;
        let p2 = self.zone(zp0).point(p2_ix)?;
        let distance = self.project(p2, p1) / 2;
        self.move_point(zp1, p1_ix, distance, true)?;
        self.move_point(zp0, p2_ix, distance.wrapping_neg(), true)
    }

    /// Interpolate point by the last relative stretch.
    ///
    /// IP[] (0x39)
    ///
    /// Pops: p: point number
    ///
    /// Uses the loop counter. Each point in zp2 keeps its relative position
    /// between rp1 in zp0 and rp2 in zp1. Original positions come from the
    /// unscaled outline unless a twilight zone is involved.
    ///
    /// See <https://learn.microsoft.com/en-us/typography/opentype/spec/tt_instructions#interpolate-point-by-the-last-relative-stretch>
    pub(super) fn op_ip(&mut self) -> OpResult {
        let gs = &self.graphics;
        let (zp0, zp1, zp2) = (gs.zp0, gs.zp1, gs.zp2);
        let (rp1, rp2) = (gs.rp1, gs.rp2);
        let use_unscaled = !(zp0.is_twilight() || zp1.is_twilight() || zp2.is_twilight());
        let original_base = self.original_point(zp0, rp1, use_unscaled)?;
        let original_range =
            self.dual_project(self.original_point(zp1, rp2, use_unscaled)?, original_base);
        let current_base = self.zone(zp0).point(rp1)?;
        let current_range = self.project(self.zone(zp1).point(rp2)?, current_base);
        self.for_each_looped_point(|engine, point_ix| {
            let original_distance = engine.dual_project(
                engine.original_point(zp2, point_ix, use_unscaled)?,
                original_base,
            );
            let current_distance = engine.project(engine.zone(zp2).point(point_ix)?, current_base);
            let new_distance = if original_distance == 0 {
                0
            } else if original_range != 0 {
                mul_div(
                    original_distance as i64,
                    current_range as i64,
                    original_range as i64,
                ) as i32
            } else {
                original_distance.wrapping_neg()
            };
            engine.move_point(
                zp2,
                point_ix,
                new_distance.wrapping_sub(current_distance),
                true,
            )
        })
    }

    /// Untouch point.
    ///
    /// UTP[] (0x29)
    ///
    /// Pops: p: point number (uint32)
    ///
    /// Clears the touched markers for both axes.
    ///
    /// See <https://learn.microsoft.com/en-us/typography/opentype/spec/tt_instructions#untouch-point>
    pub(super) fn op_utp(&mut self) -> OpResult {
        let point_ix = self.value_stack.pop_usize()?;
        let zp0 = self.graphics.zp0;
        self.zone_mut(zp0).untouch(point_ix)
    }

    /// Interpolate untouched points through the outline.
    ///
    /// IUP\[a\] (0x30 - 0x31)
    ///
    /// IUP[0] interpolates in the y direction and IUP[1] in the x direction.
    ///
    /// See <https://learn.microsoft.com/en-us/typography/opentype/spec/tt_instructions#interpolate-untouched-points-through-the-outline>
    pub(super) fn op_iup(&mut self, opcode: u8) -> OpResult {
        let axis = if opcode & 1 != 0 {
            CoordAxis::X
        } else {
            CoordAxis::Y
        };
        self.zone_mut(ZonePointer::Glyph).iup(axis);
        Ok(())
    }

    /// Returns the original position of a point, from the unscaled outline
    /// if requested.
    fn original_point(
        &self,
        zone: ZonePointer,
        point_ix: usize,
        unscaled: bool,
    ) -> Result<crate::point::Point, HintErrorKind> {
        if unscaled {
            self.zone(zone).unscaled(point_ix)
        } else {
            self.zone(zone).original(point_ix)
        }
    }

    /// Returns the zone and index of the reference point used by the shift
    /// instructions along with the distance it has moved from its original
    /// position.
    ///
    /// The low bit of the opcode selects rp1 in zp0 rather than rp2 in zp1.
    fn displacement(&self, opcode: u8) -> Result<(ZonePointer, usize, i32), HintErrorKind> {
        let gs = &self.graphics;
        let (zone, point_ix) = if opcode & 1 == 0 {
            (gs.zp1, gs.rp2)
        } else {
            (gs.zp0, gs.rp1)
        };
        let z = self.zone(zone);
        let distance = self.project(z.point(point_ix)?, z.original(point_ix)?);
        Ok((zone, point_ix, distance))
    }

    /// Snaps a distance to the single width value when close enough.
    fn apply_single_width(&self, distance: i32) -> i32 {
        let single_width = self.graphics.single_width;
        if distance.wrapping_sub(single_width).wrapping_abs() < self.graphics.single_width_cutin {
            if distance >= 0 {
                single_width
            } else {
                -single_width
            }
        } else {
            distance
        }
    }

    /// Clamps `distance` away from zero by the minimum distance, keeping
    /// the sign of `original_distance`.
    fn apply_min_distance(&self, original_distance: i32, distance: i32) -> i32 {
        let min_distance = self.graphics.min_distance;
        if original_distance >= 0 {
            distance.max(min_distance)
        } else {
            distance.min(-min_distance)
        }
    }
}
