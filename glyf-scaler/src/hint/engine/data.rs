//! Reading and writing data.
//!
//! See <https://learn.microsoft.com/en-us/typography/opentype/spec/tt_instructions#reading-and-writing-data>

use super::{super::math::dot14, Engine, OpResult};

impl<'a> Engine<'a> {
    /// Get coordinate projected onto the projection vector.
    ///
    /// GC\[a\] (0x46 - 0x47)
    ///
    /// Pops: p: point number
    /// Pushes: value: coordinate location (F26Dot6)
    ///
    /// GC[0] uses the current position and the projection vector while
    /// GC[1] uses the original position and the dual projection vector.
    ///
    /// See <https://learn.microsoft.com/en-us/typography/opentype/spec/tt_instructions#get-coordinate-projected-onto-the-projection-vector>
    pub(super) fn op_gc(&mut self, opcode: u8) -> OpResult {
        let p_ix = self.value_stack.pop_usize()?;
        let zone = self.zone(self.graphics.zp2);
        let value = if opcode & 1 == 0 {
            let p = zone.point(p_ix)?;
            dot14(p.x, p.y, self.graphics.proj_vector)
        } else {
            let p = zone.original(p_ix)?;
            dot14(p.x, p.y, self.graphics.dual_proj_vector)
        };
        self.value_stack.push(value)
    }

    /// Set coordinate from the stack using projection vector and freedom
    /// vector.
    ///
    /// SCFS[] (0x48)
    ///
    /// Pops: value: distance from origin to move point (F26Dot6)
    ///       p: point number
    ///
    /// In the twilight zone the original position is updated as well.
    ///
    /// See <https://learn.microsoft.com/en-us/typography/opentype/spec/tt_instructions#sets-coordinate-from-the-stack-using-projection-vector-and-freedom-vector>
    pub(super) fn op_scfs(&mut self) -> OpResult {
        let value = self.value_stack.pop()?;
        let p_ix = self.value_stack.pop_usize()?;
        let zp2 = self.graphics.zp2;
        let p = self.zone(zp2).point(p_ix)?;
        let projection = dot14(p.x, p.y, self.graphics.proj_vector);
        self.move_point(zp2, p_ix, value.wrapping_sub(projection), true)?;
        if zp2.is_twilight() {
            let zone = self.zone_mut(zp2);
            let p = zone.point(p_ix)?;
            let original = zone.original_mut(p_ix)?;
            original.x = p.x;
            original.y = p.y;
        }
        Ok(())
    }

    /// Measure distance.
    ///
    /// MD\[a\] (0x49 - 0x4A)
    ///
    /// Pops: p2: point number (zp1)
    ///       p1: point number (zp0)
    /// Pushes: distance (F26Dot6)
    ///
    /// MD[0] measures the current outline along the projection vector.
    /// MD[1] measures the original outline along the dual projection vector,
    /// using unscaled coordinates outside of the twilight zone.
    ///
    /// See <https://learn.microsoft.com/en-us/typography/opentype/spec/tt_instructions#measure-distance>
    pub(super) fn op_md(&mut self, opcode: u8) -> OpResult {
        let p2_ix = self.value_stack.pop_usize()?;
        let p1_ix = self.value_stack.pop_usize()?;
        let (zp0, zp1) = (self.graphics.zp0, self.graphics.zp1);
        let distance = if opcode & 1 == 0 {
            let p1 = self.zone(zp0).point(p1_ix)?;
            let p2 = self.zone(zp1).point(p2_ix)?;
            self.project(p1, p2)
        } else if zp0.is_twilight() || zp1.is_twilight() {
            let p1 = self.zone(zp0).original(p1_ix)?;
            let p2 = self.zone(zp1).original(p2_ix)?;
            self.dual_project(p1, p2)
        } else {
            let p1 = self.zone(zp0).unscaled(p1_ix)?;
            let p2 = self.zone(zp1).unscaled(p2_ix)?;
            let distance = self.dual_project(p1, p2) as i64;
            (distance * self.scale as i64 / self.font.units_per_em() as i64) as i32
        };
        self.value_stack.push(distance)
    }

    /// Measure pixels per em.
    ///
    /// MPPEM[] (0x4B) and MPS[] (0x4C)
    ///
    /// Pushes: ppem: pixels per em (uint32)
    ///
    /// The point size is reported as the pixels per em.
    ///
    /// See <https://learn.microsoft.com/en-us/typography/opentype/spec/tt_instructions#measure-pixels-per-em>
    pub(super) fn op_mppem(&mut self) -> OpResult {
        self.value_stack.push(self.scale >> 6)
    }
}
