//! Managing the graphics state.
//!
//! See <https://learn.microsoft.com/en-us/typography/opentype/spec/tt_instructions#managing-the-graphics-state>

use super::{
    super::{math::UnitVector, zone::ZonePointer},
    Engine, HintErrorKind, OpResult,
};

impl<'a> Engine<'a> {
    /// Set vectors to coordinate axis.
    ///
    /// SVTCA\[a\] (0x00 - 0x01), SPVTCA\[a\] (0x02 - 0x03) and
    /// SFVTCA\[a\] (0x04 - 0x05)
    ///
    /// Sets the projection vector, freedom vector or both to the y axis when
    /// the low bit is clear or the x axis when it is set. The dual projection
    /// vector follows the projection vector.
    ///
    /// See <https://learn.microsoft.com/en-us/typography/opentype/spec/tt_instructions#set-freedom-and-projection-vectors-to-coordinate-axis>
    pub(super) fn op_svtca(&mut self, opcode: u8) -> OpResult {
        let axis = if opcode & 1 != 0 {
            UnitVector::X_AXIS
        } else {
            UnitVector::Y_AXIS
        };
        let (set_pv, set_fv) = match opcode >> 1 {
            0 => (true, true),
            1 => (true, false),
            _ => (false, true),
        };
        if set_pv {
            self.graphics.proj_vector = axis;
            self.graphics.dual_proj_vector = axis;
        }
        if set_fv {
            self.graphics.freedom_vector = axis;
        }
        Ok(())
    }

    /// Set vector to line.
    ///
    /// SPVTL\[a\] (0x06 - 0x07) and SFVTL\[a\] (0x08 - 0x09)
    ///
    /// Pops: p2: point number
    ///       p1: point number
    ///
    /// Sets the projection or freedom vector to the line through the current
    /// positions of p2 and p1, both in the zone referenced by zp0. When the
    /// low bit is set the vector is rotated 90 degrees counter clockwise.
    ///
    /// See <https://learn.microsoft.com/en-us/typography/opentype/spec/tt_instructions#set-projection-vector-to-line>
    pub(super) fn op_svtl(&mut self, opcode: u8) -> OpResult {
        let p2_ix = self.value_stack.pop_usize()?;
        let p1_ix = self.value_stack.pop_usize()?;
        let zone = self.zone(self.graphics.zp0);
        let p1 = zone.point(p1_ix)?;
        let p2 = zone.point(p2_ix)?;
        let vector = UnitVector::from_line(
            p1.x.wrapping_sub(p2.x),
            p1.y.wrapping_sub(p2.y),
            opcode & 1 != 0,
        );
        if opcode < super::super::opcodes::SFVTL0 {
            self.graphics.proj_vector = vector;
            self.graphics.dual_proj_vector = vector;
        } else {
            self.graphics.freedom_vector = vector;
        }
        Ok(())
    }

    /// Set projection vector from stack.
    ///
    /// SPVFS[] (0x0A)
    ///
    /// Pops: y: y component of projection vector (2.14 padded with zeroes)
    ///       x: x component of projection vector (2.14 padded with zeroes)
    ///
    /// See <https://learn.microsoft.com/en-us/typography/opentype/spec/tt_instructions#set-projection-vector-from-stack>
    pub(super) fn op_spvfs(&mut self) -> OpResult {
        let vector = self.pop_vector()?;
        self.graphics.proj_vector = vector;
        self.graphics.dual_proj_vector = vector;
        Ok(())
    }

    /// Set freedom vector from stack.
    ///
    /// SFVFS[] (0x0B)
    ///
    /// Pops: y: y component of freedom vector (2.14 padded with zeroes)
    ///       x: x component of freedom vector (2.14 padded with zeroes)
    ///
    /// See <https://learn.microsoft.com/en-us/typography/opentype/spec/tt_instructions#set-freedom-vector-from-stack>
    pub(super) fn op_sfvfs(&mut self) -> OpResult {
        self.graphics.freedom_vector = self.pop_vector()?;
        Ok(())
    }

    /// Get projection vector.
    ///
    /// GPV[] (0x0C)
    ///
    /// Pushes: x: x component of projection vector (2.14 padded with zeroes)
    ///         y: y component of projection vector (2.14 padded with zeroes)
    ///
    /// See <https://learn.microsoft.com/en-us/typography/opentype/spec/tt_instructions#get-projection-vector>
    pub(super) fn op_gpv(&mut self) -> OpResult {
        self.push_vector(self.graphics.proj_vector)
    }

    /// Get freedom vector.
    ///
    /// GFV[] (0x0D)
    ///
    /// See <https://learn.microsoft.com/en-us/typography/opentype/spec/tt_instructions#get-freedom-vector>
    pub(super) fn op_gfv(&mut self) -> OpResult {
        self.push_vector(self.graphics.freedom_vector)
    }

    /// Set freedom vector to projection vector.
    ///
    /// SFVTPV[] (0x0E)
    ///
    /// See <https://learn.microsoft.com/en-us/typography/opentype/spec/tt_instructions#set-freedom-vector-to-projection-vector>
    pub(super) fn op_sfvtpv(&mut self) -> OpResult {
        self.graphics.freedom_vector = self.graphics.proj_vector;
        Ok(())
    }

    /// Set dual projection vector to line.
    ///
    /// SDPVTL\[a\] (0x86 - 0x87)
    ///
    /// Pops: p2: second point number
    ///       p1: first point number
    ///
    /// The dual projection vector is computed from the original positions
    /// and the projection vector from the current positions. p1 is taken
    /// from zp1 and p2 from zp2.
    ///
    /// See <https://learn.microsoft.com/en-us/typography/opentype/spec/tt_instructions#set-dual-projection-vector-to-line>
    pub(super) fn op_sdpvtl(&mut self, opcode: u8) -> OpResult {
        let p2_ix = self.value_stack.pop_usize()?;
        let p1_ix = self.value_stack.pop_usize()?;
        let rotate = opcode & 1 != 0;
        let (zp1, zp2) = (self.graphics.zp1, self.graphics.zp2);
        let p1 = self.zone(zp1).original(p1_ix)?;
        let p2 = self.zone(zp2).original(p2_ix)?;
        let dual = UnitVector::from_line(
            p1.x.wrapping_sub(p2.x),
            p1.y.wrapping_sub(p2.y),
            rotate,
        );
        let p1 = self.zone(zp1).point(p1_ix)?;
        let p2 = self.zone(zp2).point(p2_ix)?;
        let proj = UnitVector::from_line(
            p1.x.wrapping_sub(p2.x),
            p1.y.wrapping_sub(p2.y),
            rotate,
        );
        self.graphics.dual_proj_vector = dual;
        self.graphics.proj_vector = proj;
        Ok(())
    }

    /// Set reference point.
    ///
    /// SRP0[] (0x10), SRP1[] (0x11) and SRP2[] (0x12)
    ///
    /// Pops: p: point number
    ///
    /// See <https://learn.microsoft.com/en-us/typography/opentype/spec/tt_instructions#set-reference-point-0>
    pub(super) fn op_srp(&mut self, opcode: u8) -> OpResult {
        let p = self.value_stack.pop_usize()?;
        let rp = match opcode - super::super::opcodes::SRP0 {
            0 => &mut self.graphics.rp0,
            1 => &mut self.graphics.rp1,
            _ => &mut self.graphics.rp2,
        };
        *rp = p;
        Ok(())
    }

    /// Set zone pointer.
    ///
    /// SZP0[] (0x13), SZP1[] (0x14) and SZP2[] (0x15)
    ///
    /// Pops: n: zone number
    ///
    /// See <https://learn.microsoft.com/en-us/typography/opentype/spec/tt_instructions#set-zone-pointer-0>
    pub(super) fn op_szp(&mut self, opcode: u8) -> OpResult {
        let zone = ZonePointer::try_from(self.value_stack.pop()?)?;
        let zp = match opcode - super::super::opcodes::SZP0 {
            0 => &mut self.graphics.zp0,
            1 => &mut self.graphics.zp1,
            _ => &mut self.graphics.zp2,
        };
        *zp = zone;
        Ok(())
    }

    /// Set zone pointers.
    ///
    /// SZPS[] (0x16)
    ///
    /// Pops: n: zone number
    ///
    /// See <https://learn.microsoft.com/en-us/typography/opentype/spec/tt_instructions#set-zone-pointers>
    pub(super) fn op_szps(&mut self) -> OpResult {
        let zone = ZonePointer::try_from(self.value_stack.pop()?)?;
        self.graphics.zp0 = zone;
        self.graphics.zp1 = zone;
        self.graphics.zp2 = zone;
        Ok(())
    }

    /// Set loop variable.
    ///
    /// SLOOP[] (0x17)
    ///
    /// Pops: n: value for loop graphics state variable (integer)
    ///
    /// See <https://learn.microsoft.com/en-us/typography/opentype/spec/tt_instructions#set-loop-variable>
    pub(super) fn op_sloop(&mut self) -> OpResult {
        let n = self.value_stack.pop()?;
        if n <= 0 {
            return Err(HintErrorKind::NegativeLoopCounter);
        }
        self.graphics.loop_counter = n as u32;
        Ok(())
    }

    /// SMD[] (0x1A)
    pub(super) fn op_smd(&mut self) -> OpResult {
        self.graphics.min_distance = self.value_stack.pop()?;
        Ok(())
    }

    /// SCVTCI[] (0x1D)
    pub(super) fn op_scvtci(&mut self) -> OpResult {
        self.graphics.control_value_cutin = self.value_stack.pop()?;
        Ok(())
    }

    /// SSWCI[] (0x1E)
    pub(super) fn op_sswci(&mut self) -> OpResult {
        self.graphics.single_width_cutin = self.value_stack.pop()?;
        Ok(())
    }

    /// Set single width.
    ///
    /// SSW[] (0x1F)
    ///
    /// Pops: n: value for single width value (FUnits)
    ///
    /// See <https://learn.microsoft.com/en-us/typography/opentype/spec/tt_instructions#set-single-width>
    pub(super) fn op_ssw(&mut self) -> OpResult {
        let n = self.value_stack.pop()?;
        self.graphics.single_width = self.font.scale(n, self.scale);
        Ok(())
    }

    /// Set auto flip on.
    ///
    /// FLIPON[] (0x4D)
    pub(super) fn op_flipon(&mut self) -> OpResult {
        self.graphics.auto_flip = true;
        Ok(())
    }

    /// Set auto flip off.
    ///
    /// FLIPOFF[] (0x4E)
    pub(super) fn op_flipoff(&mut self) -> OpResult {
        self.graphics.auto_flip = false;
        Ok(())
    }

    /// SDB[] (0x5E)
    pub(super) fn op_sdb(&mut self) -> OpResult {
        self.graphics.delta_base = self.value_stack.pop()?;
        Ok(())
    }

    /// Set delta shift.
    ///
    /// SDS[] (0x5F)
    ///
    /// Pops: n: value for the delta shift (0..=6)
    ///
    /// Larger shifts would make every delta step round to zero.
    ///
    /// See <https://learn.microsoft.com/en-us/typography/opentype/spec/tt_instructions#set-delta_shift-in-the-graphics-state>
    pub(super) fn op_sds(&mut self) -> OpResult {
        let n = self.value_stack.pop()?;
        if !(0..=6).contains(&n) {
            return Err(HintErrorKind::InvalidStackValue(n));
        }
        self.graphics.delta_shift = n;
        Ok(())
    }

    fn pop_vector(&mut self) -> Result<UnitVector, HintErrorKind> {
        let y = self.value_stack.pop()?;
        let x = self.value_stack.pop()?;
        Ok(UnitVector::normalize(x, y).unwrap_or(UnitVector::X_AXIS))
    }

    fn push_vector(&mut self, vector: UnitVector) -> OpResult {
        if self.value_stack.len() + 2 > self.value_stack.capacity() {
            return Err(HintErrorKind::ValueStackOverflow);
        }
        self.value_stack.push(vector.x.to_bits() as i32)?;
        self.value_stack.push(vector.y.to_bits() as i32)
    }
}
