//! Graphics state for the TrueType interpreter.

use super::{math::UnitVector, round::RoundState, zone::ZonePointer};

/// Context in which instructions are executed.
///
/// See <https://developer.apple.com/fonts/TrueType-Reference-Manual/RM04/Chap4.html>
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct GraphicsState {
    /// A unit vector whose direction establishes an axis along which
    /// distances are measured.
    ///
    /// See <https://developer.apple.com/fonts/TrueType-Reference-Manual/RM04/Chap4.html#projection%20vector>
    pub proj_vector: UnitVector,
    /// A unit vector that establishes an axis along which points can move.
    ///
    /// See <https://developer.apple.com/fonts/TrueType-Reference-Manual/RM04/Chap4.html#freedom%20vector>
    pub freedom_vector: UnitVector,
    /// A second projection vector set to a line defined by the original
    /// outline location of two points. Used when measuring distances in the
    /// scaled outline before any instructions were executed.
    ///
    /// See <https://developer.apple.com/fonts/TrueType-Reference-Manual/RM04/Chap4.html#dual%20projection%20vector>
    pub dual_proj_vector: UnitVector,
    /// Reference points.
    pub rp0: usize,
    pub rp1: usize,
    pub rp2: usize,
    /// Zone pointers.
    ///
    /// See <https://developer.apple.com/fonts/TrueType-Reference-Manual/RM04/Chap4.html#zp0>
    pub zp0: ZonePointer,
    pub zp1: ZonePointer,
    pub zp2: ZonePointer,
    /// Limits the regularizing effects of control value table entries to
    /// cases where the difference between the table value and the
    /// measurement taken from the original outline is sufficiently small.
    pub control_value_cutin: i32,
    /// Threshold below which a measured distance is replaced by the single
    /// width value.
    pub single_width_cutin: i32,
    /// Value used in place of distances close to it.
    pub single_width: i32,
    /// Base value used to calculate the range of point sizes to which a
    /// given DELTAC[] or DELTAP[] instruction will apply.
    pub delta_base: i32,
    /// Determines the range of movement and smallest magnitude of movement
    /// (the step) in a DELTAC[] or DELTAP[] instruction.
    pub delta_shift: i32,
    /// Distance to which the minimum distance bit of MDRP[] and MIRP[]
    /// clamps.
    pub min_distance: i32,
    /// Repeat count for instructions that operate on a list of points.
    pub loop_counter: u32,
    /// Determines the manner in which values are rounded.
    pub round_state: RoundState,
    /// Controls whether the sign of control value table entries will be
    /// changed to match the sign of the actual distance measurement.
    pub auto_flip: bool,
}

impl GraphicsState {
    /// Initial state before any program has run.
    pub const DEFAULT: Self = Self {
        proj_vector: UnitVector::X_AXIS,
        freedom_vector: UnitVector::X_AXIS,
        dual_proj_vector: UnitVector::X_AXIS,
        rp0: 0,
        rp1: 0,
        rp2: 0,
        zp0: ZonePointer::Glyph,
        zp1: ZonePointer::Glyph,
        zp2: ZonePointer::Glyph,
        control_value_cutin: 68,
        single_width_cutin: 0,
        single_width: 0,
        delta_base: 9,
        delta_shift: 3,
        min_distance: 64,
        loop_counter: 1,
        round_state: RoundState::GRID,
        auto_flip: true,
    };

    /// Returns the state that persists after the control value program has
    /// run.
    ///
    /// Vectors, reference points, zone pointers and the loop counter revert
    /// to their initial values. Everything else carries over to glyph
    /// programs.
    pub fn retained(&self) -> Self {
        let default = Self::DEFAULT;
        Self {
            proj_vector: default.proj_vector,
            freedom_vector: default.freedom_vector,
            dual_proj_vector: default.dual_proj_vector,
            rp0: default.rp0,
            rp1: default.rp1,
            rp2: default.rp2,
            zp0: default.zp0,
            zp1: default.zp1,
            zp2: default.zp2,
            loop_counter: default.loop_counter,
            ..*self
        }
    }

    /// Returns the zone pointer at the given index.
    pub fn zp(&self, index: usize) -> ZonePointer {
        match index {
            0 => self.zp0,
            1 => self.zp1,
            _ => self.zp2,
        }
    }
}

impl Default for GraphicsState {
    fn default() -> Self {
        Self::DEFAULT
    }
}
