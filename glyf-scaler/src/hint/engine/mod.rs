//! TrueType bytecode interpreter.

mod control_flow;
mod data;
mod definition;
mod delta;
mod dispatch;
mod graphics;
mod misc;
mod operators;
mod outline;
mod round;
mod stack;
mod store;

use super::{
    cvt::Cvt,
    definition::DefinitionMap,
    error::{HintError, HintErrorKind},
    graphics::GraphicsState,
    math::{dot14, mul_div},
    program::{Program, ProgramState},
    value_stack::ValueStack,
    zone::{Zone, ZonePointer},
};
use crate::{
    fixed::F26Dot6,
    font::{Font, GlyphId},
    point::{Point, PointMarker},
};

pub type OpResult = Result<(), HintErrorKind>;

/// TrueType hinting engine.
///
/// An engine borrows all of the mutable interpreter state from its owner
/// for the duration of a single program run.
pub struct Engine<'a> {
    font: &'a Font<'a>,
    /// Pixels per em in 26.6.
    scale: i32,
    glyph_id: Option<GlyphId>,
    program: ProgramState<'a>,
    graphics: GraphicsState,
    zones: [Zone<'a>; 2],
    value_stack: ValueStack<'a>,
    storage: &'a mut [i32],
    cvt: Cvt<'a>,
    definitions: DefinitionMap<'a>,
}

impl<'a> Engine<'a> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        font: &'a Font<'a>,
        scale: i32,
        glyph_id: Option<GlyphId>,
        program: ProgramState<'a>,
        graphics: GraphicsState,
        value_stack: ValueStack<'a>,
        storage: &'a mut [i32],
        cvt: Cvt<'a>,
        definitions: DefinitionMap<'a>,
        twilight: Zone<'a>,
        glyph: Zone<'a>,
    ) -> Self {
        Self {
            font,
            scale,
            glyph_id,
            program,
            graphics,
            zones: [twilight, glyph],
            value_stack,
            storage,
            cvt,
            definitions,
        }
    }

    /// Returns the graphics state as left by the last executed instruction.
    pub fn graphics(&self) -> &GraphicsState {
        &self.graphics
    }
}

impl<'a> Engine<'a> {
    fn zone(&self, pointer: ZonePointer) -> &Zone<'a> {
        &self.zones[pointer as usize]
    }

    fn zone_mut(&mut self, pointer: ZonePointer) -> &mut Zone<'a> {
        &mut self.zones[pointer as usize]
    }

    /// Measures the vector from `b` to `a` along the projection vector.
    fn project(&self, a: Point, b: Point) -> i32 {
        dot14(
            a.x.wrapping_sub(b.x),
            a.y.wrapping_sub(b.y),
            self.graphics.proj_vector,
        )
    }

    /// Measures the vector from `b` to `a` along the dual projection vector.
    fn dual_project(&self, a: Point, b: Point) -> i32 {
        dot14(
            a.x.wrapping_sub(b.x),
            a.y.wrapping_sub(b.y),
            self.graphics.dual_proj_vector,
        )
    }

    fn round(&self, distance: i32) -> i32 {
        self.graphics
            .round_state
            .round(F26Dot6::from_bits(distance))
            .to_bits()
    }

    /// Moves a point along the freedom vector so that its projection moves
    /// by `distance`.
    fn move_point(
        &mut self,
        zone: ZonePointer,
        point_ix: usize,
        distance: i32,
        touch: bool,
    ) -> OpResult {
        let fv = self.graphics.freedom_vector;
        let pv = self.graphics.proj_vector;
        let (fx, fy) = (fv.x.to_bits() as i64, fv.y.to_bits() as i64);
        let (px, py) = (pv.x.to_bits() as i64, pv.y.to_bits() as i64);
        let (dx, dy) = if fx == 0x4000 && px == 0x4000 {
            (Some(distance), None)
        } else if fy == 0x4000 && py == 0x4000 {
            (None, Some(distance))
        } else {
            let fdotp = (fx * px + fy * py) >> 14;
            let distance = distance as i64;
            (
                (fx != 0).then(|| mul_div(fx, distance, fdotp) as i32),
                (fy != 0).then(|| mul_div(fy, distance, fdotp) as i32),
            )
        };
        let point = self.zone_mut(zone).point_mut(point_ix)?;
        if let Some(dx) = dx {
            point.x = point.x.wrapping_add(dx);
            if touch {
                point.flags.set_marker(PointMarker::TOUCHED_X);
            }
        }
        if let Some(dy) = dy {
            point.y = point.y.wrapping_add(dy);
            if touch {
                point.flags.set_marker(PointMarker::TOUCHED_Y);
            }
        }
        Ok(())
    }

    /// Pops point indices as directed by the loop counter and invokes `op`
    /// for each one, then resets the loop counter.
    ///
    /// The stack is checked up front so that an underflow leaves all state
    /// untouched.
    fn for_each_looped_point(
        &mut self,
        mut op: impl FnMut(&mut Self, usize) -> OpResult,
    ) -> OpResult {
        let count = self.graphics.loop_counter as usize;
        if self.value_stack.len() < count {
            return Err(HintErrorKind::ValueStackUnderflow);
        }
        for _ in 0..count {
            let point_ix = self.value_stack.pop_usize()?;
            op(self, point_ix)?;
        }
        self.graphics.loop_counter = 1;
        Ok(())
    }

    fn cvt_get(&self, index: usize) -> Result<i32, HintErrorKind> {
        self.cvt.get(index)
    }
}

#[cfg(test)]
pub(super) use mock::MockEngine;
