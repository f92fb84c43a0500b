//! TrueType hinting.

mod call_stack;
mod cvt;
mod definition;
mod engine;
mod error;
mod graphics;
mod math;
mod opcodes;
mod program;
mod round;
mod value_stack;
mod zone;

use cvt::Cvt;
use definition::{Definition, DefinitionMap};
use engine::Engine;
use graphics::GraphicsState;
use program::ProgramState;
use value_stack::ValueStack;
use zone::Zone;

use crate::{
    font::{Font, FontId, GlyphId},
    point::Point,
};

pub use error::{HintError, HintErrorKind};
pub use program::Program;

/// Number of points added to the font declared twilight point count.
const EXTRA_TWILIGHT_POINTS: usize = 4;

/// Interpreter state that persists across glyph programs for a single font
/// and scale.
///
/// The font and control value programs are run by [`Hinter::init`] whenever
/// the font or scale changes. Glyph programs are then run against the
/// resulting state with [`Hinter::run`].
///
/// Each glyph program starts from the control values and storage left by
/// the control value program. Its own writes go to scratch copies that are
/// discarded afterwards, so the outcome of a glyph never depends on which
/// glyphs were hinted before it.
#[derive(Clone, Default, Debug)]
pub struct Hinter {
    stack: Vec<i32>,
    storage: Vec<i32>,
    definitions: Vec<Option<Definition>>,
    /// Scaled control values.
    cvt: Vec<i32>,
    glyph_storage: Vec<i32>,
    glyph_cvt: Vec<i32>,
    /// Twilight zone points: unscaled, original and current.
    twilight: [Vec<Point>; 3],
    font_id: Option<FontId>,
    scale: i32,
    /// State left behind by the control value program.
    default_graphics: GraphicsState,
}

impl Hinter {
    /// Prepares the hinter for the given font and scale.
    ///
    /// The twilight zone is cleared on every call. The font program is run
    /// when the font differs from the previous call and the control value
    /// program is run when either the font or the scale differs.
    pub fn init(&mut self, font: &Font, scale: i32) -> Result<(), HintError> {
        let max_profile = font.max_profile();
        let twilight_len = max_profile.max_twilight_points as usize + EXTRA_TWILIGHT_POINTS;
        for points in &mut self.twilight {
            points.clear();
            points.resize(twilight_len, Point::default());
        }
        let font_changed = self.font_id != Some(font.id());
        if !font_changed && self.scale == scale {
            return Ok(());
        }
        if font_changed {
            self.font_id = Some(font.id());
            self.definitions.clear();
            self.definitions
                .resize(max_profile.max_function_defs as usize, None);
            let stack_len = (max_profile.max_stack_elements as usize + 255) & !255;
            if stack_len > self.stack.len() {
                self.stack.resize(stack_len, 0);
            }
            let storage_len = (max_profile.max_storage as usize + 15) & !15;
            self.storage.clear();
            self.storage.resize(storage_len, 0);
            log::debug!(
                "running font program ({} bytes) with stack {}, storage {}, twilight {}",
                font.font_program().len(),
                self.stack.len(),
                self.storage.len(),
                twilight_len,
            );
        }
        self.scale = scale;
        cvt::scale_into(font, scale, &mut self.cvt);
        self.default_graphics = GraphicsState::DEFAULT;
        let run_fpgm = font_changed && !font.font_program().is_empty();
        let run_prep = !font.control_value_program().is_empty();
        if !run_fpgm && !run_prep {
            return Ok(());
        }
        // Force a rerun of both programs if either one fails.
        self.font_id = None;
        let [tw_unscaled, tw_original, tw_points] = &mut self.twilight;
        let mut engine = Engine::new(
            font,
            scale,
            None,
            ProgramState::new(
                font.font_program(),
                font.control_value_program(),
                &[],
                Program::Font,
            ),
            GraphicsState::DEFAULT,
            ValueStack::new(&mut self.stack),
            &mut self.storage,
            Cvt::new(&mut self.cvt),
            DefinitionMap::Mut(&mut self.definitions),
            Zone::new(tw_unscaled, tw_original, tw_points, &[]),
            Zone::default(),
        );
        if run_fpgm {
            engine.run_program(Program::Font)?;
        }
        if run_prep {
            log::debug!(
                "running control value program ({} bytes) at scale {scale}",
                font.control_value_program().len(),
            );
            engine.run_program(Program::ControlValue)?;
            self.default_graphics = engine.graphics().retained();
        }
        self.font_id = Some(font.id());
        Ok(())
    }

    /// Runs a glyph program over the given points.
    ///
    /// The three point slices are co-indexed and must include the four
    /// phantom points. Contour ends are exclusive.
    #[allow(clippy::too_many_arguments)]
    pub fn run(
        &mut self,
        font: &Font,
        glyph_id: GlyphId,
        code: &[u8],
        unscaled: &[Point],
        original: &mut [Point],
        points: &mut [Point],
        contours: &[usize],
    ) -> Result<(), HintError> {
        log::trace!(
            "running glyph program for {glyph_id} ({} bytes, {} points)",
            code.len(),
            points.len(),
        );
        self.glyph_cvt.clone_from(&self.cvt);
        self.glyph_storage.clone_from(&self.storage);
        let [tw_unscaled, tw_original, tw_points] = &mut self.twilight;
        let mut engine = Engine::new(
            font,
            self.scale,
            Some(glyph_id),
            ProgramState::new(
                font.font_program(),
                font.control_value_program(),
                code,
                Program::Glyph,
            ),
            self.default_graphics,
            ValueStack::new(&mut self.stack),
            &mut self.glyph_storage,
            Cvt::new(&mut self.glyph_cvt),
            DefinitionMap::Ref(&self.definitions),
            Zone::new(tw_unscaled, tw_original, tw_points, &[]),
            Zone::new(unscaled, original, points, contours),
        );
        engine.run_program(Program::Glyph)
    }
}
