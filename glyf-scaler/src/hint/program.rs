//! TrueType program management.

use core::ops::Range;

use super::{
    call_stack::{CallRecord, CallStack},
    definition::Definition,
    error::HintErrorKind,
};

/// Describes the source for a piece of bytecode.
#[derive(Copy, Clone, PartialEq, Eq, Default, Debug)]
#[repr(u8)]
pub enum Program {
    /// Program that initializes the function table. Stored in the `fpgm`
    /// table.
    #[default]
    Font = 0,
    /// Program that initializes CVT and storage based on font size. Stored
    /// in the `prep` table.
    ControlValue = 1,
    /// Glyph specified program. Stored per-glyph in the `glyf` table.
    Glyph = 2,
}

impl Program {
    /// Returns the tag of the table that carries this program.
    pub fn table_name(self) -> &'static str {
        match self {
            Self::Font => "fpgm",
            Self::ControlValue => "prep",
            Self::Glyph => "glyf",
        }
    }
}

/// State for managing active programs and the program counter.
pub struct ProgramState<'a> {
    /// Bytecode for each of the three program types, indexed by `Program`.
    pub bytecode: [&'a [u8]; 3],
    /// The initial program when execution begins.
    pub initial: Program,
    /// The currently active program.
    pub current: Program,
    /// Range of the currently executing code: the whole program or the
    /// body of a function.
    pub range: Range<usize>,
    /// Offset of the next instruction in the current program.
    pub pc: usize,
    /// Tracks nested function invocations.
    pub call_stack: CallStack,
}

impl<'a> ProgramState<'a> {
    pub fn new(
        font_code: &'a [u8],
        cv_code: &'a [u8],
        glyph_code: &'a [u8],
        initial_program: Program,
    ) -> Self {
        let bytecode = [font_code, cv_code, glyph_code];
        Self {
            bytecode,
            initial: initial_program,
            current: initial_program,
            range: 0..bytecode[initial_program as usize].len(),
            pc: 0,
            call_stack: CallStack::default(),
        }
    }

    /// Resets the state for execution of the given program.
    pub fn reset(&mut self, program: Program) {
        self.initial = program;
        self.current = program;
        self.range = 0..self.bytecode[program as usize].len();
        self.pc = 0;
        self.call_stack.clear();
    }

    /// Returns the bytecode of the currently active program.
    pub fn code(&self) -> &'a [u8] {
        self.bytecode[self.current as usize]
    }

    /// Returns true if execution is inside a function body.
    pub fn in_function(&self) -> bool {
        !self.call_stack.is_empty()
    }

    /// Jumps to the code in the given definition and sets it up for
    /// execution `count` times.
    ///
    /// `return_pc` is the offset at which the caller resumes.
    pub fn enter(
        &mut self,
        definition: Definition,
        count: u32,
        return_pc: usize,
    ) -> Result<(), HintErrorKind> {
        self.call_stack.push(CallRecord {
            caller_program: self.current,
            caller_range: self.range.clone(),
            return_pc,
            current_count: count,
            definition,
        })?;
        self.current = definition.program();
        self.range = definition.code_range();
        self.pc = self.range.start;
        Ok(())
    }

    /// Leaves the code from the definition on the top of the stack.
    ///
    /// If the top call record has a loop count greater than 1, restarts
    /// execution from the beginning of the definition. Otherwise, resumes
    /// execution in the caller.
    pub fn leave(&mut self) -> Result<(), HintErrorKind> {
        let mut record = self.call_stack.pop()?;
        if record.current_count > 1 {
            record.current_count -= 1;
            self.pc = record.definition.code_range().start;
            self.call_stack.push(record)?;
        } else {
            self.current = record.caller_program;
            self.range = record.caller_range;
            self.pc = record.return_pc;
        }
        Ok(())
    }

    /// Moves the program counter by `offset` bytes relative to the
    /// instruction at `pc`.
    ///
    /// Landing before the start of the current code, or outside of the
    /// body of a function, is an error. Landing at or past the end of a top
    /// level program ends it.
    pub fn jump(&mut self, pc: usize, offset: i32) -> Result<(), HintErrorKind> {
        let target = pc as i64 + offset as i64;
        if target < self.range.start as i64
            || (self.in_function() && target >= self.range.end as i64)
        {
            return Err(HintErrorKind::InvalidJump);
        }
        self.pc = target as usize;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    impl<'a> ProgramState<'a> {
        fn active_state(&self) -> (Program, &'a [u8], usize) {
            (self.current, self.code(), self.pc)
        }
    }

    #[test]
    fn accounting() {
        let font_code = &[0; 30][..];
        let cv_code = &[1; 120][..];
        let glyph_code = &[2][..];
        let mut state = ProgramState::new(font_code, cv_code, glyph_code, Program::Glyph);
        assert_eq!(state.active_state(), (Program::Glyph, glyph_code, 0));
        let font_def = Definition::new(Program::Font, 10..20);
        let cv_def = Definition::new(Program::ControlValue, 33..111);
        state.enter(cv_def, 1, 1).unwrap();
        assert_eq!(state.active_state(), (Program::ControlValue, cv_code, 33));
        state.enter(font_def, 1, 54).unwrap();
        assert_eq!(state.active_state(), (Program::Font, font_code, 10));
        assert_eq!(state.range, 10..20);
        state.leave().unwrap();
        assert_eq!(state.active_state(), (Program::ControlValue, cv_code, 54));
        assert_eq!(state.range, 33..111);
        state.leave().unwrap();
        assert_eq!(state.active_state(), (Program::Glyph, glyph_code, 1));
        assert_eq!(state.range, 0..1);
        assert_eq!(state.leave(), Err(HintErrorKind::CallStackUnderflow));
    }

    #[test]
    fn loop_call() {
        let font_code = &[0; 30][..];
        let mut state = ProgramState::new(font_code, &[], &[2], Program::Glyph);
        let font_def = Definition::new(Program::Font, 10..20);
        state.enter(font_def, 3, 1).unwrap();
        for _ in 0..3 {
            assert_eq!(state.active_state(), (Program::Font, font_code, 10));
            state.pc += 9;
            state.leave().unwrap();
        }
        assert_eq!(state.active_state(), (Program::Glyph, &[2][..], 1));
    }

    #[test]
    fn jumps() {
        let font_code = &[0; 30][..];
        let mut state = ProgramState::new(font_code, &[], &[0; 8], Program::Glyph);
        state.jump(2, 3).unwrap();
        assert_eq!(state.pc, 5);
        // Past the end of a top level program is allowed.
        state.jump(5, 10).unwrap();
        assert_eq!(state.pc, 15);
        assert_eq!(state.jump(2, -3), Err(HintErrorKind::InvalidJump));
        state
            .enter(Definition::new(Program::Font, 10..20), 1, 0)
            .unwrap();
        state.jump(12, -2).unwrap();
        assert_eq!(state.pc, 10);
        assert_eq!(state.jump(12, -3), Err(HintErrorKind::InvalidJump));
        assert_eq!(state.jump(12, 8), Err(HintErrorKind::InvalidJump));
    }
}
