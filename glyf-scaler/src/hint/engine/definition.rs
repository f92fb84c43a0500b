//! Defining and using functions.
//!
//! See <https://learn.microsoft.com/en-us/typography/opentype/spec/tt_instructions#defining-and-using-functions-and-instructions>

use super::{
    super::{definition::Definition, opcodes as op},
    Engine, HintErrorKind, OpResult,
};

impl<'a> Engine<'a> {
    /// Function definition.
    ///
    /// FDEF[] (0x2C)
    ///
    /// Pops: f: function identifier number
    ///
    /// Records the instructions up to and including the next ENDF as the
    /// body of function `f` and continues after the ENDF. Definitions may
    /// not nest.
    ///
    /// See <https://learn.microsoft.com/en-us/typography/opentype/spec/tt_instructions#function-definition>
    pub(super) fn op_fdef(&mut self, pc: usize) -> OpResult {
        let code = self.program.code();
        let end = self.program.range.end;
        let start = pc + 1;
        let mut ip = start;
        loop {
            let opcode = *code
                .get(ip)
                .filter(|_| ip < end)
                .ok_or(HintErrorKind::UnbalancedDefinition)?;
            match opcode {
                op::FDEF => return Err(HintErrorKind::NestedDefinition),
                op::ENDF => break,
                _ => ip = op::next_pc(code, ip).ok_or(HintErrorKind::UnbalancedDefinition)?,
            }
        }
        let key = self.value_stack.pop()?;
        let definition = Definition::new(self.program.current, start..ip + 1);
        self.definitions.set(key, definition)?;
        self.program.pc = ip + 1;
        Ok(())
    }

    /// End function definition.
    ///
    /// ENDF[] (0x2D)
    ///
    /// Returns to the caller, or restarts the function if a LOOPCALL has
    /// iterations remaining.
    ///
    /// See <https://learn.microsoft.com/en-us/typography/opentype/spec/tt_instructions#end-function-definition>
    pub(super) fn op_endf(&mut self) -> OpResult {
        self.program.leave()
    }

    /// Call function.
    ///
    /// CALL[] (0x2B)
    ///
    /// Pops: f: function identifier number
    ///
    /// See <https://learn.microsoft.com/en-us/typography/opentype/spec/tt_instructions#call-function>
    pub(super) fn op_call(&mut self) -> OpResult {
        let key = self.value_stack.pop()?;
        let definition = self.definitions.get(key)?;
        let return_pc = self.program.pc;
        self.program.enter(definition, 1, return_pc)
    }

    /// Loop and call function.
    ///
    /// LOOPCALL[] (0x2a)
    ///
    /// Pops: f: function number integer in range of 0 to 2^32 - 1
    ///       count: number of times to call the function
    ///
    /// A count of zero or less calls nothing.
    ///
    /// See <https://learn.microsoft.com/en-us/typography/opentype/spec/tt_instructions#loop-and-call-function>
    pub(super) fn op_loopcall(&mut self) -> OpResult {
        let key = self.value_stack.pop()?;
        let count = self.value_stack.pop()?;
        let definition = self.definitions.get(key)?;
        if count > 0 {
            let return_pc = self.program.pc;
            self.program.enter(definition, count as u32, return_pc)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{
        super::{super::program::Program, MockEngine},
        op, HintErrorKind,
    };

    #[test]
    fn define_and_call() {
        let mut mock = MockEngine::new();
        #[rustfmt::skip]
        let code = [
            // Function 1 adds 10 to the top of the stack.
            op::PUSHB000, 1,
            op::FDEF,
                op::PUSHB000, 10,
                op::ADD,
            op::ENDF,
            op::PUSHB000, 5,
            op::PUSHB000, 1,
            op::CALL,
            // Call three more times.
            op::PUSHB000 + 1, 3, 1,
            op::LOOPCALL,
            // Zero count does nothing.
            op::PUSHB000 + 1, 0, 1,
            op::LOOPCALL,
        ];
        let mut engine = mock.engine_for(Program::Font, &code);
        engine.run_program(Program::Font).unwrap();
        assert_eq!(engine.stack(), &[45]);
    }

    #[test]
    fn definition_errors() {
        let run = |code: &[u8], program| {
            let mut mock = MockEngine::new();
            let mut engine = mock.engine_for(program, code);
            engine.run_program(program).map_err(|e| e.kind)
        };
        let nested = [op::PUSHB000, 0, op::FDEF, op::FDEF, op::ENDF, op::ENDF];
        assert_eq!(
            run(&nested, Program::Font),
            Err(HintErrorKind::NestedDefinition)
        );
        let unbalanced = [op::PUSHB000, 0, op::FDEF, op::PUSHB000, 1];
        assert_eq!(
            run(&unbalanced, Program::Font),
            Err(HintErrorKind::UnbalancedDefinition)
        );
        let in_glyph = [op::PUSHB000, 0, op::FDEF, op::ENDF];
        assert_eq!(
            run(&in_glyph, Program::Glyph),
            Err(HintErrorKind::DefinitionInGlyphProgram)
        );
        let too_many = [op::PUSHB000, 200, op::FDEF, op::ENDF];
        assert_eq!(
            run(&too_many, Program::Font),
            Err(HintErrorKind::TooManyDefinitions)
        );
        let undefined = [op::PUSHB000, 3, op::CALL];
        assert_eq!(
            run(&undefined, Program::ControlValue),
            Err(HintErrorKind::InvalidDefinition(3))
        );
        assert_eq!(
            run(&[op::ENDF], Program::Font),
            Err(HintErrorKind::CallStackUnderflow)
        );
        // Function 0 calls itself forever.
        let recursive = [
            op::PUSHB000,
            0,
            op::FDEF,
            op::PUSHB000,
            0,
            op::CALL,
            op::ENDF,
            op::PUSHB000,
            0,
            op::CALL,
        ];
        assert_eq!(
            run(&recursive, Program::Font),
            Err(HintErrorKind::CallStackOverflow)
        );
    }

    #[test]
    fn jump_out_of_function() {
        let mut mock = MockEngine::new();
        #[rustfmt::skip]
        let code = [
            op::PUSHB000, 0,
            op::FDEF,
                op::PUSHB000, 10,
                op::JMPR,
            op::ENDF,
            op::PUSHB000, 0,
            op::CALL,
        ];
        let mut engine = mock.engine_for(Program::Font, &code);
        let err = engine.run_program(Program::Font).unwrap_err();
        assert_eq!(err.kind, HintErrorKind::InvalidJump);
        assert_eq!(err.pc, 5);
    }
}
