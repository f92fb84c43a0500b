//! Managing the flow of control.
//!
//! See <https://learn.microsoft.com/en-us/typography/opentype/spec/tt_instructions#managing-the-flow-of-control>

use super::{super::opcodes as op, Engine, HintErrorKind, OpResult};

impl<'a> Engine<'a> {
    /// If test.
    ///
    /// IF[] (0x58)
    ///
    /// Pops: e: stack element
    ///
    /// If the element is zero, skips to the instruction following the
    /// matching ELSE or EIF. Otherwise execution continues with the next
    /// instruction.
    ///
    /// See <https://learn.microsoft.com/en-us/typography/opentype/spec/tt_instructions#if-test>
    pub(super) fn op_if(&mut self, pc: usize) -> OpResult {
        if self.value_stack.pop()? == 0 {
            self.skip_conditional(pc, true)?;
        }
        Ok(())
    }

    /// Else.
    ///
    /// ELSE[] (0x1B)
    ///
    /// Only reached when the preceding IF branch was taken, so skips to the
    /// instruction following the matching EIF.
    ///
    /// See <https://learn.microsoft.com/en-us/typography/opentype/spec/tt_instructions#else>
    pub(super) fn op_else(&mut self, pc: usize) -> OpResult {
        self.skip_conditional(pc, false)
    }

    /// Scans forward from the IF or ELSE at `pc` to the matching ELSE (when
    /// `stop_at_else` is set) or EIF, respecting nesting and stepping over
    /// inline push data.
    fn skip_conditional(&mut self, pc: usize, stop_at_else: bool) -> OpResult {
        let code = self.program.code();
        let end = self.program.range.end;
        let mut depth = 0usize;
        let mut ip = pc + 1;
        loop {
            let opcode = *code
                .get(ip)
                .filter(|_| ip < end)
                .ok_or(HintErrorKind::UnbalancedIf)?;
            match opcode {
                op::IF => depth += 1,
                op::ELSE if depth == 0 && stop_at_else => break,
                op::EIF => {
                    if depth == 0 {
                        break;
                    }
                    depth -= 1;
                }
                _ => {}
            }
            ip = op::next_pc(code, ip).ok_or(HintErrorKind::UnbalancedIf)?;
        }
        self.program.pc = ip + 1;
        Ok(())
    }

    /// Jump.
    ///
    /// JMPR[] (0x1C)
    ///
    /// Pops: offset: number of bytes to move the instruction pointer
    ///
    /// The offset is relative to the position of the JMPR instruction
    /// itself.
    ///
    /// See <https://learn.microsoft.com/en-us/typography/opentype/spec/tt_instructions#jump>
    pub(super) fn op_jmpr(&mut self, pc: usize) -> OpResult {
        let offset = self.value_stack.pop()?;
        self.program.jump(pc, offset)
    }

    /// Jump relative on true.
    ///
    /// JROT[] (0x78)
    ///
    /// Pops: e: stack element
    ///       offset: number of bytes to move the instruction pointer
    ///
    /// See <https://learn.microsoft.com/en-us/typography/opentype/spec/tt_instructions#jump-relative-on-true>
    pub(super) fn op_jrot(&mut self, pc: usize) -> OpResult {
        let e = self.value_stack.pop()?;
        let offset = self.value_stack.pop()?;
        if e != 0 {
            self.program.jump(pc, offset)?;
        }
        Ok(())
    }

    /// Jump relative on false.
    ///
    /// JROF[] (0x79)
    ///
    /// Pops: e: stack element
    ///       offset: number of bytes to move the instruction pointer
    ///
    /// See <https://learn.microsoft.com/en-us/typography/opentype/spec/tt_instructions#jump-relative-on-false>
    pub(super) fn op_jrof(&mut self, pc: usize) -> OpResult {
        let e = self.value_stack.pop()?;
        let offset = self.value_stack.pop()?;
        if e == 0 {
            self.program.jump(pc, offset)?;
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

    fn run(code: &[u8]) -> Result<Vec<i32>, HintErrorKind> {
        let mut mock = MockEngine::new();
        let mut engine = mock.engine_for(Program::Font, code);
        engine
            .run_program(Program::Font)
            .map_err(|e| e.kind)?;
        Ok(engine.stack().to_vec())
    }

    #[test]
    fn if_else() {
        #[rustfmt::skip]
        let code = |cond| [
            op::PUSHB000, cond,
            op::IF,
                op::PUSHB000, 1,
            op::ELSE,
                // Push data containing an EIF opcode must be skipped.
                op::PUSHB000, op::EIF,
            op::EIF,
            op::PUSHB000, 3,
        ];
        assert_eq!(run(&code(1)), Ok(vec![1, 3]));
        assert_eq!(run(&code(0)), Ok(vec![op::EIF as i32, 3]));
    }

    #[test]
    fn nested_if() {
        #[rustfmt::skip]
        let code = [
            op::PUSHB000, 0,
            op::IF,
                op::PUSHB000, 1,
                op::IF,
                    op::PUSHB000, 2,
                op::ELSE,
                    op::PUSHB000, 3,
                op::EIF,
            op::ELSE,
                op::PUSHB000, 4,
            op::EIF,
        ];
        assert_eq!(run(&code), Ok(vec![4]));
    }

    #[test]
    fn unbalanced_if() {
        let code = [op::PUSHB000, 0, op::IF, op::PUSHB000, 1];
        assert_eq!(run(&code), Err(HintErrorKind::UnbalancedIf));
        // Truncated push data while skipping.
        let code = [op::PUSHB000, 0, op::IF, op::PUSHB000 + 1, 1];
        assert_eq!(run(&code), Err(HintErrorKind::UnbalancedIf));
    }

    #[test]
    fn jumps() {
        // Skip over the PUSHB[0] 1 with an offset of 3 from JROT.
        #[rustfmt::skip]
        let code = [
            op::PUSHB000 + 1, 3, 1,
            op::JROT,
            op::PUSHB000, 1,
            op::PUSHB000, 2,
        ];
        assert_eq!(run(&code), Ok(vec![2]));
        #[rustfmt::skip]
        let code = [
            op::PUSHB000 + 1, 3, 1,
            op::JROF,
            op::PUSHB000, 1,
            op::PUSHB000, 2,
        ];
        assert_eq!(run(&code), Ok(vec![1, 2]));
        // Jumping past the end of the program ends it.
        let code = [op::PUSHB000, 100, op::JMPR, op::PUSHB000, 1];
        assert_eq!(run(&code), Ok(vec![]));
        // Jumping before the start is an error.
        let code = [op::PUSHW000, 0xFF, 0x00, op::JMPR];
        assert_eq!(run(&code), Err(HintErrorKind::InvalidJump));
    }
}
