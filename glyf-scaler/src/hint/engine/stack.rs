//! Managing the stack.
//!
//! Most stack instructions map directly to methods on the value stack.
//! The ones here need access to the program.
//!
//! See <https://learn.microsoft.com/en-us/typography/opentype/spec/tt_instructions#managing-the-stack>

use super::{
    super::opcodes::{self as op, Opcode},
    Engine, HintErrorKind, OpResult,
};

impl<'a> Engine<'a> {
    /// Returns the depth of the stack.
    ///
    /// DEPTH[] (0x24)
    ///
    /// Pushes: n: number of elements (int32)
    ///
    /// See <https://learn.microsoft.com/en-us/typography/opentype/spec/tt_instructions#returns-the-depth-of-the-stack>
    pub(super) fn op_depth(&mut self) -> OpResult {
        let n = self.value_stack.len();
        self.value_stack.push(n as i32)
    }

    /// Pushes inline data from the instruction stream.
    ///
    /// NPUSHB[] (0x40), NPUSHW[] (0x41), PUSHB[abc] (0xB0 - 0xB7) and
    /// PUSHW[abc] (0xB8 - 0xBF)
    ///
    /// The N variants read the count from the byte following the opcode
    /// while the others encode it in the low three bits.
    ///
    /// See <https://learn.microsoft.com/en-us/typography/opentype/spec/tt_instructions#pushing-data-onto-the-interpreter-stack>
    pub(super) fn op_push(&mut self, pc: usize, opcode: Opcode) -> OpResult {
        let code = self.program.code();
        let (count, is_words, data_start) = match opcode {
            op::NPUSHB | op::NPUSHW => {
                let count = *code
                    .get(pc + 1)
                    .ok_or(HintErrorKind::UnexpectedEndOfBytecode)?;
                (count as usize, opcode == op::NPUSHW, pc + 2)
            }
            op::PUSHB000..=op::PUSHB111 => ((opcode - op::PUSHB000) as usize + 1, false, pc + 1),
            _ => ((opcode - op::PUSHW000) as usize + 1, true, pc + 1),
        };
        if self.value_stack.len() + count > self.value_stack.capacity() {
            return Err(HintErrorKind::ValueStackOverflow);
        }
        let data_end = data_start + if is_words { count * 2 } else { count };
        let data = code
            .get(data_start..data_end)
            .filter(|_| data_end <= self.program.range.end)
            .ok_or(HintErrorKind::UnexpectedEndOfBytecode)?;
        self.value_stack.push_inline(data, is_words)?;
        self.program.pc = data_end;
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
        engine.run_program(Program::Font).map_err(|e| e.kind)?;
        Ok(engine.stack().to_vec())
    }

    #[test]
    fn push_variants() {
        #[rustfmt::skip]
        let code = [
            op::NPUSHB, 2, 1, 255,
            op::NPUSHW, 1, 0x80, 0x00,
            op::PUSHB000 + 1, 7, 8,
            op::PUSHW000, 0x01, 0x02,
        ];
        assert_eq!(run(&code), Ok(vec![1, 255, -32768, 7, 8, 0x102]));
    }

    #[test]
    fn truncated_push() {
        assert_eq!(
            run(&[op::NPUSHB]),
            Err(HintErrorKind::UnexpectedEndOfBytecode)
        );
        assert_eq!(
            run(&[op::NPUSHW, 2, 0, 1, 0]),
            Err(HintErrorKind::UnexpectedEndOfBytecode)
        );
        assert_eq!(
            run(&[op::PUSHB000 + 2, 1, 2]),
            Err(HintErrorKind::UnexpectedEndOfBytecode)
        );
    }

    #[test]
    fn push_overflow() {
        let mut code = vec![];
        // The mock stack holds 256 values.
        for _ in 0..2 {
            code.push(op::NPUSHB);
            code.push(255);
            code.extend(std::iter::repeat(0).take(255));
        }
        assert_eq!(run(&code), Err(HintErrorKind::ValueStackOverflow));
    }

    #[test]
    fn stack_manipulation() {
        #[rustfmt::skip]
        let code = [
            op::PUSHB000 + 4, 1, 2, 3, 4, 5,
            op::DEPTH,          // 1 2 3 4 5 5
            op::POP,            // 1 2 3 4 5
            op::SWAP,           // 1 2 3 5 4
            op::DUP,            // 1 2 3 5 4 4
            op::ROLL,           // 1 2 3 4 4 5
            op::PUSHB000, 5,
            op::CINDEX,         // 1 2 3 4 4 5 2
            op::PUSHB000, 6,
            op::MINDEX,         // 1 3 4 4 5 2 2
        ];
        assert_eq!(run(&code), Ok(vec![1, 3, 4, 4, 5, 2, 2]));
        let code = [op::PUSHB000 + 1, 1, 2, op::CLEAR, op::DEPTH];
        assert_eq!(run(&code), Ok(vec![0]));
    }
}
