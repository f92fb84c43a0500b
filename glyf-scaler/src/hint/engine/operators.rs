//! Arithmetic, comparison and logical instructions.
//!
//! Integer operators wrap on overflow. Comparisons and logical operators
//! push 1 for true and 0 for false.
//!
//! See <https://learn.microsoft.com/en-us/typography/opentype/spec/tt_instructions#logical-functions>
//! and <https://learn.microsoft.com/en-us/typography/opentype/spec/tt_instructions#arithmetic-and-math-instructions>

use super::{
    super::opcodes::{self as op, Opcode},
    Engine, HintErrorKind, OpResult,
};
use crate::fixed::F26Dot6;

impl<'a> Engine<'a> {
    /// Replaces the top two operands `a b` with `a <op> b` for LT through
    /// NEQ, AND, OR, ADD through MUL, MAX and MIN.
    pub(super) fn op_binary(&mut self, opcode: Opcode) -> OpResult {
        self.value_stack
            .apply_binary(|a, b| binary_operator(opcode, a, b))
    }

    /// NOT, ABS, NEG, FLOOR and CEILING.
    pub(super) fn op_unary(&mut self, opcode: Opcode) -> OpResult {
        self.value_stack.apply_unary(|a| unary_operator(opcode, a))
    }

    /// ODD and EVEN test the pixel count after rounding with the current
    /// round state.
    pub(super) fn op_parity(&mut self, opcode: Opcode) -> OpResult {
        let value = self.value_stack.pop()?;
        let odd = (self.round(value) >> 6) & 1;
        let want_even = (opcode == op::EVEN) as i32;
        self.value_stack.push(odd ^ want_even)
    }
}

fn binary_operator(opcode: Opcode, a: i32, b: i32) -> Result<i32, HintErrorKind> {
    Ok(match opcode {
        op::LT => (a < b) as i32,
        op::LTEQ => (a <= b) as i32,
        op::GT => (a > b) as i32,
        op::GTEQ => (a >= b) as i32,
        op::EQ => (a == b) as i32,
        op::NEQ => (a != b) as i32,
        op::AND => (a != 0 && b != 0) as i32,
        op::OR => (a != 0 || b != 0) as i32,
        op::ADD => a.wrapping_add(b),
        op::SUB => a.wrapping_sub(b),
        // Both are 26.6 so the quotient is pre-shifted and the product
        // post-shifted.
        op::DIV => F26Dot6::from_bits(a)
            .div(F26Dot6::from_bits(b))
            .ok_or(HintErrorKind::DivideByZero)?
            .to_bits(),
        op::MUL => F26Dot6::from_bits(a).mul(F26Dot6::from_bits(b)).to_bits(),
        op::MAX => a.max(b),
        op::MIN => a.min(b),
        _ => return Err(HintErrorKind::UnrecognizedOpcode(opcode)),
    })
}

fn unary_operator(opcode: Opcode, a: i32) -> Result<i32, HintErrorKind> {
    Ok(match opcode {
        op::NOT => (a == 0) as i32,
        op::ABS => a.wrapping_abs(),
        op::NEG => a.wrapping_neg(),
        op::FLOOR => a & !63,
        op::CEILING => a.wrapping_add(63) & !63,
        _ => return Err(HintErrorKind::UnrecognizedOpcode(opcode)),
    })
}
