//! Hinting error definitions.

use super::{
    opcodes::{self, Opcode},
    program::Program,
};
use crate::font::GlyphId;

/// Errors that may occur when interpreting TrueType bytecode.
#[derive(Copy, Clone, PartialEq, Eq, Debug, thiserror::Error)]
pub enum HintErrorKind {
    #[error("unexpected end of bytecode")]
    UnexpectedEndOfBytecode,
    #[error("unrecognized instruction opcode {0:#04x}")]
    UnrecognizedOpcode(Opcode),
    #[error("unbalanced IF or ELSE")]
    UnbalancedIf,
    #[error("unbalanced function definition")]
    UnbalancedDefinition,
    #[error("function definition present in glyph program")]
    DefinitionInGlyphProgram,
    #[error("nested function definition")]
    NestedDefinition,
    #[error("too many function definitions")]
    TooManyDefinitions,
    #[error("function definition {0} not found")]
    InvalidDefinition(usize),
    #[error("value stack overflow")]
    ValueStackOverflow,
    #[error("value stack underflow")]
    ValueStackUnderflow,
    #[error("call stack overflow")]
    CallStackOverflow,
    #[error("call stack underflow")]
    CallStackUnderflow,
    #[error("stack value {0} was invalid for the current operation")]
    InvalidStackValue(i32),
    #[error("point index {0} was out of bounds")]
    InvalidPointIndex(usize),
    #[error("contour index {0} was out of bounds")]
    InvalidContourIndex(usize),
    #[error("cvt index {0} was out of bounds")]
    InvalidCvtIndex(usize),
    #[error("storage area index {0} was out of bounds")]
    InvalidStorageIndex(usize),
    #[error("attempt to divide by 0")]
    DivideByZero,
    #[error("zone index {0} was invalid (only 0 or 1 are permitted)")]
    InvalidZoneIndex(i32),
    #[error("attempt to set the loop counter to a non-positive value")]
    NegativeLoopCounter,
    #[error("the target of a jump instruction was invalid")]
    InvalidJump,
    #[error("program exceeds the maximum size")]
    TooManyInstructions,
    #[error("too many instructions executed")]
    ExceededExecutionBudget,
    #[error("instruction definitions are not supported")]
    UnsupportedInstructionDefinition,
    #[error("shifting a contour in the twilight zone is not supported")]
    UnsupportedTwilightShift,
    #[error("indirect relative moves in the twilight zone are not supported")]
    UnsupportedTwilightIndirectMove,
}

impl HintErrorKind {
    /// Returns true if the error reports a recognized instruction or
    /// instruction variant that is intentionally not implemented.
    pub fn is_unsupported(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedInstructionDefinition
                | Self::UnsupportedTwilightShift
                | Self::UnsupportedTwilightIndirectMove
        )
    }
}

/// Hinting error with additional context.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct HintError {
    pub program: Program,
    pub glyph_id: Option<GlyphId>,
    pub pc: usize,
    pub opcode: Option<Opcode>,
    pub kind: HintErrorKind,
}

impl core::fmt::Display for HintError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.program.table_name())?;
        if let Some(glyph_id) = self.glyph_id {
            write!(f, "[{glyph_id}]")?;
        }
        let (opcode, colon) = match self.opcode {
            Some(opcode) => (opcodes::name(opcode), ":"),
            _ => ("", ""),
        };
        write!(f, "@{}:{opcode}{colon} {}", self.pc, self.kind)
    }
}

impl std::error::Error for HintError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_with_context() {
        let err = HintError {
            program: Program::Glyph,
            glyph_id: Some(GlyphId::new(42)),
            pc: 7,
            opcode: Some(opcodes::MIRP00000 + 3),
            kind: HintErrorKind::InvalidPointIndex(100),
        };
        assert_eq!(
            err.to_string(),
            "glyf[42]@7:MIRP: point index 100 was out of bounds"
        );
        let err = HintError {
            program: Program::Font,
            glyph_id: None,
            pc: 0,
            opcode: None,
            kind: HintErrorKind::TooManyInstructions,
        };
        assert_eq!(err.to_string(), "fpgm@0: program exceeds the maximum size");
    }
}
