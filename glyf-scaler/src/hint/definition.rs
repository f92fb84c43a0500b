//! Function definitions.

use core::ops::Range;

use super::{error::HintErrorKind, program::Program};

/// Code range for a function recorded by `FDEF`.
///
/// The range covers the body of the function, including the terminating
/// `ENDF` instruction.
#[derive(Copy, Clone, PartialEq, Eq, Default, Debug)]
pub struct Definition {
    program: Program,
    start: u32,
    end: u32,
}

impl Definition {
    pub fn new(program: Program, code_range: Range<usize>) -> Self {
        Self {
            program,
            // Programs are limited in size well below u32::MAX.
            start: code_range.start as u32,
            end: code_range.end as u32,
        }
    }

    /// Returns the program that contains this definition.
    pub fn program(&self) -> Program {
        self.program
    }

    /// Returns the byte range of the code for this definition in the source
    /// program.
    pub fn code_range(&self) -> Range<usize> {
        self.start as usize..self.end as usize
    }
}

/// Map of function number to code definitions.
///
/// Functions can be defined from the font and control value programs but
/// only called from a glyph program. The `Ref` variant captures that in a
/// type safe way.
pub enum DefinitionMap<'a> {
    Ref(&'a [Option<Definition>]),
    Mut(&'a mut [Option<Definition>]),
}

impl DefinitionMap<'_> {
    /// Returns the definition for the given function number.
    pub fn get(&self, key: i32) -> Result<Definition, HintErrorKind> {
        let defs: &[Option<Definition>] = match self {
            Self::Ref(defs) => defs,
            Self::Mut(defs) => defs,
        };
        let ix = key as usize;
        defs.get(ix)
            .copied()
            .flatten()
            .ok_or(HintErrorKind::InvalidDefinition(ix))
    }

    /// Records a definition for the given function number, replacing any
    /// previous one.
    pub fn set(&mut self, key: i32, definition: Definition) -> Result<(), HintErrorKind> {
        let Self::Mut(defs) = self else {
            return Err(HintErrorKind::DefinitionInGlyphProgram);
        };
        *defs
            .get_mut(key as usize)
            .ok_or(HintErrorKind::TooManyDefinitions)? = Some(definition);
        Ok(())
    }

    /// Removes all definitions.
    pub fn reset(&mut self) {
        if let Self::Mut(defs) = self {
            defs.fill(None);
        }
    }
}
