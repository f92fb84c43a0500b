//! Error types associated with loading glyphs.

use crate::font::GlyphId;

pub use crate::hint::{HintError, HintErrorKind};

/// Broad classification of a [`LoadError`].
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum ErrorKind {
    /// The font data violates the documented layout, or a hinting program
    /// faulted.
    Format,
    /// The data is well formed but uses a feature that is intentionally not
    /// implemented.
    Unsupported,
}

/// Errors that may occur when decoding font tables or loading glyphs.
#[derive(Clone, PartialEq, Debug, thiserror::Error)]
pub enum LoadError {
    /// A required table was missing or too short to decode.
    #[error("the '{0}' table is missing or truncated")]
    MissingTable(&'static str),
    /// A header value was outside its permitted range.
    #[error("the '{table}' table has an invalid {field}")]
    InvalidHeader {
        table: &'static str,
        field: &'static str,
    },
    /// The requested glyph is not covered by the location table.
    #[error("glyph {0} was not found in the location table")]
    GlyphNotFound(GlyphId),
    /// The location table points outside of the glyph data.
    #[error("location table entry for glyph {0} is out of bounds")]
    InvalidGlyphOffset(GlyphId),
    /// The glyph record ended before all of its fields were read.
    #[error("glyph {0} data is truncated")]
    UnexpectedEndOfGlyph(GlyphId),
    /// The contour count was negative but not -1.
    #[error("glyph {0} has an invalid contour count {1}")]
    InvalidContourCount(GlyphId, i16),
    /// A repeated flag run extended past the last point.
    #[error("glyph {0} has more point flags than points")]
    InvalidPointFlags(GlyphId),
    /// Contour end points were not increasing.
    #[error("glyph {0} has contour end points out of order")]
    InvalidContourEnds(GlyphId),
    /// Exceeded a recursion limit when loading a composite glyph.
    #[error(
        "recursion limit ({max}) exceeded when loading composite component {0}",
        max = crate::outline::MAX_COMPONENT_DEPTH
    )]
    RecursionLimitExceeded(GlyphId),
    /// A composite component is positioned by matching point indices rather
    /// than by offset.
    #[error("composite glyph {0} positions a component by anchor points")]
    AnchorPointsUnsupported(GlyphId),
    /// Error occurred during hinting.
    #[error("{0}")]
    HintingFailed(#[from] HintError),
}

impl LoadError {
    /// Returns the classification of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::AnchorPointsUnsupported(_) => ErrorKind::Unsupported,
            Self::HintingFailed(e) if e.kind.is_unsupported() => ErrorKind::Unsupported,
            _ => ErrorKind::Format,
        }
    }

    /// Returns true if the error reports a recognized but unimplemented
    /// feature.
    pub fn is_unsupported(&self) -> bool {
        self.kind() == ErrorKind::Unsupported
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hint::Program;

    #[test]
    fn classification() {
        assert_eq!(
            LoadError::InvalidContourCount(GlyphId::new(3), -2).kind(),
            ErrorKind::Format
        );
        assert!(LoadError::AnchorPointsUnsupported(GlyphId::new(1)).is_unsupported());
        let hint_error = |kind| {
            LoadError::HintingFailed(HintError {
                program: Program::Glyph,
                glyph_id: Some(GlyphId::new(7)),
                pc: 3,
                opcode: Some(0x89),
                kind,
            })
        };
        assert!(hint_error(HintErrorKind::UnsupportedInstructionDefinition).is_unsupported());
        assert_eq!(
            hint_error(HintErrorKind::ValueStackUnderflow).kind(),
            ErrorKind::Format
        );
    }

    #[test]
    fn display() {
        let err = LoadError::RecursionLimitExceeded(GlyphId::new(12));
        assert_eq!(
            err.to_string(),
            "recursion limit (32) exceeded when loading composite component 12"
        );
        let err = LoadError::HintingFailed(HintError {
            program: Program::ControlValue,
            glyph_id: None,
            pc: 10,
            opcode: Some(0x62),
            kind: HintErrorKind::DivideByZero,
        });
        assert_eq!(err.to_string(), "prep@10:DIV: attempt to divide by 0");
    }
}
