//! Miscellaneous instructions.
//!
//! See <https://learn.microsoft.com/en-us/typography/opentype/spec/tt_instructions#miscellaneous-instructions>

use super::{Engine, OpResult};

/// Interpreter version reported by GETINFO. Corresponds to the Windows 98
/// rasterizer.
const ENGINE_VERSION: i32 = 35;

/// GETINFO result bit signaling grayscale rendering.
const GRAYSCALE: i32 = 1 << 12;

impl<'a> Engine<'a> {
    /// Get information.
    ///
    /// GETINFO[] (0x88)
    ///
    /// Pops: selector: integer
    /// Pushes: result: integer
    ///
    /// Only the version (selector bit 0) and grayscale (selector bit 5)
    /// queries are answered. Glyphs are never rotated or stretched.
    ///
    /// See <https://learn.microsoft.com/en-us/typography/opentype/spec/tt_instructions#get-information>
    pub(super) fn op_getinfo(&mut self) -> OpResult {
        let selector = self.value_stack.pop()?;
        let mut result = 0;
        if selector & 1 != 0 {
            result |= ENGINE_VERSION;
        }
        if selector & (1 << 5) != 0 {
            result |= GRAYSCALE;
        }
        self.value_stack.push(result)
    }

    /// DEBUG[] (0x4F)
    pub(super) fn op_debug(&mut self) -> OpResult {
        self.value_stack.pop()?;
        Ok(())
    }

    /// Pops and discards `count` values.
    ///
    /// Used for SANGW, AA, SCANCTRL, SCANTYPE and INSTCTRL, which have no
    /// effect on grayscale outlines.
    pub(super) fn op_ignored(&mut self, count: usize) -> OpResult {
        for _ in 0..count {
            self.value_stack.pop()?;
        }
        Ok(())
    }
}
