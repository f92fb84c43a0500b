//! Managing exceptions.
//!
//! See <https://learn.microsoft.com/en-us/typography/opentype/spec/tt_instructions#managing-exceptions>

use super::{super::opcodes as op, Engine, HintErrorKind, OpResult};

impl<'a> Engine<'a> {
    /// Delta exception P1, P2 and P3.
    ///
    /// DELTAP1[] (0x5D), DELTAP2[] (0x71) and DELTAP3[] (0x72)
    ///
    /// Pops: n: number of pairs of exception specifications and points
    ///       p1, arg1, p2, arg2, ..., pn, argn
    ///
    /// Each point in zp0 is moved along the freedom vector when the current
    /// pixels per em matches its exception.
    ///
    /// See <https://learn.microsoft.com/en-us/typography/opentype/spec/tt_instructions#delta-exception-p1>
    pub(super) fn op_deltap(&mut self, opcode: u8) -> OpResult {
        let range_base = match opcode {
            op::DELTAP1 => 0,
            op::DELTAP2 => 16,
            _ => 32,
        };
        self.apply_deltas(range_base, |engine, target, delta| {
            engine.move_point(engine.graphics.zp0, target, delta, true)
        })
    }

    /// Delta exception C1, C2 and C3.
    ///
    /// DELTAC1[] (0x73), DELTAC2[] (0x74) and DELTAC3[] (0x75)
    ///
    /// Pops: n: number of pairs of exception specifications and CVT entry
    ///       numbers
    ///       c1, arg1, c2, arg2, ..., cn, argn
    ///
    /// See <https://learn.microsoft.com/en-us/typography/opentype/spec/tt_instructions#delta-exception-c1>
    pub(super) fn op_deltac(&mut self, opcode: u8) -> OpResult {
        let range_base = match opcode {
            op::DELTAC1 => 0,
            op::DELTAC2 => 16,
            _ => 32,
        };
        self.apply_deltas(range_base, |engine, target, delta| {
            engine.cvt.add(target, delta)
        })
    }

    /// Pops the pair count and each (target, exception) pair, calling `op`
    /// for the exceptions that apply at the current size.
    ///
    /// The exception byte encodes the ppem relative to the delta base in the
    /// high nibble and the step count in the low nibble.
    fn apply_deltas(
        &mut self,
        range_base: i32,
        mut op: impl FnMut(&mut Self, usize, i32) -> OpResult,
    ) -> OpResult {
        let n = self.value_stack.peek()?;
        let pairs = n.max(0) as usize;
        if (self.value_stack.len() - 1) / 2 < pairs {
            return Err(HintErrorKind::ValueStackUnderflow);
        }
        self.value_stack.pop()?;
        let ppem = self.scale.saturating_add(32) >> 6;
        for _ in 0..pairs {
            let target = self.value_stack.pop_usize()?;
            let arg = self.value_stack.pop()?;
            let exception_ppem = ((arg & 0xF0) >> 4) + range_base + self.graphics.delta_base;
            if exception_ppem != ppem {
                continue;
            }
            let mut steps = (arg & 0xF) - 8;
            if steps >= 0 {
                steps += 1;
            }
            let delta = steps * 64 / (1 << self.graphics.delta_shift);
            op(self, target, delta)?;
        }
        Ok(())
    }
}
