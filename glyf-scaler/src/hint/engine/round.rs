//! Rounding state and compensated rounding.
//!
//! See <https://learn.microsoft.com/en-us/typography/opentype/spec/tt_instructions#managing-the-round-state>
//! and <https://learn.microsoft.com/en-us/typography/opentype/spec/tt_instructions#compensating-for-the-engine-characteristics>

use super::{super::round::RoundMode, super::round::RoundState, Engine, OpResult};

impl<'a> Engine<'a> {
    /// Round to half grid.
    ///
    /// RTHG[] (0x19)
    ///
    /// See <https://learn.microsoft.com/en-us/typography/opentype/spec/tt_instructions#round-to-half-grid>
    pub(super) fn op_rthg(&mut self) -> OpResult {
        self.set_round_mode(RoundMode::HalfGrid)
    }

    /// Round to grid.
    ///
    /// RTG[] (0x18)
    ///
    /// See <https://learn.microsoft.com/en-us/typography/opentype/spec/tt_instructions#round-to-grid>
    pub(super) fn op_rtg(&mut self) -> OpResult {
        self.set_round_mode(RoundMode::Grid)
    }

    /// Round to double grid.
    ///
    /// RTDG[] (0x3D)
    ///
    /// See <https://learn.microsoft.com/en-us/typography/opentype/spec/tt_instructions#round-to-double-grid>
    pub(super) fn op_rtdg(&mut self) -> OpResult {
        self.set_round_mode(RoundMode::DoubleGrid)
    }

    /// Round down to grid.
    ///
    /// RDTG[] (0x7D)
    ///
    /// See <https://learn.microsoft.com/en-us/typography/opentype/spec/tt_instructions#round-down-to-grid>
    pub(super) fn op_rdtg(&mut self) -> OpResult {
        self.set_round_mode(RoundMode::DownToGrid)
    }

    /// Round up to grid.
    ///
    /// RUTG[] (0x7C)
    ///
    /// See <https://learn.microsoft.com/en-us/typography/opentype/spec/tt_instructions#round-up-to-grid>
    pub(super) fn op_rutg(&mut self) -> OpResult {
        self.set_round_mode(RoundMode::UpToGrid)
    }

    /// Round off.
    ///
    /// ROFF[] (0x7A)
    ///
    /// See <https://learn.microsoft.com/en-us/typography/opentype/spec/tt_instructions#round-off>
    pub(super) fn op_roff(&mut self) -> OpResult {
        self.set_round_mode(RoundMode::Off)
    }

    /// Super round.
    ///
    /// SROUND[] (0x76)
    ///
    /// Pops: n: number decomposed to obtain period, phase and threshold
    ///
    /// See <https://learn.microsoft.com/en-us/typography/opentype/spec/tt_instructions#super-round>
    pub(super) fn op_sround(&mut self) -> OpResult {
        let selector = self.value_stack.pop()?;
        self.graphics.round_state = RoundState::from_super(selector, false);
        Ok(())
    }

    /// Super round 45 degrees.
    ///
    /// S45ROUND[] (0x77)
    ///
    /// Pops: n: number decomposed to obtain period, phase and threshold
    ///
    /// See <https://learn.microsoft.com/en-us/typography/opentype/spec/tt_instructions#super-round-45-degrees>
    pub(super) fn op_s45round(&mut self) -> OpResult {
        let selector = self.value_stack.pop()?;
        self.graphics.round_state = RoundState::from_super(selector, true);
        Ok(())
    }

    /// Round value.
    ///
    /// ROUND\[ab\] (0x68 - 0x6B)
    ///
    /// Pops: n1
    /// Pushes: n2: rounded value
    ///
    /// The engine distance type in the low bits is ignored since no
    /// compensation is applied.
    ///
    /// See <https://learn.microsoft.com/en-us/typography/opentype/spec/tt_instructions#round-value>
    pub(super) fn op_round(&mut self) -> OpResult {
        let n1 = self.value_stack.pop()?;
        let n2 = self.round(n1);
        self.value_stack.push(n2)
    }

    /// No rounding of value.
    ///
    /// NROUND\[ab\] (0x6C - 0x6F)
    ///
    /// Leaves the value on the stack unchanged.
    ///
    /// See <https://learn.microsoft.com/en-us/typography/opentype/spec/tt_instructions#no-rounding-of-value>
    pub(super) fn op_nround(&mut self) -> OpResult {
        Ok(())
    }

    fn set_round_mode(&mut self, mode: RoundMode) -> OpResult {
        self.graphics.round_state = RoundState::new(mode);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{
        super::{super::opcodes as op, MockEngine},
        RoundMode,
    };

    #[test]
    fn set_modes() {
        let mut mock = MockEngine::new();
        let mut engine = mock.engine();
        let cases = [
            (op::RTHG, RoundMode::HalfGrid),
            (op::RTDG, RoundMode::DoubleGrid),
            (op::RDTG, RoundMode::DownToGrid),
            (op::RUTG, RoundMode::UpToGrid),
            (op::ROFF, RoundMode::Off),
            (op::RTG, RoundMode::Grid),
        ];
        for (opcode, mode) in cases {
            engine.dispatch(0, opcode).unwrap();
            assert_eq!(engine.graphics.round_state.mode, mode);
            assert_eq!(engine.graphics.round_state.period, 64);
        }
        engine.push_all(&[0b01_10_0100]);
        engine.dispatch(0, op::SROUND).unwrap();
        let state = engine.graphics.round_state;
        assert_eq!(state.mode, RoundMode::Super);
        assert_eq!((state.period, state.phase, state.threshold), (64, 32, 0));
        engine.push_all(&[0b01_00_0000]);
        engine.dispatch(0, op::S45ROUND).unwrap();
        assert_eq!(engine.graphics.round_state.mode, RoundMode::Super45);
    }

    #[test]
    fn round_value() {
        let mut mock = MockEngine::new();
        let mut engine = mock.engine();
        for opcode in op::ROUND00..=op::ROUND11 {
            engine.push_all(&[95]);
            engine.dispatch(0, opcode).unwrap();
            assert_eq!(engine.value_stack.pop(), Ok(64));
        }
        engine.dispatch(0, op::RUTG).unwrap();
        engine.push_all(&[-1]);
        engine.dispatch(0, op::ROUND00).unwrap();
        assert_eq!(engine.value_stack.pop(), Ok(-64));
        for opcode in op::NROUND00..=op::NROUND11 {
            engine.push_all(&[95]);
            engine.dispatch(0, opcode).unwrap();
            assert_eq!(engine.value_stack.pop(), Ok(95));
        }
    }
}
