//! Reads and writes of the storage area and the control value table.
//!
//! Every write instruction pops the value first and the index second. An
//! index outside either table is an error rather than a silent zero.

use super::{Engine, HintErrorKind, OpResult};

impl<'a> Engine<'a> {
    /// RS: replaces an index with the stored value.
    pub(super) fn op_rs(&mut self) -> OpResult {
        let index = self.value_stack.pop_usize()?;
        let value = self.storage_slot(index).copied()?;
        self.value_stack.push(value)
    }

    pub(super) fn op_ws(&mut self) -> OpResult {
        let value = self.value_stack.pop()?;
        let index = self.value_stack.pop_usize()?;
        *self.storage_slot_mut(index)? = value;
        Ok(())
    }

    /// RCVT: pushes a control value in 26.6.
    pub(super) fn op_rcvt(&mut self) -> OpResult {
        let index = self.value_stack.pop_usize()?;
        let value = self.cvt_get(index)?;
        self.value_stack.push(value)
    }

    /// WCVTP takes a 26.6 value and WCVTF a value in font units that is
    /// scaled first.
    pub(super) fn op_wcvt(&mut self, in_font_units: bool) -> OpResult {
        let mut value = self.value_stack.pop()?;
        let index = self.value_stack.pop_usize()?;
        if in_font_units {
            value = self.font.scale(value, self.scale);
        }
        self.cvt.set(index, value)
    }

    fn storage_slot(&self, index: usize) -> Result<&i32, HintErrorKind> {
        self.storage
            .get(index)
            .ok_or(HintErrorKind::InvalidStorageIndex(index))
    }

    fn storage_slot_mut(&mut self, index: usize) -> Result<&mut i32, HintErrorKind> {
        self.storage
            .get_mut(index)
            .ok_or(HintErrorKind::InvalidStorageIndex(index))
    }
}

#[cfg(test)]
mod tests {
    use super::super::{super::opcodes as op, HintErrorKind, MockEngine};

    #[test]
    fn storage_keeps_values() {
        let mut mock = MockEngine::new();
        let mut engine = mock.engine();
        engine.push_all(&[3, -640, 15, 7]);
        engine.dispatch(0, op::WS).unwrap();
        engine.dispatch(0, op::WS).unwrap();
        for index in [15, 3, 0] {
            engine.push_all(&[index]);
            engine.dispatch(0, op::RS).unwrap();
        }
        // Untouched slots read as zero.
        assert_eq!(engine.stack(), &[7, -640, 0]);
    }

    #[test]
    fn storage_index_checked() {
        let mut mock = MockEngine::new();
        let mut engine = mock.engine();
        // The mock storage has 16 slots.
        engine.push_all(&[16, 1]);
        assert_eq!(
            engine.dispatch(0, op::WS),
            Err(HintErrorKind::InvalidStorageIndex(16))
        );
        engine.value_stack.clear();
        engine.push_all(&[-2]);
        assert_eq!(
            engine.dispatch(0, op::RS),
            Err(HintErrorKind::InvalidStorageIndex(usize::MAX - 1))
        );
    }

    #[test]
    fn cvt_units() {
        let mut mock = MockEngine::new();
        // Two pixels per em against 64 units per em doubles every entry.
        mock.scale = 128;
        let mut engine = mock.engine();
        for (index, expected) in [(1, 128), (2, -200), (4, 60)] {
            engine.push_all(&[index]);
            engine.dispatch(0, op::RCVT).unwrap();
            assert_eq!(engine.value_stack.pop(), Ok(expected), "cvt[{index}]");
        }
        // Pixel writes are stored as is and font unit writes are scaled.
        engine.push_all(&[5, 100, 6, 100]);
        engine.dispatch(0, op::WCVTF).unwrap();
        engine.dispatch(0, op::WCVTP).unwrap();
        engine.push_all(&[5, 6]);
        engine.dispatch(0, op::RCVT).unwrap();
        assert_eq!(engine.value_stack.pop(), Ok(200));
        engine.dispatch(0, op::RCVT).unwrap();
        assert_eq!(engine.value_stack.pop(), Ok(100));
    }

    #[test]
    fn cvt_index_checked() {
        let mut mock = MockEngine::new();
        let mut engine = mock.engine();
        // The mock table has 8 entries.
        engine.push_all(&[8, 0]);
        assert_eq!(
            engine.dispatch(0, op::WCVTP),
            Err(HintErrorKind::InvalidCvtIndex(8))
        );
        engine.value_stack.clear();
        engine.push_all(&[100]);
        assert_eq!(
            engine.dispatch(0, op::RCVT),
            Err(HintErrorKind::InvalidCvtIndex(100))
        );
    }
}
