//! Tracking function call state.

use core::ops::Range;

use super::{definition::Definition, error::HintErrorKind, program::Program};

/// Maximum depth of nested function calls.
pub const MAX_CALL_DEPTH: usize = 32;

#[derive(Clone, Default, Debug)]
pub struct CallRecord {
    pub caller_program: Program,
    pub caller_range: Range<usize>,
    pub return_pc: usize,
    pub current_count: u32,
    pub definition: Definition,
}

#[derive(Default)]
pub struct CallStack {
    records: [CallRecord; MAX_CALL_DEPTH],
    len: usize,
}

impl CallStack {
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn clear(&mut self) {
        self.len = 0;
    }

    pub fn push(&mut self, record: CallRecord) -> Result<(), HintErrorKind> {
        let top = self
            .records
            .get_mut(self.len)
            .ok_or(HintErrorKind::CallStackOverflow)?;
        *top = record;
        self.len += 1;
        Ok(())
    }

    pub fn peek(&self) -> Option<&CallRecord> {
        self.records.get(self.len.checked_sub(1)?)
    }

    pub fn pop(&mut self) -> Result<CallRecord, HintErrorKind> {
        let record = self.peek().cloned().ok_or(HintErrorKind::CallStackUnderflow)?;
        self.len -= 1;
        Ok(record)
    }
}
