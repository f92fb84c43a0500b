//! Operand stack of the interpreter.

use super::error::HintErrorKind;

use HintErrorKind::{InvalidStackValue, ValueStackOverflow, ValueStackUnderflow};

/// Fixed capacity stack of 32-bit operands.
///
/// Storage is borrowed from the hinter and sized from `maxp` so a running
/// program never allocates. Every failure leaves the stack as it was.
pub struct ValueStack<'a> {
    slots: &'a mut [i32],
    len: usize,
}

impl<'a> ValueStack<'a> {
    pub fn new(slots: &'a mut [i32]) -> Self {
        Self { slots, len: 0 }
    }

    /// Number of operands currently on the stack. This is the value pushed
    /// by DEPTH.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Live operands, bottom first.
    pub fn values(&self) -> &[i32] {
        &self.slots[..self.len]
    }

    pub fn push(&mut self, value: i32) -> Result<(), HintErrorKind> {
        let slot = self.slots.get_mut(self.len).ok_or(ValueStackOverflow)?;
        *slot = value;
        self.len += 1;
        Ok(())
    }

    /// Copies operands embedded in the instruction stream. Bytes are
    /// unsigned and words are signed big endian.
    pub fn push_inline(&mut self, data: &[u8], is_words: bool) -> Result<(), HintErrorKind> {
        let count = if is_words { data.len() / 2 } else { data.len() };
        let end = self.len + count;
        let dest = self
            .slots
            .get_mut(self.len..end)
            .ok_or(ValueStackOverflow)?;
        if is_words {
            for (slot, word) in dest.iter_mut().zip(data.chunks_exact(2)) {
                *slot = i16::from_be_bytes([word[0], word[1]]) as i32;
            }
        } else {
            for (slot, byte) in dest.iter_mut().zip(data) {
                *slot = *byte as i32;
            }
        }
        self.len = end;
        Ok(())
    }

    /// Returns the top operand without removing it.
    pub fn peek(&self) -> Result<i32, HintErrorKind> {
        self.len
            .checked_sub(1)
            .and_then(|ix| self.slots.get(ix))
            .copied()
            .ok_or(ValueStackUnderflow)
    }

    pub fn pop(&mut self) -> Result<i32, HintErrorKind> {
        let value = self.peek()?;
        self.len -= 1;
        Ok(value)
    }

    /// Pops an index operand. Negative values become huge and fail the
    /// caller's bounds check.
    pub fn pop_usize(&mut self) -> Result<usize, HintErrorKind> {
        self.pop().map(|value| value as usize)
    }

    pub fn apply_unary(
        &mut self,
        mut op: impl FnMut(i32) -> Result<i32, HintErrorKind>,
    ) -> Result<(), HintErrorKind> {
        let value = self.peek()?;
        let result = op(value)?;
        self.slots[self.len - 1] = result;
        Ok(())
    }

    /// Replaces the top two operands `a b` with `op(a, b)`.
    pub fn apply_binary(
        &mut self,
        mut op: impl FnMut(i32, i32) -> Result<i32, HintErrorKind>,
    ) -> Result<(), HintErrorKind> {
        let [a, b] = self.top::<2>()?;
        let result = op(a, b)?;
        self.len -= 1;
        self.slots[self.len - 1] = result;
        Ok(())
    }

    pub fn clear(&mut self) {
        self.len = 0;
    }

    pub fn dup(&mut self) -> Result<(), HintErrorKind> {
        let value = self.peek()?;
        self.push(value)
    }

    pub fn swap(&mut self) -> Result<(), HintErrorKind> {
        let [a, b] = self.top::<2>()?;
        self.slots[self.len - 2] = b;
        self.slots[self.len - 1] = a;
        Ok(())
    }

    /// ROLL: `a b c` becomes `b c a`.
    pub fn roll(&mut self) -> Result<(), HintErrorKind> {
        self.top::<3>()?;
        self.slots[self.len - 3..self.len].rotate_left(1);
        Ok(())
    }

    /// CINDEX: replaces the depth on top with a copy of the operand that
    /// many places below it.
    pub fn copy_index(&mut self) -> Result<(), HintErrorKind> {
        let (top, source) = self.index_operand()?;
        self.slots[top] = self.slots[source];
        Ok(())
    }

    /// MINDEX: pops a depth and moves the operand at that depth to the top.
    pub fn move_index(&mut self) -> Result<(), HintErrorKind> {
        let (top, source) = self.index_operand()?;
        self.slots[source..top].rotate_left(1);
        self.len -= 1;
        Ok(())
    }

    /// Top `N` operands, bottom first, without popping.
    fn top<const N: usize>(&self) -> Result<[i32; N], HintErrorKind> {
        let start = self.len.checked_sub(N).ok_or(ValueStackUnderflow)?;
        let mut out = [0; N];
        out.copy_from_slice(&self.slots[start..self.len]);
        Ok(out)
    }

    /// Resolves the depth operand of CINDEX and MINDEX to the slot holding
    /// the depth and the slot it refers to.
    fn index_operand(&self) -> Result<(usize, usize), HintErrorKind> {
        let top = self.len.checked_sub(1).ok_or(ValueStackUnderflow)?;
        let depth = self.slots[top];
        if depth <= 0 || depth as usize > top {
            return Err(InvalidStackValue(depth));
        }
        Ok((top, top - depth as usize))
    }
}
