//! raw font bytes

use core::ops::RangeBounds;

/// An error that occurs when reading beyond the end of font data.
#[derive(Copy, Clone, PartialEq, Eq, Debug, thiserror::Error)]
#[error("an offset was out of bounds")]
pub struct OutOfBounds;

/// A big-endian scalar that can be read from font data.
pub trait ReadScalar: Sized {
    /// The size of the raw type.
    const RAW_BYTE_LEN: usize;

    /// Decodes the value from exactly `RAW_BYTE_LEN` bytes.
    fn read(bytes: &[u8]) -> Option<Self>;
}

macro_rules! read_scalar_impl {
    ($ty:ty, $len:literal) => {
        impl ReadScalar for $ty {
            const RAW_BYTE_LEN: usize = $len;

            #[inline]
            fn read(bytes: &[u8]) -> Option<Self> {
                bytes.try_into().ok().map(<$ty>::from_be_bytes)
            }
        }
    };
}

read_scalar_impl!(u8, 1);
read_scalar_impl!(i8, 1);
read_scalar_impl!(u16, 2);
read_scalar_impl!(i16, 2);
read_scalar_impl!(u32, 4);
read_scalar_impl!(i32, 4);

/// A reference to raw binary font data.
///
/// This is a wrapper around a byte slice, that provides convenience methods
/// for reading big-endian values with bounds checking.
#[derive(Debug, Default, Clone, Copy)]
pub struct FontData<'a> {
    bytes: &'a [u8],
}

/// A cursor for sequential reads over font data.
pub struct Cursor<'a> {
    pos: usize,
    data: FontData<'a>,
}

impl<'a> FontData<'a> {
    /// Create a new `FontData` with these bytes.
    pub const fn new(bytes: &'a [u8]) -> Self {
        FontData { bytes }
    }

    /// The length of the data, in bytes
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// `true` if the data has a length of zero bytes.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Returns the underlying bytes.
    pub fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }

    pub fn slice(&self, range: impl RangeBounds<usize>) -> Option<FontData<'a>> {
        let bounds = (range.start_bound().cloned(), range.end_bound().cloned());
        self.bytes.get(bounds).map(|bytes| FontData { bytes })
    }

    pub fn read_at<T: ReadScalar>(&self, offset: usize) -> Result<T, OutOfBounds> {
        self.bytes
            .get(offset..offset.checked_add(T::RAW_BYTE_LEN).ok_or(OutOfBounds)?)
            .and_then(T::read)
            .ok_or(OutOfBounds)
    }

    pub fn cursor(&self) -> Cursor<'a> {
        Cursor {
            pos: 0,
            data: *self,
        }
    }
}

impl<'a> Cursor<'a> {
    pub fn advance_by(&mut self, n_bytes: usize) {
        self.pos = self.pos.saturating_add(n_bytes);
    }

    pub fn read<T: ReadScalar>(&mut self) -> Result<T, OutOfBounds> {
        let temp = self.data.read_at(self.pos);
        self.pos = self.pos.saturating_add(T::RAW_BYTE_LEN);
        temp
    }

    /// Reads `len` raw bytes.
    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8], OutOfBounds> {
        let end = self.pos.checked_add(len).ok_or(OutOfBounds)?;
        let bytes = self
            .data
            .slice(self.pos..end)
            .ok_or(OutOfBounds)?
            .as_bytes();
        self.pos = end;
        Ok(bytes)
    }

    /// Returns the current position.
    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining_bytes(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }
}

impl AsRef<[u8]> for FontData<'_> {
    fn as_ref(&self) -> &[u8] {
        self.bytes
    }
}
