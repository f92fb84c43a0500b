//! Control value table.

use super::error::HintErrorKind;
use crate::{font::Font, font_data::FontData};

/// Replaces `values` with the font's `cvt` entries scaled to 26.6.
///
/// A trailing odd byte is ignored.
pub fn scale_into(font: &Font, scale: i32, values: &mut Vec<i32>) {
    let data = FontData::new(font.cvt());
    values.clear();
    values.extend((0..data.len() / 2).map(|i| {
        let funits = data.read_at::<i16>(i * 2).unwrap_or_default();
        font.scale(funits as i32, scale)
    }));
}

/// Mutable view of scaled control values used by a running program.
pub struct Cvt<'a> {
    values: &'a mut [i32],
}

impl<'a> Cvt<'a> {
    pub fn new(values: &'a mut [i32]) -> Self {
        Self { values }
    }

    pub fn get(&self, index: usize) -> Result<i32, HintErrorKind> {
        self.values
            .get(index)
            .copied()
            .ok_or(HintErrorKind::InvalidCvtIndex(index))
    }

    pub fn set(&mut self, index: usize, value: i32) -> Result<(), HintErrorKind> {
        let entry = self
            .values
            .get_mut(index)
            .ok_or(HintErrorKind::InvalidCvtIndex(index))?;
        *entry = value;
        Ok(())
    }

    /// Adds `delta` with 32-bit wraparound.
    pub fn add(&mut self, index: usize, delta: i32) -> Result<(), HintErrorKind> {
        let value = self.get(index)?;
        self.set(index, value.wrapping_add(delta))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::FontTables;

    #[test]
    fn scaled_entries() {
        let font = Font::new(FontTables {
            units_per_em: 1000,
            // 100, -250, 1000 and a stray byte
            cvt: &[0x00, 0x64, 0xFF, 0x06, 0x03, 0xE8, 0x7F],
            ..Default::default()
        })
        .unwrap();
        let mut values = vec![1, 2, 3, 4, 5];
        scale_into(&font, 16 * 64, &mut values);
        // 102.4 rounds down, -256 is exact.
        assert_eq!(values, [102, -256, 1024]);
        scale_into(&font, 32 * 64, &mut values);
        assert_eq!(values, [205, -512, 2048]);
    }

    #[test]
    fn bounds_checked_access() {
        let mut values = [10, i32::MAX];
        let mut cvt = Cvt::new(&mut values);
        cvt.add(1, 1).unwrap();
        assert_eq!(cvt.get(1), Ok(i32::MIN));
        cvt.set(0, -5).unwrap();
        assert_eq!(cvt.get(0), Ok(-5));
        assert_eq!(cvt.get(2), Err(HintErrorKind::InvalidCvtIndex(2)));
        assert_eq!(cvt.add(9, 1), Err(HintErrorKind::InvalidCvtIndex(9)));
        assert_eq!(values, [-5, i32::MIN]);
    }
}
