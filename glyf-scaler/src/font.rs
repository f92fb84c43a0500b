//! Font level data consumed by the loader and hinter.
//!
//! The container format (table directory) is parsed elsewhere; this module
//! only needs the raw bytes of the relevant tables along with a handful of
//! header values.

use core::sync::atomic::{AtomicU64, Ordering};

use crate::{error::LoadError, font_data::FontData};

/// A glyph identifier.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Debug)]
pub struct GlyphId(u16);

impl GlyphId {
    /// The identifier of the `.notdef` glyph.
    pub const NOTDEF: GlyphId = GlyphId(0);

    pub const fn new(raw: u16) -> Self {
        Self(raw)
    }

    pub const fn to_u16(self) -> u16 {
        self.0
    }

    pub const fn to_u32(self) -> u32 {
        self.0 as u32
    }
}

impl From<u16> for GlyphId {
    fn from(value: u16) -> Self {
        Self(value)
    }
}

impl core::fmt::Display for GlyphId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Width of the entries in the `loca` table.
#[derive(Copy, Clone, PartialEq, Eq, Default, Debug)]
pub enum LocaFormat {
    /// Offsets are stored as `u16` and must be multiplied by 2.
    #[default]
    Short,
    /// Offsets are stored as `u32`.
    Long,
}

impl LocaFormat {
    /// Decodes the `indexToLocFormat` field of the `head` table.
    pub fn from_index_to_loc_format(value: i16) -> Option<Self> {
        match value {
            0 => Some(Self::Short),
            1 => Some(Self::Long),
            _ => None,
        }
    }
}

/// Limits declared by the `maxp` table that size the hinter's buffers.
#[derive(Copy, Clone, PartialEq, Eq, Default, Debug)]
pub struct MaxProfile {
    pub max_twilight_points: u16,
    pub max_storage: u16,
    pub max_function_defs: u16,
    pub max_stack_elements: u16,
}

/// Unscaled horizontal metrics for a single glyph.
#[derive(Copy, Clone, PartialEq, Eq, Default, Debug)]
pub struct HMetric {
    pub advance_width: i32,
    pub left_side_bearing: i32,
}

/// Unscaled vertical metrics for a single glyph.
#[derive(Copy, Clone, PartialEq, Eq, Default, Debug)]
pub struct VMetric {
    pub advance_height: i32,
    pub top_side_bearing: i32,
}

/// Raw table data and header values for a font.
///
/// Tables that are not present should be left empty.
#[derive(Copy, Clone, Default, Debug)]
pub struct FontTables<'a> {
    pub glyf: &'a [u8],
    pub loca: &'a [u8],
    pub fpgm: &'a [u8],
    pub prep: &'a [u8],
    pub cvt: &'a [u8],
    pub hdmx: &'a [u8],
    pub hmtx: &'a [u8],
    pub vmtx: &'a [u8],
    pub os2: &'a [u8],
    pub units_per_em: u16,
    pub loca_format: LocaFormat,
    pub num_glyphs: u16,
    pub num_h_metrics: u16,
    pub max_profile: MaxProfile,
}

/// Process unique identity of a [`Font`].
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct FontId(u64);

impl FontId {
    fn next() -> Self {
        static NEXT_ID: AtomicU64 = AtomicU64::new(0);
        Self(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// A validated view of the tables needed to load and hint glyphs.
#[derive(Clone, Debug)]
pub struct Font<'a> {
    id: FontId,
    tables: FontTables<'a>,
}

impl<'a> Font<'a> {
    /// Validates the given tables and creates a new font.
    pub fn new(tables: FontTables<'a>) -> Result<Self, LoadError> {
        if !(16..=16384).contains(&tables.units_per_em) {
            return Err(LoadError::InvalidHeader {
                table: "head",
                field: "unitsPerEm",
            });
        }
        let num_glyphs = tables.num_glyphs as usize;
        let entry_size = match tables.loca_format {
            LocaFormat::Short => 2,
            LocaFormat::Long => 4,
        };
        if num_glyphs != 0 && tables.loca.len() < (num_glyphs + 1) * entry_size {
            return Err(LoadError::MissingTable("loca"));
        }
        if num_glyphs != 0 && tables.num_h_metrics == 0 {
            return Err(LoadError::InvalidHeader {
                table: "hhea",
                field: "numberOfHMetrics",
            });
        }
        if tables.num_h_metrics > tables.num_glyphs
            || tables.hmtx.len() < 4 * tables.num_h_metrics as usize
        {
            return Err(LoadError::MissingTable("hmtx"));
        }
        Ok(Self {
            id: FontId::next(),
            tables,
        })
    }

    /// Creates a font from a function that returns the data for a table tag.
    ///
    /// The `head`, `maxp` and `hhea` tables are decoded for the required
    /// header values and all others are sliced directly.
    pub fn from_table_provider(
        provider: impl Fn(&[u8; 4]) -> Option<&'a [u8]>,
    ) -> Result<Self, LoadError> {
        let table = |tag: &'static [u8; 4]| provider(tag).unwrap_or_default();
        let required = |tag: &'static [u8; 4], name| {
            provider(tag)
                .map(FontData::new)
                .ok_or(LoadError::MissingTable(name))
        };
        let head = required(b"head", "head")?;
        let units_per_em = head
            .read_at::<u16>(18)
            .map_err(|_| LoadError::MissingTable("head"))?;
        let loca_format = head
            .read_at::<i16>(50)
            .ok()
            .and_then(LocaFormat::from_index_to_loc_format)
            .ok_or(LoadError::InvalidHeader {
                table: "head",
                field: "indexToLocFormat",
            })?;
        let maxp = required(b"maxp", "maxp")?;
        let num_glyphs = maxp
            .read_at::<u16>(4)
            .map_err(|_| LoadError::MissingTable("maxp"))?;
        // Version 0.5 tables omit the TrueType limits.
        let max_profile = if maxp.read_at::<u32>(0) == Ok(0x00010000) {
            let read = |offset| maxp.read_at::<u16>(offset).unwrap_or_default();
            MaxProfile {
                max_twilight_points: read(16),
                max_storage: read(18),
                max_function_defs: read(20),
                max_stack_elements: read(24),
            }
        } else {
            MaxProfile::default()
        };
        let num_h_metrics = required(b"hhea", "hhea")?
            .read_at::<u16>(34)
            .map_err(|_| LoadError::MissingTable("hhea"))?;
        Self::new(FontTables {
            glyf: table(b"glyf"),
            loca: table(b"loca"),
            fpgm: table(b"fpgm"),
            prep: table(b"prep"),
            cvt: table(b"cvt "),
            hdmx: table(b"hdmx"),
            hmtx: table(b"hmtx"),
            vmtx: table(b"vmtx"),
            os2: table(b"OS/2"),
            units_per_em,
            loca_format,
            num_glyphs,
            num_h_metrics,
            max_profile,
        })
    }

    /// Returns the process unique identity of this font.
    pub fn id(&self) -> FontId {
        self.id
    }

    pub fn tables(&self) -> &FontTables<'a> {
        &self.tables
    }

    pub fn units_per_em(&self) -> i32 {
        self.tables.units_per_em as i32
    }

    pub fn num_glyphs(&self) -> u16 {
        self.tables.num_glyphs
    }

    pub fn max_profile(&self) -> &MaxProfile {
        &self.tables.max_profile
    }

    pub fn font_program(&self) -> &'a [u8] {
        self.tables.fpgm
    }

    pub fn control_value_program(&self) -> &'a [u8] {
        self.tables.prep
    }

    /// Returns the raw control value table.
    pub fn cvt(&self) -> &'a [u8] {
        self.tables.cvt
    }

    /// Converts a value in font units to 26.6 device units at the given
    /// scale, expressed as 26.6 pixels per em.
    ///
    /// The result is rounded to the nearest integer, with halves rounded away
    /// from zero, and saturates at the bounds of `i32`.
    pub fn scale(&self, value: i32, scale: i32) -> i32 {
        let upem = self.units_per_em() as i64;
        let x = value as i64 * scale as i64;
        let x = if x >= 0 { x + upem / 2 } else { x - upem / 2 };
        (x / upem).clamp(i32::MIN as i64, i32::MAX as i64) as i32
    }

    /// Returns the byte range of the glyph's record in the `glyf` table.
    ///
    /// An empty range denotes a glyph with no outline.
    pub fn glyph_data(&self, gid: GlyphId) -> Result<&'a [u8], LoadError> {
        if gid.to_u16() >= self.tables.num_glyphs {
            return Err(LoadError::GlyphNotFound(gid));
        }
        let loca = FontData::new(self.tables.loca);
        let ix = gid.to_u16() as usize;
        let read = |ix: usize| match self.tables.loca_format {
            LocaFormat::Short => loca.read_at::<u16>(ix * 2).map(|off| off as usize * 2),
            LocaFormat::Long => loca.read_at::<u32>(ix * 4).map(|off| off as usize),
        };
        let start = read(ix).map_err(|_| LoadError::GlyphNotFound(gid))?;
        let end = read(ix + 1).map_err(|_| LoadError::GlyphNotFound(gid))?;
        if start > end {
            return Err(LoadError::InvalidGlyphOffset(gid));
        }
        self.tables
            .glyf
            .get(start..end)
            .ok_or(LoadError::InvalidGlyphOffset(gid))
    }

    /// Returns the unscaled horizontal metrics for the glyph.
    pub fn unscaled_h_metric(&self, gid: GlyphId) -> HMetric {
        let ix = gid.to_u16() as usize;
        if ix >= self.tables.num_glyphs as usize {
            return HMetric::default();
        }
        let hmtx = FontData::new(self.tables.hmtx);
        let num_long = self.tables.num_h_metrics as usize;
        if ix < num_long {
            return HMetric {
                advance_width: hmtx.read_at::<u16>(4 * ix).unwrap_or_default() as i32,
                left_side_bearing: hmtx.read_at::<i16>(4 * ix + 2).unwrap_or_default() as i32,
            };
        }
        // Glyphs beyond the long metrics share the last advance width and
        // carry only a side bearing.
        let Some(last) = num_long.checked_sub(1) else {
            return HMetric::default();
        };
        HMetric {
            advance_width: hmtx.read_at::<u16>(4 * last).unwrap_or_default() as i32,
            left_side_bearing: hmtx
                .read_at::<i16>(4 * num_long + 2 * (ix - num_long))
                .unwrap_or_default() as i32,
        }
    }

    /// Returns the unscaled vertical metrics for the glyph.
    ///
    /// Falls back to the typographic ascender and descender from the `OS/2`
    /// table and then to the em square when there are no vertical metrics.
    pub fn unscaled_v_metric(&self, gid: GlyphId, y_max: i32) -> VMetric {
        let ix = gid.to_u16() as usize;
        if ix >= self.tables.num_glyphs as usize {
            return VMetric::default();
        }
        let vmtx = FontData::new(self.tables.vmtx);
        if let (Ok(advance), Ok(tsb)) = (
            vmtx.read_at::<u16>(4 * ix),
            vmtx.read_at::<i16>(4 * ix + 2),
        ) {
            return VMetric {
                advance_height: advance as i32,
                top_side_bearing: tsb as i32,
            };
        }
        // The typographic fields were not present in the original 68 byte
        // version of the table.
        let os2 = FontData::new(self.tables.os2);
        if os2.len() >= 72 {
            let ascender = os2.read_at::<i16>(68).unwrap_or_default() as i32;
            let descender = os2.read_at::<i16>(70).unwrap_or_default() as i32;
            return VMetric {
                advance_height: ascender - descender,
                top_side_bearing: ascender - y_max,
            };
        }
        VMetric {
            advance_height: self.units_per_em(),
            top_side_bearing: 0,
        }
    }

    /// Returns the device advance width in whole pixels from the `hdmx`
    /// record for the given pixels per em, if present.
    pub fn hdmx_advance(&self, gid: GlyphId, ppem: i32) -> Option<u8> {
        let hdmx = FontData::new(self.tables.hdmx);
        let num_records = hdmx.read_at::<i16>(2).ok()?;
        let record_size = hdmx.read_at::<u32>(4).ok()? as usize;
        if record_size <= 2 + gid.to_u16() as usize {
            return None;
        }
        (0..num_records.max(0) as usize)
            .filter_map(|i| hdmx.slice(8 + i * record_size..8 + (i + 1) * record_size))
            .find(|record| record.read_at::<u8>(0).ok().map(|ppem| ppem as i32) == Some(ppem))?
            .read_at::<u8>(2 + gid.to_u16() as usize)
            .ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tables() -> FontTables<'static> {
        FontTables {
            units_per_em: 1000,
            num_glyphs: 3,
            num_h_metrics: 2,
            loca: &[0, 0, 0, 0, 0, 0, 0, 0],
            #[rustfmt::skip]
            hmtx: &[
                0x01, 0xF4, 0x00, 0x0A, // 500, 10
                0x02, 0x58, 0xFF, 0xF6, // 600, -10
                0x00, 0x05,             // 5
            ],
            ..Default::default()
        }
    }

    #[test]
    fn scale_rounds_half_away_from_zero() {
        let font = Font::new(tables()).unwrap();
        // 12ppem
        let scale = 12 * 64;
        assert_eq!(font.scale(500, scale), 384);
        assert_eq!(font.scale(-500, scale), -384);
        assert_eq!(font.scale(1500, 1), 2);
        assert_eq!(font.scale(-1500, 1), -2);
        assert_eq!(font.scale(1499, 1), 1);
        // No intermediate overflow
        assert_eq!(font.scale(32767, 1000 * 64), 2097088);
        // Huge sizes saturate instead of truncating.
        assert_eq!(font.scale(32767, i32::MAX), i32::MAX);
        assert_eq!(font.scale(-32768, i32::MAX), i32::MIN);
        assert_eq!(font.scale(i32::MIN, i32::MIN), i32::MAX);
    }

    #[test]
    fn h_metrics() {
        let font = Font::new(tables()).unwrap();
        assert_eq!(
            font.unscaled_h_metric(GlyphId::new(0)),
            HMetric {
                advance_width: 500,
                left_side_bearing: 10
            }
        );
        assert_eq!(
            font.unscaled_h_metric(GlyphId::new(2)),
            HMetric {
                advance_width: 600,
                left_side_bearing: 5
            }
        );
        assert_eq!(font.unscaled_h_metric(GlyphId::new(3)), HMetric::default());
    }

    #[test]
    fn v_metrics_fallback() {
        let font = Font::new(tables()).unwrap();
        assert_eq!(
            font.unscaled_v_metric(GlyphId::new(0), 700),
            VMetric {
                advance_height: 1000,
                top_side_bearing: 0
            }
        );
        let mut os2 = vec![0u8; 72];
        os2[68..70].copy_from_slice(&800i16.to_be_bytes());
        os2[70..72].copy_from_slice(&(-200i16).to_be_bytes());
        let font = Font::new(FontTables {
            os2: &os2,
            ..tables()
        })
        .unwrap();
        assert_eq!(
            font.unscaled_v_metric(GlyphId::new(0), 700),
            VMetric {
                advance_height: 1000,
                top_side_bearing: 100
            }
        );
    }

    #[test]
    fn hdmx_lookup() {
        #[rustfmt::skip]
        let hdmx = [
            0, 0, 0, 2, 0, 0, 0, 6, // version, 2 records of 6 bytes
            12, 9, 6, 7, 8, 0,      // 12ppem, max 9, widths
            16, 11, 8, 9, 11, 0,    // 16ppem, max 11, widths
        ];
        let font = Font::new(FontTables {
            hdmx: &hdmx,
            ..tables()
        })
        .unwrap();
        assert_eq!(font.hdmx_advance(GlyphId::new(1), 12), Some(7));
        assert_eq!(font.hdmx_advance(GlyphId::new(2), 16), Some(11));
        assert_eq!(font.hdmx_advance(GlyphId::new(1), 13), None);
        assert_eq!(font.hdmx_advance(GlyphId::new(4), 12), None);
    }

    #[test]
    fn invalid_headers() {
        assert!(matches!(
            Font::new(FontTables {
                units_per_em: 0,
                ..tables()
            }),
            Err(LoadError::InvalidHeader { .. })
        ));
        assert_eq!(
            Font::new(FontTables {
                loca: &[0, 0],
                ..tables()
            })
            .err(),
            Some(LoadError::MissingTable("loca"))
        );
    }

    #[test]
    fn fonts_have_distinct_ids() {
        let a = Font::new(tables()).unwrap();
        let b = Font::new(tables()).unwrap();
        assert_ne!(a.id(), b.id());
        assert_eq!(a.clone().id(), a.id());
    }

    #[test]
    fn glyph_data_ranges() {
        let glyf = [0u8; 12];
        let font = Font::new(FontTables {
            glyf: &glyf,
            // short offsets: 0, 10, 10, 20 (halved)
            loca: &[0, 0, 0, 5, 0, 5, 0, 10],
            ..tables()
        })
        .unwrap();
        assert_eq!(font.glyph_data(GlyphId::new(0)).unwrap().len(), 10);
        assert!(font.glyph_data(GlyphId::new(1)).unwrap().is_empty());
        assert_eq!(
            font.glyph_data(GlyphId::new(2)),
            Err(LoadError::InvalidGlyphOffset(GlyphId::new(2)))
        );
        assert_eq!(
            font.glyph_data(GlyphId::new(3)),
            Err(LoadError::GlyphNotFound(GlyphId::new(3)))
        );
    }
}
