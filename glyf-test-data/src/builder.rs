//! Builders that assemble minimal TrueType fonts in memory.

/// Point flags of a simple glyph.
const ON_CURVE_POINT: u8 = 0x01;
const X_SHORT_VECTOR: u8 = 0x02;
const Y_SHORT_VECTOR: u8 = 0x04;
const REPEAT_FLAG: u8 = 0x08;
const X_IS_SAME_OR_POSITIVE: u8 = 0x10;
const Y_IS_SAME_OR_POSITIVE: u8 = 0x20;

/// Component flags of a composite glyph.
const ARG_1_AND_2_ARE_WORDS: u16 = 0x0001;
const ARGS_ARE_XY_VALUES: u16 = 0x0002;
const ROUND_XY_TO_GRID: u16 = 0x0004;
const WE_HAVE_A_SCALE: u16 = 0x0008;
const MORE_COMPONENTS: u16 = 0x0020;
const WE_HAVE_AN_X_AND_Y_SCALE: u16 = 0x0040;
const WE_HAVE_A_TWO_BY_TWO: u16 = 0x0080;
const WE_HAVE_INSTRUCTIONS: u16 = 0x0100;
const USE_MY_METRICS: u16 = 0x0200;

/// A glyph made of contours of `(x, y, on_curve)` points.
#[derive(Clone, Default, Debug)]
pub struct SimpleGlyph {
    contours: Vec<Vec<(i16, i16, bool)>>,
    instructions: Vec<u8>,
}

impl SimpleGlyph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contour(mut self, points: &[(i16, i16, bool)]) -> Self {
        self.contours.push(points.to_vec());
        self
    }

    pub fn instructions(mut self, code: &[u8]) -> Self {
        self.instructions = code.to_vec();
        self
    }

    /// Returns `(x_min, y_min, x_max, y_max)` of all points.
    pub fn bounds(&self) -> [i16; 4] {
        let mut points = self.contours.iter().flatten();
        let Some(&(x, y, _)) = points.next() else {
            return [0; 4];
        };
        points.fold([x, y, x, y], |[x0, y0, x1, y1], &(x, y, _)| {
            [x0.min(x), y0.min(y), x1.max(x), y1.max(y)]
        })
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        push_i16(&mut out, self.contours.len() as i16);
        for value in self.bounds() {
            push_i16(&mut out, value);
        }
        let mut end = 0usize;
        for contour in &self.contours {
            end += contour.len();
            push_u16(&mut out, end as u16 - 1);
        }
        push_u16(&mut out, self.instructions.len() as u16);
        out.extend_from_slice(&self.instructions);
        let mut flags = Vec::new();
        let mut xs = Vec::new();
        let mut ys = Vec::new();
        let (mut last_x, mut last_y) = (0i16, 0i16);
        for &(x, y, on_curve) in self.contours.iter().flatten() {
            let mut flag = if on_curve { ON_CURVE_POINT } else { 0 };
            flag |= encode_delta(
                x.wrapping_sub(last_x),
                X_SHORT_VECTOR,
                X_IS_SAME_OR_POSITIVE,
                &mut xs,
            );
            flag |= encode_delta(
                y.wrapping_sub(last_y),
                Y_SHORT_VECTOR,
                Y_IS_SAME_OR_POSITIVE,
                &mut ys,
            );
            flags.push(flag);
            (last_x, last_y) = (x, y);
        }
        let mut i = 0;
        while i < flags.len() {
            let flag = flags[i];
            let run = flags[i..]
                .iter()
                .take(256)
                .take_while(|&&f| f == flag)
                .count();
            if run > 1 {
                out.extend_from_slice(&[flag | REPEAT_FLAG, (run - 1) as u8]);
            } else {
                out.push(flag);
            }
            i += run;
        }
        out.extend_from_slice(&xs);
        out.extend_from_slice(&ys);
        out
    }
}

fn encode_delta(delta: i16, short: u8, same_or_positive: u8, out: &mut Vec<u8>) -> u8 {
    match delta {
        0 => same_or_positive,
        1..=255 => {
            out.push(delta as u8);
            short | same_or_positive
        }
        -255..=-1 => {
            out.push(delta.unsigned_abs() as u8);
            short
        }
        _ => {
            push_i16(out, delta);
            0
        }
    }
}

/// Linear transform of a component with 2.14 terms.
#[derive(Copy, Clone, PartialEq, Eq, Default, Debug)]
pub enum Transform {
    #[default]
    None,
    Scale(i16),
    XyScale(i16, i16),
    /// Terms ordered as `xx, yx, xy, yy`.
    TwoByTwo([i16; 4]),
}

/// A reference to another glyph from a composite.
#[derive(Copy, Clone, Debug)]
pub struct Component {
    glyph_id: u16,
    dx: i16,
    dy: i16,
    transform: Transform,
    flags: u16,
}

impl Component {
    pub fn new(glyph_id: u16, dx: i16, dy: i16) -> Self {
        Self {
            glyph_id,
            dx,
            dy,
            transform: Transform::None,
            flags: ARGS_ARE_XY_VALUES,
        }
    }

    pub fn transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn round_to_grid(mut self) -> Self {
        self.flags |= ROUND_XY_TO_GRID;
        self
    }

    pub fn use_my_metrics(mut self) -> Self {
        self.flags |= USE_MY_METRICS;
        self
    }

    /// Treats the offsets as point numbers to be matched.
    pub fn anchor_points(mut self) -> Self {
        self.flags &= !ARGS_ARE_XY_VALUES;
        self
    }

    fn write(&self, more: bool, instructions: bool, out: &mut Vec<u8>) {
        let mut flags = self.flags;
        let words = i8::try_from(self.dx).is_err() || i8::try_from(self.dy).is_err();
        if words {
            flags |= ARG_1_AND_2_ARE_WORDS;
        }
        if more {
            flags |= MORE_COMPONENTS;
        }
        if instructions {
            flags |= WE_HAVE_INSTRUCTIONS;
        }
        flags |= match self.transform {
            Transform::None => 0,
            Transform::Scale(_) => WE_HAVE_A_SCALE,
            Transform::XyScale(..) => WE_HAVE_AN_X_AND_Y_SCALE,
            Transform::TwoByTwo(_) => WE_HAVE_A_TWO_BY_TWO,
        };
        push_u16(out, flags);
        push_u16(out, self.glyph_id);
        if words {
            push_i16(out, self.dx);
            push_i16(out, self.dy);
        } else {
            out.extend_from_slice(&[self.dx as i8 as u8, self.dy as i8 as u8]);
        }
        match self.transform {
            Transform::None => {}
            Transform::Scale(scale) => push_i16(out, scale),
            Transform::XyScale(x, y) => {
                push_i16(out, x);
                push_i16(out, y);
            }
            Transform::TwoByTwo(terms) => terms.iter().for_each(|&t| push_i16(out, t)),
        }
    }
}

/// A glyph assembled from other glyphs.
#[derive(Clone, Default, Debug)]
pub struct CompositeGlyph {
    bounds: [i16; 4],
    components: Vec<Component>,
    instructions: Vec<u8>,
}

impl CompositeGlyph {
    /// Creates a composite with the `(x_min, y_min, x_max, y_max)` header.
    pub fn new(bounds: [i16; 4]) -> Self {
        Self {
            bounds,
            ..Default::default()
        }
    }

    pub fn component(mut self, component: Component) -> Self {
        self.components.push(component);
        self
    }

    pub fn instructions(mut self, code: &[u8]) -> Self {
        self.instructions = code.to_vec();
        self
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        push_i16(&mut out, -1);
        for value in self.bounds {
            push_i16(&mut out, value);
        }
        let has_instructions = !self.instructions.is_empty();
        let count = self.components.len();
        for (i, component) in self.components.iter().enumerate() {
            let last = i + 1 == count;
            component.write(!last, last && has_instructions, &mut out);
        }
        if has_instructions {
            push_u16(&mut out, self.instructions.len() as u16);
            out.extend_from_slice(&self.instructions);
        }
        out
    }
}

/// Outline data of a glyph.
#[derive(Clone, Default, Debug)]
pub enum Glyph {
    #[default]
    Empty,
    Simple(SimpleGlyph),
    Composite(CompositeGlyph),
    /// Arbitrary bytes, for malformed records.
    Raw(Vec<u8>),
}

impl Glyph {
    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            Self::Empty => Vec::new(),
            Self::Simple(glyph) => glyph.to_bytes(),
            Self::Composite(glyph) => glyph.to_bytes(),
            Self::Raw(data) => data.clone(),
        }
    }
}

impl From<SimpleGlyph> for Glyph {
    fn from(value: SimpleGlyph) -> Self {
        Self::Simple(value)
    }
}

impl From<CompositeGlyph> for Glyph {
    fn from(value: CompositeGlyph) -> Self {
        Self::Composite(value)
    }
}

/// Limits written to the version 1.0 `maxp` table.
#[derive(Copy, Clone, Default, Debug)]
pub struct Limits {
    pub max_twilight_points: u16,
    pub max_storage: u16,
    pub max_function_defs: u16,
    pub max_stack_elements: u16,
}

/// Assembles the tables of a TrueType font.
#[derive(Clone, Debug)]
pub struct FontBuilder {
    units_per_em: u16,
    long_loca: bool,
    /// Glyph, advance width and left side bearing.
    glyphs: Vec<(Glyph, u16, i16)>,
    fpgm: Vec<u8>,
    prep: Vec<u8>,
    cvt: Vec<i16>,
    hdmx: Vec<(u8, Vec<u8>)>,
    limits: Limits,
    typo_metrics: Option<(i16, i16)>,
}

impl FontBuilder {
    pub fn new(units_per_em: u16) -> Self {
        Self {
            units_per_em,
            long_loca: false,
            glyphs: Vec::new(),
            fpgm: Vec::new(),
            prep: Vec::new(),
            cvt: Vec::new(),
            hdmx: Vec::new(),
            limits: Limits::default(),
            typo_metrics: None,
        }
    }

    pub fn glyph(mut self, glyph: impl Into<Glyph>, advance_width: u16, lsb: i16) -> Self {
        self.glyphs.push((glyph.into(), advance_width, lsb));
        self
    }

    pub fn long_loca(mut self) -> Self {
        self.long_loca = true;
        self
    }

    pub fn fpgm(mut self, code: &[u8]) -> Self {
        self.fpgm = code.to_vec();
        self
    }

    pub fn prep(mut self, code: &[u8]) -> Self {
        self.prep = code.to_vec();
        self
    }

    pub fn cvt(mut self, values: &[i16]) -> Self {
        self.cvt = values.to_vec();
        self
    }

    /// Adds a device record with one whole pixel advance per glyph.
    pub fn hdmx(mut self, ppem: u8, widths: &[u8]) -> Self {
        self.hdmx.push((ppem, widths.to_vec()));
        self
    }

    pub fn limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    /// Adds an `OS/2` table with the given typographic ascender and
    /// descender.
    pub fn typo_metrics(mut self, ascender: i16, descender: i16) -> Self {
        self.typo_metrics = Some((ascender, descender));
        self
    }

    pub fn build(&self) -> TestFont {
        let num_glyphs = self.glyphs.len() as u16;
        let mut tables = Vec::new();

        let mut glyf = Vec::new();
        let mut offsets = vec![0usize];
        for (glyph, ..) in &self.glyphs {
            glyf.extend(glyph.to_bytes());
            if glyf.len() % 2 != 0 {
                glyf.push(0);
            }
            offsets.push(glyf.len());
        }
        let mut loca = Vec::new();
        for offset in offsets {
            if self.long_loca {
                push_u32(&mut loca, offset as u32);
            } else {
                push_u16(&mut loca, (offset / 2) as u16);
            }
        }

        let mut head = vec![0u8; 54];
        head[0..4].copy_from_slice(&0x00010000u32.to_be_bytes());
        head[12..16].copy_from_slice(&0x5F0F3CF5u32.to_be_bytes());
        head[18..20].copy_from_slice(&self.units_per_em.to_be_bytes());
        head[50..52].copy_from_slice(&(self.long_loca as i16).to_be_bytes());
        tables.push((*b"head", head));

        let mut maxp = vec![0u8; 32];
        maxp[0..4].copy_from_slice(&0x00010000u32.to_be_bytes());
        maxp[4..6].copy_from_slice(&num_glyphs.to_be_bytes());
        let limits = &self.limits;
        maxp[14..16].copy_from_slice(&2u16.to_be_bytes());
        maxp[16..18].copy_from_slice(&limits.max_twilight_points.to_be_bytes());
        maxp[18..20].copy_from_slice(&limits.max_storage.to_be_bytes());
        maxp[20..22].copy_from_slice(&limits.max_function_defs.to_be_bytes());
        maxp[24..26].copy_from_slice(&limits.max_stack_elements.to_be_bytes());
        tables.push((*b"maxp", maxp));

        let mut hhea = vec![0u8; 36];
        hhea[0..4].copy_from_slice(&0x00010000u32.to_be_bytes());
        hhea[34..36].copy_from_slice(&num_glyphs.to_be_bytes());
        tables.push((*b"hhea", hhea));

        let mut hmtx = Vec::new();
        for &(_, advance, lsb) in &self.glyphs {
            push_u16(&mut hmtx, advance);
            push_i16(&mut hmtx, lsb);
        }
        tables.push((*b"hmtx", hmtx));
        tables.push((*b"loca", loca));
        tables.push((*b"glyf", glyf));

        if !self.fpgm.is_empty() {
            tables.push((*b"fpgm", self.fpgm.clone()));
        }
        if !self.prep.is_empty() {
            tables.push((*b"prep", self.prep.clone()));
        }
        if !self.cvt.is_empty() {
            let mut cvt = Vec::new();
            self.cvt.iter().for_each(|&v| push_i16(&mut cvt, v));
            tables.push((*b"cvt ", cvt));
        }
        if !self.hdmx.is_empty() {
            let record_size = (2 + num_glyphs as usize + 3) & !3;
            let mut hdmx = Vec::new();
            push_u16(&mut hdmx, 0);
            push_i16(&mut hdmx, self.hdmx.len() as i16);
            push_u32(&mut hdmx, record_size as u32);
            for (ppem, widths) in &self.hdmx {
                let mut record = vec![0u8; record_size];
                record[0] = *ppem;
                record[1] = widths.iter().copied().max().unwrap_or_default();
                for (slot, &width) in record[2..].iter_mut().zip(widths) {
                    *slot = width;
                }
                hdmx.extend(record);
            }
            tables.push((*b"hdmx", hdmx));
        }
        if let Some((ascender, descender)) = self.typo_metrics {
            let mut os2 = vec![0u8; 78];
            os2[0..2].copy_from_slice(&1u16.to_be_bytes());
            os2[68..70].copy_from_slice(&ascender.to_be_bytes());
            os2[70..72].copy_from_slice(&descender.to_be_bytes());
            tables.push((*b"OS/2", os2));
        }
        tables.sort_by(|a, b| a.0.cmp(&b.0));
        TestFont { tables }
    }
}

/// The tables of a font produced by [`FontBuilder`].
#[derive(Clone, Debug)]
pub struct TestFont {
    /// Sorted by tag.
    tables: Vec<([u8; 4], Vec<u8>)>,
}

impl TestFont {
    pub fn table(&self, tag: &[u8; 4]) -> Option<&[u8]> {
        self.tables
            .binary_search_by(|(t, _)| t.cmp(tag))
            .ok()
            .map(|ix| self.tables[ix].1.as_slice())
    }

    /// Serializes the tables to an sfnt file.
    pub fn to_sfnt(&self) -> Vec<u8> {
        let num_tables = self.tables.len() as u16;
        let entry_selector = (num_tables.max(1)).ilog2() as u16;
        let search_range = (1u16 << entry_selector) * 16;
        let mut out = Vec::new();
        push_u32(&mut out, 0x00010000);
        push_u16(&mut out, num_tables);
        push_u16(&mut out, search_range);
        push_u16(&mut out, entry_selector);
        push_u16(&mut out, num_tables * 16 - search_range);
        let mut offset = 12 + 16 * self.tables.len();
        for (tag, data) in &self.tables {
            out.extend_from_slice(tag);
            push_u32(&mut out, checksum(data));
            push_u32(&mut out, offset as u32);
            push_u32(&mut out, data.len() as u32);
            offset += (data.len() + 3) & !3;
        }
        for (_, data) in &self.tables {
            out.extend_from_slice(data);
            out.resize((out.len() + 3) & !3, 0);
        }
        out
    }
}

fn checksum(data: &[u8]) -> u32 {
    data.chunks(4).fold(0u32, |sum, chunk| {
        let mut word = [0u8; 4];
        word[..chunk.len()].copy_from_slice(chunk);
        sum.wrapping_add(u32::from_be_bytes(word))
    })
}

fn push_u16(out: &mut Vec<u8>, value: u16) {
    out.extend_from_slice(&value.to_be_bytes());
}

fn push_i16(out: &mut Vec<u8>, value: i16) {
    out.extend_from_slice(&value.to_be_bytes());
}

fn push_u32(out: &mut Vec<u8>, value: u32) {
    out.extend_from_slice(&value.to_be_bytes());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_glyph_bytes() {
        let glyph = SimpleGlyph::new()
            .contour(&[(10, 0, true), (290, -300, true), (340, -212, false)])
            .instructions(&[0xB0, 0x01]);
        #[rustfmt::skip]
        let expected = [
            0x00, 0x01,
            0x00, 0x0A, 0xFE, 0xD4, 0x01, 0x54, 0x00, 0x00,
            0x00, 0x02,
            0x00, 0x02, 0xB0, 0x01,
            0x33, 0x01, 0x36,
            0x0A, 0x01, 0x18, 0x32,
            0xFE, 0xD4, 0x58,
        ];
        assert_eq!(glyph.to_bytes(), expected);
    }

    #[test]
    fn repeated_flags_are_compressed() {
        let glyph = SimpleGlyph::new().contour(&[(1, 1, true), (2, 2, true), (3, 3, true)]);
        let bytes = glyph.to_bytes();
        // Header, one end point and an empty program.
        assert_eq!(&bytes[14..16], &[0x3F, 0x02]);
    }

    #[test]
    fn composite_flags() {
        let glyph = CompositeGlyph::new([0; 4])
            .component(Component::new(1, 300, 0).round_to_grid())
            .component(Component::new(2, 0, 5).transform(Transform::Scale(0x2000)))
            .instructions(&[0xB0, 0x00]);
        #[rustfmt::skip]
        let expected = [
            0xFF, 0xFF, 0, 0, 0, 0, 0, 0, 0, 0,
            0x00, 0x27, 0x00, 0x01, 0x01, 0x2C, 0x00, 0x00,
            0x01, 0x0A, 0x00, 0x02, 0x00, 0x05, 0x20, 0x00,
            0x00, 0x02, 0xB0, 0x00,
        ];
        assert_eq!(glyph.to_bytes(), expected);
    }

    #[test]
    fn sfnt_directory() {
        let font = FontBuilder::new(1000)
            .glyph(Glyph::Empty, 500, 0)
            .fpgm(&[0xB0, 0x00])
            .build();
        let sfnt = font.to_sfnt();
        let num_tables = u16::from_be_bytes([sfnt[4], sfnt[5]]) as usize;
        assert_eq!(num_tables, 7);
        let tags: Vec<_> = (0..num_tables)
            .map(|i| &sfnt[12 + i * 16..16 + i * 16])
            .collect();
        let mut sorted = tags.clone();
        sorted.sort();
        assert_eq!(tags, sorted);
        assert_eq!(font.table(b"fpgm"), Some(&[0xB0, 0x00][..]));
        assert_eq!(font.table(b"prep"), None);
    }
}
