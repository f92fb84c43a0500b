//! Test data shared between the glyf-scaler crates.
//!
//! Fonts are assembled in memory by [`FontBuilder`] rather than stored as
//! binary files so that every byte of a fixture is visible next to the
//! expectations that depend on it.

mod builder;

pub use builder::{
    Component, CompositeGlyph, FontBuilder, Glyph, Limits, SimpleGlyph, TestFont, Transform,
};

/// Glyph identifiers in [`outlines`].
pub mod gid {
    /// Empty glyph with an advance of 1024.
    pub const EMPTY: u16 = 0;
    /// Square from (100, 0) to (900, 1400).
    pub const SQUARE: u16 = 1;
    /// Single quadratic curve.
    pub const CURVE: u16 = 2;
    /// [`SQUARE`] shifted right by 1000 and [`CURVE`] at half size shifted
    /// up by 200.
    pub const COMPOSITE: u16 = 3;
    /// Composite that references itself.
    pub const CYCLE: u16 = 4;
    /// Composite that takes its metrics from [`CURVE`].
    pub const USE_MY_METRICS: u16 = 5;
    /// [`SQUARE`] with a program that rounds the first point in x and
    /// shifts the rest with it.
    pub const HINTED_SQUARE: u16 = 6;
    /// Same as [`HINTED_SQUARE`] but through a function from the font
    /// program.
    pub const CALLS_FUNCTION: u16 = 7;
    /// Negative contour count other than -1.
    pub const BAD_CONTOUR_COUNT: u16 = 8;
    /// Composite positioned by anchor points.
    pub const ANCHORED: u16 = 9;
    /// Composite of [`HINTED_SQUARE`] rounded to the grid with its own
    /// program.
    pub const HINTED_COMPOSITE: u16 = 10;
    /// [`SQUARE`] with a program that adds 64 to `cvt[0]` and `storage[0]`,
    /// then moves the first point to the control value and shifts the
    /// third by the stored value.
    pub const WRITES_STATE: u16 = 11;
    /// [`SQUARE`] with a program that overwrites `cvt[0]` and `storage[0]`
    /// and then divides by zero.
    pub const FAULTS: u16 = 12;
}

/// Pixels per em with a device advance in the `hdmx` table of [`outlines`].
pub const HDMX_PPEM: u8 = 20;

// Opcodes used by the fixture programs.
const SVTCA_X: u8 = 0x01;
const SCVTCI: u8 = 0x1D;
const CALL: u8 = 0x2B;
const FDEF: u8 = 0x2C;
const ENDF: u8 = 0x2D;
const MDAP_ROUND: u8 = 0x2F;
const IUP_X: u8 = 0x31;
const SHPIX: u8 = 0x38;
const MIAP: u8 = 0x3E;
const WS: u8 = 0x42;
const RS: u8 = 0x43;
const WCVTP: u8 = 0x44;
const RCVT: u8 = 0x45;
const ADD: u8 = 0x60;
const DIV: u8 = 0x62;
const PUSHB_1: u8 = 0xB0;
const PUSHB_2: u8 = 0xB1;
const PUSHB_3: u8 = 0xB2;

/// Builds a font with 2048 units per em that covers the glyph kinds
/// handled by the loader.
pub fn outlines() -> TestFont {
    let square = || {
        SimpleGlyph::new().contour(&[
            (100, 0, true),
            (100, 1400, true),
            (900, 1400, true),
            (900, 0, true),
        ])
    };
    let curve = SimpleGlyph::new().contour(&[(200, 0, true), (600, 1000, false), (1000, 0, true)]);
    let round_first_point = [SVTCA_X, PUSHB_1, 0, MDAP_ROUND, IUP_X];
    #[rustfmt::skip]
    let fpgm = [
        PUSHB_1, 0,
        FDEF,
            MDAP_ROUND,
        ENDF,
    ];
    #[rustfmt::skip]
    let writes_state = [
        SVTCA_X,
        PUSHB_2, 0, 0, RCVT, PUSHB_1, 64, ADD, WCVTP,
        PUSHB_2, 0, 0, MIAP,
        PUSHB_3, 2, 0, 0, RS, PUSHB_1, 64, ADD, WS,
        PUSHB_1, 0, RS, SHPIX,
    ];
    #[rustfmt::skip]
    let faults = [
        PUSHB_2, 0, 99, WCVTP,
        PUSHB_2, 0, 99, WS,
        PUSHB_2, 1, 0, DIV,
    ];
    let mut hdmx_widths = [0u8; 13];
    hdmx_widths[gid::SQUARE as usize] = 11;
    FontBuilder::new(2048)
        .glyph(Glyph::Empty, 1024, 0)
        .glyph(square(), 1000, 100)
        .glyph(curve, 1200, 50)
        .glyph(
            CompositeGlyph::new([100, 0, 1900, 1400])
                .component(Component::new(gid::SQUARE, 1000, 0))
                .component(
                    Component::new(gid::CURVE, 0, 200).transform(Transform::Scale(0x2000)),
                ),
            2000,
            100,
        )
        .glyph(
            CompositeGlyph::new([0; 4]).component(Component::new(gid::CYCLE, 0, 0)),
            0,
            0,
        )
        .glyph(
            CompositeGlyph::new([200, 0, 1000, 1000])
                .component(Component::new(gid::CURVE, 0, 0).use_my_metrics()),
            0,
            0,
        )
        .glyph(square().instructions(&round_first_point), 1000, 100)
        .glyph(
            square().instructions(&[SVTCA_X, PUSHB_2, 0, 0, CALL, IUP_X]),
            1000,
            100,
        )
        .glyph(
            Glyph::Raw(vec![0xFF, 0xFE, 0, 0, 0, 0, 0, 0, 0, 0]),
            0,
            0,
        )
        .glyph(
            CompositeGlyph::new([0; 4]).component(Component::new(gid::SQUARE, 0, 1).anchor_points()),
            0,
            0,
        )
        .glyph(
            CompositeGlyph::new([100, 0, 900, 1400])
                .component(Component::new(gid::HINTED_SQUARE, 20, 0).round_to_grid())
                .instructions(&[SVTCA_X, PUSHB_1, 3, MDAP_ROUND, IUP_X]),
            1000,
            100,
        )
        .glyph(square().instructions(&writes_state), 1000, 100)
        .glyph(square().instructions(&faults), 1000, 100)
        .fpgm(&fpgm)
        .prep(&[PUSHB_1, 70, SCVTCI])
        .cvt(&[200])
        .hdmx(HDMX_PPEM, &hdmx_widths)
        .limits(Limits {
            max_storage: 1,
            max_function_defs: 1,
            max_stack_elements: 16,
            ..Default::default()
        })
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outline_font_tables() {
        let font = outlines();
        for tag in [b"head", b"maxp", b"hhea", b"hmtx", b"loca", b"glyf"] {
            assert!(font.table(tag).is_some());
        }
        // One short offset per glyph plus the end.
        assert_eq!(font.table(b"loca").unwrap().len(), 2 * 14);
        // 200 as a big endian FWORD.
        assert_eq!(font.table(b"cvt ").unwrap(), &[0, 200]);
        let glyf = font.table(b"glyf").unwrap();
        assert_eq!(glyf.len() % 2, 0);
    }
}
