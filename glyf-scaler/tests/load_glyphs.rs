//! Loads the glyphs of the synthetic outline font and compares against
//! values computed by hand at 16 pixels per em.
//!
//! The font has 2048 units per em so each font unit maps to exactly half a
//! 26.6 unit at this size.

use glyf_scaler::{
    hint::HintErrorKind, Bounds, ErrorKind, Font, GlyphBuf, GlyphId, Hinting, LoadError,
};
use glyf_test_data::{gid, TestFont, HDMX_PPEM};
use pretty_assertions::assert_eq;

const SCALE: i32 = 16 * 64;

fn font(data: &TestFont) -> Font<'_> {
    let _ = env_logger::builder().is_test(true).try_init();
    Font::from_table_provider(|tag| data.table(tag)).unwrap()
}

fn load(font: &Font, scale: i32, glyph_id: u16, hinting: Hinting) -> GlyphBuf {
    let mut buf = GlyphBuf::new();
    buf.load(font, scale, GlyphId::new(glyph_id), hinting).unwrap();
    buf
}

fn coords(buf: &GlyphBuf) -> Vec<(i32, i32, bool)> {
    buf.points()
        .iter()
        .map(|p| (p.x, p.y, p.flags.is_on_curve()))
        .collect()
}

fn bounds(x_min: i32, y_min: i32, x_max: i32, y_max: i32) -> Bounds {
    Bounds {
        x_min,
        y_min,
        x_max,
        y_max,
    }
}

#[test]
fn empty_glyph() {
    let data = glyf_test_data::outlines();
    let font = font(&data);
    let buf = load(&font, SCALE, gid::EMPTY, Hinting::None);
    assert!(buf.points().is_empty());
    assert!(buf.contours().is_empty());
    assert_eq!(buf.advance_width(), 512);
    assert_eq!(buf.bounds(), Bounds::default());
}

#[test]
fn simple_unhinted() {
    let data = glyf_test_data::outlines();
    let font = font(&data);
    let buf = load(&font, SCALE, gid::SQUARE, Hinting::None);
    assert_eq!(
        coords(&buf),
        [(50, 0, true), (50, 700, true), (450, 700, true), (450, 0, true)]
    );
    assert_eq!(buf.contours(), [4]);
    assert_eq!(buf.advance_width(), 500);
    assert_eq!(buf.bounds(), bounds(50, 0, 450, 700));
    // The horizontal origin is the left side bearing away from x_min.
    let buf = load(&font, SCALE, gid::CURVE, Hinting::None);
    assert_eq!(
        coords(&buf),
        [(25, 0, true), (225, 500, false), (425, 0, true)]
    );
    assert_eq!(buf.advance_width(), 600);
    assert_eq!(buf.bounds(), bounds(25, 0, 425, 500));
}

#[test]
fn simple_hinted_without_program() {
    let data = glyf_test_data::outlines();
    let font = font(&data);
    let buf = load(&font, SCALE, gid::SQUARE, Hinting::Full);
    assert_eq!(
        coords(&buf),
        [(50, 0, true), (50, 700, true), (450, 700, true), (450, 0, true)]
    );
    assert_eq!(buf.advance_width(), 512);
    assert_eq!(buf.bounds(), bounds(0, 0, 512, 704));
    // The origin is rounded before the outline is shifted back to it.
    let buf = load(&font, SCALE, gid::CURVE, Hinting::Full);
    assert_eq!(
        coords(&buf),
        [(25, 0, true), (225, 500, false), (425, 0, true)]
    );
    assert_eq!(buf.advance_width(), 576);
    assert_eq!(buf.bounds(), bounds(0, 0, 448, 512));
}

#[test]
fn glyph_program() {
    let data = glyf_test_data::outlines();
    let font = font(&data);
    let expected = [(64, 0, true), (64, 700, true), (464, 700, true), (464, 0, true)];
    for glyph_id in [gid::HINTED_SQUARE, gid::CALLS_FUNCTION] {
        let buf = load(&font, SCALE, glyph_id, Hinting::Full);
        assert_eq!(coords(&buf), expected, "glyph {glyph_id}");
        assert_eq!(buf.advance_width(), 512);
        assert_eq!(buf.bounds(), bounds(64, 0, 512, 704));
    }
    // Without hinting the program is ignored.
    let buf = load(&font, SCALE, gid::HINTED_SQUARE, Hinting::None);
    assert_eq!(coords(&buf)[0], (50, 0, true));
}

#[test]
fn glyph_program_writes_state() {
    let data = glyf_test_data::outlines();
    let font = font(&data);
    // cvt[0] is 100 before the program adds 64 and storage[0] is 0.
    let expected = [(164, 0, true), (50, 700, true), (514, 700, true), (450, 0, true)];
    let mut buf = GlyphBuf::new();
    for _ in 0..3 {
        buf.load(&font, SCALE, GlyphId::new(gid::WRITES_STATE), Hinting::Full)
            .unwrap();
        assert_eq!(coords(&buf), expected);
        assert_eq!(buf.advance_width(), 512);
        assert_eq!(buf.bounds(), bounds(0, 0, 576, 704));
    }
}

#[test]
fn faulting_program_leaves_no_trace() {
    let data = glyf_test_data::outlines();
    let font = font(&data);
    let fresh = load(&font, SCALE, gid::WRITES_STATE, Hinting::Full);
    let mut buf = GlyphBuf::new();
    for _ in 0..2 {
        let err = buf
            .load(&font, SCALE, GlyphId::new(gid::FAULTS), Hinting::Full)
            .unwrap_err();
        match err {
            LoadError::HintingFailed(e) => {
                assert_eq!(e.kind, HintErrorKind::DivideByZero);
                assert_eq!(e.glyph_id, Some(GlyphId::new(gid::FAULTS)));
            }
            _ => panic!("expected a hinting failure, got {err:?}"),
        }
        assert!(buf.points().is_empty());
        buf.load(&font, SCALE, GlyphId::new(gid::WRITES_STATE), Hinting::Full)
            .unwrap();
        assert_eq!(coords(&buf), coords(&fresh));
    }
    // Unhinted loads never run the program.
    let buf = load(&font, SCALE, gid::FAULTS, Hinting::None);
    assert_eq!(coords(&buf)[0], (50, 0, true));
}

#[test]
fn composite() {
    let data = glyf_test_data::outlines();
    let font = font(&data);
    let buf = load(&font, SCALE, gid::COMPOSITE, Hinting::None);
    assert_eq!(
        coords(&buf),
        [
            (550, 0, true),
            (550, 700, true),
            (950, 700, true),
            (950, 0, true),
            (50, 100, true),
            (150, 350, false),
            (250, 100, true),
        ]
    );
    assert_eq!(buf.contours(), [4, 7]);
    assert_eq!(buf.advance_width(), 1000);
    assert_eq!(buf.bounds(), bounds(50, 0, 950, 700));
}

#[test]
fn composite_program() {
    let data = glyf_test_data::outlines();
    let font = font(&data);
    // The component offset of 10 rounds away to nothing and the composite
    // program rounds the last point from 464 down to 448.
    let buf = load(&font, SCALE, gid::HINTED_COMPOSITE, Hinting::Full);
    assert_eq!(
        coords(&buf),
        [(48, 0, true), (48, 700, true), (448, 700, true), (448, 0, true)]
    );
    assert_eq!(buf.advance_width(), 512);
    assert_eq!(buf.bounds(), bounds(0, 0, 448, 704));
    // Offsets are grid rounded regardless of hinting.
    let buf = load(&font, SCALE, gid::HINTED_COMPOSITE, Hinting::None);
    assert_eq!(coords(&buf)[0], (50, 0, true));
    assert_eq!(buf.advance_width(), 500);
}

#[test]
fn use_my_metrics() {
    let data = glyf_test_data::outlines();
    let font = font(&data);
    for hinting in [Hinting::None, Hinting::Full] {
        let component = load(&font, SCALE, gid::CURVE, hinting);
        let composite = load(&font, SCALE, gid::USE_MY_METRICS, hinting);
        assert_eq!(coords(&composite), coords(&component));
        assert_eq!(composite.advance_width(), component.advance_width());
        assert_eq!(composite.bounds(), component.bounds());
    }
}

#[test]
fn recursion_limit() {
    let data = glyf_test_data::outlines();
    let font = font(&data);
    let mut buf = GlyphBuf::new();
    let err = buf
        .load(&font, SCALE, GlyphId::new(gid::CYCLE), Hinting::None)
        .unwrap_err();
    assert_eq!(err, LoadError::RecursionLimitExceeded(GlyphId::new(gid::CYCLE)));
    assert_eq!(err.kind(), ErrorKind::Format);
}

#[test]
fn malformed_glyphs() {
    let data = glyf_test_data::outlines();
    let font = font(&data);
    let mut buf = GlyphBuf::new();
    let mut load = |glyph_id| buf.load(&font, SCALE, GlyphId::new(glyph_id), Hinting::None);
    assert_eq!(
        load(gid::BAD_CONTOUR_COUNT),
        Err(LoadError::InvalidContourCount(
            GlyphId::new(gid::BAD_CONTOUR_COUNT),
            -2
        ))
    );
    let err = load(gid::ANCHORED).unwrap_err();
    assert_eq!(err, LoadError::AnchorPointsUnsupported(GlyphId::new(gid::ANCHORED)));
    assert!(err.is_unsupported());
    assert_eq!(
        load(font.num_glyphs()),
        Err(LoadError::GlyphNotFound(GlyphId::new(font.num_glyphs())))
    );
}

#[test]
fn failed_load_leaves_empty_buffer() {
    let data = glyf_test_data::outlines();
    let font = font(&data);
    let mut buf = load(&font, SCALE, gid::COMPOSITE, Hinting::None);
    assert!(buf
        .load(&font, SCALE, GlyphId::new(gid::CYCLE), Hinting::None)
        .is_err());
    assert!(buf.points().is_empty());
    assert!(buf.contours().is_empty());
    assert_eq!(buf.advance_width(), 0);
}

#[test]
fn buffer_reuse() {
    let data = glyf_test_data::outlines();
    let font = font(&data);
    let mut buf = GlyphBuf::new();
    let glyphs = [
        gid::COMPOSITE,
        gid::HINTED_SQUARE,
        gid::CURVE,
        gid::HINTED_COMPOSITE,
        gid::WRITES_STATE,
        gid::EMPTY,
        gid::WRITES_STATE,
    ];
    for hinting in [Hinting::Full, Hinting::None] {
        for scale in [SCALE, 20 * 64, 1000] {
            for glyph_id in glyphs {
                buf.load(&font, scale, GlyphId::new(glyph_id), hinting)
                    .unwrap();
                let fresh = load(&font, scale, glyph_id, hinting);
                assert_eq!(coords(&buf), coords(&fresh));
                assert_eq!(buf.contours(), fresh.contours());
                assert_eq!(buf.advance_width(), fresh.advance_width());
                assert_eq!(buf.bounds(), fresh.bounds());
            }
        }
    }
}

#[test]
fn extreme_scale() {
    let data = glyf_test_data::outlines();
    let font = font(&data);
    let mut buf = GlyphBuf::new();
    for glyph_id in [gid::SQUARE, gid::COMPOSITE, gid::USE_MY_METRICS] {
        buf.load(&font, i32::MAX, GlyphId::new(glyph_id), Hinting::None)
            .unwrap();
        assert!(!buf.points().is_empty());
    }
    assert_eq!(font.scale(i16::MAX as i32, i32::MAX), i32::MAX);
}

#[test]
fn contours_cover_points() {
    let data = glyf_test_data::outlines();
    let font = font(&data);
    for glyph_id in [
        gid::SQUARE,
        gid::CURVE,
        gid::COMPOSITE,
        gid::USE_MY_METRICS,
        gid::HINTED_COMPOSITE,
    ] {
        for hinting in [Hinting::None, Hinting::Full] {
            let buf = load(&font, SCALE, glyph_id, hinting);
            let contours = buf.contours();
            assert!(contours.windows(2).all(|w| w[0] <= w[1]));
            // No phantom points remain.
            assert_eq!(contours.last().copied(), Some(buf.points().len()));
            // Hinting markers are not exposed.
            assert!(buf
                .points()
                .iter()
                .all(|p| p.flags.to_bits() == p.flags.without_markers().to_bits()));
        }
    }
}

#[test]
fn hdmx_advance() {
    let data = glyf_test_data::outlines();
    let font = font(&data);
    let scale = HDMX_PPEM as i32 * 64;
    assert_eq!(
        load(&font, scale, gid::SQUARE, Hinting::Full).advance_width(),
        11 * 64
    );
    assert_eq!(
        load(&font, scale, gid::SQUARE, Hinting::None).advance_width(),
        625
    );
    // Fractional sizes never match a device record.
    assert_eq!(
        load(&font, scale + 1, gid::SQUARE, Hinting::Full).advance_width(),
        640
    );
}

#[test]
fn sfnt_round_trip_through_provider() {
    let data = glyf_test_data::outlines();
    let sfnt = data.to_sfnt();
    let font_ref = read_fonts::FontRef::new(&sfnt).unwrap();
    let font = Font::from_table_provider(|tag| {
        font_ref
            .table_data(read_fonts::types::Tag::new(tag))
            .map(|data| data.as_bytes())
    })
    .unwrap();
    assert_eq!(font.num_glyphs(), 13);
    assert_eq!(font.units_per_em(), 2048);
    let buf = load(&font, SCALE, gid::COMPOSITE, Hinting::None);
    assert_eq!(buf.contours(), [4, 7]);
}
