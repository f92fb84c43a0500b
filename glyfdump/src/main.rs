//! Print the outlines of glyphs as loaded by glyf-scaler.
//!
//! Each glyph is printed as its advance and control box followed by one line
//! per point with coordinates in 26.6.

use std::{fmt::Write as _, path::PathBuf};

use glyf_scaler::{Font, GlyphBuf, GlyphId, Hinting, LoadError};
use read_fonts::{types::Tag, FontRef, ReadError};

#[derive(clap::Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Path to a TrueType font file
    font: PathBuf,
    /// Glyph identifier to print
    #[arg(long, short, default_value_t = 0)]
    glyph: u16,
    /// Size in pixels per em
    #[arg(long, short, default_value_t = 16.0)]
    ppem: f32,
    #[arg(long, value_enum, default_value_t)]
    hinting: HintingMode,
    /// Print every glyph in the font
    #[arg(long)]
    all: bool,
}

#[derive(clap::ValueEnum, Copy, Clone, Default, Debug)]
enum HintingMode {
    /// Scale without grid fitting.
    #[default]
    None,
    /// Run the font's hinting programs.
    Full,
}

impl From<HintingMode> for Hinting {
    fn from(value: HintingMode) -> Self {
        match value {
            HintingMode::None => Hinting::None,
            HintingMode::Full => Hinting::Full,
        }
    }
}

#[derive(Debug, thiserror::Error)]
enum Error {
    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("not a font file: {0}")]
    Container(#[from] ReadError),
    #[error(transparent)]
    Load(#[from] LoadError),
}

fn main() {
    env_logger::init();
    use clap::Parser as _;
    let args = Args::parse();
    if let Err(e) = run(&args) {
        eprintln!("glyfdump: {e}");
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), Error> {
    let data = std::fs::read(&args.font).map_err(|source| Error::Io {
        path: args.font.clone(),
        source,
    })?;
    let font_ref = FontRef::new(&data)?;
    let font = Font::from_table_provider(|tag| {
        font_ref
            .table_data(Tag::new(tag))
            .map(|data| data.as_bytes())
    })?;
    // 26.6 pixels per em
    let scale = (args.ppem * 64.0).round() as i32;
    let glyphs = if args.all {
        0..font.num_glyphs()
    } else {
        args.glyph..args.glyph.saturating_add(1)
    };
    let mut buf = GlyphBuf::new();
    let mut out = String::new();
    for glyph_id in glyphs.map(GlyphId::new) {
        out.clear();
        match buf.load(&font, scale, glyph_id, args.hinting.into()) {
            Ok(()) => format_glyph(&mut out, glyph_id, &buf),
            // Keep going so one bad glyph doesn't hide the rest.
            Err(e) if args.all => {
                let _ = writeln!(out, "glyph {glyph_id}: {e}");
            }
            Err(e) => return Err(e.into()),
        }
        print!("{out}");
    }
    Ok(())
}

fn format_glyph(out: &mut String, glyph_id: GlyphId, buf: &GlyphBuf) {
    let bounds = buf.bounds();
    let _ = writeln!(
        out,
        "glyph {glyph_id}: advance {} bounds [{}, {}, {}, {}]",
        buf.advance_width(),
        bounds.x_min,
        bounds.y_min,
        bounds.x_max,
        bounds.y_max,
    );
    let mut start = 0;
    for (contour_ix, &end) in buf.contours().iter().enumerate() {
        let _ = writeln!(out, "  contour {contour_ix}");
        for point in buf.points().get(start..end).unwrap_or_default() {
            let curve = if point.flags.is_on_curve() { "on" } else { "off" };
            let _ = writeln!(out, "    {} {} {curve}", point.x, point.y);
        }
        start = end;
    }
}
