//! Loading and hinting of TrueType glyph outlines.
//!
//! This crate decodes simple and composite glyphs from the `glyf` table,
//! scales them to a device size and optionally runs the font's bytecode
//! programs to fit the outline to the pixel grid.
//!
//! Parsing of the font container is left to the caller. A [`Font`] is built
//! from the raw bytes of the handful of tables needed for loading, either
//! directly through [`FontTables`] or from a function that maps a table tag
//! to its data.
//!
//! ```no_run
//! # fn table(tag: &[u8; 4]) -> Option<&'static [u8]> { None }
//! use glyf_scaler::{Font, GlyphBuf, GlyphId, Hinting};
//!
//! let font = Font::from_table_provider(table)?;
//! let mut buf = GlyphBuf::new();
//! // 12 pixels per em in 26.6
//! buf.load(&font, 12 * 64, GlyphId::new(1), Hinting::Full)?;
//! for point in buf.points() {
//!     println!("{} {} {}", point.x, point.y, point.flags.is_on_curve());
//! }
//! # Ok::<_, glyf_scaler::LoadError>(())
//! ```

#![forbid(unsafe_code)]

pub mod error;
pub mod fixed;
pub mod font;
pub mod font_data;
pub mod hint;
pub mod outline;
pub mod point;

pub use error::{ErrorKind, LoadError};
pub use font::{Font, FontTables, GlyphId, LocaFormat, MaxProfile};
pub use outline::{Bounds, GlyphBuf, Hinting};
pub use point::{Point, PointFlags};
