//! Loading and hinting of TrueType glyph outlines.

mod composite;
mod simple;

pub use composite::{Component, ComponentFlags, Components, Transform};

use crate::{
    error::LoadError,
    font::{Font, GlyphId},
    font_data::FontData,
    hint::Hinter,
    point::{Point, PointFlags, PointMarker},
};

/// Maximum nesting depth of composite glyphs.
pub const MAX_COMPONENT_DEPTH: usize = 32;

/// Number of phantom points generated at the end of an outline.
pub const PHANTOM_POINT_COUNT: usize = 4;

/// Hinting policy for a glyph load.
#[derive(Copy, Clone, PartialEq, Eq, Default, Debug)]
pub enum Hinting {
    /// Outlines are scaled but not grid fitted.
    #[default]
    None,
    /// Outlines are grid fitted by the font's hinting programs.
    Full,
}

/// Control box of an outline in 26.6 device units.
#[derive(Copy, Clone, PartialEq, Eq, Default, Debug)]
pub struct Bounds {
    pub x_min: i32,
    pub y_min: i32,
    pub x_max: i32,
    pub y_max: i32,
}

impl Bounds {
    /// Returns the bounding box of the given points, or an empty box if
    /// there are none.
    pub fn from_points(points: &[Point]) -> Self {
        let Some((first, rest)) = points.split_first() else {
            return Self::default();
        };
        rest.iter().fold(
            Self {
                x_min: first.x,
                y_min: first.y,
                x_max: first.x,
                y_max: first.y,
            },
            |b, p| Self {
                x_min: b.x_min.min(p.x),
                y_min: b.y_min.min(p.y),
                x_max: b.x_max.max(p.x),
                y_max: b.y_max.max(p.y),
            },
        )
    }

    /// Expands the box outward to whole pixels.
    pub fn grid_fit(self) -> Self {
        Self {
            x_min: self.x_min & !63,
            y_min: self.y_min & !63,
            x_max: self.x_max.wrapping_add(63) & !63,
            y_max: self.y_max.wrapping_add(63) & !63,
        }
    }
}

/// Parameters shared by every glyph visited during a single load.
#[derive(Copy, Clone)]
struct Context<'a> {
    font: &'a Font<'a>,
    /// Pixels per em in 26.6.
    scale: i32,
    hinting: Hinting,
}

impl Context<'_> {
    fn is_hinted(&self) -> bool {
        self.hinting != Hinting::None
    }

    fn scale_point(&self, point: &mut Point) {
        point.x = self.font.scale(point.x, self.scale);
        point.y = self.font.scale(point.y, self.scale);
    }
}

/// Reusable buffer that holds a loaded glyph outline.
///
/// All storage, including the hinter, is retained between loads so a single
/// buffer can load a sequence of glyphs without reallocating. A buffer must
/// not be shared between threads while loading.
#[derive(Clone, Default, Debug)]
pub struct GlyphBuf {
    advance_width: i32,
    bounds: Bounds,
    /// Current points, hinted in place.
    points: Vec<Point>,
    /// Scaled points prior to hinting.
    original: Vec<Point>,
    /// Points in font units.
    unscaled: Vec<Point>,
    /// Exclusive end point index of each contour.
    contours: Vec<usize>,
    /// Raw flags of the simple glyph being decoded.
    flags: Vec<u8>,
    hinter: Hinter,
}

impl GlyphBuf {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads and optionally hints a glyph.
    ///
    /// `scale` is the size in 26.6 pixels per em. On success, the outline is
    /// available from [`points`](Self::points) and
    /// [`contours`](Self::contours) along with its metrics. On failure the
    /// buffer is left empty.
    pub fn load(
        &mut self,
        font: &Font,
        scale: i32,
        glyph_id: GlyphId,
        hinting: Hinting,
    ) -> Result<(), LoadError> {
        self.clear();
        let cx = Context {
            font,
            scale,
            hinting,
        };
        let result = self.load_outline(cx, glyph_id);
        if let Err(e) = &result {
            log::warn!("failed to load glyph {glyph_id} at scale {scale}: {e}");
            self.clear();
        }
        result
    }

    /// Returns the advance width in 26.6.
    pub fn advance_width(&self) -> i32 {
        self.advance_width
    }

    /// Returns the control box of the outline in 26.6.
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Returns the points of the outline in 26.6.
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Returns the exclusive end point index of each contour.
    pub fn contours(&self) -> &[usize] {
        &self.contours
    }

    fn clear(&mut self) {
        self.advance_width = 0;
        self.bounds = Bounds::default();
        self.points.clear();
        self.original.clear();
        self.unscaled.clear();
        self.contours.clear();
    }

    fn load_outline(&mut self, cx: Context, glyph_id: GlyphId) -> Result<(), LoadError> {
        if cx.is_hinted() {
            self.hinter.init(cx.font, cx.scale)?;
        }
        let phantom = self.load_glyph(cx, glyph_id, 0)?;
        // Place the horizontal origin at the first phantom point.
        let origin = phantom[0].x;
        for point in &mut self.points {
            point.x = point.x.wrapping_sub(origin);
            point.flags = point.flags.without_markers();
        }
        let mut advance_width = phantom[1].x.wrapping_sub(phantom[0].x);
        let mut bounds = Bounds::from_points(&self.points);
        if cx.is_hinted() {
            if cx.scale & 63 == 0 {
                if let Some(width) = cx.font.hdmx_advance(glyph_id, cx.scale >> 6) {
                    advance_width = (width as i32) << 6;
                }
            }
            advance_width = round_to_grid(advance_width);
            bounds = bounds.grid_fit();
        }
        self.advance_width = advance_width;
        self.bounds = bounds;
        Ok(())
    }

    /// Appends the scaled, and possibly hinted, points of a glyph along with
    /// its contours.
    ///
    /// Returns the phantom points of the glyph.
    fn load_glyph(
        &mut self,
        cx: Context,
        glyph_id: GlyphId,
        depth: usize,
    ) -> Result<[Point; PHANTOM_POINT_COUNT], LoadError> {
        if depth >= MAX_COMPONENT_DEPTH {
            return Err(LoadError::RecursionLimitExceeded(glyph_id));
        }
        let data = cx.font.glyph_data(glyph_id)?;
        let start = self.points.len();
        let contour_start = self.contours.len();
        if data.is_empty() {
            let phantom = unscaled_phantoms(cx.font, glyph_id, 0, 0);
            return self.finish_simple(cx, glyph_id, &[], phantom, start, contour_start);
        }
        let header = FontData::new(data);
        let read = |offset| {
            header
                .read_at::<i16>(offset)
                .map_err(|_| LoadError::UnexpectedEndOfGlyph(glyph_id))
        };
        let contour_count = read(0)?;
        let x_min = read(2)? as i32;
        let y_max = read(8)? as i32;
        let phantom = unscaled_phantoms(cx.font, glyph_id, x_min, y_max);
        match contour_count {
            0.. => {
                let code = self.read_simple(glyph_id, data, contour_count as usize)?;
                self.finish_simple(cx, glyph_id, code, phantom, start, contour_start)
            }
            -1 => self.load_composite(cx, glyph_id, data, phantom, depth),
            _ => Err(LoadError::InvalidContourCount(glyph_id, contour_count)),
        }
    }

    /// Scales and hints the simple glyph whose points and contours were
    /// decoded from `start` and `contour_start`.
    fn finish_simple(
        &mut self,
        cx: Context,
        glyph_id: GlyphId,
        code: &[u8],
        phantom: [Point; PHANTOM_POINT_COUNT],
        start: usize,
        contour_start: usize,
    ) -> Result<[Point; PHANTOM_POINT_COUNT], LoadError> {
        self.points.extend_from_slice(&phantom);
        self.unscaled.extend_from_slice(&self.points[start..]);
        let points = &mut self.points[start..];
        for point in points.iter_mut() {
            cx.scale_point(point);
        }
        if cx.is_hinted() {
            align_first_phantom(points);
        }
        self.original.extend_from_slice(points);
        if cx.is_hinted() {
            round_phantoms(points);
            if !code.is_empty() {
                self.hinter.run(
                    cx.font,
                    glyph_id,
                    code,
                    &self.unscaled[start..],
                    &mut self.original[start..],
                    &mut self.points[start..],
                    &self.contours[contour_start..],
                )?;
            }
        }
        // Contour ends are relative to the glyph until hinting is done.
        for end in &mut self.contours[contour_start..] {
            *end += start;
        }
        Ok(self.pop_phantoms())
    }

    fn load_composite(
        &mut self,
        cx: Context,
        glyph_id: GlyphId,
        data: &[u8],
        phantom: [Point; PHANTOM_POINT_COUNT],
        depth: usize,
    ) -> Result<[Point; PHANTOM_POINT_COUNT], LoadError> {
        let start = self.points.len();
        let contour_start = self.contours.len();
        let mut components = Components::new(glyph_id, data);
        // Phantom points adopted from a component with USE_MY_METRICS.
        let mut metrics = None;
        for component in components.by_ref() {
            let component = component?;
            let component_start = self.points.len();
            let component_phantom = self.load_glyph(cx, component.glyph_id, depth + 1)?;
            if metrics.is_none() && component.flags.contains(ComponentFlags::USE_MY_METRICS) {
                metrics = Some(component_phantom);
            }
            let points = &mut self.points[component_start..];
            if let Some(transform) = component.transform {
                for point in points.iter_mut() {
                    transform.apply(point);
                }
            }
            let mut dx = cx.font.scale(component.dx, cx.scale);
            let mut dy = cx.font.scale(component.dy, cx.scale);
            if component.flags.contains(ComponentFlags::ROUND_XY_TO_GRID) {
                dx = round_to_grid(dx);
                dy = round_to_grid(dy);
            }
            if dx != 0 || dy != 0 {
                for point in points.iter_mut() {
                    point.x = point.x.wrapping_add(dx);
                    point.y = point.y.wrapping_add(dy);
                }
            }
        }
        let code = if cx.is_hinted() {
            components.instructions()?
        } else {
            &[]
        };
        // Component phantom points are already scaled.
        let phantom = metrics.unwrap_or_else(|| {
            phantom.map(|mut point| {
                cx.scale_point(&mut point);
                point
            })
        });
        self.points.extend_from_slice(&phantom);
        self.unscaled.extend_from_slice(&phantom);
        self.original.extend_from_slice(&phantom);
        if cx.is_hinted() {
            let points = &mut self.points[start..];
            if !code.is_empty() {
                align_first_phantom(points);
            }
            round_phantoms(points);
            for point in points.iter_mut() {
                point.flags.clear_marker(PointMarker::TOUCHED);
            }
            if !code.is_empty() {
                // The program of a composite only sees the hinted points of
                // its components.
                self.unscaled[start..].copy_from_slice(&self.points[start..]);
                self.original[start..].copy_from_slice(&self.points[start..]);
                for end in &mut self.contours[contour_start..] {
                    *end -= start;
                }
                let result = self.hinter.run(
                    cx.font,
                    glyph_id,
                    code,
                    &self.unscaled[start..],
                    &mut self.original[start..],
                    &mut self.points[start..],
                    &self.contours[contour_start..],
                );
                for end in &mut self.contours[contour_start..] {
                    *end += start;
                }
                result?;
            }
        }
        Ok(self.pop_phantoms())
    }

    /// Removes the trailing phantom points and returns them.
    fn pop_phantoms(&mut self) -> [Point; PHANTOM_POINT_COUNT] {
        let len = self.points.len() - PHANTOM_POINT_COUNT;
        let mut phantom = [Point::default(); PHANTOM_POINT_COUNT];
        phantom.copy_from_slice(&self.points[len..]);
        self.points.truncate(len);
        self.original.truncate(len);
        self.unscaled.truncate(len);
        phantom
    }
}

/// Computes the phantom points of a glyph in font units.
///
/// These carry the horizontal origin and advance followed by the vertical
/// origin and advance.
fn unscaled_phantoms(
    font: &Font,
    glyph_id: GlyphId,
    x_min: i32,
    y_max: i32,
) -> [Point; PHANTOM_POINT_COUNT] {
    let h_metric = font.unscaled_h_metric(glyph_id);
    let v_metric = font.unscaled_v_metric(glyph_id, y_max);
    let origin_x = x_min - h_metric.left_side_bearing;
    let center_x = h_metric.advance_width / 2;
    let top_y = y_max + v_metric.top_side_bearing;
    let flags = PointFlags::default();
    [
        Point::new(origin_x, 0, flags),
        Point::new(origin_x + h_metric.advance_width, 0, flags),
        Point::new(center_x, top_y, flags),
        Point::new(center_x, top_y - v_metric.advance_height, flags),
    ]
}

fn round_to_grid(value: i32) -> i32 {
    value.wrapping_add(32) & !63
}

/// Rounds the first phantom point to the grid, shifting every point by the
/// same amount.
fn align_first_phantom(points: &mut [Point]) {
    let Some(first) = points.len().checked_sub(PHANTOM_POINT_COUNT) else {
        return;
    };
    let x = points[first].x;
    let dx = round_to_grid(x).wrapping_sub(x);
    if dx != 0 {
        for point in points {
            point.x = point.x.wrapping_add(dx);
        }
    }
}

/// Rounds the advance phantom points to the grid.
fn round_phantoms(points: &mut [Point]) {
    if let [.., _, advance, _, vertical_advance] = points {
        advance.x = round_to_grid(advance.x);
        vertical_advance.y = round_to_grid(vertical_advance.y);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn points(coords: &[(i32, i32)]) -> Vec<Point> {
        coords
            .iter()
            .map(|&(x, y)| Point::new(x, y, PointFlags::on_curve()))
            .collect()
    }

    #[test]
    fn bounds() {
        assert_eq!(Bounds::from_points(&[]), Bounds::default());
        let bounds = Bounds::from_points(&points(&[(10, -70), (-5, 130), (200, 3)]));
        assert_eq!(
            bounds,
            Bounds {
                x_min: -5,
                y_min: -70,
                x_max: 200,
                y_max: 130
            }
        );
        assert_eq!(
            bounds.grid_fit(),
            Bounds {
                x_min: -64,
                y_min: -128,
                x_max: 256,
                y_max: 192
            }
        );
    }

    #[test]
    fn phantom_alignment() {
        // One outline point followed by the four phantom points.
        let mut pts = points(&[(100, 10), (40, 0), (540, 0), (250, 700), (250, -330)]);
        align_first_phantom(&mut pts);
        // 40 rounds to 64 and everything moves with it.
        assert_eq!(pts[0].x, 124);
        assert_eq!(pts[1].x, 64);
        assert_eq!(pts[2].x, 564);
        round_phantoms(&mut pts);
        assert_eq!(pts[2].x, 576);
        assert_eq!(pts[4].y, -320);
        // Too few points to carry phantoms.
        let mut pts = points(&[(5, 5)]);
        align_first_phantom(&mut pts);
        round_phantoms(&mut pts);
        assert_eq!((pts[0].x, pts[0].y), (5, 5));
    }

    #[test]
    fn grid_rounding() {
        assert_eq!(round_to_grid(31), 0);
        assert_eq!(round_to_grid(32), 64);
        assert_eq!(round_to_grid(-32), 0);
        assert_eq!(round_to_grid(-33), -64);
        // Coordinates near the i32 limits wrap like the interpreter does.
        assert_eq!(round_to_grid(i32::MAX), i32::MIN);
        let far = Bounds::from_points(&points(&[(i32::MAX, i32::MIN)]));
        assert_eq!(far.grid_fit().x_max, i32::MIN);
        let mut pts = points(&[(i32::MAX, 0), (40, 0), (0, 0), (0, 0), (0, 0)]);
        align_first_phantom(&mut pts);
        assert_eq!(pts[0].x, i32::MIN + 23);
    }
}
