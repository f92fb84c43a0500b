//! Glyph zones.

use super::{error::HintErrorKind, math::mul_div};
use crate::point::{CoordAxis, Point};

use HintErrorKind::InvalidPointIndex;

/// Reference to either the twilight or glyph zone.
///
/// See <https://learn.microsoft.com/en-us/typography/opentype/spec/tt_instructing_glyphs#zones>
#[derive(Copy, Clone, PartialEq, Eq, Default, Debug)]
#[repr(u8)]
pub enum ZonePointer {
    Twilight = 0,
    #[default]
    Glyph = 1,
}

impl ZonePointer {
    pub fn is_twilight(self) -> bool {
        self == Self::Twilight
    }
}

impl TryFrom<i32> for ZonePointer {
    type Error = HintErrorKind;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Twilight),
            1 => Ok(Self::Glyph),
            _ => Err(HintErrorKind::InvalidZoneIndex(value)),
        }
    }
}

/// Point storage for one zone.
///
/// The three point slices are co-indexed views of the same logical points
/// at different stages: in font units, scaled but unhinted, and current.
#[derive(Default, Debug)]
pub struct Zone<'a> {
    /// Outline points prior to applying scale.
    pub unscaled: &'a [Point],
    /// Copy of the outline points after applying scale.
    pub original: &'a mut [Point],
    /// Scaled outline points, modified by hinting.
    pub points: &'a mut [Point],
    /// Exclusive end point index of each contour.
    pub contours: &'a [usize],
}

impl<'a> Zone<'a> {
    pub fn new(
        unscaled: &'a [Point],
        original: &'a mut [Point],
        points: &'a mut [Point],
        contours: &'a [usize],
    ) -> Self {
        Self {
            unscaled,
            original,
            points,
            contours,
        }
    }

    /// Returns the number of points in the zone.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn point(&self, index: usize) -> Result<Point, HintErrorKind> {
        self.points
            .get(index)
            .copied()
            .ok_or(InvalidPointIndex(index))
    }

    pub fn point_mut(&mut self, index: usize) -> Result<&mut Point, HintErrorKind> {
        self.points.get_mut(index).ok_or(InvalidPointIndex(index))
    }

    pub fn original(&self, index: usize) -> Result<Point, HintErrorKind> {
        self.original
            .get(index)
            .copied()
            .ok_or(InvalidPointIndex(index))
    }

    pub fn original_mut(&mut self, index: usize) -> Result<&mut Point, HintErrorKind> {
        self.original.get_mut(index).ok_or(InvalidPointIndex(index))
    }

    pub fn unscaled(&self, index: usize) -> Result<Point, HintErrorKind> {
        self.unscaled
            .get(index)
            .copied()
            .ok_or(InvalidPointIndex(index))
    }

    /// Returns the range of point indices covered by the given contour.
    pub fn contour(&self, index: usize) -> Result<core::ops::Range<usize>, HintErrorKind> {
        let end = *self
            .contours
            .get(index)
            .ok_or(HintErrorKind::InvalidContourIndex(index))?;
        let start = match index.checked_sub(1) {
            Some(prev) => self.contours[prev],
            None => 0,
        };
        Ok(start..end)
    }

    pub fn touch(&mut self, index: usize, axis: CoordAxis) -> Result<(), HintErrorKind> {
        self.point_mut(index)?
            .flags
            .set_marker(axis.touched_marker());
        Ok(())
    }

    /// Clears the touched markers for both axes.
    pub fn untouch(&mut self, index: usize) -> Result<(), HintErrorKind> {
        let flags = &mut self.point_mut(index)?.flags;
        flags.clear_marker(CoordAxis::X.touched_marker());
        flags.clear_marker(CoordAxis::Y.touched_marker());
        Ok(())
    }

    pub fn is_touched(&self, index: usize, axis: CoordAxis) -> Result<bool, HintErrorKind> {
        Ok(self
            .point(index)?
            .flags
            .has_marker(axis.touched_marker()))
    }

    pub fn flip_on_curve(&mut self, index: usize) -> Result<(), HintErrorKind> {
        self.point_mut(index)?.flags.flip_on_curve();
        Ok(())
    }

    /// Sets or clears the on curve flag for the inclusive range of points.
    pub fn set_on_curve(
        &mut self,
        start: usize,
        end: usize,
        on: bool,
    ) -> Result<(), HintErrorKind> {
        if start >= self.len() {
            return Err(InvalidPointIndex(start));
        }
        if end >= self.len() {
            return Err(InvalidPointIndex(end));
        }
        for point in self.points.get_mut(start..=end).unwrap_or_default() {
            if on {
                point.flags.set_on_curve();
            } else {
                point.flags.clear_on_curve();
            }
        }
        Ok(())
    }

    /// Interpolates untouched points along the given axis.
    ///
    /// Within each contour, runs of untouched points between two touched
    /// points are interpolated between them, wrapping around the contour. If
    /// a contour has a single touched point, all of its points are shifted
    /// by the same amount.
    ///
    /// See <https://learn.microsoft.com/en-us/typography/opentype/spec/tt_instructions#interpolate-untouched-points-through-the-outline>
    pub fn iup(&mut self, axis: CoordAxis) {
        let marker = axis.touched_marker();
        let contours = self.contours;
        let len = self.len();
        let mut start = 0;
        for &end in contours {
            let end = end.min(len);
            let mut i = start;
            while i < end && !self.points[i].flags.has_marker(marker) {
                i += 1;
            }
            if i < end {
                let first_touched = i;
                let mut cur_touched = i;
                for i in first_touched + 1..end {
                    if self.points[i].flags.has_marker(marker) {
                        self.iup_interpolate(axis, cur_touched + 1, i - 1, cur_touched, i);
                        cur_touched = i;
                    }
                }
                if cur_touched == first_touched {
                    self.iup_shift(axis, start, end, cur_touched);
                } else {
                    self.iup_interpolate(axis, cur_touched + 1, end - 1, cur_touched, first_touched);
                    if first_touched > 0 {
                        self.iup_interpolate(axis, start, first_touched - 1, cur_touched, first_touched);
                    }
                }
            }
            start = start.max(end);
        }
    }

    fn iup_interpolate(
        &mut self,
        axis: CoordAxis,
        p1: usize,
        p2: usize,
        mut ref1: usize,
        mut ref2: usize,
    ) {
        let len = self
            .points
            .len()
            .min(self.original.len())
            .min(self.unscaled.len());
        if p1 > p2 || p2 >= len || ref1 >= len || ref2 >= len {
            return;
        }
        let mut ifu1 = self.unscaled[ref1].coord(axis);
        let mut ifu2 = self.unscaled[ref2].coord(axis);
        if ifu1 > ifu2 {
            core::mem::swap(&mut ifu1, &mut ifu2);
            core::mem::swap(&mut ref1, &mut ref2);
        }
        let unh1 = self.original[ref1].coord(axis);
        let unh2 = self.original[ref2].coord(axis);
        let delta1 = self.points[ref1].coord(axis).wrapping_sub(unh1);
        let delta2 = self.points[ref2].coord(axis).wrapping_sub(unh2);
        if ifu1 == ifu2 {
            for i in p1..=p2 {
                let xy = self.original[i].coord(axis);
                let delta = if xy <= unh1 { delta1 } else { delta2 };
                *self.points[i].coord_mut(axis) = xy.wrapping_add(delta);
            }
            return;
        }
        let mut scale = None;
        for i in p1..=p2 {
            let xy = self.original[i].coord(axis);
            let new_xy = if xy <= unh1 {
                xy.wrapping_add(delta1)
            } else if xy >= unh2 {
                xy.wrapping_add(delta2)
            } else {
                let scale = *scale.get_or_insert_with(|| {
                    mul_div(
                        (unh2 as i64 + delta2 as i64) - (unh1 as i64 + delta1 as i64),
                        0x10000,
                        ifu2 as i64 - ifu1 as i64,
                    )
                });
                let ifu = self.unscaled[i].coord(axis);
                let numer = (ifu as i64 - ifu1 as i64) * scale;
                let numer = if numer >= 0 {
                    numer + 0x8000
                } else {
                    numer - 0x8000
                };
                unh1.wrapping_add(delta1)
                    .wrapping_add((numer / 0x10000) as i32)
            };
            *self.points[i].coord_mut(axis) = new_xy;
        }
    }

    fn iup_shift(&mut self, axis: CoordAxis, p1: usize, p2: usize, p: usize) {
        let (Some(point), Some(original)) = (self.points.get(p), self.original.get(p)) else {
            return;
        };
        let delta = point.coord(axis).wrapping_sub(original.coord(axis));
        if delta == 0 {
            return;
        }
        for (i, point) in self
            .points
            .iter_mut()
            .enumerate()
            .take(p2)
            .skip(p1)
        {
            if i != p {
                let coord = point.coord_mut(axis);
                *coord = coord.wrapping_add(delta);
            }
        }
    }
}
