//! Translation of triangles into discrete pixel spans.
//!
//! Rasterization proceeds by turning a triangle into a sequence of
//! *scanlines*, each corresponding to a horizontal span of pixels covered
//! by the triangle on a given row.
//!
//! Samples are taken at integer pixel coordinates. A sample is covered if it
//! lies inside the triangle, or exactly on one of its *top* or *left* edges.
//! Samples exactly on a right or bottom edge are not covered. Whenever two
//! triangles share an edge, every sample on the edge thus belongs to exactly
//! one of them, with neither gaps nor overdraw.

use core::fmt::{self, Debug, Formatter};
use core::ops::Range;

use crate::math::float::f64 as fp;
use crate::math::point::Point2;
use crate::util::Dims;

use super::Screen;

/// A horizontal, 1-pixel-thick "slice" of a triangle being rasterized.
#[derive(Clone, Eq, PartialEq)]
pub struct Scanline {
    /// The y coordinate of the row.
    pub y: i32,
    /// The half-open range of x coordinates covered on the row.
    /// Never empty.
    pub xs: Range<i32>,
}

/// Iterator emitting the scanlines of a triangle from top to bottom.
///
/// Created by [`tri_scan`] and [`tri_scan_clipped`]. Exhaustion is final;
/// to scan the same triangle again, call the constructor again or clone the
/// iterator before consuming it.
#[derive(Clone, Debug)]
pub struct ScanlineIter {
    top: Point2<Screen>,
    mid: Point2<Screen>,
    bot: Point2<Screen>,
    mid_is_left: bool,
    y: i32,
    y_end: i32,
    x_min: f64,
    x_max: f64,
}

impl Scanline {
    /// Returns the x coordinate of the leftmost covered sample.
    #[inline]
    pub fn start_x(&self) -> i32 {
        self.xs.start
    }
    /// Returns the x coordinate of the rightmost covered sample.
    #[inline]
    pub fn end_x(&self) -> i32 {
        self.xs.end - 1
    }
    /// Returns the number of samples covered.
    #[inline]
    pub fn len(&self) -> usize {
        self.xs.len()
    }
}

impl Debug for Scanline {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Scanline(y={}, xs={:?})", self.y, self.xs)
    }
}

/// Returns an iterator over the scanlines covered by a triangle.
///
/// The vertices may be given in any order. Rows with no covered samples are
/// skipped. A zero-area (collinear) triangle, or one with a non-finite
/// coordinate, yields nothing.
///
/// # Examples
/// ```
/// use meshcast_core::math::pt2;
/// use meshcast_core::render::raster::tri_scan;
///
/// let tri = [pt2(0.0, 0.0), pt2(4.0, 0.0), pt2(0.0, 4.0)];
/// let lines: Vec<_> = tri_scan(tri).map(|sl| (sl.y, sl.xs)).collect();
/// assert_eq!(lines, [(0, 0..4), (1, 0..3), (2, 0..2), (3, 0..1)]);
/// ```
pub fn tri_scan(verts: [Point2<Screen>; 3]) -> ScanlineIter {
    let lim = (i32::MIN as f64, i32::MAX as f64);
    ScanlineIter::new(verts, lim, lim)
}

/// Returns an iterator over the scanlines of a triangle, restricted to
/// the rectangle `0..w` × `0..h`.
///
/// Like [`tri_scan`], but rows and spans outside the rectangle are clipped
/// away before iteration, so arbitrarily large triangles cost no more than
/// the pixels they cover.
pub fn tri_scan_clipped(verts: [Point2<Screen>; 3], (w, h): Dims) -> ScanlineIter {
    ScanlineIter::new(verts, (0.0, w as f64), (0.0, h as f64))
}

impl ScanlineIter {
    fn new(
        mut verts: [Point2<Screen>; 3],
        (x_min, x_max): (f64, f64),
        (y_min, y_max): (f64, f64),
    ) -> Self {
        // Sort by y coordinate, start from the top
        verts.sort_by(|a, b| a.y().total_cmp(&b.y()));
        let [top, mid, bot] = verts;

        //                       X <--top
        //                     ***
        //                   ******
        //                 ********
        //               ** upper **
        //         mid->X***********.
        //                ** lower **
        //                   ********
        //                      ******
        //                         ***
        //                            X <--bot
        //
        // The sign of the cross product of the long edge and the top-to-mid
        // edge tells on which side of the long edge `mid` lies. Zero means
        // the vertices are collinear.
        let cross = (bot - top).perp_dot(&(mid - top));

        let (y, y_end) = if cross == 0.0 || !cross.is_finite() {
            (0, 0)
        } else {
            let y0 = fp::ceil(top.y()).clamp(y_min, y_max);
            let y1 = fp::ceil(bot.y()).clamp(y_min, y_max);
            (y0 as i32, y1 as i32)
        };
        Self {
            top,
            mid,
            bot,
            mid_is_left: cross > 0.0,
            y,
            y_end,
            x_min,
            x_max,
        }
    }

    /// Returns the x coordinates of the left and right edges at row `y`.
    fn edges_at(&self, y: f64) -> (f64, f64) {
        let Self { top, mid, bot, .. } = *self;
        let long = edge_x(top, bot, y);
        let short = if y < mid.y() {
            edge_x(top, mid, y)
        } else {
            edge_x(mid, bot, y)
        };
        if self.mid_is_left {
            (short, long)
        } else {
            (long, short)
        }
    }
}

impl Iterator for ScanlineIter {
    type Item = Scanline;

    fn next(&mut self) -> Option<Scanline> {
        while self.y < self.y_end {
            let y = self.y;
            self.y += 1;

            let (xl, xr) = self.edges_at(y as f64);
            let x0 = fp::ceil(xl).clamp(self.x_min, self.x_max) as i32;
            let x1 = fp::ceil(xr).clamp(self.x_min, self.x_max) as i32;
            if x0 < x1 {
                return Some(Scanline { y, xs: x0..x1 });
            }
        }
        None
    }
}

/// Returns the x coordinate at height `y` of the edge from `a` to `b`,
/// where `a` is the upper endpoint and `a.y() <= y < b.y()`.
///
/// Shared edges are always evaluated with the same endpoint order, so
/// adjacent triangles agree on the result to the last bit.
#[inline]
fn edge_x(a: Point2<Screen>, b: Point2<Screen>, y: f64) -> f64 {
    a.x() + (y - a.y()) * (b.x() - a.x()) / (b.y() - a.y())
}
