//! Depth-buffered compositing of triangles into raster buffers.
//!
//! Every sample a triangle covers gets a depth value interpolated from the
//! triangle's vertices. The sample is written iff its depth is strictly less
//! than the value already stored in the depth buffer; `+∞` marks samples no
//! surface has been drawn to. The stored depth at each sample thus only ever
//! decreases, and the final buffer is independent of the order in which
//! triangles are drawn.
//!
//! Paired output buffers must have the same dimensions as the depth buffer.

use crate::math::point::Point2;
use crate::util::buf::Buf2;

use super::Screen;
use super::plane::{Attrib, Plane};
use super::raster::{Scanline, tri_scan_clipped};
use super::stats::Throughput;

/// Composites a triangle into a depth buffer only.
///
/// `depths` are the depth keys at the vertices; smaller is closer.
///
/// Returns the numbers of in-bounds samples covered and written, or `None`
/// if the triangle was skipped as degenerate.
pub fn render_depth(
    verts: [Point2<Screen>; 3],
    depths: [f64; 3],
    depth_buf: &mut Buf2<f64>,
) -> Option<Throughput> {
    composite(verts, depths, depth_buf, |_, _| {})
}

/// Composites a triangle into a depth buffer and writes an interpolated
/// attribute into `out` at every sample that passes the depth test.
///
/// Returns `None`, leaving both buffers untouched, if the triangle or its
/// attribute values are degenerate.
///
/// # Panics
/// If `out` and `depth_buf` have different dimensions.
pub fn render_attrib<A: Attrib>(
    verts: [Point2<Screen>; 3],
    depths: [f64; 3],
    attribs: [A; 3],
    depth_buf: &mut Buf2<f64>,
    out: &mut Buf2<A>,
) -> Option<Throughput> {
    assert_same_dims(depth_buf, out);
    let planes = A::fit(verts, attribs)?;
    composite(verts, depths, depth_buf, |x, y| {
        out[[x, y]] = A::eval(&planes, x as f64, y as f64);
    })
}

/// Composites a triangle into a depth buffer and stamps a constant `value`
/// into `out` at every sample that passes the depth test.
///
/// Useful for face index maps and flat-colored renders.
///
/// # Panics
/// If `out` and `depth_buf` have different dimensions.
pub fn render_flat<T: Clone>(
    verts: [Point2<Screen>; 3],
    depths: [f64; 3],
    value: T,
    depth_buf: &mut Buf2<f64>,
    out: &mut Buf2<T>,
) -> Option<Throughput> {
    assert_same_dims(depth_buf, out);
    composite(verts, depths, depth_buf, |x, y| {
        out[[x, y]] = value.clone();
    })
}

/// Rasterizes a triangle, depth tests every covered sample and calls
/// `write_fn(x, y)` for the samples that pass.
fn composite(
    verts: [Point2<Screen>; 3],
    depths: [f64; 3],
    depth_buf: &mut Buf2<f64>,
    mut write_fn: impl FnMut(usize, usize),
) -> Option<Throughput> {
    let plane = Plane::fit(verts, depths)?;
    let mut io = Throughput::default();

    for Scanline { y, xs } in tri_scan_clipped(verts, depth_buf.dims()) {
        let row = plane.row(y as f64);
        let y = y as usize;
        let zs = &mut depth_buf[y];
        for x in xs {
            let new_z = row.at(x as f64);
            let z = &mut zs[x as usize];
            io.i += 1;
            if new_z < *z {
                *z = new_z;
                io.o += 1;
                write_fn(x as usize, y);
            }
        }
    }
    Some(io)
}

#[track_caller]
fn assert_same_dims<T, U>(depth_buf: &Buf2<T>, out: &Buf2<U>) {
    assert_eq!(
        depth_buf.dims(),
        out.dims(),
        "output buffer dimensions differ from depth buffer"
    );
}

#[cfg(test)]
mod tests {
    use crate::math::{color::rgb, pt2};

    use super::*;

    const INF: f64 = f64::INFINITY;

    fn tri() -> [Point2<Screen>; 3] {
        [pt2(0.0, 0.0), pt2(4.0, 0.0), pt2(0.0, 4.0)]
    }

    #[test]
    fn constant_depth_triangle() {
        let mut zbuf = Buf2::new_fill((4, 4), INF);
        let io = render_depth(tri(), [1.0; 3], &mut zbuf).unwrap();

        assert_eq!(io, Throughput { i: 10, o: 10 });
        for y in 0..4 {
            for x in 0..4 {
                let expected = if x + y < 4 { 1.0 } else { INF };
                assert_eq!(zbuf[[x, y]], expected, "at ({x}, {y})");
            }
        }
    }

    #[test]
    fn nearer_triangle_wins_regardless_of_order() {
        let far = [3.0; 3];
        let near = [2.0; 3];
        let other = [pt2(0.0, 0.0), pt2(4.0, 0.0), pt2(4.0, 4.0)];

        let mut a = Buf2::new_fill((4, 4), INF);
        render_depth(tri(), far, &mut a);
        render_depth(other, near, &mut a);

        let mut b = Buf2::new_fill((4, 4), INF);
        render_depth(other, near, &mut b);
        render_depth(tri(), far, &mut b);

        assert_eq!(a, b);
        assert_eq!(a[[0, 0]], 2.0);
        assert_eq!(a[[0, 3]], 3.0);
    }

    #[test]
    fn equal_depth_is_not_overwritten() {
        let mut zbuf = Buf2::new_fill((4, 4), INF);
        let mut ids = Buf2::new_fill((4, 4), usize::MAX);
        render_flat(tri(), [1.0; 3], 0, &mut zbuf, &mut ids);
        let io = render_flat(tri(), [1.0; 3], 1, &mut zbuf, &mut ids).unwrap();

        assert_eq!(io, Throughput { i: 10, o: 0 });
        assert_eq!(ids[[0, 0]], 0);
    }

    #[test]
    fn depth_is_interpolated_linearly() {
        let mut zbuf = Buf2::new_fill((4, 4), INF);
        render_depth(tri(), [0.0, 4.0, 8.0], &mut zbuf);
        assert_eq!(zbuf[[0, 0]], 0.0);
        assert_eq!(zbuf[[3, 0]], 3.0);
        assert_eq!(zbuf[[1, 2]], 5.0);
        assert_eq!(zbuf[[2, 2]], INF);
    }

    #[test]
    fn attribute_written_where_depth_passes() {
        let mut zbuf = Buf2::new_fill((4, 4), INF);
        let mut out = Buf2::new_fill((4, 4), -1.0);
        let io = render_attrib(
            tri(),
            [1.0; 3],
            [0.0, 4.0, 0.0],
            &mut zbuf,
            &mut out,
        );
        assert_eq!(io, Some(Throughput { i: 10, o: 10 }));
        assert_eq!(out[[2, 1]], 2.0);
        assert_eq!(out[[3, 3]], -1.0);
    }

    #[test]
    fn color_attribute() {
        let mut zbuf = Buf2::new_fill((4, 4), INF);
        let mut out = Buf2::new_default((4, 4));
        let red = rgb(0xFF, 0, 0);
        render_attrib(tri(), [1.0; 3], [red; 3], &mut zbuf, &mut out);
        assert_eq!(out[[1, 1]], red);
        assert_eq!(out[[3, 3]], rgb(0, 0, 0));
    }

    #[test]
    fn degenerate_triangle_is_skipped() {
        let mut zbuf = Buf2::new_fill((4, 4), INF);
        let line = [pt2(0.0, 0.0), pt2(1.0, 1.0), pt2(3.0, 3.0)];
        assert_eq!(render_depth(line, [1.0; 3], &mut zbuf), None);

        let nan = [1.0, f64::NAN, 1.0];
        assert_eq!(render_depth(tri(), nan, &mut zbuf), None);

        let mut out = Buf2::new_fill((4, 4), 0.0);
        let bad = [0.0, f64::INFINITY, 0.0];
        assert_eq!(
            render_attrib(tri(), [1.0; 3], bad, &mut zbuf, &mut out),
            None
        );
        assert!(zbuf.iter().all(|&z| z == INF));
    }

    #[test]
    fn spans_are_clipped_to_buffer() {
        let mut zbuf = Buf2::new_fill((4, 4), INF);
        let big = [pt2(-100.0, -100.0), pt2(100.0, -100.0), pt2(0.0, 100.0)];
        let io = render_depth(big, [1.0; 3], &mut zbuf).unwrap();
        assert_eq!(io, Throughput { i: 16, o: 16 });
        assert!(zbuf.iter().all(|&z| z == 1.0));
    }

    #[test]
    #[should_panic = "dimensions differ"]
    fn mismatched_output_buffer_panics() {
        let mut zbuf = Buf2::new_fill((4, 4), INF);
        let mut out = Buf2::new_fill((3, 4), 0u8);
        render_flat(tri(), [1.0; 3], 1, &mut zbuf, &mut out);
    }
}
