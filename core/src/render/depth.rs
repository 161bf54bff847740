//! Depth and height maps of meshes.
//!
//! A depth map stores, for every pixel, the depth of the nearest surface
//! seen through that pixel; a height map stores its world z coordinate.
//! Pixels that see no surface hold `+∞`.

use alloc::vec::Vec;

use log::{debug, trace};

use crate::geom::{Mesh, Tri};
use crate::math::point::Point2;
use crate::math::vec::{Vec3, vec3};
use crate::util::buf::Buf2;

use super::cam::{Camera, Perspective};
use super::target::render_depth;
use super::{Context, Error, Screen, Stats, triangles};

/// Renders the depth map of a triangle mesh as seen by `cam`.
///
/// Under a perspective camera depth is composited as `−1/depth`, which is
/// affine in screen space for planar faces, and converted back before
/// returning; faces must then lie in front of the camera. Other cameras
/// composite depth as is. The result has the dimensions of `cam`.
///
/// # Errors
/// [`Error::NotTriangular`] if the mesh has a face with other than three
/// vertices. No image is produced in that case.
pub fn render_depth_map<C: Camera + ?Sized>(
    mesh: &Mesh,
    cam: &C,
    ctx: &Context,
) -> Result<Buf2<f64>, Error> {
    let tris = triangles(mesh)?;
    let mut stats = Stats::start();

    let persp = cam.as_perspective().is_some();
    let keys: Vec<_> = mesh
        .verts
        .iter()
        .map(|v| cam.depth(v))
        .map(|d| if persp { -1.0 / d } else { d })
        .collect();
    let mut buf = ctx.depth_buffer(cam.dims());
    composite(&tris, &project(mesh, cam), &keys, &mut buf, &mut stats);

    if persp {
        unmap_finite(&mut buf, |d| -1.0 / d);
    }
    finish("depth map", ctx, stats);
    Ok(buf)
}

/// Renders the height map of a triangle mesh as seen by `cam`.
///
/// Perspective cameras render a [depth map][render_depth_map] that is then
/// [converted][depth_to_height]; other cameras composite `−z` directly, so
/// the highest surface is visible.
///
/// # Errors
/// [`Error::NotTriangular`] if the mesh has a face with other than three
/// vertices, or [`Error::SingularProjection`] if the camera matrix of a
/// perspective camera is singular.
pub fn render_height_map<C: Camera + ?Sized>(
    mesh: &Mesh,
    cam: &C,
    ctx: &Context,
) -> Result<Buf2<f64>, Error> {
    if let Some(persp) = cam.as_perspective() {
        let depth = render_depth_map(mesh, persp, ctx)?;
        return depth_to_height(persp, &depth);
    }
    let tris = triangles(mesh)?;
    let mut stats = Stats::start();

    let keys: Vec<_> = mesh.verts.iter().map(|v| -v.z()).collect();
    let mut buf = ctx.depth_buffer(cam.dims());
    composite(&tris, &project(mesh, cam), &keys, &mut buf, &mut stats);

    unmap_finite(&mut buf, |h| -h);
    finish("height map", ctx, stats);
    Ok(buf)
}

/// Converts a depth map rendered with `cam` into a height map.
///
/// Each pixel `(i, j)` with finite depth `d` is back-projected to the world
/// point `X` with `P·X = d·(i, j, 1)`, where `P` is the camera matrix, and
/// its z coordinate `d·(v·(i, j, 1)) + o` is stored. Here `v` is the third
/// row of the inverse of the leading 3×3 block of `P` and `o` is the world
/// z of the camera center. Infinite depths are propagated unchanged.
///
/// # Errors
/// [`Error::SingularProjection`] if the leading 3×3 block of the camera
/// matrix is singular.
pub fn depth_to_height(
    cam: &Perspective,
    depth: &Buf2<f64>,
) -> Result<Buf2<f64>, Error> {
    let p = cam.to_matrix();
    let inv = p.linear().inverse().ok_or(Error::SingularProjection)?;
    let v: Vec3 = inv.row_vec(2);
    let o = v.dot(&-p.translation().to());

    Ok(Buf2::new_with(depth.dims(), |i, j| {
        let d = depth[[i as usize, j as usize]];
        if d.is_infinite() {
            d
        } else {
            d * v.dot(&vec3(i as f64, j as f64, 1.0)) + o
        }
    }))
}

/// Projects every vertex of `mesh` to screen space, once.
fn project<C: Camera + ?Sized>(mesh: &Mesh, cam: &C) -> Vec<Point2<Screen>> {
    mesh.verts.iter().map(|v| cam.project(v)).collect()
}

/// Composites every triangle into `buf` with the given per-vertex keys.
fn composite(
    tris: &[Tri<usize>],
    screen: &[Point2<Screen>],
    keys: &[f64],
    buf: &mut Buf2<f64>,
    stats: &mut Stats,
) {
    stats.calls += 1;
    stats.faces.i += tris.len();

    for (i, &Tri(vs)) in tris.iter().enumerate() {
        let verts = vs.map(|j| screen[j]);
        let depths = vs.map(|j| keys[j]);
        match render_depth(verts, depths, buf) {
            Some(io) => {
                stats.faces.o += 1;
                stats.frags += io;
            }
            None => {
                trace!("skipping degenerate face {i}: {verts:?}");
                stats.degenerate += 1;
            }
        }
    }
}

/// Applies `f` to every finite value of `buf`.
fn unmap_finite(buf: &mut Buf2<f64>, f: impl Fn(f64) -> f64) {
    buf.iter_mut()
        .filter(|x| x.is_finite())
        .for_each(|x| *x = f(*x));
}

fn finish(what: &str, ctx: &Context, stats: Stats) {
    let stats = stats.finish();
    debug!(
        "rendered {what}: {} faces ({} degenerate), {:?}",
        stats.faces, stats.degenerate, stats.time
    );
    ctx.record(stats);
}
