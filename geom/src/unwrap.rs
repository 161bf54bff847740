//! Texture coordinate generation.

use log::debug;

use mc::geom::{Mesh, Polygon, Tri};
use mc::math::Point3;
use mc::render::{self, TexCoord, World, uv};
use mc::util::Dims;

/// Errors returned by [`unwrap`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Mesh(#[from] render::Error),

    /// The atlas cells would be too small to hold any texels.
    #[error("{faces} faces do not fit in a {}×{} texture", .dims.0, .dims.1)]
    TooManyFaces { faces: usize, dims: Dims },
}

/// Assigns texture coordinates to a triangle mesh, replacing any it has.
///
/// Each face gets its own cell in a square grid over the unit square, so no
/// two faces share texture space. Inside its cell, a face is laid out with
/// its true shape, scaled by a factor common to all faces, so texel density
/// is uniform over the surface. Cells are padded by one texel of a texture
/// of size `dims` on every side, so no texel center belongs to two faces.
///
/// # Errors
/// [`Error::Mesh`] if the mesh is not triangular, or
/// [`Error::TooManyFaces`] if the padded cells would have no room left.
pub fn unwrap(mesh: &mut Mesh, dims: Dims) -> Result<(), Error> {
    let tris = mesh.triangles()?;
    let faces = tris.len();
    if faces == 0 {
        mesh.tex_coords.clear();
        return Ok(());
    }

    let k = grid_size(faces);
    let cell = 1.0 / k as f64;
    let pad_u = 1.0 / dims.0 as f64;
    let pad_v = 1.0 / dims.1 as f64;
    let (inner_u, inner_v) = (cell - 2.0 * pad_u, cell - 2.0 * pad_v);
    if inner_u <= 0.0 || inner_v <= 0.0 {
        return Err(Error::TooManyFaces { faces, dims });
    }

    let flat: Vec<_> =
        tris.iter().map(|t| flatten(&mesh.positions(t))).collect();
    let (max_w, max_h) = flat.iter().fold((0.0, 0.0), |(w, h), f| {
        (f64::max(w, f.width), f64::max(h, f.height))
    });
    let scale = f64::min(inner_u / max_w, inner_v / max_h);
    let scale = if scale.is_finite() { scale } else { 0.0 };

    let tex_coords = flat.iter().enumerate().map(|(i, f)| {
        let u0 = (i % k) as f64 * cell + pad_u;
        let v0 = (i / k) as f64 * cell + pad_v;
        let tc = f.corners.map(|[x, y]| uv(u0 + x * scale, v0 + y * scale));
        Polygon::from(Tri::<TexCoord>(tc))
    });
    mesh.tex_coords = tex_coords.collect();

    debug!("unwrapped {faces} faces into a {k}×{k} atlas, scale {scale}");
    Ok(())
}

/// Returns the side length of the smallest square grid with `n` cells.
fn grid_size(n: usize) -> usize {
    let mut k = (n as f64).sqrt() as usize;
    while k * k < n {
        k += 1;
    }
    k.max(1)
}

/// A triangle laid out in the plane with its true shape.
struct Flat {
    corners: [[f64; 2]; 3],
    width: f64,
    height: f64,
}

/// Lays out `tri` in the plane with its first edge along the x axis and
/// its bounding box at the origin.
fn flatten(tri: &Tri<Point3<World>>) -> Flat {
    let [a, b, c] = tri.0;
    let ab = b - a;
    let ac = c - a;
    let len = ab.len();
    if len == 0.0 || !len.is_finite() {
        let corners = [[0.0; 2]; 3];
        return Flat { corners, width: 0.0, height: 0.0 };
    }
    let x_axis = ab * (1.0 / len);
    let cx = ac.dot(&x_axis);
    let cy = x_axis.cross(&ac).len();

    let min_x = cx.min(0.0);
    Flat {
        corners: [[-min_x, 0.0], [len - min_x, 0.0], [cx - min_x, cy]],
        width: len.max(cx) - min_x,
        height: cy,
    }
}
