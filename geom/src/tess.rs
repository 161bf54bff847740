//! Triangulation of polygonal meshes.

use log::{debug, warn};

use mc::geom::{Mesh, Polygon};

/// Splits every face of `mesh` with more than three corners into a fan of
/// triangles around its first corner, in place.
///
/// A face `[a, b, c, d, …]` becomes `[a, b, c]`, `[a, c, d]`, …, keeping
/// the winding of the original face. Texture coordinates, if any, are split
/// the same way. Faces with fewer than three corners are dropped. The
/// faces are assumed to be convex; a non-convex face may produce
/// overlapping triangles.
pub fn triangulate(mesh: &mut Mesh) {
    let before = mesh.faces.len();
    let mut dropped = 0;

    let faces = std::mem::take(&mut mesh.faces);
    let mut tcs = std::mem::take(&mut mesh.tex_coords).into_iter();

    for face in faces {
        let tc = tcs.next();
        if face.degree() < 3 {
            dropped += 1;
            continue;
        }
        mesh.faces.extend(fan(&face));
        if let Some(tc) = tc {
            mesh.tex_coords.extend(fan(&tc));
        }
    }
    if dropped > 0 {
        warn!("dropped {dropped} faces with fewer than three corners");
    }
    debug!("triangulated {before} faces into {}", mesh.faces.len());
}

/// Returns the fan triangulation of `poly`.
fn fan<T: Clone>(poly: &Polygon<T>) -> impl Iterator<Item = Polygon<T>> + '_ {
    let vs = &poly.0;
    (1..vs.len().saturating_sub(1)).map(move |i| {
        Polygon(vec![vs[0].clone(), vs[i].clone(), vs[i + 1].clone()])
    })
}
