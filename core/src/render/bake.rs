//! Baking textures from colored point clouds.
//!
//! Every triangle of a mesh is drawn in texture space, as laid out by its
//! per-corner texture coordinates. Each texel the triangle covers is mapped
//! back to the point on the 3D triangle it corresponds to, and is given the
//! color of the nearest point in the cloud.
//!
//! Texel `(x, y)` has its center at `((x + ½)/w, 1 − (y + ½)/h)` in texture
//! space, so texture row 0 is at the top of the image while `v` grows
//! upwards. A texel is covered by a triangle if its center lies inside the
//! triangle or on one of its edges.

use alloc::vec::Vec;
use core::fmt::Debug;

use log::{debug, trace, warn};

use crate::geom::{Mesh, PointCloud, Tri, barycentric};
use crate::math::color::Color3;
use crate::math::float::f64 as fp;
use crate::math::point::Point3;
use crate::util::{Dims, buf::Buf2};

use super::{
    Collision, Context, Error, Stats, TexCoord, World, triangles, uv,
};

/// Trait for nearest-neighbor search over a fixed set of points.
///
/// The baker issues one batched query per face, so implementations are
/// free to answer the queries in parallel.
pub trait NearestNeighbors {
    /// The error type returned when a search fails.
    type Error;

    /// Returns the nearest neighbor of each query point.
    ///
    /// The result must contain exactly one neighbor per query, in order.
    fn nearest(
        &self,
        queries: &[Point3<World>],
    ) -> Result<Vec<Neighbor>, Self::Error>;
}

/// The result of a nearest-neighbor query.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Neighbor {
    /// Index of the neighbor in the searched point set.
    pub index: usize,
    /// Squared distance from the query point to the neighbor.
    pub dist_sqr: f64,
}

/// Error type returned by [`bake`].
#[derive(Debug, thiserror::Error)]
pub enum BakeError<E> {
    /// The input violates a precondition of the baker.
    #[error(transparent)]
    Render(#[from] Error),
    /// The nearest-neighbor search failed.
    #[error("nearest-neighbor search failed")]
    Search(#[source] E),
}

/// Texture baker state, accumulating faces into one texture.
///
/// [`bake`] drives this for a whole mesh; use it directly to bake faces
/// selectively or from sources other than a [`Mesh`].
pub struct Baker<'a, N: ?Sized> {
    cloud: &'a PointCloud,
    nn: &'a N,
    ctx: &'a Context,
    texture: Buf2<Color3>,
    owners: Buf2<Option<usize>>,
    stats: Stats,
}

/// A candidate texel and its barycentric weights in the face being baked.
#[derive(Copy, Clone, Debug)]
struct Texel {
    x: u32,
    y: u32,
    weights: [f64; 3],
}

/// Bakes a texture for `mesh` from the colors of the points in `cloud`.
///
/// The texture has the dimensions given by [`Context::texture_dims`];
/// texels covered by no face are black. `nn` must search the positions of
/// `cloud`.
///
/// # Errors
/// * [`Error::NotTriangular`] if the mesh has a face with other than three
///   vertices.
/// * [`Error::MissingTexCoords`] if the mesh has no texture coordinates.
/// * [`Error::TexelCollision`] if two faces cover the same texel and the
///   collision policy is [`Collision::Fail`].
/// * [`Error::NeighborCount`] or [`Error::NeighborIndex`] if `nn` returns
///   malformed results.
/// * [`BakeError::Search`] if `nn` fails.
pub fn bake<N: NearestNeighbors + ?Sized>(
    mesh: &Mesh,
    cloud: &PointCloud,
    nn: &N,
    ctx: &Context,
) -> Result<Buf2<Color3>, BakeError<N::Error>> {
    let tris = triangles(mesh)?;
    let uvs = mesh.tri_tex_coords()?;

    let mut baker = Baker::new(cloud, nn, ctx);
    for (face, (tri, tc)) in tris.iter().zip(&uvs).enumerate() {
        baker.bake_face(face, &mesh.positions(tri), tc)?;
    }
    Ok(baker.finish())
}

impl<'a, N: NearestNeighbors + ?Sized> Baker<'a, N> {
    /// Creates a baker with a black texture of size `ctx.texture_dims`.
    pub fn new(cloud: &'a PointCloud, nn: &'a N, ctx: &'a Context) -> Self {
        let dims = ctx.texture_dims;
        let mut stats = Stats::start();
        stats.calls += 1;
        Self {
            cloud,
            nn,
            ctx,
            texture: Buf2::new_default(dims),
            owners: Buf2::new_fill(dims, None),
            stats,
        }
    }

    /// Bakes a single face into the texture.
    ///
    /// `corners` are the world positions and `uvs` the texture coordinates
    /// of the face corners, and `face` identifies the face in collision
    /// reports. A face with zero area in texture space is skipped.
    ///
    /// # Errors
    /// See [`bake`].
    pub fn bake_face(
        &mut self,
        face: usize,
        corners: &Tri<Point3<World>>,
        uvs: &Tri<TexCoord>,
    ) -> Result<(), BakeError<N::Error>> {
        self.stats.faces.i += 1;

        let Some(texels) = self.covered_texels(face, uvs)? else {
            trace!("skipping face {face} with degenerate texture coords");
            self.stats.degenerate += 1;
            return Ok(());
        };
        self.stats.faces.o += 1;
        if texels.is_empty() {
            return Ok(());
        }

        let queries: Vec<_> =
            texels.iter().map(|t| corners.point_at(t.weights)).collect();
        let found = self.nn.nearest(&queries).map_err(BakeError::Search)?;
        if found.len() != queries.len() {
            let (expected, got) = (queries.len(), found.len());
            return Err(Error::NeighborCount { expected, got }.into());
        }

        // Validate every index before writing any texel
        let colors = self.cloud.colors();
        let len = colors.len();
        let colors = found
            .iter()
            .map(|nb| {
                colors
                    .get(nb.index)
                    .copied()
                    .ok_or(Error::NeighborIndex { index: nb.index, len })
            })
            .collect::<Result<Vec<_>, _>>()?;

        for (t, color) in texels.iter().zip(colors) {
            let (x, y) = (t.x as usize, t.y as usize);
            self.texture[[x, y]] = color;
            self.owners[[x, y]] = Some(face);
        }
        self.stats.texels.o += texels.len();
        Ok(())
    }

    /// Returns the baked texture and records the statistics in the context.
    pub fn finish(self) -> Buf2<Color3> {
        let stats = self.stats.finish();
        debug!(
            "baked {} faces ({} degenerate), texels {}, {} collisions",
            stats.faces,
            stats.degenerate,
            stats.texels,
            stats.collisions
        );
        self.ctx.record(stats);
        self.texture
    }

    /// Returns the texels whose centers lie inside the UV triangle `uvs`,
    /// or `None` if the triangle is degenerate.
    fn covered_texels(
        &mut self,
        face: usize,
        uvs: &Tri<TexCoord>,
    ) -> Result<Option<Vec<Texel>>, Error> {
        if barycentric(uvs, uvs.0[0]).is_none() {
            return Ok(None);
        }
        let dims = self.texture.dims();
        let (xs, ys) = texel_range(uvs, dims);
        let (w, h) = (dims.0 as f64, dims.1 as f64);

        let mut res = Vec::new();
        for y in ys {
            let v = 1.0 - (y as f64 + 0.5) / h;
            for x in xs.clone() {
                let u = (x as f64 + 0.5) / w;
                self.stats.texels.i += 1;

                let Some(weights) = barycentric(uvs, uv(u, v)) else {
                    continue;
                };
                if weights.iter().any(|&w| w < 0.0) {
                    continue;
                }
                self.claim(face, x, y)?;
                res.push(Texel { x, y, weights });
            }
        }
        Ok(Some(res))
    }

    /// Checks that texel `(x, y)` is not owned by another face.
    fn claim(&mut self, face: usize, x: u32, y: u32) -> Result<(), Error> {
        match self.owners[[x as usize, y as usize]] {
            Some(first) if first != face => match self.ctx.collision {
                Collision::Fail => Err(Error::TexelCollision {
                    x,
                    y,
                    first,
                    second: face,
                }),
                Collision::Overwrite => {
                    warn!(
                        "texel ({x}, {y}) of face {first} overwritten by face {face}"
                    );
                    self.stats.collisions += 1;
                    Ok(())
                }
            },
            _ => Ok(()),
        }
    }
}

impl<N: ?Sized> Debug for Baker<'_, N> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Baker")
            .field("points", &self.cloud.len())
            .field("texture_dims", &self.texture.dims())
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}

/// Returns the columns and rows of the texels whose centers lie in the
/// bounding box of `uvs`, clamped to the unit square.
fn texel_range(
    uvs: &Tri<TexCoord>,
    (w, h): Dims,
) -> (core::ops::Range<u32>, core::ops::Range<u32>) {
    let [u0, u1] = bounds(uvs.0.map(|p| p.x()));
    let [v0, v1] = bounds(uvs.0.map(|p| p.y()));
    let (w, h) = (w as f64, h as f64);

    // Center of texel x is (x + ½)/w; of row y, 1 − (y + ½)/h
    let x0 = fp::ceil(u0 * w - 0.5).max(0.0);
    let x1 = (fp::floor(u1 * w - 0.5) + 1.0).min(w);
    let y0 = fp::ceil((1.0 - v1) * h - 0.5).max(0.0);
    let y1 = (fp::floor((1.0 - v0) * h - 0.5) + 1.0).min(h);

    let range = |a: f64, b: f64| (a as u32)..(b.max(a) as u32);
    (range(x0, x1), range(y0, y1))
}

/// Returns the minimum and maximum of `vals` clamped to `0.0..=1.0`.
fn bounds(vals: [f64; 3]) -> [f64; 2] {
    let min = vals.iter().copied().fold(1.0, f64::min);
    let max = vals.iter().copied().fold(0.0, f64::max);
    [min.clamp(0.0, 1.0), max.clamp(0.0, 1.0)]
}
