//! Turning 3D surfaces into raster images.
//!
//! This module contains the projection engine proper: a [scan
//! converter][raster], a [plane-equation interpolator][plane], a
//! [depth-buffered compositor][target], [camera models][cam], [depth and
//! height map][depth] generation, and the [texture baker][bake].
//!
//! Every render call allocates and returns its own output buffer; nothing is
//! shared between calls except the statistics in [`Context`].

use alloc::vec::Vec;

use log::error;

use crate::geom::{Mesh, Tri};
use crate::math::point::{Point2, pt2};

pub use ctx::{Collision, Context};
pub use stats::{Rates, Stats, Throughput};

pub mod bake;
pub mod cam;
pub mod ctx;
pub mod depth;
pub mod plane;
pub mod raster;
pub mod stats;
pub mod target;

/// World space coordinate basis.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct World;

/// View (camera) space coordinate basis. The camera looks down the positive
/// z axis, x points right and y down in the image.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct View;

/// Screen space coordinate basis. `x` grows to the right and `y` downwards,
/// in pixels; integer coordinates are the pixel sample points.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct Screen;

/// Texture space coordinate basis. `u` grows to the right and `v` upwards,
/// the unit square covering the whole texture.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct Uv;

/// Texture coordinate of a face corner.
pub type TexCoord = Point2<Uv>;

/// Returns a new texture coordinate with components `u` and `v`.
#[inline]
pub const fn uv(u: f64, v: f64) -> TexCoord {
    pt2(u, v)
}

/// Errors reported by the projection engine.
///
/// Each variant describes a violated precondition of the input; no partial
/// output is returned alongside an error.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The mesh contains a face that is not a triangle.
    #[error("the mesh has to be triangular: face {face} has {degree} vertices")]
    NotTriangular { face: usize, degree: usize },

    /// Texture baking requires per-corner texture coordinates.
    #[error("the mesh has no texture coordinates")]
    MissingTexCoords,

    /// Point positions and colors are not index-aligned.
    #[error("point cloud has {positions} positions but {colors} colors")]
    CloudMismatch { positions: usize, colors: usize },

    /// Two faces map to the same texel.
    #[error("texel ({x}, {y}) is covered by both face {first} and face {second}")]
    TexelCollision {
        x: u32,
        y: u32,
        first: usize,
        second: usize,
    },

    /// A nearest-neighbor search answered the wrong number of queries.
    #[error("nearest-neighbor search returned {got} results for {expected} queries")]
    NeighborCount { expected: usize, got: usize },

    /// A nearest-neighbor search returned an index outside the point cloud.
    #[error("nearest neighbor {index} out of range for a cloud of {len} points")]
    NeighborIndex { index: usize, len: usize },

    /// The leading 3×3 block of the camera matrix cannot be inverted.
    #[error("camera projection matrix is singular")]
    SingularProjection,
}

/// Returns the faces of `mesh` as triangles, logging an error if some face
/// is not a triangle.
fn triangles(mesh: &Mesh) -> Result<Vec<Tri<usize>>, Error> {
    mesh.triangles().inspect_err(|e| error!("{e}"))
}
