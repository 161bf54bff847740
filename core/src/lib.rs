//! Core functionality of the `meshcast` project.
//!
//! Turns triangulated 3D surfaces into 2D raster buffers: depth maps, height
//! maps, and textures baked from colored point clouds. Includes a small
//! strongly typed math library, geometry primitives, a scanline triangle
//! rasterizer with plane-equation attribute interpolation and depth testing,
//! and camera models.
//!
//! # Crate features
//!
//! * `std`:
//!   Makes available items requiring I/O or timekeeping, and uses the
//!   floating-point functions of `std`.
//!
//!   If this feature is disabled, the crate only depends on `alloc`.
//!
//! * `libm`:
//!   Provides software implementations of floating-point functions via the
//!   [libm](https://crates.io/crates/libm) crate.
//!
//! If neither is enabled, simple fallback implementations of the few
//! floating-point functions needed are used.
//!
//! All features are disabled by default.

#![no_std]

#[cfg(feature = "std")]
extern crate std;

extern crate alloc;
extern crate core;

pub mod geom;
pub mod math;
pub mod render;
pub mod util;

pub mod prelude {
    pub use crate::math::{
        Color3, Mat3x3, Mat3x4, Point2, Point3, Vec2, Vec3, pt2, pt3, rgb,
        vec2, vec3,
    };

    pub use crate::geom::{Mesh, PointCloud, Polygon, Tri, tri};

    pub use crate::render::{
        Context, Error, Screen, TexCoord, Uv, World,
        bake::{NearestNeighbors, Neighbor, bake},
        cam::{Camera, Orthographic, Perspective},
        depth::{depth_to_height, render_depth_map, render_height_map},
        uv,
    };

    pub use crate::util::{Dims, buf::Buf2};
}
