//! Geometry collaborators of the `meshcast` projection engine.
//!
//! The core engine only consumes triangulated meshes with texture
//! coordinates and a nearest-neighbor search over a point cloud. This crate
//! provides the rest of the pipeline around it:
//!
//! * [`io`]: reading and writing Wavefront OBJ meshes and MTL materials,
//! * [`cloud`]: reading ASCII `x y z r g b` point clouds,
//! * [`tess`]: fan triangulation of polygonal faces,
//! * [`unwrap`]: a per-face UV atlas,
//! * [`knn`]: a k-d tree [`NearestNeighbors`][mc::render::bake::NearestNeighbors]
//!   index with parallel batched queries.

pub mod cloud;
pub mod io;
pub mod knn;
pub mod tess;
pub mod unwrap;
