//! Linear algebra and other useful mathematics.
//!
//! Includes [vectors][self::vec], [points][point], [matrices][mat] and
//! [colors][color], as well as utilities such as approximate equality
//! comparisons.
//!
//! Vectors and points are tagged with a type that represents the *space*
//! they're embedded in, and values in different spaces cannot be mixed
//! without explicit conversion. A world-space vertex cannot accidentally be
//! passed where a screen-space position or a texture coordinate is expected.

pub use {
    approx::ApproxEq,
    color::{Color, Color3, rgb},
    mat::{Mat3x3, Mat3x4, Matrix, RealToReal},
    point::{Point, Point2, Point3, pt2, pt3},
    vec::{Vec2, Vec3, Vector, vec2, vec3},
};

pub mod approx;
pub mod color;
pub mod float;
pub mod mat;
pub mod point;
pub mod vec;
