//! Basic geometric primitives.

use alloc::vec::Vec;

use crate::math::point::{Point, Point2, Point3};

pub use cloud::PointCloud;
pub use mesh::Mesh;

pub mod cloud;
pub mod mesh;

/// Triangle, defined by three vertices.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
#[repr(transparent)]
pub struct Tri<V>(pub [V; 3]);

/// A closed curve composed of a chain of line segments.
///
/// The polygon is represented as a list of vertices, with each pair of
/// consecutive vertices, as well as the first and last vertex, sharing an
/// edge. Mesh faces are polygons of vertex indices.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Polygon<T>(pub Vec<T>);

/// Creates a new triangle from three vertices.
#[inline]
pub const fn tri<V>(a: V, b: V, c: V) -> Tri<V> {
    Tri([a, b, c])
}

impl<V> Tri<V> {
    /// Returns a triangle with `f` applied to each vertex of `self`.
    #[inline]
    pub fn map<U>(self, f: impl FnMut(V) -> U) -> Tri<U> {
        Tri(self.0.map(f))
    }
}

impl<B> Tri<Point2<B>> {
    /// Returns the signed area of `self`.
    ///
    /// The area is positive if the vertices wind counter-clockwise in a
    /// y-up coordinate system, negative if clockwise, and zero if the
    /// vertices are collinear.
    pub fn signed_area(&self) -> f64 {
        let [a, b, c] = self.0;
        0.5 * (b - a).perp_dot(&(c - a))
    }
}

impl<B> Tri<Point3<B>> {
    /// Returns the point with barycentric coordinates `weights` with
    /// respect to `self`.
    ///
    /// Weight `k` belongs to vertex `k`. If the weights are non-negative and
    /// sum to one, the result lies on the triangle.
    pub fn point_at(&self, weights: [f64; 3]) -> Point3<B> {
        let [a, b, c] = self.0.map(Point::to_vec);
        let [w0, w1, w2] = weights;
        (w0 * a + w1 * b + w2 * c).to_pt()
    }
}

/// Returns the barycentric coordinates of `p` with respect to `tri`.
///
/// The result `[w0, w1, w2]` satisfies `p = w0·a + w1·b + w2·c` and
/// `w0 + w1 + w2 = 1`; `p` is inside or on the edge of the triangle iff
/// every weight is non-negative. Returns `None` if the triangle has zero
/// or non-finite area.
///
/// # Examples
/// ```
/// use meshcast_core::geom::{Tri, barycentric, tri};
/// use meshcast_core::math::{Point2, pt2};
///
/// let t: Tri<Point2> = tri(pt2(0.0, 0.0), pt2(1.0, 0.0), pt2(0.0, 1.0));
/// assert_eq!(barycentric(&t, pt2(0.0, 0.0)), Some([1.0, 0.0, 0.0]));
/// assert_eq!(barycentric(&t, pt2(0.5, 0.5)), Some([0.0, 0.5, 0.5]));
/// ```
pub fn barycentric<B>(tri: &Tri<Point2<B>>, p: Point2<B>) -> Option<[f64; 3]> {
    let [a, b, c] = tri.0;
    let (ab, ac, ap) = (b - a, c - a, p - a);
    let d = ab.perp_dot(&ac);
    if d == 0.0 || !d.is_finite() {
        return None;
    }
    let w1 = ap.perp_dot(&ac) / d;
    let w2 = ab.perp_dot(&ap) / d;
    Some([1.0 - w1 - w2, w1, w2])
}

impl<T> Polygon<T> {
    /// Returns the number of vertices of `self`.
    #[inline]
    pub fn degree(&self) -> usize {
        self.0.len()
    }

    /// Returns `self` as a triangle, or `None` if `self` is not a triangle.
    pub fn as_tri(&self) -> Option<Tri<T>>
    where
        T: Copy,
    {
        match self.0[..] {
            [a, b, c] => Some(Tri([a, b, c])),
            _ => None,
        }
    }
}

impl<T> From<Tri<T>> for Polygon<T> {
    fn from(Tri(vs): Tri<T>) -> Self {
        Self(vs.into())
    }
}

impl<T, const N: usize> From<[T; N]> for Polygon<T> {
    fn from(vs: [T; N]) -> Self {
        Self(vs.into())
    }
}

impl<T> From<Vec<T>> for Polygon<T> {
    fn from(vs: Vec<T>) -> Self {
        Self(vs)
    }
}
