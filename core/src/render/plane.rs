//! Interpolation of per-vertex attributes across a triangle.
//!
//! A scalar attribute that varies linearly in screen space over a triangle
//! is described exactly by a plane `a = A·x + B·y + C`. Fitting the plane
//! once per triangle turns every per-sample interpolation into two
//! multiply-adds, with no error accumulated across the triangle.

use crate::math::color::{Color3, rgb};
use crate::math::float::f64 as fp;
use crate::math::point::Point2;
use crate::math::vec::vec3;

use super::Screen;

/// The plane `A·x + B·y + C` through three `(x, y, value)` points.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Plane {
    pub a: f64,
    pub b: f64,
    pub c: f64,
}

/// A plane restricted to a single row `y`, `A·x + (B·y + C)`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Row {
    step: f64,
    base: f64,
}

/// Trait for attributes that can be interpolated across a triangle.
///
/// Vector-valued attributes interpolate each component independently, using
/// one [`Plane`] per component.
pub trait Attrib: Copy {
    /// The fitted interpolator, usually one plane per component.
    type Planes: Copy;

    /// Fits the interpolator to the values at the triangle's vertices.
    ///
    /// Returns `None` if the triangle is degenerate.
    fn fit(verts: [Point2<Screen>; 3], vals: [Self; 3]) -> Option<Self::Planes>;

    /// Returns the interpolated value at `(x, y)`.
    fn eval(planes: &Self::Planes, x: f64, y: f64) -> Self;
}

impl Plane {
    /// Returns the plane through the points `(x_i, y_i, vals_i)`.
    ///
    /// Returns `None` if the vertices are collinear or if any coefficient
    /// is not finite.
    ///
    /// # Examples
    /// ```
    /// use meshcast_core::math::pt2;
    /// use meshcast_core::render::plane::Plane;
    ///
    /// let verts = [pt2(0.0, 0.0), pt2(2.0, 0.0), pt2(0.0, 2.0)];
    /// let p = Plane::fit(verts, [1.0, 3.0, 5.0]).unwrap();
    /// assert_eq!(p.eval(1.0, 1.0), 4.0);
    ///
    /// let line = [pt2(0.0, 0.0), pt2(1.0, 1.0), pt2(2.0, 2.0)];
    /// assert_eq!(Plane::fit(line, [1.0, 3.0, 5.0]), None);
    /// ```
    pub fn fit(verts: [Point2<Screen>; 3], vals: [f64; 3]) -> Option<Self> {
        let [p0, p1, p2] = verts;
        let [v0, v1, v2] = vals;

        let b1 = vec3::<()>(p1.x() - p0.x(), p1.y() - p0.y(), v1 - v0);
        let b2 = vec3(p2.x() - p0.x(), p2.y() - p0.y(), v2 - v0);
        let n = b1.cross(&b2);

        if n.z() == 0.0 {
            return None;
        }
        let a = -n.x() / n.z();
        let b = -n.y() / n.z();
        let c = (p0.x() * n.x() + p0.y() * n.y() + v0 * n.z()) / n.z();

        let res = Self { a, b, c };
        res.is_finite().then_some(res)
    }

    /// Returns the value of the plane at `(x, y)`.
    #[inline]
    pub fn eval(&self, x: f64, y: f64) -> f64 {
        self.a * x + self.b * y + self.c
    }

    /// Returns the restriction of `self` to row `y`, for evaluating many
    /// samples on the same row.
    #[inline]
    pub fn row(&self, y: f64) -> Row {
        Row { step: self.a, base: self.b * y + self.c }
    }

    /// Returns whether every coefficient of `self` is finite.
    pub fn is_finite(&self) -> bool {
        self.a.is_finite() && self.b.is_finite() && self.c.is_finite()
    }
}

impl Row {
    /// Returns the value of the plane at column `x` of this row.
    #[inline]
    pub fn at(&self, x: f64) -> f64 {
        self.step * x + self.base
    }
}

//
// Attrib impls
//

impl Attrib for f64 {
    type Planes = Plane;

    fn fit(verts: [Point2<Screen>; 3], vals: [f64; 3]) -> Option<Plane> {
        Plane::fit(verts, vals)
    }
    #[inline]
    fn eval(p: &Plane, x: f64, y: f64) -> f64 {
        p.eval(x, y)
    }
}

impl Attrib for f32 {
    type Planes = Plane;

    fn fit(verts: [Point2<Screen>; 3], vals: [f32; 3]) -> Option<Plane> {
        Plane::fit(verts, vals.map(f64::from))
    }
    #[inline]
    fn eval(p: &Plane, x: f64, y: f64) -> f32 {
        p.eval(x, y) as f32
    }
}

impl<const N: usize> Attrib for [f64; N] {
    type Planes = [Plane; N];

    fn fit(verts: [Point2<Screen>; 3], vals: [[f64; N]; 3]) -> Option<[Plane; N]> {
        let mut planes = [Plane::default(); N];
        for (i, p) in planes.iter_mut().enumerate() {
            *p = Plane::fit(verts, vals.map(|v| v[i]))?;
        }
        Some(planes)
    }
    #[inline]
    fn eval(ps: &[Plane; N], x: f64, y: f64) -> [f64; N] {
        ps.map(|p| p.eval(x, y))
    }
}

impl Attrib for Color3 {
    type Planes = [Plane; 3];

    fn fit(verts: [Point2<Screen>; 3], vals: [Color3; 3]) -> Option<[Plane; 3]> {
        let vals = vals.map(|c| c.0.map(f64::from));
        <[f64; 3]>::fit(verts, vals)
    }
    /// Channels are rounded to the nearest integer and clamped to 0..=255.
    #[inline]
    fn eval(ps: &[Plane; 3], x: f64, y: f64) -> Color3 {
        let [r, g, b] =
            ps.map(|p| fp::floor(p.eval(x, y) + 0.5).clamp(0.0, 255.0) as u8);
        rgb(r, g, b)
    }
}

#[cfg(test)]
mod tests {
    use crate::assert_approx_eq;
    use crate::math::pt2;

    use super::*;

    #[test]
    fn plane_reproduces_vertex_values() {
        let verts = [pt2(1.5, 2.0), pt2(7.25, 3.5), pt2(3.0, 9.75)];
        let vals = [0.3, -2.0, 11.5];
        let p = Plane::fit(verts, vals).unwrap();
        for (v, val) in verts.iter().zip(vals) {
            assert_approx_eq!(p.eval(v.x(), v.y()), val);
        }
    }

    #[test]
    fn constant_value_gives_flat_plane() {
        let verts = [pt2(0.0, 0.0), pt2(5.0, 1.0), pt2(2.0, 4.0)];
        let p = Plane::fit(verts, [3.0; 3]).unwrap();
        assert_approx_eq!(p.a, 0.0);
        assert_approx_eq!(p.b, 0.0);
        assert_approx_eq!(p.c, 3.0);
    }

    #[test]
    fn row_matches_eval() {
        let verts = [pt2(0.0, 0.0), pt2(4.0, 0.0), pt2(0.0, 4.0)];
        let p = Plane::fit(verts, [0.0, 4.0, 8.0]).unwrap();
        let row = p.row(3.0);
        for x in 0..4 {
            let x = x as f64;
            assert_approx_eq!(row.at(x), p.eval(x, 3.0));
        }
        assert_eq!(p, Plane { a: 1.0, b: 2.0, c: 0.0 });
    }

    #[test]
    fn degenerate_triangle_has_no_plane() {
        let line = [pt2(0.0, 0.0), pt2(1.0, 2.0), pt2(2.0, 4.0)];
        assert_eq!(Plane::fit(line, [1.0, 2.0, 3.0]), None);

        let verts = [pt2(0.0, 0.0), pt2(1.0, 0.0), pt2(0.0, 1.0)];
        assert_eq!(Plane::fit(verts, [0.0, f64::INFINITY, 0.0]), None);
        assert_eq!(Plane::fit(verts, [0.0, f64::NAN, 0.0]), None);
    }

    #[test]
    fn vector_attribute() {
        let verts = [pt2(0.0, 0.0), pt2(2.0, 0.0), pt2(0.0, 2.0)];
        let vals = [[0.0, 10.0], [2.0, 10.0], [0.0, 12.0]];
        let ps = <[f64; 2]>::fit(verts, vals).unwrap();
        assert_approx_eq!(<[f64; 2]>::eval(&ps, 1.0, 1.0), [1.0, 11.0]);
    }

    #[test]
    fn color_attribute_rounds_and_clamps() {
        let verts = [pt2(0.0, 0.0), pt2(2.0, 0.0), pt2(0.0, 2.0)];
        let vals = [rgb(0, 0, 255), rgb(255, 0, 255), rgb(0, 255, 255)];
        let ps = Color3::fit(verts, vals).unwrap();
        assert_eq!(Color3::eval(&ps, 1.0, 0.0), rgb(128, 0, 255));
        assert_eq!(Color3::eval(&ps, 4.0, 0.0), rgb(255, 0, 255));
        assert_eq!(Color3::eval(&ps, -1.0, 0.0), rgb(0, 0, 255));
    }
}
