//! Real-valued vectors tagged with the basis they are expressed in.

use core::array;
use core::fmt::{self, Debug, Formatter};
use core::marker::PhantomData as Pd;
use core::ops::{Add, AddAssign, Index, Mul, Neg, Sub};

use super::approx::ApproxEq;
use super::point::Point;

//
// Types
//

/// A generic vector type. Represents an element of a vector space,
/// a tuple of real numbers expressed in the basis `B`.
///
/// The basis is a zero-sized tag such as [`World`][crate::render::World]
/// or [`Screen`][crate::render::Screen] that prevents mixing vectors from
/// different spaces by accident.
#[repr(transparent)]
pub struct Vector<Repr, Basis = ()>(pub Repr, Pd<Basis>);

/// A 2-vector with `f64` components.
pub type Vec2<Basis = ()> = Vector<[f64; 2], Basis>;
/// A 3-vector with `f64` components.
pub type Vec3<Basis = ()> = Vector<[f64; 3], Basis>;

/// Returns a real 2-vector with components `x` and `y`.
#[inline]
pub const fn vec2<B>(x: f64, y: f64) -> Vec2<B> {
    Vector([x, y], Pd)
}

/// Returns a real 3-vector with components `x`, `y`, and `z`.
#[inline]
pub const fn vec3<B>(x: f64, y: f64, z: f64) -> Vec3<B> {
    Vector([x, y, z], Pd)
}

//
// Inherent impls
//

impl<R, B> Vector<R, B> {
    /// Returns a new vector with representation `repr`.
    #[inline]
    pub const fn new(repr: R) -> Self {
        Self(repr, Pd)
    }

    /// Returns `self` with its basis tag changed to `C`.
    ///
    /// The components are not changed; this is a reinterpretation, not a
    /// change of basis.
    #[inline]
    pub fn to<C>(self) -> Vector<R, C> {
        Vector(self.0, Pd)
    }

    /// Returns the point with the same components as `self`, that is,
    /// `self` displaced from the origin.
    #[inline]
    pub fn to_pt(self) -> Point<R, B> {
        Point::new(self.0)
    }
}

impl<B, const N: usize> Vector<[f64; N], B> {
    /// Returns the zero vector.
    #[inline]
    pub const fn zero() -> Self {
        Self([0.0; N], Pd)
    }

    /// Returns the dot product of `self` and `other`.
    #[inline]
    pub fn dot(&self, other: &Self) -> f64 {
        let mut res = 0.0;
        for i in 0..N {
            res += self.0[i] * other.0[i];
        }
        res
    }

    /// Returns the length of `self`, squared.
    #[inline]
    pub fn len_sqr(&self) -> f64 {
        self.dot(self)
    }

    /// Returns the Euclidean length of `self`.
    #[inline]
    pub fn len(&self) -> f64 {
        use super::float::f64 as fp;
        fp::sqrt(self.len_sqr())
    }

    /// Returns `self` scaled to unit length.
    ///
    /// The result is non-finite if `self` is the zero vector.
    #[inline]
    pub fn normalize(&self) -> Self {
        *self * self.len().recip()
    }

    /// Returns a vector with `f` applied to each component.
    #[inline]
    pub fn map(self, mut f: impl FnMut(f64) -> f64) -> Self {
        Self(self.0.map(&mut f), Pd)
    }

    /// Returns whether every component of `self` is finite.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.0.iter().all(|c| c.is_finite())
    }
}

impl<B> Vec2<B> {
    /// Returns the x component of `self`.
    #[inline]
    pub const fn x(&self) -> f64 {
        self.0[0]
    }
    /// Returns the y component of `self`.
    #[inline]
    pub const fn y(&self) -> f64 {
        self.0[1]
    }

    /// Returns the perpendicular dot product of `self` and `other`,
    /// the z component of their cross product as 3-vectors.
    ///
    /// Positive if `other` is counter-clockwise from `self` in a y-up
    /// coordinate system.
    #[inline]
    pub fn perp_dot(&self, other: &Self) -> f64 {
        self.x() * other.y() - self.y() * other.x()
    }
}

impl<B> Vec3<B> {
    /// Returns the x component of `self`.
    #[inline]
    pub const fn x(&self) -> f64 {
        self.0[0]
    }
    /// Returns the y component of `self`.
    #[inline]
    pub const fn y(&self) -> f64 {
        self.0[1]
    }
    /// Returns the z component of `self`.
    #[inline]
    pub const fn z(&self) -> f64 {
        self.0[2]
    }

    /// Returns the cross product of `self` and `other`.
    pub fn cross(&self, other: &Self) -> Self {
        let [a, b, c] = self.0;
        let [d, e, f] = other.0;
        vec3(b * f - c * e, c * d - a * f, a * e - b * d)
    }
}

//
// Local trait impls
//

impl<B, const N: usize> ApproxEq<Self, f64> for Vector<[f64; N], B> {
    fn approx_eq_eps(&self, other: &Self, eps: &f64) -> bool {
        self.0.approx_eq_eps(&other.0, eps)
    }
    fn relative_epsilon() -> f64 {
        f64::relative_epsilon()
    }
}

//
// Foreign trait impls
//

// Manual impls of Copy, Clone, Eq, and PartialEq to avoid
// superfluous where B: Trait bounds

impl<R: Copy, B> Copy for Vector<R, B> {}

impl<R: Clone, B> Clone for Vector<R, B> {
    fn clone(&self) -> Self {
        Self(self.0.clone(), Pd)
    }
}

impl<R: PartialEq, B> PartialEq for Vector<R, B> {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl<R: Default, B> Default for Vector<R, B> {
    fn default() -> Self {
        Self(R::default(), Pd)
    }
}

impl<R: Debug, B> Debug for Vector<R, B> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Vec")?;
        Debug::fmt(&self.0, f)
    }
}

impl<R, B> From<R> for Vector<R, B> {
    #[inline]
    fn from(repr: R) -> Self {
        Self(repr, Pd)
    }
}

impl<B, const N: usize> Index<usize> for Vector<[f64; N], B> {
    type Output = f64;
    #[inline]
    fn index(&self, i: usize) -> &f64 {
        &self.0[i]
    }
}

impl<B, const N: usize> Add for Vector<[f64; N], B> {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self(array::from_fn(|i| self.0[i] + rhs.0[i]), Pd)
    }
}

impl<B, const N: usize> AddAssign for Vector<[f64; N], B> {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl<B, const N: usize> Sub for Vector<[f64; N], B> {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self(array::from_fn(|i| self.0[i] - rhs.0[i]), Pd)
    }
}

impl<B, const N: usize> Neg for Vector<[f64; N], B> {
    type Output = Self;
    #[inline]
    fn neg(self) -> Self {
        self.map(|c| -c)
    }
}

impl<B, const N: usize> Mul<f64> for Vector<[f64; N], B> {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: f64) -> Self {
        self.map(|c| c * rhs)
    }
}

impl<B, const N: usize> Mul<Vector<[f64; N], B>> for f64 {
    type Output = Vector<[f64; N], B>;
    #[inline]
    fn mul(self, rhs: Vector<[f64; N], B>) -> Self::Output {
        rhs * self
    }
}

#[cfg(test)]
mod tests {
    use crate::assert_approx_eq;

    use super::*;

    #[test]
    fn dot_and_len() {
        let v: Vec3 = vec3(2.0, 3.0, 6.0);
        assert_eq!(v.dot(&vec3(1.0, 0.0, -1.0)), -4.0);
        assert_eq!(v.len_sqr(), 49.0);
        assert_approx_eq!(v.len(), 7.0);
    }

    #[test]
    fn normalize() {
        let v: Vec3 = vec3(0.0, 3.0, 4.0);
        assert_approx_eq!(v.normalize(), vec3(0.0, 0.6, 0.8));
        assert!(!Vec3::<()>::zero().normalize().is_finite());
    }

    #[test]
    fn cross_product_is_right_handed() {
        let x: Vec3 = vec3(1.0, 0.0, 0.0);
        let y = vec3(0.0, 1.0, 0.0);
        assert_eq!(x.cross(&y), vec3(0.0, 0.0, 1.0));
        assert_eq!(y.cross(&x), vec3(0.0, 0.0, -1.0));
    }

    #[test]
    fn perp_dot() {
        let a: Vec2 = vec2(1.0, 0.0);
        assert_eq!(a.perp_dot(&vec2(0.0, 1.0)), 1.0);
        assert_eq!(a.perp_dot(&vec2(2.0, 0.0)), 0.0);
    }

    #[test]
    fn arithmetic() {
        let a: Vec2 = vec2(1.0, 2.0);
        let b = vec2(3.0, -1.0);
        assert_eq!(a + b, vec2(4.0, 1.0));
        assert_eq!(a - b, vec2(-2.0, 3.0));
        assert_eq!(-a, vec2(-1.0, -2.0));
        assert_eq!(a * 2.0, vec2(2.0, 4.0));
        assert_eq!(0.5 * a, vec2(0.5, 1.0));
    }
}
