//! Points in affine spaces.

use core::array;
use core::fmt::{self, Debug, Formatter};
use core::marker::PhantomData as Pd;
use core::ops::{Add, Index, Sub};

use super::approx::ApproxEq;
use super::vec::Vector;

/// A position in the space tagged `Basis`.
///
/// Unlike vectors, points cannot be added together; the difference of two
/// points is a [`Vector`], and a vector can be added to a point to yield
/// another point.
#[repr(transparent)]
pub struct Point<Repr, Basis = ()>(pub Repr, Pd<Basis>);

/// A 2-point with `f64` components.
pub type Point2<Basis = ()> = Point<[f64; 2], Basis>;
/// A 3-point with `f64` components.
pub type Point3<Basis = ()> = Point<[f64; 3], Basis>;

/// Returns a real 2-point with `x` and `y` components.
#[inline]
pub const fn pt2<B>(x: f64, y: f64) -> Point2<B> {
    Point([x, y], Pd)
}
/// Returns a real 3-point with `x`, `y`, and `z` components.
#[inline]
pub const fn pt3<B>(x: f64, y: f64, z: f64) -> Point3<B> {
    Point([x, y, z], Pd)
}

impl<R, B> Point<R, B> {
    #[inline]
    pub const fn new(repr: R) -> Self {
        Self(repr, Pd)
    }

    /// Returns `self` with its basis tag changed to `C`.
    #[inline]
    pub fn to<C>(self) -> Point<R, C> {
        Point(self.0, Pd)
    }

    /// Returns the vector from the origin to `self`.
    #[inline]
    pub fn to_vec(self) -> Vector<R, B> {
        Vector::new(self.0)
    }
}

impl<B, const N: usize> Point<[f64; N], B> {
    /// Returns the origin point.
    #[inline]
    pub const fn origin() -> Self {
        Self([0.0; N], Pd)
    }

    /// Returns the squared Euclidean distance between `self` and `other`.
    #[inline]
    pub fn distance_sqr(&self, other: &Self) -> f64 {
        (*self - *other).len_sqr()
    }

    /// Returns whether every component of `self` is finite.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.0.iter().all(|c| c.is_finite())
    }
}

impl<B> Point2<B> {
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
}

impl<B> Point3<B> {
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
}

impl<B, const N: usize> ApproxEq<Self, f64> for Point<[f64; N], B> {
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

impl<R: Copy, B> Copy for Point<R, B> {}

impl<R: Clone, B> Clone for Point<R, B> {
    fn clone(&self) -> Self {
        Self(self.0.clone(), Pd)
    }
}

impl<R: PartialEq, B> PartialEq for Point<R, B> {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl<R: Default, B> Default for Point<R, B> {
    fn default() -> Self {
        Self(R::default(), Pd)
    }
}

impl<R: Debug, B> Debug for Point<R, B> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Point")?;
        Debug::fmt(&self.0, f)
    }
}

impl<R, B> From<R> for Point<R, B> {
    #[inline]
    fn from(repr: R) -> Self {
        Self(repr, Pd)
    }
}

impl<B, const N: usize> Index<usize> for Point<[f64; N], B> {
    type Output = f64;
    #[inline]
    fn index(&self, i: usize) -> &f64 {
        &self.0[i]
    }
}

impl<B, const N: usize> Add<Vector<[f64; N], B>> for Point<[f64; N], B> {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Vector<[f64; N], B>) -> Self {
        Self(array::from_fn(|i| self.0[i] + rhs.0[i]), Pd)
    }
}

impl<B, const N: usize> Sub<Vector<[f64; N], B>> for Point<[f64; N], B> {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Vector<[f64; N], B>) -> Self {
        Self(array::from_fn(|i| self.0[i] - rhs.0[i]), Pd)
    }
}

impl<B, const N: usize> Sub for Point<[f64; N], B> {
    type Output = Vector<[f64; N], B>;
    #[inline]
    fn sub(self, rhs: Self) -> Self::Output {
        Vector::new(array::from_fn(|i| self.0[i] - rhs.0[i]))
    }
}
