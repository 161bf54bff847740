//! Matrices and linear and projective maps.

use core::fmt::{self, Debug, Formatter};
use core::marker::PhantomData as Pd;

use super::approx::ApproxEq;
use super::point::Point3;
use super::vec::{Vec3, vec3};

//
// Types
//

/// Tag type for a linear map from basis `From` to basis `To`.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct RealToReal<From, To>(Pd<(From, To)>);

/// Tag type for a projective map from the affine space `From` to
/// homogeneous [image plane coordinates][Proj].
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct RealToProj<From>(Pd<From>);

/// Basis of homogeneous image plane coordinates `(s·x, s·y, s)`.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct Proj;

/// A generic matrix type.
///
/// The `Map` tag records the spaces the matrix maps between, so that
/// eg. a world-to-view rotation cannot be applied to a screen vector.
#[repr(transparent)]
pub struct Matrix<Repr, Map>(pub Repr, Pd<Map>);

/// A 3×3 matrix of `f64`s.
pub type Mat3x3<Map = RealToReal<(), ()>> = Matrix<[[f64; 3]; 3], Map>;
/// A 3×4 matrix of `f64`s, usually a camera projection.
pub type Mat3x4<Map = RealToProj<()>> = Matrix<[[f64; 4]; 3], Map>;

//
// Inherent impls
//

impl<R, M> Matrix<R, M> {
    /// Returns a matrix with the given elements, in row-major order.
    #[inline]
    pub const fn new(els: R) -> Self {
        Self(els, Pd)
    }

    /// Returns `self` with its map tag changed to `N`.
    #[inline]
    pub fn to<N>(self) -> Matrix<R, N> {
        Matrix(self.0, Pd)
    }
}

impl<M> Mat3x3<M> {
    /// Returns the 3×3 identity matrix.
    pub const fn identity() -> Self {
        Self::new([[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]])
    }

    /// Returns the row vector of `self` with index `i`.
    #[inline]
    pub fn row_vec<B>(&self, i: usize) -> Vec3<B> {
        Vec3::new(self.0[i])
    }

    /// Returns the column vector of `self` with index `j`.
    #[inline]
    pub fn col_vec<B>(&self, j: usize) -> Vec3<B> {
        let [r0, r1, r2] = &self.0;
        vec3(r0[j], r1[j], r2[j])
    }

    /// Returns the determinant of `self`.
    pub fn determinant(&self) -> f64 {
        let [[a, b, c], [d, e, f], [g, h, i]] = self.0;
        a * (e * i - f * h) - b * (d * i - f * g) + c * (d * h - e * g)
    }
}

impl<F, T> Mat3x3<RealToReal<F, T>> {
    /// Maps the vector `v` from basis `F` to basis `T`.
    #[inline]
    pub fn apply(&self, v: &Vec3<F>) -> Vec3<T> {
        let v = v.to::<()>();
        vec3(
            self.row_vec(0).dot(&v),
            self.row_vec(1).dot(&v),
            self.row_vec(2).dot(&v),
        )
    }

    /// Returns the composite map that first applies `self`, then `other`.
    ///
    /// The result is the matrix product `other · self`.
    pub fn then<U>(
        &self,
        other: &Mat3x3<RealToReal<T, U>>,
    ) -> Mat3x3<RealToReal<F, U>> {
        let mut els = [[0.0; 3]; 3];
        for (i, row) in els.iter_mut().enumerate() {
            let r = other.row_vec::<()>(i);
            for (j, el) in row.iter_mut().enumerate() {
                *el = r.dot(&self.col_vec(j));
            }
        }
        Matrix::new(els)
    }

    /// Returns the inverse map of `self`, or `None` if `self` is singular.
    pub fn inverse(&self) -> Option<Mat3x3<RealToReal<T, F>>> {
        let det = self.determinant();
        if det == 0.0 || !det.is_finite() {
            return None;
        }
        let [[a, b, c], [d, e, f], [g, h, i]] = self.0;
        let r = det.recip();
        let inv = [
            [(e * i - f * h) * r, (c * h - b * i) * r, (b * f - c * e) * r],
            [(f * g - d * i) * r, (a * i - c * g) * r, (c * d - a * f) * r],
            [(d * h - e * g) * r, (b * g - a * h) * r, (a * e - b * d) * r],
        ];
        inv.iter()
            .flatten()
            .all(|el| el.is_finite())
            .then(|| Matrix::new(inv))
    }
}

impl<B> Mat3x4<RealToProj<B>> {
    /// Returns the matrix `[M | t]`.
    pub fn from_parts(m: &Mat3x3<RealToReal<B, Proj>>, t: &Vec3<Proj>) -> Self {
        let [r0, r1, r2] = m.0;
        Self::new([
            [r0[0], r0[1], r0[2], t.x()],
            [r1[0], r1[1], r1[2], t.y()],
            [r2[0], r2[1], r2[2], t.z()],
        ])
    }

    /// Returns the leading 3×3 block of `self`.
    pub fn linear(&self) -> Mat3x3<RealToReal<B, Proj>> {
        let [r0, r1, r2] = &self.0;
        Matrix::new([
            [r0[0], r0[1], r0[2]],
            [r1[0], r1[1], r1[2]],
            [r2[0], r2[1], r2[2]],
        ])
    }

    /// Returns the last column of `self`.
    pub fn translation(&self) -> Vec3<Proj> {
        let [r0, r1, r2] = &self.0;
        vec3(r0[3], r1[3], r2[3])
    }

    /// Maps the point `pt` to homogeneous image plane coordinates.
    pub fn apply(&self, pt: &Point3<B>) -> Vec3<Proj> {
        self.linear().apply(&pt.to_vec()) + self.translation()
    }
}

//
// Local trait impls
//

impl<M, const R: usize, const C: usize> ApproxEq<Self, f64>
    for Matrix<[[f64; C]; R], M>
{
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

impl<R: Copy, M> Copy for Matrix<R, M> {}

impl<R: Clone, M> Clone for Matrix<R, M> {
    fn clone(&self) -> Self {
        Self(self.0.clone(), Pd)
    }
}

impl<R: PartialEq, M> PartialEq for Matrix<R, M> {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl<M, const R: usize, const C: usize> Debug for Matrix<[[f64; C]; R], M> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "Matrix[")?;
        for row in &self.0 {
            write!(f, "    ")?;
            for el in row {
                write!(f, "{el:>10.4} ")?;
            }
            writeln!(f)?;
        }
        write!(f, "]")
    }
}
