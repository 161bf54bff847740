//! Camera models.
//!
//! A camera maps world-space points to screen-space points and assigns each
//! point a depth along the viewing direction. The [`Perspective`] camera is
//! the usual pinhole model with a full 3×4 projection matrix; the
//! [`Orthographic`] camera looks straight down the world z axis and is used
//! for top-down height maps.

use crate::math::mat::{Mat3x3, Mat3x4, Proj, RealToProj, RealToReal};
use crate::math::point::{Point2, Point3, pt2};
use crate::math::vec::Vec3;
use crate::util::Dims;

use super::{Screen, View, World};

/// Trait for camera models.
pub trait Camera {
    /// Returns the width and height of the image, in pixels.
    fn dims(&self) -> Dims;

    /// Projects a world-space point to screen space.
    fn project(&self, pt: &Point3<World>) -> Point2<Screen>;

    /// Returns the depth of a world-space point.
    ///
    /// Depth grows with distance from the camera along the viewing
    /// direction; points in front of a perspective camera have positive
    /// depth.
    fn depth(&self, pt: &Point3<World>) -> f64;

    /// Returns `self` as a perspective camera, if it is one.
    ///
    /// Perspective cameras expose a projection matrix, which enables
    /// converting depth maps to height maps without re-rasterizing.
    fn as_perspective(&self) -> Option<&Perspective> {
        None
    }
}

/// Pinhole camera with intrinsics `K`, rotation `R` and center `C`.
///
/// A world point `X` maps to the homogeneous image point `K·R·(X − C)`.
/// The view space has x pointing right and y down in the image, and the
/// camera looks down the positive z axis.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Perspective {
    dims: Dims,
    intrinsics: Mat3x3<RealToReal<View, Proj>>,
    rotation: Mat3x3<RealToReal<World, View>>,
    center: Point3<World>,
}

/// Top-down orthographic camera.
///
/// Maps world x to image columns and world y to image rows, with `origin`
/// the world xy position of pixel `(0, 0)` and rows growing southwards.
/// Depth is `−z`, so higher points are nearer.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Orthographic {
    /// Image width and height.
    pub dims: Dims,
    /// World xy coordinates of pixel `(0, 0)`.
    pub origin: Point2<World>,
    /// Ground sample distance: world units per pixel.
    pub gsd: f64,
}

/// Returns the intrinsic matrix of a camera with focal length `focal`,
/// in pixels, and principal point `pp`.
pub fn intrinsics(
    focal: f64,
    pp: Point2<Screen>,
) -> Mat3x3<RealToReal<View, Proj>> {
    Mat3x3::new([
        [focal, 0.0, pp.x()],
        [0.0, focal, pp.y()],
        [0.0, 0.0, 1.0],
    ])
}

//
// Inherent impls
//

impl Perspective {
    /// Creates a perspective camera from its intrinsic matrix, rotation and
    /// center.
    pub fn new(
        dims: Dims,
        intrinsics: Mat3x3<RealToReal<View, Proj>>,
        rotation: Mat3x3<RealToReal<World, View>>,
        center: Point3<World>,
    ) -> Self {
        Self { dims, intrinsics, rotation, center }
    }

    /// Creates a camera at `center` looking at `target`.
    ///
    /// `focal` is the focal length in pixels and the principal point is the
    /// center of the image. `up` is the world direction that appears
    /// upwards in the image; it must not be parallel to the viewing
    /// direction, or the camera is non-finite.
    ///
    /// # Examples
    /// ```
    /// use meshcast_core::math::{pt2, pt3, vec3};
    /// use meshcast_core::render::cam::{Camera, Perspective};
    ///
    /// let cam = Perspective::look_at(
    ///     (100, 100),
    ///     50.0,
    ///     pt3(0.0, 0.0, 10.0),
    ///     pt3(0.0, 0.0, 0.0),
    ///     vec3(0.0, 1.0, 0.0),
    /// );
    /// assert_eq!(cam.project(&pt3(0.0, 0.0, 0.0)), pt2(50.0, 50.0));
    /// assert_eq!(cam.depth(&pt3(0.0, 0.0, 0.0)), 10.0);
    /// ```
    pub fn look_at(
        dims: Dims,
        focal: f64,
        center: Point3<World>,
        target: Point3<World>,
        up: Vec3<World>,
    ) -> Self {
        let z = (target - center).normalize();
        let x = z.cross(&up).normalize();
        let y = z.cross(&x);
        let rotation = Mat3x3::new([x.0, y.0, z.0]);

        let pp = pt2(dims.0 as f64 / 2.0, dims.1 as f64 / 2.0);
        Self::new(dims, intrinsics(focal, pp), rotation, center)
    }

    /// Returns the intrinsic matrix `K`.
    pub fn intrinsics(&self) -> &Mat3x3<RealToReal<View, Proj>> {
        &self.intrinsics
    }

    /// Returns the world-to-view rotation `R`.
    pub fn rotation(&self) -> &Mat3x3<RealToReal<World, View>> {
        &self.rotation
    }

    /// Returns the camera center `C` in world space.
    pub fn center(&self) -> Point3<World> {
        self.center
    }

    /// Returns the projection matrix `P = K·[R | −R·C]`.
    pub fn to_matrix(&self) -> Mat3x4<RealToProj<World>> {
        let Self { intrinsics: k, rotation: r, center: c, .. } = self;
        let t = k.apply(&r.apply(&-c.to_vec()));
        Mat3x4::from_parts(&r.then(k), &t)
    }

    /// Returns the view-space position of a world-space point.
    pub fn to_view(&self, pt: &Point3<World>) -> Vec3<View> {
        self.rotation.apply(&(*pt - self.center))
    }
}

impl Orthographic {
    /// Creates an orthographic camera.
    pub fn new(dims: Dims, origin: Point2<World>, gsd: f64) -> Self {
        Self { dims, origin, gsd }
    }

    /// Returns a camera whose image covers the world xy rectangle with the
    /// given north-west corner and width, keeping pixels square.
    pub fn covering(dims: Dims, north_west: Point2<World>, width: f64) -> Self {
        Self::new(dims, north_west, width / dims.0 as f64)
    }
}

//
// Trait impls
//

impl Camera for Perspective {
    fn dims(&self) -> Dims {
        self.dims
    }

    fn project(&self, pt: &Point3<World>) -> Point2<Screen> {
        let p = self.intrinsics.apply(&self.to_view(pt));
        pt2(p.x() / p.z(), p.y() / p.z())
    }

    fn depth(&self, pt: &Point3<World>) -> f64 {
        self.to_view(pt).z()
    }

    fn as_perspective(&self) -> Option<&Perspective> {
        Some(self)
    }
}

impl Camera for Orthographic {
    fn dims(&self) -> Dims {
        self.dims
    }

    fn project(&self, pt: &Point3<World>) -> Point2<Screen> {
        let o = self.origin;
        pt2((pt.x() - o.x()) / self.gsd, (o.y() - pt.y()) / self.gsd)
    }

    fn depth(&self, pt: &Point3<World>) -> f64 {
        -pt.z()
    }
}

impl<C: Camera + ?Sized> Camera for &C {
    fn dims(&self) -> Dims {
        (**self).dims()
    }
    fn project(&self, pt: &Point3<World>) -> Point2<Screen> {
        (**self).project(pt)
    }
    fn depth(&self, pt: &Point3<World>) -> f64 {
        (**self).depth(pt)
    }
    fn as_perspective(&self) -> Option<&Perspective> {
        (**self).as_perspective()
    }
}

#[cfg(test)]
mod tests {
    use crate::assert_approx_eq;
    use crate::math::{point::pt3, vec::vec3};

    use super::*;

    fn top_down() -> Perspective {
        Perspective::look_at(
            (100, 100),
            50.0,
            pt3(0.0, 0.0, 10.0),
            pt3(0.0, 0.0, 0.0),
            vec3(0.0, 1.0, 0.0),
        )
    }

    #[test]
    fn look_at_axes() {
        let cam = top_down();
        assert_approx_eq!(
            cam.rotation().0,
            [[1.0, 0.0, 0.0], [0.0, -1.0, 0.0], [0.0, 0.0, -1.0]]
        );
        assert_eq!(cam.center(), pt3(0.0, 0.0, 10.0));
    }

    #[test]
    fn perspective_projection() {
        let cam = top_down();
        assert_approx_eq!(cam.project(&pt3(0.0, 0.0, 0.0)), pt2(50.0, 50.0));
        assert_approx_eq!(cam.project(&pt3(1.0, 0.0, 0.0)), pt2(55.0, 50.0));
        assert_approx_eq!(cam.project(&pt3(0.0, 1.0, 0.0)), pt2(50.0, 45.0));
        // Closer points spread further from the principal point
        assert_approx_eq!(cam.project(&pt3(1.0, 0.0, 5.0)), pt2(60.0, 50.0));
    }

    #[test]
    fn perspective_depth() {
        let cam = top_down();
        assert_approx_eq!(cam.depth(&pt3(3.0, -2.0, 0.0)), 10.0);
        assert_approx_eq!(cam.depth(&pt3(0.0, 0.0, 4.0)), 6.0);
        assert_approx_eq!(cam.depth(&pt3(0.0, 0.0, 12.0)), -2.0);
    }

    #[test]
    fn matrix_agrees_with_projection() {
        let cam = Perspective::look_at(
            (64, 48),
            40.0,
            pt3(3.0, -7.0, 5.0),
            pt3(0.5, 1.0, -0.5),
            vec3(0.0, 0.0, 1.0),
        );
        let p = cam.to_matrix();
        for pt in [pt3(0.0, 0.0, 0.0), pt3(1.5, 2.0, -1.0), pt3(-4.0, 3.0, 2.0)]
        {
            let h = p.apply(&pt);
            let proj = cam.project(&pt);
            assert_approx_eq!(pt2(h.x() / h.z(), h.y() / h.z()), proj);
            assert_approx_eq!(h.z(), cam.depth(&pt));
        }
    }

    #[test]
    fn orthographic_projection() {
        let cam = Orthographic::new((8, 8), pt2(-2.0, 2.0), 0.5);
        assert_eq!(cam.project(&pt3(0.0, 0.0, 3.0)), pt2(4.0, 4.0));
        assert_eq!(cam.project(&pt3(-2.0, 2.0, 0.0)), pt2(0.0, 0.0));
        assert_eq!(cam.project(&pt3(1.0, -1.0, 0.0)), pt2(6.0, 6.0));
        assert_eq!(cam.depth(&pt3(0.0, 0.0, 3.0)), -3.0);
        assert_eq!(cam.dims(), (8, 8));
    }

    #[test]
    fn orthographic_covering() {
        let cam = Orthographic::covering((10, 5), pt2(0.0, 5.0), 20.0);
        assert_eq!(cam.gsd, 2.0);
        assert_eq!(cam.project(&pt3(20.0, -5.0, 0.0)), pt2(10.0, 5.0));
    }

    #[test]
    fn only_perspective_exposes_matrix() {
        let persp = top_down();
        let ortho = Orthographic::new((8, 8), pt2(0.0, 0.0), 1.0);
        assert!(persp.as_perspective().is_some());
        assert!(ortho.as_perspective().is_none());
        assert!((&persp).as_perspective().is_some());
    }
}
