//! Colored point clouds.

use alloc::vec::Vec;

use crate::math::{color::Color3, point::Point3};
use crate::render::{Error, World};

/// A set of points with a color for each point.
///
/// Positions and colors are index-aligned: the color of `positions()[i]` is
/// `colors()[i]`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PointCloud {
    positions: Vec<Point3<World>>,
    colors: Vec<Color3>,
}

impl PointCloud {
    /// Creates a point cloud from index-aligned positions and colors.
    ///
    /// # Errors
    /// [`Error::CloudMismatch`] if the lengths of `positions` and `colors`
    /// differ.
    pub fn new(
        positions: Vec<Point3<World>>,
        colors: Vec<Color3>,
    ) -> Result<Self, Error> {
        if positions.len() != colors.len() {
            return Err(Error::CloudMismatch {
                positions: positions.len(),
                colors: colors.len(),
            });
        }
        Ok(Self { positions, colors })
    }

    /// Returns the positions of the points.
    #[inline]
    pub fn positions(&self) -> &[Point3<World>] {
        &self.positions
    }

    /// Returns the colors of the points.
    #[inline]
    pub fn colors(&self) -> &[Color3] {
        &self.colors
    }

    /// Returns the number of points.
    #[inline]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Returns whether `self` has no points.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Returns an iterator over the points and their colors.
    pub fn iter(&self) -> impl Iterator<Item = (&Point3<World>, &Color3)> {
        self.positions.iter().zip(&self.colors)
    }
}

impl FromIterator<(Point3<World>, Color3)> for PointCloud {
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = (Point3<World>, Color3)>,
    {
        let (positions, colors) = iter.into_iter().unzip();
        Self { positions, colors }
    }
}
