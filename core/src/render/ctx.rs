//! Rendering context and parameters.

use core::cell::RefCell;

use crate::util::{Dims, buf::Buf2};

use super::Stats;

/// Context and parameters used by the renderer.
#[derive(Clone, Debug)]
pub struct Context {
    /// The size of the textures produced by the [baker][super::bake].
    pub texture_dims: Dims,

    /// What to do when two faces map to the same texel while baking.
    pub collision: Collision,

    /// Collecting rendering statistics.
    pub stats: RefCell<Stats>,
}

/// Policy for texels claimed by more than one face.
///
/// With a proper UV unwrap no two faces overlap in texture space, so a
/// collision usually means the unwrap is broken.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum Collision {
    /// Abort baking with [`Error::TexelCollision`][super::Error::TexelCollision].
    #[default]
    Fail,
    /// Let the face processed later win, logging a warning and counting the
    /// collision in [`Stats::collisions`].
    Overwrite,
}

impl Context {
    /// Returns a depth buffer of size `dims` cleared to `+∞`, the
    /// "no surface" sentinel.
    pub fn depth_buffer(&self, dims: Dims) -> Buf2<f64> {
        Buf2::new_fill(dims, f64::INFINITY)
    }

    /// Adds `stats` to the statistics accumulated in `self`.
    pub fn record(&self, stats: Stats) {
        *self.stats.borrow_mut() += stats;
    }
}

impl Default for Context {
    /// Creates a rendering context with default settings.
    ///
    /// The default values are:
    /// * Texture size:     500 × 500
    /// * Texel collisions: Fail
    fn default() -> Self {
        Self {
            texture_dims: (500, 500),
            collision: Collision::Fail,
            stats: Default::default(),
        }
    }
}
