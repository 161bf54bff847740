//! Various utility types and functions.

pub mod buf;
#[cfg(feature = "std")]
pub mod pnm;

/// Width and height of a raster, in pixels.
pub type Dims = (u32, u32);
