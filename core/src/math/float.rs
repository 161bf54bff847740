//! Floating-point compatibility API.
//!
//! Most floating-point functions are currently unavailable in `no_std`.
//! This module provides the missing functions using the `libm` crate if the
//! feature of the same name is enabled. As a fallback, it also implements
//! the small subset of functions the engine needs even if neither `std` nor
//! `libm` is enabled.
//!
//! Import the module under a short name at the use site:
//! ```
//! use meshcast_core::math::float::f64 as fp;
//! assert_eq!(fp::floor(-1.5), -2.0);
//! ```

#[cfg(feature = "libm")]
pub mod libm {
    pub use libm::{ceil, fabs as abs, floor, sqrt};
}

pub mod fallback {
    /// Largest magnitude below which an `f64` may have a fractional part.
    const INTEGRAL: f64 = 4_503_599_627_370_496.0; // 2^52

    /// Returns the absolute value of `x`.
    #[inline]
    pub fn abs(x: f64) -> f64 {
        f64::from_bits(x.to_bits() & !(1 << 63))
    }
    /// Returns the largest integer less than or equal to `x`.
    #[inline]
    pub fn floor(x: f64) -> f64 {
        if !(-INTEGRAL < x && x < INTEGRAL) {
            // Already integral, or non-finite
            return x;
        }
        let t = x as i64 as f64;
        if t > x { t - 1.0 } else { t }
    }
    /// Returns the smallest integer greater than or equal to `x`.
    #[inline]
    pub fn ceil(x: f64) -> f64 {
        -floor(-x)
    }
    /// Returns the square root of `x`, or NaN if `x` is negative.
    pub fn sqrt(x: f64) -> f64 {
        if x.is_nan() || x < 0.0 {
            return f64::NAN;
        }
        if x == 0.0 || x == f64::INFINITY {
            return x;
        }
        // Halving the exponent gives an estimate within a few percent
        let mut y = f64::from_bits((x.to_bits() >> 1) + (0x3FF << 51));
        // Newton's method converges quadratically from there
        for _ in 0..6 {
            y = 0.5 * (y + x / y);
        }
        y
    }
}

#[cfg(feature = "std")]
#[allow(non_camel_case_types)]
pub type f64 = core::primitive::f64;

#[cfg(all(feature = "libm", not(feature = "std")))]
pub use libm as f64;

#[cfg(not(any(feature = "std", feature = "libm")))]
pub use fallback as f64;
