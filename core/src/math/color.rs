//! Colors and color spaces.

use core::fmt::{self, Debug, Formatter};
use core::marker::PhantomData;
use core::ops::Index;

//
// Types
//

/// A generic color type, similar to [`Vector`][super::Vector].
///
/// # Type parameters
/// * `Repr`: the representation of the components of `Self`.
///   Color components are also called *channels*.
/// * `Space`: the color space that `Self` is an element of.
#[repr(transparent)]
pub struct Color<Repr, Space>(pub Repr, PhantomData<Space>);

/// The (S)RGB color space.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct Rgb;

/// An RGB color with `u8` components.
pub type Color3<Space = Rgb> = Color<[u8; 3], Space>;

/// Returns a new RGB color with `r`, `g`, and `b` components.
pub const fn rgb(r: u8, g: u8, b: u8) -> Color3 {
    Color([r, g, b], PhantomData)
}

/// Returns a gray RGB color with all channels equal to `v`.
pub const fn gray(v: u8) -> Color3 {
    rgb(v, v, v)
}

//
// Inherent impls
//

impl Color3 {
    pub const BLACK: Self = gray(0x00);
    pub const WHITE: Self = gray(0xFF);

    /// Returns the red component of `self`.
    #[inline]
    pub const fn r(self) -> u8 {
        self.0[0]
    }
    /// Returns the green component of `self`.
    #[inline]
    pub const fn g(self) -> u8 {
        self.0[1]
    }
    /// Returns the blue component of `self`.
    #[inline]
    pub const fn b(self) -> u8 {
        self.0[2]
    }
}

//
// Foreign trait impls
//

impl<R: Copy, S> Copy for Color<R, S> {}

impl<R: Clone, S> Clone for Color<R, S> {
    fn clone(&self) -> Self {
        Self(self.0.clone(), PhantomData)
    }
}

impl<R: PartialEq, S> PartialEq for Color<R, S> {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl<R: Eq, S> Eq for Color<R, S> {}

impl<R: Default, S> Default for Color<R, S> {
    fn default() -> Self {
        Self(R::default(), PhantomData)
    }
}

impl<S> Debug for Color3<S> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let [r, g, b] = self.0;
        write!(f, "Rgb(0x{r:02X}, 0x{g:02X}, 0x{b:02X})")
    }
}

impl<R, S> From<R> for Color<R, S> {
    #[inline]
    fn from(repr: R) -> Self {
        Self(repr, PhantomData)
    }
}

impl<S> Index<usize> for Color3<S> {
    type Output = u8;
    #[inline]
    fn index(&self, i: usize) -> &u8 {
        &self.0[i]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channels() {
        let c = rgb(0x12, 0x34, 0x56);
        assert_eq!(c.r(), 0x12);
        assert_eq!(c.g(), 0x34);
        assert_eq!(c.b(), 0x56);
        assert_eq!(c[1], 0x34);
    }

    #[test]
    fn default_is_black() {
        assert_eq!(Color3::default(), Color3::BLACK);
    }

    #[test]
    fn debug_formats_hex() {
        let s = alloc::format!("{:?}", rgb(0xFF, 0x08, 0x00));
        assert_eq!(s, "Rgb(0xFF, 0x08, 0x00)");
    }
}
