//! Two-dimensional buffers, used as depth buffers, height maps and texture
//! images.

use alloc::vec::Vec;
use core::fmt::{self, Debug, Formatter};
use core::iter::repeat_n;
use core::ops::{Index, IndexMut};

use super::Dims;

/// A rectangular 2D buffer that owns its elements, backed by a `Vec`.
///
/// `Buf2` stores its elements contiguously, in standard row-major order,
/// such that element (x, y) maps to element at index
/// ```text
/// buf.width() * y + x
/// ```
/// in the backing vector. Row 0 is the top row of the raster.
///
/// # Examples
/// ```
/// # use meshcast_core::util::buf::*;
/// // Elements initialized with `Default::default()`
/// let mut buf = Buf2::new_default((4, 4));
/// // Indexing with an array [x, y] yields element at row y, column x:
/// buf[[2, 1]] = 123;
/// // Indexing with an usize i yields row with index i as a slice:
/// assert_eq!(&buf[1usize], &[0, 0, 123, 0]);
/// // Thus you can also do this, row first, column second:
/// assert_eq!(buf[1usize][2], 123)
/// ```
#[derive(Clone, PartialEq)]
pub struct Buf2<T> {
    dims: Dims,
    data: Vec<T>,
}

//
// Inherent impls
//

impl<T> Buf2<T> {
    /// Returns a buffer with size `w` × `h`, with elements initialized
    /// with values from `init` in row-major order.
    ///
    /// # Panics
    /// If there are fewer than `w * h` elements in `init`.
    pub fn new<I>((w, h): Dims, init: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        let len = w as usize * h as usize;
        let data: Vec<_> = init.into_iter().take(len).collect();
        assert_eq!(data.len(), len, "too few elements to fill {w}×{h} buffer");
        Self { dims: (w, h), data }
    }

    /// Returns a buffer with size `w` × `h`, with every element
    /// initialized to a clone of `val`.
    pub fn new_fill(dims: Dims, val: T) -> Self
    where
        T: Clone,
    {
        let len = dims.0 as usize * dims.1 as usize;
        Self::new(dims, repeat_n(val, len))
    }

    /// Returns a buffer with size `w` × `h`, with every element
    /// initialized by calling `T::default()`.
    pub fn new_default(dims: Dims) -> Self
    where
        T: Clone + Default,
    {
        Self::new_fill(dims, T::default())
    }

    /// Returns a buffer with size `w` × `h`, with every element
    /// initialized by calling `init_fn(x, y)` where x is the column index
    /// and y the row index of the element being initialized.
    pub fn new_with<F>((w, h): Dims, mut init_fn: F) -> Self
    where
        F: FnMut(u32, u32) -> T,
    {
        let mut data = Vec::with_capacity(w as usize * h as usize);
        for y in 0..h {
            for x in 0..w {
                data.push(init_fn(x, y));
            }
        }
        Self { dims: (w, h), data }
    }

    /// Returns the width and height of `self`.
    #[inline]
    pub fn dims(&self) -> Dims {
        self.dims
    }
    /// Returns the width of `self`.
    #[inline]
    pub fn width(&self) -> u32 {
        self.dims.0
    }
    /// Returns the height of `self`.
    #[inline]
    pub fn height(&self) -> u32 {
        self.dims.1
    }
    /// Returns whether `self` has no elements (if its width or height is 0).
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the backing data of `self` as a linear slice.
    pub fn data(&self) -> &[T] {
        &self.data
    }
    /// Returns the backing data of `self` as a mutable linear slice.
    pub fn data_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Returns a reference to the element at `(x, y)`,
    /// or `None` if the position is out of bounds.
    pub fn get(&self, x: i64, y: i64) -> Option<&T> {
        self.to_index_checked(x, y).map(|i| &self.data[i])
    }
    /// Returns a mutable reference to the element at `(x, y)`,
    /// or `None` if the position is out of bounds.
    pub fn get_mut(&mut self, x: i64, y: i64) -> Option<&mut T> {
        self.to_index_checked(x, y).map(|i| &mut self.data[i])
    }

    /// Returns an iterator over the rows of `self` as `&[T]` slices.
    /// The length of each slice equals [`self.width()`](Self::width).
    pub fn rows(&self) -> impl Iterator<Item = &[T]> {
        self.data.chunks_exact(self.width().max(1) as usize)
    }
    /// Returns an iterator over the rows of `self` as `&mut [T]` slices.
    pub fn rows_mut(&mut self) -> impl Iterator<Item = &mut [T]> {
        let w = self.width().max(1) as usize;
        self.data.chunks_exact_mut(w)
    }

    /// Returns an iterator over all the elements of `self` in row-major
    /// order: first the elements on row 0 from left to right, followed
    /// by the elements on row 1, and so on.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.data.iter()
    }
    /// Returns a mutable iterator over all the elements of `self`
    /// in row-major order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.data.iter_mut()
    }

    /// Fills the buffer with clones of `val`.
    pub fn fill(&mut self, val: T)
    where
        T: Clone,
    {
        self.data.fill(val);
    }

    /// Returns a new buffer of the same size with `f` applied to
    /// every element of `self`.
    pub fn map<U>(&self, f: impl FnMut(&T) -> U) -> Buf2<U> {
        Buf2 {
            dims: self.dims,
            data: self.data.iter().map(f).collect(),
        }
    }

    #[inline]
    fn to_index_checked(&self, x: i64, y: i64) -> Option<usize> {
        let (w, h) = self.dims;
        let in_bounds = (0..w as i64).contains(&x) && (0..h as i64).contains(&y);
        in_bounds.then(|| y as usize * w as usize + x as usize)
    }

    #[inline]
    #[track_caller]
    fn to_index(&self, x: usize, y: usize) -> usize {
        let (w, h) = self.dims;
        if x >= w as usize || y >= h as usize {
            position_out_of_bounds(x, y, self.dims)
        }
        y * w as usize + x
    }
}

#[cold]
#[inline(never)]
#[track_caller]
fn position_out_of_bounds(x: usize, y: usize, (w, h): Dims) -> ! {
    panic!("position (x={x}, y={y}) out of bounds (0..{w}, 0..{h})")
}

//
// Foreign trait impls
//

impl<T> Debug for Buf2<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Buf2")
            .field("w", &self.dims.0)
            .field("h", &self.dims.1)
            .finish()
    }
}

impl<T> Index<usize> for Buf2<T> {
    type Output = [T];

    /// Returns a reference to the row at index `i`.
    ///
    /// # Panics
    /// If `i >= self.height()`.
    #[inline]
    fn index(&self, i: usize) -> &[T] {
        let w = self.width() as usize;
        let start = self.to_index(0, i);
        &self.data[start..start + w]
    }
}

impl<T> IndexMut<usize> for Buf2<T> {
    /// Returns a mutable reference to the row at index `i`.
    ///
    /// # Panics
    /// If `i >= self.height()`.
    #[inline]
    fn index_mut(&mut self, i: usize) -> &mut [T] {
        let w = self.width() as usize;
        let start = self.to_index(0, i);
        &mut self.data[start..start + w]
    }
}

impl<T> Index<[usize; 2]> for Buf2<T> {
    type Output = T;

    /// Returns a reference to the element at position `[x, y]`.
    ///
    /// # Panics
    /// If the position is out of bounds.
    #[inline]
    fn index(&self, [x, y]: [usize; 2]) -> &T {
        &self.data[self.to_index(x, y)]
    }
}

impl<T> IndexMut<[usize; 2]> for Buf2<T> {
    #[inline]
    fn index_mut(&mut self, [x, y]: [usize; 2]) -> &mut T {
        let i = self.to_index(x, y);
        &mut self.data[i]
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::*;

    #[test]
    fn buf_new_from() {
        let buf = Buf2::new((3, 2), 1..);
        assert_eq!(buf.data(), &[1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn buf_new_fill() {
        let buf = Buf2::new_fill((2, 2), f64::INFINITY);
        assert!(buf.iter().all(|&d| d == f64::INFINITY));
    }

    #[test]
    fn buf_new_with() {
        let buf = Buf2::new_with((3, 2), |x, y| x + y);
        assert_eq!(buf.data(), &[0, 1, 2, 1, 2, 3]);
    }

    #[test]
    #[should_panic = "too few elements"]
    fn buf_new_too_few_elements() {
        let _ = Buf2::new((3, 2), 0..5);
    }

    #[test]
    fn buf_extents() {
        let buf: Buf2<()> = Buf2::new_default((4, 5));
        assert_eq!(buf.dims(), (4, 5));
        assert_eq!(buf.width(), 4);
        assert_eq!(buf.height(), 5);
        assert!(!buf.is_empty());
        assert!(Buf2::<u8>::new_default((0, 5)).is_empty());
    }

    #[test]
    fn buf_index_and_index_mut() {
        let mut buf = Buf2::new((4, 5), 0..);

        assert_eq!(buf[[1usize, 2]], 9);
        assert_eq!(buf[[3, 0]], 3);
        assert_eq!(&buf[2usize], &[8, 9, 10, 11]);

        buf[[1usize, 2]] = -1;
        buf[4usize][0] = -2;
        assert_eq!(&buf[2usize], &[8, -1, 10, 11]);
        assert_eq!(&buf[4usize], &[-2, 17, 18, 19]);
    }

    #[test]
    #[should_panic = "position (x=4, y=0) out of bounds (0..4, 0..5)"]
    fn buf_index_x_out_of_bounds() {
        let buf = Buf2::new((4, 5), 0..);
        let _: i32 = buf[[4usize, 0]];
    }

    #[test]
    #[should_panic = "position (x=0, y=5) out of bounds (0..4, 0..5)"]
    fn buf_index_row_out_of_bounds() {
        let buf = Buf2::new((4, 5), 0..);
        let _: &[i32] = &buf[5usize];
    }

    #[test]
    fn buf_get_checks_bounds() {
        let mut buf = Buf2::new((2, 2), 0..);
        assert_eq!(buf.get(1, 1), Some(&3));
        assert_eq!(buf.get(-1, 0), None);
        assert_eq!(buf.get(0, 2), None);
        *buf.get_mut(0, 1).unwrap() = 7;
        assert_eq!(buf.data(), &[0, 1, 7, 3]);
    }

    #[test]
    fn buf_rows_and_map() {
        let buf = Buf2::new((2, 3), 0..);
        let rows: vec::Vec<_> = buf.rows().collect();
        assert_eq!(rows, vec![&[0, 1][..], &[2, 3], &[4, 5]]);

        let doubled = buf.map(|x| x * 2);
        assert_eq!(doubled.dims(), (2, 3));
        assert_eq!(doubled.data(), &[0, 2, 4, 6, 8, 10]);
    }
}
