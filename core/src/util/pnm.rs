//! PNM, also known as NetPBM, file format support.
//!
//! PNM is a venerable family of extremely simple image formats, each
//! consisting of a simple textual header followed by either text or
//! binary pixel data. Baked textures are written as PPM, depth and height
//! maps as PGM.
//!
//! Type  | Magic | Pixel format
//! ----- | ------| ------------
//! PGM   | P5    | 8 bpp grayscale
//! PPM   | P6    | 3x8 bpp RGB

use core::fmt::{self, Display, Formatter};
use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::Path,
};

use crate::math::color::Color3;
use crate::util::buf::Buf2;

/// The header of a binary PNM image.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
struct Header {
    format: Format,
    width: u32,
    height: u32,
}

/// The format of a binary PNM image.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum Format {
    /// Grayscale image, binary encoding. 1 byte per pixel.
    BinaryGraymap,
    /// RGB image, binary encoding. 3 bytes per pixel.
    BinaryPixmap,
}

impl Display for Format {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Format::BinaryGraymap => "P5",
            Format::BinaryPixmap => "P6",
        })
    }
}

impl Header {
    /// Writes `self` to `dest` as a valid PNM header,
    /// including a trailing newline.
    fn write(&self, mut dest: impl Write) -> io::Result<()> {
        let Self { format, width, height } = *self;
        writeln!(dest, "{format} {width} {height} 255")
    }
}

/// Writes an image to a file in PPM format, P6 sub-format
/// (binary 8-bits-per-channel RGB).
///
/// Caution: This function overwrites the file if it already exists.
/// Use [`write_ppm`] for more control over file creation.
///
/// # Errors
/// Returns [`std::io::Error`] if an error occurs while writing.
pub fn save_ppm(path: impl AsRef<Path>, data: &Buf2<Color3>) -> io::Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    write_ppm(&mut out, data)?;
    out.flush()
}

/// Writes an image to `out` in PPM format, P6 sub-format
/// (binary 8-bits-per-channel RGB).
///
/// # Errors
/// Returns [`std::io::Error`] if an error occurs while writing.
pub fn write_ppm(mut out: impl Write, data: &Buf2<Color3>) -> io::Result<()> {
    Header {
        format: Format::BinaryPixmap,
        width: data.width(),
        height: data.height(),
    }
    .write(&mut out)?;

    data.iter().try_for_each(|c| out.write_all(&c.0))
}

/// Writes a depth or height map to a file in PGM format, P5 sub-format
/// (binary 8-bit grayscale). See [`write_pgm`] for the value mapping.
///
/// Caution: This function overwrites the file if it already exists.
///
/// # Errors
/// Returns [`std::io::Error`] if an error occurs while writing.
pub fn save_pgm(path: impl AsRef<Path>, data: &Buf2<f64>) -> io::Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    write_pgm(&mut out, data)?;
    out.flush()
}

/// Writes a depth or height map to `out` in PGM format, P5 sub-format.
///
/// The range of finite values is stretched to gray levels 1..=255,
/// lowest value darkest. Non-finite values ("no surface") are black.
///
/// # Errors
/// Returns [`std::io::Error`] if an error occurs while writing.
pub fn write_pgm(mut out: impl Write, data: &Buf2<f64>) -> io::Result<()> {
    Header {
        format: Format::BinaryGraymap,
        width: data.width(),
        height: data.height(),
    }
    .write(&mut out)?;

    let levels = to_gray_levels(data);
    out.write_all(levels.data())
}

/// Maps finite values of `data` to gray levels 1..=255 and the rest to 0.
pub fn to_gray_levels(data: &Buf2<f64>) -> Buf2<u8> {
    let (lo, hi) = data
        .iter()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    let range = hi - lo;
    data.map(|&v| match v {
        v if !v.is_finite() => 0,
        _ if range <= 0.0 => 255,
        v => 1 + ((v - lo) / range * 254.0).round() as u8,
    })
}

#[cfg(test)]
mod tests {
    use std::vec::Vec;

    use crate::math::color::rgb;

    use super::*;

    #[test]
    fn write_header() {
        let mut out = Vec::new();
        let hdr = Header {
            format: Format::BinaryPixmap,
            width: 16,
            height: 32,
        };
        hdr.write(&mut out).unwrap();
        assert_eq!(&out, b"P6 16 32 255\n");
    }

    #[test]
    fn write_ppm_pixels() {
        let buf = Buf2::new((2, 1), [rgb(1, 2, 3), rgb(4, 5, 6)]);
        let mut out = Vec::new();
        write_ppm(&mut out, &buf).unwrap();
        assert_eq!(&out, b"P6 2 1 255\n\x01\x02\x03\x04\x05\x06");
    }

    #[test]
    fn gray_levels_stretch_finite_range() {
        let buf = Buf2::new((4, 1), [2.0, f64::INFINITY, 4.0, 3.0]);
        let levels = to_gray_levels(&buf);
        assert_eq!(levels.data(), &[1, 0, 255, 128]);
    }

    #[test]
    fn gray_levels_of_constant_map() {
        let buf = Buf2::new((2, 1), [5.0, f64::NEG_INFINITY]);
        assert_eq!(to_gray_levels(&buf).data(), &[255, 0]);
    }

    #[test]
    fn write_pgm_pixels() {
        let buf = Buf2::new((2, 1), [0.0, 1.0]);
        let mut out = Vec::new();
        write_pgm(&mut out, &buf).unwrap();
        assert_eq!(&out, b"P5 2 1 255\n\x01\xFF");
    }
}
