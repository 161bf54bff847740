//! Reading colored point clouds.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use log::debug;

use mc::geom::PointCloud;
use mc::math::{pt3, rgb};

use crate::io::{Error, Result};

/// Loads a point cloud from the ASCII file at `path`.
///
/// See [`read_xyz`] for the format.
pub fn load_xyz(path: impl AsRef<Path>) -> Result<PointCloud> {
    let path = path.as_ref();
    let cloud = read_xyz(BufReader::new(File::open(path)?))?;
    debug!("loaded {} points from {}", cloud.len(), path.display());
    Ok(cloud)
}

/// Reads a point cloud in the ASCII `x y z r g b` format.
///
/// Each non-empty line holds the position of one point followed by its
/// color as three integers in `0..=255`, separated by whitespace or commas.
/// Lines starting with `#` are comments.
///
/// # Errors
/// [`Error::Io`] if reading fails, or [`Error::Parse`] if a line does not
/// hold exactly six valid fields.
pub fn read_xyz(input: impl BufRead) -> Result<PointCloud> {
    let mut points = vec![];
    for (i, line) in input.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let err = |msg| Error::Parse { line: i + 1, msg };

        let fields: Vec<_> = line
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|f| !f.is_empty())
            .collect();
        let &[x, y, z, r, g, b] = &fields[..] else {
            return Err(err(format!("expected 6 fields, got {}", fields.len())));
        };

        let coord = |s: &str| {
            s.parse::<f64>()
                .map_err(|e| err(format!("invalid coordinate '{s}': {e}")))
        };
        let channel = |s: &str| {
            s.parse::<u8>()
                .map_err(|e| err(format!("invalid color channel '{s}': {e}")))
        };
        let pos = pt3(coord(x)?, coord(y)?, coord(z)?);
        let col = rgb(channel(r)?, channel(g)?, channel(b)?);
        points.push((pos, col));
    }
    Ok(points.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_points() {
        let cloud = read_xyz(
            "# x y z r g b
            0.5 0.5 0.1 255 0 0

            5,5,5,0,0,255
            "
            .as_bytes(),
        )
        .unwrap();

        assert_eq!(cloud.len(), 2);
        assert_eq!(cloud.positions()[0], pt3(0.5, 0.5, 0.1));
        assert_eq!(cloud.colors(), [rgb(0xFF, 0, 0), rgb(0, 0, 0xFF)]);
    }

    #[test]
    fn malformed_lines_are_errors() {
        for (input, line) in [
            ("1 2 3 4 5", 1),
            ("1 2 3 4 5 6\n1 2 3 4 5 256", 2),
            ("1 2 x 4 5 6", 1),
            ("\n\n1 2 3 4 5 6 7", 3),
        ] {
            match read_xyz(input.as_bytes()) {
                Err(Error::Parse { line: l, .. }) => assert_eq!(l, line),
                other => panic!("expected parse error, got {other:?}"),
            }
        }
    }
}
