//! Wavefront OBJ and MTL input and output.

use std::fmt::Display;
use std::fs::File;
use std::io::{self as sio, BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use std::str::FromStr;

use log::{trace, warn};

use mc::geom::{Mesh, Polygon};
use mc::math::pt3;
use mc::render::{TexCoord, World, uv};

/// Name of the single material referenced by written OBJ files.
pub const MATERIAL: &str = "mat";

/// Material definition written by [`write_mtl`], followed by the name of
/// the diffuse texture file.
pub const MTL_TEMPLATE: &str = "newmtl mat\n\
    Ka 1.0 1.0 1.0\n\
    Kd 1.0 1.0 1.0\n\
    d 1\n\
    Ns 75\n\
    illum 1\n\
    map_Kd ";

/// Errors that can occur while reading meshes or point clouds.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Reading the input failed.
    #[error(transparent)]
    Io(#[from] sio::Error),

    /// The input is malformed.
    #[error("line {line}: {msg}")]
    Parse { line: usize, msg: String },
}

pub type Result<T> = std::result::Result<T, Error>;

/// Loads an OBJ mesh from the file at `path`.
///
/// See [`read_obj`] for details.
pub fn load_obj(path: impl AsRef<Path>) -> Result<Mesh> {
    read_obj(BufReader::new(File::open(path)?))
}

/// Reads a mesh in the Wavefront OBJ format.
///
/// Supports vertex positions (`v`), texture coordinates (`vt`), and faces
/// (`f`) of any degree ≥ 3 whose corners are written as `v`, `v/vt`,
/// `v/vt/vn`, or `v//vn`. Indices are one-based; negative indices count
/// back from the latest element. Normals, groups, materials, and other
/// statements are ignored.
///
/// Texture coordinates are kept only if every face corner has one;
/// otherwise they are dropped with a warning.
///
/// # Errors
/// [`Error::Io`] if reading fails, or [`Error::Parse`] on a malformed line,
/// including face indices that refer to undefined elements.
pub fn read_obj(input: impl BufRead) -> Result<Mesh> {
    let mut verts = vec![];
    let mut uvs = vec![];
    let mut faces = vec![];
    let mut face_uvs: Vec<Option<Polygon<TexCoord>>> = vec![];

    for (i, line) in input.lines().enumerate() {
        let line = line?;
        let num = i + 1;
        let err = |msg: String| Error::Parse { line: num, msg };

        let mut tokens = line.split_whitespace();
        let Some(kw) = tokens.next() else { continue };
        let args: Vec<_> = tokens.collect();

        match kw {
            "v" => {
                let [x, y, z] = parse_floats(&args).map_err(err)?;
                verts.push(pt3::<World>(x, y, z));
            }
            "vt" => {
                let [u, v] = parse_floats(&args).map_err(err)?;
                uvs.push(uv(u, v));
            }
            "f" => {
                if args.len() < 3 {
                    return Err(err(format!(
                        "face has {} vertices, expected at least 3",
                        args.len()
                    )));
                }
                let mut face = Vec::with_capacity(args.len());
                let mut tcs = Vec::with_capacity(args.len());
                for corner in &args {
                    let (v, vt) = parse_corner(corner, verts.len(), uvs.len())
                        .map_err(err)?;
                    face.push(v);
                    tcs.push(vt.map(|j| uvs[j]));
                }
                faces.push(Polygon(face));
                let tcs: Option<Vec<_>> = tcs.into_iter().collect();
                face_uvs.push(tcs.map(Polygon));
            }
            _ if kw.starts_with('#') => {}
            _ => trace!("ignoring OBJ statement '{kw}' on line {num}"),
        }
    }

    let mut mesh = Mesh::new(faces, verts);
    let tex_coords: Option<Vec<_>> = face_uvs.into_iter().collect();
    match tex_coords {
        Some(tcs) if !tcs.is_empty() => mesh = mesh.with_tex_coords(tcs),
        Some(_) => {}
        None if uvs.is_empty() => {}
        None => warn!("dropping texture coordinates: some corners have none"),
    }
    Ok(mesh)
}

/// Parses the first `N` arguments as floats, ignoring any further ones.
fn parse_floats<const N: usize>(
    args: &[&str],
) -> std::result::Result<[f64; N], String> {
    if args.len() < N {
        return Err(format!("expected {N} coordinates, got {}", args.len()));
    }
    let mut res = [0.0; N];
    for (r, a) in res.iter_mut().zip(args) {
        *r = parse(a)?;
    }
    Ok(res)
}

/// Parses a face corner into zero-based vertex and texture coordinate
/// indices, given the numbers of elements defined so far.
fn parse_corner(
    corner: &str,
    n_verts: usize,
    n_uvs: usize,
) -> std::result::Result<(usize, Option<usize>), String> {
    let mut parts = corner.split('/');
    let v = parts.next().unwrap_or_default();
    let v = resolve(parse(v)?, n_verts, "vertex")?;
    let vt = match parts.next() {
        None | Some("") => None,
        Some(vt) => Some(resolve(parse(vt)?, n_uvs, "texture coordinate")?),
    };
    Ok((v, vt))
}

/// Converts a one-based or negative OBJ index into a zero-based one.
fn resolve(
    idx: isize,
    len: usize,
    what: &str,
) -> std::result::Result<usize, String> {
    if idx == 0 {
        return Err(format!("{what} index 0 is not valid"));
    }
    let res = if idx > 0 {
        Some(idx.unsigned_abs() - 1)
    } else {
        len.checked_sub(idx.unsigned_abs())
    };
    res.filter(|&i| i < len)
        .ok_or_else(|| format!("{what} index {idx} out of range, {len} defined"))
}

fn parse<T: FromStr>(s: &str) -> std::result::Result<T, String>
where
    T::Err: Display,
{
    s.parse().map_err(|e| format!("invalid number '{s}': {e}"))
}

/// Saves `mesh` in the OBJ format to the file at `path`.
///
/// See [`write_obj`] for details.
pub fn save_obj(
    path: impl AsRef<Path>,
    mesh: &Mesh,
    mtllib: Option<&str>,
) -> sio::Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    write_obj(&mut out, mesh, mtllib)?;
    out.flush()
}

/// Writes `mesh` in the OBJ format to `out`.
///
/// If `mtllib` is given, the mesh references the material library of that
/// name and uses its [material][MATERIAL]. If the mesh has texture
/// coordinates, each face corner gets its own `vt` entry.
pub fn write_obj(
    mut out: impl Write,
    mesh: &Mesh,
    mtllib: Option<&str>,
) -> sio::Result<()> {
    if let Some(lib) = mtllib {
        writeln!(out, "mtllib {lib}")?;
    }
    for v in &mesh.verts {
        writeln!(out, "v {} {} {}", v.x(), v.y(), v.z())?;
    }
    for t in mesh.tex_coords.iter().flat_map(|tc| &tc.0) {
        writeln!(out, "vt {} {}", t.x(), t.y())?;
    }
    if mtllib.is_some() {
        writeln!(out, "usemtl {MATERIAL}")?;
    }

    let mut next_uv = 1;
    for Polygon(vs) in &mesh.faces {
        write!(out, "f")?;
        for v in vs {
            if mesh.has_tex_coords() {
                write!(out, " {}/{next_uv}", v + 1)?;
                next_uv += 1;
            } else {
                write!(out, " {}", v + 1)?;
            }
        }
        writeln!(out)?;
    }
    Ok(())
}

/// Saves the material library of a textured mesh to the file at `path`.
pub fn save_mtl(path: impl AsRef<Path>, texture: &str) -> sio::Result<()> {
    write_mtl(File::create(path)?, texture)
}

/// Writes a material library with a single [material][MATERIAL] whose
/// diffuse map is the image file `texture`.
pub fn write_mtl(mut out: impl Write, texture: &str) -> sio::Result<()> {
    writeln!(out, "{MTL_TEMPLATE}{texture}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read(s: &str) -> Result<Mesh> {
        read_obj(s.as_bytes())
    }

    #[test]
    fn read_triangles_and_quads() {
        let mesh = read(
            "# comment
            v 0.0 0.0 0.0
            v 1.0 0.0 0.0

            v 1.0 1.0 0.5
            v 0.0 1.0 0.0 1.0
            vn 0 0 1
            o square
            f 1 2 3
            f 1 2 3 4",
        )
        .unwrap();

        assert_eq!(mesh.verts.len(), 4);
        assert_eq!(mesh.verts[2], pt3(1.0, 1.0, 0.5));
        assert_eq!(
            mesh.faces,
            [Polygon(vec![0, 1, 2]), Polygon(vec![0, 1, 2, 3])]
        );
        assert!(!mesh.has_tex_coords());
    }

    #[test]
    fn read_corner_forms() {
        let mesh = read(
            "v 0 0 0\nv 1 0 0\nv 0 1 0
            vt 0 0\nvt 1 0\nvt 0 1
            vn 0 0 1
            f 1/1 2/2/1 3/3/1
            f -3/-3/-1 -2/-2 -1/-1",
        )
        .unwrap();

        assert_eq!(mesh.faces[1], Polygon(vec![0, 1, 2]));
        assert_eq!(
            mesh.tex_coords[0],
            Polygon(vec![uv(0.0, 0.0), uv(1.0, 0.0), uv(0.0, 1.0)])
        );
        assert_eq!(mesh.tex_coords[1], mesh.tex_coords[0]);
    }

    #[test]
    fn partial_tex_coords_are_dropped() {
        let mesh =
            read("v 0 0 0\nv 1 0 0\nv 0 1 0\nvt 0 0\nf 1/1 2/1 3/1\nf 1 2 3")
                .unwrap();
        assert_eq!(mesh.faces.len(), 2);
        assert!(!mesh.has_tex_coords());
    }

    #[test]
    fn malformed_lines_are_errors() {
        let cases = [
            ("v 0 0", 1),
            ("v 0 0 0\nv a 0 0", 2),
            ("v 0 0 0\nf 1 1", 2),
            ("v 0 0 0\nf 1 2 3", 2),
            ("v 0 0 0\nf 0 1 1", 2),
            ("v 0 0 0\nf -2 1 1", 2),
            ("v 0 0 0\nf 1/2 1/1 1/1", 2),
        ];
        for (input, line) in cases {
            match read(input) {
                Err(Error::Parse { line: l, .. }) => {
                    assert_eq!(l, line, "{input:?}")
                }
                other => panic!("expected parse error, got {other:?}"),
            }
        }
    }

    #[test]
    fn write_textured() {
        let mesh = Mesh::new(
            [[0, 1, 2]],
            [pt3(0.0, 0.0, 0.0), pt3(1.0, 0.0, 0.0), pt3(0.0, 1.5, 0.0)],
        )
        .with_tex_coords([[uv(0.0, 0.0), uv(0.5, 0.0), uv(0.0, 0.25)]]);

        let mut out = vec![];
        write_obj(&mut out, &mesh, Some("cube.mtl")).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "mtllib cube.mtl\n\
             v 0 0 0\nv 1 0 0\nv 0 1.5 0\n\
             vt 0 0\nvt 0.5 0\nvt 0 0.25\n\
             usemtl mat\n\
             f 1/1 2/2 3/3\n"
        );
    }

    #[test]
    fn write_untextured() {
        let mesh = Mesh::new([vec![0, 1, 2, 3]], [pt3(0.0, 0.0, 0.0); 4]);
        let mut out = vec![];
        write_obj(&mut out, &mesh, None).unwrap();
        let s = String::from_utf8(out).unwrap();
        assert!(s.ends_with("\nf 1 2 3 4\n"));
        assert!(!s.contains("mtllib"));
    }

    #[test]
    fn written_mesh_reads_back() {
        let mesh = Mesh::new(
            [[0, 1, 2], [0, 2, 3]],
            [
                pt3(-1.0, -1.0, 0.25),
                pt3(1.0, -1.0, 0.25),
                pt3(1.0, 1.0, 0.25),
                pt3(-1.0, 1.0, 0.25),
            ],
        )
        .with_tex_coords([
            [uv(0.1, 0.1), uv(0.4, 0.1), uv(0.4, 0.4)],
            [uv(0.6, 0.6), uv(0.9, 0.9), uv(0.6, 0.9)],
        ]);
        let mut out = vec![];
        write_obj(&mut out, &mesh, Some("m.mtl")).unwrap();
        assert_eq!(read_obj(&out[..]).unwrap(), mesh);
    }

    #[test]
    fn mtl_template() {
        let mut out = vec![];
        write_mtl(&mut out, "tex.ppm").unwrap();
        let s = String::from_utf8(out).unwrap();
        assert!(s.starts_with("newmtl mat\nKa 1.0 1.0 1.0\n"));
        assert!(s.ends_with("illum 1\nmap_Kd tex.ppm\n"));
    }
}
