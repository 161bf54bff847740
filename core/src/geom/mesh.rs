//! Polygon meshes.

use alloc::vec::Vec;
use core::fmt::{self, Debug, Formatter};

use crate::math::point::Point3;
use crate::render::{Error, TexCoord, World};

use super::{Polygon, Tri};

/// A polygon mesh.
///
/// An object made of flat polygonal faces, each face a list of indices to
/// the shared `verts` vector. Faces may have any number of corners, but the
/// renderer only accepts meshes whose faces are all triangles; see
/// [`Mesh::triangles`].
#[derive(Clone, Default, PartialEq)]
pub struct Mesh {
    /// The vertex positions of the mesh.
    pub verts: Vec<Point3<World>>,
    /// The faces of the mesh, each a polygon of indices to `verts`.
    /// Several faces can share a vertex.
    pub faces: Vec<Polygon<usize>>,
    /// Texture coordinates, either empty or one polygon per face with one
    /// coordinate per face corner. A vertex may thus have a different
    /// texture coordinate on each face it belongs to.
    pub tex_coords: Vec<Polygon<TexCoord>>,
}

/// Incremental mesh builder.
#[derive(Clone, Debug, Default)]
pub struct Builder {
    m: Mesh,
}

impl Mesh {
    /// Creates a new mesh with the given faces and vertices.
    ///
    /// Each face in `faces` is a polygon of indices, referring to the
    /// vertices in `verts` that define that face.
    ///
    /// # Examples
    /// ```
    /// use meshcast_core::geom::Mesh;
    /// use meshcast_core::math::pt3;
    ///
    /// let verts = [
    ///     pt3(0.0, 0.0, 0.0),
    ///     pt3(1.0, 0.0, 0.0),
    ///     pt3(1.0, 1.0, 0.0),
    ///     pt3(0.0, 1.0, 0.0),
    /// ];
    /// // A unit square made of two triangles
    /// let square = Mesh::new([[0, 1, 2], [0, 2, 3]], verts);
    /// assert_eq!(square.regularity(), Some(3));
    /// ```
    /// # Panics
    /// If any of the vertex indices in `faces` ≥ `verts.len()`.
    pub fn new<F, V>(faces: F, verts: V) -> Self
    where
        F: IntoIterator,
        F::Item: Into<Polygon<usize>>,
        V: IntoIterator<Item = Point3<World>>,
    {
        let faces: Vec<_> = faces.into_iter().map(Into::into).collect();
        let verts: Vec<_> = verts.into_iter().collect();

        for (i, Polygon(vs)) in faces.iter().enumerate() {
            assert!(
                vs.iter().all(|&j| j < verts.len()),
                "vertex index out of bounds at faces[{i}]: {vs:?}"
            )
        }
        Self { verts, faces, tex_coords: Vec::new() }
    }

    /// Returns a new mesh builder.
    pub fn builder() -> Builder {
        Builder::default()
    }

    /// Returns `self` with per-corner texture coordinates attached.
    ///
    /// # Panics
    /// If the number of texture polygons differs from the number of faces,
    /// or if any face and its texture polygon differ in degree.
    pub fn with_tex_coords<T>(mut self, tex_coords: T) -> Self
    where
        T: IntoIterator,
        T::Item: Into<Polygon<TexCoord>>,
    {
        let tcs: Vec<_> = tex_coords.into_iter().map(Into::into).collect();
        assert_eq!(
            tcs.len(),
            self.faces.len(),
            "texture coordinates must be given for every face"
        );
        for (i, (f, tc)) in self.faces.iter().zip(&tcs).enumerate() {
            assert_eq!(
                f.degree(),
                tc.degree(),
                "face {i} and its texture coordinates differ in degree"
            );
        }
        self.tex_coords = tcs;
        self
    }

    /// Returns whether `self` has texture coordinates for every face.
    pub fn has_tex_coords(&self) -> bool {
        self.tex_coords.len() == self.faces.len()
    }

    /// Returns `Some(n)` if every face of `self` has exactly `n` corners,
    /// `None` if the degrees vary or there are no faces.
    pub fn regularity(&self) -> Option<usize> {
        let n = self.faces.first()?.degree();
        self.faces.iter().all(|f| f.degree() == n).then_some(n)
    }

    /// Returns the faces of `self` as triangles.
    ///
    /// # Errors
    /// [`Error::NotTriangular`] naming the first face that is not a triangle.
    pub fn triangles(&self) -> Result<Vec<Tri<usize>>, Error> {
        self.faces
            .iter()
            .enumerate()
            .map(|(face, f)| {
                f.as_tri()
                    .ok_or(Error::NotTriangular { face, degree: f.degree() })
            })
            .collect()
    }

    /// Returns the per-corner texture coordinates of each triangle.
    ///
    /// # Errors
    /// [`Error::MissingTexCoords`] if `self` has no texture coordinates, or
    /// [`Error::NotTriangular`] if any face is not a triangle.
    pub fn tri_tex_coords(&self) -> Result<Vec<Tri<TexCoord>>, Error> {
        if !self.has_tex_coords() {
            return Err(Error::MissingTexCoords);
        }
        self.tex_coords
            .iter()
            .enumerate()
            .map(|(face, tc)| {
                tc.as_tri()
                    .ok_or(Error::NotTriangular { face, degree: tc.degree() })
            })
            .collect()
    }

    /// Returns the vertex positions of triangle `tri`.
    ///
    /// # Panics
    /// If any index in `tri` is out of bounds.
    #[inline]
    pub fn positions(&self, tri: &Tri<usize>) -> Tri<Point3<World>> {
        tri.map(|i| self.verts[i])
    }
}

impl Builder {
    /// Appends a face with the given vertex indices.
    pub fn push_face(&mut self, face: impl Into<Polygon<usize>>) {
        self.m.faces.push(face.into());
    }

    /// Appends all the faces yielded by the given iterator.
    pub fn push_faces<Fs>(&mut self, faces: Fs)
    where
        Fs: IntoIterator,
        Fs::Item: Into<Polygon<usize>>,
    {
        self.m.faces.extend(faces.into_iter().map(Into::into));
    }

    /// Appends a vertex with the given position.
    pub fn push_vert(&mut self, pos: Point3<World>) {
        self.m.verts.push(pos);
    }

    /// Appends the texture coordinates of the next face.
    pub fn push_tex_coords(&mut self, tc: impl Into<Polygon<TexCoord>>) {
        self.m.tex_coords.push(tc.into());
    }

    /// Returns the finished mesh containing all the added faces and vertices.
    ///
    /// Texture coordinates are kept only if given for every face.
    ///
    /// # Panics
    /// If any of the vertex indices in `faces` ≥ `verts.len()`.
    pub fn build(self) -> Mesh {
        let Mesh { verts, faces, tex_coords } = self.m;
        // Sanity checks done by new() and with_tex_coords()
        let m = Mesh::new(faces, verts);
        if !tex_coords.is_empty() && tex_coords.len() == m.faces.len() {
            m.with_tex_coords(tex_coords)
        } else {
            m
        }
    }
}

impl Debug for Mesh {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mesh")
            .field("verts", &self.verts.len())
            .field("faces", &self.faces.len())
            .field("regularity", &self.regularity())
            .field("tex_coords", &self.has_tex_coords())
            .finish()
    }
}
