//! Indexed triangle mesh built from a facet soup.

use nalgebra::{Point3, Vector3};
use tracing::debug;

use crate::intersect::{ray_triangle_intersect, RAY_EPSILON};
use crate::types::{Facet, Triangle, TriangleSoup};
use crate::weld::VertexWelder;

/// A triangle mesh with a shared vertex table.
///
/// Built once from a [`TriangleSoup`] and never mutated afterwards; derived
/// meshes (translated, cleaned) are new values. Each triangle keeps the normal
/// it carried in the source soup so winding can be audited against it later.
#[derive(Debug, Clone, Default)]
pub struct IndexedMesh {
    vertices: Vec<Point3<f64>>,
    faces: Vec<[u32; 3]>,
    original_normals: Vec<Vector3<f64>>,
    dropped_degenerate: usize,
}

impl IndexedMesh {
    /// Index a soup by merging bit-identical vertex positions.
    ///
    /// Vertex slots follow first appearance. A facet whose corners collapse
    /// onto a repeated index is dropped along with its stored normal.
    pub fn build(soup: &TriangleSoup) -> Self {
        let mut welder = VertexWelder::with_capacity(soup.len() * 3);
        let mut faces = Vec::with_capacity(soup.len());
        let mut original_normals = Vec::with_capacity(soup.len());
        let mut dropped_degenerate = 0;

        for facet in soup {
            let face = [
                welder.index_of(&facet.v0),
                welder.index_of(&facet.v1),
                welder.index_of(&facet.v2),
            ];

            if face[0] == face[1] || face[1] == face[2] || face[0] == face[2] {
                dropped_degenerate += 1;
                continue;
            }

            faces.push(face);
            original_normals.push(facet.normal);
        }

        if dropped_degenerate > 0 {
            debug!(
                "Dropped {} triangles with repeated vertex indices",
                dropped_degenerate
            );
        }

        let vertices = welder.into_vertices();
        debug!(
            "Indexed mesh: {} vertices, {} faces from {} facets",
            vertices.len(),
            faces.len(),
            soup.len()
        );

        Self {
            vertices,
            faces,
            original_normals,
            dropped_degenerate,
        }
    }

    /// Wrap an existing vertex table and face list.
    ///
    /// Faces that repeat an index are dropped. Original normals are taken from
    /// face geometry. Panics if a face references a vertex out of range.
    pub fn from_indexed(vertices: Vec<Point3<f64>>, faces: Vec<[u32; 3]>) -> Self {
        let total = faces.len();
        let faces: Vec<[u32; 3]> = faces
            .into_iter()
            .filter(|f| f[0] != f[1] && f[1] != f[2] && f[0] != f[2])
            .collect();
        let dropped_degenerate = total - faces.len();

        let mut mesh = Self {
            vertices,
            faces,
            original_normals: Vec::new(),
            dropped_degenerate,
        };
        mesh.original_normals = mesh
            .triangles()
            .map(|tri| tri.normal().unwrap_or_else(Vector3::zeros))
            .collect();
        mesh
    }

    /// Unique vertex positions in slot order.
    #[inline]
    pub fn vertices(&self) -> &[Point3<f64>] {
        &self.vertices
    }

    /// Index triples in input order.
    #[inline]
    pub fn faces(&self) -> &[[u32; 3]] {
        &self.faces
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// Facets discarded during [`build`](Self::build) because two corners
    /// welded to the same vertex.
    #[inline]
    pub fn dropped_degenerate(&self) -> usize {
        self.dropped_degenerate
    }

    /// Geometry of face `i`. Panics if `i` is out of range.
    #[inline]
    pub fn triangle(&self, i: usize) -> Triangle {
        let [a, b, c] = self.faces[i];
        Triangle::new(
            self.vertices[a as usize],
            self.vertices[b as usize],
            self.vertices[c as usize],
        )
    }

    /// Face `i` as a facet with its geometry normal.
    #[inline]
    pub fn facet(&self, i: usize) -> Facet {
        Facet::from_triangle(self.triangle(i))
    }

    /// Iterate over face geometry in order.
    pub fn triangles(&self) -> impl ExactSizeIterator<Item = Triangle> + '_ {
        (0..self.faces.len()).map(move |i| self.triangle(i))
    }

    /// Normal that face `i` carried in the source soup.
    #[inline]
    pub fn original_normal(&self, i: usize) -> Vector3<f64> {
        self.original_normals[i]
    }

    /// Signed enclosed volume by the divergence theorem.
    ///
    /// Positive when faces wind counter-clockwise seen from outside.
    pub fn signed_volume(&self) -> f64 {
        self.triangles().map(|tri| tri.signed_volume()).sum()
    }

    /// Absolute enclosed volume.
    #[inline]
    pub fn volume(&self) -> f64 {
        self.signed_volume().abs()
    }

    /// A copy of this mesh with every vertex moved by `offset`.
    #[must_use]
    pub fn translated(&self, offset: Vector3<f64>) -> Self {
        Self {
            vertices: self.vertices.iter().map(|v| v + offset).collect(),
            faces: self.faces.clone(),
            original_normals: self.original_normals.clone(),
            dropped_degenerate: self.dropped_degenerate,
        }
    }

    /// Expand back to a soup, one facet per face with geometry normals.
    pub fn to_soup(&self) -> TriangleSoup {
        (0..self.faces.len()).map(|i| self.facet(i)).collect()
    }

    /// Distance along `direction` at which a ray from `origin` hits face `i`.
    #[inline]
    pub fn ray_intersect(
        &self,
        face: usize,
        origin: &Point3<f64>,
        direction: &Vector3<f64>,
    ) -> Option<f64> {
        ray_triangle_intersect(origin, direction, &self.triangle(face), RAY_EPSILON)
    }
}
