//! Core geometric data types: triangles, facets and triangle soups.

use nalgebra::{Point3, Vector3};

/// Cross-product length at or below which a triangle counts as zero-area.
pub const DEGENERATE_EPSILON: f64 = 1e-10;

/// A triangle with concrete vertex positions.
///
/// Utility type for geometric calculations. Winding is counter-clockwise
/// when viewed from the front (normal points toward viewer).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    pub v0: Point3<f64>,
    pub v1: Point3<f64>,
    pub v2: Point3<f64>,
}

impl Triangle {
    /// Create a new triangle from three points.
    #[inline]
    pub fn new(v0: Point3<f64>, v1: Point3<f64>, v2: Point3<f64>) -> Self {
        Self { v0, v1, v2 }
    }

    /// Compute the (unnormalized) face normal via cross product.
    /// The direction follows the right-hand rule with CCW winding.
    #[inline]
    pub fn normal_unnormalized(&self) -> Vector3<f64> {
        let e1 = self.v1 - self.v0;
        let e2 = self.v2 - self.v0;
        e1.cross(&e2)
    }

    /// Compute the unit face normal.
    /// Returns None when the cross product has zero length.
    pub fn normal(&self) -> Option<Vector3<f64>> {
        let n = self.normal_unnormalized();
        let len = n.norm();
        if len > 0.0 {
            Some(n / len)
        } else {
            None
        }
    }

    /// Compute the centroid (center of mass).
    #[inline]
    pub fn centroid(&self) -> Point3<f64> {
        Point3::new(
            (self.v0.x + self.v1.x + self.v2.x) / 3.0,
            (self.v0.y + self.v1.y + self.v2.y) / 3.0,
            (self.v0.z + self.v1.z + self.v2.z) / 3.0,
        )
    }

    /// Check if the cross-product length is at or below `epsilon`.
    pub fn is_degenerate(&self, epsilon: f64) -> bool {
        self.normal_unnormalized().norm() <= epsilon
    }

    /// Signed volume of the tetrahedron spanned by the origin and this triangle.
    #[inline]
    pub fn signed_volume(&self) -> f64 {
        self.v0.coords.dot(&self.v1.coords.cross(&self.v2.coords)) / 6.0
    }
}

/// An unindexed triangle carrying its own facet normal.
///
/// The normal is whatever the producer supplied: the file's value for parsed
/// input, the geometric normal for facets reconstructed from an indexed mesh.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Facet {
    pub normal: Vector3<f64>,
    pub v0: Point3<f64>,
    pub v1: Point3<f64>,
    pub v2: Point3<f64>,
}

impl Facet {
    /// Create a facet from positions and a stored normal.
    #[inline]
    pub fn new(v0: Point3<f64>, v1: Point3<f64>, v2: Point3<f64>, normal: Vector3<f64>) -> Self {
        Self { normal, v0, v1, v2 }
    }

    /// Create a facet whose normal is derived from the triangle's winding.
    /// Degenerate triangles get a zero normal.
    pub fn from_triangle(tri: Triangle) -> Self {
        let normal = tri.normal().unwrap_or_else(Vector3::zeros);
        Self::new(tri.v0, tri.v1, tri.v2, normal)
    }

    /// Geometry of this facet.
    #[inline]
    pub fn triangle(&self) -> Triangle {
        Triangle::new(self.v0, self.v1, self.v2)
    }

    /// Positions in winding order.
    #[inline]
    pub fn positions(&self) -> [Point3<f64>; 3] {
        [self.v0, self.v1, self.v2]
    }

    /// Reverse the winding and the stored normal.
    #[must_use]
    pub fn flipped(&self) -> Self {
        Self::new(self.v0, self.v2, self.v1, -self.normal)
    }
}

/// An ordered, unindexed list of facets.
///
/// This is the shape exchanged with file readers and writers, and the shape
/// the capping and cleaning stages produce. Convert to an
/// [`IndexedMesh`](crate::IndexedMesh) with [`IndexedMesh::build`](crate::IndexedMesh::build).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TriangleSoup {
    pub facets: Vec<Facet>,
}

impl TriangleSoup {
    /// Create an empty soup.
    pub fn new() -> Self {
        Self { facets: Vec::new() }
    }

    /// Create a soup with pre-allocated capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            facets: Vec::with_capacity(capacity),
        }
    }

    /// Number of facets.
    #[inline]
    pub fn len(&self) -> usize {
        self.facets.len()
    }

    /// Check if the soup holds no facets.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.facets.is_empty()
    }

    /// Append a facet.
    #[inline]
    pub fn push(&mut self, facet: Facet) {
        self.facets.push(facet);
    }

    /// Iterate over facets in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Facet> {
        self.facets.iter()
    }
}

impl From<Vec<Facet>> for TriangleSoup {
    fn from(facets: Vec<Facet>) -> Self {
        Self { facets }
    }
}

impl FromIterator<Facet> for TriangleSoup {
    fn from_iter<I: IntoIterator<Item = Facet>>(iter: I) -> Self {
        Self {
            facets: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a TriangleSoup {
    type Item = &'a Facet;
    type IntoIter = std::slice::Iter<'a, Facet>;

    fn into_iter(self) -> Self::IntoIter {
        self.facets.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-10
    }

    #[test]
    fn test_triangle_normal() {
        let tri = Triangle::new(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        );

        let normal = tri.normal().expect("non-degenerate triangle");
        assert!(approx_eq(normal.x, 0.0));
        assert!(approx_eq(normal.y, 0.0));
        assert!(approx_eq(normal.z, 1.0));
    }

    #[test]
    fn test_triangle_centroid() {
        let tri = Triangle::new(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(3.0, 0.0, 0.0),
            Point3::new(0.0, 3.0, 0.0),
        );
        let c = tri.centroid();
        assert!(approx_eq(c.x, 1.0));
        assert!(approx_eq(c.y, 1.0));
        assert!(approx_eq(c.z, 0.0));
    }

    #[test]
    fn test_degenerate_triangle_normal() {
        let tri = Triangle::new(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
        );
        assert!(tri.normal().is_none());
        assert!(tri.is_degenerate(DEGENERATE_EPSILON));
    }

    #[test]
    fn test_unit_corner_signed_volume() {
        let tri = Triangle::new(
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(0.0, 0.0, 1.0),
        );
        assert!(approx_eq(tri.signed_volume(), 1.0 / 6.0));

        let reversed = Triangle::new(tri.v0, tri.v2, tri.v1);
        assert!(approx_eq(reversed.signed_volume(), -1.0 / 6.0));
    }

    #[test]
    fn test_facet_flip() {
        let facet = Facet::from_triangle(Triangle::new(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ));
        let flipped = facet.flipped();

        assert_eq!(flipped.v1, facet.v2);
        assert_eq!(flipped.v2, facet.v1);
        assert!(approx_eq(flipped.normal.z, -1.0));
        let geometric = flipped.triangle().normal().expect("non-degenerate");
        assert!(approx_eq(geometric.dot(&flipped.normal), 1.0));
    }

    #[test]
    fn test_degenerate_facet_gets_zero_normal() {
        let p = Point3::new(1.0, 1.0, 1.0);
        let facet = Facet::from_triangle(Triangle::new(p, p, Point3::new(2.0, 1.0, 1.0)));
        assert_eq!(facet.normal, Vector3::zeros());
    }

    #[test]
    fn test_soup_collects() {
        let tri = Triangle::new(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        );
        let soup: TriangleSoup = std::iter::repeat(Facet::from_triangle(tri)).take(3).collect();
        assert_eq!(soup.len(), 3);
        assert!(!soup.is_empty());
        assert!(TriangleSoup::new().is_empty());
    }
}
