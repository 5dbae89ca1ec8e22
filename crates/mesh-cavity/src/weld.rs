//! Exact-coordinate vertex merging.
//!
//! Two positions are the same vertex only when all three coordinates are
//! bit-identical. There is no distance tolerance: `0.0` and `-0.0` are
//! distinct, and so are two positions one ulp apart.

use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

use hashbrown::HashMap;
use nalgebra::Point3;

/// Map key for a vertex position.
///
/// Equality and hashing follow the bit patterns of the coordinates. Ordering is
/// lexicographic over `(x, y, z)` using [`f64::total_cmp`], which is a total
/// order and agrees with the bitwise equality.
#[derive(Debug, Clone, Copy)]
pub struct VertexKey([f64; 3]);

impl VertexKey {
    /// Key for a position.
    #[inline]
    pub fn new(p: &Point3<f64>) -> Self {
        Self([p.x, p.y, p.z])
    }

    #[inline]
    fn bits(&self) -> [u64; 3] {
        [self.0[0].to_bits(), self.0[1].to_bits(), self.0[2].to_bits()]
    }
}

impl PartialEq for VertexKey {
    fn eq(&self, other: &Self) -> bool {
        self.bits() == other.bits()
    }
}

impl Eq for VertexKey {}

impl Hash for VertexKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.bits().hash(state);
    }
}

impl PartialOrd for VertexKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for VertexKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0[0]
            .total_cmp(&other.0[0])
            .then_with(|| self.0[1].total_cmp(&other.0[1]))
            .then_with(|| self.0[2].total_cmp(&other.0[2]))
    }
}

/// Builds a deduplicated vertex table, handing out slots in first-seen order.
#[derive(Debug, Default)]
pub struct VertexWelder {
    vertices: Vec<Point3<f64>>,
    lookup: HashMap<VertexKey, u32>,
}

impl VertexWelder {
    /// Create an empty welder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a welder sized for roughly `vertex_refs` lookups.
    pub fn with_capacity(vertex_refs: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertex_refs),
            lookup: HashMap::with_capacity(vertex_refs),
        }
    }

    /// Index of `p` in the table, inserting it if unseen.
    pub fn index_of(&mut self, p: &Point3<f64>) -> u32 {
        let next = self.vertices.len() as u32;
        let idx = *self.lookup.entry(VertexKey::new(p)).or_insert(next);
        if idx == next {
            self.vertices.push(*p);
        }
        idx
    }

    /// Number of unique vertices seen so far.
    #[inline]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Check if no vertex has been inserted.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Position stored at `idx`.
    #[inline]
    pub fn position(&self, idx: u32) -> Point3<f64> {
        self.vertices[idx as usize]
    }

    /// Consume the welder and return the vertex table.
    pub fn into_vertices(self) -> Vec<Point3<f64>> {
        self.vertices
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordering_is_lexicographic() {
        let a = VertexKey::new(&Point3::new(0.0, 0.0, 0.0));
        let b = VertexKey::new(&Point3::new(1.0, 0.0, 0.0));
        let c = VertexKey::new(&Point3::new(0.0, 1.0, 0.0));

        assert!(a < b);
        assert!(a < c);
        assert!(!(b < c));
        assert!(!(a < a));
    }

    #[test]
    fn test_equality_is_bitwise() {
        let pos = VertexKey::new(&Point3::new(0.0, 1.0, 2.0));
        let neg = VertexKey::new(&Point3::new(-0.0, 1.0, 2.0));
        assert_ne!(pos, neg);
        assert_ne!(pos.cmp(&neg), Ordering::Equal);

        let next = f64::from_bits(1.0f64.to_bits() + 1);
        let nudged = VertexKey::new(&Point3::new(0.0, next, 2.0));
        assert_ne!(pos, nudged);
    }

    #[test]
    fn test_welder_assigns_first_seen_slots() {
        let mut welder = VertexWelder::new();
        let a = Point3::new(3.0, 0.0, 0.0);
        let b = Point3::new(0.0, 3.0, 0.0);

        assert_eq!(welder.index_of(&a), 0);
        assert_eq!(welder.index_of(&b), 1);
        assert_eq!(welder.index_of(&a), 0);
        assert_eq!(welder.len(), 2);
        assert_eq!(welder.position(1), b);
        assert_eq!(welder.into_vertices(), vec![a, b]);
    }
}
