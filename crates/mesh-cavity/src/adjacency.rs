//! Edge incidence queries over indexed faces.

use hashbrown::HashMap;

/// An undirected edge between two vertex indices, stored as `(min, max)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeKey(pub u32, pub u32);

impl EdgeKey {
    /// Canonical key for the edge between `a` and `b`.
    #[inline]
    pub fn new(a: u32, b: u32) -> Self {
        if a < b {
            Self(a, b)
        } else {
            Self(b, a)
        }
    }
}

/// The three directed edges of a face in winding order.
#[inline]
pub fn face_edges(&[v0, v1, v2]: &[u32; 3]) -> [(u32, u32); 3] {
    [(v0, v1), (v1, v2), (v2, v0)]
}

/// Edge-to-face incidence for a face list.
///
/// Lighter than a half-edge structure: it only answers how many faces touch
/// each undirected edge, which is all the watertightness and manifold checks
/// need.
#[derive(Debug, Clone, Default)]
pub struct MeshAdjacency {
    /// Maps canonical edge → face indices that use it.
    pub edge_to_faces: HashMap<EdgeKey, Vec<u32>>,
}

impl MeshAdjacency {
    /// Build adjacency from a face list.
    pub fn build(faces: &[[u32; 3]]) -> Self {
        let mut edge_to_faces: HashMap<EdgeKey, Vec<u32>> = HashMap::with_capacity(faces.len() * 3 / 2);

        for (face_idx, face) in faces.iter().enumerate() {
            for (a, b) in face_edges(face) {
                edge_to_faces
                    .entry(EdgeKey::new(a, b))
                    .or_default()
                    .push(face_idx as u32);
            }
        }

        Self { edge_to_faces }
    }

    /// Number of distinct undirected edges.
    #[inline]
    pub fn edge_count(&self) -> usize {
        self.edge_to_faces.len()
    }

    /// Count boundary edges.
    pub fn boundary_edge_count(&self) -> usize {
        self.edge_to_faces
            .values()
            .filter(|faces| faces.len() == 1)
            .count()
    }

    /// Count non-manifold edges.
    pub fn non_manifold_edge_count(&self) -> usize {
        self.edge_to_faces
            .values()
            .filter(|faces| faces.len() > 2)
            .count()
    }
}
