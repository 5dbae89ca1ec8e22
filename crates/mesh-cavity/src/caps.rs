//! Boundary loop detection and fan capping for a facet subset.
//!
//! A subset of an otherwise closed surface is usually open wherever the
//! subset meets the facets it left out. The open rims are traced into loops
//! and each loop is closed with a fan of triangles around its centroid.

use std::collections::BTreeMap;

use hashbrown::HashMap;
use nalgebra::{Point3, Vector3};
use tracing::{debug, info, warn};

use crate::adjacency::{face_edges, EdgeKey};
use crate::mesh::IndexedMesh;
use crate::types::{Facet, Triangle, TriangleSoup, DEGENERATE_EPSILON};

/// A facet subset followed by the caps that close it.
#[derive(Debug, Clone, Default)]
pub struct CappedSoup {
    /// Subset facets first, in subset order, then every cap facet.
    pub soup: TriangleSoup,

    /// Number of leading facets that came from the subset.
    pub original_count: usize,
}

impl CappedSoup {
    /// Number of cap facets appended after the subset.
    #[inline]
    pub fn cap_count(&self) -> usize {
        self.soup.len() - self.original_count
    }

    /// The cap facets.
    pub fn caps(&self) -> &[Facet] {
        &self.soup.facets[self.original_count..]
    }
}

/// A rim edge, directed the way its only owner traverses it.
#[derive(Debug, Clone, Copy)]
struct BoundaryEdge {
    from: u32,
    to: u32,
    owner: usize,
}

/// Close every open rim of `subset` with cap facets.
///
/// Subset indices that are out of range for `mesh` are ignored. Subset facets
/// are copied with geometry normals. Each cap is wound to agree with the
/// facet that owned the rim edge it sits on.
pub fn add_caps(mesh: &IndexedMesh, subset: &[usize]) -> CappedSoup {
    let faces: Vec<usize> = subset
        .iter()
        .copied()
        .filter(|&i| i < mesh.face_count())
        .collect();

    if faces.len() < subset.len() {
        debug!(
            "Ignoring {} out-of-range subset indices",
            subset.len() - faces.len()
        );
    }

    let mut soup: TriangleSoup = faces.iter().map(|&i| mesh.facet(i)).collect();
    let original_count = soup.len();

    let boundary = find_boundary_edges(mesh, &faces);
    if boundary.is_empty() {
        debug!("Subset of {} facets has no open rim", original_count);
        return CappedSoup {
            soup,
            original_count,
        };
    }
    debug!("Found {} boundary edges", boundary.len());

    let loops = trace_loops(&boundary);
    for edge_ids in &loops {
        cap_loop(mesh, &boundary, edge_ids, &mut soup);
    }

    let capped = CappedSoup {
        soup,
        original_count,
    };
    info!(
        "Capped {} boundary loops with {} facets",
        loops.len(),
        capped.cap_count()
    );
    capped
}

/// Directed edges used by exactly one facet of the subset, in ascending
/// [`EdgeKey`] order.
fn find_boundary_edges(mesh: &IndexedMesh, faces: &[usize]) -> Vec<BoundaryEdge> {
    let mut occurrences: BTreeMap<EdgeKey, Vec<BoundaryEdge>> = BTreeMap::new();

    for &owner in faces {
        for (from, to) in face_edges(&mesh.faces()[owner]) {
            occurrences
                .entry(EdgeKey::new(from, to))
                .or_default()
                .push(BoundaryEdge { from, to, owner });
        }
    }

    occurrences
        .into_values()
        .filter_map(|edges| match edges.as_slice() {
            [only] => Some(*only),
            _ => None,
        })
        .collect()
}

/// Walk the boundary edges into closed loops, returned as edge id lists.
///
/// Each edge is consumed at most once. A walk that returns to a vertex already
/// on its path splits off the enclosed sub-loop and carries on. A walk that
/// runs out of successors is abandoned and its edges stay consumed.
fn trace_loops(edges: &[BoundaryEdge]) -> Vec<Vec<usize>> {
    let mut successors: HashMap<u32, Vec<usize>> = HashMap::new();
    for (id, edge) in edges.iter().enumerate() {
        successors.entry(edge.from).or_default().push(id);
    }

    let mut used = vec![false; edges.len()];
    let mut loops = Vec::new();
    let mut aborted = 0usize;

    for start in 0..edges.len() {
        if used[start] {
            continue;
        }
        used[start] = true;

        let origin = edges[start].from;
        let mut path_vertices = vec![origin];
        let mut path_edges = vec![start];
        let mut current = edges[start].to;

        loop {
            if current == origin {
                loops.push(path_edges);
                break;
            }

            if let Some(pos) = path_vertices.iter().position(|&v| v == current) {
                debug!(
                    "Splitting sub-loop of {} edges at vertex {}",
                    path_edges.len() - pos,
                    current
                );
                loops.push(path_edges.split_off(pos));
                path_vertices.truncate(pos);
            }

            let next = successors
                .get(&current)
                .and_then(|ids| ids.iter().copied().find(|&id| !used[id]));

            let Some(next) = next else {
                aborted += 1;
                break;
            };

            used[next] = true;
            path_vertices.push(current);
            path_edges.push(next);
            current = edges[next].to;
        }
    }

    if aborted > 0 {
        warn!(
            "Abandoned {} boundary walks that did not close into a loop",
            aborted
        );
    }

    loops
}

/// Fan-triangulate one loop around its vertex centroid.
fn cap_loop(
    mesh: &IndexedMesh,
    edges: &[BoundaryEdge],
    edge_ids: &[usize],
    out: &mut TriangleSoup,
) {
    if edge_ids.len() < 3 {
        debug!("Skipping boundary loop with {} edges", edge_ids.len());
        return;
    }

    let vertices = mesh.vertices();
    let sum = edge_ids
        .iter()
        .fold(Vector3::zeros(), |acc, &id| acc + vertices[edges[id].from as usize].coords);
    let center = Point3::from(sum / edge_ids.len() as f64);

    for &id in edge_ids {
        let edge = edges[id];
        let a = vertices[edge.from as usize];
        let b = vertices[edge.to as usize];

        let tri = Triangle::new(center, a, b);
        if tri.is_degenerate(DEGENERATE_EPSILON) {
            continue;
        }
        let cap = Facet::from_triangle(tri);

        let owner_normal = mesh.triangle(edge.owner).normal().unwrap_or_else(Vector3::zeros);
        if cap.normal.dot(&owner_normal) >= 0.0 {
            out.push(cap);
        } else {
            out.push(cap.flipped());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::check_watertight;

    fn single_triangle() -> IndexedMesh {
        IndexedMesh::from_indexed(
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
            ],
            vec![[0, 1, 2]],
        )
    }

    /// Two triangles touching at vertex 1 only.
    fn bowtie() -> IndexedMesh {
        IndexedMesh::from_indexed(
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(2.0, -1.0, 0.0),
                Point3::new(0.5, 1.0, 0.0),
                Point3::new(2.0, 1.0, 0.0),
            ],
            vec![[0, 1, 3], [1, 2, 4]],
        )
    }

    #[test]
    fn test_single_triangle_gets_three_caps() {
        let mesh = single_triangle();
        let capped = add_caps(&mesh, &[0]);

        assert_eq!(capped.original_count, 1);
        assert_eq!(capped.cap_count(), 3);
        assert_eq!(capped.soup.len(), 4);

        let report = check_watertight(&IndexedMesh::build(&capped.soup));
        assert!(report.is_watertight);
    }

    #[test]
    fn test_caps_follow_owner_orientation() {
        let mesh = single_triangle();
        let capped = add_caps(&mesh, &[0]);
        for cap in capped.caps() {
            assert!(cap.normal.z > 0.0);
            let geometric = cap.triangle().normal().expect("non-degenerate cap");
            assert!(geometric.dot(&cap.normal) > 0.999);
        }
    }

    #[test]
    fn test_closed_subset_needs_no_caps() {
        let mesh = IndexedMesh::from_indexed(
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
                Point3::new(0.0, 0.0, 1.0),
            ],
            vec![[0, 2, 1], [0, 1, 3], [0, 3, 2], [1, 2, 3]],
        );
        let capped = add_caps(&mesh, &[0, 1, 2, 3]);
        assert_eq!(capped.cap_count(), 0);
        assert_eq!(capped.soup.len(), 4);
    }

    #[test]
    fn test_pinched_rim_splits_into_two_loops() {
        // Tracing starts on 0->1 and reaches the pinch vertex 1, whose first
        // unused successor leads around the second triangle and back to 1.
        let mesh = bowtie();
        let capped = add_caps(&mesh, &[0, 1]);
        assert_eq!(capped.cap_count(), 6);

        let report = check_watertight(&IndexedMesh::build(&capped.soup));
        assert_eq!(report.boundary_edges, 0);
    }

    #[test]
    fn test_dead_end_walks_cap_nothing() {
        // Both triangles run 0->1, so the shared edge is not a rim edge and
        // the remaining rim edges cannot be chained head to tail.
        let mesh = IndexedMesh::from_indexed(
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(0.5, 1.0, 0.0),
                Point3::new(0.5, -1.0, 0.0),
            ],
            vec![[0, 1, 2], [0, 1, 3]],
        );
        let capped = add_caps(&mesh, &[0, 1]);
        assert_eq!(capped.cap_count(), 0);
        assert_eq!(capped.original_count, 2);
    }

    #[test]
    fn test_out_of_range_subset_is_ignored() {
        let mesh = single_triangle();
        let capped = add_caps(&mesh, &[0, 7]);
        assert_eq!(capped.original_count, 1);
        assert_eq!(capped.cap_count(), 3);
    }

    #[test]
    fn test_empty_subset() {
        let mesh = single_triangle();
        let capped = add_caps(&mesh, &[]);
        assert!(capped.soup.is_empty());
        assert_eq!(capped.cap_count(), 0);
    }
}
