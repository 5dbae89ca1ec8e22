//! Triangle soup cleanup: exact welding, duplicate and degenerate removal.

use std::fmt;

use hashbrown::HashSet;
use tracing::{debug, info, warn};

use crate::adjacency::MeshAdjacency;
use crate::types::{Facet, Triangle, TriangleSoup, DEGENERATE_EPSILON};
use crate::weld::VertexWelder;

/// What [`clean_mesh`] found and removed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct CleanReport {
    /// Facets whose vertex set matched an earlier surviving facet.
    pub duplicate_triangles_removed: usize,

    /// Three per input facet.
    pub vertex_refs_total: usize,

    /// Distinct positions among all input facets.
    pub unique_vertices: usize,

    /// Facets with two corners on the same position.
    pub degenerate_removed: usize,

    /// Facets with distinct corners but near-zero area.
    pub sliver_removed: usize,

    /// Edges shared by more than two surviving facets. Reported only.
    pub non_manifold_edge_count: usize,

    pub triangle_count_before: usize,
    pub triangle_count_after: usize,
}

impl CleanReport {
    /// Positions that were folded into an earlier identical one.
    pub fn merged_positions(&self) -> usize {
        self.vertex_refs_total - self.unique_vertices
    }
}

impl fmt::Display for CleanReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.triangle_count_before == 0 {
            return writeln!(f, "No triangles.");
        }

        writeln!(f, "Clean triangles report:")?;
        writeln!(
            f,
            "  Duplicate triangles removed: {}",
            self.duplicate_triangles_removed
        )?;
        writeln!(
            f,
            "  Vertices: {} refs -> {} unique (merged {} duplicate positions)",
            self.vertex_refs_total,
            self.unique_vertices,
            self.merged_positions()
        )?;
        writeln!(
            f,
            "  Degenerate triangles removed: {}",
            self.degenerate_removed
        )?;
        if self.sliver_removed > 0 {
            writeln!(f, "  Zero-area triangles removed: {}", self.sliver_removed)?;
        }
        if self.non_manifold_edge_count > 0 {
            writeln!(
                f,
                "  Non-manifold edges (shared by >2 triangles): {}",
                self.non_manifold_edge_count
            )?;
        }
        writeln!(
            f,
            "  Triangles before: {}  after: {}",
            self.triangle_count_before, self.triangle_count_after
        )
    }
}

/// Clean `soup` in place and report what was removed.
///
/// Survivors keep their input order and get freshly computed normals.
pub fn clean_mesh(soup: &mut TriangleSoup) -> CleanReport {
    let (cleaned, report) = clean_soup(soup);
    *soup = cleaned;
    report
}

/// Clean a copy of `soup`.
pub fn clean_soup(soup: &TriangleSoup) -> (TriangleSoup, CleanReport) {
    let before = soup.len();
    if before == 0 {
        debug!("Nothing to clean");
        return (TriangleSoup::new(), CleanReport::default());
    }

    let mut welder = VertexWelder::with_capacity(before * 3);
    let mut faces: Vec<[u32; 3]> = Vec::with_capacity(before);
    let mut degenerate_removed = 0;

    for facet in soup {
        let face = [
            welder.index_of(&facet.v0),
            welder.index_of(&facet.v1),
            welder.index_of(&facet.v2),
        ];
        if face[0] == face[1] || face[1] == face[2] || face[0] == face[2] {
            degenerate_removed += 1;
            continue;
        }
        faces.push(face);
    }

    let mut seen: HashSet<[u32; 3]> = HashSet::with_capacity(faces.len());
    let mut duplicate_triangles_removed = 0;
    faces.retain(|face| {
        let mut key = *face;
        key.sort_unstable();
        let fresh = seen.insert(key);
        if !fresh {
            duplicate_triangles_removed += 1;
        }
        fresh
    });

    let non_manifold_edge_count = MeshAdjacency::build(&faces).non_manifold_edge_count();

    let mut cleaned = TriangleSoup::with_capacity(faces.len());
    let mut sliver_removed = 0;
    for &[a, b, c] in &faces {
        let tri = Triangle::new(welder.position(a), welder.position(b), welder.position(c));
        if tri.is_degenerate(DEGENERATE_EPSILON) {
            sliver_removed += 1;
            continue;
        }
        cleaned.push(Facet::from_triangle(tri));
    }

    let report = CleanReport {
        duplicate_triangles_removed,
        vertex_refs_total: before * 3,
        unique_vertices: welder.len(),
        degenerate_removed,
        sliver_removed,
        non_manifold_edge_count,
        triangle_count_before: before,
        triangle_count_after: cleaned.len(),
    };

    if report.non_manifold_edge_count > 0 {
        warn!(
            "Cleaned soup has {} non-manifold edges",
            report.non_manifold_edge_count
        );
    }
    info!(
        "Cleaned soup: {} -> {} triangles ({} duplicate, {} degenerate, {} zero-area)",
        report.triangle_count_before,
        report.triangle_count_after,
        report.duplicate_triangles_removed,
        report.degenerate_removed,
        report.sliver_removed
    );

    (cleaned, report)
}
