//! Mesh validation and reporting.

use std::fmt;

use hashbrown::HashSet;
use tracing::{debug, info, warn};

use crate::adjacency::MeshAdjacency;
use crate::mesh::IndexedMesh;
use crate::winding::{check_winding, WindingReport, DEFAULT_WINDING_TOLERANCE};

/// Squared cross-product length at or below which a face counts as zero-area.
const AREA_SQUARED_EPSILON: f64 = 1e-20;

/// Closed-surface check for an indexed mesh.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct WatertightReport {
    /// Faces whose vertex set repeats an earlier face.
    pub duplicate_triangles: usize,

    /// Distinct undirected edges.
    pub unique_edges: usize,

    /// Edges with one adjacent face.
    pub boundary_edges: usize,

    /// Edges with more than two adjacent faces.
    pub non_manifold_edges: usize,

    /// Faces with (near) zero area, including input facets dropped while
    /// indexing because two corners welded together.
    pub degenerate_triangles: usize,

    /// Vertices referenced by at least one face.
    pub vertex_count: usize,

    /// Input facets, dropped degenerate ones included.
    pub triangle_count: usize,

    /// No duplicates, boundary edges, non-manifold edges or zero-area faces,
    /// and at least one face.
    pub is_watertight: bool,
}

impl fmt::Display for WatertightReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.triangle_count == 0 {
            return writeln!(f, "Watertight: no triangles");
        }

        if self.duplicate_triangles > 0 {
            writeln!(f, "Duplicate triangles: {}", self.duplicate_triangles)?;
        }
        writeln!(
            f,
            "Edges: {} unique; {} boundary (count=1), {} non-manifold (count>2)",
            self.unique_edges, self.boundary_edges, self.non_manifold_edges
        )?;
        if self.degenerate_triangles > 0 {
            writeln!(
                f,
                "Degenerate triangles (zero area): {}",
                self.degenerate_triangles
            )?;
        }
        writeln!(
            f,
            "Vertices: {} unique (from {} triangles)",
            self.vertex_count, self.triangle_count
        )?;
        writeln!(
            f,
            "Watertight: {}",
            if self.is_watertight { "yes" } else { "no" }
        )
    }
}

/// Count the topological defects that keep `mesh` from bounding a volume.
pub fn check_watertight(mesh: &IndexedMesh) -> WatertightReport {
    let dropped = mesh.dropped_degenerate();
    if mesh.is_empty() {
        return WatertightReport {
            degenerate_triangles: dropped,
            triangle_count: dropped,
            ..Default::default()
        };
    }

    let mut seen: HashSet<[u32; 3]> = HashSet::with_capacity(mesh.face_count());
    let duplicate_triangles = mesh
        .faces()
        .iter()
        .filter(|face| {
            let mut key = **face;
            key.sort_unstable();
            !seen.insert(key)
        })
        .count();

    let adjacency = MeshAdjacency::build(mesh.faces());
    let boundary_edges = adjacency.boundary_edge_count();
    let non_manifold_edges = adjacency.non_manifold_edge_count();

    let degenerate_triangles = dropped
        + mesh
            .triangles()
            .filter(|tri| tri.normal_unnormalized().norm_squared() <= AREA_SQUARED_EPSILON)
            .count();

    let is_watertight = duplicate_triangles == 0
        && boundary_edges == 0
        && non_manifold_edges == 0
        && degenerate_triangles == 0;

    let report = WatertightReport {
        duplicate_triangles,
        unique_edges: adjacency.edge_count(),
        boundary_edges,
        non_manifold_edges,
        degenerate_triangles,
        vertex_count: referenced_vertex_count(mesh),
        triangle_count: mesh.face_count() + dropped,
        is_watertight,
    };

    if !is_watertight {
        warn!(
            "Mesh is not watertight: {} boundary edges, {} non-manifold edges, {} degenerate triangles",
            boundary_edges, non_manifold_edges, degenerate_triangles
        );
    }
    debug!("{}", report);

    report
}

fn referenced_vertex_count(mesh: &IndexedMesh) -> usize {
    let mut used = vec![false; mesh.vertex_count()];
    for &idx in mesh.faces().iter().flatten() {
        used[idx as usize] = true;
    }
    used.into_iter().filter(|&u| u).count()
}

/// Full audit of a mesh: topology, orientation and volume.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct QualityReport {
    pub watertight: WatertightReport,
    pub winding: WindingReport,

    /// Absolute enclosed volume.
    pub volume: f64,
}

impl QualityReport {
    /// Closed surface with no face disagreeing with its stored normal.
    pub fn is_sound(&self) -> bool {
        self.watertight.is_watertight && self.winding.opposite == 0
    }
}

impl fmt::Display for QualityReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.watertight)?;
        write!(f, "{}", self.winding)?;
        writeln!(f, "Volume: {:.10}", self.volume)
    }
}

/// Audit `mesh` with the default winding tolerance.
pub fn audit(mesh: &IndexedMesh) -> QualityReport {
    let report = QualityReport {
        watertight: check_watertight(mesh),
        winding: check_winding(mesh, DEFAULT_WINDING_TOLERANCE),
        volume: mesh.volume(),
    };
    log_audit(&report);
    report
}

/// Log a summary of an audit.
pub fn log_audit(report: &QualityReport) {
    info!(
        "Mesh: {} verts, {} faces, volume {:.10}",
        report.watertight.vertex_count, report.watertight.triangle_count, report.volume
    );

    if report.is_sound() {
        info!("Mesh is watertight with consistent winding");
    } else if report.winding.opposite > 0 {
        warn!(
            "{} faces wind against their stored normal",
            report.winding.opposite
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Facet, Triangle, TriangleSoup};
    use nalgebra::Point3;

    fn tetrahedron() -> IndexedMesh {
        IndexedMesh::from_indexed(
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(0.5, 1.0, 0.0),
                Point3::new(0.5, 0.5, 1.0),
            ],
            vec![[0, 2, 1], [0, 1, 3], [1, 2, 3], [2, 0, 3]],
        )
    }

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

    #[test]
    fn test_validate_watertight_mesh() {
        let report = check_watertight(&tetrahedron());

        assert!(report.is_watertight);
        assert_eq!(report.unique_edges, 6);
        assert_eq!(report.boundary_edges, 0);
        assert_eq!(report.non_manifold_edges, 0);
        assert_eq!(report.duplicate_triangles, 0);
    }

    #[test]
    fn test_validate_open_mesh() {
        let report = check_watertight(&single_triangle());

        assert!(!report.is_watertight);
        assert_eq!(report.boundary_edges, 3);
        assert_eq!(report.non_manifold_edges, 0);
    }

    #[test]
    fn test_duplicate_face_breaks_watertightness() {
        let base = tetrahedron();
        let mut faces = base.faces().to_vec();
        faces.push([1, 0, 2]);
        let mesh = IndexedMesh::from_indexed(base.vertices().to_vec(), faces);

        let report = check_watertight(&mesh);
        assert_eq!(report.duplicate_triangles, 1);
        assert_eq!(report.non_manifold_edges, 3);
        assert!(!report.is_watertight);
    }

    #[test]
    fn test_empty_mesh_is_not_watertight() {
        let report = check_watertight(&IndexedMesh::default());
        assert!(!report.is_watertight);
        assert_eq!(report.to_string(), "Watertight: no triangles\n");
    }

    #[test]
    fn test_report_display() {
        let output = check_watertight(&tetrahedron()).to_string();
        assert!(output.contains("Edges: 6 unique; 0 boundary"));
        assert!(output.contains("Vertices: 4 unique (from 4 triangles)"));
        assert!(output.contains("Watertight: yes"));
    }

    #[test]
    fn test_audit_tetrahedron() {
        let report = audit(&tetrahedron());
        assert!(report.is_sound());
        assert!((report.volume - 1.0 / 6.0).abs() < 1e-12);
        assert!(report.to_string().contains("Volume: 0.1666666667"));
    }

    #[test]
    fn test_welded_degenerate_facet_is_reported() {
        let o = Point3::new(0.0, 0.0, 0.0);
        let p = Point3::new(2.0, 2.0, 2.0);
        let mut soup = tetrahedron().to_soup();
        soup.push(Facet::from_triangle(Triangle::new(p, p, o)));

        let mesh = IndexedMesh::build(&soup);
        assert_eq!(mesh.dropped_degenerate(), 1);

        let report = check_watertight(&mesh);
        assert_eq!(report.degenerate_triangles, 1);
        assert_eq!(report.boundary_edges, 0);
        assert_eq!(report.vertex_count, 4);
        assert_eq!(report.triangle_count, 5);
        assert!(!report.is_watertight);

        let output = audit(&mesh).to_string();
        assert!(output.contains("Degenerate triangles (zero area): 1"));
        assert!(output.contains("Vertices: 4 unique (from 5 triangles)"));
        assert!(output.contains("Watertight: no"));
    }

    #[test]
    fn test_only_degenerate_facets() {
        let p = Point3::new(1.0, 1.0, 1.0);
        let soup = TriangleSoup::from(vec![Facet::from_triangle(Triangle::new(
            p,
            p,
            Point3::new(0.0, 0.0, 0.0),
        ))]);
        let report = check_watertight(&IndexedMesh::build(&soup));
        assert_eq!(report.degenerate_triangles, 1);
        assert_eq!(report.vertex_count, 0);
        assert!(!report.is_watertight);
        assert!(report.to_string().contains("Watertight: no"));
    }
}
