//! Winding consistency against the normals stored in the source file.

use std::fmt;

use tracing::debug;

use crate::mesh::IndexedMesh;

/// Dot-product band around zero inside which a face is neither consistent
/// nor opposite.
pub const DEFAULT_WINDING_TOLERANCE: f64 = 1e-5;

/// A face whose right-hand normal points away from its stored normal.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct OppositeWinding {
    pub triangle: usize,
    pub dot: f64,
}

/// Per-face comparison of geometry normals with stored normals.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct WindingReport {
    /// Faces whose geometry normal agrees with the stored normal.
    pub consistent: usize,

    /// Faces whose geometry normal disagrees with the stored normal.
    pub opposite: usize,

    /// Zero-area faces, plus faces whose stored normal is (near) perpendicular
    /// or missing.
    pub skipped: usize,

    /// One entry per opposite face, in face order.
    pub details: Vec<OppositeWinding>,
}

impl fmt::Display for WindingReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for d in &self.details {
            writeln!(f, "  triangle {} opposite winding (dot={})", d.triangle, d.dot)?;
        }
        writeln!(
            f,
            "Right-hand rule: {} OK, {} opposite winding",
            self.consistent, self.opposite
        )
    }
}

/// Compare each face's right-hand normal with the normal it was loaded with.
///
/// Faces with a zero-length geometry normal or `|dot| <= tolerance` are
/// counted as skipped.
pub fn check_winding(mesh: &IndexedMesh, tolerance: f64) -> WindingReport {
    let mut report = WindingReport::default();

    for (i, tri) in mesh.triangles().enumerate() {
        let Some(normal) = tri.normal() else {
            report.skipped += 1;
            continue;
        };

        let dot = normal.dot(&mesh.original_normal(i));
        if dot > tolerance {
            report.consistent += 1;
        } else if dot < -tolerance {
            report.opposite += 1;
            report.details.push(OppositeWinding { triangle: i, dot });
        } else {
            report.skipped += 1;
        }
    }

    debug!(
        "Winding: {} consistent, {} opposite, {} skipped",
        report.consistent, report.opposite, report.skipped
    );

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Facet, TriangleSoup};
    use nalgebra::{Point3, Vector3};

    fn facet_with_normal(normal: Vector3<f64>) -> Facet {
        Facet::new(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            normal,
        )
    }

    #[test]
    fn test_matching_normals_are_consistent() {
        let soup = TriangleSoup::from(vec![facet_with_normal(Vector3::new(0.0, 0.0, 1.0))]);
        let report = check_winding(&IndexedMesh::build(&soup), DEFAULT_WINDING_TOLERANCE);
        assert_eq!(report.consistent, 1);
        assert_eq!(report.opposite, 0);
        assert!(report.details.is_empty());
    }

    #[test]
    fn test_flipped_normal_is_reported() {
        let soup = TriangleSoup::from(vec![
            facet_with_normal(Vector3::new(0.0, 0.0, 1.0)),
            Facet::new(
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
                Point3::new(0.0, 0.0, 1.0),
                Vector3::new(-1.0, 0.0, 0.0),
            )
            .flipped(),
        ]);
        // Flipping reverses winding and stored normal together, so the
        // mismatch survives.
        let report = check_winding(&IndexedMesh::build(&soup), DEFAULT_WINDING_TOLERANCE);
        assert_eq!(report.consistent, 1);
        assert_eq!(report.opposite, 1);
        assert_eq!(report.details[0].triangle, 1);
        assert!((report.details[0].dot + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_zero_stored_normal_is_skipped() {
        let soup = TriangleSoup::from(vec![facet_with_normal(Vector3::zeros())]);
        let report = check_winding(&IndexedMesh::build(&soup), DEFAULT_WINDING_TOLERANCE);
        assert_eq!(report.skipped, 1);
        assert_eq!(report.consistent + report.opposite, 0);
    }

    #[test]
    fn test_report_display() {
        let soup = TriangleSoup::from(vec![facet_with_normal(Vector3::new(0.0, 0.0, -1.0))]);
        let text = check_winding(&IndexedMesh::build(&soup), DEFAULT_WINDING_TOLERANCE).to_string();
        assert!(text.contains("triangle 0 opposite winding (dot=-1)"));
        assert!(text.ends_with("Right-hand rule: 0 OK, 1 opposite winding\n"));
    }
}
