//! Fluid cavity extraction: classify, cap, flip caps, clean.

use tracing::{info, warn};

use crate::caps::add_caps;
use crate::classify::{classify_interior, ClassifyParams};
use crate::clean::{clean_mesh, CleanReport};
use crate::error::MeshResult;
use crate::mesh::IndexedMesh;
use crate::types::TriangleSoup;
use crate::validate::check_watertight;

/// Result of [`extract_fluid`].
#[derive(Debug, Clone)]
pub struct FluidExtraction {
    /// Cleaned cavity surface.
    pub soup: TriangleSoup,

    /// Facets of the solid classified as cavity walls, ascending.
    pub interior_facets: Vec<usize>,

    /// Cap facets added before cleaning.
    pub cap_count: usize,

    pub clean: CleanReport,
}

impl FluidExtraction {
    /// Index the cavity surface.
    pub fn mesh(&self) -> IndexedMesh {
        IndexedMesh::build(&self.soup)
    }

    /// Whether any cavity was found.
    pub fn is_empty(&self) -> bool {
        self.soup.is_empty()
    }
}

/// Extract the closed surface of the cavity enclosed by `solid`.
///
/// Cavity walls keep the solid's orientation, which faces into the cavity.
/// Caps are reversed after capping so every edge they share with a wall is
/// traversed in opposite directions by the two facets.
pub fn extract_fluid(solid: &IndexedMesh, params: &ClassifyParams) -> MeshResult<FluidExtraction> {
    let interior_facets = classify_interior(solid, params)?;

    let mut capped = add_caps(solid, &interior_facets);
    let cap_count = capped.cap_count();
    let original_count = capped.original_count;
    for cap in &mut capped.soup.facets[original_count..] {
        *cap = cap.flipped();
    }

    let mut soup = capped.soup;
    let clean = clean_mesh(&mut soup);

    let extraction = FluidExtraction {
        soup,
        interior_facets,
        cap_count,
        clean,
    };

    if extraction.is_empty() {
        info!("No enclosed cavity found");
    } else {
        let mesh = extraction.mesh();
        if !check_watertight(&mesh).is_watertight {
            warn!("Extracted cavity surface is not watertight");
        }
        info!(
            "Extracted cavity: {} triangles ({} walls, {} caps), volume {:.10}",
            extraction.soup.len(),
            extraction.interior_facets.len(),
            cap_count,
            mesh.volume()
        );
    }

    Ok(extraction)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
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

    #[test]
    fn test_solid_without_cavity_yields_nothing() {
        let fluid = extract_fluid(&tetrahedron(), &ClassifyParams::default()).unwrap();
        assert!(fluid.is_empty());
        assert!(fluid.interior_facets.is_empty());
        assert_eq!(fluid.cap_count, 0);
        assert_eq!(fluid.clean.to_string(), "No triangles.\n");
        assert_relative_eq!(fluid.mesh().volume(), 0.0);
    }
}
