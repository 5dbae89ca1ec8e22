//! Even-hit interior classification of facets.
//!
//! Each facet fires a ray from just in front of its centroid along its own
//! geometry normal and counts how many other facets the ray crosses. A facet
//! that faces into a cavity sees its ray cross the far cavity wall and then
//! leave the solid again, for an even, nonzero count. A facet on the outer
//! skin looks straight out into empty space and sees nothing.
//!
//! # Example
//!
//! ```
//! use mesh_cavity::ClassifyParams;
//!
//! let params = ClassifyParams::default()
//!     .min_hit_distance(0.05)
//!     .parallel(false);
//! assert!(params.validate().is_ok());
//! assert!((params.origin_offset - 1e-4).abs() < 1e-12);
//! ```

use nalgebra::{Point3, Vector3};
use rayon::prelude::*;
use tracing::{debug, info};

use crate::error::{MeshError, MeshResult};
use crate::mesh::IndexedMesh;

/// Tolerances for [`classify_interior`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ClassifyParams {
    /// Distance the ray origin is pushed off the facet along its normal.
    pub origin_offset: f64,

    /// Hits closer than this are ignored. Filters out the facet's own
    /// neighbours meeting it at a shallow angle.
    pub min_hit_distance: f64,

    /// Sorted hits within this distance of the last counted hit are treated
    /// as one crossing, so a ray through a shared edge counts once.
    pub hit_merge_tolerance: f64,

    /// Run the per-facet tests on the rayon thread pool.
    pub parallel: bool,
}

impl Default for ClassifyParams {
    fn default() -> Self {
        Self {
            origin_offset: 1e-4,
            min_hit_distance: 1e-2,
            hit_merge_tolerance: 1e-4,
            parallel: true,
        }
    }
}

impl ClassifyParams {
    /// Set the ray origin offset.
    #[must_use]
    pub const fn origin_offset(mut self, offset: f64) -> Self {
        self.origin_offset = offset;
        self
    }

    /// Set the minimum hit distance.
    #[must_use]
    pub const fn min_hit_distance(mut self, distance: f64) -> Self {
        self.min_hit_distance = distance;
        self
    }

    /// Set the hit merge tolerance.
    #[must_use]
    pub const fn hit_merge_tolerance(mut self, tolerance: f64) -> Self {
        self.hit_merge_tolerance = tolerance;
        self
    }

    /// Enable or disable the parallel facet loop.
    #[must_use]
    pub const fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Check that every tolerance is finite and strictly positive.
    pub fn validate(&self) -> MeshResult<()> {
        for (name, value) in [
            ("origin_offset", self.origin_offset),
            ("min_hit_distance", self.min_hit_distance),
            ("hit_merge_tolerance", self.hit_merge_tolerance),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(MeshError::invalid_params(format!(
                    "{name} must be finite and positive, got {value}"
                )));
            }
        }
        Ok(())
    }
}

/// Indices (ascending) of the facets that bound an internal cavity.
///
/// Facets whose geometry normal has zero length cannot cast a ray and are
/// classified as exterior. Parallel and sequential runs return the same list.
/// Fails with [`MeshError::InvalidParams`] when a tolerance is not finite and
/// positive.
pub fn classify_interior(mesh: &IndexedMesh, params: &ClassifyParams) -> MeshResult<Vec<usize>> {
    params.validate()?;
    let face_count = mesh.face_count();

    let is_interior = |i: usize| -> bool {
        let tri = mesh.triangle(i);
        let Some(normal) = tri.normal() else {
            return false;
        };
        let origin = tri.centroid() + normal * params.origin_offset;
        let crossings = count_crossings(mesh, i, &origin, &normal, params);
        crossings > 0 && crossings % 2 == 0
    };

    let flags: Vec<bool> = if params.parallel {
        (0..face_count).into_par_iter().map(is_interior).collect()
    } else {
        (0..face_count).map(is_interior).collect()
    };

    let interior: Vec<usize> = flags
        .iter()
        .enumerate()
        .filter_map(|(i, &inside)| inside.then_some(i))
        .collect();

    info!(
        "Classified {} of {} facets as interior",
        interior.len(),
        face_count
    );
    debug!(
        "Classifier tolerances: offset {:e}, min hit {:e}, merge {:e}, parallel {}",
        params.origin_offset, params.min_hit_distance, params.hit_merge_tolerance, params.parallel
    );

    Ok(interior)
}

/// Distinct crossings of the ray against every face except `skip`.
fn count_crossings(
    mesh: &IndexedMesh,
    skip: usize,
    origin: &Point3<f64>,
    dir: &Vector3<f64>,
    params: &ClassifyParams,
) -> usize {
    let mut hits: Vec<f64> = (0..mesh.face_count())
        .filter(|&k| k != skip)
        .filter_map(|k| mesh.ray_intersect(k, origin, dir))
        .filter(|&t| t > params.min_hit_distance)
        .collect();

    hits.sort_by(f64::total_cmp);
    count_distinct(&hits, params.hit_merge_tolerance)
}

/// Count sorted hit distances, folding each run that stays within
/// `tolerance` of its first member into one.
fn count_distinct(sorted: &[f64], tolerance: f64) -> usize {
    let mut count = 0;
    let mut last: Option<f64> = None;

    for &t in sorted {
        match last {
            Some(prev) if t - prev <= tolerance => {}
            _ => {
                count += 1;
                last = Some(t);
            }
        }
    }

    count
}
