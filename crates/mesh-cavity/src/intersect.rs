//! Ray-triangle intersection (Möller-Trumbore).

use nalgebra::{Point3, Vector3};

use crate::types::Triangle;

/// Threshold for both the parallel-ray determinant and the minimum hit
/// distance.
pub const RAY_EPSILON: f64 = 1e-6;

/// Distance `t` along `dir` at which the ray from `origin` hits `tri`.
///
/// Two-sided: winding does not matter. Returns `None` when the ray is parallel
/// to the triangle plane (`|det| < epsilon`), misses the triangle, or hits at
/// `t <= epsilon`. `dir` need not be unit length; `t` is in units of `dir`.
pub fn ray_triangle_intersect(
    origin: &Point3<f64>,
    dir: &Vector3<f64>,
    tri: &Triangle,
    epsilon: f64,
) -> Option<f64> {
    let edge1 = tri.v1 - tri.v0;
    let edge2 = tri.v2 - tri.v0;
    let h = dir.cross(&edge2);
    let a = edge1.dot(&h);

    if a.abs() < epsilon {
        return None;
    }

    let f = 1.0 / a;
    let s = origin - tri.v0;
    let u = f * s.dot(&h);

    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(&edge1);
    let v = f * dir.dot(&q);

    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = f * edge2.dot(&q);
    (t > epsilon).then_some(t)
}
