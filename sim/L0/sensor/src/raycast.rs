//! Ray casting against primitive shapes.
//!
//! Used by rangefinder sensors (distance to the nearest geom along the site's
//! +Z axis) and by touch sensors (does a contact force ray pass through the
//! site zone). Shapes are described the way geoms and sites are stored in
//! `Model`: a [`GeomType`], a size vector, and a world pose.
//!
//! # Supported Shapes
//!
//! - Plane: front side only, optionally bounded by `size[0..2]`
//! - Sphere, Ellipsoid: analytic quadric intersection
//! - Capsule: infinite cylinder plus end-cap spheres
//! - Cylinder: infinite cylinder plus flat caps
//! - Box: slab test in local coordinates
//!
//! Meshes are not ray-castable here and never report a hit.
//!
//! A ray starting inside a closed shape reports the exit point.

// Allow suspicious_operation_groupings - false positive for quadratic discriminant formula b*b - a*c
#![allow(clippy::suspicious_operation_groupings)]

use nalgebra::{Matrix3, Vector3};

use crate::types::GeomType;

/// Tolerance for parallel rays and degenerate quadratics.
const RAY_EPS: f64 = 1e-10;

/// Cast a ray against a primitive shape.
///
/// # Arguments
///
/// * `pos`, `mat` - World position and rotation of the shape
/// * `geom_type`, `size` - Shape and its parameters (see [`GeomType`])
/// * `origin` - Ray origin in world coordinates
/// * `dir` - Ray direction (unit vector) in world coordinates
///
/// # Returns
///
/// Distance along `dir` to the first intersection at or after `origin`, or
/// `None` when the ray misses.
#[must_use]
pub fn ray_geom(
    pos: &Vector3<f64>,
    mat: &Matrix3<f64>,
    geom_type: GeomType,
    size: &Vector3<f64>,
    origin: &Vector3<f64>,
    dir: &Vector3<f64>,
) -> Option<f64> {
    // Work in the shape's local frame. Rotations preserve length, so the
    // local parameter equals the world distance.
    let local_origin = mat.transpose() * (origin - pos);
    let local_dir = mat.transpose() * dir;

    match geom_type {
        GeomType::Plane => ray_plane(size, &local_origin, &local_dir),
        GeomType::Sphere => ray_quadric(&Vector3::repeat(size[0]), &local_origin, &local_dir),
        GeomType::Ellipsoid => ray_quadric(size, &local_origin, &local_dir),
        GeomType::Capsule => ray_capsule(size[0], size[1], &local_origin, &local_dir),
        GeomType::Cylinder => ray_cylinder(size[0], size[1], &local_origin, &local_dir),
        GeomType::Box => ray_box(size, &local_origin, &local_dir),
        GeomType::Mesh => None,
    }
}

/// Smallest non-negative root of `a t² + 2 b t + c = 0`.
fn smallest_nonnegative_root(a: f64, b: f64, c: f64) -> Option<f64> {
    if a < RAY_EPS {
        return None;
    }
    let discriminant = b * b - a * c;
    // Check for miss OR NaN (NaN < 0.0 is false, so explicitly check)
    if !(discriminant >= 0.0) {
        return None;
    }
    let sqrt_d = discriminant.sqrt();
    let near = (-b - sqrt_d) / a;
    if near >= 0.0 {
        return Some(near);
    }
    let far = (-b + sqrt_d) / a;
    (far >= 0.0).then_some(far)
}

/// Ray-plane intersection. The plane's normal is local +Z; rays travelling
/// along the normal (hitting the back side) miss.
fn ray_plane(size: &Vector3<f64>, origin: &Vector3<f64>, dir: &Vector3<f64>) -> Option<f64> {
    if dir.z > -RAY_EPS {
        return None;
    }
    let t = -origin.z / dir.z;
    if t < 0.0 {
        return None;
    }
    if size.x > 0.0 && size.y > 0.0 {
        let p = origin + dir * t;
        if p.x.abs() > size.x || p.y.abs() > size.y {
            return None;
        }
    }
    Some(t)
}

/// Ray-ellipsoid intersection (spheres are ellipsoids with equal radii).
///
/// Scales the ray by the inverse radii to get a unit-sphere problem. The
/// parameter is invariant under the scaling, so the root is the distance.
fn ray_quadric(radii: &Vector3<f64>, origin: &Vector3<f64>, dir: &Vector3<f64>) -> Option<f64> {
    if radii.min() < RAY_EPS {
        return None;
    }
    let o = origin.component_div(radii);
    let d = dir.component_div(radii);
    smallest_nonnegative_root(d.dot(&d), o.dot(&d), o.dot(&o) - 1.0)
}

/// Nearest hit on the side wall of a Z-aligned cylinder of finite height.
fn ray_side_wall(
    radius: f64,
    half_length: f64,
    origin: &Vector3<f64>,
    dir: &Vector3<f64>,
) -> Option<f64> {
    let a = dir.x * dir.x + dir.y * dir.y;
    if a < RAY_EPS {
        return None;
    }
    let b = origin.x * dir.x + origin.y * dir.y;
    let c = origin.x * origin.x + origin.y * origin.y - radius * radius;
    let discriminant = b * b - a * c;
    if !(discriminant >= 0.0) {
        return None;
    }
    let sqrt_d = discriminant.sqrt();
    [(-b - sqrt_d) / a, (-b + sqrt_d) / a]
        .into_iter()
        .filter(|&t| t >= 0.0 && (origin.z + dir.z * t).abs() <= half_length)
        .reduce(f64::min)
}

/// Ray-capsule intersection: side wall plus two end-cap spheres.
fn ray_capsule(
    radius: f64,
    half_length: f64,
    origin: &Vector3<f64>,
    dir: &Vector3<f64>,
) -> Option<f64> {
    let side = ray_side_wall(radius, half_length, origin, dir);
    let caps = [-half_length, half_length].into_iter().filter_map(|z| {
        let oc = origin - Vector3::new(0.0, 0.0, z);
        smallest_nonnegative_root(dir.dot(dir), oc.dot(dir), oc.dot(&oc) - radius * radius)
    });
    side.into_iter().chain(caps).reduce(f64::min)
}

/// Ray-cylinder intersection: side wall plus two flat caps.
fn ray_cylinder(
    radius: f64,
    half_length: f64,
    origin: &Vector3<f64>,
    dir: &Vector3<f64>,
) -> Option<f64> {
    let side = ray_side_wall(radius, half_length, origin, dir);
    let caps = [-half_length, half_length].into_iter().filter_map(|z| {
        if dir.z.abs() < RAY_EPS {
            return None;
        }
        let t = (z - origin.z) / dir.z;
        let p = origin + dir * t;
        (t >= 0.0 && p.x * p.x + p.y * p.y <= radius * radius).then_some(t)
    });
    side.into_iter().chain(caps).reduce(f64::min)
}

/// Ray-box intersection using the slab method.
fn ray_box(half_extents: &Vector3<f64>, origin: &Vector3<f64>, dir: &Vector3<f64>) -> Option<f64> {
    let mut t_min = f64::NEG_INFINITY;
    let mut t_max = f64::INFINITY;

    for i in 0..3 {
        let extent = half_extents[i];
        if dir[i].abs() < RAY_EPS {
            // Ray parallel to slab
            if origin[i] < -extent || origin[i] > extent {
                return None;
            }
        } else {
            let inv_dir = 1.0 / dir[i];
            let t1 = (-extent - origin[i]) * inv_dir;
            let t2 = (extent - origin[i]) * inv_dir;
            t_min = t_min.max(t1.min(t2));
            t_max = t_max.min(t1.max(t2));
            if t_min > t_max {
                return None;
            }
        }
    }

    if t_max < 0.0 {
        return None;
    }
    // Origin inside the box: report the exit point.
    Some(if t_min >= 0.0 { t_min } else { t_max })
}
