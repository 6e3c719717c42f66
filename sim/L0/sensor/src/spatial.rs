//! Spatial algebra utilities for 6D motion and force vectors.
//!
//! Featherstone's spatial vector convention, as used by `Data::cvel`,
//! `Data::cacc` and `Data::cfrc_int`: angular part first, linear part second,
//! expressed in world coordinates at a stated reference point.

use nalgebra::{Matrix3, UnitQuaternion, Vector3, Vector6};

/// 6D spatial vector: [angular (3), linear (3)].
///
/// - Motion vectors: [ω, v] (angular velocity, linear velocity)
/// - Force vectors: [τ, f] (torque, force)
pub type SpatialVector = Vector6<f64>;

/// Build a spatial vector from its angular and linear parts.
#[inline]
#[must_use]
pub fn spatial(angular: &Vector3<f64>, linear: &Vector3<f64>) -> SpatialVector {
    SpatialVector::new(
        angular.x, angular.y, angular.z, linear.x, linear.y, linear.z,
    )
}

/// Angular part (first three components).
#[inline]
#[must_use]
pub fn angular(v: &SpatialVector) -> Vector3<f64> {
    Vector3::new(v[0], v[1], v[2])
}

/// Linear part (last three components).
#[inline]
#[must_use]
pub fn linear(v: &SpatialVector) -> Vector3<f64> {
    Vector3::new(v[3], v[4], v[5])
}

/// Spatial cross product for motion vectors: v × s.
#[inline]
#[must_use]
pub fn spatial_cross_motion(v: &SpatialVector, s: &SpatialVector) -> SpatialVector {
    let w = angular(v);
    let v_lin = linear(v);
    let s_ang = angular(s);
    let s_lin = linear(s);
    spatial(&w.cross(&s_ang), &(w.cross(&s_lin) + v_lin.cross(&s_ang)))
}

/// Move the reference point of a motion vector from `from` to `to`.
///
/// The angular part is unchanged; the linear part becomes `v + ω × (to − from)`.
#[inline]
#[must_use]
pub fn shift_motion(v: &SpatialVector, from: &Vector3<f64>, to: &Vector3<f64>) -> SpatialVector {
    let w = angular(v);
    spatial(&w, &(linear(v) + w.cross(&(to - from))))
}

/// Move the reference point of a force vector from `from` to `to`.
///
/// The force is unchanged; the torque becomes `τ − (to − from) × f`.
#[inline]
#[must_use]
pub fn shift_force(f: &SpatialVector, from: &Vector3<f64>, to: &Vector3<f64>) -> SpatialVector {
    let force = linear(f);
    spatial(&(angular(f) - (to - from).cross(&force)), &force)
}

/// Linear velocity of the material point at `point` on a body whose spatial
/// velocity `cvel` is referenced at `origin`.
#[inline]
#[must_use]
pub fn point_velocity(cvel: &SpatialVector, origin: &Vector3<f64>, point: &Vector3<f64>) -> Vector3<f64> {
    linear(&shift_motion(cvel, origin, point))
}

/// Classical linear acceleration of the material point at `point`.
///
/// `cacc` is a spatial acceleration referenced at `origin`. Shifting it gives
/// the spatial acceleration at the point; adding `ω × v(point)` converts it to
/// the classical (material) acceleration:
/// `a + α × r + ω × (v + ω × r)` with `r = point − origin`.
#[inline]
#[must_use]
pub fn point_acceleration(
    cacc: &SpatialVector,
    cvel: &SpatialVector,
    origin: &Vector3<f64>,
    point: &Vector3<f64>,
) -> Vector3<f64> {
    let a_at_point = linear(&shift_motion(cacc, origin, point));
    let v_at_point = point_velocity(cvel, origin, point);
    a_at_point + angular(cvel).cross(&v_at_point)
}

/// Column `i` of a rotation matrix: the frame's `i`-th axis in world coordinates.
#[inline]
#[must_use]
pub fn frame_axis(mat: &Matrix3<f64>, i: usize) -> Vector3<f64> {
    Vector3::new(mat[(0, i)], mat[(1, i)], mat[(2, i)])
}

/// Quaternion as `[w, x, y, z]`.
#[inline]
#[must_use]
pub fn quat_wxyz(q: &UnitQuaternion<f64>) -> [f64; 4] {
    [q.w, q.i, q.j, q.k]
}
