//! Derived sensor computations: subtree momentum, body inertia in world
//! coordinates, and constraint row lookup.
//!
//! These are shared by several extractors. All of them iterate the flat
//! model arrays directly and allocate nothing.

use nalgebra::{Matrix3, Vector3};

use crate::spatial::{angular, point_velocity};
use crate::types::{ConstraintType, Data, Model};

/// Check if a body is a descendant of (or equal to) a given root body.
#[inline]
pub(crate) fn is_body_in_subtree(model: &Model, body_id: usize, root: usize) -> bool {
    model.is_body_ancestor(root, body_id)
}

/// Bodies of the subtree rooted at `root`.
///
/// Children always have larger ids than their parents, so the scan starts at
/// `root`.
fn subtree_bodies(model: &Model, root: usize) -> impl Iterator<Item = usize> + '_ {
    (root..model.nbody).filter(move |&b| is_body_in_subtree(model, b, root))
}

/// Linear velocity of a body's centre of mass.
#[inline]
pub(crate) fn body_com_velocity(data: &Data, body: usize) -> Vector3<f64> {
    point_velocity(&data.cvel[body], &data.xpos[body], &data.xipos[body])
}

/// Rotational inertia of a body about its COM, in world coordinates.
#[inline]
pub(crate) fn body_world_inertia(model: &Model, data: &Data, body: usize) -> Matrix3<f64> {
    let r = data.ximat[body];
    r * Matrix3::from_diagonal(&model.body_inertia[body]) * r.transpose()
}

/// Compute subtree linear momentum and mass for a given body.
pub(crate) fn compute_subtree_momentum(
    model: &Model,
    data: &Data,
    root_body: usize,
) -> (Vector3<f64>, f64) {
    let mut momentum = Vector3::zeros();
    let mut mass = 0.0;
    for body_id in subtree_bodies(model, root_body) {
        let m = model.body_mass[body_id];
        momentum += m * body_com_velocity(data, body_id);
        mass += m;
    }
    (momentum, mass)
}

/// Velocity of the subtree's centre of mass, zero for a massless subtree.
pub(crate) fn compute_subtree_linvel(model: &Model, data: &Data, root_body: usize) -> Vector3<f64> {
    let (momentum, mass) = compute_subtree_momentum(model, data, root_body);
    if mass > 1e-10 {
        momentum / mass
    } else {
        Vector3::zeros()
    }
}

/// Compute subtree angular momentum about the subtree's center of mass.
///
/// For each body in the subtree:
///   L += I_i * omega_i + m_i * (r_i - r_com) x (v_i - v_com)
///
/// with `I_i` the world-frame inertia about the body COM, `r_i`/`v_i` the body
/// COM position/velocity, and `r_com`/`v_com` the subtree's.
pub(crate) fn compute_subtree_angmom(model: &Model, data: &Data, root_body: usize) -> Vector3<f64> {
    let com = data.subtree_com[root_body];
    let v_com = compute_subtree_linvel(model, data, root_body);

    let mut angmom = Vector3::zeros();
    for body_id in subtree_bodies(model, root_body) {
        let m = model.body_mass[body_id];
        let omega = angular(&data.cvel[body_id]);
        let v = body_com_velocity(data, body_id);
        let r = data.xipos[body_id] - com;

        angmom += body_world_inertia(model, data, body_id) * omega;
        angmom += m * r.cross(&(v - v_com));
    }
    angmom
}

/// First constraint row of type `efc_type` belonging to object `id`.
pub(crate) fn find_constraint_row(data: &Data, efc_type: ConstraintType, id: usize) -> Option<usize> {
    (0..data.nefc()).find(|&i| data.efc_type[i] == efc_type && data.efc_id[i] == id)
}
