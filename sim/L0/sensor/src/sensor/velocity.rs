//! Velocity-stage extractors.
//!
//! Evaluated after velocity kinematics. Body velocities come from
//! `Data::cvel`, referenced at the body origin `xpos[b]`.

use nalgebra::Vector3;

use super::derived::{compute_subtree_angmom, compute_subtree_linvel};
use super::{SensorInput, SensorValue, limit_row, object_frame, reference_frame};
use crate::spatial::{angular, point_velocity};

/// Scalar joint velocity (hinge/slide only).
pub(crate) fn joint_vel(input: &SensorInput<'_>) -> SensorValue {
    let dof = input.model.jnt_dof_adr[input.desc.objid];
    SensorValue::Scalar(input.data.qvel[dof])
}

/// Ball joint angular velocity, in the joint's parent-relative frame.
pub(crate) fn ball_ang_vel(input: &SensorInput<'_>) -> SensorValue {
    let dof = input.model.jnt_dof_adr[input.desc.objid];
    let q = &input.data.qvel;
    SensorValue::Vector(Vector3::new(q[dof], q[dof + 1], q[dof + 2]))
}

/// Angular velocity in the site frame.
pub(crate) fn gyro(input: &SensorInput<'_>) -> SensorValue {
    let (model, data) = (input.model, input.data);
    let site_id = input.desc.objid;
    let omega = angular(&data.cvel[model.site_body[site_id]]);
    SensorValue::Vector(data.site_xmat[site_id].transpose() * omega)
}

/// Linear velocity of the site point, in the site frame.
pub(crate) fn velocimeter(input: &SensorInput<'_>) -> SensorValue {
    let (model, data) = (input.model, input.data);
    let site_id = input.desc.objid;
    let body = model.site_body[site_id];
    let v = point_velocity(&data.cvel[body], &data.xpos[body], &data.site_xpos[site_id]);
    SensorValue::Vector(data.site_xmat[site_id].transpose() * v)
}

/// Linear velocity of the object point.
///
/// With a reference frame the velocity is the one an observer fixed to that
/// frame would measure: `R_refᵀ (v − v_ref − ω_ref × (p − p_ref))`.
pub(crate) fn frame_lin_vel(input: &SensorInput<'_>) -> SensorValue {
    let data = input.data;
    let (pos, _, body) = object_frame(input.model, data, input.desc.objtype, input.desc.objid);
    let v = point_velocity(&data.cvel[body], &data.xpos[body], &pos);

    let value = match reference_frame(input) {
        Some((ref_pos, ref_mat, ref_body)) => {
            let ref_cvel = &data.cvel[ref_body];
            let v_ref = point_velocity(ref_cvel, &data.xpos[ref_body], &ref_pos);
            let w_ref = angular(ref_cvel);
            ref_mat.transpose() * (v - v_ref - w_ref.cross(&(pos - ref_pos)))
        }
        None => v,
    };
    SensorValue::Vector(value)
}

/// Angular velocity of the object, relative to the reference frame if set.
pub(crate) fn frame_ang_vel(input: &SensorInput<'_>) -> SensorValue {
    let data = input.data;
    let (_, _, body) = object_frame(input.model, data, input.desc.objtype, input.desc.objid);
    let omega = angular(&data.cvel[body]);

    let value = match reference_frame(input) {
        Some((_, ref_mat, ref_body)) => ref_mat.transpose() * (omega - angular(&data.cvel[ref_body])),
        None => omega,
    };
    SensorValue::Vector(value)
}

/// Velocity of the subtree's centre of mass.
pub(crate) fn subtree_lin_vel(input: &SensorInput<'_>) -> SensorValue {
    SensorValue::Vector(compute_subtree_linvel(input.model, input.data, input.desc.objid))
}

/// Angular momentum of the subtree about its centre of mass.
pub(crate) fn subtree_ang_mom(input: &SensorInput<'_>) -> SensorValue {
    SensorValue::Vector(compute_subtree_angmom(input.model, input.data, input.desc.objid))
}

/// Actuator velocity.
pub(crate) fn actuator_vel(input: &SensorInput<'_>) -> SensorValue {
    SensorValue::Scalar(input.data.actuator_velocity[input.desc.objid])
}

/// Tendon velocity.
pub(crate) fn tendon_vel(input: &SensorInput<'_>) -> SensorValue {
    SensorValue::Scalar(input.data.ten_velocity[input.desc.objid])
}

/// Constraint velocity of the active limit row, else 0.
pub(crate) fn limit_vel(input: &SensorInput<'_>) -> SensorValue {
    SensorValue::Scalar(limit_row(input).map_or(0.0, |row| input.data.efc_vel[row]))
}
