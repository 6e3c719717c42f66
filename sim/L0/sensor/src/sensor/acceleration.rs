//! Acceleration-stage extractors.
//!
//! Evaluated after the constraint solve. Accelerations come from `Data::cacc`
//! (which carries the gravity pseudo-acceleration, so a body at rest reads
//! `+g` upward) and interaction wrenches from `Data::cfrc_int`. Both are
//! referenced at the body origin `xpos[b]`.

use nalgebra::Vector3;

use super::{SensorInput, SensorValue, limit_row, object_frame, reference_frame};
use crate::raycast::ray_geom;
use crate::spatial::{angular, linear, point_acceleration, point_velocity, shift_force};
use crate::types::{ConstraintType, Data};

/// Proper acceleration of the site point, in the site frame.
pub(crate) fn accelerometer(input: &SensorInput<'_>) -> SensorValue {
    let (model, data) = (input.model, input.data);
    let site_id = input.desc.objid;
    let body = model.site_body[site_id];
    let a = point_acceleration(
        &data.cacc[body],
        &data.cvel[body],
        &data.xpos[body],
        &data.site_xpos[site_id],
    );
    SensorValue::Vector(data.site_xmat[site_id].transpose() * a)
}

/// Interaction force between the site's body and its parent, in the site
/// frame.
pub(crate) fn force(input: &SensorInput<'_>) -> SensorValue {
    let (model, data) = (input.model, input.data);
    let site_id = input.desc.objid;
    let f = linear(&data.cfrc_int[model.site_body[site_id]]);
    SensorValue::Vector(data.site_xmat[site_id].transpose() * f)
}

/// Interaction torque about the site point, in the site frame.
pub(crate) fn torque(input: &SensorInput<'_>) -> SensorValue {
    let (model, data) = (input.model, input.data);
    let site_id = input.desc.objid;
    let body = model.site_body[site_id];
    let at_site = shift_force(&data.cfrc_int[body], &data.xpos[body], &data.site_xpos[site_id]);
    SensorValue::Vector(data.site_xmat[site_id].transpose() * angular(&at_site))
}

/// Linear acceleration of the object point.
///
/// Without a reference this is the classical point acceleration including
/// the gravity pseudo-acceleration. With a reference frame it is the
/// acceleration seen by an observer fixed to that frame,
/// `R_refᵀ (d̈ − α_ref × d − 2 ω_ref × ḋ + ω_ref × (ω_ref × d))` with
/// `d = p − p_ref`; gravity cancels.
pub(crate) fn frame_lin_acc(input: &SensorInput<'_>) -> SensorValue {
    let data = input.data;
    let (pos, _, body) = object_frame(input.model, data, input.desc.objtype, input.desc.objid);
    let a = point_acceleration(&data.cacc[body], &data.cvel[body], &data.xpos[body], &pos);

    let Some((ref_pos, ref_mat, ref_body)) = reference_frame(input) else {
        return SensorValue::Vector(a);
    };

    let ref_cvel = &data.cvel[ref_body];
    let ref_cacc = &data.cacc[ref_body];
    let ref_origin = &data.xpos[ref_body];
    let w_ref = angular(ref_cvel);
    let alpha_ref = angular(ref_cacc);

    let d = pos - ref_pos;
    let d_dot = point_velocity(&data.cvel[body], &data.xpos[body], &pos)
        - point_velocity(ref_cvel, ref_origin, &ref_pos);
    let d_ddot = a - point_acceleration(ref_cacc, ref_cvel, ref_origin, &ref_pos);

    let rel = d_ddot - alpha_ref.cross(&d) - 2.0 * w_ref.cross(&d_dot)
        + w_ref.cross(&w_ref.cross(&d));
    SensorValue::Vector(ref_mat.transpose() * rel)
}

/// Angular acceleration of the object, relative to the reference frame if
/// set: `R_refᵀ (α − α_ref − ω_ref × ω)`.
pub(crate) fn frame_ang_acc(input: &SensorInput<'_>) -> SensorValue {
    let data = input.data;
    let (_, _, body) = object_frame(input.model, data, input.desc.objtype, input.desc.objid);
    let alpha = angular(&data.cacc[body]);

    let value = match reference_frame(input) {
        Some((_, ref_mat, ref_body)) => {
            let w_ref = angular(&data.cvel[ref_body]);
            let omega = angular(&data.cvel[body]);
            ref_mat.transpose() * (alpha - angular(&data.cacc[ref_body]) - w_ref.cross(&omega))
        }
        None => alpha,
    };
    SensorValue::Vector(value)
}

/// Normal force of the contact group starting at row `row`.
///
/// Pyramidal contacts spread the normal force over all facet rows, so it is
/// their sum; elliptic and frictionless contacts store it in the first row.
fn contact_normal_force(data: &Data, row: usize, dim: usize) -> f64 {
    if data.efc_type[row] == ConstraintType::ContactPyramidal {
        data.efc_force.rows(row, dim).sum()
    } else {
        data.efc_force[row]
    }
}

/// Sum of the positive normal forces of contacts on the site's body whose
/// force ray passes through the site volume.
///
/// The ray starts at the contact point along the contact normal, flipped
/// when the site's body is the second party so it points away from the
/// other body. A contact point inside the site volume always counts.
pub(crate) fn touch(input: &SensorInput<'_>) -> SensorValue {
    let (model, data) = (input.model, input.data);
    let site_id = input.desc.objid;
    let site_body = model.site_body[site_id];

    let mut total_force = 0.0;
    let nefc = data.nefc();
    let mut row = 0;
    while row < nefc {
        let dim = data.efc_dim[row].clamp(1, nefc - row);
        let group = row;
        row += dim;

        if !data.efc_type[group].is_contact() {
            continue;
        }
        let Some(contact) = data.contacts.get(data.efc_id[group]) else {
            continue;
        };
        let body1 = model.geom_body[contact.geom1];
        let body2 = model.geom_body[contact.geom2];
        if body1 != site_body && body2 != site_body {
            continue;
        }

        let normal_force = contact_normal_force(data, group, dim);
        if normal_force <= 0.0 {
            continue;
        }

        let ray: Vector3<f64> = if body2 == site_body {
            -contact.normal
        } else {
            contact.normal
        };
        let hit = ray_geom(
            &data.site_xpos[site_id],
            &data.site_xmat[site_id],
            model.site_type[site_id],
            &model.site_size[site_id],
            &contact.pos,
            &ray,
        );
        if hit.is_some() {
            total_force += normal_force;
        }
    }
    SensorValue::Scalar(total_force)
}

/// Scalar actuator force.
pub(crate) fn actuator_frc(input: &SensorInput<'_>) -> SensorValue {
    SensorValue::Scalar(input.data.actuator_force[input.desc.objid])
}

/// Total actuator force on a hinge/slide joint's degree of freedom.
pub(crate) fn joint_actuator_frc(input: &SensorInput<'_>) -> SensorValue {
    let dof = input.model.jnt_dof_adr[input.desc.objid];
    SensorValue::Scalar(input.data.qfrc_actuator[dof])
}

/// Constraint force of the active limit row, else 0.
pub(crate) fn limit_frc(input: &SensorInput<'_>) -> SensorValue {
    SensorValue::Scalar(limit_row(input).map_or(0.0, |row| input.data.efc_force[row]))
}
