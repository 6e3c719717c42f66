//! Position-stage extractors.
//!
//! Evaluated after forward kinematics: joint position, frame pose, subtree
//! COM, rangefinder, magnetometer, actuator/tendon length, limit distance.

use super::{SensorInput, SensorValue, limit_row, object_frame, object_quat, reference_frame};
use crate::raycast::ray_geom;
use crate::spatial::{frame_axis, quat_wxyz};
use crate::types::MjSensorType;

/// Scalar joint position (hinge/slide only).
pub(crate) fn joint_pos(input: &SensorInput<'_>) -> SensorValue {
    let adr = input.model.jnt_qpos_adr[input.desc.objid];
    SensorValue::Scalar(input.data.qpos[adr])
}

/// Ball joint quaternion `[w, x, y, z]`, normalized.
pub(crate) fn ball_quat(input: &SensorInput<'_>) -> SensorValue {
    let adr = input.model.jnt_qpos_adr[input.desc.objid];
    let q = &input.data.qpos;
    let (w, x, y, z) = (q[adr], q[adr + 1], q[adr + 2], q[adr + 3]);
    let norm = (w * w + x * x + y * y + z * z).sqrt();
    if norm > 1e-10 {
        SensorValue::Quat([w / norm, x / norm, y / norm, z / norm])
    } else {
        // Degenerate: report identity.
        SensorValue::Quat([1.0, 0.0, 0.0, 0.0])
    }
}

/// Object position, in the reference frame if one is set.
pub(crate) fn frame_pos(input: &SensorInput<'_>) -> SensorValue {
    let (pos, _, _) = object_frame(input.model, input.data, input.desc.objtype, input.desc.objid);
    let value = match reference_frame(input) {
        Some((ref_pos, ref_mat, _)) => ref_mat.transpose() * (pos - ref_pos),
        None => pos,
    };
    SensorValue::Vector(value)
}

/// Object orientation, relative to the reference frame if one is set.
pub(crate) fn frame_quat(input: &SensorInput<'_>) -> SensorValue {
    let desc = input.desc;
    let quat = object_quat(input.model, input.data, desc.objtype, desc.objid);
    let quat = if desc.has_reference() {
        let ref_quat = object_quat(input.model, input.data, desc.reftype, desc.refid);
        ref_quat.inverse() * quat
    } else {
        quat
    };
    SensorValue::Quat(quat_wxyz(&quat))
}

/// One column of the object rotation, in the reference frame if one is set.
pub(crate) fn frame_axes(input: &SensorInput<'_>) -> SensorValue {
    let col = match input.desc.sensor_type {
        MjSensorType::FrameXAxis => 0,
        MjSensorType::FrameYAxis => 1,
        _ => 2,
    };
    let (_, mat, _) = object_frame(input.model, input.data, input.desc.objtype, input.desc.objid);
    let axis = frame_axis(&mat, col);
    let value = match reference_frame(input) {
        Some((_, ref_mat, _)) => ref_mat.transpose() * axis,
        None => axis,
    };
    SensorValue::Vector(value)
}

/// Centre of mass of the subtree rooted at the body.
pub(crate) fn subtree_com(input: &SensorInput<'_>) -> SensorValue {
    SensorValue::Vector(input.data.subtree_com[input.desc.objid])
}

/// Global magnetic field expressed in the site frame.
pub(crate) fn magnetometer(input: &SensorInput<'_>) -> SensorValue {
    let site_mat = input.data.site_xmat[input.desc.objid];
    SensorValue::Vector(site_mat.transpose() * input.opt.magnetic)
}

/// Distance along the site's +Z axis to the nearest geom, `-1` if none.
///
/// Geoms on the site's own body are ignored.
pub(crate) fn rangefinder(input: &SensorInput<'_>) -> SensorValue {
    let (model, data) = (input.model, input.data);
    let site_id = input.desc.objid;
    let site_body = model.site_body[site_id];
    let origin = data.site_xpos[site_id];
    let dir = frame_axis(&data.site_xmat[site_id], 2);

    let mut closest: Option<f64> = None;
    for geom_id in 0..model.ngeom {
        if model.geom_body[geom_id] == site_body {
            continue;
        }
        let hit = ray_geom(
            &data.geom_xpos[geom_id],
            &data.geom_xmat[geom_id],
            model.geom_type[geom_id],
            &model.geom_size[geom_id],
            &origin,
            &dir,
        );
        if let Some(t) = hit {
            if closest.is_none_or(|best| t < best) {
                closest = Some(t);
            }
        }
    }
    SensorValue::Scalar(closest.unwrap_or(-1.0))
}

/// Actuator length.
pub(crate) fn actuator_pos(input: &SensorInput<'_>) -> SensorValue {
    SensorValue::Scalar(input.data.actuator_length[input.desc.objid])
}

/// Last activation state of the actuator, 0 for stateless actuators.
pub(crate) fn actuator_act(input: &SensorInput<'_>) -> SensorValue {
    let u = input.desc.objid;
    let act_num = input.model.actuator_act_num[u];
    if act_num == 0 {
        return SensorValue::Scalar(0.0);
    }
    let idx = input.model.actuator_act_adr[u] + act_num - 1;
    SensorValue::Scalar(input.data.act.get(idx).copied().unwrap_or(0.0))
}

/// Tendon length.
pub(crate) fn tendon_pos(input: &SensorInput<'_>) -> SensorValue {
    SensorValue::Scalar(input.data.ten_length[input.desc.objid])
}

/// Limit distance minus margin while the limit row is active, else 0.
pub(crate) fn limit_pos(input: &SensorInput<'_>) -> SensorValue {
    let value = limit_row(input)
        .map_or(0.0, |row| input.data.efc_pos[row] - input.data.efc_margin[row]);
    SensorValue::Scalar(value)
}

/// Simulation time.
pub(crate) fn clock(input: &SensorInput<'_>) -> SensorValue {
    SensorValue::Scalar(input.data.time)
}
