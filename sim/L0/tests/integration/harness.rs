//! Forward-dynamics stand-in for the integration tests.
//!
//! Plays the forward-dynamics collaborator: given `qpos`, `qvel` and a
//! prescribed `qacc`, it computes everything the sensors read (frames,
//! spatial velocities and accelerations, interaction wrenches, actuator
//! quantities, joint-limit rows) and marks them in `Data::populated`.
//!
//! Accelerations are prescribed rather than solved for. That is enough for
//! sensor conformance: every sensor reading is a function of the kinematic
//! state and its derivatives, and the harness makes those consistent, so the
//! readings can be checked against finite differences of the state.
//!
//! Conventions follow `sim_sensor::Data`: spatial vectors are
//! `[angular; linear]` in world coordinates, stored at the body origin
//! `xpos[b]`. Internally everything is first computed at the world origin,
//! then shifted.

#![allow(clippy::doc_markdown, clippy::suboptimal_flops, clippy::many_single_char_names)]

use nalgebra::{Matrix3, UnitQuaternion, Vector3};
use sim_sensor::spatial::{
    angular, point_acceleration, shift_force, shift_motion, spatial, spatial_cross_motion,
};
use sim_sensor::{
    ActuatorTransmission, ConstraintType, Data, MjJointType, Model, Quantities, SpatialVector,
};

/// World anchor and axis of a joint, plus the body rotation right after the
/// joint is applied (the frame a ball joint's angular velocity lives in).
#[derive(Debug, Clone, Copy)]
struct JointFrame {
    anchor: Vector3<f64>,
    axis: Vector3<f64>,
    rot: Matrix3<f64>,
}

// ============================================================================
// Position stage
// ============================================================================

/// Forward kinematics: body, inertial, geom and site frames, subtree COM.
///
/// Joints on a body are applied in declaration order the way MuJoCo does:
/// a free joint sets the pose outright; slides translate along the world
/// axis; hinges and balls rotate about the anchor, which stays fixed.
pub fn fwd_position(model: &Model, data: &mut Data) {
    kinematics(model, data);

    for b in 0..model.nbody {
        data.xmat[b] = *data.xquat[b].to_rotation_matrix().matrix();
        data.xipos[b] = data.xpos[b] + data.xmat[b] * model.body_ipos[b];
        data.ximat[b] = data.xmat[b] * *model.body_iquat[b].to_rotation_matrix().matrix();
    }
    for g in 0..model.ngeom {
        let b = model.geom_body[g];
        data.geom_xpos[g] = data.xpos[b] + data.xmat[b] * model.geom_pos[g];
        data.geom_xmat[g] = data.xmat[b] * *model.geom_quat[g].to_rotation_matrix().matrix();
    }
    for s in 0..model.nsite {
        let b = model.site_body[s];
        data.site_xpos[s] = data.xpos[b] + data.xmat[b] * model.site_pos[s];
        data.site_xmat[s] = data.xmat[b] * *model.site_quat[s].to_rotation_matrix().matrix();
    }

    // Subtree COM: accumulate children into parents, leaves first.
    for b in 0..model.nbody {
        data.subtree_mass[b] = model.body_mass[b];
        data.subtree_com[b] = model.body_mass[b] * data.xipos[b];
    }
    for b in (1..model.nbody).rev() {
        let p = model.body_parent[b];
        data.subtree_mass[p] += data.subtree_mass[b];
        let moment = data.subtree_com[b];
        data.subtree_com[p] += moment;
    }
    for b in 0..model.nbody {
        if data.subtree_mass[b] > 1e-15 {
            data.subtree_com[b] /= data.subtree_mass[b];
        } else {
            data.subtree_com[b] = data.xipos[b];
        }
    }

    data.mark_populated(
        Quantities::QPOS
            | Quantities::TIME
            | Quantities::FRAMES
            | Quantities::INERTIAL
            | Quantities::SUBTREE_COM
            | Quantities::TENDON_LENGTH,
    );
}

/// Body poses from `qpos`; returns per-joint world frames.
fn kinematics(model: &Model, data: &mut Data) -> Vec<JointFrame> {
    let mut frames = vec![
        JointFrame {
            anchor: Vector3::zeros(),
            axis: Vector3::z(),
            rot: Matrix3::identity(),
        };
        model.njnt
    ];

    data.xpos[0] = Vector3::zeros();
    data.xquat[0] = UnitQuaternion::identity();

    for b in 1..model.nbody {
        let p = model.body_parent[b];
        let mut pos = data.xpos[p] + data.xquat[p] * model.body_pos[b];
        let mut quat = data.xquat[p] * model.body_quat[b];

        for j in (0..model.njnt).filter(|&j| model.jnt_body[j] == b) {
            let adr = model.jnt_qpos_adr[j];
            let q = &data.qpos;
            match model.jnt_type[j] {
                MjJointType::Free => {
                    pos = Vector3::new(q[adr], q[adr + 1], q[adr + 2]);
                    quat = unit_quat(q[adr + 3], q[adr + 4], q[adr + 5], q[adr + 6]);
                    frames[j] = JointFrame {
                        anchor: pos,
                        axis: Vector3::z(),
                        rot: *quat.to_rotation_matrix().matrix(),
                    };
                }
                MjJointType::Slide => {
                    let anchor = pos + quat * model.jnt_pos[j];
                    let axis = quat * model.jnt_axis[j];
                    pos += axis * q[adr];
                    frames[j] = JointFrame {
                        anchor: anchor + axis * q[adr],
                        axis,
                        rot: *quat.to_rotation_matrix().matrix(),
                    };
                }
                MjJointType::Hinge => {
                    let anchor = pos + quat * model.jnt_pos[j];
                    let axis = quat * model.jnt_axis[j];
                    let local_axis = nalgebra::Unit::new_normalize(model.jnt_axis[j]);
                    quat *= UnitQuaternion::from_axis_angle(&local_axis, q[adr]);
                    pos = anchor - quat * model.jnt_pos[j];
                    frames[j] = JointFrame {
                        anchor,
                        axis,
                        rot: *quat.to_rotation_matrix().matrix(),
                    };
                }
                MjJointType::Ball => {
                    let anchor = pos + quat * model.jnt_pos[j];
                    quat *= unit_quat(q[adr], q[adr + 1], q[adr + 2], q[adr + 3]);
                    pos = anchor - quat * model.jnt_pos[j];
                    frames[j] = JointFrame {
                        anchor,
                        axis: Vector3::z(),
                        rot: *quat.to_rotation_matrix().matrix(),
                    };
                }
            }
        }

        data.xpos[b] = pos;
        data.xquat[b] = quat;
    }
    frames
}

fn unit_quat(w: f64, x: f64, y: f64, z: f64) -> UnitQuaternion<f64> {
    let q = nalgebra::Quaternion::new(w, x, y, z);
    if q.norm() > 1e-10 {
        UnitQuaternion::from_quaternion(q)
    } else {
        UnitQuaternion::identity()
    }
}

// ============================================================================
// Velocity stage
// ============================================================================

/// Motion subspace of every dof at the world origin, plus the per-body
/// velocities at the origin and the subspace time derivatives.
struct DofMotion {
    cdof: Vec<SpatialVector>,
    cdof_dot: Vec<SpatialVector>,
    cvel_origin: Vec<SpatialVector>,
}

fn dof_motion(model: &Model, data: &mut Data) -> DofMotion {
    let frames = kinematics(model, data);
    let mut cdof = vec![SpatialVector::zeros(); model.nv];
    let mut cdof_dot = vec![SpatialVector::zeros(); model.nv];
    let mut cvel_origin = vec![SpatialVector::zeros(); model.nbody];

    for b in 1..model.nbody {
        let mut cvel = cvel_origin[model.body_parent[b]];

        for j in (0..model.njnt).filter(|&j| model.jnt_body[j] == b) {
            let dof = model.jnt_dof_adr[j];
            let f = frames[j];
            match model.jnt_type[j] {
                MjJointType::Free => {
                    // Translations: world axes, constant subspace.
                    for i in 0..3 {
                        let mut e = Vector3::zeros();
                        e[i] = 1.0;
                        cdof[dof + i] = spatial(&Vector3::zeros(), &e);
                        cvel += cdof[dof + i] * data.qvel[dof + i];
                    }
                    add_rotation_dofs(&f, dof + 3, data, &mut cvel, &mut cdof, &mut cdof_dot);
                }
                MjJointType::Ball => {
                    add_rotation_dofs(&f, dof, data, &mut cvel, &mut cdof, &mut cdof_dot);
                }
                MjJointType::Hinge => {
                    cdof[dof] = spatial(&f.axis, &f.anchor.cross(&f.axis));
                    cdof_dot[dof] = spatial_cross_motion(&cvel, &cdof[dof]);
                    cvel += cdof[dof] * data.qvel[dof];
                }
                MjJointType::Slide => {
                    cdof[dof] = spatial(&Vector3::zeros(), &f.axis);
                    cdof_dot[dof] = spatial_cross_motion(&cvel, &cdof[dof]);
                    cvel += cdof[dof] * data.qvel[dof];
                }
            }
        }
        cvel_origin[b] = cvel;
    }

    DofMotion {
        cdof,
        cdof_dot,
        cvel_origin,
    }
}

/// Three rotational dofs about the axes of `f.rot`, through `f.anchor`.
///
/// All three derivatives use the velocity before the joint's own rotation;
/// the joint's self-terms cancel pairwise.
fn add_rotation_dofs(
    f: &JointFrame,
    dof: usize,
    data: &Data,
    cvel: &mut SpatialVector,
    cdof: &mut [SpatialVector],
    cdof_dot: &mut [SpatialVector],
) {
    let before = *cvel;
    for i in 0..3 {
        let u = f.rot.column(i).into_owned();
        cdof[dof + i] = spatial(&u, &f.anchor.cross(&u));
        cdof_dot[dof + i] = spatial_cross_motion(&before, &cdof[dof + i]);
        *cvel += cdof[dof + i] * data.qvel[dof + i];
    }
}

/// Velocity kinematics: `cvel` for every body.
pub fn fwd_velocity(model: &Model, data: &mut Data) {
    let motion = dof_motion(model, data);
    let origin = Vector3::zeros();
    for b in 0..model.nbody {
        data.cvel[b] = shift_motion(&motion.cvel_origin[b], &origin, &data.xpos[b]);
    }
    data.mark_populated(Quantities::QVEL | Quantities::CVEL | Quantities::TENDON_VELOCITY);
}

// ============================================================================
// Acceleration stage
// ============================================================================

/// Acceleration kinematics and interaction wrenches from the prescribed
/// `qacc`: `cacc` (with the gravity pseudo-acceleration) and `cfrc_int`.
pub fn fwd_acceleration(model: &Model, data: &mut Data) {
    let motion = dof_motion(model, data);
    let origin = Vector3::zeros();
    let gravity = model.opt.effective_gravity();

    let mut cacc_origin = vec![SpatialVector::zeros(); model.nbody];
    cacc_origin[0] = spatial(&Vector3::zeros(), &(-gravity));
    for b in 1..model.nbody {
        let mut acc = cacc_origin[model.body_parent[b]];
        for j in (0..model.njnt).filter(|&j| model.jnt_body[j] == b) {
            let dof = model.jnt_dof_adr[j];
            for d in dof..dof + model.jnt_type[j].nv() {
                acc += motion.cdof_dot[d] * data.qvel[d] + motion.cdof[d] * data.qacc[d];
            }
        }
        cacc_origin[b] = acc;
    }

    // Per-body Newton-Euler wrench at the origin, then accumulate subtrees.
    let mut cfrc_origin = vec![SpatialVector::zeros(); model.nbody];
    for b in 1..model.nbody {
        let cvel = &motion.cvel_origin[b];
        let cacc = &cacc_origin[b];
        let omega = angular(cvel);
        let alpha = angular(cacc);
        let a_com = point_acceleration(cacc, cvel, &origin, &data.xipos[b]);
        let r = data.ximat[b];
        let inertia = r * Matrix3::from_diagonal(&model.body_inertia[b]) * r.transpose();

        let force = model.body_mass[b] * a_com;
        let torque_com = inertia * alpha + omega.cross(&(inertia * omega));
        let torque_origin = torque_com + data.xipos[b].cross(&force);
        cfrc_origin[b] = spatial(&torque_origin, &force);
    }
    for b in (1..model.nbody).rev() {
        let p = model.body_parent[b];
        if p != 0 {
            let child = cfrc_origin[b];
            cfrc_origin[p] += child;
        }
    }

    for b in 0..model.nbody {
        data.cacc[b] = shift_motion(&cacc_origin[b], &origin, &data.xpos[b]);
        data.cfrc_int[b] = if b == 0 {
            SpatialVector::zeros()
        } else {
            shift_force(&cfrc_origin[b], &origin, &data.xpos[b])
        };
    }
    data.mark_populated(Quantities::QACC | Quantities::CACC | Quantities::CFRC_INT);
}

// ============================================================================
// Actuation and constraints
// ============================================================================

/// Direct-drive actuation: `length = gear · q`, `force = ctrl`,
/// `qfrc_actuator += gear · force` on the transmission's dof.
pub fn fwd_actuation(model: &Model, data: &mut Data, ctrl: &[f64]) {
    data.qfrc_actuator.fill(0.0);
    for u in 0..model.nu {
        let gear = model.actuator_gear[u];
        let id = model.actuator_trnid[u];
        let force = ctrl.get(u).copied().unwrap_or(0.0);
        data.actuator_force[u] = force;
        match model.actuator_trntype[u] {
            ActuatorTransmission::Joint => {
                let adr = model.jnt_qpos_adr[id];
                let dof = model.jnt_dof_adr[id];
                data.actuator_length[u] = gear * data.qpos[adr];
                data.actuator_velocity[u] = gear * data.qvel[dof];
                data.qfrc_actuator[dof] += gear * force;
            }
            ActuatorTransmission::Tendon => {
                data.actuator_length[u] = gear * data.ten_length[id];
                data.actuator_velocity[u] = gear * data.ten_velocity[id];
            }
        }
    }
    data.mark_populated(
        Quantities::ACT
            | Quantities::ACTUATOR_LENGTH
            | Quantities::ACTUATOR_VELOCITY
            | Quantities::ACTUATOR_FORCE,
    );
}

/// Stiffness of the penalty force the harness reports for active limits.
pub const LIMIT_STIFFNESS: f64 = 1000.0;

/// Rebuild the constraint rows: one row per active joint or tendon limit.
///
/// A limit is active when its distance `q − lower` (or `upper − q`) is below
/// `margin`. Contacts are cleared; tests push their own afterwards.
pub fn fwd_constraints(model: &Model, data: &mut Data, margin: f64) {
    data.clear_constraints();

    for j in 0..model.njnt {
        if !model.jnt_limited[j] || !model.jnt_type[j].is_scalar() {
            continue;
        }
        let q = data.qpos[model.jnt_qpos_adr[j]];
        let v = data.qvel[model.jnt_dof_adr[j]];
        push_limit(data, ConstraintType::LimitJoint, j, q, v, model.jnt_range[j], margin);
    }
    for t in 0..model.ntendon {
        if !model.tendon_limited[t] {
            continue;
        }
        let (q, v) = (data.ten_length[t], data.ten_velocity[t]);
        push_limit(data, ConstraintType::LimitTendon, t, q, v, model.tendon_range[t], margin);
    }
    data.mark_populated(Quantities::CONSTRAINT | Quantities::CONTACT);
}

fn push_limit(
    data: &mut Data,
    efc_type: ConstraintType,
    id: usize,
    q: f64,
    v: f64,
    (lower, upper): (f64, f64),
    margin: f64,
) {
    for (dist, vel) in [(q - lower, v), (upper - q, -v)] {
        if dist < margin {
            let force = LIMIT_STIFFNESS * (margin - dist);
            data.push_constraint(efc_type, id, dist, margin, vel, &[force]);
        }
    }
}

/// Full forward pass: position, velocity, actuation, constraints,
/// acceleration. `data.populated` is reset first.
pub fn forward(model: &Model, data: &mut Data, ctrl: &[f64]) {
    data.clear_populated();
    fwd_position(model, data);
    fwd_velocity(model, data);
    fwd_actuation(model, data, ctrl);
    fwd_constraints(model, data, 0.0);
    fwd_acceleration(model, data);
}

// ============================================================================
// Time stepping
// ============================================================================

/// Advance the state by `h` under the current (constant) `qacc`.
///
/// Exact for scalar joints and free-joint translations. Rotational dofs of
/// ball and free joints are exact when their `qacc` is zero (the local
/// angular velocity is then constant). `h` may be negative.
pub fn advance(model: &Model, data: &mut Data, h: f64) {
    for j in 0..model.njnt {
        let adr = model.jnt_qpos_adr[j];
        let dof = model.jnt_dof_adr[j];
        match model.jnt_type[j] {
            MjJointType::Hinge | MjJointType::Slide => {
                data.qpos[adr] += h * data.qvel[dof] + 0.5 * h * h * data.qacc[dof];
            }
            MjJointType::Ball => rotate_quat(data, adr, dof, h),
            MjJointType::Free => {
                for i in 0..3 {
                    data.qpos[adr + i] += h * data.qvel[dof + i] + 0.5 * h * h * data.qacc[dof + i];
                }
                rotate_quat(data, adr + 3, dof + 3, h);
            }
        }
    }
    for d in 0..model.nv {
        data.qvel[d] += h * data.qacc[d];
    }
    data.time += h;
}

/// `q ← q ⊗ exp(ω_mid h / 2)` with the local angular velocity at mid-step.
fn rotate_quat(data: &mut Data, adr: usize, dof: usize, h: f64) {
    let q = &data.qpos;
    let quat = unit_quat(q[adr], q[adr + 1], q[adr + 2], q[adr + 3]);
    let omega = Vector3::new(
        data.qvel[dof] + 0.5 * h * data.qacc[dof],
        data.qvel[dof + 1] + 0.5 * h * data.qacc[dof + 1],
        data.qvel[dof + 2] + 0.5 * h * data.qacc[dof + 2],
    );
    let rotated = quat * UnitQuaternion::from_scaled_axis(omega * h);
    data.qpos[adr] = rotated.w;
    data.qpos[adr + 1] = rotated.i;
    data.qpos[adr + 2] = rotated.j;
    data.qpos[adr + 3] = rotated.k;
}

/// Copy of `data` advanced by `h` and run through [`forward`].
#[must_use]
pub fn state_after(model: &Model, data: &Data, h: f64, ctrl: &[f64]) -> Data {
    let mut next = data.clone();
    advance(model, &mut next, h);
    forward(model, &mut next, ctrl);
    next
}

/// World inertia of body `b` about its COM.
#[must_use]
pub fn world_inertia(model: &Model, data: &Data, b: usize) -> Matrix3<f64> {
    let r = data.ximat[b];
    r * Matrix3::from_diagonal(&model.body_inertia[b]) * r.transpose()
}
