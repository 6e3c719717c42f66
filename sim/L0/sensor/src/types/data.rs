//! Data struct definition and core accessor methods.
//!
//! [`Data`] is the dynamic simulation state: generalized coordinates, the
//! quantities computed from them by forward dynamics (frames, spatial
//! velocities and accelerations, forces, contacts, constraint rows), and the
//! flat `sensordata` output buffer. One `Data` is created per simulation
//! instance via [`Model::make_data`](super::Model::make_data).

use nalgebra::{DVector, Matrix3, UnitQuaternion, Vector3};

use super::contact_types::Contact;
use super::enums::ConstraintType;
use super::quantities::Quantities;
use crate::spatial::SpatialVector;

/// Dynamic simulation state (like mjData).
///
/// # Key Invariant
///
/// `sensordata.len() == model.nsensordata` for the model that created this
/// `Data`. Sensor evaluation writes only inside `sensordata`; every other
/// field belongs to the forward-dynamics stage.
#[derive(Debug, Clone)]
pub struct Data {
    // ==================== Generalized Coordinates ====================
    /// Joint positions (length `nq`).
    pub qpos: DVector<f64>,
    /// Joint velocities (length `nv`).
    pub qvel: DVector<f64>,
    /// Joint accelerations (length `nv`).
    pub qacc: DVector<f64>,
    /// Actuator activations (length `na`).
    pub act: DVector<f64>,
    /// Simulation time in seconds.
    pub time: f64,

    // ==================== Frames ====================
    /// Body frame positions in world frame (length `nbody`).
    pub xpos: Vec<Vector3<f64>>,
    /// Body frame orientations (length `nbody`).
    pub xquat: Vec<UnitQuaternion<f64>>,
    /// Body frame rotation matrices (length `nbody`).
    pub xmat: Vec<Matrix3<f64>>,
    /// Body COM positions in world frame (length `nbody`).
    pub xipos: Vec<Vector3<f64>>,
    /// Body inertial frame rotation matrices (length `nbody`).
    pub ximat: Vec<Matrix3<f64>>,
    /// Geom positions in world frame (length `ngeom`).
    pub geom_xpos: Vec<Vector3<f64>>,
    /// Geom rotation matrices (length `ngeom`).
    pub geom_xmat: Vec<Matrix3<f64>>,
    /// Site positions in world frame (length `nsite`).
    pub site_xpos: Vec<Vector3<f64>>,
    /// Site rotation matrices (length `nsite`).
    pub site_xmat: Vec<Matrix3<f64>>,
    /// Subtree center of mass per body (length `nbody`).
    pub subtree_com: Vec<Vector3<f64>>,
    /// Subtree mass per body (length `nbody`).
    pub subtree_mass: Vec<f64>,

    // ==================== Spatial Quantities ====================
    /// Body spatial velocity `[ω; v]` in world frame at `xpos[b]` (length `nbody`).
    pub cvel: Vec<SpatialVector>,
    /// Body spatial acceleration `[α; a]` in world frame at `xpos[b]`, including
    /// the gravity pseudo-acceleration (world body holds `[0; -g]`).
    pub cacc: Vec<SpatialVector>,
    /// Interaction wrench `[τ; f]` exerted on each body by its parent, in
    /// world frame at `xpos[b]` (length `nbody`).
    pub cfrc_int: Vec<SpatialVector>,

    // ==================== Actuation / Tendons ====================
    /// Actuator lengths (length `nu`).
    pub actuator_length: Vec<f64>,
    /// Actuator velocities (length `nu`).
    pub actuator_velocity: Vec<f64>,
    /// Actuator forces (length `nu`).
    pub actuator_force: Vec<f64>,
    /// Actuator forces in joint space (length `nv`).
    pub qfrc_actuator: DVector<f64>,
    /// Tendon lengths (length `ntendon`).
    pub ten_length: Vec<f64>,
    /// Tendon velocities (length `ntendon`).
    pub ten_velocity: Vec<f64>,

    // ==================== Contacts / Constraints ====================
    /// Active contacts.
    pub contacts: Vec<Contact>,
    /// Constraint row type.
    pub efc_type: Vec<ConstraintType>,
    /// Constraint row object id (joint, tendon, or contact index).
    pub efc_id: Vec<usize>,
    /// Number of rows in the row's constraint group (contacts span several).
    pub efc_dim: Vec<usize>,
    /// Constraint violation (distance) per row.
    pub efc_pos: Vec<f64>,
    /// Constraint margin per row.
    pub efc_margin: Vec<f64>,
    /// Constraint velocity per row.
    pub efc_vel: DVector<f64>,
    /// Constraint force per row, after the solve.
    pub efc_force: DVector<f64>,

    // ==================== Bookkeeping ====================
    /// Quantities the dynamics stage has filled for the current step.
    pub populated: Quantities,

    // ==================== Sensors ====================
    /// Sensor output buffer (length `nsensordata`).
    pub sensordata: DVector<f64>,
}

impl Data {
    /// Record that the dynamics stage has filled `q`.
    #[inline]
    pub fn mark_populated(&mut self, q: Quantities) {
        self.populated |= q;
    }

    /// Forget all populated marks, typically at the start of a step.
    #[inline]
    pub fn clear_populated(&mut self) {
        self.populated = Quantities::empty();
    }

    /// Number of constraint rows.
    #[inline]
    #[must_use]
    pub fn nefc(&self) -> usize {
        self.efc_type.len()
    }

    /// Remove all contacts and constraint rows.
    pub fn clear_constraints(&mut self) {
        self.contacts.clear();
        self.efc_type.clear();
        self.efc_id.clear();
        self.efc_dim.clear();
        self.efc_pos.clear();
        self.efc_margin.clear();
        self.efc_vel = DVector::zeros(0);
        self.efc_force = DVector::zeros(0);
    }

    /// Append a constraint group of `force.len()` rows sharing one type and id.
    ///
    /// `pos`/`margin`/`vel` describe the group's first row; the remaining rows
    /// get zeros, as friction rows carry no distance.
    pub fn push_constraint(
        &mut self,
        efc_type: ConstraintType,
        id: usize,
        pos: f64,
        margin: f64,
        vel: f64,
        force: &[f64],
    ) {
        let dim = force.len();
        let start = self.nefc();
        let total = start + dim;

        let mut efc_vel = DVector::zeros(total);
        let mut efc_force = DVector::zeros(total);
        efc_vel.rows_mut(0, start).copy_from(&self.efc_vel);
        efc_force.rows_mut(0, start).copy_from(&self.efc_force);

        for (k, &f) in force.iter().enumerate() {
            self.efc_type.push(efc_type);
            self.efc_id.push(id);
            self.efc_dim.push(dim);
            self.efc_pos.push(if k == 0 { pos } else { 0.0 });
            self.efc_margin.push(if k == 0 { margin } else { 0.0 });
            efc_vel[start + k] = if k == 0 { vel } else { 0.0 };
            efc_force[start + k] = f;
        }
        self.efc_vel = efc_vel;
        self.efc_force = efc_force;
    }
}
