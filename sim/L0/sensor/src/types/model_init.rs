//! Model construction.
//!
//! This module contains [`Model::empty()`], [`Model::make_data()`], and the
//! incremental `add_*` builders used by the factories and by callers that
//! assemble models without a file loader.

use nalgebra::{DVector, Matrix3, UnitQuaternion, Vector3};

use super::data::Data;
use super::enums::{
    ActuatorTransmission, GeomType, MjJointType, MjObjectType, MjSensorType,
};
use super::model::Model;
use super::options::SimOptions;
use super::quantities::Quantities;
use crate::spatial::SpatialVector;

impl Model {
    /// Create an empty model containing only the world body.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            name: String::new(),

            // Dimensions
            nq: 0,
            nv: 0,
            na: 0,
            nbody: 1, // World body 0 always exists
            njnt: 0,
            ngeom: 0,
            nsite: 0,
            nu: 0,
            ntendon: 0,

            // Body tree (initialize world body)
            body_parent: vec![0], // World is its own parent
            body_pos: vec![Vector3::zeros()],
            body_quat: vec![UnitQuaternion::identity()],
            body_ipos: vec![Vector3::zeros()],
            body_iquat: vec![UnitQuaternion::identity()],
            body_mass: vec![0.0], // World has no mass
            body_inertia: vec![Vector3::zeros()],
            body_name: vec![Some("world".to_string())],

            // Joints (empty)
            jnt_type: vec![],
            jnt_body: vec![],
            jnt_qpos_adr: vec![],
            jnt_dof_adr: vec![],
            jnt_pos: vec![],
            jnt_axis: vec![],
            jnt_limited: vec![],
            jnt_range: vec![],
            jnt_name: vec![],

            // Geoms (empty)
            geom_type: vec![],
            geom_body: vec![],
            geom_pos: vec![],
            geom_quat: vec![],
            geom_size: vec![],
            geom_name: vec![],

            // Sites (empty)
            site_body: vec![],
            site_type: vec![],
            site_pos: vec![],
            site_quat: vec![],
            site_size: vec![],
            site_name: vec![],

            // Actuators (empty)
            actuator_trntype: vec![],
            actuator_trnid: vec![],
            actuator_gear: vec![],
            actuator_act_adr: vec![],
            actuator_act_num: vec![],
            actuator_name: vec![],

            // Tendons (empty)
            tendon_limited: vec![],
            tendon_range: vec![],
            tendon_name: vec![],

            // Sensors (empty)
            nsensor: 0,
            nsensordata: 0,
            sensor_type: vec![],
            sensor_objtype: vec![],
            sensor_objid: vec![],
            sensor_reftype: vec![],
            sensor_refid: vec![],
            sensor_adr: vec![],
            sensor_dim: vec![],
            sensor_noise: vec![],
            sensor_cutoff: vec![],
            sensor_name: vec![],

            opt: SimOptions::default(),
            qpos0: DVector::zeros(0),
        }
    }

    /// Allocate a [`Data`] whose buffers match this model.
    ///
    /// Frames start at identity, the world body's `cacc` holds the gravity
    /// pseudo-acceleration, and `populated` is empty.
    #[must_use]
    pub fn make_data(&self) -> Data {
        let gravity = self.opt.effective_gravity();
        let mut cacc = vec![SpatialVector::zeros(); self.nbody];
        cacc[0] = SpatialVector::new(0.0, 0.0, 0.0, -gravity.x, -gravity.y, -gravity.z);

        Data {
            // Generalized coordinates
            qpos: self.qpos0.clone(),
            qvel: DVector::zeros(self.nv),
            qacc: DVector::zeros(self.nv),
            act: DVector::zeros(self.na),
            time: 0.0,

            // Frames
            xpos: vec![Vector3::zeros(); self.nbody],
            xquat: vec![UnitQuaternion::identity(); self.nbody],
            xmat: vec![Matrix3::identity(); self.nbody],
            xipos: vec![Vector3::zeros(); self.nbody],
            ximat: vec![Matrix3::identity(); self.nbody],
            geom_xpos: vec![Vector3::zeros(); self.ngeom],
            geom_xmat: vec![Matrix3::identity(); self.ngeom],
            site_xpos: vec![Vector3::zeros(); self.nsite],
            site_xmat: vec![Matrix3::identity(); self.nsite],
            subtree_com: vec![Vector3::zeros(); self.nbody],
            subtree_mass: vec![0.0; self.nbody],

            // Spatial quantities
            cvel: vec![SpatialVector::zeros(); self.nbody],
            cacc,
            cfrc_int: vec![SpatialVector::zeros(); self.nbody],

            // Actuation / tendons
            actuator_length: vec![0.0; self.nu],
            actuator_velocity: vec![0.0; self.nu],
            actuator_force: vec![0.0; self.nu],
            qfrc_actuator: DVector::zeros(self.nv),
            ten_length: vec![0.0; self.ntendon],
            ten_velocity: vec![0.0; self.ntendon],

            // Contacts / constraints
            contacts: Vec::new(),
            efc_type: Vec::new(),
            efc_id: Vec::new(),
            efc_dim: Vec::new(),
            efc_pos: Vec::new(),
            efc_margin: Vec::new(),
            efc_vel: DVector::zeros(0),
            efc_force: DVector::zeros(0),

            populated: Quantities::empty(),

            sensordata: DVector::zeros(self.nsensordata),
        }
    }

    /// Append a body. Returns its id.
    ///
    /// The inertial frame is placed at the body origin, aligned with it.
    pub fn add_body(
        &mut self,
        parent: usize,
        pos: Vector3<f64>,
        quat: UnitQuaternion<f64>,
        mass: f64,
        inertia: Vector3<f64>,
    ) -> usize {
        let id = self.nbody;
        self.body_parent.push(parent);
        self.body_pos.push(pos);
        self.body_quat.push(quat);
        self.body_ipos.push(Vector3::zeros());
        self.body_iquat.push(UnitQuaternion::identity());
        self.body_mass.push(mass);
        self.body_inertia.push(inertia);
        self.body_name.push(None);
        self.nbody += 1;
        id
    }

    /// Append a joint on `body`. Returns its id.
    ///
    /// `qpos0` is extended with the joint's reference configuration
    /// (identity quaternions for ball/free joints).
    pub fn add_joint(
        &mut self,
        body: usize,
        jnt_type: MjJointType,
        pos: Vector3<f64>,
        axis: Vector3<f64>,
    ) -> usize {
        let id = self.njnt;
        let qpos_adr = self.nq;
        let dof_adr = self.nv;

        self.jnt_type.push(jnt_type);
        self.jnt_body.push(body);
        self.jnt_qpos_adr.push(qpos_adr);
        self.jnt_dof_adr.push(dof_adr);
        self.jnt_pos.push(pos);
        self.jnt_axis.push(axis.try_normalize(0.0).unwrap_or_else(Vector3::z));
        self.jnt_limited.push(false);
        self.jnt_range.push((0.0, 0.0));
        self.jnt_name.push(None);
        self.njnt += 1;

        self.nq += jnt_type.nq();
        self.nv += jnt_type.nv();

        let mut qpos0 = DVector::zeros(self.nq);
        qpos0.rows_mut(0, qpos_adr).copy_from(&self.qpos0);
        match jnt_type {
            MjJointType::Free => qpos0[qpos_adr + 3] = 1.0,
            MjJointType::Ball => qpos0[qpos_adr] = 1.0,
            MjJointType::Slide | MjJointType::Hinge => {}
        }
        self.qpos0 = qpos0;

        id
    }

    /// Append a geom. Returns its id.
    pub fn add_geom(
        &mut self,
        body: usize,
        geom_type: GeomType,
        pos: Vector3<f64>,
        quat: UnitQuaternion<f64>,
        size: Vector3<f64>,
    ) -> usize {
        let id = self.ngeom;
        self.geom_type.push(geom_type);
        self.geom_body.push(body);
        self.geom_pos.push(pos);
        self.geom_quat.push(quat);
        self.geom_size.push(size);
        self.geom_name.push(None);
        self.ngeom += 1;
        id
    }

    /// Append a site. Returns its id.
    pub fn add_site(
        &mut self,
        body: usize,
        site_type: GeomType,
        pos: Vector3<f64>,
        quat: UnitQuaternion<f64>,
        size: Vector3<f64>,
    ) -> usize {
        let id = self.nsite;
        self.site_body.push(body);
        self.site_type.push(site_type);
        self.site_pos.push(pos);
        self.site_quat.push(quat);
        self.site_size.push(size);
        self.site_name.push(None);
        self.nsite += 1;
        id
    }

    /// Append an actuator with `act_num` activation states. Returns its id.
    pub fn add_actuator(
        &mut self,
        trntype: ActuatorTransmission,
        trnid: usize,
        gear: f64,
        act_num: usize,
    ) -> usize {
        let id = self.nu;
        self.actuator_trntype.push(trntype);
        self.actuator_trnid.push(trnid);
        self.actuator_gear.push(gear);
        self.actuator_act_adr.push(self.na);
        self.actuator_act_num.push(act_num);
        self.actuator_name.push(None);
        self.na += act_num;
        self.nu += 1;
        id
    }

    /// Append a tendon. Returns its id.
    pub fn add_tendon(&mut self, limited: bool, range: (f64, f64)) -> usize {
        let id = self.ntendon;
        self.tendon_limited.push(limited);
        self.tendon_range.push(range);
        self.tendon_name.push(None);
        self.ntendon += 1;
        id
    }

    /// Append a sensor with its natural width. Returns its id.
    ///
    /// Types whose width is model-declared get width 1; use
    /// [`add_sensor_with_dim`](Self::add_sensor_with_dim) to choose it.
    pub fn add_sensor(
        &mut self,
        sensor_type: MjSensorType,
        objtype: MjObjectType,
        objid: usize,
    ) -> usize {
        let dim = sensor_type.dim().unwrap_or(1);
        self.add_sensor_with_dim(sensor_type, objtype, objid, dim)
    }

    /// Append a sensor with an explicit width at the end of `sensordata`.
    /// Returns its id.
    pub fn add_sensor_with_dim(
        &mut self,
        sensor_type: MjSensorType,
        objtype: MjObjectType,
        objid: usize,
        dim: usize,
    ) -> usize {
        let id = self.nsensor;
        self.sensor_type.push(sensor_type);
        self.sensor_objtype.push(objtype);
        self.sensor_objid.push(objid);
        self.sensor_reftype.push(MjObjectType::None);
        self.sensor_refid.push(0);
        self.sensor_adr.push(self.nsensordata);
        self.sensor_dim.push(dim);
        self.sensor_noise.push(0.0);
        self.sensor_cutoff.push(0.0);
        self.sensor_name.push(None);
        self.nsensor += 1;
        self.nsensordata += dim;
        id
    }

    /// Report sensor `id` relative to the frame of `(reftype, refid)`.
    pub fn set_sensor_reference(&mut self, id: usize, reftype: MjObjectType, refid: usize) {
        self.sensor_reftype[id] = reftype;
        self.sensor_refid[id] = refid;
    }
}
