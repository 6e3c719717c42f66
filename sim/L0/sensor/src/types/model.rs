//! Model struct definition and field accessors.
//!
//! [`Model`] is the static, immutable description of the simulated system:
//! kinematic tree, joints, geoms, sites, actuators, tendons, and sensor
//! declarations. It is shared (read-only, usually behind an `Arc`) by every
//! sensor evaluation.

use nalgebra::{DVector, UnitQuaternion, Vector3};

use super::enums::{ActuatorTransmission, GeomType, MjJointType, MjObjectType, MjSensorType};
use super::options::SimOptions;

/// Static model definition (like mjModel).
///
/// # Memory Layout
///
/// Arrays are indexed by their respective IDs:
/// - `body_*` arrays indexed by `body_id` (0 = world)
/// - `jnt_*` arrays indexed by `joint_id`
/// - `geom_*` / `site_*` arrays indexed by geom/site id
/// - `actuator_*` arrays indexed by `actuator_id`
/// - `sensor_*` arrays indexed by `sensor_id`
#[derive(Debug, Clone)]
pub struct Model {
    // ==================== Metadata ====================
    /// Model name.
    pub name: String,

    // ==================== Dimensions ====================
    /// Number of generalized position coordinates (includes quaternions).
    pub nq: usize,
    /// Number of degrees of freedom.
    pub nv: usize,
    /// Number of activation states.
    pub na: usize,
    /// Number of bodies (including world body 0).
    pub nbody: usize,
    /// Number of joints.
    pub njnt: usize,
    /// Number of geoms.
    pub ngeom: usize,
    /// Number of sites.
    pub nsite: usize,
    /// Number of actuators.
    pub nu: usize,
    /// Number of tendons.
    pub ntendon: usize,

    // ==================== Bodies (indexed by body_id) ====================
    /// Parent body (world is its own parent). `body_parent[b] < b` for `b > 0`.
    pub body_parent: Vec<usize>,
    /// Position offset from parent body frame.
    pub body_pos: Vec<Vector3<f64>>,
    /// Orientation offset from parent body frame.
    pub body_quat: Vec<UnitQuaternion<f64>>,
    /// Center of mass in body frame.
    pub body_ipos: Vec<Vector3<f64>>,
    /// Principal inertia frame orientation in body frame.
    pub body_iquat: Vec<UnitQuaternion<f64>>,
    /// Body mass.
    pub body_mass: Vec<f64>,
    /// Diagonal inertia in the principal frame.
    pub body_inertia: Vec<Vector3<f64>>,
    /// Optional body names.
    pub body_name: Vec<Option<String>>,

    // ==================== Joints (indexed by joint_id) ====================
    /// Joint type.
    pub jnt_type: Vec<MjJointType>,
    /// Body the joint belongs to.
    pub jnt_body: Vec<usize>,
    /// Start index in `qpos`.
    pub jnt_qpos_adr: Vec<usize>,
    /// Start index in `qvel`.
    pub jnt_dof_adr: Vec<usize>,
    /// Joint anchor in body frame.
    pub jnt_pos: Vec<Vector3<f64>>,
    /// Joint axis in body frame (hinge/slide).
    pub jnt_axis: Vec<Vector3<f64>>,
    /// Whether the joint has a position limit.
    pub jnt_limited: Vec<bool>,
    /// Joint limit range `(lower, upper)`.
    pub jnt_range: Vec<(f64, f64)>,
    /// Optional joint names.
    pub jnt_name: Vec<Option<String>>,

    // ==================== Geoms (indexed by geom_id) ====================
    /// Geom shape.
    pub geom_type: Vec<GeomType>,
    /// Body the geom is attached to.
    pub geom_body: Vec<usize>,
    /// Position in body frame.
    pub geom_pos: Vec<Vector3<f64>>,
    /// Orientation in body frame.
    pub geom_quat: Vec<UnitQuaternion<f64>>,
    /// Shape parameters (see [`GeomType`]).
    pub geom_size: Vec<Vector3<f64>>,
    /// Optional geom names.
    pub geom_name: Vec<Option<String>>,

    // ==================== Sites (indexed by site_id) ====================
    /// Body the site is attached to.
    pub site_body: Vec<usize>,
    /// Site shape, used as the touch sensor zone.
    pub site_type: Vec<GeomType>,
    /// Position in body frame.
    pub site_pos: Vec<Vector3<f64>>,
    /// Orientation in body frame.
    pub site_quat: Vec<UnitQuaternion<f64>>,
    /// Shape parameters.
    pub site_size: Vec<Vector3<f64>>,
    /// Optional site names.
    pub site_name: Vec<Option<String>>,

    // ==================== Actuators (indexed by actuator_id) ====================
    /// Transmission type.
    pub actuator_trntype: Vec<ActuatorTransmission>,
    /// Transmission target (joint or tendon id).
    pub actuator_trnid: Vec<usize>,
    /// Transmission gear ratio.
    pub actuator_gear: Vec<f64>,
    /// Start index in `act` (meaningful only when `actuator_act_num > 0`).
    pub actuator_act_adr: Vec<usize>,
    /// Number of activation states (0 for stateless actuators).
    pub actuator_act_num: Vec<usize>,
    /// Optional actuator names.
    pub actuator_name: Vec<Option<String>>,

    // ==================== Tendons (indexed by tendon_id) ====================
    /// Whether the tendon has a length limit.
    pub tendon_limited: Vec<bool>,
    /// Tendon length range `(lower, upper)`.
    pub tendon_range: Vec<(f64, f64)>,
    /// Optional tendon names.
    pub tendon_name: Vec<Option<String>>,

    // ==================== Sensors (indexed by sensor_id) ====================
    /// Number of sensors.
    pub nsensor: usize,
    /// Total length of `sensordata`.
    pub nsensordata: usize,
    /// Sensor type.
    pub sensor_type: Vec<MjSensorType>,
    /// Type of the measured object.
    pub sensor_objtype: Vec<MjObjectType>,
    /// Id of the measured object.
    pub sensor_objid: Vec<usize>,
    /// Type of the reference frame object (`None` = world).
    pub sensor_reftype: Vec<MjObjectType>,
    /// Id of the reference frame object.
    pub sensor_refid: Vec<usize>,
    /// Start index in `sensordata`.
    pub sensor_adr: Vec<usize>,
    /// Number of values written.
    pub sensor_dim: Vec<usize>,
    /// Noise standard deviation. Metadata only; never applied.
    pub sensor_noise: Vec<f64>,
    /// Cutoff for post-processing clamps (0 = none).
    pub sensor_cutoff: Vec<f64>,
    /// Optional sensor names.
    pub sensor_name: Vec<Option<String>>,

    // ==================== Options ====================
    /// Default simulation options.
    pub opt: SimOptions,
    /// Reference joint positions.
    pub qpos0: DVector<f64>,
}

impl Model {
    /// Number of elements of the given object type, 0 for [`MjObjectType::None`].
    ///
    /// `Body` and `XBody` both count bodies.
    #[must_use]
    pub fn object_count(&self, objtype: MjObjectType) -> usize {
        match objtype {
            MjObjectType::None => 0,
            MjObjectType::Body | MjObjectType::XBody => self.nbody,
            MjObjectType::Joint => self.njnt,
            MjObjectType::Geom => self.ngeom,
            MjObjectType::Site => self.nsite,
            MjObjectType::Actuator => self.nu,
            MjObjectType::Tendon => self.ntendon,
        }
    }

    /// Look up an object id by name.
    #[must_use]
    pub fn name2id(&self, objtype: MjObjectType, name: &str) -> Option<usize> {
        let names = match objtype {
            MjObjectType::None => return None,
            MjObjectType::Body | MjObjectType::XBody => &self.body_name,
            MjObjectType::Joint => &self.jnt_name,
            MjObjectType::Geom => &self.geom_name,
            MjObjectType::Site => &self.site_name,
            MjObjectType::Actuator => &self.actuator_name,
            MjObjectType::Tendon => &self.tendon_name,
        };
        names.iter().position(|n| n.as_deref() == Some(name))
    }

    /// Whether `ancestor` is `body` or one of its ancestors.
    #[must_use]
    pub fn is_body_ancestor(&self, ancestor: usize, mut body: usize) -> bool {
        loop {
            if body == ancestor {
                return true;
            }
            if body == 0 {
                return false;
            }
            body = self.body_parent[body];
        }
    }
}
