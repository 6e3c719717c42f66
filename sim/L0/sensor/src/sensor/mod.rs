//! Sensor evaluation pipeline: enable gate, per-stage dispatch, write-back.
//!
//! Corresponds to MuJoCo's `engine_sensor.c`. Each stage evaluates the
//! sensors that depend on the corresponding pipeline output (position after
//! forward kinematics, velocity after velocity kinematics, acceleration after
//! the constraint solve); [`SensorEvaluator::postprocess`] applies cutoff
//! clamping. Extractors are pure functions of [`SensorInput`]; only the
//! dispatcher writes into `sensordata`.

use std::sync::Arc;

use nalgebra::{Matrix3, UnitQuaternion, Vector3};
use tracing::{trace_span, warn};

use crate::error::RegistryError;
use crate::registry::{SensorDescriptor, SensorRegistry};
use crate::types::{
    ConstraintType, DISABLE_SENSOR, Data, MjObjectType, MjSensorType, Model, SensorStage,
    SimOptions, disabled,
};

pub(crate) mod acceleration;
pub(crate) mod derived;
pub(crate) mod position;
pub(crate) mod postprocess;
pub(crate) mod velocity;

/// Everything an extractor may read for one sensor.
#[derive(Debug, Clone, Copy)]
pub struct SensorInput<'a> {
    /// The model.
    pub model: &'a Model,
    /// Post-dynamics state.
    pub data: &'a Data,
    /// Options passed to the evaluator.
    pub opt: &'a SimOptions,
    /// The sensor being evaluated.
    pub desc: &'a SensorDescriptor,
}

/// Value produced by an extractor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SensorValue {
    /// 1 value.
    Scalar(f64),
    /// 3 values.
    Vector(Vector3<f64>),
    /// 4 values, `[w, x, y, z]`.
    Quat([f64; 4]),
}

impl SensorValue {
    /// Number of values.
    #[must_use]
    pub const fn dim(&self) -> usize {
        match self {
            Self::Scalar(_) => 1,
            Self::Vector(_) => 3,
            Self::Quat(_) => 4,
        }
    }

    /// The values in `sensordata` order.
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        match self {
            Self::Scalar(v) => std::slice::from_ref(v),
            Self::Vector(v) => v.as_slice(),
            Self::Quat(q) => q.as_slice(),
        }
    }
}

/// Pure sensor computation: reads the input, returns the reading.
pub type Extractor = fn(&SensorInput<'_>) -> SensorValue;

impl MjSensorType {
    /// Extractor for this type, `None` if the type is not supported.
    ///
    /// Unsupported sensors are zero-filled by the dispatcher.
    #[must_use]
    pub fn extractor(self) -> Option<Extractor> {
        let f: Extractor = match self {
            // Position stage
            Self::JointPos => position::joint_pos,
            Self::BallQuat => position::ball_quat,
            Self::FramePos => position::frame_pos,
            Self::FrameQuat => position::frame_quat,
            Self::FrameXAxis | Self::FrameYAxis | Self::FrameZAxis => position::frame_axes,
            Self::SubtreeCom => position::subtree_com,
            Self::Magnetometer => position::magnetometer,
            Self::Rangefinder => position::rangefinder,
            Self::ActuatorPos => position::actuator_pos,
            Self::ActuatorAct => position::actuator_act,
            Self::TendonPos => position::tendon_pos,
            Self::JointLimitPos | Self::TendonLimitPos => position::limit_pos,
            Self::Clock => position::clock,

            // Velocity stage
            Self::JointVel => velocity::joint_vel,
            Self::BallAngVel => velocity::ball_ang_vel,
            Self::Gyro => velocity::gyro,
            Self::Velocimeter => velocity::velocimeter,
            Self::FrameLinVel => velocity::frame_lin_vel,
            Self::FrameAngVel => velocity::frame_ang_vel,
            Self::SubtreeLinVel => velocity::subtree_lin_vel,
            Self::SubtreeAngMom => velocity::subtree_ang_mom,
            Self::ActuatorVel => velocity::actuator_vel,
            Self::TendonVel => velocity::tendon_vel,
            Self::JointLimitVel | Self::TendonLimitVel => velocity::limit_vel,

            // Acceleration stage
            Self::Accelerometer => acceleration::accelerometer,
            Self::Force => acceleration::force,
            Self::Torque => acceleration::torque,
            Self::FrameLinAcc => acceleration::frame_lin_acc,
            Self::FrameAngAcc => acceleration::frame_ang_acc,
            Self::Touch => acceleration::touch,
            Self::ActuatorFrc => acceleration::actuator_frc,
            Self::JointActuatorFrc => acceleration::joint_actuator_frc,
            Self::JointLimitFrc | Self::TendonLimitFrc => acceleration::limit_frc,

            Self::CamProjection
            | Self::TendonActuatorFrc
            | Self::InsideSite
            | Self::GeomDist
            | Self::GeomNormal
            | Self::GeomFromTo
            | Self::Contact
            | Self::Tactile
            | Self::EPotential
            | Self::EKinetic
            | Self::Plugin
            | Self::User
            | Self::Unknown(_) => return None,
        };
        Some(f)
    }
}

/// Evaluates a model's sensors into `Data::sensordata`.
///
/// Holds the shared model and its validated registry; both are immutable, so
/// one evaluator can serve any number of `Data` instances, from any thread.
#[derive(Debug, Clone)]
pub struct SensorEvaluator {
    model: Arc<Model>,
    registry: SensorRegistry,
}

impl SensorEvaluator {
    /// Build the evaluator, validating the model's sensor declarations.
    ///
    /// # Errors
    ///
    /// Returns a [`RegistryError`] if the declarations are inconsistent.
    pub fn new(model: Arc<Model>) -> Result<Self, RegistryError> {
        let registry = SensorRegistry::new(&model)?;
        Ok(Self { model, registry })
    }

    /// The model this evaluator was built for.
    #[must_use]
    pub fn model(&self) -> &Model {
        &self.model
    }

    /// The sensor registry.
    #[must_use]
    pub fn registry(&self) -> &SensorRegistry {
        &self.registry
    }

    /// Full sensor pass: position, velocity and acceleration stages, then
    /// cutoff post-processing.
    ///
    /// When `DISABLE_SENSOR` is set in `opt`, returns immediately and
    /// `sensordata` is left exactly as it was.
    pub fn evaluate(&self, opt: &SimOptions, data: &mut Data) {
        if disabled(opt, DISABLE_SENSOR) {
            return;
        }
        for stage in SensorStage::ALL {
            self.run_stage(stage, opt, data);
        }
        postprocess::apply_cutoff(&self.registry, data);
    }

    /// Evaluate only the sensors computed in `stage`.
    ///
    /// Lets a pipeline call sensors right after the dynamics stage that
    /// produced their inputs. Cutoffs are not applied; call
    /// [`postprocess`](Self::postprocess) after the last stage.
    pub fn evaluate_stage(&self, stage: SensorStage, opt: &SimOptions, data: &mut Data) {
        if disabled(opt, DISABLE_SENSOR) {
            return;
        }
        self.run_stage(stage, opt, data);
    }

    /// Apply cutoff clamping to every supported sensor.
    pub fn postprocess(&self, opt: &SimOptions, data: &mut Data) {
        if disabled(opt, DISABLE_SENSOR) {
            return;
        }
        postprocess::apply_cutoff(&self.registry, data);
    }

    fn run_stage(&self, stage: SensorStage, opt: &SimOptions, data: &mut Data) {
        debug_assert_eq!(
            data.sensordata.len(),
            self.model.nsensordata,
            "Data was not made for this model"
        );
        let _span = trace_span!("sensors", ?stage).entered();

        let missing = self
            .registry
            .required_for_stage(stage)
            .difference(data.populated);
        if !missing.is_empty() {
            warn!(?stage, ?missing, "sensor inputs not populated by the dynamics stage");
        }

        let model = &*self.model;
        for desc in self.registry.stage_descriptors(stage) {
            match desc.extractor {
                Some(extract) => {
                    let value = extract(&SensorInput {
                        model,
                        data,
                        opt,
                        desc,
                    });
                    postprocess::store(&mut data.sensordata, desc, &value);
                }
                None => postprocess::zero_fill(&mut data.sensordata, desc),
            }
        }
    }
}

// ==========================================================================
// Frame helpers shared by the stage extractors
// ==========================================================================

/// World position, rotation and owning body of a frame object.
///
/// `Body` is the inertial frame (`xipos`/`ximat`), `XBody` the body frame.
/// Non-frame objects fall back to the world frame; the registry rejects them
/// for every sensor that calls this.
pub(crate) fn object_frame(
    model: &Model,
    data: &Data,
    objtype: MjObjectType,
    objid: usize,
) -> (Vector3<f64>, Matrix3<f64>, usize) {
    match objtype {
        MjObjectType::Body => (data.xipos[objid], data.ximat[objid], objid),
        MjObjectType::XBody => (data.xpos[objid], data.xmat[objid], objid),
        MjObjectType::Geom => (
            data.geom_xpos[objid],
            data.geom_xmat[objid],
            model.geom_body[objid],
        ),
        MjObjectType::Site => (
            data.site_xpos[objid],
            data.site_xmat[objid],
            model.site_body[objid],
        ),
        _ => (Vector3::zeros(), Matrix3::identity(), 0),
    }
}

/// World orientation of a frame object, composed from the body quaternion
/// and the object's local offset (avoids a matrix-to-quaternion round trip).
pub(crate) fn object_quat(
    model: &Model,
    data: &Data,
    objtype: MjObjectType,
    objid: usize,
) -> UnitQuaternion<f64> {
    match objtype {
        MjObjectType::Body => data.xquat[objid] * model.body_iquat[objid],
        MjObjectType::XBody => data.xquat[objid],
        MjObjectType::Geom => data.xquat[model.geom_body[objid]] * model.geom_quat[objid],
        MjObjectType::Site => data.xquat[model.site_body[objid]] * model.site_quat[objid],
        _ => UnitQuaternion::identity(),
    }
}

/// World position, rotation and owning body of the sensor's reference frame,
/// `None` when the sensor reports in the world frame.
pub(crate) fn reference_frame(
    input: &SensorInput<'_>,
) -> Option<(Vector3<f64>, Matrix3<f64>, usize)> {
    let desc = input.desc;
    desc.has_reference()
        .then(|| object_frame(input.model, input.data, desc.reftype, desc.refid))
}

/// Active limit row for a joint or tendon limit sensor.
pub(crate) fn limit_row(input: &SensorInput<'_>) -> Option<usize> {
    let efc_type = match input.desc.sensor_type {
        MjSensorType::JointLimitPos | MjSensorType::JointLimitVel | MjSensorType::JointLimitFrc => {
            ConstraintType::LimitJoint
        }
        _ => ConstraintType::LimitTendon,
    };
    derived::find_constraint_row(input.data, efc_type, input.desc.objid)
}
