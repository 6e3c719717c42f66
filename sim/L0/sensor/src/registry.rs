//! Sensor registry: the validated, immutable descriptor table derived from a
//! [`Model`].
//!
//! Building the registry is the only place sensor declarations can fail. Once
//! it exists, every descriptor's slice lies inside `sensordata`, no two slices
//! overlap, the slices cover the buffer exactly, and every referenced object
//! exists and has a kind the sensor can read. Evaluation therefore has no
//! error path.

use std::ops::Range;

use tracing::{debug, warn};

use crate::error::RegistryError;
use crate::sensor::Extractor;
use crate::types::{MjJointType, MjObjectType, MjSensorType, Model, Quantities, SensorStage};

/// One declared sensor, resolved against the model.
#[derive(Debug, Clone)]
pub struct SensorDescriptor {
    /// Sensor id (index into the model's `sensor_*` arrays).
    pub id: usize,
    /// Sensor type.
    pub sensor_type: MjSensorType,
    /// Pipeline stage the sensor is computed in.
    pub stage: SensorStage,
    /// Measured object type.
    pub objtype: MjObjectType,
    /// Measured object id.
    pub objid: usize,
    /// Reference frame object type (`None` = world).
    pub reftype: MjObjectType,
    /// Reference frame object id.
    pub refid: usize,
    /// Start index in `sensordata`.
    pub adr: usize,
    /// Number of values written.
    pub dim: usize,
    /// Cutoff for post-processing (0 = none).
    pub cutoff: f64,
    /// Extractor, `None` for unsupported types.
    pub extractor: Option<Extractor>,
    /// Quantities this sensor reads, given its object and reference kinds.
    pub reads: Quantities,
    /// Optional sensor name.
    pub name: Option<String>,
}

impl SensorDescriptor {
    /// Whether an extractor exists for this sensor's type.
    #[inline]
    #[must_use]
    pub fn is_supported(&self) -> bool {
        self.extractor.is_some()
    }

    /// Whether the sensor reports relative to a reference frame.
    #[inline]
    #[must_use]
    pub fn has_reference(&self) -> bool {
        self.reftype != MjObjectType::None
    }

    /// The sensor's slice of `sensordata`.
    #[inline]
    #[must_use]
    pub fn range(&self) -> Range<usize> {
        self.adr..self.adr + self.dim
    }
}

/// Ordered, validated sensor descriptors for one model.
#[derive(Debug, Clone)]
pub struct SensorRegistry {
    descriptors: Vec<SensorDescriptor>,
    /// Descriptor indices per stage, in declaration order.
    by_stage: [Vec<usize>; 3],
    /// Union of read-sets per stage (supported sensors only).
    required_by_stage: [Quantities; 3],
}

impl SensorRegistry {
    /// Build the registry from a model.
    ///
    /// # Errors
    ///
    /// Returns a [`RegistryError`] if the sensor arrays are inconsistent with
    /// `nsensor`/`nsensordata`, if a slice is malformed, or if a sensor refers
    /// to a missing or unsuitable object.
    pub fn new(model: &Model) -> Result<Self, RegistryError> {
        check_array_lengths(model)?;

        let mut descriptors = Vec::with_capacity(model.nsensor);
        for id in 0..model.nsensor {
            descriptors.push(resolve_sensor(model, id)?);
        }
        check_slices(&descriptors, model.nsensordata)?;

        let mut by_stage: [Vec<usize>; 3] = Default::default();
        let mut required_by_stage = [Quantities::empty(); 3];
        for (i, desc) in descriptors.iter().enumerate() {
            let s = stage_index(desc.stage);
            by_stage[s].push(i);
            if desc.is_supported() {
                required_by_stage[s] |= desc.reads;
            }
        }

        let mut unsupported: Vec<MjSensorType> = Vec::new();
        for desc in descriptors.iter().filter(|d| !d.is_supported()) {
            if !unsupported.contains(&desc.sensor_type) {
                unsupported.push(desc.sensor_type);
                warn!(
                    sensor_type = ?desc.sensor_type,
                    sensor = desc.id,
                    "unsupported sensor type; its output will read zero"
                );
            }
        }

        debug!(
            nsensor = model.nsensor,
            nsensordata = model.nsensordata,
            unsupported = descriptors.iter().filter(|d| !d.is_supported()).count(),
            "sensor registry built"
        );

        Ok(Self {
            descriptors,
            by_stage,
            required_by_stage,
        })
    }

    /// All descriptors, in declaration order.
    #[must_use]
    pub fn descriptors(&self) -> &[SensorDescriptor] {
        &self.descriptors
    }

    /// Number of sensors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// Whether the model declares no sensors.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Descriptor for sensor `id`.
    #[must_use]
    pub fn get(&self, id: usize) -> Option<&SensorDescriptor> {
        self.descriptors.get(id)
    }

    /// Descriptor of the first sensor named `name`.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&SensorDescriptor> {
        self.descriptors
            .iter()
            .find(|d| d.name.as_deref() == Some(name))
    }

    /// Descriptors computed in `stage`, in declaration order.
    pub fn stage_descriptors(&self, stage: SensorStage) -> impl Iterator<Item = &SensorDescriptor> {
        self.by_stage[stage_index(stage)]
            .iter()
            .map(|&i| &self.descriptors[i])
    }

    /// Union of the read-sets of all supported sensors.
    #[must_use]
    pub fn required_quantities(&self) -> Quantities {
        self.required_by_stage
            .iter()
            .fold(Quantities::empty(), |acc, q| acc | *q)
    }

    /// Union of the read-sets of the supported sensors computed in `stage`.
    #[must_use]
    pub fn required_for_stage(&self, stage: SensorStage) -> Quantities {
        self.required_by_stage[stage_index(stage)]
    }

    /// Required quantities that `populated` lacks.
    #[must_use]
    pub fn missing_quantities(&self, populated: Quantities) -> Quantities {
        self.required_quantities().difference(populated)
    }
}

const fn stage_index(stage: SensorStage) -> usize {
    match stage {
        SensorStage::Pos => 0,
        SensorStage::Vel => 1,
        SensorStage::Acc => 2,
    }
}

fn check_array_lengths(model: &Model) -> Result<(), RegistryError> {
    let lengths = [
        ("sensor_type", model.sensor_type.len()),
        ("sensor_objtype", model.sensor_objtype.len()),
        ("sensor_objid", model.sensor_objid.len()),
        ("sensor_reftype", model.sensor_reftype.len()),
        ("sensor_refid", model.sensor_refid.len()),
        ("sensor_adr", model.sensor_adr.len()),
        ("sensor_dim", model.sensor_dim.len()),
        ("sensor_noise", model.sensor_noise.len()),
        ("sensor_cutoff", model.sensor_cutoff.len()),
        ("sensor_name", model.sensor_name.len()),
    ];
    match lengths.iter().find(|(_, len)| *len != model.nsensor) {
        Some(&(field, len)) => Err(RegistryError::ArrayLength {
            field,
            len,
            nsensor: model.nsensor,
        }),
        None => Ok(()),
    }
}

fn resolve_sensor(model: &Model, id: usize) -> Result<SensorDescriptor, RegistryError> {
    let sensor_type = model.sensor_type[id];
    let objtype = model.sensor_objtype[id];
    let objid = model.sensor_objid[id];
    let reftype = model.sensor_reftype[id];
    let refid = model.sensor_refid[id];
    let adr = model.sensor_adr[id];
    let dim = model.sensor_dim[id];
    let extractor = sensor_type.extractor();

    if dim == 0 {
        return Err(RegistryError::ZeroWidth {
            sensor: id,
            sensor_type,
        });
    }
    if adr
        .checked_add(dim)
        .is_none_or(|end| end > model.nsensordata)
    {
        return Err(RegistryError::SliceOutOfBounds {
            sensor: id,
            adr,
            dim,
            nsensordata: model.nsensordata,
        });
    }

    if objtype != MjObjectType::None && objid >= model.object_count(objtype) {
        return Err(RegistryError::ObjectNotFound {
            sensor: id,
            objtype,
            objid,
        });
    }

    if extractor.is_some() {
        if let Some(expected) = sensor_type.dim() {
            if dim != expected {
                return Err(RegistryError::DimMismatch {
                    sensor: id,
                    sensor_type,
                    dim,
                    expected,
                });
            }
        }
        check_object_kind(model, id, sensor_type, objtype, objid)?;
        check_reference(model, id, sensor_type, reftype, refid)?;
    }

    Ok(SensorDescriptor {
        id,
        sensor_type,
        stage: sensor_type.stage(),
        objtype,
        objid,
        reftype,
        refid,
        adr,
        dim,
        cutoff: model.sensor_cutoff[id],
        extractor,
        reads: sensor_reads(sensor_type, objtype, reftype),
        name: model.sensor_name[id].clone(),
    })
}

/// Read-set of one sensor. A `Body` frame resolves to `xipos`/`ximat`, so a
/// frame sensor measuring or referenced to one also needs the inertial frames.
fn sensor_reads(
    sensor_type: MjSensorType,
    objtype: MjObjectType,
    reftype: MjObjectType,
) -> Quantities {
    let reads = sensor_type.reads();
    if sensor_type.is_frame_sensor()
        && (objtype == MjObjectType::Body || reftype == MjObjectType::Body)
    {
        reads | Quantities::INERTIAL
    } else {
        reads
    }
}

/// Check that a supported sensor is attached to an object kind it can read.
fn check_object_kind(
    model: &Model,
    id: usize,
    sensor_type: MjSensorType,
    objtype: MjObjectType,
    objid: usize,
) -> Result<(), RegistryError> {
    let invalid = |reason| RegistryError::invalid_object(id, sensor_type, objtype, objid, reason);

    match sensor_type {
        MjSensorType::JointPos
        | MjSensorType::JointVel
        | MjSensorType::JointActuatorFrc
        | MjSensorType::JointLimitPos
        | MjSensorType::JointLimitVel
        | MjSensorType::JointLimitFrc => {
            if objtype != MjObjectType::Joint {
                return Err(invalid("expected a joint"));
            }
            if !model.jnt_type[objid].is_scalar() {
                return Err(invalid("expected a hinge or slide joint"));
            }
        }
        MjSensorType::BallQuat | MjSensorType::BallAngVel => {
            if objtype != MjObjectType::Joint {
                return Err(invalid("expected a joint"));
            }
            if model.jnt_type[objid] != MjJointType::Ball {
                return Err(invalid("expected a ball joint"));
            }
        }
        MjSensorType::TendonPos
        | MjSensorType::TendonVel
        | MjSensorType::TendonLimitPos
        | MjSensorType::TendonLimitVel
        | MjSensorType::TendonLimitFrc => {
            if objtype != MjObjectType::Tendon {
                return Err(invalid("expected a tendon"));
            }
        }
        MjSensorType::ActuatorPos
        | MjSensorType::ActuatorVel
        | MjSensorType::ActuatorFrc
        | MjSensorType::ActuatorAct => {
            if objtype != MjObjectType::Actuator {
                return Err(invalid("expected an actuator"));
            }
        }
        MjSensorType::Touch
        | MjSensorType::Accelerometer
        | MjSensorType::Velocimeter
        | MjSensorType::Gyro
        | MjSensorType::Force
        | MjSensorType::Torque
        | MjSensorType::Magnetometer
        | MjSensorType::Rangefinder => {
            if objtype != MjObjectType::Site {
                return Err(invalid("expected a site"));
            }
        }
        MjSensorType::FramePos
        | MjSensorType::FrameQuat
        | MjSensorType::FrameXAxis
        | MjSensorType::FrameYAxis
        | MjSensorType::FrameZAxis
        | MjSensorType::FrameLinVel
        | MjSensorType::FrameAngVel
        | MjSensorType::FrameLinAcc
        | MjSensorType::FrameAngAcc => {
            if !objtype.is_frame() {
                return Err(invalid("expected a body, geom or site"));
            }
        }
        MjSensorType::SubtreeCom | MjSensorType::SubtreeLinVel | MjSensorType::SubtreeAngMom => {
            if !matches!(objtype, MjObjectType::Body | MjObjectType::XBody) {
                return Err(invalid("expected a body"));
            }
        }
        MjSensorType::Clock => {
            if objtype != MjObjectType::None {
                return Err(invalid("clock takes no object"));
            }
        }
        _ => {}
    }
    Ok(())
}

/// Only frame sensors accept a reference frame, and it must be a frame object.
fn check_reference(
    model: &Model,
    id: usize,
    sensor_type: MjSensorType,
    reftype: MjObjectType,
    refid: usize,
) -> Result<(), RegistryError> {
    if reftype == MjObjectType::None {
        return Ok(());
    }
    if !sensor_type.is_frame_sensor() || !reftype.is_frame() {
        return Err(RegistryError::InvalidReference {
            sensor: id,
            sensor_type,
            reftype,
            refid,
        });
    }
    if refid >= model.object_count(reftype) {
        return Err(RegistryError::ObjectNotFound {
            sensor: id,
            objtype: reftype,
            objid: refid,
        });
    }
    Ok(())
}

/// Slices must be pairwise disjoint and cover `nsensordata` exactly.
fn check_slices(descriptors: &[SensorDescriptor], nsensordata: usize) -> Result<(), RegistryError> {
    let mut order: Vec<usize> = (0..descriptors.len()).collect();
    order.sort_by_key(|&i| descriptors[i].adr);

    for pair in order.windows(2) {
        let (a, b) = (&descriptors[pair[0]], &descriptors[pair[1]]);
        if a.adr + a.dim > b.adr {
            return Err(RegistryError::SliceOverlap {
                first: a.id,
                second: b.id,
            });
        }
    }

    let total: usize = descriptors.iter().map(|d| d.dim).sum();
    if total != nsensordata {
        return Err(RegistryError::TotalMismatch { total, nsensordata });
    }
    Ok(())
}
