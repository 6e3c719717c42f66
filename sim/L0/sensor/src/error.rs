//! Error types for sensor registry construction.
//!
//! All of these are model-integrity errors detected once, when the registry
//! is built. Evaluation itself has no error path.

use thiserror::Error;

use crate::types::{MjObjectType, MjSensorType};

/// Errors that can occur while building a [`SensorRegistry`](crate::SensorRegistry).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// A per-sensor model array does not have `nsensor` entries.
    #[error("sensor array `{field}` has length {len}, expected nsensor = {nsensor}")]
    ArrayLength {
        /// Name of the offending `Model` field.
        field: &'static str,
        /// Its actual length.
        len: usize,
        /// The declared sensor count.
        nsensor: usize,
    },

    /// A sensor slice extends past the end of `sensordata`.
    #[error("sensor {sensor}: slice at {adr} of width {dim} exceeds nsensordata = {nsensordata}")]
    SliceOutOfBounds {
        /// Sensor id.
        sensor: usize,
        /// Slice start.
        adr: usize,
        /// Slice width.
        dim: usize,
        /// Total buffer length.
        nsensordata: usize,
    },

    /// Two sensor slices share at least one element.
    #[error("sensor {first} and sensor {second} have overlapping slices")]
    SliceOverlap {
        /// Sensor whose slice starts first.
        first: usize,
        /// Sensor whose slice overlaps it.
        second: usize,
    },

    /// Sensor widths do not add up to `nsensordata`.
    #[error("sensor widths sum to {total}, but nsensordata = {nsensordata}")]
    TotalMismatch {
        /// Sum of `sensor_dim`.
        total: usize,
        /// Declared buffer length.
        nsensordata: usize,
    },

    /// A sensor declares a width different from its type's natural width.
    #[error("sensor {sensor} ({sensor_type:?}): declared width {dim}, expected {expected}")]
    DimMismatch {
        /// Sensor id.
        sensor: usize,
        /// Sensor type.
        sensor_type: MjSensorType,
        /// Declared width.
        dim: usize,
        /// Natural width of the type.
        expected: usize,
    },

    /// A sensor declares zero width.
    #[error("sensor {sensor} ({sensor_type:?}) has zero width")]
    ZeroWidth {
        /// Sensor id.
        sensor: usize,
        /// Sensor type.
        sensor_type: MjSensorType,
    },

    /// The measured or reference object does not exist.
    #[error("sensor {sensor}: {objtype:?} {objid} does not exist")]
    ObjectNotFound {
        /// Sensor id.
        sensor: usize,
        /// Object type.
        objtype: MjObjectType,
        /// Object id.
        objid: usize,
    },

    /// A sensor is attached to an object it cannot measure.
    #[error("sensor {sensor}: {sensor_type:?} cannot measure {objtype:?} {objid}: {reason}")]
    InvalidObject {
        /// Sensor id.
        sensor: usize,
        /// Sensor type.
        sensor_type: MjSensorType,
        /// Object type.
        objtype: MjObjectType,
        /// Object id.
        objid: usize,
        /// What is wrong with the pairing.
        reason: &'static str,
    },

    /// A reference frame is set on a sensor that has none, or is not a frame.
    #[error("sensor {sensor}: invalid reference {reftype:?} {refid} for {sensor_type:?}")]
    InvalidReference {
        /// Sensor id.
        sensor: usize,
        /// Sensor type.
        sensor_type: MjSensorType,
        /// Reference object type.
        reftype: MjObjectType,
        /// Reference object id.
        refid: usize,
    },
}

impl RegistryError {
    /// Create an invalid object error.
    pub(crate) fn invalid_object(
        sensor: usize,
        sensor_type: MjSensorType,
        objtype: MjObjectType,
        objid: usize,
        reason: &'static str,
    ) -> Self {
        Self::InvalidObject {
            sensor,
            sensor_type,
            objtype,
            objid,
            reason,
        }
    }
}
