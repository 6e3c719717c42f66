//! Write-back into `Data::sensordata` and cutoff post-processing.
//!
//! Every store goes through the sensor's registry slice, so a sensor can
//! only ever touch its own `adr..adr + dim` range. [`apply_cutoff`] runs
//! after the last sensor stage.

use nalgebra::DVector;

use super::SensorValue;
use crate::registry::{SensorDescriptor, SensorRegistry};
use crate::types::{Data, MjSensorDataKind};

/// The sensor's slice of `sensordata`, `None` if the buffer is shorter than
/// the model declares.
fn slot<'a>(sensordata: &'a mut DVector<f64>, desc: &SensorDescriptor) -> Option<&'a mut [f64]> {
    sensordata.as_mut_slice().get_mut(desc.range())
}

/// Store an extractor result in the sensor's slice.
pub(crate) fn store(sensordata: &mut DVector<f64>, desc: &SensorDescriptor, value: &SensorValue) {
    if let Some(out) = slot(sensordata, desc) {
        for (dst, src) in out.iter_mut().zip(value.as_slice()) {
            *dst = *src;
        }
    }
}

/// Fill the sensor's slice with zeros.
pub(crate) fn zero_fill(sensordata: &mut DVector<f64>, desc: &SensorDescriptor) {
    if let Some(out) = slot(sensordata, desc) {
        out.fill(0.0);
    }
}

/// Clamp every supported sensor that has a positive cutoff, by value kind:
/// `Real` to `[-cutoff, cutoff]`, `Positive` to at most `cutoff` (so the
/// rangefinder's `-1` survives). Axes and quaternions are left alone.
///
/// `sensor_noise` is not applied here.
pub(crate) fn apply_cutoff(registry: &SensorRegistry, data: &mut Data) {
    for desc in registry.descriptors() {
        let cutoff = desc.cutoff;
        if cutoff <= 0.0 || !desc.is_supported() {
            continue;
        }
        let Some(out) = slot(&mut data.sensordata, desc) else {
            continue;
        };
        match desc.sensor_type.data_kind() {
            MjSensorDataKind::Real => out.iter_mut().for_each(|v| *v = v.clamp(-cutoff, cutoff)),
            MjSensorDataKind::Positive => out.iter_mut().for_each(|v| *v = v.min(cutoff)),
            MjSensorDataKind::Axis | MjSensorDataKind::Quaternion => {}
        }
    }
}
