//! Model-integrity errors surface when the evaluator is built, never during
//! evaluation.

use std::sync::Arc;

use sim_sensor::{MjObjectType, MjSensorType, Model, RegistryError, SensorEvaluator};

use super::fixtures::instrumented_chain;

fn build(model: Model) -> Result<SensorEvaluator, RegistryError> {
    SensorEvaluator::new(Arc::new(model))
}

#[test]
fn fixture_model_is_valid() {
    let evaluator = build(instrumented_chain()).unwrap();
    let registry = evaluator.registry();
    assert_eq!(registry.find("fore_gyro").unwrap().sensor_type, MjSensorType::Gyro);
    assert!(registry.find("fore_pos_in_wrist").unwrap().has_reference());
    assert!(registry.find("no_such_sensor").is_none());
}

#[test]
fn truncated_sensor_array_is_rejected() {
    let mut model = instrumented_chain();
    model.sensor_noise.pop();
    let err = build(model).err().unwrap();
    assert!(matches!(err, RegistryError::ArrayLength { field: "sensor_noise", .. }));
    assert!(err.to_string().contains("sensor_noise"));
}

#[test]
fn gap_in_sensordata_is_rejected() {
    let mut model = instrumented_chain();
    model.nsensordata += 2;
    let err = build(model).err().unwrap();
    assert!(matches!(err, RegistryError::TotalMismatch { .. }));
}

#[test]
fn overlapping_slices_are_rejected() {
    let mut model = instrumented_chain();
    model.sensor_adr[3] = model.sensor_adr[2];
    assert!(matches!(build(model).err().unwrap(), RegistryError::SliceOverlap { .. }));
}

#[test]
fn frame_sensor_on_a_joint_is_rejected() {
    let mut model = instrumented_chain();
    model.add_sensor(MjSensorType::FrameLinVel, MjObjectType::Joint, 0);
    let err = build(model).err().unwrap();
    assert!(matches!(
        err,
        RegistryError::InvalidObject {
            sensor_type: MjSensorType::FrameLinVel,
            objtype: MjObjectType::Joint,
            ..
        }
    ));
}

#[test]
fn reference_on_a_site_sensor_is_rejected() {
    let mut model = instrumented_chain();
    let s = model.add_sensor(MjSensorType::Accelerometer, MjObjectType::Site, 0);
    model.set_sensor_reference(s, MjObjectType::XBody, 1);
    assert!(matches!(
        build(model).err().unwrap(),
        RegistryError::InvalidReference { sensor, .. } if sensor == s
    ));
}

#[test]
fn dangling_reference_is_rejected() {
    let mut model = instrumented_chain();
    let s = model.add_sensor(MjSensorType::FramePos, MjObjectType::Site, 0);
    model.set_sensor_reference(s, MjObjectType::Site, 42);
    assert!(matches!(
        build(model).err().unwrap(),
        RegistryError::ObjectNotFound { objtype: MjObjectType::Site, objid: 42, .. }
    ));
}

#[test]
fn limit_sensor_on_unlimited_joint_is_accepted() {
    let mut model = instrumented_chain();
    model.add_sensor(MjSensorType::JointLimitFrc, MjObjectType::Joint, 0);
    assert!(build(model).is_ok());
}
