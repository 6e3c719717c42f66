//! MuJoCo-aligned sensor evaluation.
//!
//! Given a [`Model`] (static sensor declarations) and a [`Data`] populated by
//! a forward-dynamics step, [`SensorEvaluator`] fills `Data::sensordata` with
//! one reading per declared sensor:
//!
//! - [`Model`] is static and shared (`Arc<Model>`)
//! - [`Data`] is dynamic; the evaluator writes only its `sensordata` slices
//! - [`SensorRegistry`] is derived once from the model and validated up front,
//!   so evaluation itself cannot fail
//!
//! # Pipeline
//!
//! ```text
//! ┌──────────────────────────┐   ┌─────────────────────────────────────┐
//! │ forward dynamics         │   │ SensorEvaluator::evaluate           │
//! │ fills Data, marks        │──▶│ gate ─▶ Pos ─▶ Vel ─▶ Acc ─▶ cutoff │
//! │ Data::populated          │   │ (zero-fill for unsupported types)   │
//! └──────────────────────────┘   └─────────────────────────────────────┘
//! ```
//!
//! Setting [`DISABLE_SENSOR`] in [`SimOptions::disableflags`] turns every
//! entry point into a no-op: `sensordata` keeps whatever it held before.
//!
//! # Quick Start
//!
//! ```
//! use std::sync::Arc;
//! use sim_sensor::{MjObjectType, MjSensorType, Model, Quantities, SensorEvaluator};
//!
//! let mut model = Model::n_link_pendulum(1, 0.5, 1.0);
//! model.add_sensor(MjSensorType::JointPos, MjObjectType::Joint, 0);
//! let model = Arc::new(model);
//!
//! let evaluator = SensorEvaluator::new(Arc::clone(&model))?;
//! let mut data = model.make_data();
//! data.qpos[0] = 0.25;
//! data.mark_populated(Quantities::QPOS);
//!
//! evaluator.evaluate(&model.opt, &mut data);
//! assert_eq!(data.sensordata[0], 0.25);
//! # Ok::<(), sim_sensor::RegistryError>(())
//! ```

#![deny(clippy::unwrap_used, clippy::expect_used)]
#![warn(missing_docs)]
#![allow(
    clippy::missing_const_for_fn,       // Many methods can't be const due to nalgebra
    clippy::suboptimal_flops,           // mul_add style changes aren't always clearer
    clippy::neg_cmp_op_on_partial_ord,  // !(x >= 0.0) is intentional for NaN rejection
    clippy::doc_markdown,               // Not all technical terms need backticks
)]

// Model, Data, enums, options, read-set flags
pub mod types;

// Registry construction errors
pub mod error;

// Spatial algebra (motion/force vectors, reference-point shifts)
pub mod spatial;

// Ray casting against primitive shapes (rangefinder, touch zones)
pub mod raycast;

// Validated sensor descriptor table
pub mod registry;

// Evaluation pipeline and per-stage extractors
pub mod sensor;

pub use error::RegistryError;
pub use registry::{SensorDescriptor, SensorRegistry};
pub use sensor::{Extractor, SensorEvaluator, SensorInput, SensorValue};
pub use spatial::SpatialVector;

pub use types::{
    ActuatorTransmission, ConstraintType, Contact, DISABLE_GRAVITY, DISABLE_SENSOR, Data,
    GeomType, MIN_VAL, MjJointType, MjObjectType, MjSensorDataKind, MjSensorType, Model,
    Quantities, SensorStage, SimOptions, disabled,
};
