//! Factory methods for common mechanical systems.
//!
//! These constructors produce pre-configured [`Model`] instances for
//! canonical test systems (pendulums, free bodies). Used by inline tests and
//! by `sim-conformance-tests`.

use nalgebra::{UnitQuaternion, Vector3};
use std::f64::consts::PI;

use super::enums::MjJointType;
use super::model::Model;

impl Model {
    /// Create an n-link serial pendulum (hinge joints only).
    ///
    /// Each body hangs `link_length` below its parent and carries a point-like
    /// mass at its origin. All hinges rotate about the Y axis and sit at the
    /// body origin, so with `qpos = 0` the chain hangs straight down.
    ///
    /// # Panics
    /// Panics if `n` is 0 (requires at least 1 link).
    #[must_use]
    pub fn n_link_pendulum(n: usize, link_length: f64, link_mass: f64) -> Self {
        assert!(n >= 1, "n_link_pendulum requires at least 1 link");

        let mut model = Self::empty();
        model.name = format!("pendulum_{n}");

        for i in 0..n {
            let body_id = model.add_body(
                i, // Each body's parent is the previous body (0 = world for first)
                Vector3::new(0.0, 0.0, -link_length),
                UnitQuaternion::identity(),
                link_mass,
                Vector3::new(0.001, 0.001, 0.001),
            );
            model.body_name[body_id] = Some(format!("link_{i}"));

            let jnt_id = model.add_joint(body_id, MjJointType::Hinge, Vector3::zeros(), Vector3::y());
            model.jnt_range[jnt_id] = (-PI, PI);
            model.jnt_name[jnt_id] = Some(format!("hinge_{i}"));
        }

        model
    }

    /// Create a double pendulum (2-link serial chain).
    #[must_use]
    pub fn double_pendulum(link_length: f64, link_mass: f64) -> Self {
        Self::n_link_pendulum(2, link_length, link_mass)
    }

    /// Create a free-floating body (6-DOF) at the origin.
    ///
    /// # Arguments
    /// * `mass` - Body mass (kg)
    /// * `inertia` - Principal moments of inertia [Ixx, Iyy, Izz]
    #[must_use]
    pub fn free_body(mass: f64, inertia: Vector3<f64>) -> Self {
        let mut model = Self::empty();
        model.name = "free_body".to_string();

        let body_id = model.add_body(
            0,
            Vector3::zeros(),
            UnitQuaternion::identity(),
            mass,
            inertia,
        );
        model.body_name[body_id] = Some("free_body".to_string());

        let jnt_id = model.add_joint(body_id, MjJointType::Free, Vector3::zeros(), Vector3::z());
        model.jnt_name[jnt_id] = Some("free".to_string());

        model
    }
}
