//! Engine-wide options read by the sensor stage.
//!
//! The evaluator never consults global state: callers pass a [`SimOptions`]
//! value into every entry point, and the disable gate is read from it once
//! per call.

use nalgebra::Vector3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Simulation options (the sensor-relevant subset of MuJoCo's `mjOption`).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SimOptions {
    /// Simulation timestep in seconds.
    pub timestep: f64,
    /// Gravity vector in world frame.
    pub gravity: Vector3<f64>,
    /// Global magnetic field in world frame, read by magnetometers.
    pub magnetic: Vector3<f64>,
    /// Disable flags (`DISABLE_*` bits).
    pub disableflags: u32,
}

impl Default for SimOptions {
    fn default() -> Self {
        Self {
            timestep: 0.002,
            gravity: Vector3::new(0.0, 0.0, -9.81),
            magnetic: Vector3::new(0.0, -0.5, 0.0),
            disableflags: 0,
        }
    }
}

impl SimOptions {
    /// Create options with the given timestep.
    #[must_use]
    pub fn with_timestep(timestep: f64) -> Self {
        Self {
            timestep,
            ..Default::default()
        }
    }

    /// Set the gravity vector.
    #[must_use]
    pub fn gravity(mut self, gravity: Vector3<f64>) -> Self {
        self.gravity = gravity;
        self
    }

    /// Zero gravity.
    #[must_use]
    pub fn zero_gravity(mut self) -> Self {
        self.gravity = Vector3::zeros();
        self
    }

    /// Set the global magnetic field.
    #[must_use]
    pub fn magnetic(mut self, magnetic: Vector3<f64>) -> Self {
        self.magnetic = magnetic;
        self
    }

    /// Set a disable flag.
    #[must_use]
    pub fn disable(mut self, flag: u32) -> Self {
        self.disableflags |= flag;
        self
    }

    /// Clear a disable flag.
    #[must_use]
    pub fn enable(mut self, flag: u32) -> Self {
        self.disableflags &= !flag;
        self
    }

    /// Gravity as seen by the dynamics stage, zero when `DISABLE_GRAVITY` is set.
    #[must_use]
    pub fn effective_gravity(&self) -> Vector3<f64> {
        if disabled(self, super::DISABLE_GRAVITY) {
            Vector3::zeros()
        } else {
            self.gravity
        }
    }
}

/// Returns true if the given disable flag is set.
#[inline]
#[must_use]
pub fn disabled(opt: &SimOptions, flag: u32) -> bool {
    debug_assert!(
        flag.is_power_of_two() && flag.trailing_zeros() <= 18,
        "disabled() called with non-disable flag: {flag:#x}"
    );
    opt.disableflags & flag != 0
}
