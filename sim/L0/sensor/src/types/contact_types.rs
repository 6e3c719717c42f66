//! Contact records produced by collision detection.

use nalgebra::Vector3;

/// Contact point (the sensor-relevant subset of MuJoCo's `mjContact`).
///
/// Constraint rows for a contact are found through `Data::efc_type` /
/// `Data::efc_id`, where `efc_id` holds the index into `Data::contacts`.
#[derive(Debug, Clone, PartialEq)]
pub struct Contact {
    /// Contact position in world frame.
    pub pos: Vector3<f64>,
    /// Contact normal (from geom1 toward geom2, unit vector).
    pub normal: Vector3<f64>,
    /// Penetration depth (positive = penetrating).
    pub depth: f64,
    /// First geometry ID.
    pub geom1: usize,
    /// Second geometry ID.
    pub geom2: usize,
    /// Contact dimension: 1 (frictionless), 3, 4, or 6.
    pub dim: usize,
}

impl Contact {
    /// Create a contact between two geoms. The normal is normalized.
    #[must_use]
    pub fn new(
        pos: Vector3<f64>,
        normal: Vector3<f64>,
        depth: f64,
        geom1: usize,
        geom2: usize,
        dim: usize,
    ) -> Self {
        let n = normal.norm();
        let normal = if n > super::MIN_VAL {
            normal / n
        } else {
            Vector3::z()
        };
        Self {
            pos,
            normal,
            depth,
            geom1,
            geom2,
            dim,
        }
    }
}
