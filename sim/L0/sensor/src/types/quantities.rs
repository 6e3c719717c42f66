//! Read-set flags describing which `Data` quantities a sensor depends on.
//!
//! The forward-dynamics stage marks what it has filled via
//! [`Data::mark_populated`](super::Data::mark_populated); the registry can then
//! report any quantity a declared sensor needs that was never produced.

use bitflags::bitflags;

bitflags! {
    /// Simulation quantities consumed by sensors.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct Quantities: u32 {
        /// Generalized positions `qpos`.
        const QPOS              = 1 << 0;
        /// Generalized velocities `qvel`.
        const QVEL              = 1 << 1;
        /// Generalized accelerations `qacc`.
        const QACC              = 1 << 2;
        /// Actuator activations `act`.
        const ACT               = 1 << 3;
        /// Simulation time.
        const TIME              = 1 << 4;
        /// Body, geom and site world frames (`xpos`, `xquat`, `xmat`, ...).
        const FRAMES            = 1 << 5;
        /// Inertial frames `xipos`/`ximat`.
        const INERTIAL          = 1 << 6;
        /// Subtree centers of mass and masses.
        const SUBTREE_COM       = 1 << 7;
        /// Body spatial velocities `cvel`.
        const CVEL              = 1 << 8;
        /// Body spatial accelerations `cacc`.
        const CACC              = 1 << 9;
        /// Body interaction wrenches `cfrc_int`.
        const CFRC_INT          = 1 << 10;
        /// Actuator lengths.
        const ACTUATOR_LENGTH   = 1 << 11;
        /// Actuator velocities.
        const ACTUATOR_VELOCITY = 1 << 12;
        /// Actuator forces and their joint-space projection `qfrc_actuator`.
        const ACTUATOR_FORCE    = 1 << 13;
        /// Tendon lengths.
        const TENDON_LENGTH     = 1 << 14;
        /// Tendon velocities.
        const TENDON_VELOCITY   = 1 << 15;
        /// Constraint rows `efc_*` after the solve.
        const CONSTRAINT        = 1 << 16;
        /// Contact list.
        const CONTACT           = 1 << 17;
    }
}

impl Quantities {
    /// Everything produced by the position stage.
    pub const POSITION_STAGE: Self = Self::from_bits_truncate(
        Self::QPOS.bits()
            | Self::TIME.bits()
            | Self::FRAMES.bits()
            | Self::INERTIAL.bits()
            | Self::SUBTREE_COM.bits()
            | Self::ACTUATOR_LENGTH.bits()
            | Self::TENDON_LENGTH.bits()
            | Self::ACT.bits(),
    );

    /// Everything produced by the velocity stage.
    pub const VELOCITY_STAGE: Self = Self::from_bits_truncate(
        Self::QVEL.bits()
            | Self::CVEL.bits()
            | Self::ACTUATOR_VELOCITY.bits()
            | Self::TENDON_VELOCITY.bits(),
    );

    /// Everything produced by the acceleration stage.
    pub const ACCELERATION_STAGE: Self = Self::from_bits_truncate(
        Self::QACC.bits()
            | Self::CACC.bits()
            | Self::CFRC_INT.bits()
            | Self::ACTUATOR_FORCE.bits()
            | Self::CONSTRAINT.bits()
            | Self::CONTACT.bits(),
    );
}

impl Default for Quantities {
    fn default() -> Self {
        Self::empty()
    }
}
