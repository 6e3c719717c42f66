//! Enumerations and flag constants shared by Model, Data, and the sensor stages.
//!
//! Naming follows MuJoCo (`mjtObj`, `mjtJoint`, `mjtGeom`, `mjtSensor`,
//! `mjtConstraint`, `mjtDisableBit`) so that values map one-to-one onto the
//! reference engine's documentation.

use super::quantities::Quantities;

/// Joint type (matches MuJoCo's `mjtJoint`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MjJointType {
    /// Free joint: 7 qpos (position + quaternion), 6 DOFs.
    Free,
    /// Ball joint: 4 qpos (quaternion), 3 DOFs.
    Ball,
    /// Prismatic joint: 1 qpos, 1 DOF.
    Slide,
    /// Revolute joint: 1 qpos, 1 DOF.
    #[default]
    Hinge,
}

impl MjJointType {
    /// Number of position coordinates.
    #[must_use]
    pub const fn nq(self) -> usize {
        match self {
            Self::Free => 7,
            Self::Ball => 4,
            Self::Slide | Self::Hinge => 1,
        }
    }

    /// Number of degrees of freedom.
    #[must_use]
    pub const fn nv(self) -> usize {
        match self {
            Self::Free => 6,
            Self::Ball => 3,
            Self::Slide | Self::Hinge => 1,
        }
    }

    /// True for the scalar joints (hinge/slide).
    #[must_use]
    pub const fn is_scalar(self) -> bool {
        matches!(self, Self::Slide | Self::Hinge)
    }
}

/// Geometric primitive type (matches MuJoCo's `mjtGeom`).
///
/// Also used for site shapes, which define sensor zones for touch sensors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GeomType {
    /// Infinite (or `size[0..2]`-bounded) plane, normal along local +Z.
    Plane,
    /// Sphere, `size[0]` = radius.
    #[default]
    Sphere,
    /// Capsule along local Z, `size[0]` = radius, `size[1]` = half-length.
    Capsule,
    /// Ellipsoid, `size` = radii.
    Ellipsoid,
    /// Cylinder along local Z, `size[0]` = radius, `size[1]` = half-length.
    Cylinder,
    /// Box, `size` = half-extents.
    Box,
    /// Triangle mesh. Not ray-castable here.
    Mesh,
}

/// Object type a sensor is attached to (subset of MuJoCo's `mjtObj`).
///
/// `Body` refers to the body's inertial frame (`xipos`/`ximat`), `XBody`
/// to the body frame (`xpos`/`xmat`), matching MuJoCo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MjObjectType {
    /// No object (world-relative).
    #[default]
    None,
    /// Body, inertial frame.
    Body,
    /// Body, body frame.
    XBody,
    /// Joint.
    Joint,
    /// Geom.
    Geom,
    /// Site.
    Site,
    /// Actuator.
    Actuator,
    /// Tendon.
    Tendon,
}

impl MjObjectType {
    /// True for object types that carry a spatial frame.
    #[must_use]
    pub const fn is_frame(self) -> bool {
        matches!(self, Self::Body | Self::XBody | Self::Geom | Self::Site)
    }
}

/// Constraint row type (matches MuJoCo's `mjtConstraint`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConstraintType {
    /// Equality constraint.
    Equality,
    /// DOF friction loss.
    FrictionDof,
    /// Tendon friction loss.
    FrictionTendon,
    /// Joint limit.
    LimitJoint,
    /// Tendon limit.
    LimitTendon,
    /// Frictionless contact (1 row).
    ContactFrictionless,
    /// Pyramidal friction cone (`2 * (condim - 1)` rows).
    ContactPyramidal,
    /// Elliptic friction cone (`condim` rows).
    ContactElliptic,
}

impl ConstraintType {
    /// True for any contact row type.
    #[must_use]
    pub const fn is_contact(self) -> bool {
        matches!(
            self,
            Self::ContactFrictionless | Self::ContactPyramidal | Self::ContactElliptic
        )
    }
}

/// Actuator transmission type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActuatorTransmission {
    /// Acts on a hinge/slide joint.
    #[default]
    Joint,
    /// Acts on a tendon.
    Tendon,
}

/// Pipeline stage a sensor is evaluated in.
///
/// Mirrors MuJoCo's `mjSTAGE_POS/VEL/ACC`: each stage reads only quantities
/// produced by the dynamics stages up to and including it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SensorStage {
    /// Position stage (after forward kinematics).
    Pos,
    /// Velocity stage (after velocity kinematics).
    Vel,
    /// Acceleration stage (after the constraint solve).
    Acc,
}

impl SensorStage {
    /// All stages, in pipeline order.
    pub const ALL: [Self; 3] = [Self::Pos, Self::Vel, Self::Acc];
}

/// Value kind of a sensor's output, used by cutoff post-processing
/// (MuJoCo's `mjtDataType`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MjSensorDataKind {
    /// Real-valued, clamped symmetrically.
    Real,
    /// Non-negative, clamped from above only.
    Positive,
    /// Unit axis, never clamped.
    Axis,
    /// Unit quaternion, never clamped.
    Quaternion,
}

/// Sensor type (MuJoCo's `mjtSensor`).
///
/// The enum is closed over every type the model format knows about.
/// Whether a type can actually be computed is decided by
/// [`MjSensorType::extractor`]; types without one read as zero.
/// `Unknown` carries the raw type code of a sensor from a newer model
/// format and is always unsupported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MjSensorType {
    // ========== Common robotic sensors ==========
    /// Sum of normal contact forces inside the site zone (1D).
    #[default]
    Touch,
    /// Proper acceleration in the site frame (3D).
    Accelerometer,
    /// Linear velocity in the site frame (3D).
    Velocimeter,
    /// Angular velocity in the site frame (3D).
    Gyro,
    /// Interaction force in the site frame (3D).
    Force,
    /// Interaction torque about the site, in the site frame (3D).
    Torque,
    /// Global magnetic field in the site frame (3D).
    Magnetometer,
    /// Distance along the site's +Z axis to the nearest geom, -1 if none (1D).
    Rangefinder,
    /// Projection of a site onto a camera image plane (2D).
    CamProjection,

    // ========== Joint, tendon, actuator scalars ==========
    /// Hinge/slide joint position (1D).
    JointPos,
    /// Hinge/slide joint velocity (1D).
    JointVel,
    /// Tendon length (1D).
    TendonPos,
    /// Tendon velocity (1D).
    TendonVel,
    /// Actuator length (1D).
    ActuatorPos,
    /// Actuator velocity (1D).
    ActuatorVel,
    /// Actuator force (1D).
    ActuatorFrc,
    /// Actuator activation state; 0 for stateless actuators (1D).
    ActuatorAct,
    /// Actuator force projected on a hinge/slide joint (1D).
    JointActuatorFrc,
    /// Actuator force projected on a tendon (1D).
    TendonActuatorFrc,
    /// Ball joint orientation `[w, x, y, z]` (4D).
    BallQuat,
    /// Ball joint angular velocity (3D).
    BallAngVel,
    /// Joint limit distance minus margin while the limit is active (1D).
    JointLimitPos,
    /// Joint limit constraint velocity while active (1D).
    JointLimitVel,
    /// Joint limit constraint force while active (1D).
    JointLimitFrc,
    /// Tendon limit distance minus margin while the limit is active (1D).
    TendonLimitPos,
    /// Tendon limit constraint velocity while active (1D).
    TendonLimitVel,
    /// Tendon limit constraint force while active (1D).
    TendonLimitFrc,

    // ========== Frame sensors ==========
    /// Frame position, optionally in a reference frame (3D).
    FramePos,
    /// Frame orientation `[w, x, y, z]`, optionally relative to a reference (4D).
    FrameQuat,
    /// Frame X axis (3D).
    FrameXAxis,
    /// Frame Y axis (3D).
    FrameYAxis,
    /// Frame Z axis (3D).
    FrameZAxis,
    /// Frame linear velocity (3D).
    FrameLinVel,
    /// Frame angular velocity (3D).
    FrameAngVel,
    /// Frame linear acceleration (3D).
    FrameLinAcc,
    /// Frame angular acceleration (3D).
    FrameAngAcc,

    // ========== Subtree sensors ==========
    /// Subtree center of mass (3D).
    SubtreeCom,
    /// Subtree center-of-mass velocity (3D).
    SubtreeLinVel,
    /// Subtree angular momentum about its center of mass (3D).
    SubtreeAngMom,

    // ========== Geometric / contact queries ==========
    /// Whether an object lies inside a site volume (1D).
    InsideSite,
    /// Signed distance between two geoms or bodies (1D).
    GeomDist,
    /// Normal of the closest-point segment between two geoms (3D).
    GeomNormal,
    /// Closest-point segment between two geoms (6D).
    GeomFromTo,
    /// Contact report with user-selected fields (variable).
    Contact,
    /// Tactile array on a mesh (variable).
    Tactile,

    // ========== Global ==========
    /// Potential energy (1D).
    EPotential,
    /// Kinetic energy (1D).
    EKinetic,
    /// Simulation time (1D).
    Clock,

    // ========== Extension points ==========
    /// Plugin-computed sensor (variable).
    Plugin,
    /// User-defined sensor (variable).
    User,
    /// Type code not known to this build.
    Unknown(u16),
}

impl MjSensorType {
    /// Natural output width, or `None` when the width is declared by the model
    /// (plugin, user, contact, tactile, unknown).
    #[must_use]
    pub const fn dim(self) -> Option<usize> {
        match self {
            Self::Touch
            | Self::Rangefinder
            | Self::JointPos
            | Self::JointVel
            | Self::TendonPos
            | Self::TendonVel
            | Self::ActuatorPos
            | Self::ActuatorVel
            | Self::ActuatorFrc
            | Self::ActuatorAct
            | Self::JointActuatorFrc
            | Self::TendonActuatorFrc
            | Self::JointLimitPos
            | Self::JointLimitVel
            | Self::JointLimitFrc
            | Self::TendonLimitPos
            | Self::TendonLimitVel
            | Self::TendonLimitFrc
            | Self::InsideSite
            | Self::GeomDist
            | Self::EPotential
            | Self::EKinetic
            | Self::Clock => Some(1),

            Self::CamProjection => Some(2),

            Self::Accelerometer
            | Self::Velocimeter
            | Self::Gyro
            | Self::Force
            | Self::Torque
            | Self::Magnetometer
            | Self::BallAngVel
            | Self::FramePos
            | Self::FrameXAxis
            | Self::FrameYAxis
            | Self::FrameZAxis
            | Self::FrameLinVel
            | Self::FrameAngVel
            | Self::FrameLinAcc
            | Self::FrameAngAcc
            | Self::SubtreeCom
            | Self::SubtreeLinVel
            | Self::SubtreeAngMom
            | Self::GeomNormal => Some(3),

            Self::BallQuat | Self::FrameQuat => Some(4),

            Self::GeomFromTo => Some(6),

            Self::Contact | Self::Tactile | Self::Plugin | Self::User | Self::Unknown(_) => None,
        }
    }

    /// Pipeline stage in which the sensor is computed.
    ///
    /// Unknown and extension types are placed in the acceleration stage, the
    /// last one, so that everything they might read is available.
    #[must_use]
    pub const fn stage(self) -> SensorStage {
        match self {
            Self::Magnetometer
            | Self::Rangefinder
            | Self::CamProjection
            | Self::JointPos
            | Self::TendonPos
            | Self::ActuatorPos
            | Self::ActuatorAct
            | Self::BallQuat
            | Self::JointLimitPos
            | Self::TendonLimitPos
            | Self::FramePos
            | Self::FrameQuat
            | Self::FrameXAxis
            | Self::FrameYAxis
            | Self::FrameZAxis
            | Self::SubtreeCom
            | Self::InsideSite
            | Self::GeomDist
            | Self::GeomNormal
            | Self::GeomFromTo
            | Self::EPotential
            | Self::Clock => SensorStage::Pos,

            Self::Velocimeter
            | Self::Gyro
            | Self::JointVel
            | Self::TendonVel
            | Self::ActuatorVel
            | Self::BallAngVel
            | Self::JointLimitVel
            | Self::TendonLimitVel
            | Self::FrameLinVel
            | Self::FrameAngVel
            | Self::SubtreeLinVel
            | Self::SubtreeAngMom
            | Self::EKinetic => SensorStage::Vel,

            Self::Touch
            | Self::Accelerometer
            | Self::Force
            | Self::Torque
            | Self::ActuatorFrc
            | Self::JointActuatorFrc
            | Self::TendonActuatorFrc
            | Self::JointLimitFrc
            | Self::TendonLimitFrc
            | Self::FrameLinAcc
            | Self::FrameAngAcc
            | Self::Contact
            | Self::Tactile
            | Self::Plugin
            | Self::User
            | Self::Unknown(_) => SensorStage::Acc,
        }
    }

    /// Whether this is a `Frame*` sensor, the only kind that accepts a
    /// reference frame.
    #[must_use]
    pub const fn is_frame_sensor(self) -> bool {
        matches!(
            self,
            Self::FramePos
                | Self::FrameQuat
                | Self::FrameXAxis
                | Self::FrameYAxis
                | Self::FrameZAxis
                | Self::FrameLinVel
                | Self::FrameAngVel
                | Self::FrameLinAcc
                | Self::FrameAngAcc
        )
    }

    /// Value kind used by cutoff post-processing.
    #[must_use]
    pub const fn data_kind(self) -> MjSensorDataKind {
        match self {
            Self::Touch
            | Self::Rangefinder
            | Self::JointLimitFrc
            | Self::TendonLimitFrc => MjSensorDataKind::Positive,
            Self::FrameXAxis | Self::FrameYAxis | Self::FrameZAxis | Self::GeomNormal => {
                MjSensorDataKind::Axis
            }
            Self::BallQuat | Self::FrameQuat => MjSensorDataKind::Quaternion,
            _ => MjSensorDataKind::Real,
        }
    }

    /// Quantities the sensor reads from `Data`, whatever it is attached to.
    ///
    /// The forward-dynamics stage must have populated all of them before the
    /// sensor's stage runs. Types without an extractor read nothing. Frame
    /// sensors on a `Body` object or reference also read the inertial frames;
    /// see [`SensorDescriptor::reads`](crate::SensorDescriptor::reads).
    #[must_use]
    pub const fn reads(self) -> Quantities {
        match self {
            Self::JointPos | Self::BallQuat => Quantities::QPOS,
            Self::JointVel | Self::BallAngVel => Quantities::QVEL,
            Self::TendonPos => Quantities::TENDON_LENGTH,
            Self::TendonVel => Quantities::TENDON_VELOCITY,
            Self::ActuatorPos => Quantities::ACTUATOR_LENGTH,
            Self::ActuatorVel => Quantities::ACTUATOR_VELOCITY,
            Self::ActuatorFrc | Self::JointActuatorFrc => Quantities::ACTUATOR_FORCE,
            Self::ActuatorAct => Quantities::ACT,
            Self::JointLimitPos
            | Self::JointLimitVel
            | Self::JointLimitFrc
            | Self::TendonLimitPos
            | Self::TendonLimitVel
            | Self::TendonLimitFrc => Quantities::CONSTRAINT,
            Self::Clock => Quantities::TIME,
            Self::Magnetometer
            | Self::FramePos
            | Self::FrameQuat
            | Self::FrameXAxis
            | Self::FrameYAxis
            | Self::FrameZAxis => Quantities::FRAMES,
            Self::Rangefinder => Quantities::FRAMES,
            Self::SubtreeCom => Quantities::SUBTREE_COM,
            Self::Gyro | Self::Velocimeter | Self::FrameLinVel | Self::FrameAngVel => {
                Quantities::FRAMES.union(Quantities::CVEL)
            }
            Self::SubtreeLinVel | Self::SubtreeAngMom => Quantities::FRAMES
                .union(Quantities::INERTIAL)
                .union(Quantities::SUBTREE_COM)
                .union(Quantities::CVEL),
            Self::Accelerometer | Self::FrameLinAcc | Self::FrameAngAcc => Quantities::FRAMES
                .union(Quantities::CVEL)
                .union(Quantities::CACC),
            Self::Force | Self::Torque => Quantities::FRAMES.union(Quantities::CFRC_INT),
            Self::Touch => Quantities::FRAMES
                .union(Quantities::CONTACT)
                .union(Quantities::CONSTRAINT),
            _ => Quantities::empty(),
        }
    }
}

// ── Disable flags (mjtDisableBit) ──
// Bit positions match MuJoCo. Bit set = subsystem disabled.
// Default: all bits clear (disableflags = 0).

/// Zero gravity in the dynamics stage.
pub const DISABLE_GRAVITY: u32 = 1 << 7;
/// Skip all sensor evaluation. `sensordata` is left untouched.
pub const DISABLE_SENSOR: u32 = 1 << 13;

/// Minimum meaningful value; magnitudes below this are treated as zero.
/// Matches MuJoCo's `mjMINVAL`.
pub const MIN_VAL: f64 = 1e-15;
