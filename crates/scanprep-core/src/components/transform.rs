use serde::{Deserialize, Serialize};

use crate::math::{EulerRot, Mat4, Quat, Vec3};

/// Order in which Euler angles are applied.
///
/// Rotations happen around fixed world axes in the listed order, so `XYZ`
/// rotates about X first and about Z last (`Rz * Ry * Rx`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EulerOrder {
    #[default]
    XYZ,
    XZY,
    YXZ,
    YZX,
    ZXY,
    ZYX,
}

impl EulerOrder {
    /// Extrinsic glam sequence plus the angles in application order
    fn sequence(self, angles: Vec3) -> (EulerRot, f32, f32, f32) {
        let Vec3 { x, y, z } = angles;
        match self {
            EulerOrder::XYZ => (EulerRot::XYZEx, x, y, z),
            EulerOrder::XZY => (EulerRot::XZYEx, x, z, y),
            EulerOrder::YXZ => (EulerRot::YXZEx, y, x, z),
            EulerOrder::YZX => (EulerRot::YZXEx, y, z, x),
            EulerOrder::ZXY => (EulerRot::ZXYEx, z, x, y),
            EulerOrder::ZYX => (EulerRot::ZYXEx, z, y, x),
        }
    }
}

/// Rotation in whichever representation the object currently uses
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Rotation {
    Quaternion(Quat),
    /// Angles in radians, indexed by axis (x, y, z) regardless of order
    Euler { order: EulerOrder, angles: Vec3 },
    AxisAngle { axis: Vec3, angle: f32 },
}

impl Rotation {
    /// Convert to a unit quaternion without changing the orientation
    pub fn to_quat(&self) -> Quat {
        match *self {
            Rotation::Quaternion(q) => q,
            Rotation::Euler { order, angles } => {
                let (euler, a, b, c) = order.sequence(angles);
                Quat::from_euler(euler, a, b, c)
            }
            Rotation::AxisAngle { axis, angle } => match axis.try_normalize() {
                Some(axis) => Quat::from_axis_angle(axis, angle),
                None => Quat::IDENTITY,
            },
        }
    }

    pub fn is_quaternion(&self) -> bool {
        matches!(self, Rotation::Quaternion(_))
    }
}

impl Default for Rotation {
    fn default() -> Self {
        Rotation::Quaternion(Quat::IDENTITY)
    }
}

/// 3D Transform component
/// Represents position, rotation and scale in 3D space
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Rotation,
    pub scale: Vec3,
}

impl Transform {
    /// Create a new Transform with specified values
    pub fn new(position: Vec3, rotation: Rotation, scale: Vec3) -> Self {
        Self {
            position,
            rotation,
            scale,
        }
    }

    /// Create an identity transform (no translation, rotation, or scale)
    pub fn identity() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Rotation::default(),
            scale: Vec3::ONE,
        }
    }

    /// Create a transform with only position
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::identity()
        }
    }

    /// Create a transform with only scale
    pub fn from_scale(scale: Vec3) -> Self {
        Self {
            scale,
            ..Self::identity()
        }
    }

    /// Current orientation as a quaternion
    pub fn quat(&self) -> Quat {
        self.rotation.to_quat()
    }

    /// Convert to a 4x4 transformation matrix
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.quat(), self.position)
    }

    /// Switch the rotation representation to quaternion form
    pub fn use_quaternion_mode(&mut self) {
        if !self.rotation.is_quaternion() {
            self.rotation = Rotation::Quaternion(self.quat());
        }
    }

    /// Pre-multiply a world-space rotation onto the current orientation
    pub fn apply_rotation(&mut self, rotation: Quat) {
        self.use_quaternion_mode();
        self.rotation = Rotation::Quaternion((rotation * self.quat()).normalize());
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}
