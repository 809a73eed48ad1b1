use glam::{Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// World up axis.
pub const UP: Vec3 = Vec3::Y;

/// Canonical forward axis of an unrotated model.
pub const FORWARD: Vec3 = Vec3::NEG_Z;

/// Canonical right axis of an unrotated model.
pub const RIGHT: Vec3 = Vec3::X;

/// Placement of a rigid object: where it is and which way it faces.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub position: Vec3,
    pub rotation: Quat,
}

impl Default for Pose {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
        }
    }
}

impl Pose {
    pub fn new(position: Vec3, rotation: Quat) -> Self {
        Self { position, rotation }
    }

    /// Direction the object is facing in world space.
    pub fn forward(&self) -> Vec3 {
        self.rotation * FORWARD
    }

    /// World matrix: rotate about the local origin, then translate.
    pub fn world_matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.rotation, self.position)
    }
}

/// Signed heading about `UP`, in radians, of a rotation that only yaws.
///
/// Measured from `FORWARD`; positive turns toward -X (counter-clockwise
/// seen from above). Range is (-pi, pi].
pub fn yaw_of(rotation: Quat) -> f32 {
    let dir = rotation * FORWARD;
    // atan2 of the forward vector projected on the ground plane
    (-dir.x).atan2(-dir.z)
}
