pub mod camera;

use glam::{EulerRot, Quat};

/// A scene-graph node whose orientation can be driven from outside.
///
/// Orientation is stored as a quaternion; the rotation order only affects
/// how that orientation is decomposed into Euler angles.
pub trait RotationTarget {
    fn quaternion(&self) -> Quat;

    /// Overwrite the node's orientation.
    fn set_quaternion(&mut self, quaternion: Quat);

    fn rotation_order(&self) -> EulerRot;

    /// Change the Euler decomposition order, keeping the orientation.
    fn set_rotation_order(&mut self, order: EulerRot);
}
