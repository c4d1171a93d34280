use crate::RotationTarget;
use glam::{EulerRot, Mat4, Quat, Vec3};
use tilt_config::CameraConfig;

/// Camera for rendering the scene.
///
/// Position is fixed at the origin. Only orientation changes (from the
/// device's orientation sensor). Looks down its local -Z axis with +Y up.
#[derive(Debug, Clone)]
pub struct Camera {
    /// Orientation in world space.
    pub orientation: Quat,
    /// Euler order used when the orientation is read back as angles.
    pub rotation_order: EulerRot,
    /// Vertical field of view in degrees.
    pub fov_y_degrees: f32,
    /// Aspect ratio (width / height).
    pub aspect_ratio: f32,
    /// Near clipping plane.
    pub near: f32,
    /// Far clipping plane.
    pub far: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

impl Camera {
    pub fn new() -> Self {
        Self::from_config(&CameraConfig::default())
    }

    pub fn from_config(config: &CameraConfig) -> Self {
        Self {
            orientation: Quat::IDENTITY,
            rotation_order: EulerRot::XYZ,
            fov_y_degrees: config.fov_y_degrees,
            aspect_ratio: config.aspect_ratio,
            near: config.near,
            far: config.far,
        }
    }

    /// View matrix (inverse of camera world transform).
    pub fn view_matrix(&self) -> Mat4 {
        // Camera is at origin, only rotated.
        Mat4::from_quat(self.orientation.conjugate())
    }

    /// Perspective projection matrix.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(
            self.fov_y_degrees.to_radians(),
            self.aspect_ratio,
            self.near,
            self.far,
        )
    }

    /// World-space viewing direction.
    pub fn forward(&self) -> Vec3 {
        self.orientation * Vec3::NEG_Z
    }

    /// World-space up direction.
    pub fn up(&self) -> Vec3 {
        self.orientation * Vec3::Y
    }

    /// Orientation as Euler angles (radians) in `rotation_order`.
    pub fn euler(&self) -> (f32, f32, f32) {
        self.orientation.to_euler(self.rotation_order)
    }
}

impl RotationTarget for Camera {
    fn quaternion(&self) -> Quat {
        self.orientation
    }

    fn set_quaternion(&mut self, quaternion: Quat) {
        self.orientation = quaternion;
    }

    fn rotation_order(&self) -> EulerRot {
        self.rotation_order
    }

    fn set_rotation_order(&mut self, order: EulerRot) {
        self.rotation_order = order;
    }
}
