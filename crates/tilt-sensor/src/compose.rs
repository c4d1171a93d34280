//! Device angles to camera rotation.
//!
//! The device reports intrinsic Z-X'-Y'' angles (alpha, beta, gamma). The
//! scene is right-handed and Y-up, so the same rotation is expressed as a
//! Y-X-Z Euler with gamma negated. The camera then looks out of the back of
//! the device, and the screen rotation is undone about the view axis.

use glam::{EulerRot, Quat, Vec3};
use std::f32::consts::FRAC_1_SQRT_2;

/// -90° about X: the camera looks out of the back of the device, not the top.
pub const BACK_CAMERA: Quat = Quat::from_xyzw(-FRAC_1_SQRT_2, 0.0, 0.0, FRAC_1_SQRT_2);

/// Rotation of the device frame. All angles in radians.
pub fn device_frame(alpha: f32, beta: f32, gamma: f32) -> Quat {
    // 'ZXY' for the device, but 'YXZ' for the scene.
    Quat::from_euler(EulerRot::YXZ, alpha, beta, -gamma)
}

/// Counter-rotation about the view axis for the current screen rotation.
pub fn screen_correction(orient: f32) -> Quat {
    Quat::from_axis_angle(Vec3::Z, -orient)
}

/// Camera rotation for a device held at `alpha`, `beta`, `gamma` with the
/// screen rotated by `orient`. All angles in radians.
///
/// The product is not re-normalized.
pub fn device_quaternion(alpha: f32, beta: f32, gamma: f32, orient: f32) -> Quat {
    device_frame(alpha, beta, gamma) * BACK_CAMERA * screen_correction(orient)
}
