use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Orientation controls.
    pub controls: ControlsConfig,
    /// Camera projection.
    pub camera: CameraConfig,
    /// Synthetic sensor feed used when no handset is attached.
    pub simulation: SimulationConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlsConfig {
    /// Heading calibration added to alpha, in degrees. Stored in degrees
    /// for readability; the controls hold it in radians.
    pub alpha_offset_deg: f64,
    /// Whether the host gates motion sensors behind a permission prompt.
    pub require_permission: bool,
    /// Outcome of the simulated permission prompt.
    pub grant_permission: bool,
}

impl Default for ControlsConfig {
    fn default() -> Self {
        Self {
            alpha_offset_deg: 0.0,
            require_permission: false,
            grant_permission: true,
        }
    }
}

impl ControlsConfig {
    pub fn alpha_offset_rad(&self) -> f64 {
        self.alpha_offset_deg.to_radians()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Vertical field of view in degrees.
    pub fov_y_degrees: f32,
    /// Aspect ratio (width / height).
    pub aspect_ratio: f32,
    /// Near clipping plane.
    pub near: f32,
    /// Far clipping plane.
    pub far: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_y_degrees: 75.0,
            aspect_ratio: 9.0 / 16.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Synthetic device-orientation events per second.
    pub rate_hz: f32,
    /// Frames per second at which the controls are updated.
    pub frame_rate_hz: f32,
    /// Seconds for one full alpha sweep.
    pub sweep_period_secs: f32,
    /// Cycle the screen through portrait/landscape once per sweep.
    pub rotate_screen: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            rate_hz: 50.0,
            frame_rate_hz: 60.0,
            sweep_period_secs: 20.0,
            rotate_screen: false,
        }
    }
}
