/// Latest device-orientation reading, in degrees.
///
/// Hosts may leave any field unset when the sensor has no value for it.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RawOrientationSample {
    /// Heading about the device's vertical (Z) axis.
    pub alpha: Option<f64>,
    /// Front-to-back tilt (X').
    pub beta: Option<f64>,
    /// Left-to-right tilt (Y'').
    pub gamma: Option<f64>,
}

impl RawOrientationSample {
    pub fn new(alpha: f64, beta: f64, gamma: f64) -> Self {
        Self {
            alpha: Some(alpha),
            beta: Some(beta),
            gamma: Some(gamma),
        }
    }

    /// A reading with only some axes reported.
    pub fn partial(alpha: Option<f64>, beta: Option<f64>, gamma: Option<f64>) -> Self {
        Self { alpha, beta, gamma }
    }

    pub fn is_empty(&self) -> bool {
        self.alpha.is_none() && self.beta.is_none() && self.gamma.is_none()
    }
}

/// Rotation of the displayed UI relative to the device's natural
/// orientation, in degrees (0, 90, 180, -90).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScreenOrientation(pub f64);

impl ScreenOrientation {
    pub const PORTRAIT: Self = Self(0.0);
    pub const LANDSCAPE_LEFT: Self = Self(90.0);
    pub const PORTRAIT_UPSIDE_DOWN: Self = Self(180.0);
    pub const LANDSCAPE_RIGHT: Self = Self(-90.0);

    pub fn radians(self) -> f64 {
        to_radians(Some(self.0)).unwrap_or(0.0)
    }
}

/// Degrees to radians. Unset and NaN readings have no value.
pub(crate) fn to_radians(degrees: Option<f64>) -> Option<f64> {
    degrees.filter(|d| !d.is_nan()).map(f64::to_radians)
}
