//! Device-orientation controls: turn handset orientation readings into a
//! camera rotation for a right-handed, Y-up scene.

pub mod compose;
pub mod controls;
pub mod host;
pub mod permission;
pub mod sim;
pub mod types;

pub use controls::OrientationControls;
pub use host::{OrientationHost, Subscription};
pub use permission::{MotionPermission, PermissionError, PermissionState, StaticPermission};
pub use sim::{tick_period, SimulatedDevice, Sweep};
pub use types::{RawOrientationSample, ScreenOrientation};
