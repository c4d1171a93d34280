use crate::compose;
use crate::host::{OrientationHost, Subscription};
use crate::permission::{MotionPermission, PermissionError, PermissionResult, PermissionState};
use crate::types::{to_radians, RawOrientationSample, ScreenOrientation};
use glam::EulerRot;
use std::sync::Arc;
use tilt_scene::RotationTarget;
use tokio::sync::oneshot;
use tokio::sync::oneshot::error::TryRecvError;
use tracing::{debug, error, info, warn};

/// Drives an object's rotation from device-orientation events.
///
/// Call [`connect`](Self::connect) once, then [`update`](Self::update) every
/// frame. Each update overwrites the object's quaternion with the rotation
/// for the latest reading; nothing is filtered or smoothed.
pub struct OrientationControls<T: RotationTarget> {
    object: T,
    host: OrientationHost,
    /// When false, `update` leaves the object untouched.
    pub enabled: bool,
    /// Heading calibration in radians, added to alpha.
    pub alpha_offset: f64,
    device_orientation: RawOrientationSample,
    screen_orientation: ScreenOrientation,
    device_events: Option<Subscription<RawOrientationSample>>,
    screen_events: Option<Subscription<ScreenOrientation>>,
    /// In-flight permission request. Dropping it discards the answer.
    pending_permission: Option<oneshot::Receiver<PermissionResult>>,
    connected: bool,
}

impl<T: RotationTarget> OrientationControls<T> {
    /// Bind to `object`. Its rotation order is switched to YXZ.
    pub fn new(mut object: T, host: OrientationHost) -> Self {
        object.set_rotation_order(EulerRot::YXZ);
        Self {
            object,
            host,
            enabled: true,
            alpha_offset: 0.0,
            device_orientation: RawOrientationSample::default(),
            screen_orientation: ScreenOrientation::default(),
            device_events: None,
            screen_events: None,
            pending_permission: None,
            connected: false,
        }
    }

    pub fn object(&self) -> &T {
        &self.object
    }

    pub fn object_mut(&mut self) -> &mut T {
        &mut self.object
    }

    pub fn into_inner(self) -> T {
        self.object
    }

    pub fn host(&self) -> &OrientationHost {
        &self.host
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Whether a permission prompt is still awaiting its answer.
    pub fn permission_pending(&self) -> bool {
        self.pending_permission.is_some()
    }

    /// Start listening for orientation events. A no-op while connected.
    ///
    /// On hosts that gate motion sensors, the device-orientation listener is
    /// only registered once the permission prompt is granted. The prompt runs
    /// on the current tokio runtime; its answer is applied by the next
    /// [`update`](Self::update) or by [`resolve_permission`](Self::resolve_permission).
    pub fn connect(&mut self) {
        if self.connected {
            debug!("Orientation controls already connected");
            return;
        }
        self.connected = true;

        self.screen_orientation = self.host.screen_orientation();
        self.screen_events = Some(self.host.subscribe_screen_orientation());

        match self.host.permission() {
            Some(permission) => self.request_permission(permission),
            None => self.device_events = Some(self.host.subscribe_device_orientation()),
        }

        self.enabled = true;
        info!(
            screen_orientation = self.screen_orientation.0,
            "Orientation controls connected"
        );
    }

    /// Stop listening. Safe to call when not connected.
    pub fn disconnect(&mut self) {
        self.device_events = None;
        self.screen_events = None;
        if self.pending_permission.take().is_some() {
            debug!("Discarding in-flight permission request");
        }
        if self.connected {
            info!("Orientation controls disconnected");
        }
        self.connected = false;
        self.enabled = false;
    }

    pub fn dispose(&mut self) {
        self.disconnect();
    }

    /// Write the rotation for the latest reading into the object.
    pub fn update(&mut self) {
        if !self.enabled {
            return;
        }
        self.poll_permission();
        self.drain_events();

        let sample = self.device_orientation;
        let alpha = to_radians(sample.alpha).unwrap_or(0.0) + self.alpha_offset; // Z
        let beta = to_radians(sample.beta).unwrap_or(0.0); // X'
        let gamma = to_radians(sample.gamma).unwrap_or(0.0); // Y''
        let orient = self.screen_orientation.radians(); // O

        let quaternion =
            compose::device_quaternion(alpha as f32, beta as f32, gamma as f32, orient as f32);
        self.object.set_quaternion(quaternion);
    }

    /// Set `alpha_offset` so the current heading reads as zero.
    pub fn zero_heading(&mut self) {
        self.drain_events();
        match to_radians(self.device_orientation.alpha) {
            Some(alpha) => {
                self.alpha_offset = -alpha;
                info!(alpha_offset = self.alpha_offset, "Heading zeroed");
            }
            None => debug!("No heading reading yet, offset unchanged"),
        }
    }

    /// Wait for an in-flight permission request and apply its answer.
    pub async fn resolve_permission(&mut self) {
        let Some(pending) = self.pending_permission.take() else {
            return;
        };
        let outcome = pending.await.unwrap_or(Err(PermissionError::Abandoned));
        self.apply_permission(outcome);
    }

    fn request_permission(&mut self, permission: Arc<dyn MotionPermission>) {
        let runtime = match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle,
            Err(_) => {
                self.apply_permission(Err(PermissionError::NoRuntime));
                return;
            }
        };

        let (tx, rx) = oneshot::channel();
        let request = permission.request();
        runtime.spawn(async move {
            // The controls may have disconnected in the meantime.
            let _ = tx.send(request.await);
        });
        self.pending_permission = Some(rx);
        debug!("Motion sensor permission requested");
    }

    fn poll_permission(&mut self) {
        let Some(pending) = self.pending_permission.as_mut() else {
            return;
        };
        let outcome = match pending.try_recv() {
            Ok(outcome) => outcome,
            Err(TryRecvError::Empty) => return,
            Err(TryRecvError::Closed) => Err(PermissionError::Abandoned),
        };
        self.pending_permission = None;
        self.apply_permission(outcome);
    }

    fn apply_permission(&mut self, outcome: PermissionResult) {
        match outcome {
            Ok(PermissionState::Granted) => {
                self.device_events = Some(self.host.subscribe_device_orientation());
                info!("Motion sensor permission granted");
            }
            Ok(PermissionState::Denied) => {
                warn!("Motion sensor permission denied, device orientation unavailable");
            }
            Err(e) => {
                error!(%e, "Unable to use device orientation API");
            }
        }
    }

    fn drain_events(&mut self) {
        if let Some(sample) = self.device_events.as_mut().and_then(Subscription::latest) {
            self.device_orientation = sample;
        }
        if let Some(orientation) = self.screen_events.as_mut().and_then(Subscription::latest) {
            self.screen_orientation = orientation;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compose::BACK_CAMERA;
    use crate::permission::{PermissionFuture, StaticPermission};
    use glam::Quat;
    use std::f32::consts::FRAC_PI_2;
    use std::sync::Mutex;
    use tilt_scene::camera::Camera;

    fn connected(host: &OrientationHost) -> OrientationControls<Camera> {
        let mut controls = OrientationControls::new(Camera::new(), host.clone());
        controls.connect();
        controls
    }

    fn rotation_after(sample: RawOrientationSample, alpha_offset: f64) -> Quat {
        let host = OrientationHost::new();
        let mut controls = connected(&host);
        controls.alpha_offset = alpha_offset;
        host.dispatch_device_orientation(sample);
        controls.update();
        controls.object().quaternion()
    }

    /// A prompt the test answers by hand.
    struct ManualPermission {
        answer: Mutex<Option<oneshot::Receiver<PermissionState>>>,
    }

    impl ManualPermission {
        fn new() -> (Self, oneshot::Sender<PermissionState>) {
            let (tx, rx) = oneshot::channel();
            (
                Self {
                    answer: Mutex::new(Some(rx)),
                },
                tx,
            )
        }
    }

    impl MotionPermission for ManualPermission {
        fn request(&self) -> PermissionFuture {
            let answer = self.answer.lock().unwrap().take();
            Box::pin(async move {
                match answer {
                    Some(rx) => rx.await.map_err(|_| PermissionError::Abandoned),
                    None => Err(PermissionError::RequestFailed("asked twice".into())),
                }
            })
        }
    }

    #[test]
    fn binding_switches_object_to_yxz() {
        let controls = OrientationControls::new(Camera::new(), OrientationHost::new());
        assert_eq!(controls.object().rotation_order(), EulerRot::YXZ);
        assert!(!controls.is_connected());
    }

    #[test]
    fn heading_sample_rotates_about_vertical() {
        let host = OrientationHost::new();
        let mut controls = connected(&host);
        host.dispatch_device_orientation(RawOrientationSample::new(90.0, 0.0, 0.0));
        controls.update();

        let expected = Quat::from_euler(EulerRot::YXZ, FRAC_PI_2, 0.0, 0.0) * BACK_CAMERA;
        assert!(controls.object().quaternion().abs_diff_eq(expected, 1e-6));
    }

    #[test]
    fn no_reading_yet_gives_back_camera() {
        let host = OrientationHost::new();
        let mut controls = connected(&host);
        controls.update();
        assert_eq!(controls.object().quaternion(), BACK_CAMERA);
    }

    #[test]
    fn disabled_controls_leave_object_alone() {
        let host = OrientationHost::new();
        let mut controls = connected(&host);
        host.dispatch_device_orientation(RawOrientationSample::new(10.0, 20.0, 30.0));
        controls.update();
        let before = controls.object().quaternion();

        controls.enabled = false;
        for i in 0..5 {
            host.dispatch_device_orientation(RawOrientationSample::new(i as f64 * 40.0, 5.0, -5.0));
            controls.update();
        }
        assert_eq!(controls.object().quaternion(), before);
    }

    #[test]
    fn latest_sample_wins() {
        let host = OrientationHost::new();
        let mut controls = connected(&host);
        host.dispatch_device_orientation(RawOrientationSample::new(10.0, 20.0, 30.0));
        host.dispatch_device_orientation(RawOrientationSample::new(45.0, 60.0, -15.0));
        controls.update();

        let expected = rotation_after(RawOrientationSample::new(45.0, 60.0, -15.0), 0.0);
        assert_eq!(controls.object().quaternion(), expected);
    }

    #[test]
    fn alpha_offset_adds_to_alpha() {
        let a = rotation_after(RawOrientationSample::new(30.0, 40.0, 10.0), 0.0);
        let b = rotation_after(
            RawOrientationSample::new(10.0, 40.0, 10.0),
            20f64.to_radians(),
        );
        assert!(a.abs_diff_eq(b, 1e-6));

        let c = rotation_after(
            RawOrientationSample::new(0.0, 40.0, 10.0),
            30f64.to_radians(),
        );
        assert!(a.abs_diff_eq(c, 1e-6));
    }

    #[test]
    fn missing_axes_read_as_zero() {
        let partial = rotation_after(RawOrientationSample::partial(None, Some(35.0), None), 0.0);
        let explicit = rotation_after(RawOrientationSample::new(0.0, 35.0, 0.0), 0.0);
        assert_eq!(partial, explicit);

        let nan = rotation_after(RawOrientationSample::new(f64::NAN, 35.0, 0.0), 0.0);
        assert_eq!(nan, explicit);
    }

    #[test]
    fn missing_alpha_still_gets_offset() {
        let offset = 0.5;
        let partial = rotation_after(RawOrientationSample::partial(None, Some(35.0), None), offset);
        let explicit = rotation_after(RawOrientationSample::new(0.0, 35.0, 0.0), offset);
        assert_eq!(partial, explicit);

        let expected = compose::device_quaternion(offset as f32, 35f32.to_radians(), 0.0, 0.0);
        assert!(partial.abs_diff_eq(expected, 1e-6));
    }

    #[test]
    fn screen_rotation_is_compensated() {
        let host = OrientationHost::new();
        let mut controls = connected(&host);
        host.dispatch_screen_orientation(ScreenOrientation::LANDSCAPE_LEFT);
        controls.update();
        let expected = BACK_CAMERA * compose::screen_correction(FRAC_PI_2);
        assert!(controls.object().quaternion().abs_diff_eq(expected, 1e-6));
    }

    #[test]
    fn connect_reads_current_screen_orientation() {
        let host = OrientationHost::new();
        host.dispatch_screen_orientation(ScreenOrientation::LANDSCAPE_LEFT);
        let mut controls = connected(&host);
        controls.update();
        let expected = BACK_CAMERA * compose::screen_correction(FRAC_PI_2);
        assert!(controls.object().quaternion().abs_diff_eq(expected, 1e-6));
    }

    #[test]
    fn connect_twice_subscribes_once() {
        let host = OrientationHost::new();
        let mut controls = connected(&host);
        controls.connect();
        assert_eq!(host.device_listener_count(), 1);
        assert_eq!(host.screen_listener_count(), 1);
    }

    #[test]
    fn disconnect_unsubscribes_and_disables() {
        let host = OrientationHost::new();
        let mut controls = OrientationControls::new(Camera::new(), host.clone());
        controls.disconnect();
        assert!(!controls.enabled);

        controls.connect();
        assert!(controls.enabled);
        controls.dispose();
        assert!(!controls.enabled);
        assert!(!controls.is_connected());
        assert_eq!(host.device_listener_count(), 0);
        assert_eq!(host.screen_listener_count(), 0);
    }

    #[test]
    fn events_while_disconnected_are_missed() {
        let host = OrientationHost::new();
        let mut controls = connected(&host);
        host.dispatch_device_orientation(RawOrientationSample::new(20.0, 30.0, 0.0));
        controls.update();
        let held = controls.object().quaternion();

        controls.disconnect();
        host.dispatch_device_orientation(RawOrientationSample::new(80.0, 10.0, 5.0));
        controls.connect();
        controls.update();
        assert_eq!(controls.object().quaternion(), held);
    }

    #[test]
    fn dropping_controls_unsubscribes() {
        let host = OrientationHost::new();
        let controls = connected(&host);
        let camera = controls.into_inner();
        assert_eq!(camera.rotation_order(), EulerRot::YXZ);
        assert_eq!(host.device_listener_count(), 0);
    }

    #[test]
    fn zero_heading_cancels_current_alpha() {
        let host = OrientationHost::new();
        let mut controls = connected(&host);
        controls.zero_heading();
        assert_eq!(controls.alpha_offset, 0.0);

        host.dispatch_device_orientation(RawOrientationSample::new(75.0, 50.0, 0.0));
        controls.zero_heading();
        controls.update();

        let expected = rotation_after(RawOrientationSample::new(0.0, 50.0, 0.0), 0.0);
        assert!(controls.object().quaternion().abs_diff_eq(expected, 1e-6));
    }

    #[test]
    fn permission_without_runtime_skips_sensor() {
        let host = OrientationHost::with_permission(StaticPermission::granted());
        let mut controls = connected(&host);
        assert!(controls.enabled);
        assert!(!controls.permission_pending());
        assert_eq!(host.device_listener_count(), 0);
        assert_eq!(host.screen_listener_count(), 1);
    }

    #[tokio::test]
    async fn granted_permission_subscribes() {
        let host = OrientationHost::with_permission(StaticPermission::granted());
        let mut controls = connected(&host);
        assert!(controls.enabled);
        assert!(controls.permission_pending());
        assert_eq!(host.device_listener_count(), 0);

        controls.resolve_permission().await;
        assert!(!controls.permission_pending());
        assert_eq!(host.device_listener_count(), 1);

        host.dispatch_device_orientation(RawOrientationSample::new(90.0, 0.0, 0.0));
        controls.update();
        let expected = Quat::from_euler(EulerRot::YXZ, FRAC_PI_2, 0.0, 0.0) * BACK_CAMERA;
        assert!(controls.object().quaternion().abs_diff_eq(expected, 1e-6));
    }

    #[tokio::test]
    async fn update_applies_permission_once_answered() {
        let host = OrientationHost::with_permission(StaticPermission::granted());
        let mut controls = connected(&host);
        for _ in 0..10 {
            tokio::task::yield_now().await;
            controls.update();
            if !controls.permission_pending() {
                break;
            }
        }
        assert_eq!(host.device_listener_count(), 1);
    }

    #[tokio::test]
    async fn denied_permission_leaves_controls_enabled_without_input() {
        let host = OrientationHost::with_permission(StaticPermission::denied());
        let mut controls = connected(&host);
        controls.resolve_permission().await;

        assert!(controls.enabled);
        assert_eq!(host.device_listener_count(), 0);
        host.dispatch_device_orientation(RawOrientationSample::new(45.0, 45.0, 45.0));
        controls.update();
        assert_eq!(controls.object().quaternion(), BACK_CAMERA);
    }

    #[tokio::test]
    async fn failed_permission_request_is_not_fatal() {
        let host = OrientationHost::with_permission(StaticPermission::failing("not allowed"));
        let mut controls = connected(&host);
        controls.resolve_permission().await;
        assert!(controls.enabled);
        assert!(controls.is_connected());
        assert_eq!(host.device_listener_count(), 0);
    }

    #[tokio::test]
    async fn late_grant_after_disconnect_is_ignored() {
        let (permission, answer) = ManualPermission::new();
        let host = OrientationHost::with_permission(permission);
        let mut controls = connected(&host);
        assert!(controls.permission_pending());

        controls.disconnect();
        assert!(!controls.permission_pending());
        let _ = answer.send(PermissionState::Granted);
        for _ in 0..5 {
            tokio::task::yield_now().await;
        }

        controls.enabled = true;
        controls.update();
        assert_eq!(host.device_listener_count(), 0);
    }
}
