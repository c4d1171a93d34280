use crate::permission::MotionPermission;
use crate::types::{RawOrientationSample, ScreenOrientation};
use std::sync::Arc;
use tokio::sync::watch;

/// Event source for device-orientation and screen-orientation changes.
///
/// The platform layer dispatches events here; listeners hold a
/// [`Subscription`] and see only the most recent value. Cheap to clone.
#[derive(Clone)]
pub struct OrientationHost {
    inner: Arc<HostInner>,
}

struct HostInner {
    device_tx: watch::Sender<RawOrientationSample>,
    screen_tx: watch::Sender<ScreenOrientation>,
    permission: Option<Arc<dyn MotionPermission>>,
}

impl Default for OrientationHost {
    fn default() -> Self {
        Self::new()
    }
}

impl OrientationHost {
    /// A host that delivers sensor events without asking for permission.
    pub fn new() -> Self {
        Self::build(None)
    }

    /// A host that requires `permission` before delivering sensor events.
    pub fn with_permission(permission: impl MotionPermission + 'static) -> Self {
        Self::build(Some(Arc::new(permission)))
    }

    fn build(permission: Option<Arc<dyn MotionPermission>>) -> Self {
        let (device_tx, _) = watch::channel(RawOrientationSample::default());
        let (screen_tx, _) = watch::channel(ScreenOrientation::default());
        Self {
            inner: Arc::new(HostInner {
                device_tx,
                screen_tx,
                permission,
            }),
        }
    }

    /// Deliver a device-orientation event.
    pub fn dispatch_device_orientation(&self, sample: RawOrientationSample) {
        self.inner.device_tx.send_replace(sample);
    }

    /// Deliver a screen-orientation change.
    pub fn dispatch_screen_orientation(&self, orientation: ScreenOrientation) {
        self.inner.screen_tx.send_replace(orientation);
    }

    /// Current screen rotation, queryable at any time.
    pub fn screen_orientation(&self) -> ScreenOrientation {
        *self.inner.screen_tx.borrow()
    }

    pub fn permission(&self) -> Option<Arc<dyn MotionPermission>> {
        self.inner.permission.clone()
    }

    /// Listen for device-orientation events dispatched from now on.
    pub fn subscribe_device_orientation(&self) -> Subscription<RawOrientationSample> {
        Subscription {
            rx: self.inner.device_tx.subscribe(),
        }
    }

    /// Listen for screen-orientation changes dispatched from now on.
    pub fn subscribe_screen_orientation(&self) -> Subscription<ScreenOrientation> {
        Subscription {
            rx: self.inner.screen_tx.subscribe(),
        }
    }

    pub fn device_listener_count(&self) -> usize {
        self.inner.device_tx.receiver_count()
    }

    pub fn screen_listener_count(&self) -> usize {
        self.inner.screen_tx.receiver_count()
    }
}

/// A live listener registration. Dropping it unsubscribes.
pub struct Subscription<T> {
    rx: watch::Receiver<T>,
}

impl<T: Copy> Subscription<T> {
    /// The newest event since the last call, if any arrived.
    pub fn latest(&mut self) -> Option<T> {
        match self.rx.has_changed() {
            Ok(true) => Some(*self.rx.borrow_and_update()),
            _ => None,
        }
    }

    /// Wait for the next event. Returns `false` once the host is gone.
    pub async fn changed(&mut self) -> bool {
        self.rx.changed().await.is_ok()
    }
}
