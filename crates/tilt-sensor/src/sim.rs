use crate::host::OrientationHost;
use crate::types::{RawOrientationSample, ScreenOrientation};
use std::f64::consts::TAU;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;

/// Slow synthetic handset motion.
#[derive(Debug, Clone, Copy)]
pub struct Sweep {
    /// Seconds for one full turn of heading.
    pub period_secs: f64,
    /// Step the screen through all four rotations once per period.
    pub rotate_screen: bool,
}

impl Sweep {
    /// Reading and screen rotation `elapsed` seconds into the sweep.
    pub fn sample_at(&self, elapsed: f64) -> (RawOrientationSample, ScreenOrientation) {
        let phase = (elapsed / self.period_secs.max(f64::EPSILON)).fract();
        let sample = RawOrientationSample::new(
            360.0 * phase,
            60.0 + 20.0 * (2.0 * TAU * phase).sin(),
            15.0 * (3.0 * TAU * phase).sin(),
        );
        let screen = if self.rotate_screen {
            match (phase * 4.0) as u32 {
                0 => ScreenOrientation::PORTRAIT,
                1 => ScreenOrientation::LANDSCAPE_LEFT,
                2 => ScreenOrientation::PORTRAIT_UPSIDE_DOWN,
                _ => ScreenOrientation::LANDSCAPE_RIGHT,
            }
        } else {
            ScreenOrientation::PORTRAIT
        };
        (sample, screen)
    }
}

/// Fastest rate accepted for timers; `tokio::time::interval` rejects a zero period.
pub const MAX_RATE_HZ: f32 = 1000.0;

/// Period for a timer running at `rate_hz`, clamped to 1..=[`MAX_RATE_HZ`].
/// Non-finite rates run at the slowest rate.
pub fn tick_period(rate_hz: f32) -> Duration {
    let rate = if rate_hz.is_finite() {
        rate_hz.clamp(1.0, MAX_RATE_HZ)
    } else {
        1.0
    };
    Duration::from_secs_f32(1.0 / rate)
}

/// Stand-in for a real handset: dispatches a [`Sweep`] into a host.
///
/// The feed stops when the handle is dropped.
pub struct SimulatedDevice {
    task: JoinHandle<()>,
}

impl SimulatedDevice {
    /// Start dispatching at `rate_hz` events per second. Needs a tokio runtime.
    pub fn spawn(host: OrientationHost, sweep: Sweep, rate_hz: f32) -> Self {
        let period = tick_period(rate_hz);
        tracing::info!(rate_hz, period_secs = sweep.period_secs, "Simulated device started");
        let task = tokio::spawn(async move {
            let start = Instant::now();
            let mut ticker = tokio::time::interval(period);
            let mut events: u64 = 0;
            loop {
                ticker.tick().await;
                let (sample, screen) = sweep.sample_at(start.elapsed().as_secs_f64());
                if host.screen_orientation() != screen {
                    tracing::debug!(degrees = screen.0, "Simulated screen rotation");
                    host.dispatch_screen_orientation(screen);
                }
                host.dispatch_device_orientation(sample);
                events += 1;
                if events % 500 == 0 {
                    tracing::trace!(events, "Simulated events dispatched");
                }
            }
        });
        Self { task }
    }

    pub fn stop(self) {
        self.task.abort();
    }
}

impl Drop for SimulatedDevice {
    fn drop(&mut self) {
        self.task.abort();
    }
}
