use anyhow::Result;
use tilt_config::AppConfig;
use tilt_scene::camera::Camera;
use tilt_sensor::{
    tick_period, OrientationControls, OrientationHost, SimulatedDevice, StaticPermission, Sweep,
};
use tracing::{info, warn};

/// Builds the event host described by the controls config.
fn build_host(config: &AppConfig) -> OrientationHost {
    if !config.controls.require_permission {
        return OrientationHost::new();
    }
    let permission = if config.controls.grant_permission {
        StaticPermission::granted()
    } else {
        StaticPermission::denied()
    };
    OrientationHost::with_permission(permission)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tilt_app=info,tilt_sensor=info".into()),
        )
        .init();

    info!("Tilt view starting");

    let config = tilt_config::load_config().unwrap_or_else(|e| {
        warn!(?e, "Failed to load config, using defaults");
        AppConfig::default()
    });

    let host = build_host(&config);

    // No handset attached: feed a synthetic sweep instead.
    let device = SimulatedDevice::spawn(
        host.clone(),
        Sweep {
            period_secs: config.simulation.sweep_period_secs as f64,
            rotate_screen: config.simulation.rotate_screen,
        },
        config.simulation.rate_hz,
    );

    let mut controls = OrientationControls::new(Camera::from_config(&config.camera), host);
    controls.alpha_offset = config.controls.alpha_offset_rad();
    controls.connect();

    let frame = tick_period(config.simulation.frame_rate_hz);
    let mut ticker = tokio::time::interval(frame);
    let mut frame_count: u64 = 0;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                controls.update();

                frame_count += 1;
                if frame_count % 120 == 0 {
                    let camera = controls.object();
                    let forward = camera.forward();
                    let (yaw, pitch, roll) = camera.euler();
                    info!(
                        frames = frame_count,
                        forward_x = forward.x,
                        forward_y = forward.y,
                        forward_z = forward.z,
                        yaw = yaw.to_degrees(),
                        pitch = pitch.to_degrees(),
                        roll = roll.to_degrees(),
                        "Camera heartbeat"
                    );
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Shutting down");
                break;
            }
        }
    }

    controls.dispose();
    device.stop();

    if let Err(e) = tilt_config::save_config(&config) {
        warn!(?e, "Failed to save config");
    }

    Ok(())
}
