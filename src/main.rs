//! plantcam - timed webcam snapshots with a web gallery
//!
//! Main entry point: starts the gallery server as a background task and runs
//! the capture loop in the foreground until it stops.

use plantcam::camera::FfmpegCamera;
use plantcam::capture_scheduler::{self, StopReason};
use plantcam::config::Settings;
use plantcam::image_store::ImageStore;
use plantcam::state::AppState;
use plantcam::web_api;
use std::time::Duration;
use tokio::sync::watch;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const IMAGES_DIR: &str = "images";
const DEFAULT_CAMERA_DEVICE: &str = "/dev/video0";
const DEFAULT_CAMERA_TIMEOUT_SECS: u64 = 10;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "plantcam=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting plantcam v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration (never fails, defaults fill the gaps)
    let settings = Settings::load();
    tracing::info!(
        interval_secs = settings.capture_interval_secs,
        address = %settings.server_address,
        port = settings.server_port,
        "Configuration loaded"
    );

    let store = ImageStore::new(IMAGES_DIR);
    store.ensure_ready().await?;

    // Gallery server as a detached background task. Binding happens here so
    // an unavailable address/port fails startup instead of dying silently in
    // the spawned task.
    let state = AppState {
        settings: settings.clone(),
        store: store.clone(),
    };
    let app = web_api::create_router(state).layer(TraceLayer::new_for_http());

    let addr = format!("{}:{}", settings.server_address, settings.server_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Gallery listening on {}", addr);

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!(error = %e, "Gallery server exited");
        }
    });

    // Ctrl+C flips the shutdown channel the capture loop selects on.
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Interrupt received");
            let _ = shutdown_tx.send(true);
        }
    });

    let device =
        std::env::var("CAMERA_DEVICE").unwrap_or_else(|_| DEFAULT_CAMERA_DEVICE.to_string());
    let timeout = std::env::var("CAMERA_TIMEOUT_SECS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_CAMERA_TIMEOUT_SECS);
    let camera = FfmpegCamera::new(device, Duration::from_secs(timeout));

    let mut interrupt = shutdown_rx.clone();
    let reason = capture_scheduler::run(
        camera,
        &store,
        Duration::from_secs(settings.capture_interval_secs),
        shutdown_rx,
    )
    .await;

    match reason {
        StopReason::Interrupted => {
            tracing::info!("Shutdown requested, exiting");
        }
        _ => {
            // Capture is gone but already saved images stay viewable, so the
            // process keeps serving until it is interrupted.
            tracing::error!(
                reason = ?reason,
                "Capture loop stopped, gallery keeps serving existing images"
            );
            let _ = interrupt.changed().await;
            tracing::info!("Shutdown requested, exiting");
        }
    }

    Ok(())
}
