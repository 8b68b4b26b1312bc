//! CaptureScheduler - the timed capture-and-persist loop
//!
//! ## Responsibilities
//!
//! - Open the camera, then capture-persist-sleep until stopped
//! - First capture immediately, the interval sleep follows each cycle
//! - Camera failures are fatal for this loop only; the gallery server is
//!   untouched
//! - Shutdown signal cancels both the frame read and the sleep, and the
//!   camera is released on every exit path

use crate::camera::Camera;
use crate::image_store::ImageStore;
use std::time::Duration;
use tokio::sync::watch;

/// Why the loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The camera could not be opened; nothing was captured.
    CameraOpenFailed,
    /// A frame read failed mid-loop. No retry, a broken stream stays broken.
    FrameReadFailed,
    /// Persisting a frame to the store failed.
    StoreWriteFailed,
    /// The shutdown signal arrived.
    Interrupted,
}

/// Run the capture loop until a fatal error or the shutdown signal.
pub async fn run<C: Camera>(
    mut camera: C,
    store: &ImageStore,
    interval: Duration,
    mut shutdown: watch::Receiver<bool>,
) -> StopReason {
    if let Err(e) = camera.open().await {
        tracing::error!(error = %e, "Could not open camera");
        return StopReason::CameraOpenFailed;
    }

    tracing::info!(
        interval_secs = interval.as_secs(),
        "Capture started, press Ctrl+C to stop"
    );

    let reason = loop {
        let frame = tokio::select! {
            frame = camera.read_frame() => frame,
            _ = shutdown.changed() => break StopReason::Interrupted,
        };

        // Only a fully read frame reaches the store.
        let frame = match frame {
            Ok(frame) => frame,
            Err(e) => {
                tracing::error!(error = %e, "Failed to capture frame");
                break StopReason::FrameReadFailed;
            }
        };

        match store.write(&frame).await {
            Ok(filename) => tracing::info!(filename = %filename, "Saved snapshot"),
            Err(e) => {
                tracing::error!(error = %e, "Failed to persist frame");
                break StopReason::StoreWriteFailed;
            }
        }

        tokio::select! {
            _ = tokio::time::sleep(interval) => {}
            _ = shutdown.changed() => break StopReason::Interrupted,
        }
    };

    camera.close().await;
    tracing::info!(reason = ?reason, "Capture stopped");
    reason
}
