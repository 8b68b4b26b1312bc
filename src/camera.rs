//! Camera - frame source boundary
//!
//! ## Responsibilities
//!
//! - The `Camera` capability the capture loop is written against
//! - `FfmpegCamera`: one PNG frame per read by spawning ffmpeg against a
//!   V4L2 device or an RTSP URL

use crate::error::{Error, Result};
use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

/// A source of fully encoded PNG frames.
///
/// `open` must succeed before the first `read_frame`; `close` releases the
/// source and is safe to call on every exit path.
#[async_trait]
pub trait Camera: Send {
    async fn open(&mut self) -> Result<()>;
    async fn read_frame(&mut self) -> Result<Vec<u8>>;
    async fn close(&mut self);
}

/// ffmpeg-backed camera. No process is held between frames; each read spawns
/// one short-lived ffmpeg that emits a single PNG on stdout.
pub struct FfmpegCamera {
    device: String,
    timeout: Duration,
    opened: bool,
}

impl FfmpegCamera {
    /// # Arguments
    /// * `device` - V4L2 device path (e.g. /dev/video0) or an rtsp:// URL
    /// * `timeout` - Upper bound for one frame grab
    pub fn new(device: impl Into<String>, timeout: Duration) -> Self {
        Self {
            device: device.into(),
            timeout,
            opened: false,
        }
    }

    fn is_rtsp(&self) -> bool {
        self.device.starts_with("rtsp://")
    }

    /// Check that ffmpeg is on PATH and report its version line.
    async fn check_ffmpeg() -> Result<String> {
        let output = Command::new("ffmpeg")
            .arg("-version")
            .output()
            .await
            .map_err(|e| Error::Camera(format!("ffmpeg not found: {e}")))?;

        if !output.status.success() {
            return Err(Error::Camera("ffmpeg version check failed".to_string()));
        }

        let version = String::from_utf8_lossy(&output.stdout);
        Ok(version.lines().next().unwrap_or("unknown").to_string())
    }
}

#[async_trait]
impl Camera for FfmpegCamera {
    async fn open(&mut self) -> Result<()> {
        let version = Self::check_ffmpeg().await?;

        if !self.is_rtsp() && !Path::new(&self.device).exists() {
            return Err(Error::Camera(format!(
                "capture device {} not found",
                self.device
            )));
        }

        tracing::info!(device = %self.device, ffmpeg = %version, "Camera opened");
        self.opened = true;
        Ok(())
    }

    async fn read_frame(&mut self) -> Result<Vec<u8>> {
        if !self.opened {
            return Err(Error::Camera("camera not opened".to_string()));
        }

        let mut cmd = Command::new("ffmpeg");
        if self.is_rtsp() {
            cmd.args(["-rtsp_transport", "tcp"]);
        } else {
            cmd.args(["-f", "v4l2"]);
        }

        // -frames:v 1: grab a single frame
        // -f image2pipe -vcodec png: emit it as PNG on stdout
        // kill_on_drop: if the timeout fires or the capture loop is
        // cancelled mid-read, dropping the Child SIGKILLs ffmpeg so stuck
        // devices cannot accumulate zombie processes.
        let child = cmd
            .args([
                "-i", self.device.as_str(),
                "-frames:v", "1",
                "-f", "image2pipe",
                "-vcodec", "png",
                "-loglevel", "error",
                "-y",
                "-",
            ])
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| Error::Camera(format!("ffmpeg spawn failed: {e}")))?;

        match tokio::time::timeout(self.timeout, child.wait_with_output()).await {
            Ok(Ok(output)) => {
                if !output.status.success() {
                    let stderr = String::from_utf8_lossy(&output.stderr);
                    return Err(Error::Camera(format!("ffmpeg failed: {}", stderr.trim())));
                }
                if output.stdout.is_empty() {
                    return Err(Error::Camera("ffmpeg returned empty frame".to_string()));
                }
                Ok(output.stdout)
            }
            Ok(Err(e)) => Err(Error::Camera(format!("ffmpeg execution failed: {e}"))),
            Err(_) => {
                tracing::warn!(
                    timeout_secs = self.timeout.as_secs(),
                    device = %self.device,
                    "ffmpeg timeout, process killed via kill_on_drop"
                );
                Err(Error::Camera(format!(
                    "frame grab timeout ({}s)",
                    self.timeout.as_secs()
                )))
            }
        }
    }

    async fn close(&mut self) {
        if self.opened {
            self.opened = false;
            tracing::info!(device = %self.device, "Camera released");
        }
    }
}
