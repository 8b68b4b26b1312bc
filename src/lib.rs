//! plantcam - timed webcam snapshots with a web gallery
//!
//! ## Architecture
//!
//! 1. config - settings.toml loading with per-field defaults
//! 2. image_store - timestamp-named PNG files in the images folder
//! 3. camera - frame source boundary (ffmpeg-backed in production)
//! 4. capture_scheduler - the timed capture-and-persist loop
//! 5. web_api - read-only gallery endpoints over the store
//!
//! The capture loop and the gallery server never share in-memory state; the
//! images folder is their only point of contact. The loop appends one file
//! per cycle and the server takes a fresh directory snapshot per request, so
//! no locking is needed on either side.

pub mod camera;
pub mod capture_scheduler;
pub mod config;
pub mod error;
pub mod image_store;
pub mod state;
pub mod web_api;

pub use error::{Error, Result};
pub use state::AppState;
