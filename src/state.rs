//! Application state shared across handlers

use crate::config::Settings;
use crate::image_store::ImageStore;

/// Shared state for the gallery server. Both fields are cheap clones; the
/// store clone still points at the one images folder on disk.
#[derive(Debug, Clone)]
pub struct AppState {
    pub settings: Settings,
    pub store: ImageStore,
}
