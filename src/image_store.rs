//! ImageStore - the shared images folder
//!
//! ## Responsibilities
//!
//! - Timestamp-derived naming (`YYYY-MM-DD_HH-MM-SS.png`, local time)
//! - Atomic visibility: a file appears under its final name only once fully
//!   written (write to a temp name, then rename)
//! - Fresh newest-first listing per call, no caching
//! - Strict name validation on open, so nothing outside the folder can be
//!   served
//!
//! Single writer (the capture loop), many readers (the gallery handlers).
//! Writes are append-only and each targets a name unique to its second, so
//! no locking is needed. Two captures within the same second collide on one
//! name and the later write wins; with the default 60 s interval this does
//! not happen in practice.

use crate::error::{Error, Result};
use chrono::{Local, NaiveDateTime};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;

/// chrono format behind the filename pattern
const FILENAME_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

/// Length of a zero-padded timestamp stem, e.g. `2024-01-01_10-00-00`
const STEM_LEN: usize = 19;

/// Handle on the images folder. Cheap to clone; clones share the same
/// directory on disk.
#[derive(Debug, Clone)]
pub struct ImageStore {
    dir: PathBuf,
}

impl ImageStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Create the folder if it does not exist yet. Idempotent; existing
    /// content is never touched.
    pub async fn ensure_ready(&self) -> Result<()> {
        if !self.dir.exists() {
            fs::create_dir_all(&self.dir).await?;
            tracing::info!(path = %self.dir.display(), "Created images folder");
        }
        Ok(())
    }

    /// Persist one frame under the current local timestamp and return the
    /// resulting filename.
    pub async fn write(&self, frame: &[u8]) -> Result<String> {
        let filename = format!("{}.png", Local::now().format(FILENAME_FORMAT));
        let path = self.dir.join(&filename);

        // Readers must never observe a half-written file, so write under a
        // temp name and rename into place. The temp name fails the image
        // name check and is invisible to list().
        let tmp = self.dir.join(format!(".{filename}.part"));
        fs::write(&tmp, frame).await?;
        fs::rename(&tmp, &path).await?;

        tracing::debug!(
            path = %path.display(),
            size = frame.len(),
            "Saved snapshot"
        );

        Ok(filename)
    }

    /// Fresh snapshot of all image names, newest first. Zero-padded
    /// fixed-width timestamps make lexicographic order chronological, so a
    /// plain descending sort suffices.
    pub async fn list(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        let mut entries = fs::read_dir(&self.dir).await?;

        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name();
            let Some(name) = name.to_str() else { continue };
            if is_image_name(name) {
                names.push(name.to_string());
            }
        }

        names.sort_unstable_by(|a, b| b.cmp(a));
        Ok(names)
    }

    /// Read one image by name. Any name that is not exactly a timestamp
    /// image name is rejected before touching the filesystem, which also
    /// rules out path traversal.
    pub async fn open(&self, filename: &str) -> Result<Vec<u8>> {
        if !is_image_name(filename) {
            return Err(Error::NotFound(format!("no such image: {filename}")));
        }

        match fs::read(self.dir.join(filename)).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(Error::NotFound(format!("no such image: {filename}")))
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// A valid image name is a full zero-padded timestamp stem plus the png
/// extension, nothing more.
fn is_image_name(name: &str) -> bool {
    let Some(stem) = name.strip_suffix(".png") else {
        return false;
    };
    stem.len() == STEM_LEN && NaiveDateTime::parse_from_str(stem, FILENAME_FORMAT).is_ok()
}
