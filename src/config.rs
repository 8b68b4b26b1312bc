//! Settings loading from settings.toml
//!
//! The configuration file is optional. A missing file, an unreadable file or
//! a parse failure never stops the process: a warning is logged and the
//! defaults are used. A file that parses but omits fields keeps the defaults
//! for exactly the omitted fields.

use serde::Deserialize;
use std::path::Path;

/// Runtime settings, immutable after load
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Seconds between captures. 0 means back-to-back captures.
    pub capture_interval_secs: u64,
    /// Bind address for the gallery server
    pub server_address: String,
    /// Bind port for the gallery server
    pub server_port: u16,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            capture_interval_secs: 60,
            server_address: "0.0.0.0".to_string(),
            server_port: 8000,
        }
    }
}

/// On-disk mirror of Settings where every field is optional, so a partial
/// document merges over the defaults field by field.
#[derive(Debug, Default, Deserialize)]
struct SettingsFile {
    #[serde(default)]
    capture: CaptureSection,
    #[serde(default)]
    server: ServerSection,
}

#[derive(Debug, Default, Deserialize)]
struct CaptureSection {
    interval: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct ServerSection {
    address: Option<String>,
    port: Option<u16>,
}

impl Settings {
    /// Load settings from `settings.toml` in the working directory.
    pub fn load() -> Self {
        Self::load_from(Path::new("settings.toml"))
    }

    /// Load settings from an explicit path. Never fails; any problem falls
    /// back to defaults with a warning.
    pub fn load_from(path: &Path) -> Self {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "Settings file not readable, using defaults"
                );
                return Self::default();
            }
        };

        let file: SettingsFile = match toml::from_str(&text) {
            Ok(file) => file,
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "Settings file invalid, using defaults"
                );
                return Self::default();
            }
        };

        let defaults = Self::default();
        Self {
            capture_interval_secs: file.capture.interval.unwrap_or(defaults.capture_interval_secs),
            server_address: file.server.address.unwrap_or(defaults.server_address),
            server_port: file.server.port.unwrap_or(defaults.server_port),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_settings(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let settings = Settings::load_from(Path::new("/nonexistent/settings.toml"));
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_unparseable_file_yields_defaults() {
        let file = write_settings("this is { not toml");
        let settings = Settings::load_from(file.path());
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_partial_file_merges_field_by_field() {
        let file = write_settings("[capture]\ninterval = 30\n");
        let settings = Settings::load_from(file.path());
        assert_eq!(settings.capture_interval_secs, 30);
        assert_eq!(settings.server_address, "0.0.0.0");
        assert_eq!(settings.server_port, 8000);
    }

    #[test]
    fn test_partial_server_section_merges() {
        let file = write_settings("[server]\nport = 9090\n");
        let settings = Settings::load_from(file.path());
        assert_eq!(settings.capture_interval_secs, 60);
        assert_eq!(settings.server_address, "0.0.0.0");
        assert_eq!(settings.server_port, 9090);
    }

    #[test]
    fn test_full_file_overrides_everything() {
        let file = write_settings(
            "[capture]\ninterval = 5\n\n[server]\naddress = \"127.0.0.1\"\nport = 8080\n",
        );
        let settings = Settings::load_from(file.path());
        assert_eq!(settings.capture_interval_secs, 5);
        assert_eq!(settings.server_address, "127.0.0.1");
        assert_eq!(settings.server_port, 8080);
    }

    #[test]
    fn test_zero_interval_is_accepted() {
        let file = write_settings("[capture]\ninterval = 0\n");
        let settings = Settings::load_from(file.path());
        assert_eq!(settings.capture_interval_secs, 0);
    }

    #[test]
    fn test_negative_interval_is_a_parse_failure() {
        let file = write_settings("[capture]\ninterval = -5\n");
        let settings = Settings::load_from(file.path());
        assert_eq!(settings, Settings::default());
    }
}
