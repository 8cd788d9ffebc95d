//! Host settings: frame driver knobs loaded from JSON.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostSettings {
    /// Frames per second the terminal player aims for.
    #[serde(default = "default_target_fps")]
    pub target_fps: u32,
    /// Keys not re-seen within this window are released, for terminals that
    /// do not report key releases.
    #[serde(default = "default_key_release_ms")]
    pub key_release_ms: u64,
    /// Append every program log line here while the player owns the screen.
    #[serde(default)]
    pub log_file: Option<PathBuf>,
    /// Host diagnostics destination while the player owns the screen.
    #[serde(default)]
    pub trace_file: Option<PathBuf>,
    #[serde(default = "default_show_status")]
    pub show_status: bool,
}

fn default_target_fps() -> u32 { 60 }
fn default_key_release_ms() -> u64 { 150 }
fn default_show_status() -> bool { true }

impl Default for HostSettings {
    fn default() -> Self {
        HostSettings {
            target_fps: default_target_fps(),
            key_release_ms: default_key_release_ms(),
            log_file: None,
            trace_file: None,
            show_status: default_show_status(),
        }
    }
}

impl HostSettings {
    /// Load from the user config path, falling back to defaults.
    pub fn load() -> Self {
        Self::load_from(&Self::config_path())
    }

    /// Load from `path`. A missing file means defaults; an invalid one warns.
    ///
    /// Runs before logging is set up, so warnings go straight to stderr.
    pub fn load_from(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str::<HostSettings>(&json) {
                Ok(settings) => settings.sanitized(),
                Err(e) => {
                    eprintln!("Warning: invalid host settings in {} ({e}), using defaults", path.display());
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }

    fn sanitized(mut self) -> Self {
        if self.target_fps == 0 {
            eprintln!("Warning: target_fps must be positive, using {}", default_target_fps());
            self.target_fps = default_target_fps();
        }
        self
    }

    fn config_path() -> PathBuf {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
        let mut path = PathBuf::from(home);
        path.push(".config");
        path.push("effect-host");
        path.push("host.json");
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_fields_take_defaults() {
        let settings: HostSettings = serde_json::from_str(r#"{"target_fps": 30}"#).unwrap();
        assert_eq!(settings.target_fps, 30);
        assert_eq!(settings.key_release_ms, 150);
        assert!(settings.show_status);
        assert!(settings.log_file.is_none());
    }

    #[test]
    fn invalid_file_falls_back() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"{ not json").unwrap();
        let settings = HostSettings::load_from(file.path());
        assert_eq!(settings.target_fps, 60);
    }

    #[test]
    fn zero_fps_is_replaced() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(br#"{"target_fps": 0}"#).unwrap();
        assert_eq!(HostSettings::load_from(file.path()).target_fps, 60);
    }

    #[test]
    fn missing_file_is_default() {
        let settings = HostSettings::load_from(Path::new("/nonexistent/effect-host.json"));
        assert_eq!(settings.target_fps, 60);
    }
}
