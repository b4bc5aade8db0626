//! User settings stored as settings.json in the app data directory

use crate::constants::{ASK_TIMEOUT_DEFAULT_SECS, ASK_TIMEOUT_MAX_SECS, ASK_TIMEOUT_MIN_SECS, DEFAULT_API_BASE_URL};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, warn};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // Window geometry
    pub window_x: Option<f32>,
    pub window_y: Option<f32>,
    pub window_w: Option<f32>,
    pub window_h: Option<f32>,

    // Backend
    pub api_base_url: String,
    pub ask_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            window_x: None,
            window_y: None,
            window_w: None,
            window_h: None,
            api_base_url: std::env::var("API_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string()),
            ask_timeout_secs: std::env::var("API_TIMEOUT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(ASK_TIMEOUT_DEFAULT_SECS),
        }
    }
}

impl Settings {
    pub fn load(data_dir: &Path) -> Self {
        let path = data_dir.join("settings.json");
        let mut settings = match std::fs::read_to_string(&path) {
            Ok(s) => match serde_json::from_str::<Settings>(&s) {
                Ok(settings) => {
                    debug!(path = %path.display(), "Settings loaded");
                    settings
                }
                Err(e) => {
                    warn!(error = %e, "Failed to parse settings, using defaults");
                    Self::default()
                }
            },
            Err(_) => {
                debug!("No settings file found, using defaults");
                Self::default()
            }
        };
        settings.ask_timeout_secs = settings
            .ask_timeout_secs
            .clamp(ASK_TIMEOUT_MIN_SECS, ASK_TIMEOUT_MAX_SECS);
        settings
    }

    pub fn save(&self, data_dir: &Path) {
        let path = data_dir.join("settings.json");
        match serde_json::to_string_pretty(self) {
            Ok(json) => {
                if let Err(e) = std::fs::write(&path, json) {
                    warn!(error = %e, "Failed to save settings");
                }
            }
            Err(e) => warn!(error = %e, "Failed to serialize settings"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings {
            api_base_url: "http://localhost:8000".to_string(),
            ask_timeout_secs: 120,
            window_w: Some(1280.0),
            ..Default::default()
        };
        settings.save(dir.path());

        let loaded = Settings::load(dir.path());
        assert_eq!(loaded.api_base_url, "http://localhost:8000");
        assert_eq!(loaded.ask_timeout_secs, 120);
        assert_eq!(loaded.window_w, Some(1280.0));
    }

    #[test]
    fn load_clamps_timeout_into_slider_range() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("settings.json"),
            r#"{"api_base_url": "http://x", "ask_timeout_secs": 5000}"#,
        )
        .unwrap();
        let loaded = Settings::load(dir.path());
        assert_eq!(loaded.ask_timeout_secs, ASK_TIMEOUT_MAX_SECS);
    }

    #[test]
    fn garbage_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("settings.json"), "not json").unwrap();
        let loaded = Settings::load(dir.path());
        assert_eq!(loaded.ask_timeout_secs, Settings::default().ask_timeout_secs);
    }
}
