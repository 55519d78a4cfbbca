//! User settings stored as settings.json in the app data directory

use crate::client::HttpTransport;
use crate::constants::{BASE_URL_ENV, DEFAULT_BASE_URL};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // Window geometry
    pub window_x: Option<f32>,
    pub window_y: Option<f32>,
    pub window_w: Option<f32>,
    pub window_h: Option<f32>,

    // Backend
    pub base_url: String,
    /// No timeout when unset
    pub request_timeout_secs: Option<u64>,

    // Input
    pub last_input: String,

    /// Session-only URL from the environment; never written back
    #[serde(skip)]
    pub base_url_override: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            window_x: None,
            window_y: None,
            window_w: None,
            window_h: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout_secs: None,
            last_input: String::new(),
            base_url_override: None,
        }
    }
}

impl Settings {
    pub fn load(data_dir: &Path) -> Self {
        let mut settings = Self::load_file(data_dir);
        settings.base_url_override = std::env::var(BASE_URL_ENV)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());
        if let Some(url) = &settings.base_url_override {
            debug!(url = %url, "Base URL overridden from environment");
        }
        settings
    }

    fn load_file(data_dir: &Path) -> Self {
        let path = data_dir.join("settings.json");
        match std::fs::read_to_string(&path) {
            Ok(s) => match serde_json::from_str(&s) {
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
        }
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

    /// Base URL to query: environment override first, then the saved value
    pub fn effective_base_url(&self) -> String {
        if let Some(url) = &self.base_url_override {
            return url.clone();
        }
        let saved = self.base_url.trim();
        if saved.is_empty() {
            DEFAULT_BASE_URL.to_string()
        } else {
            saved.to_string()
        }
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs
            .filter(|&secs| secs > 0)
            .map(Duration::from_secs)
    }

    /// HTTP transport for the effective URL and timeout
    pub fn transport(&self) -> crate::error::Result<HttpTransport> {
        HttpTransport::new(&self.effective_base_url(), self.request_timeout())
    }
}
