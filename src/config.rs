//! User settings stored as JSON in the application directory.
//!
//! The file is read again every time settings are requested, so edits (adding a token, toggling
//! `only_follows`) are picked up by a running daemon on the next upload.

use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

pub const SETTINGS_FILE_NAME: &str = "settings.json";
pub const DEFAULT_HOST: &str = "keyrace.app";
/// Overrides the token from the settings file when set and non-empty.
pub const TOKEN_ENV: &str = "KEYRACE_TOKEN";
const DEFAULT_UPLOAD_TIMEOUT_SECS: u64 = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub host: String,
    /// Bearer credential for the leaderboard. Without it nothing is uploaded.
    pub token: Option<String>,
    /// Only rank against users the account follows.
    pub only_follows: bool,
    pub upload_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.into(),
            token: None,
            only_follows: false,
            upload_timeout_secs: DEFAULT_UPLOAD_TIMEOUT_SECS,
        }
    }
}

impl Settings {
    pub fn upload_timeout(&self) -> Duration {
        Duration::from_secs(self.upload_timeout_secs)
    }

    /// Malformed settings fall back to defaults instead of failing.
    pub fn parse(text: &str) -> Self {
        serde_json::from_str(text).unwrap_or_else(|e| {
            warn!("Settings are malformed, using defaults: {e}");
            Settings::default()
        })
    }

    pub fn with_token_override(mut self, token: Option<String>) -> Self {
        if let Some(token) = token.filter(|t| !t.trim().is_empty()) {
            self.token = Some(token);
        }
        self
    }
}

/// Where the daemon gets its settings from.
#[cfg_attr(test, mockall::automock)]
pub trait SettingsSource: Send + Sync + 'static {
    fn current(&self) -> Settings;
}

pub struct SettingsFile {
    path: PathBuf,
}

impl SettingsFile {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join(SETTINGS_FILE_NAME))
    }
}

impl SettingsSource for SettingsFile {
    fn current(&self) -> Settings {
        let settings = match std::fs::read_to_string(&self.path) {
            Ok(text) => Settings::parse(&text),
            Err(e) => {
                debug!("Can't read settings from {:?}, using defaults: {e}", self.path);
                Settings::default()
            }
        };
        settings.with_token_override(std::env::var(TOKEN_ENV).ok())
    }
}
