//! Client settings and their persistence
//!
//! Saves and loads [`ClientSettings`] to/from a JSON file so the server
//! address and player name survive restarts.
//!
//! # File Location
//!
//! `settings.json` in the platform configuration directory, e.g.
//! `~/.config/PenguinChess/settings.json` on Linux. Falls back to the working
//! directory when no configuration directory can be resolved.
//!
//! # Precedence
//!
//! defaults < settings file < environment (`PENGUIN_SERVER_URL`,
//! `PENGUIN_PLAYER_NAME`, `PENGUIN_LOG`) < command-line flags
//!
//! # Error Handling
//!
//! Loading never fails: a missing or unreadable file falls back to defaults
//! with a warning. Saving reports errors to the caller.

use crate::core::error::{CoreError, CoreResult};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Settings filename
const SETTINGS_FILENAME: &str = "settings.json";

pub const ENV_SERVER_URL: &str = "PENGUIN_SERVER_URL";
pub const ENV_PLAYER_NAME: &str = "PENGUIN_PLAYER_NAME";
pub const ENV_LOG: &str = "PENGUIN_LOG";

/// User preferences for the client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientSettings {
    /// WebSocket URL of the relay server
    pub server_url: String,
    /// Display name sent with create and join requests
    pub player_name: String,
    /// Board edge length in pixels
    pub board_size: f32,
    /// `tracing` filter used when `RUST_LOG` is unset
    pub log_filter: String,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            server_url: "ws://127.0.0.1:3001".to_string(),
            player_name: "Player".to_string(),
            board_size: 640.0,
            log_filter: "info".to_string(),
        }
    }
}

impl ClientSettings {
    /// Check values that would break the client at runtime
    pub fn validate(&self) -> CoreResult<()> {
        if url::Url::parse(&self.server_url).is_err() {
            return Err(CoreError::InvalidSetting {
                name: "server_url",
                message: format!("{:?} is not a URL", self.server_url),
            });
        }
        if self.player_name.trim().is_empty() {
            return Err(CoreError::InvalidSetting {
                name: "player_name",
                message: "must not be empty".to_string(),
            });
        }
        if !(self.board_size.is_finite() && self.board_size > 0.0) {
            return Err(CoreError::InvalidSetting {
                name: "board_size",
                message: format!("{} is not a positive size", self.board_size),
            });
        }
        Ok(())
    }

    /// Apply `PENGUIN_*` environment variables
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    /// Apply overrides from any key lookup; empty values are ignored
    pub fn apply_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        if let Some(url) = get(ENV_SERVER_URL) {
            self.server_url = url;
        }
        if let Some(name) = get(ENV_PLAYER_NAME) {
            self.player_name = name;
        }
        if let Some(filter) = get(ENV_LOG) {
            self.log_filter = filter;
        }
    }
}

/// Helper to resolve the settings file path
pub fn settings_path() -> PathBuf {
    if let Some(proj_dirs) = ProjectDirs::from("com", "penguin", "PenguinChess") {
        proj_dirs.config_dir().join(SETTINGS_FILENAME)
    } else {
        // Fallback to current directory
        PathBuf::from(SETTINGS_FILENAME)
    }
}

/// Load settings from the platform configuration directory
pub fn load_settings() -> ClientSettings {
    load_settings_from(&settings_path())
}

/// Load settings from `path`, falling back to defaults
pub fn load_settings_from(path: &Path) -> ClientSettings {
    if !path.exists() {
        info!("[SETTINGS] No settings file found at {:?}. Using defaults.", path);
        return ClientSettings::default();
    }

    match read_settings(path) {
        Ok(settings) => {
            info!("[SETTINGS] Loaded settings from {:?}", path);
            settings
        }
        Err(e) => {
            warn!(
                "[SETTINGS] Failed to load settings file at {:?}: {}. Using defaults.",
                path, e
            );
            ClientSettings::default()
        }
    }
}

fn read_settings(path: &Path) -> CoreResult<ClientSettings> {
    let contents = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}

/// Write settings as pretty JSON, creating the directory if needed
pub fn save_settings_to(settings: &ClientSettings, path: &Path) -> CoreResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }
    let json = serde_json::to_string_pretty(settings)?;
    fs::write(path, json)?;
    info!("[SETTINGS] Saved settings to {:?}", path);
    Ok(())
}
