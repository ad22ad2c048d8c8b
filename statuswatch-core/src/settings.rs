//! Per-user preferences persisted as JSON between runs.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::filter::{ComponentFilter, Favorites, SortOrder};

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("settings file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserSettings {
    pub filters: ComponentFilter,
    pub favorites: Favorites,
    pub sort: SortOrder,
    pub notifications_enabled: bool,
    /// List services with a favorite component first
    pub pin_favorites: bool,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            filters: ComponentFilter::default(),
            favorites: Favorites::default(),
            sort: SortOrder::default(),
            notifications_enabled: true,
            pin_favorites: true,
        }
    }
}

impl UserSettings {
    /// Read settings from `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        if !path.exists() {
            debug!(path = %path.display(), "no settings file, using defaults");
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

/// Per-user data directory: `$STATUSWATCH_HOME`, else `$XDG_CONFIG_HOME/statuswatch`,
/// else `~/.config/statuswatch`, else `.statuswatch` in the working directory.
pub fn data_dir() -> PathBuf {
    if let Ok(home) = std::env::var("STATUSWATCH_HOME") {
        return PathBuf::from(home);
    }
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        return PathBuf::from(xdg).join("statuswatch");
    }
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".config").join("statuswatch");
    }
    PathBuf::from(".statuswatch")
}

pub fn default_settings_path() -> PathBuf {
    data_dir().join("settings.json")
}

/// History lives next to the settings file.
pub fn history_path_for(settings_path: &Path) -> PathBuf {
    sibling(settings_path, "history.json")
}

pub fn log_path_for(settings_path: &Path) -> PathBuf {
    sibling(settings_path, "statuswatch.log")
}

fn sibling(path: &Path, name: &str) -> PathBuf {
    match path.parent() {
        Some(parent) => parent.join(name),
        None => PathBuf::from(name),
    }
}
