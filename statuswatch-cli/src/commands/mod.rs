use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

use statuswatch_core::config::{ConfigError, StatuswatchConfig};
use statuswatch_core::history::{HistoryError, StatusHistory};
use statuswatch_core::settings::{SettingsError, UserSettings, history_path_for};
use statuswatch_core::source::SourceError;

mod check;
mod history;
mod services;
mod settings;
mod watch;

pub use check::run_check;
pub use history::run_history;
pub use services::run_services;
pub use settings::{run_favorite, run_filter};
pub use watch::run_watch;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error(transparent)]
    History(#[from] HistoryError),
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error("terminal error: {0}")]
    Io(#[from] std::io::Error),
    #[error("unknown service(s): {}", .0.join(", "))]
    UnknownServices(Vec<String>),
}

/// Resolved config plus where user data lives for this run
pub struct Context {
    pub config: StatuswatchConfig,
    pub config_path: Option<PathBuf>,
    pub settings_path: PathBuf,
}

impl Context {
    pub fn load(config: Option<&Path>, settings_path: PathBuf) -> Result<Self, CliError> {
        let cwd = std::env::current_dir()?;
        let (config_path, config) = StatuswatchConfig::resolve(config, &cwd)?;
        match &config_path {
            Some(path) => info!(path = %path.display(), services = config.services.len(), "loaded config"),
            None => info!(services = config.services.len(), "using built-in service catalog"),
        }
        Ok(Self {
            config,
            config_path,
            settings_path,
        })
    }

    pub fn settings(&self) -> Result<UserSettings, CliError> {
        Ok(UserSettings::load(&self.settings_path)?)
    }

    pub fn history_path(&self) -> PathBuf {
        history_path_for(&self.settings_path)
    }

    pub fn history(&self) -> Result<StatusHistory, CliError> {
        Ok(StatusHistory::load(
            &self.history_path(),
            self.config.history.max_entries,
            self.config.history.retention_days,
            chrono::Utc::now(),
        )?)
    }
}
