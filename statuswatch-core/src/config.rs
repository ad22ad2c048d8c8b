use std::collections::BTreeMap;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{ServiceId, ServiceStatus};
use crate::vendor::FeedKind;

/// Catalog used when no config file is found.
const BUILTIN_CATALOG: &str = include_str!("default_services.yaml");

pub const REFRESH_INTERVAL_RANGE: RangeInclusive<u64> = 5..=300;
pub const MAX_RETRIES_LIMIT: u32 = 10;

/// History retention settings
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct HistoryConfig {
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,
    #[serde(default = "default_retention_days")]
    pub retention_days: i64,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_entries: default_max_entries(),
            retention_days: default_retention_days(),
        }
    }
}

fn default_max_entries() -> usize {
    crate::history::DEFAULT_MAX_ENTRIES
}
fn default_retention_days() -> i64 {
    crate::history::DEFAULT_RETENTION_DAYS
}

/// One monitored platform in the config file
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ServiceConfig {
    /// Display name (defaults to the slug)
    #[serde(default)]
    pub name: Option<String>,

    /// Status endpoint polled for this service
    pub url: String,

    /// Human-facing status page (defaults to `url`)
    #[serde(default)]
    pub page_url: Option<String>,

    /// Icon key (defaults to the slug)
    #[serde(default)]
    pub icon: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    /// Shape of the payload served at `url`
    #[serde(default)]
    pub feed: FeedKind,

    /// Component names an indicator feed is fanned out to
    #[serde(default)]
    pub components: Vec<String>,

    /// Restrict a components feed to these names
    #[serde(default)]
    pub include: Vec<String>,
}

/// Root configuration file structure
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct StatuswatchConfig {
    #[serde(default = "default_version")]
    pub version: String,

    /// Seconds between two polls of the same service
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval_secs: u64,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Base delay of the exponential retry backoff
    #[serde(default = "default_retry_backoff")]
    pub retry_backoff_ms: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    #[serde(default)]
    pub history: HistoryConfig,

    /// Services keyed by slug
    pub services: BTreeMap<ServiceId, ServiceConfig>,
}

fn default_version() -> String {
    "1".into()
}
fn default_refresh_interval() -> u64 {
    30
}
fn default_request_timeout() -> u64 {
    10
}
fn default_max_retries() -> u32 {
    3
}
fn default_retry_backoff() -> u64 {
    1000
}
fn default_user_agent() -> String {
    concat!("statuswatch/", env!("CARGO_PKG_VERSION")).into()
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid service slug '{slug}': use lowercase letters, digits, '-' or '_'")]
    InvalidSlug { slug: String },
    #[error("service '{service}' has no url")]
    MissingUrl { service: String },
    #[error("service '{service}' uses an indicator feed but lists no components")]
    MissingComponents { service: String },
    #[error("refresh interval {secs}s is outside 5..=300 seconds")]
    InvalidInterval { secs: u64 },
    #[error("max_retries {retries} is above the limit of {MAX_RETRIES_LIMIT}")]
    TooManyRetries { retries: u32 },
    #[error("no services configured")]
    NoServices,
    #[error("no config file found, searched: {searched:?}")]
    NotFound { searched: Vec<PathBuf> },
}

impl StatuswatchConfig {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load configuration from a string (useful for testing)
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let config: StatuswatchConfig = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// The catalog compiled into the binary.
    pub fn builtin() -> Result<Self, ConfigError> {
        Self::from_str(BUILTIN_CATALOG)
    }

    /// Search for config file in standard locations
    pub fn discover(start_dir: &Path) -> Result<(PathBuf, Self), ConfigError> {
        let names = [
            "statuswatch.yaml",
            "statuswatch.yml",
            ".statuswatch.yaml",
            ".statuswatch.yml",
        ];
        let mut searched = Vec::new();

        if let Ok(env_path) = std::env::var("STATUSWATCH_CONFIG") {
            let path = PathBuf::from(&env_path);
            if path.exists() {
                return Ok((path.clone(), Self::load(&path)?));
            }
            searched.push(path);
        }

        let mut dir = Some(start_dir);
        while let Some(current) = dir {
            for name in &names {
                let path = current.join(name);
                if path.exists() {
                    return Ok((path.clone(), Self::load(&path)?));
                }
                searched.push(path);
            }
            dir = current.parent();
        }

        Err(ConfigError::NotFound { searched })
    }

    /// Explicit path if given, else discovery, else the built-in catalog.
    /// Returns the path the config came from, `None` for the built-in one.
    pub fn resolve(
        explicit: Option<&Path>,
        start_dir: &Path,
    ) -> Result<(Option<PathBuf>, Self), ConfigError> {
        if let Some(path) = explicit {
            return Ok((Some(path.to_path_buf()), Self::load(path)?));
        }
        match Self::discover(start_dir) {
            Ok((path, config)) => Ok((Some(path), config)),
            Err(ConfigError::NotFound { .. }) => Ok((None, Self::builtin()?)),
            Err(e) => Err(e),
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !REFRESH_INTERVAL_RANGE.contains(&self.refresh_interval_secs) {
            return Err(ConfigError::InvalidInterval {
                secs: self.refresh_interval_secs,
            });
        }
        if self.max_retries > MAX_RETRIES_LIMIT {
            return Err(ConfigError::TooManyRetries {
                retries: self.max_retries,
            });
        }
        if self.services.is_empty() {
            return Err(ConfigError::NoServices);
        }

        for (slug, svc) in &self.services {
            if !is_valid_slug(slug) {
                return Err(ConfigError::InvalidSlug { slug: slug.clone() });
            }
            if svc.url.trim().is_empty() {
                return Err(ConfigError::MissingUrl { service: slug.clone() });
            }
            if svc.feed == FeedKind::StatuspageIndicator && svc.components.is_empty() {
                return Err(ConfigError::MissingComponents { service: slug.clone() });
            }
        }

        Ok(())
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Service definitions in catalog order.
    pub fn entries(&self) -> Vec<ServiceEntry> {
        self.services
            .iter()
            .map(|(slug, svc)| ServiceEntry::from_config(slug, svc))
            .collect()
    }

    /// Keep only the named slugs. Unknown names are returned as the error.
    pub fn retain(&mut self, slugs: &[String]) -> Result<(), Vec<String>> {
        let unknown: Vec<String> = slugs
            .iter()
            .filter(|s| !self.services.contains_key(s.as_str()))
            .cloned()
            .collect();
        if !unknown.is_empty() {
            return Err(unknown);
        }
        self.services.retain(|slug, _| slugs.contains(slug));
        Ok(())
    }
}

fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_')
}

/// A service definition with every default filled in, handed to sources.
#[derive(Clone, Debug, PartialEq)]
pub struct ServiceEntry {
    pub slug: ServiceId,
    pub display_name: String,
    pub url: String,
    pub page_url: String,
    pub icon: String,
    pub description: Option<String>,
    pub feed: FeedKind,
    pub components: Vec<String>,
    pub include: Vec<String>,
}

impl ServiceEntry {
    pub fn from_config(slug: &str, svc: &ServiceConfig) -> Self {
        Self {
            slug: slug.to_string(),
            display_name: svc.name.clone().unwrap_or_else(|| slug.to_string()),
            url: svc.url.clone(),
            page_url: svc.page_url.clone().unwrap_or_else(|| svc.url.clone()),
            icon: svc.icon.clone().unwrap_or_else(|| slug.to_string()),
            description: svc.description.clone(),
            feed: svc.feed,
            components: svc.components.clone(),
            include: svc.include.clone(),
        }
    }

    /// Placeholder snapshot for this service.
    pub fn unavailable(&self, reason: impl Into<String>) -> ServiceStatus {
        let mut status = ServiceStatus::unavailable(
            self.slug.clone(),
            self.display_name.clone(),
            self.page_url.clone(),
            reason,
        );
        status.icon = self.icon.clone();
        status.description = self.description.clone();
        status
    }
}
