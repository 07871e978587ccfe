// src/config.rs

use directories::ProjectDirs;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

pub const DEFAULT_INCIDENT_FEED_URL: &str = "https://www.openbugbounty.org/api/1/search/?domain=";
const CONFIG_FILE: &str = "config.toml";
const ENV_PREFIX: &str = "VANGUARD_SCORE_";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not read config file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid value for {name}: '{value}'")]
    InvalidEnv { name: String, value: String },
}

/// Timeouts and endpoints for the probes.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ScoreConfig {
    pub tls_timeout_secs: u64,
    pub http_timeout_secs: u64,
    pub dns_timeout_secs: u64,
    pub feed_timeout_secs: u64,
    pub incident_feed_url: String,
    pub server_catalog_path: Option<PathBuf>,
    pub user_agent: String,
}

impl Default for ScoreConfig {
    fn default() -> Self {
        Self {
            tls_timeout_secs: 3,
            http_timeout_secs: 10,
            dns_timeout_secs: 5,
            feed_timeout_secs: 10,
            incident_feed_url: DEFAULT_INCIDENT_FEED_URL.to_string(),
            server_catalog_path: None,
            user_agent: format!("VanguardScore/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    ProjectDirs::from("com", "vanguard-rs", env!("CARGO_PKG_NAME"))
        .map(|dirs| dirs.config_dir().join(CONFIG_FILE))
}

impl ScoreConfig {
    /// Reads `path` (or the default config file, if it exists), then applies
    /// `VANGUARD_SCORE_*` environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let file = match path {
            Some(path) => Some(path.to_path_buf()),
            None => default_config_path().filter(|p| p.exists()),
        };
        let mut config = match file {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };
        config.apply_env(|name| std::env::var(name).ok())?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        debug!(path = %path.display(), "Reading config file.");
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Applies overrides from a variable lookup, so tests need not touch the
    /// process environment.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let seconds = |key: &str, target: &mut u64| -> Result<(), ConfigError> {
            let name = format!("{ENV_PREFIX}{key}");
            if let Some(value) = lookup(&name) {
                *target = value
                    .trim()
                    .parse::<u64>()
                    .ok()
                    .filter(|secs| *secs > 0)
                    .ok_or(ConfigError::InvalidEnv { name, value })?;
            }
            Ok(())
        };
        seconds("TLS_TIMEOUT_SECS", &mut self.tls_timeout_secs)?;
        seconds("HTTP_TIMEOUT_SECS", &mut self.http_timeout_secs)?;
        seconds("DNS_TIMEOUT_SECS", &mut self.dns_timeout_secs)?;
        seconds("FEED_TIMEOUT_SECS", &mut self.feed_timeout_secs)?;

        if let Some(url) = lookup(&format!("{ENV_PREFIX}INCIDENT_FEED_URL")) {
            self.incident_feed_url = url;
        }
        if let Some(path) = lookup(&format!("{ENV_PREFIX}SERVER_CATALOG")) {
            self.server_catalog_path = Some(PathBuf::from(path));
        }
        Ok(())
    }

    pub fn tls_timeout(&self) -> Duration {
        Duration::from_secs(self.tls_timeout_secs)
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    pub fn dns_timeout(&self) -> Duration {
        Duration::from_secs(self.dns_timeout_secs)
    }

    pub fn feed_timeout(&self) -> Duration {
        Duration::from_secs(self.feed_timeout_secs)
    }
}
