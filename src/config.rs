//! TOML configuration with defaults for every key.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable overriding the dataset path.
pub const DATASET_ENV: &str = "NMOJI_DATASET";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// JSON dataset to load. The embedded dataset is used when unset.
    pub dataset: Option<PathBuf>,
    /// Where catalog snapshots are written. Defaults to the platform cache dir.
    pub cache_dir: Option<PathBuf>,
    pub cache_enabled: bool,
    /// Maximum number of search results shown.
    pub grid_limit: usize,
    pub related_limit: usize,
    pub popular_limit: usize,
    /// Seconds between dataset change checks while serving; 0 disables reloading.
    pub reload_interval_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dataset: None,
            cache_dir: None,
            cache_enabled: true,
            grid_limit: 200,
            related_limit: 12,
            popular_limit: 8,
            reload_interval_secs: 30,
        }
    }
}

impl Config {
    /// Default config file location: `<config_dir>/nmoji/config.toml`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("nmoji").join("config.toml"))
    }

    /// Loads `path`, or the default location when `None`.
    ///
    /// A missing file at the default location yields defaults; an explicitly
    /// requested file must exist.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let (path, explicit) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => match Self::default_path() {
                Some(p) => (p, false),
                None => return Ok(Self::default()),
            },
        };

        let contents = match std::fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if !explicit && e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("No config at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(source) => return Err(ConfigError::Read { path, source }),
        };

        let config = Self::parse(&contents).map_err(|source| ConfigError::Parse {
            path: path.clone(),
            source,
        })?;
        config.validate()?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn parse(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    /// Applies `NMOJI_DATASET` and then an explicit CLI path, in that order of precedence.
    pub fn with_overrides(mut self, dataset: Option<PathBuf>) -> Self {
        if let Some(env_path) = std::env::var_os(DATASET_ENV).filter(|v| !v.is_empty()) {
            self.dataset = Some(PathBuf::from(env_path));
        }
        if let Some(path) = dataset {
            self.dataset = Some(path);
        }
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("grid_limit", self.grid_limit),
            ("related_limit", self.related_limit),
            ("popular_limit", self.popular_limit),
        ] {
            if value == 0 {
                return Err(ConfigError::Invalid(format!("{} must be greater than zero", name)));
            }
        }
        Ok(())
    }

    /// Snapshot directory, if caching is enabled and a location is known.
    pub fn resolved_cache_dir(&self) -> Option<PathBuf> {
        if !self.cache_enabled {
            return None;
        }
        self.cache_dir
            .clone()
            .or_else(|| dirs::cache_dir().map(|dir| dir.join("nmoji")))
    }

    pub fn reload_interval(&self) -> Option<Duration> {
        (self.reload_interval_secs > 0).then(|| Duration::from_secs(self.reload_interval_secs))
    }
}
