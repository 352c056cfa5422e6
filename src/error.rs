//! Error handling types and utilities.

use std::path::PathBuf;
use thiserror::Error;

/// A specialized Result type for nmoji operations.
///
/// This is an alias for `anyhow::Result` with context added via `.context()` and
/// `.with_context()` methods at the application edges (CLI, server start-up).
pub type Result<T> = anyhow::Result<T>;

/// Error returned when loading an emoji dataset fails.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Dataset file not found at the expected path.
    #[error("Emoji dataset not found at {}", .path.display())]
    NotFound { path: PathBuf },
    /// The file exists but could not be read.
    #[error("Failed to read emoji dataset {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The contents are not a JSON array of emoji records.
    #[error("Failed to parse emoji dataset{}: {source}", origin_suffix(.path.as_ref()))]
    Parse {
        path: Option<PathBuf>,
        #[source]
        source: serde_json::Error,
    },
}

fn origin_suffix(path: Option<&PathBuf>) -> String {
    path.map(|p| format!(" {}", p.display())).unwrap_or_default()
}

/// Error returned when the configuration file is unusable.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid config {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("Invalid config value: {0}")]
    Invalid(String),
}
