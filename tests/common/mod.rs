//! Shared test fixtures and utilities for integration tests.
//!
//! # Test Isolation Strategy
//!
//! Tests that touch the filesystem use isolated workspaces so snapshot caches
//! never leak between tests. Each test gets:
//! - A fresh temporary directory holding a small dataset file
//! - Its own snapshot cache directory inside that workspace
//! - Its own `CatalogState` with an empty related-result cache
//!
//! # Available Fixtures
//!
//! - `isolated_catalog`: Dataset file plus cache dir, loaded through the snapshot cache
//! - `builtin_state`: The embedded dataset, no filesystem access

use nmoji::{CatalogState, Config};
use rstest::fixture;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

/// Five records covering shared tags, shared categories and shared description words.
///
/// Positions: 0 🐶, 1 🐱, 2 🍕, 3 🍔, 4 😀
pub const SAMPLE_DATASET: &str = r#"[
  {"emoji": "🐶", "description": "dog face", "category": "Animals & Nature", "tags": ["pet"], "aliases": ["dog"]},
  {"emoji": "🐱", "description": "cat face", "category": "Animals & Nature", "tags": ["pet"], "aliases": ["cat"]},
  {"emoji": "🍕", "description": "pizza", "category": "Food & Drink", "tags": ["food"], "aliases": ["pizza"]},
  {"emoji": "🍔", "description": "hamburger", "category": "Food & Drink", "tags": ["food"], "aliases": ["burger"]},
  {"emoji": "😀", "description": "grinning face", "category": "Smileys & Emotion", "tags": ["happy"], "aliases": ["grinning"]}
]"#;

/// A temporary workspace directory for test isolation.
///
/// Provides basic filesystem operations within a temp directory that is
/// automatically cleaned up when dropped.
#[allow(dead_code)] // Methods used across different integration test crates
pub struct TempWorkspace {
    _temp: TempDir,
    root: PathBuf,
}

#[allow(dead_code)] // Methods used across different integration test crates
impl TempWorkspace {
    /// Creates a new empty temporary workspace.
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let root = temp.path().to_path_buf();
        Self { _temp: temp, root }
    }

    /// Returns the root path of this workspace.
    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Creates a file with the given content within this workspace.
    ///
    /// Parent directories are created automatically if they don't exist.
    ///
    /// # Panics
    /// Panics if file creation fails.
    pub fn create_file(&self, path: &str, content: &str) -> PathBuf {
        let full_path = self.root.join(path);
        if let Some(parent) = full_path.parent() {
            std::fs::create_dir_all(parent).unwrap_or_else(|e| {
                panic!("Failed to create parent directory for '{}': {}", path, e)
            });
        }
        std::fs::write(&full_path, content)
            .unwrap_or_else(|e| panic!("Failed to write file '{}': {}", path, e));
        full_path
    }

    /// Lists the file names directly inside `path`, sorted.
    pub fn list_files(&self, path: &str) -> Vec<String> {
        let Ok(entries) = std::fs::read_dir(self.root.join(path)) else {
            return Vec::new();
        };
        let mut names: Vec<String> = entries
            .filter_map(Result::ok)
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }
}

impl Default for TempWorkspace {
    fn default() -> Self {
        Self::new()
    }
}

/// A dataset file and cache directory with a `CatalogState` loaded from them.
///
/// Composes [`TempWorkspace`] with catalog-specific setup.
#[allow(dead_code)] // Fields used across different integration test crates
pub struct IsolatedCatalog {
    pub workspace: TempWorkspace,
    pub dataset: PathBuf,
    pub config: Config,
    pub state: Arc<CatalogState>,
}

#[allow(dead_code)] // Methods used across different integration test crates
impl IsolatedCatalog {
    /// Creates a workspace holding [`SAMPLE_DATASET`].
    pub fn new() -> Self {
        Self::with_dataset(SAMPLE_DATASET)
    }

    /// Creates a workspace holding `contents` as `emojis.json`, loaded with a
    /// snapshot cache under `cache/`.
    pub fn with_dataset(contents: &str) -> Self {
        let workspace = TempWorkspace::new();
        let dataset = workspace.create_file("emojis.json", contents);

        let config = Config {
            dataset: Some(dataset.clone()),
            cache_dir: Some(workspace.path().join("cache")),
            reload_interval_secs: 0,
            ..Config::default()
        };

        let state = tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current()
                .block_on(CatalogState::load(config.clone()))
                .expect("Failed to load sample dataset")
        });

        Self {
            workspace,
            dataset,
            config,
            state: Arc::new(state),
        }
    }

    /// Overwrites the dataset file.
    pub fn rewrite_dataset(&self, contents: &str) {
        self.workspace.create_file("emojis.json", contents);
    }

    /// Snapshot files currently in the cache directory.
    pub fn snapshots(&self) -> Vec<String> {
        self.workspace.list_files("cache")
    }
}

impl Default for IsolatedCatalog {
    fn default() -> Self {
        Self::new()
    }
}

/// Creates an isolated catalog over [`SAMPLE_DATASET`].
///
/// Returns `IsolatedCatalog` rather than just the state because the temp
/// directory must stay alive for the duration of the test.
#[fixture]
pub fn isolated_catalog() -> IsolatedCatalog {
    IsolatedCatalog::new()
}

/// State over the embedded dataset.
#[fixture]
pub fn builtin_state() -> Arc<CatalogState> {
    Arc::new(CatalogState::new(nmoji::Catalog::builtin(), Config::default()))
}
