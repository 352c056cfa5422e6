//! Catalog snapshots with fingerprint-based invalidation.
//!
//! Indexing a dataset is cheap but not free; a snapshot lets repeated CLI
//! invocations skip parsing and indexing while the source file is unchanged.
//! Snapshots are postcard-encoded and keyed by the xxh3 digest of the source bytes.

use crate::catalog::Catalog;
use crate::dataset::{Dataset, read_source};
use crate::error::LoadError;
use postcard::{from_bytes, to_io};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use xxhash_rust::xxh3::xxh3_64;

/// Bumped whenever the snapshot layout changes.
const SNAPSHOT_VERSION: u32 = 1;

/// Digest of a dataset file's contents.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct Fingerprint(u64);

impl Fingerprint {
    pub fn of(bytes: &[u8]) -> Self {
        Self(xxh3_64(bytes))
    }

    /// Returns the digest as a lowercase hexadecimal string
    pub fn as_hex(&self) -> String {
        format!("{:016x}", self.0)
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_hex())
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Snapshot {
    version: u32,
    fingerprint: Fingerprint,
    catalog: Catalog,
}

/// Where the snapshot for `dataset_path` lives inside `cache_dir`.
///
/// Different dataset files get different snapshot files.
pub fn snapshot_path(cache_dir: &Path, dataset_path: &Path) -> PathBuf {
    let key = Fingerprint::of(dataset_path.to_string_lossy().as_bytes());
    cache_dir.join(format!("catalog-{}.bin", key))
}

/// A catalog plus the digest of the bytes it was built from.
#[derive(Debug)]
pub struct LoadedCatalog {
    pub catalog: Catalog,
    pub fingerprint: Fingerprint,
    pub from_cache: bool,
}

/// Loads a dataset file into a catalog, going through the snapshot cache when
/// `cache_dir` is set.
///
/// Cache failures are logged and never fatal; only reading or parsing the
/// dataset itself can fail.
pub async fn load_catalog(
    dataset_path: &Path,
    cache_dir: Option<&Path>,
) -> Result<LoadedCatalog, LoadError> {
    let path = dataset_path.to_path_buf();
    let bytes = tokio::task::spawn_blocking(move || read_source(&path))
        .await
        .map_err(|e| LoadError::Io {
            path: dataset_path.to_path_buf(),
            source: std::io::Error::other(e),
        })??;
    let fingerprint = Fingerprint::of(&bytes);

    let snapshot_file = cache_dir.map(|dir| snapshot_path(dir, dataset_path));

    if let Some(file) = &snapshot_file
        && let Some(catalog) = load_snapshot(file, fingerprint).await
    {
        tracing::debug!(
            "Loaded cached catalog for {} ({} emojis)",
            dataset_path.display(),
            catalog.len()
        );
        return Ok(LoadedCatalog {
            catalog,
            fingerprint,
            from_cache: true,
        });
    }

    let dataset = Dataset::from_json(&bytes).map_err(|e| match e {
        LoadError::Parse { source, .. } => LoadError::Parse {
            path: Some(dataset_path.to_path_buf()),
            source,
        },
        other => other,
    })?;
    let catalog = Catalog::new(dataset);

    if let Some(file) = snapshot_file {
        store_snapshot(file, fingerprint, catalog.clone()).await;
    }

    Ok(LoadedCatalog {
        catalog,
        fingerprint,
        from_cache: false,
    })
}

/// Reads the digest of a dataset file without parsing it.
pub async fn fingerprint_file(path: &Path) -> Result<Fingerprint, LoadError> {
    let owned = path.to_path_buf();
    let bytes = tokio::task::spawn_blocking(move || read_source(&owned))
        .await
        .map_err(|e| LoadError::Io {
            path: path.to_path_buf(),
            source: std::io::Error::other(e),
        })??;
    Ok(Fingerprint::of(&bytes))
}

/// Load a snapshot if it exists and matches `fingerprint`; stale snapshots are removed.
async fn load_snapshot(path: &Path, fingerprint: Fingerprint) -> Option<Catalog> {
    let path = path.to_path_buf();
    // Deserialize in spawn_blocking since it's CPU intensive
    let snapshot = tokio::task::spawn_blocking({
        let path = path.clone();
        move || {
            let bytes = std::fs::read(&path).ok()?;
            match from_bytes::<Snapshot>(&bytes) {
                Ok(snapshot) => Some(snapshot),
                Err(e) => {
                    tracing::warn!("Failed to deserialize snapshot at {}: {}", path.display(), e);
                    None
                }
            }
        }
    })
    .await
    .ok()
    .flatten();

    match snapshot {
        Some(s) if s.version == SNAPSHOT_VERSION && s.fingerprint == fingerprint => Some(s.catalog),
        Some(_) => {
            tracing::info!(
                "Snapshot stale, will rebuild catalog (file: {})",
                path.display()
            );
            let _ = tokio::fs::remove_file(&path).await;
            None
        }
        None => None,
    }
}

/// Write a snapshot atomically (temp file, then rename).
async fn store_snapshot(path: PathBuf, fingerprint: Fingerprint, catalog: Catalog) {
    let result = tokio::task::spawn_blocking(move || -> std::io::Result<PathBuf> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let tmp = path.with_extension("bin.tmp");
        let snapshot = Snapshot {
            version: SNAPSHOT_VERSION,
            fingerprint,
            catalog,
        };
        {
            let mut file = std::fs::File::create(&tmp)?;
            if let Err(e) = to_io(&snapshot, &mut file) {
                let _ = std::fs::remove_file(&tmp);
                return Err(std::io::Error::other(e));
            }
        }
        std::fs::rename(&tmp, &path)?;
        Ok(path)
    })
    .await;

    match result {
        Ok(Ok(path)) => tracing::debug!("Cached catalog snapshot to {}", path.display()),
        Ok(Err(e)) => tracing::warn!("Failed to write catalog snapshot: {}", e),
        Err(e) => tracing::warn!("Snapshot writer task failed: {}", e),
    }
}
