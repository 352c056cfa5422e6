//! Shared catalog state and the background reload worker.
//!
//! The worker polls the dataset file, and when its contents change it builds a
//! fresh catalog and swaps it in. Tool handlers only ever see a complete catalog.

use crate::cache::{Fingerprint, fingerprint_file, load_catalog};
use crate::catalog::Catalog;
use crate::config::Config;
use crate::search::ScoredMatch;
use lru::LruCache;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tokio::time::{Duration, interval};
use tokio_util::sync::CancellationToken;

/// Maximum number of memoized related-emoji results.
const RELATED_CACHE_SIZE: usize = 64;

/// Shared state for catalog access and related-result memoization.
pub struct CatalogState {
    /// Current catalog; replaced wholesale on reload
    catalog: RwLock<Arc<Catalog>>,

    /// Related results keyed by (position, limit)
    related: Mutex<LruCache<(usize, usize), Arc<Vec<ScoredMatch>>>>,

    /// Digest of the dataset the current catalog was built from
    fingerprint: RwLock<Option<Fingerprint>>,

    config: Config,
}

impl std::fmt::Debug for CatalogState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogState")
            .field("emojis", &self.catalog.try_read().map(|c| c.len()).ok())
            .field("related_cached", &self.related.try_lock().map(|c| c.len()).ok())
            .field("dataset", &self.config.dataset)
            .finish()
    }
}

impl CatalogState {
    /// Wrap an already built catalog.
    pub fn new(catalog: Catalog, config: Config) -> Self {
        Self {
            catalog: RwLock::new(Arc::new(catalog)),
            related: Mutex::new(LruCache::new(
                NonZeroUsize::new(RELATED_CACHE_SIZE).unwrap_or(NonZeroUsize::MIN),
            )),
            fingerprint: RwLock::new(None),
            config,
        }
    }

    /// Build state from configuration: the configured dataset file, or the embedded one.
    pub async fn load(config: Config) -> Result<Self, crate::error::LoadError> {
        let Some(path) = config.dataset.clone() else {
            tracing::info!("No dataset configured, using embedded emoji list");
            return Ok(Self::new(Catalog::builtin(), config));
        };

        let cache_dir = config.resolved_cache_dir();
        let loaded = load_catalog(&path, cache_dir.as_deref()).await?;
        tracing::info!(
            "Loaded {} emojis from {}{}",
            loaded.catalog.len(),
            path.display(),
            if loaded.from_cache { " (cached)" } else { "" }
        );

        let state = Self::new(loaded.catalog, config);
        *state.fingerprint.write().await = Some(loaded.fingerprint);
        Ok(state)
    }

    /// Snapshot of the current catalog.
    pub async fn catalog(&self) -> Arc<Catalog> {
        self.catalog.read().await.clone()
    }

    pub const fn config(&self) -> &Config {
        &self.config
    }

    pub fn dataset_path(&self) -> Option<&PathBuf> {
        self.config.dataset.as_ref()
    }

    pub async fn fingerprint(&self) -> Option<Fingerprint> {
        *self.fingerprint.read().await
    }

    /// Swap in a new catalog and drop memoized results computed against the old one.
    pub async fn replace(&self, catalog: Catalog, fingerprint: Option<Fingerprint>) {
        // Memo is cleared under the write lock so no reader sees the new catalog with old entries
        let mut current = self.catalog.write().await;
        *current = Arc::new(catalog);
        *self.fingerprint.write().await = fingerprint;
        self.related.lock().await.clear();
    }

    /// Related matches for the record at `position`, memoized.
    ///
    /// The catalog is passed in so callers resolve positions against the same
    /// catalog the matches were computed from. Only the live catalog is memoized;
    /// lock order is catalog, then memo, same as [`Self::replace`].
    pub async fn related(
        &self,
        catalog: &Arc<Catalog>,
        position: usize,
        limit: usize,
    ) -> Arc<Vec<ScoredMatch>> {
        let key = (position, limit);
        {
            let live = self.catalog.read().await;
            if !Arc::ptr_eq(&*live, catalog) {
                return Arc::new(catalog.related_positions(position, limit));
            }
            if let Some(hit) = self.related.lock().await.get(&key) {
                tracing::debug!("Related cache hit for position {}", position);
                return hit.clone();
            }
        }

        let matches = Arc::new(catalog.related_positions(position, limit));

        let live = self.catalog.read().await;
        let mut memo = self.related.lock().await;
        if Arc::ptr_eq(&*live, catalog) {
            memo.put(key, matches.clone());
        } else {
            tracing::debug!("Catalog replaced during related lookup, not memoizing");
        }
        matches
    }

    pub async fn related_cached_len(&self) -> usize {
        self.related.lock().await.len()
    }
}

/// Background worker that re-fingerprints the dataset and reloads on change.
pub struct ReloadWorker {
    state: Arc<CatalogState>,
    path: PathBuf,
    period: Duration,
}

impl ReloadWorker {
    pub fn new(state: Arc<CatalogState>, path: PathBuf, period: Duration) -> Self {
        Self {
            state,
            path,
            period,
        }
    }

    /// Run until `cancel` fires.
    pub async fn run(&self, cancel: CancellationToken) {
        let mut ticker = interval(self.period);
        // The first tick completes immediately; the catalog was just loaded
        ticker.tick().await;

        loop {
            tokio::select! {
                () = cancel.cancelled() => {
                    tracing::debug!("Reload worker stopped");
                    return;
                }
                _ = ticker.tick() => {
                    self.check_once().await;
                }
            }
        }
    }

    /// One reload cycle. Returns true when a new catalog was swapped in.
    pub async fn check_once(&self) -> bool {
        let fingerprint = match fingerprint_file(&self.path).await {
            Ok(fp) => fp,
            Err(e) => {
                tracing::warn!("Dataset check failed, keeping current catalog: {}", e);
                return false;
            }
        };

        if self.state.fingerprint().await == Some(fingerprint) {
            tracing::trace!("Dataset unchanged");
            return false;
        }

        let cache_dir = self.state.config().resolved_cache_dir();
        match load_catalog(&self.path, cache_dir.as_deref()).await {
            Ok(loaded) => {
                tracing::info!(
                    "Dataset changed, reloaded {} emojis from {}",
                    loaded.catalog.len(),
                    self.path.display()
                );
                self.state
                    .replace(loaded.catalog, Some(loaded.fingerprint))
                    .await;
                true
            }
            Err(e) => {
                tracing::warn!("Dataset reload failed, keeping current catalog: {}", e);
                false
            }
        }
    }
}

/// Spawn the reload worker when a dataset file and a reload interval are configured.
pub fn spawn_reload_worker(
    state: Arc<CatalogState>,
    cancel: CancellationToken,
) -> Option<tokio::task::JoinHandle<()>> {
    let path = state.dataset_path()?.clone();
    let period = state.config().reload_interval()?;
    tracing::debug!("Watching {} every {:?}", path.display(), period);

    Some(tokio::spawn(async move {
        ReloadWorker::new(state, path, period).run(cancel).await;
    }))
}
