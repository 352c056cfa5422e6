mod common;

use assert2::{check, let_assert};
use common::{IsolatedCatalog, SAMPLE_DATASET, isolated_catalog};
use nmoji::LoadError;
use nmoji::cache::{Fingerprint, load_catalog, snapshot_path};
use nmoji::worker::ReloadWorker;
use rstest::rstest;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

const ROCKET_ONLY: &str =
    r#"[{"emoji": "🚀", "description": "rocket", "category": "Travel & Places", "tags": ["launch"]}]"#;

fn worker(isolated: &IsolatedCatalog) -> ReloadWorker {
    ReloadWorker::new(
        isolated.state.clone(),
        isolated.dataset.clone(),
        Duration::from_millis(20),
    )
}

// --- Snapshot cache ---

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn first_load_writes_snapshot(isolated_catalog: IsolatedCatalog) {
    let cache_dir = isolated_catalog.workspace.path().join("cache");
    let expected = snapshot_path(&cache_dir, &isolated_catalog.dataset);

    check!(expected.exists());
    check!(isolated_catalog.snapshots().len() == 1);
    check!(
        isolated_catalog.state.fingerprint().await
            == Some(Fingerprint::of(SAMPLE_DATASET.as_bytes()))
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn second_load_reuses_snapshot(isolated_catalog: IsolatedCatalog) {
    let cache_dir = isolated_catalog.workspace.path().join("cache");
    let loaded = load_catalog(&isolated_catalog.dataset, Some(&cache_dir))
        .await
        .unwrap();

    check!(loaded.from_cache);
    check!(loaded.catalog == *isolated_catalog.state.catalog().await);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn changed_dataset_invalidates_snapshot(isolated_catalog: IsolatedCatalog) {
    let cache_dir = isolated_catalog.workspace.path().join("cache");
    isolated_catalog.rewrite_dataset(ROCKET_ONLY);

    let loaded = load_catalog(&isolated_catalog.dataset, Some(&cache_dir))
        .await
        .unwrap();
    check!(!loaded.from_cache);
    check!(loaded.catalog.len() == 1);
    check!(isolated_catalog.snapshots().len() == 1);

    let again = load_catalog(&isolated_catalog.dataset, Some(&cache_dir))
        .await
        .unwrap();
    check!(again.from_cache);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn corrupt_snapshot_falls_back_to_dataset(isolated_catalog: IsolatedCatalog) {
    let cache_dir = isolated_catalog.workspace.path().join("cache");
    let snapshot = snapshot_path(&cache_dir, &isolated_catalog.dataset);
    std::fs::write(&snapshot, b"garbage").unwrap();

    let loaded = load_catalog(&isolated_catalog.dataset, Some(&cache_dir))
        .await
        .unwrap();
    check!(!loaded.from_cache);
    check!(loaded.catalog.len() == 5);
}

#[tokio::test]
async fn missing_dataset_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.json");

    let_assert!(Err(LoadError::NotFound { path: reported }) = load_catalog(&path, None).await);
    check!(reported == path);
}

// --- Reload worker ---

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unchanged_dataset_is_not_reloaded(isolated_catalog: IsolatedCatalog) {
    check!(!worker(&isolated_catalog).check_once().await);
    check!(isolated_catalog.state.catalog().await.len() == 5);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn changed_dataset_is_swapped_in(isolated_catalog: IsolatedCatalog) {
    let state = &isolated_catalog.state;
    let catalog = state.catalog().await;
    state.related(&catalog, 0, 12).await;
    check!(state.related_cached_len().await == 1);

    isolated_catalog.rewrite_dataset(ROCKET_ONLY);
    check!(worker(&isolated_catalog).check_once().await);

    let reloaded = state.catalog().await;
    check!(reloaded.len() == 1);
    check!(reloaded.find("🚀").is_some());
    check!(state.related_cached_len().await == 0);
    check!(state.fingerprint().await == Some(Fingerprint::of(ROCKET_ONLY.as_bytes())));

    // Handlers holding the previous catalog keep a consistent view
    check!(catalog.len() == 5);
}

#[rstest]
#[case::invalid_json("[{\"emoji\": ")]
#[case::wrong_shape(r#"{"emoji": "🚀"}"#)]
#[tokio::test(flavor = "multi_thread")]
async fn broken_dataset_keeps_current_catalog(
    isolated_catalog: IsolatedCatalog,
    #[case] contents: &str,
) {
    isolated_catalog.rewrite_dataset(contents);

    check!(!worker(&isolated_catalog).check_once().await);
    check!(isolated_catalog.state.catalog().await.len() == 5);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deleted_dataset_keeps_current_catalog(isolated_catalog: IsolatedCatalog) {
    std::fs::remove_file(&isolated_catalog.dataset).unwrap();

    check!(!worker(&isolated_catalog).check_once().await);
    check!(isolated_catalog.state.catalog().await.len() == 5);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn running_worker_picks_up_changes_and_stops(isolated_catalog: IsolatedCatalog) {
    let cancel = CancellationToken::new();
    let reload = worker(&isolated_catalog);
    let handle = tokio::spawn({
        let cancel = cancel.clone();
        async move { reload.run(cancel).await }
    });

    isolated_catalog.rewrite_dataset(ROCKET_ONLY);

    let state = isolated_catalog.state.clone();
    let reloaded = tokio::time::timeout(Duration::from_secs(5), async move {
        while state.catalog().await.len() != 1 {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await;
    check!(reloaded.is_ok(), "worker never swapped in the new dataset");

    cancel.cancel();
    let stopped = tokio::time::timeout(Duration::from_secs(5), handle).await;
    check!(matches!(stopped, Ok(Ok(()))));
}
