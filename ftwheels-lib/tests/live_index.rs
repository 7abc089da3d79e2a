//! Smoke test against the live PyPI index. Requires network access.

#![cfg(feature = "network_tests")]

use chrono::Utc;
use core::time::Duration;
use ftwheels_lib::wheels::cache::Cache;
use ftwheels_lib::wheels::{Classification, PYPI_BASE_URL, Provider, ProviderResult};

#[tokio::test]
async fn test_numpy_publishes_free_threaded_wheels() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let cache = Cache::new(temp_dir.path(), Duration::from_secs(3600), Utc::now(), true);
    let provider = Provider::new(cache, Some(PYPI_BASE_URL), Duration::from_secs(30), Duration::from_secs(1)).expect("valid provider");

    match provider.get_distribution_record("numpy").await {
        ProviderResult::Found(record) => assert_eq!(record.classification(), Classification::FreeThreaded),
        other => panic!("expected Found, got {other:?}"),
    }
}

#[tokio::test]
async fn test_unknown_project_is_unavailable() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let cache = Cache::new(temp_dir.path(), Duration::from_secs(3600), Utc::now(), true);
    let provider = Provider::new(cache, None, Duration::from_secs(30), Duration::from_secs(1)).expect("valid provider");

    let result = provider.get_distribution_record("this-project-does-not-exist-ftwheels").await;
    assert!(matches!(result, ProviderResult::Unavailable(_)), "expected Unavailable, got {result:?}");
}
