//! Integration tests for the PyPI metadata provider against a wiremock index

use chrono::Utc;
use core::time::Duration;
use ftwheels_lib::wheels::cache::Cache;
use ftwheels_lib::wheels::{Classification, DistributionRecord, Provider, ProviderResult};
use serde_json::json;
use std::path::Path;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Backoff base used by every test so retries finish quickly.
const RETRY_DELAY: Duration = Duration::from_millis(10);

fn provider(server: &MockServer, cache_dir: &Path) -> Provider {
    let cache = Cache::new(cache_dir, Duration::from_secs(3600), Utc::now(), false);
    Provider::new(cache, Some(format!("{}/pypi", server.uri()).as_str()), Duration::from_secs(5), RETRY_DELAY).expect("valid provider")
}

fn project_json(files: &[(&str, &str)]) -> serde_json::Value {
    json!({
        "info": { "name": "pkg", "version": "1.0" },
        "urls": files
            .iter()
            .map(|(packagetype, filename)| json!({ "packagetype": packagetype, "filename": filename }))
            .collect::<Vec<_>>(),
    })
}

fn found(result: ProviderResult<DistributionRecord>) -> DistributionRecord {
    match result {
        ProviderResult::Found(record) => record,
        other => panic!("expected Found, got {other:?}"),
    }
}

#[tokio::test]
async fn test_found_keeps_only_wheels() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/pypi/numpy/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(project_json(&[
            ("sdist", "numpy-2.1.0.tar.gz"),
            ("bdist_wheel", "numpy-2.1.0-cp313-cp313t-manylinux_2_17_x86_64.whl"),
            ("bdist_wheel", "numpy-2.1.0-cp313-cp313-win_amd64.whl"),
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let record = found(provider(&server, temp_dir.path()).get_distribution_record("numpy").await);

    assert_eq!(record.wheel_filenames.len(), 2);
    assert_eq!(record.classification(), Classification::FreeThreaded);
}

#[tokio::test]
async fn test_second_lookup_is_served_from_cache() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/pypi/lxml/json"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(project_json(&[("bdist_wheel", "lxml-5.3.0-cp312-cp312-manylinux_2_28_x86_64.whl")])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let provider = provider(&server, temp_dir.path());

    let first = found(provider.get_distribution_record("lxml").await);
    let second = found(provider.get_distribution_record("lxml").await);

    assert_eq!(first, second);
    assert_eq!(second.classification(), Classification::BinaryIncompatible);
}

#[tokio::test]
async fn test_missing_project_is_unavailable_and_cached() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/pypi/no-such-project/json"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let provider = provider(&server, temp_dir.path());

    for _ in 0..2 {
        let result = provider.get_distribution_record("no-such-project").await;
        assert!(matches!(result, ProviderResult::Unavailable(_)), "expected Unavailable, got {result:?}");
    }
}

#[tokio::test]
async fn test_transient_server_error_is_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/pypi/flaky/json"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/pypi/flaky/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(project_json(&[("bdist_wheel", "flaky-1.0-cp313-cp313t-win_amd64.whl")])))
        .expect(1)
        .mount(&server)
        .await;

    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let record = found(provider(&server, temp_dir.path()).get_distribution_record("flaky").await);

    assert_eq!(record.classification(), Classification::FreeThreaded);
}

#[tokio::test]
async fn test_persistent_server_error_is_an_error_and_not_cached() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/pypi/down/json"))
        .respond_with(ResponseTemplate::new(500))
        // One original attempt plus three retries, for each of the two lookups.
        .expect(8)
        .mount(&server)
        .await;

    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let provider = provider(&server, temp_dir.path());

    for _ in 0..2 {
        let result = provider.get_distribution_record("down").await;
        assert!(matches!(result, ProviderResult::Error(_)), "expected Error, got {result:?}");
    }
}

#[tokio::test]
async fn test_client_error_is_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/pypi/forbidden/json"))
        .respond_with(ResponseTemplate::new(403))
        .expect(1)
        .mount(&server)
        .await;

    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let result = provider(&server, temp_dir.path()).get_distribution_record("forbidden").await;

    assert!(matches!(result, ProviderResult::Error(_)), "expected Error, got {result:?}");
}

#[tokio::test]
async fn test_malformed_body_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/pypi/garbled/json"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .expect(1)
        .mount(&server)
        .await;

    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let result = provider(&server, temp_dir.path()).get_distribution_record("garbled").await;

    assert!(matches!(result, ProviderResult::Error(_)), "expected Error, got {result:?}");
}

#[tokio::test]
async fn test_rate_limited_request_is_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/pypi/popular/json"))
        .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "0"))
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/pypi/popular/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(project_json(&[("bdist_wheel", "popular-1.0-py3-none-any.whl")])))
        .expect(1)
        .mount(&server)
        .await;

    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let record = found(provider(&server, temp_dir.path()).get_distribution_record("popular").await);

    assert_eq!(record.classification(), Classification::PurePython);
}

#[tokio::test]
async fn test_persistent_rate_limit_gives_up() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/pypi/throttled/json"))
        .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "0"))
        .expect(4)
        .mount(&server)
        .await;

    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let result = provider(&server, temp_dir.path()).get_distribution_record("throttled").await;

    assert!(matches!(result, ProviderResult::Error(_)), "expected Error, got {result:?}");
}

#[tokio::test]
async fn test_slow_response_times_out_and_is_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/pypi/sluggish/json"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/pypi/sluggish/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(project_json(&[("bdist_wheel", "sluggish-1.0-cp312-cp312-win_amd64.whl")])))
        .expect(1)
        .mount(&server)
        .await;

    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let cache = Cache::new(temp_dir.path(), Duration::from_secs(3600), Utc::now(), false);
    let provider = Provider::new(cache, Some(format!("{}/pypi", server.uri()).as_str()), Duration::from_millis(200), RETRY_DELAY)
        .expect("valid provider");

    let record = found(provider.get_distribution_record("sluggish").await);
    assert_eq!(record.classification(), Classification::BinaryIncompatible);
}

#[tokio::test]
async fn test_ignore_cache_refetches() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/pypi/six/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(project_json(&[("bdist_wheel", "six-1.16.0-py2.py3-none-any.whl")])))
        .expect(2)
        .mount(&server)
        .await;

    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let index = format!("{}/pypi", server.uri());

    for _ in 0..2 {
        let cache = Cache::new(temp_dir.path(), Duration::from_secs(3600), Utc::now(), true);
        let provider = Provider::new(cache, Some(index.as_str()), Duration::from_secs(5), RETRY_DELAY).expect("valid provider");
        _ = found(provider.get_distribution_record("six").await);
    }
}
