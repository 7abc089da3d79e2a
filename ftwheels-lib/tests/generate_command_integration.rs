//! End-to-end tests of the generate command: snapshot file and mock index in, chart files out

use camino::Utf8PathBuf;
use core::time::Duration;
use ftwheels_lib::Host;
use ftwheels_lib::commands::{Config, LogLevel, generate};
use serde_json::json;
use std::fs;
use std::io::Write;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Host that captures output to in-memory buffers
#[derive(Debug, Default)]
struct CaptureHost {
    output_buf: Vec<u8>,
    error_buf: Vec<u8>,
}

impl Host for CaptureHost {
    fn output(&mut self) -> impl Write {
        &mut self.output_buf
    }

    fn error(&mut self) -> impl Write {
        &mut self.error_buf
    }
}

async fn mount_wheels(server: &MockServer, name: &str, filename: &str) {
    Mock::given(method("GET"))
        .and(path(format!("/pypi/{name}/json")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "urls": [ { "packagetype": "bdist_wheel", "filename": filename } ]
        })))
        .mount(server)
        .await;
}

struct Workspace {
    _temp_dir: tempfile::TempDir,
    config: Config,
}

fn workspace(server: &MockServer, rows: &serde_json::Value) -> Workspace {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let root = Utf8PathBuf::try_from(temp_dir.path().to_path_buf()).expect("UTF-8 temp dir");

    let top_packages = root.join("top-pypi-packages.json");
    fs::write(&top_packages, serde_json::to_vec(&json!({ "rows": rows })).expect("serializable")).expect("write snapshot");

    let config = Config {
        top_packages,
        results: root.join("site/results.json"),
        wheel: root.join("site/wheel.svg"),
        index_url: format!("{}/pypi", server.uri()),
        cache_dir: Some(root.join("cache")),
        log_level: LogLevel::None,
        max_concurrent_requests: Some(2),
        retry_delay: Duration::from_millis(10),
        ..Config::default()
    };

    Workspace {
        _temp_dir: temp_dir,
        config,
    }
}

#[tokio::test]
async fn test_generate_writes_results_and_wheel() {
    let server = MockServer::start().await;
    mount_wheels(&server, "boto3", "boto3-1.35.0-py3-none-any.whl").await;
    mount_wheels(&server, "numpy", "numpy-2.1.0-cp313-cp313t-manylinux_2_17_x86_64.whl").await;
    mount_wheels(&server, "cryptography", "cryptography-43.0.0-cp39-abi3-manylinux_2_28_x86_64.whl").await;
    mount_wheels(&server, "pydantic-core", "pydantic_core-2.23.0-cp313-cp313t-win_amd64.whl").await;

    let rows = json!([
        { "project": "boto3", "download_count": 400 },
        { "project": "numpy", "download_count": 300 },
        { "project": "cryptography", "download_count": 200 },
        { "project": "pydantic-core", "download_count": 100 },
    ]);
    let ws = workspace(&server, &rows);
    let mut host = CaptureHost::default();

    generate(&mut host, &ws.config, 2).await.expect("generate succeeds");

    let results: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&ws.config.results).expect("results written")).expect("valid JSON");
    let data = results["data"].as_array().expect("data array");
    assert_eq!(data.len(), 2);
    assert_eq!(data[0]["name"], "numpy");
    assert_eq!(data[0]["free_threaded_wheel"], true);
    assert_eq!(data[1]["name"], "cryptography");
    assert_eq!(data[1]["css_class"], "warning");
    assert!(results["last_update"].as_str().expect("timestamp").ends_with(" UTC"));

    let svg = fs::read_to_string(&ws.config.wheel).expect("wheel written");
    assert_eq!(svg.matches("<path ").count(), 2);
    assert!(svg.contains("<title>numpy 🧵</title>"));
    assert!(svg.contains("<title>cryptography ✗</title>"));
    assert!(svg.contains(">1<title>50%</title></text>"));

    let summary = String::from_utf8(host.output_buf).expect("UTF-8 output");
    assert!(summary.starts_with("Charted 2 packages, "));
    assert!(summary.contains("with free-threaded wheels (50%)"));
    assert!(host.error_buf.is_empty());
}

#[tokio::test]
async fn test_generate_reports_unreachable_packages_on_error_stream() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/pypi/broken/json"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;
    mount_wheels(&server, "numpy", "numpy-2.1.0-cp313-cp313t-manylinux_2_17_x86_64.whl").await;

    let rows = json!([
        { "project": "broken", "download_count": 20 },
        { "project": "numpy", "download_count": 10 },
    ]);
    let ws = workspace(&server, &rows);
    let mut host = CaptureHost::default();

    generate(&mut host, &ws.config, 1).await.expect("fetch failures are not fatal");

    let errors = String::from_utf8(host.error_buf).expect("UTF-8 output");
    assert_eq!(errors, "Could not fetch metadata for 1 package(s), treated as having no wheels: broken\n");

    let summary = String::from_utf8(host.output_buf).expect("UTF-8 output");
    assert!(summary.starts_with("Charted 1 packages, "));
}

#[tokio::test]
async fn test_generate_with_too_few_candidates_is_not_an_error() {
    let server = MockServer::start().await;
    mount_wheels(&server, "lxml", "lxml-5.3.0-cp312-cp312-manylinux_2_28_x86_64.whl").await;

    let ws = workspace(&server, &json!([ { "project": "lxml", "download_count": 10 } ]));
    let mut host = CaptureHost::default();

    generate(&mut host, &ws.config, 360).await.expect("generate succeeds");

    let results: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&ws.config.results).expect("results written")).expect("valid JSON");
    assert_eq!(results["data"].as_array().expect("data array").len(), 1);
}

#[tokio::test]
async fn test_generate_fails_on_missing_snapshot() {
    let server = MockServer::start().await;
    let ws = workspace(&server, &json!([]));
    let config = Config {
        top_packages: ws.config.top_packages.with_file_name("missing.json"),
        ..ws.config.clone()
    };
    let mut host = CaptureHost::default();

    assert!(generate(&mut host, &config, 5).await.is_err());
    assert!(!config.results.exists());
    assert!(!config.wheel.exists());
}

#[tokio::test]
async fn test_generate_fails_on_malformed_snapshot() {
    let server = MockServer::start().await;
    let ws = workspace(&server, &json!([]));
    fs::write(&ws.config.top_packages, "{ \"rows\": [ { \"project\": 5 } ] }").expect("write snapshot");
    let mut host = CaptureHost::default();

    assert!(generate(&mut host, &ws.config, 5).await.is_err());
    assert!(!ws.config.results.exists());
}
