use super::DistributionRecord;
use super::ProviderResult;
use super::cache::{Cache, CacheResult};
use super::path_utils::sanitize_path_component;
use super::pipeline::WheelSource;
use super::resilient_http::resilient_get;
use crate::Result;
use core::time::Duration;
use ohno::{IntoAppError, bail};
use reqwest::StatusCode;
use serde::Deserialize;
use std::sync::Arc;

const LOG_TARGET: &str = "      pypi";

pub const PYPI_BASE_URL: &str = "https://pypi.org/pypi";

const USER_AGENT: &str = concat!("ftwheels/", env!("CARGO_PKG_VERSION"));

const WHEEL_PACKAGE_TYPE: &str = "bdist_wheel";

/// The subset of the PyPI JSON API response that matters here.
#[derive(Debug, Deserialize)]
struct ProjectJson {
    #[serde(default)]
    urls: Vec<ReleaseFile>,
}

#[derive(Debug, Deserialize)]
struct ReleaseFile {
    packagetype: String,
    filename: String,
}

impl ProjectJson {
    fn into_record(self) -> DistributionRecord {
        DistributionRecord::new(
            self.urls
                .into_iter()
                .filter(|file| file.packagetype == WHEEL_PACKAGE_TYPE)
                .map(|file| file.filename)
                .collect(),
        )
    }
}

/// Fetches the wheel filenames of packages from a PyPI-compatible JSON API.
#[derive(Debug, Clone)]
pub struct Provider {
    client: Arc<reqwest::Client>,
    cache: Cache,
    base_url: Arc<str>,
    cache_prefix: Arc<str>,
    request_timeout: Duration,
    retry_base_delay: Duration,
}

impl Provider {
    /// Create a provider for the index rooted at `base_url` (defaults to [`PYPI_BASE_URL`]).
    ///
    /// Cache entries are keyed by the index host and the package name. `request_timeout`
    /// bounds each attempt, and `retry_base_delay` is the first backoff step between retries.
    pub fn new(cache: Cache, base_url: Option<&str>, request_timeout: Duration, retry_base_delay: Duration) -> Result<Self> {
        let base_url = base_url.unwrap_or(PYPI_BASE_URL).trim_end_matches('/');
        let parsed = url::Url::parse(base_url).into_app_err_with(|| format!("parsing index URL '{base_url}'"))?;
        let host = match (parsed.host_str(), parsed.port()) {
            (Some(host), Some(port)) => format!("{host}:{port}"),
            (Some(host), None) => host.to_string(),
            (None, _) => bail!("index URL '{base_url}' has no host"),
        };

        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .into_app_err("creating HTTP client")?;

        log::debug!(target: LOG_TARGET, "Caching responses from '{base_url}' under '{}'", cache.dir().display());

        Ok(Self {
            client: Arc::new(client),
            cache,
            base_url: base_url.into(),
            cache_prefix: sanitize_path_component(&host).into(),
            request_timeout,
            retry_base_delay,
        })
    }

    /// Get the wheel filenames published for the latest release of `name`.
    ///
    /// Never fails outright: a missing project is `Unavailable`. Transient failures are
    /// retried first; whatever still fails, or any other unexpected status or malformed
    /// response, is an `Error`.
    pub async fn get_distribution_record(&self, name: &str) -> ProviderResult<DistributionRecord> {
        let filename = self.get_cache_filename(name);

        match self.cache.load::<DistributionRecord>(&filename) {
            CacheResult::Data(record) => return ProviderResult::Found(record),
            CacheResult::NoData(reason) => return ProviderResult::Unavailable(reason.into()),
            CacheResult::Miss => {}
        }

        match self.fetch_distribution_record(name).await {
            Ok(Some(record)) => {
                log::debug!(target: LOG_TARGET, "Fetched {} wheel(s) for '{name}'", record.wheel_filenames.len());
                if let Err(e) = self.cache.save(&filename, &record) {
                    log::debug!(target: LOG_TARGET, "Could not save cache for '{name}': {e:#}");
                }
                ProviderResult::Found(record)
            }
            Ok(None) => {
                let reason = format!("project '{name}' was not found on '{}'", self.base_url);
                if let Err(e) = self.cache.save_no_data(&filename, &reason) {
                    log::debug!(target: LOG_TARGET, "Could not save cache for '{name}': {e:#}");
                }
                ProviderResult::Unavailable(reason.into())
            }
            Err(e) => ProviderResult::Error(Arc::new(e)),
        }
    }

    fn get_cache_filename(&self, name: &str) -> String {
        format!("{}/{}.json", self.cache_prefix, sanitize_path_component(name))
    }

    fn json_url(&self, name: &str) -> String {
        format!("{}/{name}/json", self.base_url)
    }

    /// Query the JSON API. `Ok(None)` means the index does not know the project.
    async fn fetch_distribution_record(&self, name: &str) -> Result<Option<DistributionRecord>> {
        let url = self.json_url(name);
        log::debug!(target: LOG_TARGET, "Querying '{url}'");

        let response = resilient_get(&self.client, &url, self.request_timeout, self.retry_base_delay)
            .await
            .into_app_err_with(|| format!("sending HTTP request to {url}"))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        if !status.is_success() {
            bail!("unexpected HTTP status {status} from {url}");
        }

        let project: ProjectJson = response
            .json()
            .await
            .into_app_err_with(|| format!("parsing JSON response from {url}"))?;

        Ok(Some(project.into_record()))
    }
}

impl WheelSource for Provider {
    fn distribution_record(&self, name: &str) -> impl Future<Output = ProviderResult<DistributionRecord>> + Send {
        self.get_distribution_record(name)
    }
}
