use crate::Result;
use crate::wheels::{PYPI_BASE_URL, default_concurrency};
use camino::{Utf8Path, Utf8PathBuf};
use core::time::Duration;
use directories::BaseDirs;
use ohno::{IntoAppError, app_err};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::PathBuf;

const LOG_TARGET: &str = "    config";

/// The default configuration TOML content, embedded from `default_config.toml`
pub const DEFAULT_CONFIG_TOML: &str = include_str!("../../default_config.toml");

/// Name of the configuration file looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "ftwheels.toml";

/// Log level for diagnostic output
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// No logging output
    None,

    /// Only error messages
    Error,

    /// Warning and error messages
    Warn,

    /// Info, warning, and error messages
    Info,

    /// Debug, info, warning, and error messages
    Debug,

    /// Trace, debug, info, warning, and error messages
    Trace,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Ranked snapshot of the most-downloaded packages
    #[serde(default = "default_top_packages")]
    pub top_packages: Utf8PathBuf,

    /// JSON output path
    #[serde(default = "default_results")]
    pub results: Utf8PathBuf,

    /// SVG output path
    #[serde(default = "default_wheel")]
    pub wheel: Utf8PathBuf,

    /// Root of the JSON metadata API
    #[serde(default = "default_index_url")]
    pub index_url: String,

    /// Directory for cached index responses (platform cache directory when unset)
    #[serde(default)]
    pub cache_dir: Option<Utf8PathBuf>,

    /// Duration to keep index responses before re-fetching
    #[serde(default = "default_cache_ttl", with = "humantime_serde")]
    pub cache_ttl: Duration,

    /// Ignore cached data and fetch everything fresh
    #[serde(default)]
    pub ignore_cache: bool,

    /// Timeout of a single HTTP request
    #[serde(default = "default_request_timeout", with = "humantime_serde")]
    pub request_timeout: Duration,

    /// First backoff step before a failed request is retried; later retries wait longer
    #[serde(default = "default_retry_delay", with = "humantime_serde")]
    pub retry_delay: Duration,

    /// Number of requests in flight at once (host default when unset)
    #[serde(default)]
    pub max_concurrent_requests: Option<usize>,

    /// Chart packages that publish no wheels
    #[serde(default)]
    pub include_no_wheel: bool,

    /// Logging verbosity
    #[serde(default = "default_log_level")]
    pub log_level: LogLevel,
}

fn default_top_packages() -> Utf8PathBuf {
    Utf8PathBuf::from("top-pypi-packages.json")
}

fn default_results() -> Utf8PathBuf {
    Utf8PathBuf::from("results.json")
}

fn default_wheel() -> Utf8PathBuf {
    Utf8PathBuf::from("wheel.svg")
}

fn default_index_url() -> String {
    PYPI_BASE_URL.to_string()
}

const fn default_cache_ttl() -> Duration {
    Duration::from_hours(1)
}

const fn default_request_timeout() -> Duration {
    Duration::from_secs(30)
}

const fn default_retry_delay() -> Duration {
    Duration::from_secs(1)
}

const fn default_log_level() -> LogLevel {
    LogLevel::Warn
}

impl Config {
    /// Load `ftwheels.toml` from `dir`, or use defaults when there is none
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or fails validation
    pub fn load(dir: &Utf8Path) -> Result<Self> {
        let path = dir.join(CONFIG_FILE_NAME);
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::debug!(target: LOG_TARGET, "No '{path}' found, using the default configuration");
                return Ok(Self::default());
            }
            Err(e) => return Err(e).into_app_err_with(|| format!("reading ftwheels configuration file '{path}'")),
        };

        Self::parse(&text).into_app_err_with(|| format!("loading configuration file '{path}'"))
    }

    /// Parse and validate configuration text
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid TOML for this configuration or fails validation
    pub fn parse(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text).into_app_err("parsing configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns an error if the index URL is not an absolute http(s) URL or a numeric setting is zero
    fn validate(&self) -> Result<()> {
        let url = url::Url::parse(&self.index_url).into_app_err_with(|| format!("index_url '{}' is not a valid URL", self.index_url))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(app_err!("index_url must use http or https, got '{}'", self.index_url));
        }

        if self.max_concurrent_requests == Some(0) {
            return Err(app_err!("max_concurrent_requests must be at least 1"));
        }

        if self.cache_ttl.is_zero() {
            return Err(app_err!("cache_ttl must be greater than zero"));
        }

        if self.request_timeout.is_zero() {
            return Err(app_err!("request_timeout must be greater than zero"));
        }

        Ok(())
    }

    /// The configured cache directory, or `ftwheels` under the platform cache directory
    ///
    /// # Errors
    ///
    /// Returns an error if no cache directory is configured and the platform has none
    pub fn cache_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.cache_dir {
            return Ok(dir.as_std_path().to_path_buf());
        }

        Ok(BaseDirs::new()
            .into_app_err("could not determine cache directory")?
            .cache_dir()
            .join("ftwheels"))
    }

    #[must_use]
    pub fn max_concurrent_requests(&self) -> usize {
        self.max_concurrent_requests.unwrap_or_else(default_concurrency)
    }
}

impl Default for Config {
    fn default() -> Self {
        toml::from_str(DEFAULT_CONFIG_TOML).expect("default_config.toml should be valid TOML that deserializes to Config")
    }
}
