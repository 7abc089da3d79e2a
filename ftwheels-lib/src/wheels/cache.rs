//! A TTL-aware response cache backed by JSON files.
//!
//! [`Cache`] wraps a cache directory, TTL, and the run timestamp so that callers
//! don't need to thread those values through every load/save call. Entries are
//! replaced atomically, so concurrent tasks writing the same key never leave a
//! torn file behind.

use crate::Result;
use crate::fs_utils::write_atomic;
use chrono::{DateTime, Utc};
use core::time::Duration;
use ohno::IntoAppError;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

const LOG_TARGET: &str = "     cache";

/// Result of loading an entry from the cache.
#[derive(Debug, Clone)]
pub enum CacheResult<T> {
    /// Cached data was found and is still fresh.
    Data(T),

    /// A negative entry exists: the index previously reported no data.
    NoData(String),

    /// No usable entry (missing, expired, corrupt, or the cache is bypassed).
    Miss,
}

/// On-disk representation of a cache entry.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct Envelope<T> {
    timestamp: DateTime<Utc>,
    payload: EnvelopePayload<T>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
enum EnvelopePayload<T> {
    Data(T),
    NoData(String),
}

/// A TTL-aware, directory-backed JSON cache.
#[derive(Debug, Clone)]
pub struct Cache {
    dir: PathBuf,
    ttl: Duration,
    now: DateTime<Utc>,
    ignore: bool,
}

impl Cache {
    #[must_use]
    pub fn new(cache_dir: impl Into<PathBuf>, cache_ttl: Duration, now: DateTime<Utc>, ignore_cache: bool) -> Self {
        Self {
            dir: cache_dir.into(),
            ttl: cache_ttl,
            now,
            ignore: ignore_cache,
        }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Load an entry by filename, relative to the cache directory.
    #[must_use]
    pub fn load<T>(&self, filename: &str) -> CacheResult<T>
    where
        T: for<'de> Deserialize<'de>,
    {
        if self.ignore {
            return CacheResult::Miss;
        }

        let path = self.dir.join(filename);
        let file = match File::open(&path) {
            Ok(file) => file,
            Err(e) => {
                log::debug!(target: LOG_TARGET, "Cache miss for {filename}: {e:#}");
                return CacheResult::Miss;
            }
        };

        let envelope: Envelope<T> = match serde_json::from_reader(BufReader::new(file)) {
            Ok(envelope) => envelope,
            Err(e) => {
                log::debug!(target: LOG_TARGET, "Cache miss for {filename}: {e:#}");
                return CacheResult::Miss;
            }
        };

        let age = self.now.signed_duration_since(envelope.timestamp);
        if age.num_seconds() < 0 {
            log::debug!(target: LOG_TARGET, "Cache timestamp is in the future for {filename} (clock skew detected), treating as fresh");
        } else {
            let age = age.to_std().unwrap_or(Duration::MAX);
            if age >= self.ttl {
                log::debug!(
                    target: LOG_TARGET,
                    "Cache expired for {filename} (age: {}s, TTL: {}s)",
                    age.as_secs(),
                    self.ttl.as_secs()
                );
                return CacheResult::Miss;
            }

            log::debug!(target: LOG_TARGET, "Cache hit for {filename} (age: {}s)", age.as_secs());
        }

        match envelope.payload {
            EnvelopePayload::Data(data) => CacheResult::Data(data),
            EnvelopePayload::NoData(reason) => CacheResult::NoData(reason),
        }
    }

    /// Store data under the given filename.
    pub fn save<T>(&self, filename: &str, data: &T) -> Result<()>
    where
        T: Serialize,
    {
        self.write_envelope(
            filename,
            &Envelope {
                timestamp: self.now,
                payload: EnvelopePayload::Data(data),
            },
        )
    }

    /// Store a negative entry under the given filename.
    pub fn save_no_data(&self, filename: &str, reason: &str) -> Result<()> {
        self.write_envelope(
            filename,
            &Envelope::<()> {
                timestamp: self.now,
                payload: EnvelopePayload::NoData(reason.to_string()),
            },
        )
    }

    fn write_envelope<T: Serialize>(&self, filename: &str, envelope: &Envelope<T>) -> Result<()> {
        let path = self.dir.join(filename);

        #[cfg(debug_assertions)]
        let bytes = serde_json::to_vec_pretty(envelope);
        #[cfg(not(debug_assertions))]
        let bytes = serde_json::to_vec(envelope);

        let bytes = bytes.into_app_err_with(|| format!("serializing cache entry '{}'", path.display()))?;
        write_atomic(&path, &bytes)
    }
}
