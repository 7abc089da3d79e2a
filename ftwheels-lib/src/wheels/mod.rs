//! Wheel metadata collection and package classification
//!
//! This module answers one question per package: does it publish a wheel that runs on
//! a free-threaded CPython build?
//!
//! # Implementation Model
//!
//! - [`wheel_tag`] extracts the ABI tag from a wheel filename and sorts each artifact
//!   into pure-Python, free-threaded, or ordinary binary.
//! - [`Classification`] folds the artifacts of one package into a single outcome and
//!   maps that outcome to its display metadata through a lookup table.
//! - [`Provider`] queries the PyPI JSON API for the wheel filenames of a package,
//!   caching responses on disk with a TTL. Requests go through a retry and timeout stack
//!   so transient 5xx, 429 and transport failures are retried before they count.
//!   Failures are returned as values in a [`ProviderResult`] so one unreachable package
//!   never aborts a batch.
//! - [`Pipeline`] drives the scan: it fetches packages concurrently through a
//!   [`Throttler`], consumes results strictly in rank order, and backfills with the next
//!   candidate each time a package turns out to be irrelevant for the chart.

mod annotated_package;
pub mod cache;
mod classification;
mod distribution_record;
mod path_utils;
mod pipeline;
mod progress;
mod provider;
mod provider_result;
mod resilient_http;
mod throttler;
pub mod wheel_tag;

pub use annotated_package::AnnotatedPackage;
pub use classification::{Classification, DisplayInfo};
pub use distribution_record::DistributionRecord;
pub use pipeline::{Pipeline, ScanReport, WheelSource, default_concurrency};
pub use progress::Progress;
pub use provider::{PYPI_BASE_URL, Provider};
pub use provider_result::ProviderResult;
pub use throttler::Throttler;
