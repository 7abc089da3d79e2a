//! End-to-end chart generation: snapshot in, JSON and SVG out.

use super::config::{Config, LogLevel};
use super::{Host, ProgressReporter};
use crate::Result;
use crate::fs_utils::write_atomic;
use crate::reports::{free_threaded_count, generate_json, generate_svg, percentage};
use crate::source::load_top_packages;
use crate::wheels::cache::Cache;
use crate::source::Candidate;
use crate::wheels::{AnnotatedPackage, Pipeline, Provider};
use chrono::{DateTime, Utc};
use core::time::Duration;
use ohno::IntoAppError;
use owo_colors::OwoColorize;
use std::io::{IsTerminal, Write, stderr, stdout};

const LOG_TARGET: &str = "  generate";

/// Classify the top `count` relevant packages and write the JSON snapshot and SVG wheel.
///
/// # Errors
///
/// Returns an error if the snapshot cannot be loaded, the index client cannot be built,
/// a scan task panics, or an output file cannot be written.
pub async fn generate<H: Host>(host: &mut H, config: &Config, count: usize) -> Result<()> {
    init_logging(config.log_level);

    let now = Utc::now();
    let candidates = load_top_packages(&config.top_packages)?;

    let cache = Cache::new(config.cache_dir()?, config.cache_ttl, now, config.ignore_cache);
    let provider = Provider::new(cache, Some(config.index_url.as_str()), config.request_timeout, config.retry_delay)?;

    let delay = if config.log_level <= LogLevel::Warn {
        Duration::from_millis(300)
    } else {
        Duration::from_hours(365 * 24)
    };
    let progress = ProgressReporter::new(delay, stderr().is_terminal());

    let pipeline = Pipeline::new(provider, config.max_concurrent_requests(), config.include_no_wheel, progress);
    let report = pipeline.classify(candidates, count).await?;

    write_outputs(config, &report.packages, now)?;
    write_summary(host, config, &report.packages, stdout().is_terminal());
    write_fetch_failures(host, &report.failed);

    Ok(())
}

fn write_outputs(config: &Config, packages: &[AnnotatedPackage], now: DateTime<Utc>) -> Result<()> {
    let mut json = Vec::new();
    generate_json(packages, now, &mut json)?;
    write_atomic(&config.results, &json).into_app_err_with(|| format!("writing results to '{}'", config.results))?;
    log::info!(target: LOG_TARGET, "Wrote {} packages to '{}'", packages.len(), config.results);

    let mut svg = String::new();
    generate_svg(packages, &mut svg)?;
    write_atomic(&config.wheel, svg.as_bytes()).into_app_err_with(|| format!("writing wheel to '{}'", config.wheel))?;
    log::info!(target: LOG_TARGET, "Wrote wheel chart to '{}'", config.wheel);

    Ok(())
}

fn write_summary<H: Host>(host: &mut H, config: &Config, packages: &[AnnotatedPackage], use_colors: bool) {
    let total = packages.len();
    let free_threaded = free_threaded_count(packages);
    let share = format!("{:.0}%", percentage(free_threaded, total));
    let free_threaded = if use_colors {
        free_threaded.green().to_string()
    } else {
        free_threaded.to_string()
    };

    _ = writeln!(
        host.output(),
        "Charted {total} packages, {free_threaded} with free-threaded wheels ({share}); wrote '{}' and '{}'",
        config.results,
        config.wheel
    );
}

/// Tell the user which packages were charted as `no-wheel` only because their metadata could not be fetched.
fn write_fetch_failures<H: Host>(host: &mut H, failed: &[Candidate]) {
    if failed.is_empty() {
        return;
    }

    let names: Vec<&str> = failed.iter().map(Candidate::name).collect();
    _ = writeln!(
        host.error(),
        "Could not fetch metadata for {} package(s), treated as having no wheels: {}",
        failed.len(),
        names.join(", ")
    );
}

fn init_logging(log_level: LogLevel) {
    let level = match log_level {
        LogLevel::None => return,
        LogLevel::Error => "error",
        LogLevel::Warn => "warn",
        LogLevel::Info => "info",
        LogLevel::Debug => "debug",
        LogLevel::Trace => "trace",
    };

    let env = env_logger::Env::default().filter_or("RUST_LOG", level);

    // A logger may already be installed when the command runs more than once in a process.
    _ = env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .format_module_path(false)
        .format_target(matches!(log_level, LogLevel::Debug | LogLevel::Trace))
        .try_init();
}
