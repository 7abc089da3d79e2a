use super::Candidate;
use crate::Result;
use ohno::IntoAppError;
use serde::Deserialize;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

const LOG_TARGET: &str = "    source";

/// Shape of the top-packages snapshot; other top-level keys are ignored.
#[derive(Debug, Deserialize)]
struct TopPackages {
    rows: Vec<Candidate>,
}

/// Load the ranked candidate list from a snapshot file.
///
/// A missing or malformed snapshot is fatal: without candidates there is nothing to chart.
pub fn load_top_packages(path: impl AsRef<Path>) -> Result<Vec<Candidate>> {
    let path = path.as_ref();
    log::info!(target: LOG_TARGET, "Loading top packages from '{}'", path.display());

    let file = File::open(path).into_app_err_with(|| format!("opening top packages snapshot '{}'", path.display()))?;
    let candidates = parse_top_packages(BufReader::new(file)).into_app_err_with(|| format!("reading top packages snapshot '{}'", path.display()))?;

    log::info!(target: LOG_TARGET, "Loaded {} candidate packages", candidates.len());
    Ok(candidates)
}

/// Parse a top-packages snapshot from any reader.
pub fn parse_top_packages(reader: impl Read) -> Result<Vec<Candidate>> {
    let snapshot: TopPackages = serde_json::from_reader(reader).into_app_err("parsing top packages JSON")?;
    Ok(snapshot.rows)
}
