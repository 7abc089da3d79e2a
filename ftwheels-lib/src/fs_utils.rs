//! Filesystem helpers shared by the cache and the report writers.

use crate::Result;
use ohno::IntoAppError;
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Replace the file at `path` with `contents` without ever exposing a partial file.
///
/// The data is written to a temporary file in the destination directory, which is then
/// renamed over the target. On failure the temporary file is removed and any existing
/// file at `path` is left untouched.
pub fn write_atomic(path: impl AsRef<Path>, contents: &[u8]) -> Result<()> {
    let path = path.as_ref();
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    fs::create_dir_all(dir).into_app_err_with(|| format!("creating directory '{}'", dir.display()))?;

    let mut temp = NamedTempFile::new_in(dir).into_app_err_with(|| format!("creating temporary file in '{}'", dir.display()))?;
    temp.write_all(contents)
        .into_app_err_with(|| format!("writing temporary file for '{}'", path.display()))?;
    temp.as_file()
        .sync_all()
        .into_app_err_with(|| format!("flushing temporary file for '{}'", path.display()))?;

    _ = temp.persist(path).into_app_err_with(|| format!("replacing '{}'", path.display()))?;
    Ok(())
}
