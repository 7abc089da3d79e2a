use crate::Result;
use crate::wheels::AnnotatedPackage;
use chrono::{DateTime, Utc};
use ohno::IntoAppError;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::io::Write;

#[derive(Debug, Serialize)]
struct Snapshot<'a> {
    data: &'a [AnnotatedPackage],
    last_update: String,
}

/// Format a timestamp the way the snapshot reports it, e.g. `Monday, 15 January 2024, 10:30:00 UTC`.
#[must_use]
pub fn format_last_update(now: DateTime<Utc>) -> String {
    now.format("%A, %d %B %Y, %H:%M:%S %Z").to_string()
}

/// Write the `{data, last_update}` snapshot as single-space indented JSON.
pub fn generate<W: Write>(packages: &[AnnotatedPackage], now: DateTime<Utc>, writer: &mut W) -> Result<()> {
    let snapshot = Snapshot {
        data: packages,
        last_update: format_last_update(now),
    };

    let mut serializer = serde_json::Serializer::with_formatter(&mut *writer, PrettyFormatter::with_indent(b" "));
    snapshot.serialize(&mut serializer).into_app_err("serializing results")?;
    writeln!(writer).into_app_err("writing results")?;

    Ok(())
}
