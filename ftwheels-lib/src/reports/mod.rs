//! Output generation for classified packages
//!
//! Two artifacts are produced from the same ordered slice of [`AnnotatedPackage`]:
//!
//! - **JSON**: the full result set plus a human-readable UTC timestamp, consumed by the
//!   web page that embeds the chart.
//! - **SVG**: the "wheel", one equal-angle annular wedge per package starting at twelve
//!   o'clock and running clockwise, with the free-threaded fraction in the middle.
//!   Styling is left to an external `wheel.css` stylesheet keyed on each wedge's class.
//!
//! Both generators are pure: they write into a caller-supplied buffer, and the caller
//! decides where and how the bytes land on disk.

mod json;
mod svg;

pub use json::{format_last_update, generate as generate_json};
pub use svg::{annular_sector_path, generate as generate_svg, wedge_angles};

use crate::wheels::AnnotatedPackage;

/// Number of packages that publish at least one free-threaded wheel.
#[must_use]
pub fn free_threaded_count(packages: &[AnnotatedPackage]) -> usize {
    packages.iter().filter(|p| p.free_threaded_wheel).count()
}

/// `part` as a percentage of `total`, or zero when `total` is zero.
#[must_use]
#[expect(clippy::cast_precision_loss, reason = "package counts are far below 2^52")]
pub fn percentage(part: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }

    part as f64 * 100.0 / total as f64
}
