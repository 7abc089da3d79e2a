//! Ranked package candidates
//!
//! The input to a run is a snapshot of the most-downloaded PyPI projects, ordered by
//! descending download count. The order is significant: it is the order in which the
//! classification pipeline scans packages and backfills skipped ones.
//!
//! Some heavily-downloaded projects are historical or renamed packages whose wheels
//! say nothing useful about the ecosystem. [`omit_deprecated`] drops them before any
//! metadata is fetched.

mod candidate;
mod deprecated;
mod top_packages;

pub use candidate::Candidate;
pub use deprecated::{DEPRECATED_PACKAGES, is_deprecated, omit_deprecated};
pub use top_packages::{load_top_packages, parse_top_packages};
