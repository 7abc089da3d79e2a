//! Command-line interface and orchestration for ftwheels
//!
//! This module parses the command line, loads configuration, and drives a single
//! chart generation run from the ranked snapshot to the written outputs.
//!
//! # Execution Flow
//!
//! The `run` function parses the `-n/--number` option with clap, loads
//! `ftwheels.toml` (or the embedded defaults), and hands off to `generate`:
//!
//! 1. Initialize logging from the configured level
//! 2. Load the ranked candidates from the snapshot file
//! 3. Build the cache-backed index client and the classification pipeline
//! 4. Classify candidates until the requested number of relevant packages is found
//! 5. Write the JSON snapshot and the SVG wheel, then print a one-line summary
//!
//! A delayed `indicatif` progress bar reports the scan when logging is quiet enough
//! not to interleave with it.

mod config;
mod generate;
mod host;
mod progress_reporter;
mod run;

pub use config::{CONFIG_FILE_NAME, Config, DEFAULT_CONFIG_TOML, LogLevel};
pub use generate::generate;
pub use host::Host;
pub use progress_reporter::ProgressReporter;
pub use run::{DEFAULT_PACKAGE_COUNT, run};
