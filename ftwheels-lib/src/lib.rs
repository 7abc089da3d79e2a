#![doc(hidden)]
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Core library for ftwheels
//!
//! This library consolidates all functionality for the ftwheels tool, which checks
//! the most-downloaded packages on PyPI for free-threaded wheels and charts the result.
//!
//! # Module Organization
//!
//! - [`commands`]: Command-line interface and orchestration
//! - [`source`]: Loading the ranked snapshot of top packages
//! - [`wheels`]: Fetching wheel metadata and classifying packages
//! - [`reports`]: JSON snapshot and SVG wheel generation

pub type Result<T, E = ohno::AppError> = core::result::Result<T, E>;

#[cfg(any(debug_assertions, test))]
pub mod commands;
#[cfg(not(any(debug_assertions, test)))]
mod commands;

mod fs_utils;

#[cfg(any(debug_assertions, test))]
pub mod reports;
#[cfg(not(any(debug_assertions, test)))]
mod reports;

#[cfg(any(debug_assertions, test))]
pub mod source;
#[cfg(not(any(debug_assertions, test)))]
mod source;

#[cfg(any(debug_assertions, test))]
pub mod wheels;
#[cfg(not(any(debug_assertions, test)))]
mod wheels;

pub use crate::commands::{Host, run};
