use super::wheel_tag::ArtifactKind;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, IntoStaticStr};

/// Per-package outcome of inspecting its published wheels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter, IntoStaticStr)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Classification {
    /// At least one wheel targets a free-threaded interpreter.
    FreeThreaded,

    /// Binary wheels exist, but none are free-threaded.
    BinaryIncompatible,

    /// Only pure-Python wheels exist.
    PurePython,

    /// No wheels at all, or the metadata could not be fetched.
    NoWheel,
}

/// How a classification is presented in the JSON snapshot and the SVG wheel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayInfo {
    pub css_class: &'static str,
    pub icon: &'static str,
    pub title: &'static str,
}

// Indexed by `Classification as usize`.
const DISPLAY_TABLE: [DisplayInfo; 4] = [
    DisplayInfo {
        css_class: "success",
        icon: "\u{1F9F5}",
        title: "This package provides at least one free-threaded build.",
    },
    DisplayInfo {
        css_class: "warning",
        icon: "\u{2717}",
        title: "This package publishes binary builds, but none free-threading-capable.",
    },
    DisplayInfo {
        css_class: "pure-py",
        icon: "\u{1F40D}",
        title: "This package provides only pure-interpreter builds.",
    },
    DisplayInfo {
        css_class: "default",
        icon: "\u{1F40D}",
        title: "This package does not publish any binary builds.",
    },
];

impl Classification {
    /// Fold the wheels of one package into a classification.
    ///
    /// Priority is free-threaded, then binary, then no wheels, then pure Python.
    #[must_use]
    pub fn from_filenames<I, S>(filenames: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut has_any_wheel = false;
        let mut has_binary_wheel = false;

        for filename in filenames {
            has_any_wheel = true;
            match ArtifactKind::from_filename(filename.as_ref()) {
                ArtifactKind::FreeThreaded => return Self::FreeThreaded,
                ArtifactKind::Binary => has_binary_wheel = true,
                ArtifactKind::PurePython => {}
            }
        }

        if has_binary_wheel {
            Self::BinaryIncompatible
        } else if has_any_wheel {
            Self::PurePython
        } else {
            Self::NoWheel
        }
    }

    #[must_use]
    pub const fn display(self) -> &'static DisplayInfo {
        &DISPLAY_TABLE[self as usize]
    }

    #[must_use]
    pub const fn supports_free_threading(self) -> bool {
        matches!(self, Self::FreeThreaded)
    }

    /// Whether a package with this classification belongs on the chart.
    ///
    /// Pure-Python packages are never shown. Packages without wheels are shown only
    /// when `include_no_wheel` is set.
    #[must_use]
    pub const fn is_relevant(self, include_no_wheel: bool) -> bool {
        match self {
            Self::FreeThreaded | Self::BinaryIncompatible => true,
            Self::NoWheel => include_no_wheel,
            Self::PurePython => false,
        }
    }
}
