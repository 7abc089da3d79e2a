//! Wheel filename parsing.
//!
//! A wheel filename is
//! `{distribution}-{version}(-{build tag})?-{python tag}-{abi tag}-{platform tag}.whl`,
//! so the ABI tag is always the second-to-last dash-separated field.

/// ABI tag prefix of CPython 3.13 and later builds.
pub const FREE_THREADED_ABI_PREFIX: &str = "cp31";

/// ABI tag suffix marking a free-threaded (no GIL) build.
pub const FREE_THREADED_ABI_SUFFIX: &str = "t";

/// ABI tag of wheels with no dependency on an interpreter ABI.
pub const PURE_ABI_TAG: &str = "none";

const WHEEL_EXTENSION: &str = ".whl";

/// What a single wheel says about its package.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    /// ABI tag `none`: no native code.
    PurePython,

    /// Built for a free-threaded interpreter.
    FreeThreaded,

    /// Any other native build.
    Binary,
}

impl ArtifactKind {
    /// Classify a wheel by its filename.
    ///
    /// A filename without an ABI field is counted as an ordinary binary build, since
    /// native code cannot be ruled out.
    #[must_use]
    pub fn from_filename(filename: &str) -> Self {
        abi_tag(filename).map_or(Self::Binary, Self::from_abi_tag)
    }

    /// Classify a wheel by its ABI tag.
    #[must_use]
    pub fn from_abi_tag(tag: &str) -> Self {
        if tag == PURE_ABI_TAG {
            Self::PurePython
        } else if tag.starts_with(FREE_THREADED_ABI_PREFIX) && tag.ends_with(FREE_THREADED_ABI_SUFFIX) {
            Self::FreeThreaded
        } else {
            Self::Binary
        }
    }
}

/// Extract the ABI tag from a wheel filename.
///
/// Returns `None` when the filename has fewer than two dash-separated fields.
#[must_use]
pub fn abi_tag(filename: &str) -> Option<&str> {
    let stem = filename.strip_suffix(WHEEL_EXTENSION).unwrap_or(filename);
    let mut fields = stem.rsplit('-');
    let _platform = fields.next()?;
    fields.next()
}
