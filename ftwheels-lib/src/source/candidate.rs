use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A package from the ranked snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct Candidate {
    #[serde(alias = "project")]
    pub name: Arc<str>,

    #[serde(alias = "download_count")]
    pub downloads: u64,
}

impl Candidate {
    #[must_use]
    pub fn new(name: impl Into<Arc<str>>, downloads: u64) -> Self {
        Self {
            name: name.into(),
            downloads,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl core::fmt::Display for Candidate {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.name)
    }
}
