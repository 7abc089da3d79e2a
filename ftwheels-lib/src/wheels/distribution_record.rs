use super::Classification;
use serde::{Deserialize, Serialize};

/// The wheel filenames published for the latest release of a package.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistributionRecord {
    pub wheel_filenames: Vec<String>,
}

impl DistributionRecord {
    #[must_use]
    pub const fn new(wheel_filenames: Vec<String>) -> Self {
        Self { wheel_filenames }
    }

    #[must_use]
    pub fn classification(&self) -> Classification {
        Classification::from_filenames(&self.wheel_filenames)
    }
}
