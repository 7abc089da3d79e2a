use super::Classification;
use crate::source::Candidate;
use serde::Serialize;
use std::sync::Arc;

/// A charted package: the candidate plus everything the renderers need.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnnotatedPackage {
    pub name: Arc<str>,
    pub downloads: u64,
    pub classification: Classification,
    pub free_threaded_wheel: bool,
    pub css_class: &'static str,
    pub icon: &'static str,
    pub title: &'static str,
}

impl AnnotatedPackage {
    #[must_use]
    pub fn new(candidate: Candidate, classification: Classification) -> Self {
        let display = classification.display();
        Self {
            name: candidate.name,
            downloads: candidate.downloads,
            classification,
            free_threaded_wheel: classification.supports_free_threading(),
            css_class: display.css_class,
            icon: display.icon,
            title: display.title,
        }
    }
}
