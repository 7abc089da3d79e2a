use super::Candidate;

/// Historical or renamed projects that are never charted.
pub const DEPRECATED_PACKAGES: &[&str] = &[
    "BeautifulSoup",
    "bs4",
    "distribute",
    "django-social-auth",
    "nose",
    "pep8",
    "pycrypto",
    "pypular",
    "sklearn",
];

/// Exact, case-sensitive match against [`DEPRECATED_PACKAGES`].
#[must_use]
pub fn is_deprecated(name: &str) -> bool {
    DEPRECATED_PACKAGES.contains(&name)
}

/// Drop deprecated candidates while preserving scan order.
pub fn omit_deprecated(candidates: impl IntoIterator<Item = Candidate>) -> impl Iterator<Item = Candidate> {
    candidates.into_iter().filter(|candidate| {
        let deprecated = is_deprecated(candidate.name());
        if deprecated {
            log::debug!(target: "    source", "Omitting deprecated package '{candidate}'");
        }
        !deprecated
    })
}
