//! Path utilities for cache file naming.

/// Sanitize a string for use as a path component
///
/// Package names and index hosts come from external data, so traversal sequences and
/// characters that are not portable across filesystems are replaced with `_`.
#[must_use]
pub fn sanitize_path_component(s: &str) -> String {
    // ".." is replaced first so names such as "zope.interface" keep their single dots
    let s = s.replace("..", "__");
    s.replace(['/', '\\', ':', '*', '?', '"', '<', '>', '|'], "_")
}
