//! Artifact path derivation

use std::path::{Path, PathBuf};

/// Characters that cannot appear in a file name on common filesystems
const ILLEGAL: &[char] = &['?', '*', ':', '"', '<', '>', '|', '/', '\\'];

/// Strips path-illegal and control characters from one path component
///
/// Sanitization must be deterministic: the same chapter title always maps
/// to the same file, so re-fetching after a crash overwrites rather than
/// duplicates.
pub fn sanitize_component(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .filter(|c| !ILLEGAL.contains(c) && !c.is_control())
        .collect();

    let trimmed = cleaned.trim().trim_matches('.');
    if trimmed.is_empty() {
        "untitled".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Derives the artifact file path for one chapter:
/// `<library_dir>/<book>/<chapter>.txt`
pub fn artifact_path(library_dir: &Path, book_name: &str, chapter: &str) -> PathBuf {
    library_dir
        .join(sanitize_component(book_name))
        .join(format!("{}.txt", sanitize_component(chapter)))
}
