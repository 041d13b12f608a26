//! Filename extraction, sanitization, and lexical path normalization.

use std::path::{Component, Path, PathBuf};

use tracing::debug;
use url::Url;

/// Default filename for a URL: its last path segment, percent-decoded and sanitized.
///
/// Returns `None` when the URL path ends with `/` or has no segments.
#[must_use]
pub fn filename_from_url(url: &Url) -> Option<String> {
    let last = url.path_segments()?.next_back()?;
    if last.is_empty() {
        return None;
    }
    let decoded = urlencoding::decode(last).unwrap_or_else(|e| {
        debug!(
            segment = %last,
            error = %e,
            "URL decoding failed, using raw segment"
        );
        last.into()
    });
    Some(sanitize_filename(&decoded))
}

/// Sanitizes filename for filesystem safety.
///
/// Replaces characters that are invalid on common filesystems:
/// / \ : * ? " < > |
pub(crate) fn sanitize_filename(name: &str) -> String {
    let sanitized: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    if sanitized == "." || sanitized == ".." {
        sanitized.replace('.', "_")
    } else {
        sanitized
    }
}

/// Normalizes a path lexically, without touching the filesystem.
///
/// `.` segments and trailing separators are dropped and `..` pops the
/// previous normal segment. Leading `..` segments of a relative path are
/// kept; `..` directly under the root is discarded. An empty result becomes `.`.
#[must_use]
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut parts: Vec<Component<'_>> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match parts.last() {
                Some(Component::Normal(_)) => {
                    parts.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => parts.push(component),
            },
            other => parts.push(other),
        }
    }

    if parts.is_empty() {
        return PathBuf::from(".");
    }
    parts.iter().collect()
}
