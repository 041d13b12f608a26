//! Caller-facing download settings and their normalized form.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer};
use url::Url;

use super::constants::DEFAULT_TIMEOUT_MS;
use super::error::DownloadError;
use super::filename::{filename_from_url, normalize_path};

/// Optional knobs for one download.
///
/// Every field may be left unset; [`DownloadSettings::resolve`] fills the
/// defaults. Deserializable so callers can embed it in their own config files.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DownloadSettings {
    /// Total budget in milliseconds for the whole operation, redirects included.
    ///
    /// Values that are not whole numbers deserialize as unset.
    #[serde(deserialize_with = "whole_millis")]
    pub timeout: Option<i64>,
    /// Directory to write into. Defaults to the current directory.
    pub directory: Option<PathBuf>,
    /// Name of the written file. Defaults to the URL's last path segment.
    pub filename: Option<String>,
}

impl DownloadSettings {
    /// Creates settings with every field unset.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the total timeout in milliseconds.
    #[must_use]
    pub fn with_timeout_ms(mut self, timeout_ms: i64) -> Self {
        self.timeout = Some(timeout_ms);
        self
    }

    /// Sets the target directory.
    #[must_use]
    pub fn with_directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.directory = Some(directory.into());
        self
    }

    /// Sets the target filename.
    #[must_use]
    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    /// Applies defaults and normalizes paths for a download of `url`.
    ///
    /// # Errors
    ///
    /// Returns [`DownloadError::InvalidInput`] when no filename is given and
    /// none can be derived from the URL, or an explicit filename is empty.
    pub fn resolve(&self, url: &Url) -> Result<ResolvedSettings, DownloadError> {
        let timeout_ms = self.timeout.unwrap_or(DEFAULT_TIMEOUT_MS);
        let directory = normalize_path(self.directory.as_deref().unwrap_or(Path::new(".")));
        let filename = match &self.filename {
            Some(name) => name.clone(),
            None => filename_from_url(url).unwrap_or_default(),
        };
        if filename.is_empty() {
            return Err(DownloadError::missing_filename());
        }
        let target_path = normalize_path(&directory.join(&filename));

        Ok(ResolvedSettings {
            timeout_ms,
            directory,
            filename,
            target_path,
        })
    }
}

/// Settings with defaults applied and paths normalized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSettings {
    /// Total budget in milliseconds. Non-positive means already expired.
    pub timeout_ms: i64,
    /// Normalized target directory.
    pub directory: PathBuf,
    /// Target filename.
    pub filename: String,
    /// Normalized `directory/filename`; the only path ever written.
    pub target_path: PathBuf,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTimeout {
    Whole(i64),
    Other(serde::de::IgnoredAny),
}

fn whole_millis<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<RawTimeout>::deserialize(deserializer)? {
        Some(RawTimeout::Whole(ms)) => Some(ms),
        Some(RawTimeout::Other(_)) | None => None,
    })
}
