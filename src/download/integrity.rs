//! Post-write verification and partial-file cleanup.

use std::path::{Path, PathBuf};

use reqwest::Response;
use reqwest::header::CONTENT_LENGTH;
use tracing::{debug, warn};

use super::error::DownloadError;

/// Reads the declared body size from the response's `Content-Length` header.
///
/// A missing or empty header means "no declared length". An unparseable one
/// is logged and treated the same way.
pub(crate) fn declared_content_length(response: &Response) -> Option<u64> {
    let raw = response.headers().get(CONTENT_LENGTH)?.to_str().ok()?.trim();
    if raw.is_empty() {
        return None;
    }
    match raw.parse::<u64>() {
        Ok(length) => Some(length),
        Err(_) => {
            warn!(content_length = %raw, "ignoring unparseable Content-Length");
            None
        }
    }
}

/// Checks the written file against the declared length, removing it on failure.
///
/// With no declared length the file is accepted without a stat.
pub(crate) async fn verify_written_file(
    path: &Path,
    declared_length: Option<u64>,
) -> Result<(), DownloadError> {
    let Some(expected) = declared_length else {
        return Ok(());
    };

    let metadata = match tokio::fs::metadata(path).await {
        Ok(metadata) => metadata,
        Err(e) => {
            remove_partial_file(path).await;
            return Err(DownloadError::io(path, e));
        }
    };

    if !metadata.is_file() {
        remove_partial_file(path).await;
        return Err(DownloadError::not_a_file(path));
    }

    let actual = metadata.len();
    if actual != expected {
        debug!(path = %path.display(), expected, actual, "size mismatch after write");
        remove_partial_file(path).await;
        return Err(DownloadError::incomplete_file(path, expected, actual));
    }

    Ok(())
}

/// Deletes a partial download. Failures are logged and swallowed so the
/// original error is the one reported.
pub(crate) async fn remove_partial_file(path: &Path) {
    debug!(path = %path.display(), "cleaning up partial file");
    if let Err(e) = tokio::fs::remove_file(path).await
        && e.kind() != std::io::ErrorKind::NotFound
    {
        warn!(path = %path.display(), error = %e, "failed to remove partial file");
    }
}

/// Owns a freshly created target file until the download commits.
///
/// If the download future is dropped before [`disarm`](Self::disarm) or
/// [`discard`](Self::discard) runs (a cancelled `select!`, an aborted task),
/// the file is removed on drop. Drop cannot await, so that removal is a
/// single synchronous unlink.
#[derive(Debug)]
pub(crate) struct PartialFileGuard {
    path: PathBuf,
    armed: bool,
}

impl PartialFileGuard {
    pub(crate) fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            armed: true,
        }
    }

    /// Leaves the file in place.
    pub(crate) fn disarm(mut self) {
        self.armed = false;
    }

    /// Removes the file now, swallowing cleanup errors.
    pub(crate) async fn discard(mut self) {
        self.armed = false;
        remove_partial_file(&self.path).await;
    }
}

impl Drop for PartialFileGuard {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        debug!(path = %self.path.display(), "download dropped, removing partial file");
        if let Err(e) = std::fs::remove_file(&self.path)
            && e.kind() != std::io::ErrorKind::NotFound
        {
            warn!(path = %self.path.display(), error = %e, "failed to remove partial file");
        }
    }
}
