//! Error types for the download module.
//!
//! Display strings are part of the public contract: HTTP failures render as
//! `"<code> - <statusText>"`, size mismatches as `"File not full!"`, and the
//! two deadline failures as `"Request aborted with timeout!"` (before dispatch)
//! and `"Request aborted!"` (while a request is in flight). Transport and
//! filesystem failures render the underlying error text unchanged.

use std::path::PathBuf;

use reqwest::StatusCode;
use serde::Serialize;
use thiserror::Error;

/// Coarse failure classification shared by all [`DownloadError`] variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ErrorKind {
    /// Missing or unusable URL or filename.
    InvalidInput,
    /// Deadline exhausted before a request could be dispatched.
    Timeout,
    /// DNS, connect or transport failure, including an in-flight abort.
    NetworkError,
    /// Redirect without `Location`, or too many hops.
    RedirectError,
    /// Any status outside the handled success and redirect ranges.
    HttpStatusError,
    /// Written size differs from the declared Content-Length.
    IncompleteFile,
    /// Directory creation, write, stat or delete failure.
    FilesystemError,
}

impl ErrorKind {
    /// Returns the stable string label for display output.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InvalidInput => "InvalidInput",
            Self::Timeout => "Timeout",
            Self::NetworkError => "NetworkError",
            Self::RedirectError => "RedirectError",
            Self::HttpStatusError => "HttpStatusError",
            Self::IncompleteFile => "IncompleteFile",
            Self::FilesystemError => "FilesystemError",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that can occur while receiving a file.
#[derive(Debug, Error)]
pub enum DownloadError {
    /// A required input (URL, filename) was missing or empty.
    #[error("{message}")]
    InvalidInput {
        /// Human-readable reason.
        message: &'static str,
    },

    /// The provided URL is malformed or uses an unsupported scheme.
    #[error("invalid URL: {url}")]
    InvalidUrl {
        /// The invalid URL string.
        url: String,
    },

    /// The deadline was already exhausted when a request was about to be sent.
    #[error("Request aborted with timeout!")]
    Timeout {
        /// The URL that was never requested.
        url: String,
    },

    /// Network-level error (DNS resolution, connection refused, TLS errors, etc.)
    #[error("{source}")]
    Network {
        /// The URL that failed to download.
        url: String,
        /// The underlying network error.
        #[source]
        source: reqwest::Error,
    },

    /// The deadline expired while the request or its body was in flight.
    #[error("Request aborted!")]
    Aborted {
        /// The URL whose request was aborted.
        url: String,
    },

    /// A redirect could not be followed (no `Location`, or hop bound reached).
    #[error("{status} - {status_text}")]
    Redirect {
        /// The URL that answered with the redirect.
        url: String,
        /// The HTTP status code.
        status: u16,
        /// Reason phrase for the status code.
        status_text: String,
    },

    /// HTTP response outside the success and redirect ranges.
    #[error("{status} - {status_text}")]
    HttpStatus {
        /// The URL that returned an error status.
        url: String,
        /// The HTTP status code.
        status: u16,
        /// Reason phrase for the status code.
        status_text: String,
    },

    /// Downloaded file size does not match the declared Content-Length.
    #[error("File not full!")]
    IncompleteFile {
        /// Path of the removed file.
        path: PathBuf,
        /// Size declared by the server.
        expected_bytes: u64,
        /// Size found on disk.
        actual_bytes: u64,
    },

    /// The written path did not stat as a regular file.
    #[error("Not Found")]
    NotAFile {
        /// Path of the removed entry.
        path: PathBuf,
    },

    /// File system error (create directory, create file, write, stat).
    #[error("{source}")]
    Io {
        /// The path where the error occurred.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },
}

impl DownloadError {
    /// Creates an invalid-input error for a missing URL.
    #[must_use]
    pub fn missing_url() -> Self {
        Self::InvalidInput {
            message: "Need a file url to download",
        }
    }

    /// Creates an invalid-input error for an empty target filename.
    #[must_use]
    pub fn missing_filename() -> Self {
        Self::InvalidInput {
            message: "Need a file name to save the download",
        }
    }

    /// Creates an invalid URL error.
    pub fn invalid_url(url: impl Into<String>) -> Self {
        Self::InvalidUrl { url: url.into() }
    }

    /// Creates a pre-dispatch timeout error.
    pub fn timeout(url: impl Into<String>) -> Self {
        Self::Timeout { url: url.into() }
    }

    /// Creates a network error from a reqwest error.
    pub fn network(url: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Network {
            url: url.into(),
            source,
        }
    }

    /// Creates an in-flight abort error.
    pub fn aborted(url: impl Into<String>) -> Self {
        Self::Aborted { url: url.into() }
    }

    /// Classifies a reqwest failure: deadline hits become aborts, the rest stay network errors.
    pub fn transport(url: impl Into<String>, source: reqwest::Error) -> Self {
        if source.is_timeout() {
            Self::aborted(url)
        } else {
            Self::network(url, source)
        }
    }

    /// Classifies a failure while reading the response body.
    ///
    /// Once headers have arrived, a body that ends early (peer closed, reset,
    /// undecodable framing) is the response being aborted, as is a timeout.
    pub fn body_stream(url: impl Into<String>, source: reqwest::Error) -> Self {
        if source.is_timeout() || source.is_body() || source.is_decode() {
            Self::aborted(url)
        } else {
            Self::network(url, source)
        }
    }

    /// Creates a redirect error for the given status and the server's reason phrase.
    pub fn redirect(
        url: impl Into<String>,
        status: StatusCode,
        status_text: impl Into<String>,
    ) -> Self {
        Self::Redirect {
            url: url.into(),
            status: status.as_u16(),
            status_text: status_text.into(),
        }
    }

    /// Creates an HTTP status error carrying the server's reason phrase.
    pub fn http_status(
        url: impl Into<String>,
        status: StatusCode,
        status_text: impl Into<String>,
    ) -> Self {
        Self::HttpStatus {
            url: url.into(),
            status: status.as_u16(),
            status_text: status_text.into(),
        }
    }

    /// Creates a size mismatch error.
    pub fn incomplete_file(
        path: impl Into<PathBuf>,
        expected_bytes: u64,
        actual_bytes: u64,
    ) -> Self {
        Self::IncompleteFile {
            path: path.into(),
            expected_bytes,
            actual_bytes,
        }
    }

    /// Creates a not-a-regular-file error.
    pub fn not_a_file(path: impl Into<PathBuf>) -> Self {
        Self::NotAFile { path: path.into() }
    }

    /// Creates an IO error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Returns the failure classification for this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidInput { .. } | Self::InvalidUrl { .. } => ErrorKind::InvalidInput,
            Self::Timeout { .. } => ErrorKind::Timeout,
            Self::Network { .. } | Self::Aborted { .. } => ErrorKind::NetworkError,
            Self::Redirect { .. } => ErrorKind::RedirectError,
            Self::HttpStatus { .. } => ErrorKind::HttpStatusError,
            Self::IncompleteFile { .. } => ErrorKind::IncompleteFile,
            Self::NotAFile { .. } | Self::Io { .. } => ErrorKind::FilesystemError,
        }
    }
}

/// Reason phrase for `status` when the server's own phrase is unavailable.
pub(crate) fn status_text(status: StatusCode) -> &'static str {
    status.canonical_reason().unwrap_or("Unknown")
}

// Note on From trait implementations:
// We do NOT implement `From<reqwest::Error>` or `From<std::io::Error>`
// because our error variants require context (url, path) that the source errors
// don't provide. The helper constructors are used instead.
