//! Download orchestrator: request, status dispatch, redirects, streaming write.
//!
//! One call to [`Downloader::download`] is one logical operation. It runs a
//! loop of attempts (one per redirect hop) under a single [`Deadline`], and
//! either commits the file at `directory/filename` or removes whatever it
//! wrote and returns the failure.

use std::path::PathBuf;
use std::sync::Arc;

use futures_util::StreamExt;
use reqwest::Response;
use reqwest::header::LOCATION;
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument};
use url::Url;

use super::client::{HttpClient, reason_phrase};
use super::constants::MAX_REDIRECTS;
use super::deadline::Deadline;
use super::directory::{DirectoryOptions, EnsureDirectory, NativeDirectoryCreator};
use super::error::DownloadError;
use super::integrity::{PartialFileGuard, declared_content_length, verify_written_file};
use super::settings::{DownloadSettings, ResolvedSettings};

/// Downloads one file per call, following redirects and enforcing one deadline.
///
/// Each call is independent; concurrent calls writing the same target path
/// are not coordinated.
///
/// # Example
///
/// ```no_run
/// use receive_file::{DownloadSettings, Downloader};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let downloader = Downloader::new()?;
/// let settings = DownloadSettings::new().with_directory("./tmp/");
/// let path = downloader
///     .download("http://example.com/test/10Mb.txt", &settings)
///     .await?;
/// assert_eq!(path, std::path::PathBuf::from("tmp/10Mb.txt"));
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Downloader {
    client: HttpClient,
    directories: Arc<dyn EnsureDirectory>,
    directory_options: DirectoryOptions,
}

impl std::fmt::Debug for Downloader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Downloader")
            .field("client", &self.client)
            .field("directory_options", &self.directory_options)
            .finish_non_exhaustive()
    }
}

/// One request/response cycle. Rebuilt for every hop; the deadline is copied, never recomputed.
#[derive(Debug)]
struct DownloadRequest<'a> {
    url: Url,
    settings: &'a ResolvedSettings,
    deadline: Deadline,
    redirect_depth: u8,
}

/// What one attempt hands back to the hop loop.
enum Hop {
    Committed(PathBuf),
    Redirect(Url),
}

impl Downloader {
    /// Creates a downloader with a fresh HTTP client and native directory creation.
    ///
    /// # Errors
    ///
    /// Returns the reqwest builder error if the HTTP client cannot be built.
    pub fn new() -> Result<Self, reqwest::Error> {
        Ok(Self::with_parts(
            HttpClient::new()?,
            Arc::new(NativeDirectoryCreator),
        ))
    }

    /// Creates a downloader from an existing client and directory capability.
    #[must_use]
    pub fn with_parts(client: HttpClient, directories: Arc<dyn EnsureDirectory>) -> Self {
        Self {
            client,
            directories,
            directory_options: DirectoryOptions::default(),
        }
    }

    /// Overrides the options passed to the directory capability.
    #[must_use]
    pub fn with_directory_options(mut self, options: DirectoryOptions) -> Self {
        self.directory_options = options;
        self
    }

    /// Downloads `url` to the location described by `settings`.
    ///
    /// Returns the normalized `directory/filename` path once the file has been
    /// written and, when the server declared a Content-Length, verified.
    ///
    /// # Errors
    ///
    /// Returns [`DownloadError`]; see [`DownloadError::kind`] for the
    /// classification. On any error no file is left at the target path by
    /// this call.
    #[must_use = "download result contains the path to the downloaded file"]
    #[instrument(skip(self, settings), fields(url = %url))]
    pub async fn download(
        &self,
        url: &str,
        settings: &DownloadSettings,
    ) -> Result<PathBuf, DownloadError> {
        let parsed = parse_download_url(url)?;
        let resolved = settings.resolve(&parsed)?;
        let deadline = Deadline::from_timeout_ms(resolved.timeout_ms);
        debug!(
            path = %resolved.target_path.display(),
            timeout_ms = resolved.timeout_ms,
            "starting download"
        );
        self.download_resolved(parsed, &resolved, deadline).await
    }

    /// Runs the hop loop for already-resolved settings and a fixed deadline.
    ///
    /// # Errors
    ///
    /// Same as [`download`](Self::download).
    pub async fn download_resolved(
        &self,
        url: Url,
        settings: &ResolvedSettings,
        deadline: Deadline,
    ) -> Result<PathBuf, DownloadError> {
        let mut request = DownloadRequest {
            url,
            settings,
            deadline,
            redirect_depth: 0,
        };

        loop {
            match self.attempt(&request).await? {
                Hop::Committed(path) => return Ok(path),
                Hop::Redirect(next) => {
                    debug!(
                        from = %request.url,
                        to = %next,
                        depth = request.redirect_depth + 1,
                        "following redirect"
                    );
                    request = DownloadRequest {
                        url: next,
                        settings,
                        deadline: request.deadline,
                        redirect_depth: request.redirect_depth + 1,
                    };
                }
            }
        }
    }

    async fn attempt(&self, request: &DownloadRequest<'_>) -> Result<Hop, DownloadError> {
        let Some(remaining) = request.deadline.remaining() else {
            debug!(url = %request.url, "deadline exhausted before dispatch");
            return Err(DownloadError::timeout(request.url.as_str()));
        };

        let response = self.client.get(&request.url, remaining).await?;
        let status = response.status();
        match status.as_u16() {
            200..=205 => self.commit(request, response).await.map(Hop::Committed),
            300..=308 => next_hop(request, &response).map(Hop::Redirect),
            _ => Err(DownloadError::http_status(
                request.url.as_str(),
                status,
                reason_phrase(&response),
            )),
        }
    }

    /// Streams the body to the target path and verifies it.
    async fn commit(
        &self,
        request: &DownloadRequest<'_>,
        response: Response,
    ) -> Result<PathBuf, DownloadError> {
        let settings = request.settings;
        self.directories
            .ensure_directory(&settings.directory, self.directory_options)
            .await
            .map_err(|e| DownloadError::io(&settings.directory, e))?;

        let path = &settings.target_path;
        let declared_length = declared_content_length(&response);
        let file = File::create(path)
            .await
            .map_err(|e| DownloadError::io(path, e))?;
        let guard = PartialFileGuard::new(path);

        let bytes_written = match write_body(file, response, request).await {
            Ok(bytes) => bytes,
            Err(error) => {
                guard.discard().await;
                return Err(error);
            }
        };

        // Verification removes the file itself when it fails.
        let verified = verify_written_file(path, declared_length).await;
        guard.disarm();
        verified?;

        info!(
            path = %path.display(),
            bytes = bytes_written,
            redirects = request.redirect_depth,
            "download complete"
        );
        Ok(path.clone())
    }
}

/// Streams the response body into `file` until the body ends or the deadline fires.
///
/// The writer is flushed and shut down before returning `Ok`; on error it is
/// dropped on return, so the file handle is closed before the caller removes it.
async fn write_body(
    file: File,
    response: Response,
    request: &DownloadRequest<'_>,
) -> Result<u64, DownloadError> {
    let path = &request.settings.target_path;
    let url = request.url.as_str();
    let mut writer = BufWriter::new(file);
    let mut stream = response.bytes_stream();
    let mut bytes_written: u64 = 0;

    loop {
        let next = request.deadline.run(stream.next()).await.map_err(|_| {
            debug!(url, bytes_written, "deadline expired mid-transfer, aborting");
            DownloadError::aborted(url)
        })?;
        let Some(chunk_result) = next else {
            break;
        };
        let chunk = chunk_result.map_err(|e| {
            debug!(url, bytes_written, error = %e, "response body interrupted");
            DownloadError::body_stream(url, e)
        })?;

        writer
            .write_all(&chunk)
            .await
            .map_err(|e| DownloadError::io(path, e))?;

        bytes_written += chunk.len() as u64;
    }

    writer
        .shutdown()
        .await
        .map_err(|e| DownloadError::io(path, e))?;

    Ok(bytes_written)
}

/// Resolves the next hop for a 3xx response, or fails when it cannot be followed.
fn next_hop(request: &DownloadRequest<'_>, response: &Response) -> Result<Url, DownloadError> {
    let status = response.status();
    let refuse =
        || DownloadError::redirect(request.url.as_str(), status, reason_phrase(response));
    if request.redirect_depth >= MAX_REDIRECTS {
        debug!(depth = request.redirect_depth, "redirect limit reached");
        return Err(refuse());
    }

    response
        .headers()
        .get(LOCATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|location| request.url.join(location).ok())
        .filter(is_supported_scheme)
        .ok_or_else(refuse)
}

fn parse_download_url(url: &str) -> Result<Url, DownloadError> {
    let trimmed = url.trim();
    if trimmed.is_empty() {
        return Err(DownloadError::missing_url());
    }
    Url::parse(trimmed)
        .ok()
        .filter(is_supported_scheme)
        .ok_or_else(|| DownloadError::invalid_url(trimmed))
}

fn is_supported_scheme(url: &Url) -> bool {
    matches!(url.scheme(), "http" | "https")
}

/// Downloads `url` with a fresh [`Downloader`].
///
/// This is the awaitable form of the operation. Dropping the future before it
/// completes removes any file it had started writing.
///
/// # Errors
///
/// See [`Downloader::download`]. A missing URL is reported before any client
/// is built or any I/O starts.
#[instrument(skip(settings), fields(url = %url))]
pub async fn receive_file(url: &str, settings: &DownloadSettings) -> Result<PathBuf, DownloadError> {
    if url.trim().is_empty() {
        return Err(DownloadError::missing_url());
    }
    let downloader = Downloader::new().map_err(|e| DownloadError::network(url, e))?;
    downloader.download(url, settings).await
}

/// Downloads `url` on a spawned task and hands the outcome to `callback`.
///
/// This is the completion-callback form of [`receive_file`]; the callback is
/// invoked exactly once, with the same result the awaitable form would return.
///
/// # Panics
///
/// Panics if called outside a Tokio runtime.
pub fn receive_file_with_callback<F>(
    url: impl Into<String>,
    settings: DownloadSettings,
    callback: F,
) -> JoinHandle<()>
where
    F: FnOnce(Result<PathBuf, DownloadError>) + Send + 'static,
{
    let url = url.into();
    tokio::spawn(async move {
        let result = receive_file(&url, &settings).await;
        callback(result);
    })
}
