//! HTTP client wrapper for single-hop requests.
//!
//! Redirects are NOT followed here: the orchestrator follows them itself so
//! that the hop bound and the shared deadline stay in one place.

use std::time::Duration;

use reqwest::redirect::Policy;
use reqwest::{Client, Response};
use tracing::{debug, instrument};
use url::Url;

use super::error::{DownloadError, status_text};
use crate::user_agent;

/// HTTP client that issues exactly one request per call.
///
/// Plain and encrypted transports are selected by the URL scheme.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Creates a client with redirects disabled and the default User-Agent.
    ///
    /// # Errors
    ///
    /// Returns the underlying builder error if the TLS backend or system
    /// configuration cannot be initialized.
    pub fn new() -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .redirect(Policy::none())
            .user_agent(user_agent::default_download_user_agent())
            .build()?;
        Ok(Self { client })
    }

    /// Sends a GET for `url`, bounding the whole exchange to `timeout`.
    ///
    /// The timeout covers connecting, awaiting headers and reading the body.
    ///
    /// # Errors
    ///
    /// Returns [`DownloadError::Aborted`] when `timeout` elapses, or
    /// [`DownloadError::Network`] for any other transport failure. Status
    /// codes are not inspected here.
    #[instrument(level = "debug", skip(self), fields(url = %url))]
    pub async fn get(&self, url: &Url, timeout: Duration) -> Result<Response, DownloadError> {
        let response = self
            .client
            .get(url.clone())
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| DownloadError::transport(url.as_str(), e))?;
        debug!(status = %response.status(), "response headers received");
        Ok(response)
    }
}

/// Returns the reason phrase the server sent on the status line.
///
/// hyper records a phrase only when it differs from the canonical one, so the
/// canonical phrase (or `"Unknown"`) is used when none was recorded.
pub(crate) fn reason_phrase(response: &Response) -> String {
    response
        .extensions()
        .get::<hyper::ext::ReasonPhrase>()
        .and_then(|phrase| std::str::from_utf8(phrase.as_bytes()).ok())
        .map_or_else(
            || status_text(response.status()).to_string(),
            ToString::to_string,
        )
}
