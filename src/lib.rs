//! Receive File Library
//!
//! This library downloads a single file from an HTTP or HTTPS endpoint to
//! local storage. A caller gets either a complete, verified file or a typed
//! failure, and no partial artifact is left behind.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`download`] - Download orchestrator, settings, deadline and integrity checks
//!
//! # Example
//!
//! ```no_run
//! use receive_file::{DownloadSettings, receive_file};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let settings = DownloadSettings::new()
//!     .with_directory("./downloads")
//!     .with_timeout_ms(10_000);
//! let path = receive_file("https://example.com/file.pdf", &settings).await?;
//! println!("Downloaded: {}", path.display());
//! # Ok(())
//! # }
//! ```

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod download;
pub(crate) mod user_agent;

// Re-export commonly used types
pub use download::{
    DEFAULT_DIRECTORY_MODE, DEFAULT_TIMEOUT_MS, Deadline, DirectoryOptions, DownloadError,
    DownloadSettings, Downloader, EnsureDirectory, ErrorKind, HttpClient, MAX_REDIRECTS,
    NativeDirectoryCreator, ResolvedSettings, receive_file, receive_file_with_callback,
};
