//! HTTP download orchestration for fetching one file to disk.
//!
//! This module turns a URL plus [`DownloadSettings`] into either the path of a
//! committed file or a [`DownloadError`].
//!
//! # Features
//!
//! - One wall-clock deadline for the whole operation, redirects included
//! - Manual redirect following, bounded at [`MAX_REDIRECTS`] hops
//! - Streaming writes (memory-efficient for large files)
//! - Size verification against the declared Content-Length
//! - Partial files removed on every failure path
//!
//! # Example
//!
//! ```no_run
//! use receive_file::download::{DownloadSettings, receive_file_with_callback};
//!
//! # async fn example() {
//! let settings = DownloadSettings::new().with_filename("paper.pdf");
//! let handle = receive_file_with_callback("https://example.com/file", settings, |result| {
//!     match result {
//!         Ok(path) => println!("saved {}", path.display()),
//!         Err(error) => eprintln!("failed: {error}"),
//!     }
//! });
//! let _ = handle.await;
//! # }
//! ```

mod client;
mod constants;
mod deadline;
mod directory;
mod error;
mod filename;
mod integrity;
mod orchestrator;
mod settings;

pub use client::HttpClient;
pub use constants::{DEFAULT_DIRECTORY_MODE, DEFAULT_TIMEOUT_MS, MAX_REDIRECTS};
pub use deadline::Deadline;
pub use directory::{DirectoryOptions, EnsureDirectory, NativeDirectoryCreator};
pub use error::{DownloadError, ErrorKind};
pub use filename::{filename_from_url, normalize_path};
pub use orchestrator::{Downloader, receive_file, receive_file_with_callback};
pub use settings::{DownloadSettings, ResolvedSettings};

// Note: we do NOT define module-local Result aliases.
// Use `Result<T, DownloadError>` explicitly in function signatures.
