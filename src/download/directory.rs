//! Target directory creation.
//!
//! The orchestrator only needs "make sure this directory exists"; how that is
//! done is behind the [`EnsureDirectory`] trait so callers can substitute their
//! own implementation (sandboxed filesystems, tests).

use std::io;
use std::path::Path;

use async_trait::async_trait;
use tracing::debug;

use super::constants::DEFAULT_DIRECTORY_MODE;

/// Options passed to [`EnsureDirectory::ensure_directory`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirectoryOptions {
    /// Create missing intermediate segments.
    pub recursive: bool,
    /// Permission bits for created directories. Ignored on non-unix targets.
    pub mode: u32,
}

impl Default for DirectoryOptions {
    fn default() -> Self {
        Self {
            recursive: true,
            mode: DEFAULT_DIRECTORY_MODE,
        }
    }
}

/// Capability that makes a directory exist.
///
/// Implementations must be idempotent: an already-existing directory is
/// success, not an error.
///
/// This trait uses `async_trait` to support dynamic dispatch via
/// `Arc<dyn EnsureDirectory>`.
#[async_trait]
pub trait EnsureDirectory: Send + Sync {
    /// Creates `path` (and its parents when `options.recursive` is set).
    async fn ensure_directory(&self, path: &Path, options: DirectoryOptions) -> io::Result<()>;
}

/// [`EnsureDirectory`] backed by the platform's native recursive mkdir.
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeDirectoryCreator;

#[async_trait]
impl EnsureDirectory for NativeDirectoryCreator {
    async fn ensure_directory(&self, path: &Path, options: DirectoryOptions) -> io::Result<()> {
        let mut builder = tokio::fs::DirBuilder::new();
        builder.recursive(options.recursive);
        #[cfg(unix)]
        builder.mode(options.mode);

        match builder.create(path).await {
            Ok(()) => Ok(()),
            // Non-recursive create of an existing directory still counts as success.
            Err(error) if error.kind() == io::ErrorKind::AlreadyExists => {
                if tokio::fs::metadata(path).await.is_ok_and(|m| m.is_dir()) {
                    debug!(path = %path.display(), "directory already exists");
                    Ok(())
                } else {
                    Err(error)
                }
            }
            Err(error) => Err(error),
        }
    }
}
