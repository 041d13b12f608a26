//! Constants for the download module (timeouts, redirect bound, directory mode).

/// Default total budget for one download operation (30 seconds).
pub const DEFAULT_TIMEOUT_MS: i64 = 30_000;

/// Maximum number of redirect hops followed within one operation.
pub const MAX_REDIRECTS: u8 = 3;

/// Permission bits used when creating missing target directories.
pub const DEFAULT_DIRECTORY_MODE: u32 = 0o777;
