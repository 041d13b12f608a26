//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::Parser;

use receive_file::DownloadSettings;

/// Download one file over HTTP(S), all or nothing.
///
/// The file is written only when the transfer completes and its size matches
/// the server's Content-Length; on any failure nothing is left behind.
#[derive(Parser, Debug)]
#[command(name = "receive-file")]
#[command(author, version, about)]
pub struct Args {
    /// URL of the file to download
    pub url: String,

    /// Directory to save into (default: current directory)
    #[arg(short = 'd', long)]
    pub directory: Option<PathBuf>,

    /// File name to save as (default: last segment of the URL path)
    #[arg(short = 'o', long)]
    pub filename: Option<String>,

    /// Total time budget in milliseconds, redirects included (default: 30000)
    #[arg(short = 't', long, allow_negative_numbers = true)]
    pub timeout: Option<i64>,

    /// Print the outcome as a JSON object on stdout
    #[arg(long)]
    pub json: bool,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,
}

impl Args {
    /// Builds library settings from the parsed flags.
    pub fn settings(&self) -> DownloadSettings {
        DownloadSettings {
            timeout: self.timeout,
            directory: self.directory.clone(),
            filename: self.filename.clone(),
        }
    }

    /// Default log level; `RUST_LOG` takes priority over this.
    pub fn default_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "info",
                1 => "debug",
                _ => "trace",
            }
        }
    }
}
