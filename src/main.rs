//! CLI entry point for the receive-file tool.

use std::path::Path;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use receive_file::{DownloadError, receive_file};
use serde::Serialize;
use tracing::{debug, error, info};

mod cli;

use cli::Args;

/// Machine-readable outcome printed with `--json`.
#[derive(Debug, Serialize)]
#[serde(tag = "outcome", rename_all = "lowercase")]
enum Outcome<'a> {
    Success {
        path: &'a Path,
    },
    Failure {
        kind: receive_file::ErrorKind,
        message: String,
    },
}

impl<'a> Outcome<'a> {
    fn from_result(result: &'a Result<std::path::PathBuf, DownloadError>) -> Self {
        match result {
            Ok(path) => Self::Success { path },
            Err(error) => Self::Failure {
                kind: error.kind(),
                message: error.to_string(),
            },
        }
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

    // Priority: RUST_LOG env var > quiet flag > verbose flag > default (info)
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(args.default_log_level()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    debug!(?args, "CLI arguments parsed");

    let result = receive_file(&args.url, &args.settings()).await;

    if args.json {
        println!("{}", serde_json::to_string(&Outcome::from_result(&result))?);
    }

    match result {
        Ok(path) => {
            info!(path = %path.display(), "Download complete");
            if !args.json {
                println!("{}", path.display());
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            error!(kind = %err.kind(), "{err}");
            Ok(ExitCode::FAILURE)
        }
    }
}
