use clap::Parser;
use std::path::PathBuf;

use crate::config::{BackupOptions, FailurePolicy};
use crate::constants::DEFAULT_LARGE_FILE_THRESHOLD;

/// Command-line arguments for the benten backup tool.
///
/// Only the source and destination are required. Credentials come from the
/// env file, everything else tunes how the batch runs.
#[derive(Parser, Debug)]
#[clap(name = "benten", version, about = "Back up local files to a Backblaze B2 bucket")]
pub struct Args {
    /// File or directory to back up
    #[clap(short, long)]
    pub src: PathBuf,

    /// Destination prefix inside the bucket
    #[clap(short, long)]
    pub dist: String,

    /// Verbose logging
    #[clap(short, long)]
    pub verbose: bool,

    /// Env file holding the B2 credentials (default: .env.benten)
    #[clap(long)]
    pub env_file: Option<PathBuf>,

    /// Maximum number of uploads in flight (default: number of CPUs, at least 4)
    #[clap(long)]
    pub concurrency: Option<usize>,

    /// Keep uploading after a file fails instead of stopping the batch
    #[clap(long)]
    pub continue_on_error: bool,

    /// Files larger than this many bytes use the large-file protocol
    #[clap(long, default_value_t = DEFAULT_LARGE_FILE_THRESHOLD)]
    pub large_file_threshold: u64,

    /// Write a JSON summary of the run to this path
    #[clap(long)]
    pub summary: Option<PathBuf>,
}

impl Args {
    /// Batch options selected by these arguments.
    pub fn backup_options(&self) -> BackupOptions {
        let defaults = BackupOptions::default();
        BackupOptions {
            concurrency: self.concurrency.filter(|n| *n > 0).unwrap_or(defaults.concurrency),
            policy: if self.continue_on_error {
                FailurePolicy::ContinueOnError
            } else {
                FailurePolicy::FailFast
            },
            large_file_threshold: self.large_file_threshold,
        }
    }
}
