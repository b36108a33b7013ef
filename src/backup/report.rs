use std::path::PathBuf;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::BackupError;

/// What happened to one source file.
#[derive(Debug)]
pub enum FileOutcome {
    Uploaded { url: String },
    Failed(BackupError),
    /// Never started because the batch was stopped first
    Skipped,
}

impl FileOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            FileOutcome::Uploaded { .. } => "uploaded",
            FileOutcome::Failed(_) => "failed",
            FileOutcome::Skipped => "skipped",
        }
    }
}

/// Outcome for a single source file, keyed by where it came from and where
/// it was meant to go.
#[derive(Debug)]
pub struct FileResult {
    pub source: PathBuf,
    pub logical_path: String,
    pub outcome: FileOutcome,
}

/// Result of one backup run.
#[derive(Debug)]
pub struct BackupReport {
    pub batch_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub source: PathBuf,
    pub destination: String,
    /// One entry per scanned file, in scan order
    pub results: Vec<FileResult>,
}

impl BackupReport {
    pub fn uploaded_count(&self) -> usize {
        self.count(|o| matches!(o, FileOutcome::Uploaded { .. }))
    }

    pub fn failed_count(&self) -> usize {
        self.count(|o| matches!(o, FileOutcome::Failed(_)))
    }

    pub fn skipped_count(&self) -> usize {
        self.count(|o| matches!(o, FileOutcome::Skipped))
    }

    pub fn is_success(&self) -> bool {
        self.failed_count() == 0 && self.skipped_count() == 0
    }

    /// The first failure in scan order.
    pub fn first_error(&self) -> Option<&BackupError> {
        self.results.iter().find_map(|r| match &r.outcome {
            FileOutcome::Failed(e) => Some(e),
            _ => None,
        })
    }

    pub fn public_urls(&self) -> Vec<&str> {
        self.results
            .iter()
            .filter_map(|r| match &r.outcome {
                FileOutcome::Uploaded { url } => Some(url.as_str()),
                _ => None,
            })
            .collect()
    }

    fn count(&self, predicate: impl Fn(&FileOutcome) -> bool) -> usize {
        self.results.iter().filter(|r| predicate(&r.outcome)).count()
    }
}
