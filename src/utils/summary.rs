use std::path::Path;

use serde_json::json;

use crate::backup::{BackupReport, FileOutcome};
use crate::error::{BackupError, Result};
use crate::security::scrub_credentials;

/// Create a JSON summary of a backup run.
///
/// The summary records every file with its outcome, so a partially failed
/// batch can be checked afterwards without scraping the log. Error messages
/// are scrubbed before they are written.
///
/// # Example Output
///
/// ```json
/// {
///   "batch_id": "550e8400-e29b-41d4-a716-446655440000",
///   "source": "/home/me/music",
///   "destination": "backup/music",
///   "started_at": "2024-01-15T14:30:52Z",
///   "uploaded": 41,
///   "failed": 1,
///   "files": [...]
/// }
/// ```
pub fn create_backup_summary(report: &BackupReport) -> Result<String> {
    let files: Vec<_> = report
        .results
        .iter()
        .map(|result| {
            let mut entry = json!({
                "source": result.source.display().to_string(),
                "file_name": result.logical_path,
                "status": result.outcome.label(),
            });
            match &result.outcome {
                FileOutcome::Uploaded { url } => entry["url"] = json!(url),
                FileOutcome::Failed(e) => entry["error"] = json!(scrub_credentials(&e.to_string())),
                FileOutcome::Skipped => {}
            }
            entry
        })
        .collect();

    let duration = report.finished_at - report.started_at;
    let summary = json!({
        "batch_id": report.batch_id.to_string(),
        "source": report.source.display().to_string(),
        "destination": report.destination,
        "started_at": report.started_at.to_rfc3339(),
        "finished_at": report.finished_at.to_rfc3339(),
        "duration_ms": duration.num_milliseconds(),
        "uploader_version": env!("CARGO_PKG_VERSION"),
        "uploaded": report.uploaded_count(),
        "failed": report.failed_count(),
        "skipped": report.skipped_count(),
        "files": files,
    });

    serde_json::to_string_pretty(&summary).map_err(|source| BackupError::Decode {
        what: "backup summary",
        source,
    })
}

/// Write the JSON summary of `report` to `path`.
pub fn write_summary(report: &BackupReport, path: &Path) -> Result<()> {
    let summary = create_backup_summary(report)?;
    std::fs::write(path, summary).map_err(|e| BackupError::filesystem(path, e))
}
