//! Backup orchestration: turn a source path into uploaded objects.

/// Scan-and-upload driver with bounded concurrency
pub mod orchestrator;

/// Per-file outcomes and the batch report
pub mod report;

pub use orchestrator::{logical_path, BackupOrchestrator};
pub use report::{BackupReport, FileOutcome, FileResult};
