use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Utc;
use log::{debug, error, info, warn};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::backup::report::{BackupReport, FileOutcome, FileResult};
use crate::cloud::{ApiTransport, AuthBroker, LargeFileUploader, ObjectUploader};
use crate::config::{BackupOptions, ClientConfig, Credentials, FailurePolicy};
use crate::error::{BackupError, Result};
use crate::files::{file_name, list_files, ChunkedFileRecord, FileRecord};
use crate::security::{safe_error_message, scrub_secrets};
use crate::utils::mime;

/// Object name for `name` under `prefix`. Trailing slashes on the prefix are
/// ignored and an empty prefix yields the bare name.
pub fn logical_path(prefix: &str, name: &str) -> String {
    let prefix = prefix.trim_end_matches('/');
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{}/{}", prefix, name)
    }
}

/// Uploads one file, choosing the whole-file or large-file protocol.
struct FileWorker {
    auth: Arc<AuthBroker>,
    uploader: ObjectUploader,
    large: LargeFileUploader,
    large_file_threshold: u64,
}

impl FileWorker {
    async fn upload(&self, source: &Path, logical_path: &str) -> Result<String> {
        let size = tokio::fs::metadata(source)
            .await
            .map_err(|e| BackupError::filesystem(source, e))?
            .len();

        let part_size = if size > self.large_file_threshold {
            let part_size = self.auth.session().await?.part_size();
            Some(part_size).filter(|p| size > *p)
        } else {
            None
        };

        match part_size {
            Some(part_size) => {
                let record = ChunkedFileRecord::open(source, part_size).await?;
                let content_type = Some(mime::content_type_for(&record.extension));
                debug!(
                    "{} is {} bytes, uploading in {} parts",
                    source.display(),
                    size,
                    record.part_count()
                );
                self.large.upload(&record, logical_path, content_type).await
            }
            None => {
                let record = FileRecord::read(source).await?;
                let content_type = Some(mime::content_type_for(&record.extension));
                self.uploader
                    .upload(record.data, logical_path, content_type, false)
                    .await
            }
        }
    }

    /// Log line for a failed upload with every known secret removed.
    fn failure_message(&self, source: &Path, error: &BackupError) -> String {
        let credentials = self.auth.credentials();
        let context = format!("Failed to upload {}", source.display());
        let message = safe_error_message(&context, error);
        scrub_secrets(&message, &[credentials.key.as_str(), credentials.key_id.as_str()])
    }
}

/// Drives a whole backup: scan the source, then upload every file with
/// bounded concurrency.
///
/// ```text
///   source ──► list_files ──► [task per file] ──► Semaphore ──► FileWorker
///                                   │                              │
///                                   └── CancellationToken ◄── failure (FailFast)
/// ```
pub struct BackupOrchestrator {
    auth: Arc<AuthBroker>,
    worker: Arc<FileWorker>,
    options: BackupOptions,
}

impl BackupOrchestrator {
    pub fn new(
        transport: Arc<dyn ApiTransport>,
        credentials: Credentials,
        config: &ClientConfig,
        options: BackupOptions,
    ) -> Self {
        let auth = Arc::new(AuthBroker::new(
            transport,
            Arc::new(credentials),
            config.auth_base_url.clone(),
        ));
        Self::with_auth(auth, options)
    }

    /// Build on an existing broker, sharing its session cache.
    pub fn with_auth(auth: Arc<AuthBroker>, options: BackupOptions) -> Self {
        let worker = FileWorker {
            auth: Arc::clone(&auth),
            uploader: ObjectUploader::new(Arc::clone(&auth)),
            large: LargeFileUploader::new(Arc::clone(&auth)),
            large_file_threshold: options.large_file_threshold,
        };

        BackupOrchestrator {
            auth,
            worker: Arc::new(worker),
            options,
        }
    }

    /// Back up `source` (a file or a directory tree) under `destination_prefix`.
    ///
    /// Fails outright when the source cannot be read or the account cannot be
    /// authorized. Per-file failures are recorded in the report instead.
    pub async fn backup(&self, source: &Path, destination_prefix: &str) -> Result<BackupReport> {
        let started_at = Utc::now();
        let metadata = tokio::fs::metadata(source)
            .await
            .map_err(|e| BackupError::filesystem(source, e))?;

        // Authorize before touching any upload endpoint
        self.auth.session().await?;

        let files = if metadata.is_file() {
            vec![source.to_path_buf()]
        } else {
            list_files(source)?
        };
        info!(
            "Backing up {} files from {} to '{}'",
            files.len(),
            source.display(),
            destination_prefix
        );

        let jobs = plan(&files, destination_prefix);
        let outcomes = self.dispatch(&jobs).await;

        let results = jobs
            .into_iter()
            .zip(outcomes)
            .map(|((source, logical_path), outcome)| FileResult {
                source,
                logical_path,
                outcome,
            })
            .collect();

        Ok(BackupReport {
            batch_id: Uuid::new_v4(),
            started_at,
            finished_at: Utc::now(),
            source: source.to_path_buf(),
            destination: destination_prefix.to_string(),
            results,
        })
    }

    /// Run one task per job and return outcomes in job order.
    async fn dispatch(&self, jobs: &[(PathBuf, String)]) -> Vec<FileOutcome> {
        let semaphore = Arc::new(Semaphore::new(self.options.concurrency.max(1)));
        let cancel = CancellationToken::new();
        let policy = self.options.policy;
        let mut tasks = JoinSet::new();

        for (index, (source, logical_path)) in jobs.iter().cloned().enumerate() {
            let worker = Arc::clone(&self.worker);
            let semaphore = Arc::clone(&semaphore);
            let cancel = cancel.clone();

            tasks.spawn(async move {
                let outcome = tokio::select! {
                    biased;
                    _ = cancel.cancelled() => FileOutcome::Skipped,
                    permit = semaphore.acquire_owned() => match permit {
                        Ok(_permit) if !cancel.is_cancelled() => {
                            match worker.upload(&source, &logical_path).await {
                                Ok(url) => {
                                    info!("[Public URL]: {}", url);
                                    FileOutcome::Uploaded { url }
                                }
                                Err(e) => {
                                    error!("{}", worker.failure_message(&source, &e));
                                    if policy == FailurePolicy::FailFast {
                                        cancel.cancel();
                                    }
                                    FileOutcome::Failed(e)
                                }
                            }
                        }
                        _ => FileOutcome::Skipped,
                    },
                };
                (index, outcome)
            });
        }

        let mut outcomes: Vec<FileOutcome> = jobs.iter().map(|_| FileOutcome::Skipped).collect();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, outcome)) => outcomes[index] = outcome,
                Err(e) if e.is_panic() => std::panic::resume_unwind(e.into_panic()),
                Err(e) => warn!("Upload task ended early: {}", e),
            }
        }

        if cancel.is_cancelled() {
            let skipped = outcomes
                .iter()
                .filter(|o| matches!(o, FileOutcome::Skipped))
                .count();
            warn!("Stopped after the first failure, {} files not uploaded", skipped);
        }

        outcomes
    }
}

/// Pair each file with its object name, warning about names that collide.
fn plan(files: &[PathBuf], prefix: &str) -> Vec<(PathBuf, String)> {
    let mut seen = HashSet::new();
    files
        .iter()
        .map(|path| {
            let logical = logical_path(prefix, &file_name(path));
            if !seen.insert(logical.clone()) {
                warn!(
                    "{} maps to '{}' which another file already uses; the later upload wins",
                    path.display(),
                    logical
                );
            }
            (path.clone(), logical)
        })
        .collect()
}
