use std::time::Duration;

use crate::constants::{
    B2_AUTH_BASE_URL, DEFAULT_CONNECTION_TIMEOUT_SECS, DEFAULT_LARGE_FILE_THRESHOLD,
    MIN_DEFAULT_CONCURRENCY,
};

/// HTTP client settings.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Host that serves `b2_authorize_account`
    pub auth_base_url: String,
    pub connect_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            auth_base_url: B2_AUTH_BASE_URL.to_string(),
            connect_timeout: Duration::from_secs(DEFAULT_CONNECTION_TIMEOUT_SECS),
        }
    }
}

/// What the orchestrator does when one file fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Stop dispatching new uploads after the first failure.
    #[default]
    FailFast,
    /// Upload everything and report failures at the end.
    ContinueOnError,
}

/// Batch-level knobs for the backup orchestrator.
#[derive(Debug, Clone)]
pub struct BackupOptions {
    /// Maximum number of uploads in flight at once
    pub concurrency: usize,
    pub policy: FailurePolicy,
    /// Files larger than this go through the large-file protocol
    pub large_file_threshold: u64,
}

impl Default for BackupOptions {
    fn default() -> Self {
        BackupOptions {
            concurrency: num_cpus::get().max(MIN_DEFAULT_CONCURRENCY),
            policy: FailurePolicy::default(),
            large_file_threshold: DEFAULT_LARGE_FILE_THRESHOLD,
        }
    }
}
