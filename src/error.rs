//! Error taxonomy for the upload pipeline.
//!
//! Every library operation returns [`Result`], and every variant is fatal to
//! the operation that produced it. Nothing in the pipeline retries; callers
//! decide whether sibling uploads keep going.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, BackupError>;

#[derive(Debug, Error)]
pub enum BackupError {
    /// A required credential source could not be located or parsed.
    #[error("configuration error: {0}")]
    Config(String),

    /// The B2 API answered with a non-2xx status.
    ///
    /// `Display` yields the message alone so that the line logged for the
    /// user is exactly what the API said.
    #[error("{message}")]
    RemoteApi {
        status: u16,
        code: String,
        message: String,
    },

    /// Request construction or network transport failure.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// A 2xx response whose body did not have the expected shape.
    #[error("failed to decode {what} response: {source}")]
    Decode {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// A source path could not be statted, listed or read.
    #[error("filesystem error at {}: {source}", path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl BackupError {
    /// Wrap an I/O error with the path that caused it.
    pub fn filesystem(path: &Path, source: io::Error) -> Self {
        BackupError::Filesystem {
            path: path.to_path_buf(),
            source,
        }
    }

    /// True for remote errors that mean the session token is no longer usable.
    pub fn is_expired_auth(&self) -> bool {
        matches!(
            self,
            BackupError::RemoteApi { status: 401, code, .. }
                if code == "expired_auth_token" || code == "bad_auth_token"
        )
    }
}
