//! # benten
//!
//! Backs up local files to a Backblaze B2 bucket over the native B2 API and
//! reports a public URL for every stored object.
//!
//! ## Overview
//!
//! A backup run authorizes the account once, scans the source path, and
//! uploads each file concurrently. Small files go up in a single request;
//! files above the large-file threshold are split into parts and uploaded
//! through the B2 large-file protocol. Every byte range travels with its
//! SHA-1 so B2 can verify it on arrival.
//!
//! ## Features
//!
//! - **Shared session**: one authorization per run, refreshed when B2 reports
//!   an expired token
//! - **Bounded parallelism**: a semaphore caps uploads in flight
//! - **Failure policies**: stop at the first failure, or upload everything
//!   and report failures at the end
//! - **Large files**: start/part/finish with cancellation on failure
//! - **JSON summary**: optional per-file report of a run
//!
//! ## Usage
//!
//! ```no_run
//! use std::path::Path;
//! use benten::backup::BackupOrchestrator;
//! use benten::cloud::HttpTransport;
//! use benten::config::{BackupOptions, ClientConfig, Credentials};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = ClientConfig::default();
//! let credentials = Credentials::from_env_file(None)?;
//! let transport = HttpTransport::shared(&config)?;
//!
//! let orchestrator =
//!     BackupOrchestrator::new(transport, credentials, &config, BackupOptions::default());
//! let report = orchestrator.backup(Path::new("/home/me/music"), "backup/music").await?;
//!
//! for url in report.public_urls() {
//!     println!("{}", url);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Organization
//!
//! - [`backup`]: Batch orchestration and per-file outcomes
//! - [`cli`]: Command-line interface definitions and argument parsing
//! - [`cloud`]: B2 API client (authorization, upload endpoints, uploads)
//! - [`config`]: Credentials and runtime options
//! - [`files`]: Source scanning and file readers
//! - [`security`]: Credential scrubbing for logs
//! - [`utils`]: Hashing, content types and summaries
//! - [`constants`]: Application-wide constants
//! - [`error`]: Error type shared by the library

/// Backup orchestration and reporting
pub mod backup;

/// Command-line interface definitions and argument parsing
pub mod cli;

/// Backblaze B2 API client
pub mod cloud;

/// Credentials and runtime options
pub mod config;

/// Application constants and configuration values
pub mod constants;

/// Library error type
pub mod error;

/// Source scanning and file readers
pub mod files;

/// Security utilities for credential protection
pub mod security;

/// Utility functions for hashing, content types and summaries
pub mod utils;

/// Test utilities and helpers
#[cfg(test)]
pub mod test_utils;
