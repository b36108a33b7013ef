//! Small helpers shared by the upload pipeline.
//!
//! ## Components
//!
//! - **Hashing**: SHA-1 digests for `X-Bz-Content-Sha1`
//! - **MIME**: extension to content type lookup
//! - **Summary**: JSON report of a backup run
//!
//! ### Hashing a payload
//!
//! ```
//! use benten::utils::hash::sha1_hex;
//!
//! assert_eq!(sha1_hex(b"abc"), "a9993e364706816aba3e25717850c26c9cd0d89d");
//! ```

/// Backup summary generation and reporting
pub mod summary;

/// Cryptographic hash calculation utilities
pub mod hash;

/// Extension to content type table
pub mod mime;
