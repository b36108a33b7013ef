//! Backblaze B2 integration for file uploads.
//!
//! This module talks to the native B2 HTTP/JSON API. Every upload follows
//! the same chain: authorize the account, ask for a one-time upload
//! endpoint, then POST the bytes with their SHA-1.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────┐   ┌──────────────────────┐
//! │  ObjectUploader  │   │  LargeFileUploader   │
//! └────────┬─────────┘   └──────────┬───────────┘
//!          │                        │
//!          └───────────┬────────────┘
//!                ┌─────▼───────────┐
//!                │ UploadUrlBroker │
//!                └─────┬───────────┘
//!                ┌─────▼──────┐
//!                │ AuthBroker │  (cached session)
//!                └─────┬──────┘
//!                ┌─────▼────────┐
//!                │ ApiTransport │  (reqwest)
//!                └──────────────┘
//! ```
//!
//! ## Usage Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use benten::cloud::{AuthBroker, HttpTransport, ObjectUploader};
//! use benten::config::{ClientConfig, Credentials};
//!
//! # async fn example() -> benten::error::Result<()> {
//! let config = ClientConfig::default();
//! let credentials = Credentials::from_env_file(None)?;
//! let transport = HttpTransport::shared(&config)?;
//! let auth = Arc::new(AuthBroker::new(transport, Arc::new(credentials), config.auth_base_url));
//!
//! let uploader = ObjectUploader::new(auth);
//! let url = uploader
//!     .upload(bytes::Bytes::from_static(b"hello"), "notes/hello.txt", Some("text/plain"), false)
//!     .await?;
//! println!("{}", url);
//! # Ok(())
//! # }
//! ```

/// Wire types and response decoding
pub mod api;

/// Account authorization and the shared session cache
pub mod auth;

/// Large-file (multipart) protocol
pub mod large_file;

/// HTTP transport seam
pub mod transport;

/// One-time upload endpoint issuance
pub mod upload_url;

/// Whole-file uploads
pub mod uploader;

pub use auth::{AuthBroker, Session};
pub use large_file::LargeFileUploader;
pub use transport::{ApiRequest, ApiResponse, ApiTransport, HttpTransport, Method, RequestBody};
pub use upload_url::{UploadKind, UploadTarget, UploadUrlBroker};
pub use uploader::{encode_file_name, public_url, ObjectUploader};
