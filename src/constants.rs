//! Global constants for the benten application.
//!
//! This module centralizes all hardcoded values to improve maintainability
//! and make configuration changes easier.

// B2 API endpoints
/// Default host used for account authorization
pub const B2_AUTH_BASE_URL: &str = "https://api.backblazeb2.com";

pub const AUTHORIZE_ACCOUNT_PATH: &str = "/b2api/v2/b2_authorize_account";
pub const GET_UPLOAD_URL_PATH: &str = "/b2api/v1/b2_get_upload_url";
pub const GET_UPLOAD_PART_URL_PATH: &str = "/b2api/v1/b2_get_upload_part_url";
pub const START_LARGE_FILE_PATH: &str = "/b2api/v2/b2_start_large_file";
pub const FINISH_LARGE_FILE_PATH: &str = "/b2api/v2/b2_finish_large_file";
pub const CANCEL_LARGE_FILE_PATH: &str = "/b2api/v2/b2_cancel_large_file";

// B2 request headers
pub const HEADER_AUTHORIZATION: &str = "Authorization";
pub const HEADER_CONTENT_TYPE: &str = "Content-Type";
pub const HEADER_CONTENT_LENGTH: &str = "Content-Length";
pub const HEADER_FILE_NAME: &str = "X-Bz-File-Name";
pub const HEADER_CONTENT_SHA1: &str = "X-Bz-Content-Sha1";
pub const HEADER_PART_NUMBER: &str = "X-Bz-Part-Number";
pub const HEADER_INFO_AUTHOR: &str = "X-Bz-Info-Author";

/// Author tag stored as custom file info on every upload
pub const AUTHOR_TAG: &str = "rivendell";

/// Content type that asks B2 to infer the MIME type itself
pub const AUTO_CONTENT_TYPE: &str = "b2/x-auto";

// Large file constants
/// Largest part (and largest single upload) B2 accepts (5GB)
pub const MAX_PART_SIZE: u64 = 5 * 1024 * 1024 * 1024;

/// Default size above which a file goes through the large-file protocol
pub const DEFAULT_LARGE_FILE_THRESHOLD: u64 = MAX_PART_SIZE;

/// B2 minimum part size, used when the session does not report one (5MB)
pub const MIN_PART_SIZE: u64 = 5 * 1000 * 1000;

// Credentials
/// Env file looked up in the working directory when none is given
pub const DEFAULT_ENV_FILE: &str = ".env.benten";

pub const ENV_APP_KEY_ID: &str = "B2_APP_KEY_ID";
pub const ENV_APP_KEY: &str = "B2_APP_KEY";
pub const ENV_BUCKET_ID: &str = "B2_BUCKET_ID";
pub const ENV_BUCKET_NAME: &str = "B2_BUCKET_NAME";

// Filesystem
/// Finder metadata files never uploaded
pub const HIDDEN_SYSTEM_FILE: &str = ".DS_Store";

// Timeouts
/// Connection timeout for the HTTP client in seconds
pub const DEFAULT_CONNECTION_TIMEOUT_SECS: u64 = 30;

/// Lower bound for the default number of concurrent uploads
pub const MIN_DEFAULT_CONCURRENCY: usize = 4;
