//! Security utilities.
//!
//! Currently this is credential scrubbing: keeping B2 keys and tokens out of
//! log lines and error messages.

pub mod credential_scrubber;

pub use credential_scrubber::{safe_error_message, scrub_credentials, scrub_secrets};
