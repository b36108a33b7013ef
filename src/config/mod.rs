//! Configuration: B2 credentials and runtime options.

mod credentials;
mod options;

pub use credentials::{CredentialName, CredentialStore, Credentials};
pub use options::{BackupOptions, ClientConfig, FailurePolicy};
