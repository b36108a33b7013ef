use std::collections::HashMap;
use std::env;
use std::fmt;
use std::path::Path;

use log::{debug, warn};

use crate::constants::{
    DEFAULT_ENV_FILE, ENV_APP_KEY, ENV_APP_KEY_ID, ENV_BUCKET_ID, ENV_BUCKET_NAME,
};
use crate::error::{BackupError, Result};

/// The four secrets the uploader needs, by logical name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CredentialName {
    AppKeyId,
    AppKey,
    BucketId,
    BucketName,
}

impl CredentialName {
    pub const ALL: [CredentialName; 4] = [
        CredentialName::AppKeyId,
        CredentialName::AppKey,
        CredentialName::BucketId,
        CredentialName::BucketName,
    ];

    /// Variable name in the env file / process environment
    pub fn env_var(self) -> &'static str {
        match self {
            CredentialName::AppKeyId => ENV_APP_KEY_ID,
            CredentialName::AppKey => ENV_APP_KEY,
            CredentialName::BucketId => ENV_BUCKET_ID,
            CredentialName::BucketName => ENV_BUCKET_NAME,
        }
    }

    /// Parse a logical name such as `APP_KEY_ID`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "APP_KEY_ID" => Some(CredentialName::AppKeyId),
            "APP_KEY" => Some(CredentialName::AppKey),
            "BUCKET_ID" => Some(CredentialName::BucketId),
            "BUCKET_NAME" => Some(CredentialName::BucketName),
            _ => None,
        }
    }
}

/// Resolved secret values, keyed by logical name.
///
/// Values come from a dotenv-style file; variables already present in the
/// process environment take precedence over the file. Values are not
/// validated, so an empty string is a legal result.
#[derive(Clone, Default)]
pub struct CredentialStore {
    values: HashMap<CredentialName, String>,
}

impl CredentialStore {
    /// Load from `.env.benten` in the current working directory.
    pub fn from_default_location() -> Result<Self> {
        let cwd = env::current_dir().map_err(|e| {
            BackupError::Config(format!("cannot determine working directory: {}", e))
        })?;
        Self::from_env_file(&cwd.join(DEFAULT_ENV_FILE))
    }

    /// Load from an explicit env file, overlaying the process environment.
    pub fn from_env_file(path: &Path) -> Result<Self> {
        Self::from_env_file_with(path, |var| env::var(var).ok())
    }

    /// Load from `path`, preferring any value `lookup` returns for a variable.
    fn from_env_file_with<F>(path: &Path, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let iter = dotenvy::from_path_iter(path).map_err(|e| {
            BackupError::Config(format!("cannot load {}: {}", path.display(), e))
        })?;

        let mut file_values = HashMap::new();
        for item in iter {
            let (key, value) = item.map_err(|e| {
                BackupError::Config(format!("cannot parse {}: {}", path.display(), e))
            })?;
            file_values.insert(key, value);
        }
        debug!("Loaded {} variables from {}", file_values.len(), path.display());

        let values = CredentialName::ALL
            .iter()
            .map(|name| {
                let var = name.env_var();
                let value = lookup(var)
                    .or_else(|| file_values.get(var).cloned())
                    .unwrap_or_default();
                (*name, value)
            })
            .collect();

        Ok(CredentialStore { values })
    }

    /// Build a store from explicit values, bypassing file and environment.
    pub fn from_values<I>(values: I) -> Self
    where
        I: IntoIterator<Item = (CredentialName, String)>,
    {
        CredentialStore {
            values: values.into_iter().collect(),
        }
    }

    /// Resolve a secret by logical name (`APP_KEY_ID`, `APP_KEY`, `BUCKET_ID`, `BUCKET_NAME`).
    pub fn resolve(&self, name: &str) -> Result<String> {
        let name = CredentialName::from_name(name)
            .ok_or_else(|| BackupError::Config(format!("unknown credential '{}'", name)))?;
        Ok(self.get(name))
    }

    pub fn get(&self, name: CredentialName) -> String {
        self.values.get(&name).cloned().unwrap_or_default()
    }
}

/// Credentials resolved once per process and shared by every uploader.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub key_id: String,
    pub key: String,
    pub bucket_id: String,
    pub bucket_name: String,
}

impl Credentials {
    pub fn load(store: &CredentialStore) -> Result<Self> {
        let credentials = Credentials {
            key_id: store.resolve("APP_KEY_ID")?,
            key: store.resolve("APP_KEY")?,
            bucket_id: store.resolve("BUCKET_ID")?,
            bucket_name: store.resolve("BUCKET_NAME")?,
        };

        // Empty values are left for the API to reject as an auth failure
        for name in CredentialName::ALL {
            if store.get(name).is_empty() {
                warn!("Credential {} is empty", name.env_var());
            }
        }

        Ok(credentials)
    }

    /// Load from `path`, or from the default env file when `path` is None.
    pub fn from_env_file(path: Option<&Path>) -> Result<Self> {
        let store = match path {
            Some(p) => CredentialStore::from_env_file(p)?,
            None => CredentialStore::from_default_location()?,
        };
        Self::load(&store)
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("key_id", &self.key_id)
            .field("key", &"<REDACTED>")
            .field("bucket_id", &self.bucket_id)
            .field("bucket_name", &self.bucket_name)
            .finish()
    }
}
