use std::sync::Arc;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use log::{debug, info};
use tokio::sync::Mutex;

use crate::cloud::api::{self, AuthorizeAccountResponse};
use crate::cloud::transport::{ApiRequest, ApiTransport};
use crate::config::Credentials;
use crate::constants::{AUTHORIZE_ACCOUNT_PATH, HEADER_AUTHORIZATION, MAX_PART_SIZE, MIN_PART_SIZE};
use crate::error::Result;

/// A short-lived B2 API session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub api_url: String,
    pub authorization_token: String,
    pub download_url: String,
    pub recommended_part_size: u64,
    pub absolute_minimum_part_size: u64,
}

impl Session {
    /// Part size for large files: the recommended size, kept within
    /// `[absolute minimum, 5GB]`.
    pub fn part_size(&self) -> u64 {
        let minimum = if self.absolute_minimum_part_size > 0 {
            self.absolute_minimum_part_size
        } else {
            MIN_PART_SIZE
        };
        self.recommended_part_size.max(minimum).min(MAX_PART_SIZE)
    }
}

/// Exchanges the account key pair for sessions and caches one for reuse.
pub struct AuthBroker {
    transport: Arc<dyn ApiTransport>,
    credentials: Arc<Credentials>,
    auth_base_url: String,
    cached: Mutex<Option<Arc<Session>>>,
}

impl AuthBroker {
    pub fn new(
        transport: Arc<dyn ApiTransport>,
        credentials: Arc<Credentials>,
        auth_base_url: impl Into<String>,
    ) -> Self {
        AuthBroker {
            transport,
            credentials,
            auth_base_url: auth_base_url.into(),
            cached: Mutex::new(None),
        }
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn transport(&self) -> &dyn ApiTransport {
        self.transport.as_ref()
    }

    /// Perform a fresh `b2_authorize_account` round trip.
    pub async fn authorize(&self) -> Result<Session> {
        let basic = STANDARD.encode(format!(
            "{}:{}",
            self.credentials.key_id, self.credentials.key
        ));
        let url = format!(
            "{}{}",
            self.auth_base_url.trim_end_matches('/'),
            AUTHORIZE_ACCOUNT_PATH
        );
        let request =
            ApiRequest::get(url).header(HEADER_AUTHORIZATION, format!("Basic {}", basic));

        let response: AuthorizeAccountResponse =
            api::call(self.transport.as_ref(), request, "b2_authorize_account").await?;
        debug!("Authorized against {}", response.api_url);

        Ok(Session {
            api_url: response.api_url,
            authorization_token: response.authorization_token,
            download_url: response.download_url,
            recommended_part_size: response.recommended_part_size,
            absolute_minimum_part_size: response.absolute_minimum_part_size,
        })
    }

    /// Return the cached session, authorizing first if there is none.
    ///
    /// The lock is held across the round trip so concurrent callers share a
    /// single authorization.
    pub async fn session(&self) -> Result<Arc<Session>> {
        let mut cached = self.cached.lock().await;
        if let Some(session) = cached.as_ref() {
            return Ok(Arc::clone(session));
        }
        let session = Arc::new(self.authorize().await?);
        *cached = Some(Arc::clone(&session));
        Ok(session)
    }

    /// Drop `stale` from the cache so the next caller re-authorizes.
    ///
    /// A session cached after `stale` was handed out is left alone.
    pub async fn invalidate(&self, stale: &Arc<Session>) {
        let mut cached = self.cached.lock().await;
        if cached.as_ref().is_some_and(|current| Arc::ptr_eq(current, stale)) {
            cached.take();
            info!("Discarded cached B2 session");
        }
    }

    /// Pass `result` through, invalidating `session` on token errors.
    pub async fn observe<T>(&self, session: &Arc<Session>, result: Result<T>) -> Result<T> {
        if let Err(e) = &result {
            if e.is_expired_auth() {
                self.invalidate(session).await;
            }
        }
        result
    }
}
