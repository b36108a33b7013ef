use std::sync::Arc;

use log::debug;

use crate::cloud::api::{self, GetUploadUrlRequest, GetUploadUrlResponse};
use crate::cloud::auth::{AuthBroker, Session};
use crate::cloud::transport::ApiRequest;
use crate::constants::{
    GET_UPLOAD_PART_URL_PATH, GET_UPLOAD_URL_PATH, HEADER_AUTHORIZATION, HEADER_CONTENT_TYPE,
};
use crate::error::Result;

/// Which upload endpoint to request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadKind {
    /// Whole-file upload via `b2_get_upload_url`
    File,
    /// Part upload via `b2_get_upload_part_url`, optionally bound to a started large file
    Part { file_id: Option<String> },
}

/// One-time upload endpoint and token.
///
/// Not `Clone`: a target is moved into exactly one upload call.
#[derive(Debug)]
pub struct UploadTarget {
    pub upload_url: String,
    pub authorization_token: String,
    pub download_url: String,
    /// Session the endpoint was requested under
    pub session: Arc<Session>,
}

pub struct UploadUrlBroker {
    auth: Arc<AuthBroker>,
}

impl UploadUrlBroker {
    pub fn new(auth: Arc<AuthBroker>) -> Self {
        UploadUrlBroker { auth }
    }

    pub async fn upload_target(&self, kind: &UploadKind) -> Result<UploadTarget> {
        let session = self.auth.session().await?;
        let bucket_id = self.auth.credentials().bucket_id.as_str();

        let (path, file_id) = match kind {
            UploadKind::File => (GET_UPLOAD_URL_PATH, None),
            UploadKind::Part { file_id } => (GET_UPLOAD_PART_URL_PATH, file_id.as_deref()),
        };
        let body = api::to_json(&GetUploadUrlRequest { bucket_id, file_id });

        let request = ApiRequest::post_json(format!("{}{}", session.api_url, path), body)
            .header(HEADER_AUTHORIZATION, session.authorization_token.as_str())
            .header(HEADER_CONTENT_TYPE, "application/json");

        let result: Result<GetUploadUrlResponse> =
            api::call(self.auth.transport(), request, "b2_get_upload_url").await;
        let response = self.auth.observe(&session, result).await?;
        debug!("Got upload endpoint {}", response.upload_url);

        Ok(UploadTarget {
            upload_url: response.upload_url,
            authorization_token: response.authorization_token,
            download_url: session.download_url.clone(),
            session,
        })
    }
}
