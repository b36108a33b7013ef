use std::sync::Arc;

use bytes::Bytes;
use log::{debug, info, warn};

use crate::cloud::api::{
    self, CancelLargeFileRequest, FinishLargeFileRequest, StartLargeFileRequest,
    StartLargeFileResponse, UploadFileResponse, UploadPartResponse,
};
use crate::cloud::auth::{AuthBroker, Session};
use crate::cloud::transport::ApiRequest;
use crate::cloud::upload_url::{UploadKind, UploadTarget, UploadUrlBroker};
use crate::cloud::uploader::public_url;
use crate::constants::{
    AUTO_CONTENT_TYPE, CANCEL_LARGE_FILE_PATH, FINISH_LARGE_FILE_PATH, HEADER_AUTHORIZATION,
    HEADER_CONTENT_LENGTH, HEADER_CONTENT_SHA1, HEADER_PART_NUMBER, START_LARGE_FILE_PATH,
};
use crate::error::Result;
use crate::files::ChunkedFileRecord;
use crate::utils::hash::sha1_hex;

/// Uploads a file through the B2 large-file protocol.
///
/// Start a large file, upload each chunk as a numbered part with its own
/// SHA-1, then finish with the part hashes in order. If anything fails after
/// the start call the large file is cancelled so no unfinished parts linger.
pub struct LargeFileUploader {
    auth: Arc<AuthBroker>,
    urls: UploadUrlBroker,
}

impl LargeFileUploader {
    pub fn new(auth: Arc<AuthBroker>) -> Self {
        LargeFileUploader {
            urls: UploadUrlBroker::new(Arc::clone(&auth)),
            auth,
        }
    }

    pub async fn upload(
        &self,
        record: &ChunkedFileRecord,
        logical_path: &str,
        content_type: Option<&str>,
    ) -> Result<String> {
        let session = self.auth.session().await?;
        let content_type = content_type
            .filter(|c| !c.is_empty())
            .unwrap_or(AUTO_CONTENT_TYPE);

        let file_id = self.start(&session, logical_path, content_type).await?;
        debug!(
            "Started large file {} for {} ({} parts of {} bytes)",
            file_id,
            logical_path,
            record.part_count(),
            record.part_size
        );

        match self.upload_parts_and_finish(record, &file_id).await {
            Ok(stored) => {
                info!("Uploaded '{}' in {} parts", stored.file_name, record.part_count());
                Ok(public_url(
                    &session.download_url,
                    &self.auth.credentials().bucket_name,
                    &stored.file_name,
                ))
            }
            Err(e) => {
                if let Err(cancel_err) = self.cancel(&file_id).await {
                    warn!("Failed to cancel large file {}: {}", file_id, cancel_err);
                }
                Err(e)
            }
        }
    }

    async fn start(
        &self,
        session: &Arc<Session>,
        file_name: &str,
        content_type: &str,
    ) -> Result<String> {
        let body = api::to_json(&StartLargeFileRequest {
            bucket_id: &self.auth.credentials().bucket_id,
            file_name,
            content_type,
        });
        let request = session_request(session, START_LARGE_FILE_PATH, body);

        let result: Result<StartLargeFileResponse> =
            api::call(self.auth.transport(), request, "b2_start_large_file").await;
        Ok(self.auth.observe(session, result).await?.file_id)
    }

    async fn upload_parts_and_finish(
        &self,
        record: &ChunkedFileRecord,
        file_id: &str,
    ) -> Result<UploadFileResponse> {
        let kind = UploadKind::Part {
            file_id: Some(file_id.to_string()),
        };
        let mut reader = record.chunks().await?;
        let mut part_hashes = Vec::with_capacity(record.part_count() as usize);
        let mut part_number = 1u32;

        while let Some(chunk) = reader.next_chunk().await? {
            let target = self.urls.upload_target(&kind).await?;
            let hash = self.upload_part(target, part_number, chunk).await?;
            part_hashes.push(hash);
            part_number += 1;
        }

        // Parts may have outlived the session the file was started under
        let session = self.auth.session().await?;
        self.finish(&session, file_id, &part_hashes).await
    }

    /// Upload one part to a part target and return its SHA-1.
    pub async fn upload_part(
        &self,
        target: UploadTarget,
        part_number: u32,
        chunk: Bytes,
    ) -> Result<String> {
        let hash = sha1_hex(&chunk);
        debug!("Uploading part {} ({} bytes)", part_number, chunk.len());

        let request = ApiRequest::post_bytes(target.upload_url, chunk.clone())
            .header(HEADER_AUTHORIZATION, target.authorization_token.as_str())
            .header(HEADER_PART_NUMBER, part_number.to_string())
            .header(HEADER_CONTENT_LENGTH, chunk.len().to_string())
            .header(HEADER_CONTENT_SHA1, hash.as_str());

        let result: Result<UploadPartResponse> =
            api::call(self.auth.transport(), request, "b2_upload_part").await;
        let response = self.auth.observe(&target.session, result).await?;

        if response.part_number != part_number || response.content_sha1 != hash {
            warn!(
                "Part {} acknowledged as part {} with sha1 {}",
                part_number, response.part_number, response.content_sha1
            );
        }

        Ok(hash)
    }

    async fn finish(
        &self,
        session: &Arc<Session>,
        file_id: &str,
        part_hashes: &[String],
    ) -> Result<UploadFileResponse> {
        let body = api::to_json(&FinishLargeFileRequest {
            file_id,
            part_sha1_array: part_hashes,
        });
        let request = session_request(session, FINISH_LARGE_FILE_PATH, body);

        let result: Result<UploadFileResponse> =
            api::call(self.auth.transport(), request, "b2_finish_large_file").await;
        self.auth.observe(session, result).await
    }

    /// Cancel `file_id` under the current session, which may differ from the
    /// one the file was started with.
    async fn cancel(&self, file_id: &str) -> Result<()> {
        let session = self.auth.session().await?;
        let body = api::to_json(&CancelLargeFileRequest { file_id });
        let request = session_request(&session, CANCEL_LARGE_FILE_PATH, body);

        let response = self.auth.transport().send(request).await?;
        if !response.is_success() {
            return Err(api::remote_error(&response));
        }
        debug!("Cancelled large file {}", file_id);
        Ok(())
    }
}

/// POST `body` to an account API endpoint with the session token.
fn session_request(session: &Session, path: &str, body: serde_json::Value) -> ApiRequest {
    ApiRequest::post_json(format!("{}{}", session.api_url, path), body)
        .header(HEADER_AUTHORIZATION, session.authorization_token.as_str())
}
