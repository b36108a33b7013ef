use std::sync::Arc;

use bytes::Bytes;
use log::{debug, info};

use crate::cloud::api::{self, UploadFileResponse};
use crate::cloud::auth::AuthBroker;
use crate::cloud::transport::ApiRequest;
use crate::cloud::upload_url::{UploadKind, UploadTarget, UploadUrlBroker};
use crate::constants::{
    AUTHOR_TAG, AUTO_CONTENT_TYPE, HEADER_AUTHORIZATION, HEADER_CONTENT_LENGTH,
    HEADER_CONTENT_SHA1, HEADER_CONTENT_TYPE, HEADER_FILE_NAME, HEADER_INFO_AUTHOR,
};
use crate::error::Result;
use crate::utils::hash::sha1_hex;

/// Public URL of a stored object.
pub fn public_url(download_url: &str, bucket_name: &str, file_name: &str) -> String {
    format!("{}/file/{}/{}", download_url, bucket_name, file_name)
}

/// Percent-encode a file name for `X-Bz-File-Name`, keeping `/` separators.
///
/// Names made of unreserved ASCII characters come out unchanged.
pub fn encode_file_name(name: &str) -> String {
    name.split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

/// Uploads a whole in-memory buffer as a single B2 object.
pub struct ObjectUploader {
    auth: Arc<AuthBroker>,
    urls: UploadUrlBroker,
}

impl ObjectUploader {
    pub fn new(auth: Arc<AuthBroker>) -> Self {
        ObjectUploader {
            urls: UploadUrlBroker::new(Arc::clone(&auth)),
            auth,
        }
    }

    /// Upload `data` as `logical_path` and return its public URL.
    ///
    /// `large` requests the endpoint from `b2_get_upload_part_url` instead of
    /// `b2_get_upload_url`; the transfer is a single request either way.
    pub async fn upload(
        &self,
        data: Bytes,
        logical_path: &str,
        content_type: Option<&str>,
        large: bool,
    ) -> Result<String> {
        let kind = if large {
            UploadKind::Part { file_id: None }
        } else {
            UploadKind::File
        };
        let target = self.urls.upload_target(&kind).await?;
        self.upload_to(target, data, logical_path, content_type).await
    }

    /// Upload to an already issued target, consuming it.
    pub async fn upload_to(
        &self,
        target: UploadTarget,
        data: Bytes,
        logical_path: &str,
        content_type: Option<&str>,
    ) -> Result<String> {
        let hash = sha1_hex(&data);
        let content_type = content_type
            .filter(|c| !c.is_empty())
            .unwrap_or(AUTO_CONTENT_TYPE);
        debug!(
            "Uploading {} ({} bytes, {}, sha1 {})",
            logical_path,
            data.len(),
            content_type,
            hash
        );

        let request = ApiRequest::post_bytes(target.upload_url, data.clone())
            .header(HEADER_AUTHORIZATION, target.authorization_token.as_str())
            .header(HEADER_FILE_NAME, encode_file_name(logical_path))
            .header(HEADER_CONTENT_TYPE, content_type)
            .header(HEADER_CONTENT_LENGTH, data.len().to_string())
            .header(HEADER_CONTENT_SHA1, hash)
            .header(HEADER_INFO_AUTHOR, AUTHOR_TAG);

        let result: Result<UploadFileResponse> =
            api::call(self.auth.transport(), request, "b2_upload_file").await;
        let response = self.auth.observe(&target.session, result).await?;

        info!("Uploaded '{}'", response.file_name);

        Ok(public_url(
            &target.download_url,
            &self.auth.credentials().bucket_name,
            &response.file_name,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cloud::transport::{ApiResponse, MockApiTransport, RequestBody};
    use crate::config::Credentials;
    use crate::error::BackupError;

    fn uploader(mock: MockApiTransport) -> ObjectUploader {
        let credentials = Arc::new(Credentials {
            key_id: "id".to_string(),
            key: "key".to_string(),
            bucket_id: "bucket-123".to_string(),
            bucket_name: "media".to_string(),
        });
        ObjectUploader::new(Arc::new(AuthBroker::new(
            Arc::new(mock),
            credentials,
            "https://auth.test",
        )))
    }

    fn scripted(request: &ApiRequest) -> Option<ApiResponse> {
        if request.url.ends_with("b2_authorize_account") {
            return Some(ApiResponse::new(
                200,
                r#"{"apiUrl":"https://api.test","authorizationToken":"session-token","downloadUrl":"https://dl.test","recommendedPartSize":100000000}"#,
            ));
        }
        if request.url.ends_with("b2_get_upload_url")
            || request.url.ends_with("b2_get_upload_part_url")
        {
            return Some(ApiResponse::new(
                200,
                r#"{"uploadUrl":"https://pod.test/upload","authorizationToken":"upload-token"}"#,
            ));
        }
        None
    }

    #[test]
    fn test_public_url_format() {
        assert_eq!(
            public_url("https://f001.backblazeb2.com", "media", "music/a.mp3"),
            "https://f001.backblazeb2.com/file/media/music/a.mp3"
        );
    }

    #[test]
    fn test_encode_file_name() {
        assert_eq!(encode_file_name("music/a.mp3"), "music/a.mp3");
        assert_eq!(encode_file_name("music/my song.mp3"), "music/my%20song.mp3");
        assert_eq!(encode_file_name("a/b/c-d_e~f.txt"), "a/b/c-d_e~f.txt");
    }

    #[tokio::test]
    async fn test_upload_sends_required_headers() {
        let mut mock = MockApiTransport::new();
        mock.expect_send().times(3).returning(|request| {
            if let Some(response) = scripted(&request) {
                return Ok(response);
            }
            assert_eq!(request.url, "https://pod.test/upload");
            assert_eq!(request.header_value("Authorization"), Some("upload-token"));
            assert_eq!(request.header_value("X-Bz-File-Name"), Some("music/a.mp3"));
            assert_eq!(request.header_value("Content-Type"), Some("audio/mpeg"));
            assert_eq!(request.header_value("Content-Length"), Some("3"));
            assert_eq!(
                request.header_value("X-Bz-Content-Sha1"),
                Some("a9993e364706816aba3e25717850c26c9cd0d89d")
            );
            assert_eq!(request.header_value("X-Bz-Info-Author"), Some("rivendell"));
            assert_eq!(request.body, RequestBody::Bytes(Bytes::from_static(b"abc")));
            Ok(ApiResponse::new(
                200,
                r#"{"fileId":"4_z123","fileName":"music/a.mp3","contentSha1":"a9993e364706816aba3e25717850c26c9cd0d89d"}"#,
            ))
        });

        let url = uploader(mock)
            .upload(Bytes::from_static(b"abc"), "music/a.mp3", Some("audio/mpeg"), false)
            .await
            .unwrap();
        assert_eq!(url, "https://dl.test/file/media/music/a.mp3");
    }

    #[tokio::test]
    async fn test_upload_defaults_content_type() {
        let mut mock = MockApiTransport::new();
        mock.expect_send().times(3).returning(|request| {
            if let Some(response) = scripted(&request) {
                return Ok(response);
            }
            assert_eq!(request.header_value("Content-Type"), Some("b2/x-auto"));
            Ok(ApiResponse::new(200, r#"{"fileId":"1","fileName":"x/blob.bin"}"#))
        });

        uploader(mock)
            .upload(Bytes::from_static(b"data"), "x/blob.bin", None, false)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_public_url_uses_stored_name() {
        let mut mock = MockApiTransport::new();
        mock.expect_send().times(3).returning(|request| {
            if let Some(response) = scripted(&request) {
                return Ok(response);
            }
            Ok(ApiResponse::new(200, r#"{"fileId":"1","fileName":"stored/renamed.png"}"#))
        });

        let url = uploader(mock)
            .upload(Bytes::from_static(b"png"), "local/name.png", Some("image/png"), false)
            .await
            .unwrap();
        assert_eq!(url, "https://dl.test/file/media/stored/renamed.png");
    }

    #[tokio::test]
    async fn test_large_flag_requests_part_endpoint() {
        let mut mock = MockApiTransport::new();
        mock.expect_send().times(3).returning(|request| {
            if request.url.ends_with("b2_get_upload_url") {
                panic!("whole-file endpoint requested for a large upload");
            }
            if let Some(response) = scripted(&request) {
                return Ok(response);
            }
            Ok(ApiResponse::new(200, r#"{"fileId":"1","fileName":"big.mkv"}"#))
        });

        uploader(mock)
            .upload(Bytes::from_static(b"big"), "big.mkv", Some("video/x-matroska"), true)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_upload_error_is_propagated() {
        let mut mock = MockApiTransport::new();
        mock.expect_send().times(3).returning(|request| {
            if let Some(response) = scripted(&request) {
                return Ok(response);
            }
            Ok(ApiResponse::new(
                400,
                r#"{"status":400,"code":"bad_request","message":"Sha1 did not match data received"}"#,
            ))
        });

        let err = uploader(mock)
            .upload(Bytes::from_static(b"abc"), "a.txt", None, false)
            .await
            .unwrap_err();
        assert!(matches!(err, BackupError::RemoteApi { status: 400, .. }));
        assert_eq!(err.to_string(), "Sha1 did not match data received");
    }
}
