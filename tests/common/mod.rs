//! Shared fixtures for the integration tests.
//!
//! `FakeB2` plays the B2 API in memory: it answers every endpoint the
//! uploader uses and records each request so tests can inspect headers and
//! bodies afterwards.

#![allow(dead_code)]

use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::json;

use benten::backup::BackupOrchestrator;
use benten::cloud::{ApiRequest, ApiResponse, ApiTransport, RequestBody};
use benten::config::{BackupOptions, ClientConfig, Credentials};
use benten::error::{BackupError, Result};

pub const UPLOAD_URL: &str = "https://pod.test/upload";
pub const PART_URL: &str = "https://pod.test/part";

/// In-memory B2 endpoint.
pub struct FakeB2 {
    part_size: u64,
    requests: Mutex<Vec<ApiRequest>>,
    auth_failure: Mutex<Option<ApiResponse>>,
    failing_names: Mutex<HashSet<String>>,
    fail_all_uploads: Mutex<bool>,
    expire_first_uploads: AtomicUsize,
    large_file_name: Mutex<String>,
    dropped: Mutex<HashSet<String>>,
}

impl FakeB2 {
    pub fn new() -> Self {
        Self::with_part_size(100_000_000)
    }

    pub fn with_part_size(part_size: u64) -> Self {
        FakeB2 {
            part_size,
            requests: Mutex::new(Vec::new()),
            auth_failure: Mutex::new(None),
            failing_names: Mutex::new(HashSet::new()),
            fail_all_uploads: Mutex::new(false),
            expire_first_uploads: AtomicUsize::new(0),
            large_file_name: Mutex::new(String::new()),
            dropped: Mutex::new(HashSet::new()),
        }
    }

    /// Answer `b2_authorize_account` with this status and body.
    pub fn reject_auth(&self, status: u16, body: &str) {
        *self.auth_failure.lock().unwrap() = Some(ApiResponse::new(status, body.to_string()));
    }

    /// Fail whole-file uploads of this object name with a 503.
    pub fn fail_upload(&self, file_name: &str) {
        self.failing_names.lock().unwrap().insert(file_name.to_string());
    }

    pub fn fail_all_uploads(&self) {
        *self.fail_all_uploads.lock().unwrap() = true;
    }

    /// Answer the next `count` whole-file uploads with `expired_auth_token`.
    pub fn expire_tokens_for(&self, count: usize) {
        self.expire_first_uploads.store(count, Ordering::SeqCst);
    }

    /// Fail every request to `url` before it gets a response.
    pub fn drop_connections_to(&self, url: &str) {
        self.dropped.lock().unwrap().insert(url.to_string());
    }

    /// Fail whole-file uploads of this object name before they get a response.
    pub fn drop_upload_of(&self, file_name: &str) {
        self.dropped.lock().unwrap().insert(file_name.to_string());
    }

    fn is_dropped(&self, request: &ApiRequest) -> bool {
        let dropped = self.dropped.lock().unwrap();
        dropped.contains(&request.url)
            || request
                .header_value("X-Bz-File-Name")
                .is_some_and(|name| dropped.contains(name))
    }

    /// Object names of the whole-file uploads sent so far.
    pub fn uploaded_names(&self) -> Vec<String> {
        self.requests()
            .iter()
            .filter(|r| r.url == UPLOAD_URL)
            .filter_map(|r| r.header_value("X-Bz-File-Name").map(str::to_string))
            .collect()
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn requests_to(&self, suffix: &str) -> Vec<ApiRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.url.ends_with(suffix))
            .collect()
    }

    fn respond(&self, request: &ApiRequest) -> ApiResponse {
        let url = request.url.as_str();

        if url.ends_with("/b2api/v2/b2_authorize_account") {
            if let Some(failure) = self.auth_failure.lock().unwrap().clone() {
                return failure;
            }
            let body = json!({
                "apiUrl": "https://api.test",
                "authorizationToken": "session-token",
                "downloadUrl": "https://dl.test",
                "recommendedPartSize": self.part_size,
                "absoluteMinimumPartSize": self.part_size,
            });
            return ApiResponse::new(200, body.to_string());
        }

        if url.ends_with("/b2api/v1/b2_get_upload_url") {
            let body = json!({
                "bucketId": "bucket-123",
                "uploadUrl": UPLOAD_URL,
                "authorizationToken": "upload-token",
            });
            return ApiResponse::new(200, body.to_string());
        }

        if url.ends_with("/b2api/v1/b2_get_upload_part_url") {
            let body = json!({
                "fileId": "large-1",
                "uploadUrl": PART_URL,
                "authorizationToken": "part-token",
            });
            return ApiResponse::new(200, body.to_string());
        }

        if url == UPLOAD_URL {
            let name = request.header_value("X-Bz-File-Name").unwrap_or_default().to_string();
            let expire = self
                .expire_first_uploads
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                .is_ok();
            if expire {
                let body = json!({
                    "status": 401,
                    "code": "expired_auth_token",
                    "message": "Authorization token has expired",
                });
                return ApiResponse::new(401, body.to_string());
            }
            let failing = *self.fail_all_uploads.lock().unwrap()
                || self.failing_names.lock().unwrap().contains(&name);
            if failing {
                return ApiResponse::new(
                    503,
                    r#"{"status":503,"code":"service_unavailable","message":"c001 is too busy"}"#,
                );
            }
            let body = json!({"fileId": format!("id-{}", name), "fileName": name});
            return ApiResponse::new(200, body.to_string());
        }

        if url == PART_URL {
            let part = request.header_value("X-Bz-Part-Number").unwrap_or_default();
            let sha = request.header_value("X-Bz-Content-Sha1").unwrap_or_default();
            return ApiResponse::new(
                200,
                format!(r#"{{"fileId":"large-1","partNumber":{},"contentSha1":"{}"}}"#, part, sha),
            );
        }

        if url.ends_with("/b2api/v2/b2_start_large_file") {
            if let RequestBody::Json(body) = &request.body {
                let name = body["fileName"].as_str().unwrap_or_default().to_string();
                *self.large_file_name.lock().unwrap() = name;
            }
            return self.large_file_response();
        }

        if url.ends_with("/b2api/v2/b2_finish_large_file") {
            return self.large_file_response();
        }

        if url.ends_with("/b2api/v2/b2_cancel_large_file") {
            return ApiResponse::new(200, r#"{"fileId":"large-1"}"#);
        }

        ApiResponse::new(
            404,
            r#"{"status":404,"code":"not_found","message":"no such endpoint"}"#,
        )
    }

    fn large_file_response(&self) -> ApiResponse {
        let name = self.large_file_name.lock().unwrap().clone();
        ApiResponse::new(200, json!({"fileId": "large-1", "fileName": name}).to_string())
    }
}

#[async_trait]
impl ApiTransport for FakeB2 {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
        if self.is_dropped(&request) {
            self.requests.lock().unwrap().push(request);
            return Err(BackupError::Config("connection reset by peer".to_string()));
        }
        let response = self.respond(&request);
        self.requests.lock().unwrap().push(request);
        Ok(response)
    }
}

pub fn test_credentials() -> Credentials {
    Credentials {
        key_id: "key-id".to_string(),
        key: "app-key".to_string(),
        bucket_id: "bucket-123".to_string(),
        bucket_name: "media".to_string(),
    }
}

pub fn orchestrator(fake: &Arc<FakeB2>, options: BackupOptions) -> BackupOrchestrator {
    let config = ClientConfig {
        auth_base_url: "https://auth.test".to_string(),
        ..ClientConfig::default()
    };
    let transport: Arc<dyn ApiTransport> = fake.clone();
    BackupOrchestrator::new(transport, test_credentials(), &config, options)
}

/// Writes `content` to `root/relative`, creating parent directories.
pub fn write_file(root: &Path, relative: &str, content: &[u8]) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}
