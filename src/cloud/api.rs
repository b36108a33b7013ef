//! B2 wire types and the shared response decoding rules.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::cloud::transport::{ApiRequest, ApiResponse, ApiTransport};
use crate::error::{BackupError, Result};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizeAccountResponse {
    pub api_url: String,
    pub authorization_token: String,
    pub download_url: String,
    pub recommended_part_size: u64,
    #[serde(default)]
    pub absolute_minimum_part_size: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GetUploadUrlRequest<'a> {
    pub bucket_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_id: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetUploadUrlResponse {
    pub upload_url: String,
    pub authorization_token: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadFileResponse {
    pub file_id: String,
    pub file_name: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StartLargeFileRequest<'a> {
    pub bucket_id: &'a str,
    pub file_name: &'a str,
    pub content_type: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartLargeFileResponse {
    pub file_id: String,
    #[serde(default)]
    pub file_name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadPartResponse {
    pub part_number: u32,
    pub content_sha1: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinishLargeFileRequest<'a> {
    pub file_id: &'a str,
    pub part_sha1_array: &'a [String],
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelLargeFileRequest<'a> {
    pub file_id: &'a str,
}

/// Error body returned by B2 on any non-2xx response.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    status: Option<u16>,
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// Turn a non-2xx response into `BackupError::RemoteApi`.
///
/// A missing or empty `message` becomes `"<status> - <code>"`. A body that is
/// not a B2 error document yields code `unknown` with the HTTP status.
pub fn remote_error(response: &ApiResponse) -> BackupError {
    let (status, code, message) = match serde_json::from_slice::<ErrorBody>(&response.body) {
        Ok(body) => (
            body.status.unwrap_or(response.status),
            body.code.unwrap_or_else(|| "unknown".to_string()),
            body.message,
        ),
        Err(_) => (response.status, "unknown".to_string(), None),
    };

    let message = message
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| format!("{} - {}", status, code));

    BackupError::RemoteApi {
        status,
        code,
        message,
    }
}

/// Decode a successful response body.
pub fn decode<T: DeserializeOwned>(response: &ApiResponse, what: &'static str) -> Result<T> {
    serde_json::from_slice(&response.body).map_err(|source| BackupError::Decode { what, source })
}

/// Send a request, map non-2xx to `RemoteApi` and decode the body.
pub async fn call<T: DeserializeOwned>(
    transport: &dyn ApiTransport,
    request: ApiRequest,
    what: &'static str,
) -> Result<T> {
    let response = transport.send(request).await?;
    if !response.is_success() {
        return Err(remote_error(&response));
    }
    decode(&response, what)
}

/// Serialize a request body; these types cannot fail to serialize.
pub fn to_json<T: Serialize>(body: &T) -> serde_json::Value {
    serde_json::to_value(body).unwrap_or(serde_json::Value::Null)
}
