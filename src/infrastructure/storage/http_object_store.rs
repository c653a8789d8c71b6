//! Object store adapter for Firebase-style storage REST endpoints
//!
//! Objects live at `{endpoint}/b/{bucket}/o/{url-encoded key}`. Uploads
//! go to `{endpoint}/b/{bucket}/o?name={key}`, and a download URL is built
//! from the object's `downloadTokens` metadata.

use std::path::Path;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::application::ports::{ObjectStore, ObjectStoreError};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ObjectMetadata {
    name: Option<String>,
    download_tokens: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// HTTP object store client
pub struct HttpObjectStore {
    client: reqwest::Client,
    endpoint: String,
    bucket: String,
    token: Option<String>,
}

impl HttpObjectStore {
    /// Create a client for `bucket` at `endpoint`
    pub fn new(endpoint: impl Into<String>, bucket: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            bucket: bucket.into(),
            token: None,
        }
    }

    /// Send a bearer token with every request
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    fn bucket_url(&self) -> String {
        format!("{}/b/{}/o", self.endpoint, self.bucket)
    }

    fn upload_url(&self, key: &str) -> String {
        format!("{}?name={}", self.bucket_url(), urlencoding::encode(key))
    }

    fn object_url(&self, key: &str) -> String {
        format!("{}/{}", self.bucket_url(), urlencoding::encode(key))
    }

    fn media_url(&self, key: &str, token: Option<&str>) -> String {
        match token {
            Some(token) => format!(
                "{}?alt=media&token={}",
                self.object_url(key),
                urlencoding::encode(token)
            ),
            None => format!("{}?alt=media", self.object_url(key)),
        }
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Content type sent with an upload, derived from the key's extension
    fn content_type(key: &str) -> &'static str {
        match key.rsplit_once('.').map(|(_, ext)| ext.to_ascii_lowercase()) {
            Some(ext) if ext == "flac" => "audio/flac",
            Some(ext) if ext == "caf" => "audio/x-caf",
            Some(ext) if ext == "m4a" => "audio/mp4",
            Some(ext) if ext == "wav" => "audio/wav",
            _ => "application/octet-stream",
        }
    }

    /// Map a non-success response to an error
    async fn check(response: reqwest::Response, key: &str) -> Result<reqwest::Response, ObjectStoreError> {
        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(ObjectStoreError::Unauthorized);
        }

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ObjectStoreError::NotFound(key.to_string()));
        }

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            let message = serde_json::from_str::<ErrorResponse>(&error_text)
                .map(|r| r.error.message)
                .unwrap_or(error_text);
            return Err(ObjectStoreError::ApiError(format!("HTTP {}: {}", status, message)));
        }

        Ok(response)
    }

    async fn metadata(&self, key: &str) -> Result<ObjectMetadata, ObjectStoreError> {
        let response = self
            .authorize(self.client.get(self.object_url(key)))
            .send()
            .await
            .map_err(|e| ObjectStoreError::RequestFailed(e.to_string()))?;

        Self::check(response, key)
            .await?
            .json()
            .await
            .map_err(|e| ObjectStoreError::ParseError(e.to_string()))
    }
}

/// First token of a comma separated `downloadTokens` value
fn first_token(tokens: &str) -> Option<&str> {
    tokens.split(',').map(str::trim).find(|t| !t.is_empty())
}

#[async_trait]
impl ObjectStore for HttpObjectStore {
    async fn upload(&self, local: &Path, key: &str) -> Result<(), ObjectStoreError> {
        let bytes = tokio::fs::read(local)
            .await
            .map_err(|e| ObjectStoreError::ReadFailed(format!("{}: {}", local.display(), e)))?;

        debug!(%key, size = bytes.len(), "Uploading object");

        let response = self
            .authorize(self.client.post(self.upload_url(key)))
            .header(reqwest::header::CONTENT_TYPE, Self::content_type(key))
            .body(bytes)
            .send()
            .await
            .map_err(|e| ObjectStoreError::RequestFailed(e.to_string()))?;

        let metadata: ObjectMetadata = Self::check(response, key)
            .await?
            .json()
            .await
            .map_err(|e| ObjectStoreError::ParseError(e.to_string()))?;

        if let Some(name) = metadata.name.as_deref() {
            if name != key {
                return Err(ObjectStoreError::ApiError(format!(
                    "Stored as {} instead of {}",
                    name, key
                )));
            }
        }

        Ok(())
    }

    async fn download_url(&self, key: &str) -> Result<String, ObjectStoreError> {
        let metadata = self.metadata(key).await?;
        let token = metadata.download_tokens.as_deref().and_then(first_token);
        Ok(self.media_url(key, token))
    }

    async fn delete(&self, key: &str) -> Result<(), ObjectStoreError> {
        let response = self
            .authorize(self.client.delete(self.object_url(key)))
            .send()
            .await
            .map_err(|e| ObjectStoreError::RequestFailed(e.to_string()))?;

        Self::check(response, key).await?;
        Ok(())
    }
}
